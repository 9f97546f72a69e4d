//! tsdp_tests: Declaration file corpus for conformance testing.
//!
//! [`CORPUS`] holds realistic declaration files that must parse, together
//! with the number of top-level declarations each one has. [`REJECTED`]
//! holds inputs that must fail, with the error they must fail with.

use tsdp_diagnostics::SyntaxErrorKind;

/// A declaration file that must parse.
#[derive(Debug, Clone, Copy)]
pub struct CorpusFile {
    pub name: &'static str,
    pub category: &'static str,
    /// Number of top-level declarations (children of the File node).
    pub declarations: usize,
    pub source: &'static str,
}

/// An input that must be rejected at a known place.
#[derive(Debug, Clone, Copy)]
pub struct RejectedFile {
    pub name: &'static str,
    pub kind: SyntaxErrorKind,
    pub line: u32,
    pub column: u32,
    pub source: &'static str,
}

pub const CORPUS: &[CorpusFile] = &[
    // ========================================================================
    // Category: globals
    // ========================================================================
    CorpusFile {
        name: "browser_globals",
        category: "globals",
        declarations: 6,
        source: r#"/// <reference no-default-lib="true"/>

declare var window: Window
declare var document: Document;
declare let devicePixelRatio: number
declare const __VERSION__: string;

declare function setTimeout(handler: (...args: any[]) => void, timeout?: number, ...args: any[]): number;
declare function clearTimeout(id: number | undefined): void
"#,
    },
    CorpusFile {
        name: "overloads",
        category: "globals",
        declarations: 3,
        source: r#"
declare function parseInt(value: string): number;
declare function parseInt(value: string, radix: number): number;
declare function isNaN(value: number): boolean
"#,
    },
    CorpusFile {
        name: "object_typed_global",
        category: "globals",
        declarations: 1,
        source: r#"
declare var process: {
    env: { [key: string]: string | undefined };
    argv: string[];
    platform: "linux" | "darwin" | "win32";
    exit(code?: number): never;
    on(event: "exit", listener: (code: number) => void): void,
};
"#,
    },
    // ========================================================================
    // Category: types
    // ========================================================================
    CorpusFile {
        name: "utility_types",
        category: "types",
        declarations: 7,
        source: r#"
type Partial<T> = { [P in keyof T]?: T[P] };
type Readonly<T> = { readonly [P in keyof T]: T[P] };
type Record<K extends keyof any, T> = { [P in K]: T };
type Nullable<T> = T | null | undefined;
type Dictionary<T = string> = { [key: string]: T }
type Thunk<R> = () => R
type Mixed = Partial<Foo> & Bar & { extra: boolean };
"#,
    },
    CorpusFile {
        name: "multiline_unions",
        category: "types",
        declarations: 3,
        source: r#"
type Method =
    | "GET"
    | "POST"
    | "PUT"
    | "DELETE";

type Json = string | number | boolean | null | Json[] | { [key: string]: Json }

type Listener<E = Event> = <T extends E>(event: T, ...rest: unknown[]) => boolean | void;
"#,
    },
    CorpusFile {
        name: "groups_and_arrays",
        category: "types",
        declarations: 4,
        source: r#"
type Matrix = number[][];
type Handlers = ((event: string) => void)[];
type Pairs = (string | number)[];
type Options = { verbose: boolean }[];
"#,
    },
    CorpusFile {
        name: "typeof_and_keyof",
        category: "types",
        declarations: 2,
        source: r#"
type ConfigKey = keyof typeof defaults;
declare function get<K extends ConfigKey>(key: K): Config[K];
"#,
    },
    // ========================================================================
    // Category: classes
    // ========================================================================
    CorpusFile {
        name: "event_emitter",
        category: "classes",
        declarations: 2,
        source: r#"
interface Listener<T = any> {
    (event: T): void
}

declare class EventEmitter<Events extends Record<string, any> = {}> extends Base implements Disposable, Iterable<string> {
    static defaultMaxListeners: number;
    private listeners: Map<string, Listener[]>;
    protected readonly name: string;
    constructor(options?: { captureRejections: boolean });
    on<K extends keyof Events>(name: K, listener: (payload: Events[K]) => void): this;
    once<K extends keyof Events>(name: K, listener: Listener<Events[K]>): this
    off(name?: string): void
    emit(name: string, ...args: any[]): boolean;
    [Symbol: string]: any;
}
"#,
    },
    CorpusFile {
        name: "interface_members",
        category: "classes",
        declarations: 2,
        source: r#"
interface ArrayLike<T> {
    readonly length: number;
    readonly [n: number]: T;
}

interface Array<T> extends ArrayLike<T> {
    length: number
    push(...items: T[]): number
    map<U>(callback: (value: T, index: number, array: T[]) => U, thisArg?: any): U[]
    filter(predicate: (value: T) => value is T): T[]
    find?(predicate: (value: T) => boolean): T | undefined
    <S>(value: S): S
    "quoted key": string
    42: boolean
    default: T
    constructor: Function
    static?: boolean
}
"#,
    },
    CorpusFile {
        name: "newline_separated_members",
        category: "classes",
        declarations: 2,
        source: r#"
interface Factory {
    create: Creator
    <T>(value: T): T
    reset: () => void
    <U>(value: U): U[]
}

interface Guard {
    check(value: unknown): Result
    is: boolean
    test(value: unknown): value is Result
    is(): boolean
}
"#,
    },
    // ========================================================================
    // Category: namespaces
    // ========================================================================
    CorpusFile {
        name: "nested_namespaces",
        category: "namespaces",
        declarations: 2,
        source: r#"
declare namespace NodeJS.Timers {
    interface Timeout {
        ref(): this;
        unref(): this;
    }
    namespace Internal {
        function isTimeout(value: any): value is Timeout;
        var active: number
        type Callback = (error: Error | null) => void;
        enum Phase { Idle, Poll, Check }
    }
}

declare module Lodash {
    export function chunk<T>(array: T[], size?: number): T[][];
    export var VERSION: string;
    export declare class Wrapper<T> {
        value(): T;
    }
    export import Util = Lodash.Internal.Util;
}
"#,
    },
    CorpusFile {
        name: "ambient_modules",
        category: "namespaces",
        declarations: 3,
        source: r#"
declare module "events" {
    import { Stream } from "stream";
    class EventEmitter {
        emit(name: string): boolean;
    }
    export = EventEmitter;
}

declare module "path" {
    export function join(...paths: string[]): string;
    export const sep: string;
    export { join as joinPaths };
    export default join;
}

declare module 'fs' {
    export * from "fs/promises";
    export type { Stats };
}
"#,
    },
    // ========================================================================
    // Category: enums
    // ========================================================================
    CorpusFile {
        name: "enums",
        category: "enums",
        declarations: 3,
        source: r#"
declare enum Direction {
    Up = 1,
    Down,
    Left,
    Right,
}
declare const enum Flags { None = 0, Read = 1, Write = 2 }
declare enum Empty {}
"#,
    },
    // ========================================================================
    // Category: modules
    // ========================================================================
    CorpusFile {
        name: "imports",
        category: "modules",
        declarations: 8,
        source: r#"
import "reflect-metadata";
import fs = require("fs");
import Alias = Some.Namespace.Member;
import * as path from "path";
import { readFile, writeFile as write, } from "fs";
import React, { Component } from "react";
import type { Props } from "./props";
import type * as Types from "./types"
"#,
    },
    CorpusFile {
        name: "exports",
        category: "modules",
        declarations: 10,
        source: r#"
export = Lib;
export as namespace Lib;
export * from "./core";
export * as utils from "./utils";
export { a, b as c } from "./letters";
export type { Options } from "./options";
export default Lib
export declare function create(options?: Options): Lib;
export interface Options { debug?: boolean }
export type Mode = "fast" | "safe";
"#,
    },
];

pub const REJECTED: &[RejectedFile] = &[
    RejectedFile {
        name: "initializer_on_global",
        kind: SyntaxErrorKind::UnexpectedTerminator,
        line: 1,
        column: 23,
        source: "declare var x: number = 5;",
    },
    RejectedFile {
        name: "readonly_method",
        kind: SyntaxErrorKind::ReadonlyOnMethod,
        line: 2,
        column: 5,
        source: "interface A {\n    readonly m(): void\n}",
    },
    RejectedFile {
        name: "default_before_required",
        kind: SyntaxErrorKind::DefaultsMustTrail,
        line: 1,
        column: 20,
        source: "type F<A = string, B> = A;",
    },
    RejectedFile {
        name: "parameter_default",
        kind: SyntaxErrorKind::ParameterInitializer,
        line: 1,
        column: 30,
        source: "declare function f(x: number = 1): void;",
    },
    RejectedFile {
        name: "unclosed_group",
        kind: SyntaxErrorKind::UnbalancedParentheses,
        line: 1,
        column: 10,
        source: "type T = (string | number;",
    },
    RejectedFile {
        name: "missing_declare",
        kind: SyntaxErrorKind::UnexpectedElement,
        line: 2,
        column: 1,
        source: "declare var a: number\nvar b: number",
    },
    RejectedFile {
        name: "unclosed_namespace",
        kind: SyntaxErrorKind::UnexpectedEndOfFile,
        line: 3,
        column: 1,
        source: "declare namespace A {\n    var x: number\n",
    },
    RejectedFile {
        name: "two_members_on_one_line",
        kind: SyntaxErrorKind::UnexpectedTerminator,
        line: 1,
        column: 25,
        source: "interface A { a: string b: number }",
    },
    RejectedFile {
        name: "unterminated_comment",
        kind: SyntaxErrorKind::UnterminatedComment,
        line: 2,
        column: 1,
        source: "declare var a: number;\n/* never closed",
    },
    RejectedFile {
        name: "newline_in_string",
        kind: SyntaxErrorKind::IllegalNewlineInString,
        line: 1,
        column: 19,
        source: "declare module \"fs\n\" {}",
    },
];
