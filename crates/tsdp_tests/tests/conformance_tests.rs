//! Declaration file conformance tests.
//!
//! Runs the corpus through the parser, reports pass rates by category, and
//! checks the laws every successful parse must satisfy.

use tsdp_ast::{ParseNode, SyntaxKind};
use tsdp_parser::parse_source;
use tsdp_printer::print_code;
use tsdp_tests::{CorpusFile, CORPUS, REJECTED};

/// Test result for a single corpus file.
#[derive(Debug)]
struct TestResult {
    name: &'static str,
    category: &'static str,
    parse_error: Option<String>,
}

fn run_test(file: &CorpusFile) -> TestResult {
    let name = format!("{}.d.ts", file.name);
    TestResult {
        name: file.name,
        category: file.category,
        parse_error: parse_source(&name, file.source).err().map(|e| e.to_string()),
    }
}

fn parse(file: &CorpusFile) -> ParseNode {
    match parse_source(&format!("{}.d.ts", file.name), file.source) {
        Ok(tree) => tree,
        Err(err) => panic!("{} failed to parse: {}", file.name, err),
    }
}

fn print_summary(results: &[TestResult]) {
    let passed = results.iter().filter(|r| r.parse_error.is_none()).count();
    println!("\n=== Declaration Conformance Summary ===");
    println!("Total: {}, passed: {}, failed: {}", results.len(), passed, results.len() - passed);

    let mut categories: Vec<&str> = results.iter().map(|r| r.category).collect();
    categories.sort_unstable();
    categories.dedup();
    for category in categories {
        let in_category: Vec<_> = results.iter().filter(|r| r.category == category).collect();
        let ok = in_category.iter().filter(|r| r.parse_error.is_none()).count();
        println!("  {}: {}/{}", category, ok, in_category.len());
    }

    for failure in results.iter().filter(|r| r.parse_error.is_some()) {
        println!(
            "  [{}] {}: {}",
            failure.category,
            failure.name,
            failure.parse_error.as_deref().unwrap_or("unknown error")
        );
    }
}

/// Collect every node of the given kind in the tree.
fn collect<'a>(node: &'a ParseNode, kind: SyntaxKind, out: &mut Vec<&'a ParseNode>) {
    if node.kind == kind {
        out.push(node);
    }
    for child in &node.children {
        collect(child, kind, out);
    }
}

// ============================================================================
// Corpus
// ============================================================================

#[test]
fn test_corpus_conformance() {
    let results: Vec<TestResult> = CORPUS.iter().map(run_test).collect();
    print_summary(&results);
    let failed: Vec<_> = results.iter().filter(|r| r.parse_error.is_some()).map(|r| r.name).collect();
    assert!(failed.is_empty(), "corpus files failed to parse: {:?}", failed);
}

#[test]
fn test_corpus_declaration_counts() {
    for file in CORPUS {
        let tree = parse(file);
        assert_eq!(tree.kind, SyntaxKind::File);
        assert_eq!(tree.size(), file.declarations, "declaration count of {}", file.name);
        assert!(
            tree.children.iter().all(|c| c.kind == SyntaxKind::FileElement),
            "{} has a non-FileElement child",
            file.name
        );
    }
}

#[test]
fn test_corpus_print_reparses_to_same_shape() {
    for file in CORPUS {
        let tree = parse(file);
        let printed = print_code(&tree);
        let reparsed = match parse_source("printed.d.ts", &printed) {
            Ok(tree) => tree,
            Err(err) => panic!("printed {} does not parse: {}\n{}", file.name, err, printed),
        };
        assert!(tree.same_shape(&reparsed), "{} changed shape:\n{}", file.name, printed);
    }
}

#[test]
fn test_corpus_unions_never_single() {
    for file in CORPUS {
        let tree = parse(file);
        let mut unions = Vec::new();
        collect(&tree, SyntaxKind::UnionType, &mut unions);
        collect(&tree, SyntaxKind::IntersectionType, &mut unions);
        for union in unions {
            assert!(union.size() >= 2, "{} has a {} with one member", file.name, union.kind);
            assert!(
                union.children.iter().all(|c| c.kind != SyntaxKind::BarToken),
                "{} keeps a '|' leaf",
                file.name
            );
        }
    }
}

#[test]
fn test_corpus_leaves_have_text() {
    fn check(node: &ParseNode, name: &str) {
        if node.is_terminal() {
            assert!(!node.text().is_empty(), "{} has an empty {} leaf", name, node.kind);
            assert!(node.children.is_empty());
        } else {
            assert!(node.text.is_none(), "{} has text on a {} node", name, node.kind);
            node.children.iter().for_each(|c| check(c, name));
        }
    }
    for file in CORPUS {
        check(&parse(file), file.name);
    }
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_rejected_inputs() {
    for case in REJECTED {
        let err = match parse_source("bad.d.ts", case.source) {
            Ok(_) => panic!("{} parsed but should fail", case.name),
            Err(err) => err,
        };
        assert_eq!(err.kind, case.kind, "{}: {}", case.name, err);
        assert_eq!(
            (err.line(), err.column()),
            (case.line, case.column),
            "{}: {}",
            case.name,
            err
        );
        assert!(
            err.to_string()
                .starts_with(&format!("bad.d.ts:{}:{} Error: ", case.line, case.column)),
            "{}",
            err
        );
    }
}
