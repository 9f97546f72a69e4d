//! tsdp_options: project file parsing and parse options.
//!
//! A project file is a small JSON document naming the declaration files to
//! parse and the options to parse them with:
//!
//! ```json
//! {
//!   "files": ["lib.d.ts", "node.d.ts"],
//!   "parseOptions": { "allowDollarInIdentifiers": false, "maxDepth": 64 }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tsdp_parser::ParserOptions;
use tsdp_scanner::LexerOptions;

/// Options recognised under `parseOptions`. Unset fields keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOptionsConfig {
    pub allow_dollar_in_identifiers: Option<bool>,
    pub max_depth: Option<u32>,
}

/// The project file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub parse_options: ParseOptionsConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read project file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid project file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("'maxDepth' must be at least 1")]
    ZeroDepth,
}

impl ParseOptionsConfig {
    /// Resolve to the options the parser runs with.
    pub fn to_parser_options(&self) -> Result<ParserOptions, ConfigError> {
        let mut options = ParserOptions::default();
        if let Some(allow) = self.allow_dollar_in_identifiers {
            options.lexer = LexerOptions {
                allow_dollar_in_identifiers: allow,
            };
        }
        match self.max_depth {
            Some(0) => return Err(ConfigError::ZeroDepth),
            Some(depth) => options.max_depth = depth,
            None => {}
        }
        Ok(options)
    }
}

impl ProjectConfig {
    /// The listed files, resolved against the directory holding the project
    /// file. Absolute entries are kept as they are.
    pub fn resolve_files(&self, base: &Path) -> Vec<PathBuf> {
        self.files.iter().map(|file| base.join(file)).collect()
    }
}

/// Parse a project file from a string.
pub fn parse_config(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig = serde_json::from_str(content)?;
    config.parse_options.to_parser_options()?;
    Ok(config)
}

/// Parse a project file from a path.
pub fn parse_config_file(path: impl AsRef<Path>) -> Result<ProjectConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = parse_config(
            r#"{
                "files": ["a.d.ts", "lib/b.d.ts"],
                "parseOptions": { "allowDollarInIdentifiers": false, "maxDepth": 32 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.files, vec!["a.d.ts", "lib/b.d.ts"]);

        let options = config.parse_options.to_parser_options().unwrap();
        assert!(!options.lexer.allow_dollar_in_identifiers);
        assert_eq!(options.max_depth, 32);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = parse_config("{}").unwrap();
        assert!(config.files.is_empty());
        assert_eq!(
            config.parse_options.to_parser_options().unwrap(),
            ParserOptions::default()
        );
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(parse_config("{ files: [] }"), Err(ConfigError::Json(_))));
        assert!(matches!(
            parse_config(r#"{ "files": "a.d.ts" }"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            parse_config(r#"{ "parseOptions": { "maxDepth": 0 } }"#),
            Err(ConfigError::ZeroDepth)
        ));
    }

    #[test]
    fn test_resolve_files() {
        let config = parse_config(r#"{ "files": ["a.d.ts", "/abs/b.d.ts"] }"#).unwrap();
        let files = config.resolve_files(Path::new("/proj"));
        assert_eq!(
            files,
            vec![PathBuf::from("/proj/a.d.ts"), PathBuf::from("/abs/b.d.ts")]
        );
    }

    #[test]
    fn test_missing_file() {
        let err = parse_config_file("/nonexistent/tsdp.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/tsdp.json"));
    }
}
