//! Call-site facts exported by an external type checker.
//!
//! Lets any front end that can resolve callees and argument types drive the
//! engine without a Rust parser:
//!
//! ```json
//! { "files": [ { "path": "a/a.go", "calls": [ { "kind": "function", ... } ] } ] }
//! ```

use crate::call::CallSite;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors reading a facts file.
#[derive(Debug, thiserror::Error)]
pub enum FactsError {
    /// IO error reading the facts file.
    #[error("Failed to read facts file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The facts file is not valid JSON of the expected shape.
    #[error("Failed to parse facts: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Call sites of one compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFacts {
    /// Path of the compilation unit.
    pub path: PathBuf,
    /// Call expressions found in it.
    #[serde(default)]
    pub calls: Vec<CallSite>,
}

/// A complete facts document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facts {
    /// Compilation units.
    #[serde(default)]
    pub files: Vec<FileFacts>,
}

impl Facts {
    /// Loads facts from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, FactsError> {
        let content = std::fs::read_to_string(path).map_err(|e| FactsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses facts from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn parse(content: &str) -> Result<Self, FactsError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Total number of call sites.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.files.iter().map(|f| f.calls.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::{ArgumentFacts, CallKind};

    #[test]
    fn parses_document() {
        let facts = Facts::parse(
            r#"{
  "files": [
    {
      "path": "a/a.go",
      "calls": [
        {
          "kind": "function",
          "package": "a/b",
          "function": "X",
          "location": { "file": "a/a.go", "line": 17, "column": 2 },
          "arguments": [
            { "index": 0, "location": { "file": "a/a.go", "line": 17, "column": 6 },
              "facts": "constant", "kind": "string" },
            { "index": 1, "location": { "file": "a/a.go", "line": 17, "column": 10 },
              "facts": "unknown" }
          ]
        }
      ]
    },
    { "path": "a/empty.go" }
  ]
}"#,
        )
        .unwrap();

        assert_eq!(facts.files.len(), 2);
        assert_eq!(facts.call_count(), 1);
        let call = &facts.files[0].calls[0];
        assert_eq!(
            call.kind,
            CallKind::Function {
                package: "a/b".to_string()
            }
        );
        assert_eq!(call.arguments[1].facts, ArgumentFacts::Unknown);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Facts::parse("{ \"files\": 3 }"),
            Err(FactsError::Parse(_))
        ));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facts.json");
        std::fs::write(&path, r#"{ "files": [ { "path": "a/a.go" } ] }"#).unwrap();

        let facts = Facts::from_file(&path).unwrap();
        assert_eq!(facts.files[0].path, PathBuf::from("a/a.go"));
        assert_eq!(facts.call_count(), 0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Facts::from_file(Path::new("/nonexistent/facts.json")).unwrap_err();
        assert!(matches!(err, FactsError::Io { .. }));
    }
}
