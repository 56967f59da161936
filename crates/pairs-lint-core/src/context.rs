//! Per-file context handed to front ends.

use std::path::{Component, Path, PathBuf};

/// Context for one compilation unit.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Module path from crate root (e.g., `["crate", "log", "sink"]`).
    pub module_path: Vec<String>,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);
        let module_path = Self::compute_module_path(&relative_path);

        Self {
            path,
            content,
            module_path,
            relative_path,
        }
    }

    /// The module path joined with `::`, the package of items declared here.
    #[must_use]
    pub fn package(&self) -> String {
        self.module_path.join("::")
    }

    /// Computes the module path from a relative file path.
    ///
    /// Components up to and including the last `src` directory are dropped,
    /// as are `lib`, `main` and `mod` file stems.
    fn compute_module_path(relative_path: &Path) -> Vec<String> {
        let parts: Vec<String> = relative_path
            .with_extension("")
            .components()
            .filter_map(|c| {
                if let Component::Normal(s) = c {
                    s.to_str().map(String::from)
                } else {
                    None
                }
            })
            .collect();

        let start = parts
            .iter()
            .rposition(|p| p == "src")
            .map_or(0, |i| i + 1);
        let mut parts = parts[start..].to_vec();

        if let Some(last) = parts.last() {
            if last == "mod" || last == "lib" || last == "main" {
                parts.pop();
            }
        }

        parts.insert(0, "crate".to_string());
        parts
    }

    /// Calculates byte offset for a given line and column.
    ///
    /// # Arguments
    ///
    /// * `line` - 1-indexed line number
    /// * `column` - 1-indexed column number, counted in characters
    ///
    /// # Returns
    ///
    /// Byte offset from the start of the file, or 0 if out of bounds.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }

        let mut offset = 0;
        for (i, line_content) in self.content.split_inclusive('\n').enumerate() {
            if i + 1 == line {
                let within = line_content
                    .char_indices()
                    .nth(column.saturating_sub(1))
                    .map_or(line_content.len(), |(b, _)| b);
                return offset + within;
            }
            offset += line_content.len();
        }

        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_path() {
        assert_eq!(
            FileContext::compute_module_path(Path::new("src/foo/bar.rs")),
            vec!["crate", "foo", "bar"]
        );
        assert_eq!(
            FileContext::compute_module_path(Path::new("src/foo/mod.rs")),
            vec!["crate", "foo"]
        );
        assert_eq!(
            FileContext::compute_module_path(Path::new("crates/app/src/lib.rs")),
            vec!["crate"]
        );
        assert_eq!(
            FileContext::compute_module_path(Path::new("tests/it.rs")),
            vec!["crate", "tests", "it"]
        );
    }

    #[test]
    fn test_package() {
        let ctx = FileContext::new(
            Path::new("/p/src/log/sink.rs"),
            "",
            Path::new("/p"),
        );
        assert_eq!(ctx.package(), "crate::log::sink");
        assert_eq!(ctx.relative_path, PathBuf::from("src/log/sink.rs"));
    }

    #[test]
    fn test_offset_calculation() {
        let ctx = FileContext::new(Path::new("test.rs"), "line1\nline2\nline3", Path::new("/"));

        assert_eq!(ctx.offset_for(1, 1), 0);
        assert_eq!(ctx.offset_for(2, 1), 6);
        assert_eq!(ctx.offset_for(2, 3), 8);
        assert_eq!(ctx.offset_for(0, 3), 0);
    }
}
