//! Configuration file discovery.
//!
//! Priority order:
//!
//! 1. `--config` flag, taken as-is
//! 2. `pairs-lint.toml` or `.pairs-lint.toml` in the start directory or the
//!    nearest ancestor that has one
//! 3. `config.toml` in the global directory (`$PAIRS_LINT_CONFIG_DIR`, else
//!    `~/.pairs-lint/`)
//! 4. built-in defaults

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found beside or above the checked path.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// The config file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Whether the file came from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

/// Project config names, first match wins within one directory.
const PROJECT_CONFIG_NAMES: &[&str] = &["pairs-lint.toml", ".pairs-lint.toml"];

/// File name inside the global directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Finds the configuration for a run starting at `start`.
///
/// `start` may be a file (e.g. a facts file); the search then begins in its
/// directory.
#[must_use]
pub fn resolve(start: &Path, explicit: Option<&Path>) -> ConfigSource {
    Resolver {
        global_dir: global_config_dir(),
    }
    .resolve(start, explicit)
}

/// The global config directory: `$PAIRS_LINT_CONFIG_DIR` or `~/.pairs-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("PAIRS_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".pairs-lint"))
}

/// Resolution with the global directory injected, so tests need no env vars.
struct Resolver {
    global_dir: Option<PathBuf>,
}

impl Resolver {
    fn resolve(&self, start: &Path, explicit: Option<&Path>) -> ConfigSource {
        if let Some(p) = explicit {
            return ConfigSource::Explicit(p.to_path_buf());
        }

        if let Some(found) = Self::find_upwards(start) {
            tracing::debug!("Found project config: {}", found.display());
            return ConfigSource::Project(found);
        }

        self.global_dir
            .as_ref()
            .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
            .filter(|candidate| candidate.is_file())
            .map_or(ConfigSource::Default, |candidate| {
                tracing::debug!("Found global config: {}", candidate.display());
                ConfigSource::Global(candidate)
            })
    }

    fn find_upwards(start: &Path) -> Option<PathBuf> {
        let start = std::fs::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());
        let first = if start.is_file() {
            start.parent()?
        } else {
            start.as_path()
        };

        first.ancestors().find_map(|dir| {
            PROJECT_CONFIG_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn resolver(global: Option<&Path>) -> Resolver {
        Resolver {
            global_dir: global.map(Path::to_path_buf),
        }
    }

    fn canonical(p: PathBuf) -> PathBuf {
        fs::canonicalize(p).unwrap()
    }

    #[test]
    fn explicit_wins_and_is_not_checked() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("pairs-lint.toml"), "").unwrap();

        let result = resolver(None).resolve(tmp.path(), Some(Path::new("/nonexistent.toml")));
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/nonexistent.toml"))
        );
    }

    #[test]
    fn project_config_in_start_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".pairs-lint.toml"), "").unwrap();

        let result = resolver(None).resolve(tmp.path(), None);
        assert_eq!(
            result,
            ConfigSource::Project(canonical(tmp.path().join(".pairs-lint.toml")))
        );
    }

    #[test]
    fn undotted_name_preferred() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("pairs-lint.toml"), "").unwrap();
        fs::write(tmp.path().join(".pairs-lint.toml"), "").unwrap();

        let result = resolver(None).resolve(tmp.path(), None);
        assert_eq!(
            result,
            ConfigSource::Project(canonical(tmp.path().join("pairs-lint.toml")))
        );
    }

    #[test]
    fn project_config_found_in_ancestor() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("pairs-lint.toml"), "").unwrap();
        let src = tmp.path().join("crates/app/src");
        fs::create_dir_all(&src).unwrap();

        let result = resolver(None).resolve(&src, None);
        assert_eq!(
            result,
            ConfigSource::Project(canonical(tmp.path().join("pairs-lint.toml")))
        );
    }

    #[test]
    fn nearest_ancestor_wins() {
        let tmp = TempDir::new().unwrap();
        let inner = tmp.path().join("inner");
        fs::create_dir(&inner).unwrap();
        fs::write(tmp.path().join("pairs-lint.toml"), "").unwrap();
        fs::write(inner.join("pairs-lint.toml"), "").unwrap();

        let result = resolver(None).resolve(&inner, None);
        assert_eq!(
            result,
            ConfigSource::Project(canonical(inner.join("pairs-lint.toml")))
        );
    }

    #[test]
    fn file_start_searches_its_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("pairs-lint.toml"), "").unwrap();
        let facts = tmp.path().join("facts.json");
        fs::write(&facts, "{}").unwrap();

        let result = resolver(None).resolve(&facts, None);
        assert!(matches!(result, ConfigSource::Project(_)));
    }

    #[test]
    fn global_used_without_project_config() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolver(Some(global.path())).resolve(project.path(), None);
        assert_eq!(
            result,
            ConfigSource::Global(global.path().join("config.toml"))
        );
        assert!(result.is_global());
    }

    #[test]
    fn empty_global_dir_means_defaults() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let result = resolver(Some(global.path())).resolve(project.path(), None);
        assert_eq!(result, ConfigSource::Default);
        assert!(result.path().is_none());
    }
}
