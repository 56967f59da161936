//! Path utilities for `::`-joined module paths.

/// Splits a `::` path into its package and final segment.
///
/// Returns `None` for a single-segment path.
#[must_use]
pub fn split_last(path: &str) -> Option<(&str, &str)> {
    path.rsplit_once("::")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_last() {
        assert_eq!(split_last("crate::log::info"), Some(("crate::log", "info")));
        assert_eq!(
            split_last("crate::log::Logger::new"),
            Some(("crate::log::Logger", "new"))
        );
        assert_eq!(split_last("info"), None);
    }
}
