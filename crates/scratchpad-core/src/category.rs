//! Category label normalization.

/// Normalize a free-form category label.
///
/// Lowercases the input, trims surrounding whitespace, then replaces every
/// remaining space with a hyphen. Filters compare categories by exact match,
/// so every category coming from a caller goes through this function first.
///
/// ```
/// use scratchpad_core::normalize_category;
///
/// assert_eq!(normalize_category("  Twitter Analytics "), "twitter-analytics");
/// assert_eq!(normalize_category("content-ideas"), "content-ideas");
/// ```
pub fn normalize_category(raw: &str) -> String {
    raw.to_lowercase().trim().replace(' ', "-")
}

/// Normalize an optional category filter, treating blank input as absent.
pub fn normalize_filter(raw: Option<&str>) -> Option<String> {
    raw.map(normalize_category).filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equivalent_spellings_normalize_identically() {
        let variants = [
            "Twitter Analytics",
            "  Twitter Analytics ",
            "twitter analytics",
            "TWITTER-ANALYTICS",
            "twitter-analytics",
        ];
        for v in variants {
            assert_eq!(normalize_category(v), "twitter-analytics", "input {:?}", v);
        }
    }

    #[test]
    fn test_content_ideas_collapse() {
        assert_eq!(
            normalize_category("Content Ideas"),
            normalize_category("content-ideas")
        );
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert_eq!(normalize_category(""), "");
        assert_eq!(normalize_category("   "), "");
        assert_eq!(normalize_category("\t\n"), "");
    }

    #[test]
    fn test_interior_spaces_each_become_hyphens() {
        assert_eq!(normalize_category("a  b"), "a--b");
    }

    #[test]
    fn test_tabs_inside_are_kept() {
        // Only the space character is rewritten.
        assert_eq!(normalize_category("a\tb"), "a\tb");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize_category(" Mixed Case Label ");
        assert_eq!(normalize_category(&once), once);
    }

    #[test]
    fn test_normalize_filter_blank_is_none() {
        assert_eq!(normalize_filter(None), None);
        assert_eq!(normalize_filter(Some("")), None);
        assert_eq!(normalize_filter(Some("  ")), None);
        assert_eq!(
            normalize_filter(Some("Content Ideas")),
            Some("content-ideas".to_string())
        );
    }
}
