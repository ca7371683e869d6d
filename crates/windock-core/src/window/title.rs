use std::sync::LazyLock;

use regex::Regex;

// Trailing edit-state markers appended by document-based apps.
static EDIT_SUFFIX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\s*[\u{2014}\u{2013}-]\s*(?:Edited|Bearbeitet)$")
        .inspect_err(|e| {
            tracing::error!(
                event = "core.window.title_suffix_pattern_invalid",
                error = %e
            );
        })
        .ok()
});

/// Normalize a window title for cross-source comparison.
///
/// Collapses whitespace runs to a single space, trims, and strips one
/// trailing edit-state suffix such as `" — Edited"`. Case is preserved.
pub fn normalize_title(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    match EDIT_SUFFIX.as_ref() {
        Some(pattern) => pattern.replace(&collapsed, "").trim_end().to_string(),
        None => collapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize_title("  Project   Plan\t\n v2 "), "Project Plan v2");
    }

    #[test]
    fn test_strips_edited_suffix_variants() {
        assert_eq!(normalize_title("Notes — Edited"), "Notes");
        assert_eq!(normalize_title("Notes – Edited"), "Notes");
        assert_eq!(normalize_title("Notes - Edited"), "Notes");
        assert_eq!(normalize_title("Notiz — Bearbeitet"), "Notiz");
    }

    #[test]
    fn test_strips_only_trailing_suffix() {
        assert_eq!(
            normalize_title("Edited — Draft — Edited"),
            "Edited — Draft"
        );
        assert_eq!(normalize_title("Edited files"), "Edited files");
    }

    #[test]
    fn test_preserves_case() {
        assert_eq!(normalize_title("README.md"), "README.md");
        assert_eq!(normalize_title("readme.md"), "readme.md");
    }

    #[test]
    fn test_empty_and_blank_titles() {
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title("   "), "");
    }
}
