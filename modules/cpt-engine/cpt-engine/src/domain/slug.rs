/// Derive a URL slug from a post title.
///
/// Lowercases, keeps letters and digits (any script), turns whitespace runs
/// into single hyphens and drops everything else. Repeated hyphens collapse
/// and the result never starts or ends with one. Applying it to its own
/// output is a no-op.
#[must_use]
pub fn derive_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_collapses_separators() {
        assert_eq!(derive_slug("Hello, World!  Test"), "hello-world-test");
        assert_eq!(derive_slug("  --Leading and trailing--  "), "leading-and-trailing");
        assert_eq!(derive_slug("a - - b"), "a-b");
        assert_eq!(derive_slug("Tabs\tand\nnewlines"), "tabs-and-newlines");
    }

    #[test]
    fn is_idempotent() {
        for title in [
            "Hello, World!  Test",
            "Already-a-slug",
            "Caf\u{e9} au lait",
            "!!!",
            "",
        ] {
            let once = derive_slug(title);
            assert_eq!(derive_slug(&once), once, "{title:?}");
        }
    }

    #[test]
    fn keeps_non_ascii_letters() {
        assert_eq!(derive_slug("Caf\u{e9} Cr\u{e8}me"), "caf\u{e9}-cr\u{e8}me");
        assert_eq!(derive_slug("\u{41f}\u{440}\u{438}\u{432}\u{435}\u{442} 2"), "\u{43f}\u{440}\u{438}\u{432}\u{435}\u{442}-2");
    }

    #[test]
    fn punctuation_only_yields_empty_slug() {
        assert_eq!(derive_slug("?!., ;"), "");
    }

    #[test]
    fn result_has_no_double_or_edge_hyphens() {
        let slug = derive_slug("--Why -- so ---- many -- hyphens?--");
        assert_eq!(slug, "why-so-many-hyphens");
        assert!(!slug.contains("--"));
        assert!(!slug.starts_with('-') && !slug.ends_with('-'));
    }
}
