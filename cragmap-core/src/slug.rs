use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Slugify a single display name.
///
/// ```
/// use cragmap_core::slug::slugify;
///
/// assert_eq!(slugify("Broughton Bluff"), "broughton-bluff");
/// assert_eq!(slugify("Café Crack"), "cafe-crack");
/// assert_eq!(slugify("O'Brien's Wall"), "obriens-wall");
/// assert_eq!(slugify("  --Smith Rock--  "), "smith-rock");
/// assert_eq!(slugify("!!!"), "");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut prev_hyphen = true; // suppress leading hyphen

    // Decompose first so accented letters split into base + combining mark.
    for ch in text.nfd() {
        if is_combining_mark(ch) || is_quote(ch) {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            prev_hyphen = false;
        } else if ch.is_alphanumeric() {
            // Strict mode: letters without an ASCII base are dropped.
            continue;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn is_quote(ch: char) -> bool {
    matches!(ch, '\'' | '"' | '`' | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}')
}

/// Slugify each path token and join them with `/`.
///
/// ```
/// use cragmap_core::slug::slugify_path;
///
/// assert_eq!(
///     slugify_path(&["USA", "Oregon", "This has space"]),
///     "usa/oregon/this-has-space"
/// );
/// ```
pub fn slugify_path<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|token| slugify(token.as_ref()))
        .collect::<Vec<_>>()
        .join("/")
}

/// Route path for a token sequence: `/` followed by the slugified path.
pub fn route_for<S: AsRef<str>>(tokens: &[S]) -> String {
    format!("/{}", slugify_path(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_path() {
        assert_eq!(
            slugify_path(&["USA", "Oregon", "This has space"]),
            "usa/oregon/this-has-space"
        );
    }

    #[test]
    fn test_route_for() {
        assert_eq!(route_for(&["USA", "Oregon"]), "/usa/oregon");
        assert_eq!(route_for::<&str>(&[]), "/");
    }

    #[test]
    fn test_diacritics_are_stripped() {
        assert_eq!(slugify("Ĺa Pedriza"), "la-pedriza");
        assert_eq!(slugify("Grüne Wand"), "grune-wand");
        assert_eq!(slugify("Señor Slab"), "senor-slab");
    }

    #[test]
    fn test_runs_collapse_to_one_hyphen() {
        assert_eq!(slugify("Hanging   Gardens // (North)"), "hanging-gardens-north");
    }

    #[test]
    fn test_non_latin_characters_are_dropped() {
        assert_eq!(slugify("北京 Wall"), "wall");
    }

    #[test]
    fn test_unicode_separators_become_hyphens() {
        assert_eq!(slugify("Smith\u{00A0}Rock"), "smith-rock");
        assert_eq!(slugify("Red\u{2013}Wall"), "red-wall");
        assert_eq!(slugify("Smith\u{3000}Rock"), "smith-rock");
        assert_eq!(slugify("Bend \u{2014} North"), "bend-north");
    }

    #[test]
    fn test_distinct_names_can_share_a_slug() {
        // Accepted trade-off: routing treats slugs as unique anyway.
        assert_eq!(slugify("Half Dome"), "half-dome");
        assert_eq!(slugify("Half-Dome"), "half-dome");
        assert_eq!(slugify("half dome!"), "half-dome");
    }

    #[test]
    fn test_slugify_path_is_deterministic_and_idempotent() {
        let inputs: Vec<Vec<&str>> = vec![
            vec!["USA", "Oregon", "Portland", "Broughton Bluff", "Hanging Gardens"],
            vec!["(6) Red Wall", "04-Leavitt Peak"],
            vec!["Café Crack", "O'Brien's", "5.10a/b"],
            vec!["", "Only Second"],
        ];

        for tokens in inputs {
            let once = slugify_path(&tokens);
            assert_eq!(once, slugify_path(&tokens));

            let reparsed: Vec<&str> = once.split('/').collect();
            assert_eq!(slugify_path(&reparsed), once);
        }
    }

    #[test]
    fn test_grade_like_token_splits_on_slash() {
        // A literal slash inside a token becomes a hyphen, not a new segment.
        assert_eq!(slugify_path(&["5.10a/b"]), "5-10a-b");
    }
}
