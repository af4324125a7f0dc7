//! Path helpers shared by the classifier and the scanner.
//!
//! Every identity and slug in the site is derived from a relative directory
//! path, so paths are normalized to forward slashes before anything else
//! touches them. A path written on Windows and the same path written on
//! Linux must produce the same node ids.

/// Replace every platform separator with `/`.
///
/// Both `\` and the host's own separator are rewritten. Segment order and
/// content are preserved, and an already-canonical path comes back unchanged.
/// The conversion is lossy: a path mixing `\` with literal `/` cannot be
/// turned back into its original form.
pub fn to_posix(path: &str) -> String {
    path.chars()
        .map(|c| {
            if c == '\\' || c == std::path::MAIN_SEPARATOR {
                '/'
            } else {
                c
            }
        })
        .collect()
}

/// Split a normalized path into its directory segments.
///
/// Empty segments are dropped, so `""` and `"/"` both give an empty list
/// (the source root) and `"USA//Oregon/"` gives `["USA", "Oregon"]`.
pub fn split_tokens(raw_path: &str) -> Vec<String> {
    raw_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalize a relative directory path and split it in one go.
pub fn path_tokens(relative_directory: &str) -> (String, Vec<String>) {
    let raw_path = to_posix(relative_directory);
    let tokens = split_tokens(&raw_path);
    (raw_path, tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backslashes_become_forward_slashes() {
        assert_eq!(to_posix(r"USA\Oregon\Portland"), "USA/Oregon/Portland");
    }

    #[test]
    fn test_canonical_path_is_unchanged() {
        let path = "USA/Oregon/Broughton Bluff/Hanging Gardens";
        assert_eq!(to_posix(path), path);
        assert_eq!(to_posix(&to_posix(path)), path);
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(to_posix(""), "");
        assert!(split_tokens("").is_empty());
        assert!(split_tokens("/").is_empty());
    }

    #[test]
    fn test_mixed_separators_are_lossy() {
        // Both spellings collapse to the same canonical form.
        assert_eq!(to_posix(r"USA\Oregon/Bend"), to_posix("USA/Oregon/Bend"));
    }

    #[test]
    fn test_split_tokens_keeps_order_and_spaces() {
        assert_eq!(
            split_tokens("USA//Oregon/This has space/"),
            vec!["USA", "Oregon", "This has space"]
        );
    }

    #[test]
    fn test_path_tokens() {
        let (raw, tokens) = path_tokens(r"USA\Oregon");
        assert_eq!(raw, "USA/Oregon");
        assert_eq!(tokens, vec!["USA", "Oregon"]);
    }
}
