use regex::Regex;
use std::sync::LazyLock;

// Either a 1-3 character parenthetical such as `(6) ` or `(aa)`, or a
// `01-`..`99-` ordering prefix. Both alternatives are anchored.
static LEADING_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\(.{1,3}\) *|(?:\d?[1-9]|[1-9]0)-)").expect("leading marker pattern")
});

/// Remove one leading `(6)`, `(aa)` or `04-` marker from an area or climb name.
///
/// Only the first marker is removed; `"(6) 04-Foo"` becomes `"04-Foo"`.
/// A route actually named `"(AI) Foo"` loses its prefix too.
pub fn sanitize_name(name: &str) -> String {
    LEADING_MARKER.replace(name, "").into_owned()
}

/// Name sanitizing that can be switched off from the site config.
#[derive(Debug, Clone, Copy)]
pub struct NameSanitizer {
    strip_prefixes: bool,
}

impl Default for NameSanitizer {
    fn default() -> Self {
        Self {
            strip_prefixes: true,
        }
    }
}

impl NameSanitizer {
    pub fn new(strip_prefixes: bool) -> Self {
        Self { strip_prefixes }
    }

    pub fn apply(&self, name: &str) -> String {
        if self.strip_prefixes {
            sanitize_name(name)
        } else {
            name.to_string()
        }
    }
}
