/*============================================================
  Synavera Project: Syn-Compat
  Module: syncompat_core::version
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Dotted-numeric version ordering plus truncation and prefix
    matching for version strings of differing precision
    (e.g. a matrix token "9.0" against a platform "9.0.1").

  Security / Safety Notes:
    Pure computation; no I/O performed in this module.

  Dependencies:
    None beyond std.

  Operational Scope:
    Used by the resolver to rank Splunkbase releases and to
    match installed versions against compatibility tokens.

  Revision History:
    2026-09-14 COD  Replaced external vercmp with native ordering.
    2026-10-18 COD  Total ordering for wildcard matrix tokens.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Unparseable versions never enter numeric ordering
    - Deterministic comparisons with no hidden state
============================================================*/

use std::cmp::Ordering;
use std::fmt;

/// A strictly numeric dotted version such as `9.0.1` or `4.10`.
#[derive(Debug, Clone)]
pub struct Version {
    components: Vec<u64>,
}

impl Version {
    /// Parse a dotted numeric version. Returns `None` for anything else
    /// (`1.2.3b`, `7.x`, empty strings, empty components).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let components = raw
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                    None
                } else {
                    part.parse::<u64>().ok()
                }
            })
            .collect::<Option<Vec<u64>>>()?;
        Some(Self { components })
    }

    /// Number of dotted components as written.
    pub fn precision(&self) -> usize {
        self.components.len()
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for idx in 0..len {
            let a = self.components.get(idx).copied().unwrap_or(0);
            let b = other.components.get(idx).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.components.iter().map(u64::to_string).collect();
        f.write_str(&rendered.join("."))
    }
}

/// Total order over version-like strings used to rank matrix tokens.
///
/// Components compare numerically; a non-numeric component (`x`, `*`) sorts
/// above every number at the same position and non-numeric components
/// compare as text. Missing components count as `0`. Strings that tie
/// component-wise (`9.0` and `9.0.0`) fall back to plain string ordering.
pub fn compare_loose(a: &str, b: &str) -> Ordering {
    let a_parts: Vec<Component<'_>> = a.trim().split('.').map(Component::from).collect();
    let b_parts: Vec<Component<'_>> = b.trim().split('.').map(Component::from).collect();
    let len = a_parts.len().max(b_parts.len());
    for idx in 0..len {
        let left = a_parts.get(idx).copied().unwrap_or(Component::Number(0));
        let right = b_parts.get(idx).copied().unwrap_or(Component::Number(0));
        match left.cmp(&right) {
            Ordering::Equal => {}
            ord => return ord,
        }
    }
    a.cmp(b)
}

/// One dotted component; numbers order below text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Component<'a> {
    Number(u64),
    Text(&'a str),
}

impl<'a> From<&'a str> for Component<'a> {
    fn from(part: &'a str) -> Self {
        if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
            part.parse::<u64>()
                .map(Component::Number)
                .unwrap_or(Component::Text(part))
        } else {
            Component::Text(part)
        }
    }
}

/// Keep the first `components` dotted components of `version`.
pub fn truncate(version: &str, components: usize) -> String {
    version
        .trim()
        .split('.')
        .take(components)
        .collect::<Vec<_>>()
        .join(".")
}

/// True when `version`, cut down to the component count of `token`, equals
/// `token`. A token component of `x` or `*` matches any value.
pub fn matches_prefix(token: &str, version: &str) -> bool {
    let token_parts: Vec<&str> = token.trim().split('.').collect();
    let version_parts: Vec<&str> = version.trim().split('.').collect();
    if token.trim().is_empty() || token_parts.len() > version_parts.len() {
        return false;
    }
    token_parts
        .iter()
        .zip(version_parts.iter())
        .all(|(t, v)| is_wildcard(t) || t == v)
}

/// True when `raw` is a dotted numeric version with exactly `components` parts.
pub fn has_precision(raw: &str, components: usize) -> bool {
    Version::parse(raw)
        .map(|version| version.precision() == components)
        .unwrap_or(false)
}

fn is_wildcard(component: &str) -> bool {
    matches!(component, "x" | "X" | "*")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_numeric_not_lexical() {
        let a = Version::parse("4.9.0").unwrap();
        let b = Version::parse("4.10.0").unwrap();
        assert!(a < b);
        assert_eq!(compare_loose("9.0.10", "9.0.9"), Ordering::Greater);
    }

    #[test]
    fn missing_components_compare_as_zero() {
        assert_eq!(
            Version::parse("9.0").unwrap().cmp(&Version::parse("9.0.0").unwrap()),
            Ordering::Equal
        );
    }

    #[test]
    fn non_numeric_versions_do_not_parse() {
        assert!(Version::parse("1.2.3b").is_none());
        assert!(Version::parse("7.x").is_none());
        assert!(Version::parse("").is_none());
        assert!(Version::parse("1..2").is_none());
        assert!(Version::parse("-1.0").is_none());
    }

    #[test]
    fn differently_written_versions_are_equal() {
        let short = Version::parse("9.0").unwrap();
        let long = Version::parse("9.0.0").unwrap();
        assert_eq!(short, long);
        assert_ne!(short, Version::parse("9.0.1").unwrap());
    }

    #[test]
    fn wildcard_components_rank_above_numbers() {
        assert_eq!(compare_loose("7.x", "7.1.0"), Ordering::Greater);
        assert_eq!(compare_loose("4.10.x", "4.10.0"), Ordering::Greater);
        assert_eq!(compare_loose("4.9.0", "4.10.x"), Ordering::Less);
        assert_eq!(compare_loose("5.0.0", "4.x"), Ordering::Greater);
    }

    #[test]
    fn loose_ordering_ignores_input_order() {
        let orders = [
            ["4.9.0", "4.10.0", "4.10.x"],
            ["4.10.x", "4.9.0", "4.10.0"],
            ["4.10.0", "4.10.x", "4.9.0"],
            ["4.9.0", "4.10.x", "4.10.0"],
        ];
        for order in orders {
            let mut tokens = order.to_vec();
            tokens.sort_by(|a, b| compare_loose(b, a));
            assert_eq!(tokens, vec!["4.10.x", "4.10.0", "4.9.0"]);
        }
    }

    #[test]
    fn loose_ties_break_on_text() {
        assert_eq!(compare_loose("9.0", "9.0.0"), Ordering::Less);
        assert_eq!(compare_loose("9.0.0", "9.0.0"), Ordering::Equal);
    }

    #[test]
    fn truncated_prefix_match() {
        assert!(matches_prefix("9.0", "9.0.1"));
        assert!(!matches_prefix("9.0", "9.1.0"));
        assert!(matches_prefix("7.1.0", "7.1.0"));
        assert!(!matches_prefix("7.1.0", "7.1"));
        assert!(!matches_prefix("4.1", "4.10.0"));
    }

    #[test]
    fn wildcard_components_match_anything() {
        assert!(matches_prefix("7.1.x", "7.1.5"));
        assert!(!matches_prefix("7.1.x", "7.2.5"));
    }

    #[test]
    fn truncate_keeps_leading_components() {
        assert_eq!(truncate("9.1.2", 2), "9.1");
        assert_eq!(truncate("9", 2), "9");
    }

    #[test]
    fn precision_check_is_strict() {
        assert!(has_precision("9.1.0", 3));
        assert!(!has_precision("9.1", 3));
        assert!(!has_precision("Splunk 9.1.0", 3));
    }
}
