//! Name and key matching under a `MatchRule`
//!
//! The same matcher is used for coarse index lookups (over encoded key
//! bytes) and for the fine confirmation step (over decoded names), so the
//! two levels can never disagree about case folding or wildcards.

use crate::error::SearchError;
use crate::query::types::{MatchMode, MatchRule};
use crate::Result;
use regex::bytes::{Regex, RegexBuilder};

/// Compiled matcher for one pattern under one rule
#[derive(Clone, Debug)]
pub enum NameMatcher {
    /// No pattern: everything matches
    Any,
    Exact { pattern: Vec<u8>, case_sensitive: bool },
    Prefix { pattern: Vec<u8>, case_sensitive: bool },
    Wildcard(Regex),
    CamelCase { pattern: String, case_sensitive: bool },
}

impl NameMatcher {
    /// Compile a matcher; `None` matches every name
    pub fn new(pattern: Option<&str>, rule: MatchRule) -> Result<Self> {
        Self::for_bytes(pattern.map(str::as_bytes), rule)
    }

    /// Compile a matcher over raw key bytes
    pub fn for_bytes(pattern: Option<&[u8]>, rule: MatchRule) -> Result<Self> {
        let Some(pattern) = pattern else {
            return Ok(NameMatcher::Any);
        };

        let matcher = match rule.mode {
            MatchMode::Exact => NameMatcher::Exact {
                pattern: pattern.to_vec(),
                case_sensitive: rule.case_sensitive,
            },
            MatchMode::Prefix => NameMatcher::Prefix {
                pattern: pattern.to_vec(),
                case_sensitive: rule.case_sensitive,
            },
            MatchMode::Pattern => {
                let text = std::str::from_utf8(pattern).map_err(|e| {
                    SearchError::InvalidPattern(format!("Wildcard pattern is not UTF-8: {}", e))
                })?;
                NameMatcher::Wildcard(wildcard_to_regex(text, rule.case_sensitive)?)
            }
            MatchMode::CamelCase => {
                let text = std::str::from_utf8(pattern).map_err(|e| {
                    SearchError::InvalidPattern(format!("Camel-case pattern is not UTF-8: {}", e))
                })?;
                NameMatcher::CamelCase {
                    pattern: text.to_string(),
                    case_sensitive: rule.case_sensitive,
                }
            }
        };
        Ok(matcher)
    }

    /// Check a decoded name
    pub fn matches(&self, name: &str) -> bool {
        self.matches_bytes(name.as_bytes())
    }

    /// Check raw bytes (encoded index key or name)
    pub fn matches_bytes(&self, candidate: &[u8]) -> bool {
        match self {
            NameMatcher::Any => true,
            NameMatcher::Exact {
                pattern,
                case_sensitive,
            } => {
                if *case_sensitive {
                    candidate == pattern.as_slice()
                } else {
                    candidate.eq_ignore_ascii_case(pattern)
                }
            }
            NameMatcher::Prefix {
                pattern,
                case_sensitive,
            } => {
                if candidate.len() < pattern.len() {
                    return false;
                }
                let head = &candidate[..pattern.len()];
                if *case_sensitive {
                    head == pattern.as_slice()
                } else {
                    head.eq_ignore_ascii_case(pattern)
                }
            }
            NameMatcher::Wildcard(regex) => regex.is_match(candidate),
            NameMatcher::CamelCase {
                pattern,
                case_sensitive,
            } => {
                let Ok(name) = std::str::from_utf8(candidate) else {
                    return false;
                };
                if *case_sensitive {
                    camel_case_match(pattern, name)
                } else {
                    // Case-insensitive camel case also accepts a plain prefix
                    camel_case_match_folded(pattern, name)
                        || name
                            .as_bytes()
                            .get(..pattern.len())
                            .map_or(false, |head| head.eq_ignore_ascii_case(pattern.as_bytes()))
                }
            }
        }
    }

    /// Whether this matcher accepts everything
    pub fn is_any(&self) -> bool {
        matches!(self, NameMatcher::Any)
    }
}

/// Convert a wildcard pattern to an anchored, compiled regex
pub fn wildcard_to_regex(pattern: &str, case_sensitive: bool) -> Result<Regex> {
    let mut regex_pattern = String::with_capacity(pattern.len() + 8);
    regex_pattern.push('^');

    for ch in pattern.chars() {
        match ch {
            '*' => regex_pattern.push_str(".*"),
            '?' => regex_pattern.push('.'),
            _ => regex_pattern.push_str(&regex::escape(ch.encode_utf8(&mut [0u8; 4]))),
        }
    }

    regex_pattern.push('$');

    RegexBuilder::new(&regex_pattern)
        .case_insensitive(!case_sensitive)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| SearchError::InvalidPattern(format!("Invalid wildcard pattern: {}", e)))
}

/// Camel-case prefix match
///
/// The first character must match exactly. An upper-case (or digit)
/// pattern character skips ahead to the next hump start in the name;
/// lower-case pattern characters must match consecutively.
pub fn camel_case_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();

    if pattern.is_empty() {
        return true;
    }
    if name.is_empty() || pattern[0] != name[0] {
        return false;
    }

    let (mut ip, mut iname) = (1, 1);
    loop {
        if ip == pattern.len() {
            return true;
        }
        if iname == name.len() {
            return false;
        }

        let pc = pattern[ip];
        if pc == name[iname] {
            ip += 1;
            iname += 1;
            continue;
        }

        if !is_hump_start(pc) {
            return false;
        }

        // Skip the rest of the current hump
        iname += 1;
        loop {
            if iname == name.len() {
                return false;
            }
            let nc = name[iname];
            if !is_hump_start(nc) {
                iname += 1;
            } else if nc == pc {
                break;
            } else if nc.is_ascii_digit() {
                iname += 1;
            } else {
                return false;
            }
        }
    }
}

/// Camel-case match whose first character compares ignoring ASCII case
pub fn camel_case_match_folded(pattern: &str, name: &str) -> bool {
    let mut pattern_chars = pattern.chars();
    let mut name_chars = name.chars();
    match (pattern_chars.next(), name_chars.next()) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(p), Some(n)) if p.eq_ignore_ascii_case(&n) => {
            let mut rest = String::with_capacity(pattern.len());
            rest.push(n);
            rest.push_str(pattern_chars.as_str());
            camel_case_match(&rest, name)
        }
        _ => false,
    }
}

fn is_hump_start(c: char) -> bool {
    c.is_uppercase() || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_case() {
        let m = NameMatcher::new(Some("Foo"), MatchRule::exact()).unwrap();
        assert!(m.matches("Foo"));
        assert!(!m.matches("foo"));
        assert!(!m.matches("Foobar"));

        let m = NameMatcher::new(Some("Foo"), MatchRule::exact().ignore_case()).unwrap();
        assert!(m.matches("fOO"));
    }

    #[test]
    fn test_prefix() {
        let m = NameMatcher::new(Some("get"), MatchRule::prefix()).unwrap();
        assert!(m.matches("getName"));
        assert!(m.matches("get"));
        assert!(!m.matches("ge"));
        assert!(!m.matches("GetName"));

        let m = NameMatcher::new(Some("get"), MatchRule::prefix().ignore_case()).unwrap();
        assert!(m.matches("GetName"));
    }

    #[test]
    fn test_wildcard() {
        let m = NameMatcher::new(Some("get*Name?"), MatchRule::pattern()).unwrap();
        assert!(m.matches("getFullNames"));
        assert!(m.matches("getNameX"));
        assert!(!m.matches("getName"));
        assert!(!m.matches("setNameX"));

        // Regex metacharacters are literal
        let m = NameMatcher::new(Some("a.b*"), MatchRule::pattern()).unwrap();
        assert!(m.matches("a.bc"));
        assert!(!m.matches("axbc"));
    }

    #[test]
    fn test_camel_case() {
        assert!(camel_case_match("NPE", "NullPointerException"));
        assert!(camel_case_match("NuPoEx", "NullPointerException"));
        assert!(camel_case_match("NP", "NullPointerException"));
        assert!(camel_case_match("Nu", "NullPointerException"));
        assert!(!camel_case_match("NPX", "NullPointerException"));
        assert!(!camel_case_match("nPE", "NullPointerException"));
        assert!(camel_case_match("", "Anything"));
        assert!(!camel_case_match("A", ""));
    }

    #[test]
    fn test_camel_case_ignoring_case() {
        let strict = NameMatcher::new(Some("nPE"), MatchRule::camel_case()).unwrap();
        assert!(!strict.matches("NullPointerException"));

        let m = NameMatcher::new(Some("nPE"), MatchRule::camel_case().ignore_case()).unwrap();
        assert!(m.matches("NullPointerException"));
        assert!(!m.matches("NumberFormatException"));

        // Falls back to a prefix match
        let m = NameMatcher::new(Some("nullp"), MatchRule::camel_case().ignore_case()).unwrap();
        assert!(m.matches("NullPointerException"));
        assert!(!m.matches("NullException"));

        assert!(camel_case_match_folded("", "Anything"));
        assert!(!camel_case_match_folded("a", ""));
    }

    #[test]
    fn test_case_folding_per_mode() {
        // Literal modes fold ASCII only
        let m = NameMatcher::new(Some("café"), MatchRule::exact().ignore_case()).unwrap();
        assert!(m.matches("CAFé"));
        assert!(!m.matches("CAFÉ"));

        // Wildcards fold with Unicode rules
        let m = NameMatcher::new(Some("café*"), MatchRule::pattern().ignore_case()).unwrap();
        assert!(m.matches("CAFÉ_bar"));
    }

    #[test]
    fn test_any_matcher() {
        let m = NameMatcher::new(None, MatchRule::exact()).unwrap();
        assert!(m.is_any());
        assert!(m.matches(""));
        assert!(m.matches_bytes(b"\xff"));
    }
}
