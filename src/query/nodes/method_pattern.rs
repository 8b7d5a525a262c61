//! Method declaration pattern

use crate::encoding::{method_decl_key, DecodedKey};
use crate::index::{Category, QueryKey};
use crate::query::matching::NameMatcher;
use crate::query::pattern::SearchPattern;
use crate::query::types::{MatchMode, MatchRule};
use crate::Result;

use super::name_lookup_key;

/// Matches method declarations by selector and, optionally, arity
///
/// Arity is part of the encoded key but is only checked exactly after
/// decoding, except for exact selectors where the full key is known.
#[derive(Clone, Debug)]
pub struct MethodPattern {
    selector: Option<String>,
    arity: Option<u32>,
    rule: MatchRule,
    matcher: NameMatcher,
}

impl MethodPattern {
    pub fn new(selector: Option<&str>, arity: Option<u32>, rule: MatchRule) -> Result<Self> {
        Ok(Self {
            selector: selector.map(str::to_string),
            arity,
            rule,
            matcher: NameMatcher::new(selector, rule)?,
        })
    }

    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    pub fn arity(&self) -> Option<u32> {
        self.arity
    }
}

impl SearchPattern for MethodPattern {
    fn pattern_kind(&self) -> &'static str {
        "method"
    }

    fn query_key(&self) -> QueryKey {
        match (&self.selector, self.arity, self.rule.mode) {
            (Some(selector), Some(arity), MatchMode::Exact) => QueryKey::new(
                Category::MethodDecl,
                Some(method_decl_key(selector, arity)),
                self.rule,
            ),
            _ => name_lookup_key(Category::MethodDecl, self.selector.as_deref(), self.rule, true),
        }
    }

    fn blank_decoded(&self) -> DecodedKey {
        DecodedKey::blank(Category::MethodDecl)
    }

    fn matches_decoded_key(&self, decoded: &DecodedKey) -> bool {
        match decoded {
            DecodedKey::Method(key) => {
                self.matcher.matches(&key.selector)
                    && self.arity.map_or(true, |arity| arity == key.arity)
            }
            _ => false,
        }
    }
}
