//! Field declaration pattern

use crate::encoding::DecodedKey;
use crate::index::{Category, QueryKey};
use crate::query::matching::NameMatcher;
use crate::query::pattern::SearchPattern;
use crate::query::types::MatchRule;
use crate::Result;

use super::name_lookup_key;

#[derive(Clone, Debug)]
pub struct FieldPattern {
    name: Option<String>,
    rule: MatchRule,
    matcher: NameMatcher,
}

impl FieldPattern {
    pub fn new(name: Option<&str>, rule: MatchRule) -> Result<Self> {
        Ok(Self {
            name: name.map(str::to_string),
            rule,
            matcher: NameMatcher::new(name, rule)?,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl SearchPattern for FieldPattern {
    fn pattern_kind(&self) -> &'static str {
        "field"
    }

    fn query_key(&self) -> QueryKey {
        name_lookup_key(Category::FieldDecl, self.name.as_deref(), self.rule, false)
    }

    fn blank_decoded(&self) -> DecodedKey {
        DecodedKey::blank(Category::FieldDecl)
    }

    fn matches_decoded_key(&self, decoded: &DecodedKey) -> bool {
        match decoded {
            DecodedKey::Field(key) => self.matcher.matches(&key.name),
            _ => false,
        }
    }
}
