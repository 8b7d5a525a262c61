//! Reference pattern (uses of a name)

use crate::encoding::DecodedKey;
use crate::index::{Category, QueryKey};
use crate::query::matching::NameMatcher;
use crate::query::pattern::SearchPattern;
use crate::query::types::MatchRule;
use crate::Result;

use super::name_lookup_key;

#[derive(Clone, Debug)]
pub struct ReferencePattern {
    name: Option<String>,
    rule: MatchRule,
    matcher: NameMatcher,
}

impl ReferencePattern {
    pub fn new(name: Option<&str>, rule: MatchRule) -> Result<Self> {
        Ok(Self {
            name: name.map(str::to_string),
            rule,
            matcher: NameMatcher::new(name, rule)?,
        })
    }

    /// Case-sensitive exact reference
    pub fn exact(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            rule: MatchRule::exact(),
            matcher: NameMatcher::Exact {
                pattern: name.as_bytes().to_vec(),
                case_sensitive: true,
            },
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl SearchPattern for ReferencePattern {
    fn pattern_kind(&self) -> &'static str {
        "reference"
    }

    fn query_key(&self) -> QueryKey {
        name_lookup_key(Category::Reference, self.name.as_deref(), self.rule, false)
    }

    fn blank_decoded(&self) -> DecodedKey {
        DecodedKey::blank(Category::Reference)
    }

    fn matches_decoded_key(&self, decoded: &DecodedKey) -> bool {
        match decoded {
            DecodedKey::Reference(key) => self.matcher.matches(&key.name),
            _ => false,
        }
    }
}
