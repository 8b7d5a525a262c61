//! Concrete search patterns and combinators
//!
//! Leaf patterns, one per key category, plus `AndPattern` (conjunction by
//! document intersection) and `OrPattern` (union).

mod and_pattern;
mod field_pattern;
mod method_pattern;
mod or_pattern;
mod reference_pattern;
mod type_pattern;

pub use and_pattern::AndPattern;
pub use field_pattern::FieldPattern;
pub use method_pattern::MethodPattern;
pub use or_pattern::OrPattern;
pub use reference_pattern::ReferencePattern;
pub use type_pattern::TypeDeclarationPattern;

use crate::index::{Category, QueryKey};
use crate::query::types::{MatchMode, MatchRule};

/// Coarse lookup key for a name-led encoded key
///
/// `has_trailing_fields` is true when the key layout continues after the
/// name (`name/...`), which turns an exact name into a key prefix.
pub(crate) fn name_lookup_key(
    category: Category,
    name: Option<&str>,
    rule: MatchRule,
    has_trailing_fields: bool,
) -> QueryKey {
    let Some(name) = name else {
        return QueryKey::all(category);
    };

    match rule.mode {
        MatchMode::Exact if has_trailing_fields => QueryKey::new(
            category,
            Some(format!("{}/", name).into_bytes()),
            rule.with_mode(MatchMode::Prefix),
        ),
        MatchMode::Exact | MatchMode::Prefix => {
            QueryKey::new(category, Some(name.as_bytes().to_vec()), rule)
        }
        MatchMode::Pattern if has_trailing_fields => QueryKey::new(
            category,
            Some(format!("{}/*", name).into_bytes()),
            rule,
        ),
        MatchMode::Pattern => QueryKey::new(category, Some(name.as_bytes().to_vec()), rule),
        // Only the first character of a camel-case pattern is literal
        MatchMode::CamelCase => match name.chars().next() {
            Some(first) => QueryKey::new(
                category,
                Some(first.to_string().into_bytes()),
                rule.with_mode(MatchMode::Prefix),
            ),
            None => QueryKey::all(category),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_lookup_keys() {
        let key = name_lookup_key(Category::MethodDecl, Some("run"), MatchRule::exact(), true);
        assert_eq!(key.key.as_deref(), Some(&b"run/"[..]));
        assert_eq!(key.rule.mode, MatchMode::Prefix);

        let key = name_lookup_key(Category::FieldDecl, Some("count"), MatchRule::exact().ignore_case(), false);
        assert_eq!(key.key.as_deref(), Some(&b"count"[..]));
        assert_eq!(key.rule, MatchRule::exact().ignore_case());

        let key = name_lookup_key(Category::TypeDecl, Some("Foo*"), MatchRule::pattern(), true);
        assert_eq!(key.key.as_deref(), Some(&b"Foo*/*"[..]));

        let key = name_lookup_key(Category::TypeDecl, Some("NPE"), MatchRule::camel_case(), true);
        assert_eq!(key.key.as_deref(), Some(&b"N"[..]));
        assert_eq!(key.rule, MatchRule::prefix());

        let key = name_lookup_key(Category::TypeDecl, Some("npe"), MatchRule::camel_case().ignore_case(), true);
        assert_eq!(key.key.as_deref(), Some(&b"n"[..]));
        assert_eq!(key.rule, MatchRule::prefix().ignore_case());

        assert_eq!(
            name_lookup_key(Category::Reference, None, MatchRule::prefix(), false),
            QueryKey::all(Category::Reference)
        );
    }
}
