//! Type declaration pattern

use crate::encoding::DecodedKey;
use crate::index::{Category, QueryKey};
use crate::query::matching::NameMatcher;
use crate::query::pattern::SearchPattern;
use crate::query::types::{MatchMode, MatchRule};
use crate::Result;

use super::name_lookup_key;

/// Matches type declarations by name and, optionally, exact namespace
#[derive(Clone, Debug)]
pub struct TypeDeclarationPattern {
    name: Option<String>,
    namespace: Option<String>,
    rule: MatchRule,
    name_matcher: NameMatcher,
    namespace_matcher: NameMatcher,
}

impl TypeDeclarationPattern {
    pub fn new(name: Option<&str>, namespace: Option<&str>, rule: MatchRule) -> Result<Self> {
        let namespace_rule = MatchRule::new(MatchMode::Exact, rule.case_sensitive);
        Ok(Self {
            name: name.map(str::to_string),
            namespace: namespace.map(str::to_string),
            rule,
            name_matcher: NameMatcher::new(name, rule)?,
            namespace_matcher: NameMatcher::new(namespace, namespace_rule)?,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn rule(&self) -> MatchRule {
        self.rule
    }
}

impl SearchPattern for TypeDeclarationPattern {
    fn pattern_kind(&self) -> &'static str {
        "type"
    }

    fn query_key(&self) -> QueryKey {
        match (&self.name, &self.namespace, self.rule.mode) {
            (Some(name), Some(namespace), MatchMode::Exact) if self.rule.case_sensitive => {
                QueryKey::new(
                    Category::TypeDecl,
                    Some(format!("{}/{}/", name, namespace).into_bytes()),
                    MatchRule::prefix(),
                )
            }
            _ => name_lookup_key(Category::TypeDecl, self.name.as_deref(), self.rule, true),
        }
    }

    fn blank_decoded(&self) -> DecodedKey {
        DecodedKey::blank(Category::TypeDecl)
    }

    fn matches_decoded_key(&self, decoded: &DecodedKey) -> bool {
        match decoded {
            DecodedKey::Type(key) => {
                self.name_matcher.matches(&key.name)
                    && self.namespace_matcher.matches(&key.namespace)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::type_decl_key;

    fn decoded(name: &str, namespace: &str) -> DecodedKey {
        let mut key = DecodedKey::blank(Category::TypeDecl);
        key.decode(Category::TypeDecl, &type_decl_key(name, namespace, 0))
            .unwrap();
        key
    }

    #[test]
    fn test_exact_with_namespace() {
        let pattern = TypeDeclarationPattern::new(Some("User"), Some("app"), MatchRule::exact()).unwrap();
        assert_eq!(pattern.query_key().key.as_deref(), Some(&b"User/app/"[..]));
        assert!(pattern.matches_decoded_key(&decoded("User", "app")));
        assert!(!pattern.matches_decoded_key(&decoded("User", "app/admin")));
        assert!(!pattern.matches_decoded_key(&decoded("Users", "app")));
    }

    #[test]
    fn test_prefix_any_namespace() {
        let pattern = TypeDeclarationPattern::new(Some("Us"), None, MatchRule::prefix().ignore_case()).unwrap();
        assert!(pattern.matches_decoded_key(&decoded("User", "app")));
        assert!(pattern.matches_decoded_key(&decoded("USAddress", "")));
        assert!(!pattern.matches_decoded_key(&decoded("Admin", "us")));
    }

    #[test]
    fn test_camel_case() {
        let pattern = TypeDeclarationPattern::new(Some("NPE"), None, MatchRule::camel_case()).unwrap();
        assert_eq!(pattern.query_key().key.as_deref(), Some(&b"N"[..]));
        assert!(pattern.matches_decoded_key(&decoded("NullPointerException", "java/lang")));
        assert!(!pattern.matches_decoded_key(&decoded("NumberFormatException", "java/lang")));
    }

    #[test]
    fn test_camel_case_ignoring_case() {
        let pattern =
            TypeDeclarationPattern::new(Some("nPE"), None, MatchRule::camel_case().ignore_case()).unwrap();
        let key = pattern.query_key();
        assert_eq!(key.key.as_deref(), Some(&b"n"[..]));
        assert!(!key.rule.case_sensitive);
        assert!(key.matcher().unwrap().matches_bytes(b"NullPointerException/java/lang/0"));
        assert!(pattern.matches_decoded_key(&decoded("NullPointerException", "java/lang")));

        let pattern =
            TypeDeclarationPattern::new(Some("nullp"), None, MatchRule::camel_case().ignore_case()).unwrap();
        assert!(pattern.matches_decoded_key(&decoded("NullPointerException", "java/lang")));
        assert!(!pattern.matches_decoded_key(&decoded("NumberFormatException", "java/lang")));
    }

    #[test]
    fn test_rejects_other_categories() {
        let pattern = TypeDeclarationPattern::new(None, None, MatchRule::exact()).unwrap();
        let mut key = DecodedKey::blank(Category::MethodDecl);
        key.decode(Category::MethodDecl, b"run/0").unwrap();
        assert!(!pattern.matches_decoded_key(&key));
        assert!(pattern.matches_decoded_key(&decoded("Any", "")));
    }
}
