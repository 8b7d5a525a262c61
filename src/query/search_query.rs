//! Top-level query tree

use std::sync::Arc;

use crate::index::Index;
use crate::query::context::QueryContext;
use crate::query::nodes::{
    AndPattern, FieldPattern, MethodPattern, OrPattern, ReferencePattern, TypeDeclarationPattern,
};
use crate::query::pattern::{find_pattern_matches, PatternRef};
use crate::query::types::QueryStats;
use crate::Result;

/// A leaf pattern or a boolean combination of queries
#[derive(Clone, Debug)]
pub enum SearchQuery {
    Pattern(PatternRef),
    And(AndPattern),
    Or(OrPattern),
}

impl SearchQuery {
    /// Run the query against one index, reporting through `ctx`
    pub fn find_index_matches(
        &self,
        index: &dyn Index,
        ctx: &mut QueryContext<'_>,
    ) -> Result<QueryStats> {
        match self {
            SearchQuery::Pattern(pattern) => find_pattern_matches(pattern.as_ref(), index, ctx),
            SearchQuery::And(and) => and.find_index_matches(index, ctx),
            SearchQuery::Or(or) => or.find_index_matches(index, ctx),
        }
    }

    /// Label used for logging and metrics
    pub fn query_type(&self) -> &'static str {
        match self {
            SearchQuery::Pattern(pattern) => pattern.pattern_kind(),
            SearchQuery::And(_) => "and",
            SearchQuery::Or(_) => "or",
        }
    }
}

impl From<PatternRef> for SearchQuery {
    fn from(pattern: PatternRef) -> Self {
        SearchQuery::Pattern(pattern)
    }
}

impl From<AndPattern> for SearchQuery {
    fn from(and: AndPattern) -> Self {
        SearchQuery::And(and)
    }
}

impl From<OrPattern> for SearchQuery {
    fn from(or: OrPattern) -> Self {
        SearchQuery::Or(or)
    }
}

macro_rules! leaf_into_query {
    ($($pattern:ty),*) => {
        $(
            impl From<$pattern> for SearchQuery {
                fn from(pattern: $pattern) -> Self {
                    SearchQuery::Pattern(Arc::new(pattern))
                }
            }
        )*
    };
}

leaf_into_query!(TypeDeclarationPattern, MethodPattern, FieldPattern, ReferencePattern);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexSettings;
    use crate::encoding::DecodedKey;
    use crate::index::MemoryIndex;
    use crate::models::{Declaration, SourceDocument};
    use crate::query::requestor::{IndexMatch, SearchParticipant};
    use crate::query::scope::WorkspaceScope;
    use crate::query::types::MatchRule;

    #[test]
    fn test_leaf_query_reports_decoded_key() {
        let index = MemoryIndex::new(IndexSettings::new("/ws"));
        index.index_document(&SourceDocument::new(
            "a.rb",
            vec![Declaration::method("run", 1), Declaration::method("run", 2)],
        ));
        index.index_document(&SourceDocument::new("b.rb", vec![Declaration::method("run", 1)]));

        let query: SearchQuery = MethodPattern::new(Some("run"), Some(1), MatchRule::exact())
            .unwrap()
            .into();
        assert_eq!(query.query_type(), "method");

        let participant = SearchParticipant::new("test");
        let mut seen: Vec<(String, Option<DecodedKey>)> = Vec::new();
        let mut requestor = |hit: &IndexMatch<'_>| -> Result<bool> {
            seen.push((hit.document_path(), hit.decoded.cloned()));
            Ok(true)
        };
        let stats = {
            let mut ctx = QueryContext::new(&mut requestor, &participant, &WorkspaceScope);
            query.find_index_matches(&index, &mut ctx).unwrap()
        };

        assert_eq!(stats.index_queries, 1);
        assert_eq!(stats.documents_reported, 2);
        let paths: Vec<&str> = seen.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["/ws/a.rb", "/ws/b.rb"]);
        assert!(seen
            .iter()
            .all(|(_, decoded)| decoded.as_ref().and_then(DecodedKey::name) == Some("run")));
    }

    #[test]
    fn test_query_types() {
        let and: SearchQuery = AndPattern::of(ReferencePattern::exact("x")).into();
        assert_eq!(and.query_type(), "and");
        let or: SearchQuery = OrPattern::default().into();
        assert_eq!(or.query_type(), "or");
    }
}
