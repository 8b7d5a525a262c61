use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use codeseek::index::{Category, MemoryIndex};
use codeseek::query::{
    AndPattern, CancellationFlag, CollectingRequestor, IndexQueryRequestor, MatchRule,
    MethodPattern, PathScope, PatternRef, ProgressMonitor, QueryContext, QueryStats,
    ReferencePattern, SearchParticipant, SearchScope, WorkspaceScope,
};
use codeseek::testing::{InstrumentedIndex, RecordingRequestor};
use codeseek::{IndexSettings, Result, SearchError};

/// Index where each reference name is registered by the given documents
fn reference_index(refs: &[(&str, &[&str])]) -> InstrumentedIndex<MemoryIndex> {
    let index = MemoryIndex::new(IndexSettings::new("/ws"));
    for (name, docs) in refs {
        for doc in docs.iter() {
            index.add_key(Category::Reference, name.as_bytes(), doc);
        }
    }
    InstrumentedIndex::new(index)
}

fn conjunction(names: &[&str]) -> AndPattern {
    let children: Vec<PatternRef> = names
        .iter()
        .map(|name| Arc::new(ReferencePattern::exact(name)) as PatternRef)
        .collect();
    AndPattern::try_from_patterns(children).unwrap()
}

fn search(
    pattern: &AndPattern,
    index: &InstrumentedIndex<MemoryIndex>,
    requestor: &mut dyn IndexQueryRequestor,
    scope: &dyn SearchScope,
    monitor: Option<&dyn ProgressMonitor>,
) -> Result<QueryStats> {
    let participant = SearchParticipant::new("test");
    let mut ctx = QueryContext::new(requestor, &participant, scope);
    if let Some(monitor) = monitor {
        ctx = ctx.with_monitor(monitor);
    }
    pattern.find_index_matches(index, &mut ctx)
}

/// Reports cancellation from the n-th poll on
struct CancelAfterPolls {
    polls: AtomicUsize,
    limit: usize,
}

impl CancelAfterPolls {
    fn new(limit: usize) -> Self {
        Self {
            polls: AtomicUsize::new(0),
            limit,
        }
    }
}

impl ProgressMonitor for CancelAfterPolls {
    fn is_canceled(&self) -> bool {
        self.polls.fetch_add(1, Ordering::SeqCst) >= self.limit
    }
}

#[test]
fn test_three_way_intersection() {
    let index = reference_index(&[
        ("p1", &["a", "b", "c"]),
        ("p2", &["b", "c", "d"]),
        ("p3", &["c", "e"]),
    ]);
    let mut requestor = RecordingRequestor::new();

    let stats = search(
        &conjunction(&["p1", "p2", "p3"]),
        &index,
        &mut requestor,
        &WorkspaceScope,
        None,
    )
    .unwrap();

    assert_eq!(requestor.document_names(), vec!["c"]);
    let hit = &requestor.matches()[0];
    assert_eq!(hit.document_path, "/ws/c");
    assert_eq!(hit.separator, '/');
    assert!(hit.decoded.is_none());

    assert_eq!(index.queries_issued(), 3);
    assert_eq!(stats.documents_reported, 1);
    assert!(!stats.short_circuited);
    assert!(index.sessions_balanced());
    assert_eq!(index.counts().start_query, 1);
}

#[test]
fn test_empty_second_pattern_stops_search() {
    let index = reference_index(&[("p1", &["a"]), ("p3", &["a"])]);
    let mut requestor = RecordingRequestor::new();

    let stats = search(
        &conjunction(&["p1", "p2", "p3"]),
        &index,
        &mut requestor,
        &WorkspaceScope,
        None,
    )
    .unwrap();

    // The lookup for p2 finds nothing, so p3 is never queried
    let keys: Vec<Option<Vec<u8>>> = index.queried_keys().into_iter().map(|k| k.key).collect();
    assert_eq!(keys, vec![Some(b"p1".to_vec()), Some(b"p2".to_vec())]);
    assert_eq!(requestor.call_count(), 0);
    assert!(stats.short_circuited);
    assert!(index.sessions_balanced());
}

#[test]
fn test_two_patterns_with_empty_second_set() {
    let index = reference_index(&[("p1", &["a"])]);
    let mut requestor = RecordingRequestor::new();

    search(&conjunction(&["p1", "p2"]), &index, &mut requestor, &WorkspaceScope, None).unwrap();

    assert_eq!(index.queries_issued(), 2);
    assert_eq!(requestor.call_count(), 0);
    assert!(index.sessions_balanced());
}

#[test]
fn test_disjoint_sets_stop_before_later_patterns() {
    let index = reference_index(&[("p1", &["a"]), ("p2", &["b"]), ("p3", &["a", "b"])]);
    let mut requestor = RecordingRequestor::new();

    let stats = search(
        &conjunction(&["p1", "p2", "p3"]),
        &index,
        &mut requestor,
        &WorkspaceScope,
        None,
    )
    .unwrap();

    assert_eq!(index.queries_issued(), 2);
    assert!(stats.short_circuited);
    assert_eq!(requestor.call_count(), 0);
    assert!(index.sessions_balanced());
}

#[test]
fn test_single_pattern_without_entries() {
    let index = reference_index(&[("other", &["a"])]);
    let mut requestor = RecordingRequestor::new();

    let result = search(&conjunction(&["p1"]), &index, &mut requestor, &WorkspaceScope, None);

    assert!(result.is_ok());
    assert_eq!(requestor.call_count(), 0);
    assert_eq!(index.queries_issued(), 1);
    assert!(index.sessions_balanced());
}

#[test]
fn test_fine_filter_excludes_coarse_matches() {
    let memory = MemoryIndex::new(IndexSettings::new("/ws"));
    memory.add_key(Category::MethodDecl, b"save/0", "a");
    memory.add_key(Category::MethodDecl, b"save/1", "b");
    memory.add_key(Category::MethodDecl, b"saveAll/1", "c");
    memory.add_key(Category::Reference, b"User", "a");
    memory.add_key(Category::Reference, b"User", "b");
    memory.add_key(Category::Reference, b"User", "c");
    let index = InstrumentedIndex::new(memory);

    // Prefix lookup returns all three method keys; only save/1 survives decoding
    let pattern = AndPattern::of(MethodPattern::new(Some("save"), Some(1), MatchRule::exact()).unwrap())
        .and(ReferencePattern::exact("User"));
    let mut requestor = RecordingRequestor::new();
    search(&pattern, &index, &mut requestor, &WorkspaceScope, None).unwrap();
    assert_eq!(requestor.document_names(), vec!["b"]);

    let loose = AndPattern::of(MethodPattern::new(Some("save"), Some(1), MatchRule::prefix()).unwrap())
        .and(ReferencePattern::exact("User"));
    let mut requestor = RecordingRequestor::new();
    let stats = search(&loose, &index, &mut requestor, &WorkspaceScope, None).unwrap();
    assert_eq!(requestor.document_names(), vec!["b", "c"]);
    assert_eq!(stats.entries_rejected, 1);
}

#[test]
fn test_all_entries_rejected_short_circuits() {
    let memory = MemoryIndex::new(IndexSettings::new("/ws"));
    memory.add_key(Category::MethodDecl, b"save/0", "a");
    memory.add_key(Category::Reference, b"User", "a");
    let index = InstrumentedIndex::new(memory);

    let pattern = AndPattern::of(MethodPattern::new(Some("save"), Some(3), MatchRule::prefix()).unwrap())
        .and(ReferencePattern::exact("User"));
    let mut requestor = RecordingRequestor::new();
    let stats = search(&pattern, &index, &mut requestor, &WorkspaceScope, None).unwrap();

    assert!(stats.short_circuited);
    assert_eq!(stats.entries_rejected, 1);
    assert_eq!(index.queries_issued(), 1);
    assert_eq!(requestor.call_count(), 0);
}

#[test]
fn test_cancelled_before_start() {
    let index = reference_index(&[("p1", &["a"]), ("p2", &["a"])]);
    let flag = CancellationFlag::new();
    flag.cancel();
    let mut requestor = RecordingRequestor::new();

    let err = search(
        &conjunction(&["p1", "p2"]),
        &index,
        &mut requestor,
        &WorkspaceScope,
        Some(&flag),
    )
    .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(index.queries_issued(), 0);
    assert_eq!(index.counts().start_query, 0);
    assert_eq!(requestor.call_count(), 0);
}

#[test]
fn test_cancelled_mid_search_releases_session() {
    let index = reference_index(&[("p1", &["a", "b"]), ("p2", &["a", "b"])]);
    let mut requestor = RecordingRequestor::new();
    // Polls: before start, first child, its one entry, then the second child
    let monitor = CancelAfterPolls::new(3);

    let err = search(
        &conjunction(&["p1", "p2"]),
        &index,
        &mut requestor,
        &WorkspaceScope,
        Some(&monitor),
    )
    .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(index.queries_issued(), 1);
    assert_eq!(requestor.call_count(), 0);
    assert!(index.sessions_balanced());
    assert_eq!(index.inner().open_sessions(), 0);
}

#[test]
fn test_storage_error_aborts_and_releases_session() {
    let index = reference_index(&[("p1", &["a"]), ("p2", &["a"])]);
    index.fail_queries_after(1);
    let mut requestor = RecordingRequestor::new();

    let err = search(&conjunction(&["p1", "p2"]), &index, &mut requestor, &WorkspaceScope, None)
        .unwrap_err();

    assert!(matches!(err, SearchError::Storage(_)));
    assert_eq!(requestor.call_count(), 0);
    assert!(index.sessions_balanced());
}

#[test]
fn test_requestor_error_propagates() {
    let index = reference_index(&[("p1", &["a", "b", "c"]), ("p2", &["a", "b", "c"])]);
    let mut requestor = RecordingRequestor::failing_after(1);

    let err = search(&conjunction(&["p1", "p2"]), &index, &mut requestor, &WorkspaceScope, None)
        .unwrap_err();

    assert!(matches!(err, SearchError::Requestor(_)));
    // What was reported before the failure stays reported
    assert_eq!(requestor.document_names(), vec!["a"]);
    assert!(index.sessions_balanced());
}

#[test]
fn test_requestor_can_stop_the_search() {
    let index = reference_index(&[("p1", &["a", "b"]), ("p2", &["a", "b"])]);
    let mut requestor = RecordingRequestor::declining_after(1);

    let err = search(&conjunction(&["p1", "p2"]), &index, &mut requestor, &WorkspaceScope, None)
        .unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(requestor.call_count(), 1);
}

#[test]
fn test_scope_filters_reported_documents() {
    let index = reference_index(&[
        ("p1", &["app/a.rb", "lib/b.rb"]),
        ("p2", &["app/a.rb", "lib/b.rb"]),
    ]);
    let scope = PathScope::new(vec!["/ws/lib".to_string()], '/');
    let mut requestor = RecordingRequestor::new();

    let stats = search(&conjunction(&["p1", "p2"]), &index, &mut requestor, &scope, None).unwrap();

    assert_eq!(requestor.document_names(), vec!["lib/b.rb"]);
    assert_eq!(stats.documents_reported, 1);
}

#[test]
fn test_zero_children_is_rejected() {
    let err = AndPattern::try_from_patterns(Vec::new()).unwrap_err();
    assert!(matches!(err, SearchError::InvalidPattern(_)));
}

#[test]
fn test_pattern_can_be_rerun() {
    let index = reference_index(&[("p1", &["a", "b"]), ("p2", &["b"])]);
    let pattern = conjunction(&["p1", "p2"]);

    for _ in 0..2 {
        let mut requestor = RecordingRequestor::new();
        search(&pattern, &index, &mut requestor, &WorkspaceScope, None).unwrap();
        assert_eq!(requestor.document_names(), vec!["b"]);
    }
    assert_eq!(index.queries_issued(), 4);
    assert!(index.sessions_balanced());
}

#[test]
fn test_concurrent_searches_share_one_index() {
    let memory = MemoryIndex::new(IndexSettings::new("/ws"));
    for doc in 0..50 {
        let name = format!("doc{:02}", doc);
        memory.add_key(Category::Reference, b"p1", &name);
        if doc % 2 == 0 {
            memory.add_key(Category::Reference, b"p2", &name);
        }
        if doc % 5 == 0 {
            memory.add_key(Category::Reference, b"p3", &name);
        }
    }
    let pattern = conjunction(&["p1", "p2", "p3"]);
    let participant = SearchParticipant::new("test");

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let mut requestor = CollectingRequestor::new();
                let mut ctx = QueryContext::new(&mut requestor, &participant, &WorkspaceScope);
                pattern.find_index_matches(&memory, &mut ctx).unwrap();
                drop(ctx);
                assert_eq!(requestor.paths().len(), 5);
                assert!(requestor.paths().contains("/ws/doc10"));
            });
        }
    });

    assert_eq!(memory.open_sessions(), 0);
}
