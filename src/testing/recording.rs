//! Requestor that records every match it receives

use crate::encoding::DecodedKey;
use crate::error::SearchError;
use crate::query::{IndexMatch, IndexQueryRequestor};
use crate::Result;

/// Owned copy of one reported match
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedMatch {
    pub document_name: String,
    pub document_path: String,
    pub container_path: String,
    pub separator: char,
    pub decoded: Option<DecodedKey>,
    pub participant: String,
}

#[derive(Debug, Default)]
pub struct RecordingRequestor {
    matches: Vec<RecordedMatch>,
    fail_after: Option<usize>,
    decline_after: Option<usize>,
}

impl RecordingRequestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `n` matches, then fail with a requestor error
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    /// Accept `n` matches, then ask the search to stop
    pub fn declining_after(n: usize) -> Self {
        Self {
            decline_after: Some(n),
            ..Self::default()
        }
    }

    pub fn matches(&self) -> &[RecordedMatch] {
        &self.matches
    }

    pub fn call_count(&self) -> usize {
        self.matches.len()
    }

    /// Reported document names, in report order
    pub fn document_names(&self) -> Vec<&str> {
        self.matches
            .iter()
            .map(|m| m.document_name.as_str())
            .collect()
    }
}

impl IndexQueryRequestor for RecordingRequestor {
    fn accept_index_match(&mut self, hit: &IndexMatch<'_>) -> Result<bool> {
        if self.fail_after == Some(self.matches.len()) {
            return Err(SearchError::Requestor(format!(
                "rejected {}",
                hit.document_name
            )));
        }
        self.matches.push(RecordedMatch {
            document_name: hit.document_name.to_string(),
            document_path: hit.document_path(),
            container_path: hit.container_path.to_string(),
            separator: hit.separator,
            decoded: hit.decoded.cloned(),
            participant: hit.participant.name.clone(),
        });
        Ok(self.decline_after != Some(self.matches.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SearchParticipant;

    fn hit<'a>(name: &'a str, participant: &'a SearchParticipant) -> IndexMatch<'a> {
        IndexMatch {
            document_name: name,
            container_path: "/ws",
            separator: '/',
            decoded: None,
            participant,
        }
    }

    #[test]
    fn test_records_matches() {
        let participant = SearchParticipant::new("ruby");
        let mut requestor = RecordingRequestor::new();
        assert!(requestor.accept_index_match(&hit("a.rb", &participant)).unwrap());
        assert_eq!(requestor.call_count(), 1);
        assert_eq!(requestor.matches()[0].document_path, "/ws/a.rb");
        assert_eq!(requestor.matches()[0].participant, "ruby");
    }

    #[test]
    fn test_fail_and_decline() {
        let participant = SearchParticipant::new("ruby");

        let mut failing = RecordingRequestor::failing_after(1);
        assert!(failing.accept_index_match(&hit("a.rb", &participant)).is_ok());
        assert!(matches!(
            failing.accept_index_match(&hit("b.rb", &participant)),
            Err(SearchError::Requestor(_))
        ));
        assert_eq!(failing.document_names(), vec!["a.rb"]);

        let mut declining = RecordingRequestor::declining_after(1);
        assert!(!declining.accept_index_match(&hit("a.rb", &participant)).unwrap());
        assert_eq!(declining.call_count(), 1);
    }
}
