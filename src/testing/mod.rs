//! Test doubles for verifying search behaviour
//!
//! This module provides:
//! - `InstrumentedIndex`: wraps any index, counts session and query calls,
//!   records the keys queried, and can inject storage failures
//! - `RecordingRequestor`: records every match and can fail or decline
//!   after a number of matches
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use codeseek::testing::prelude::*;
//!
//! let index = InstrumentedIndex::new(memory_index);
//! let mut requestor = RecordingRequestor::new();
//! // ... run a search ...
//! assert_eq!(index.queries_issued(), 2);
//! assert!(index.sessions_balanced());
//! ```

pub mod instrumented;
pub mod recording;

pub use instrumented::{IndexCallCounts, InstrumentedIndex};
pub use recording::{RecordedMatch, RecordingRequestor};

/// Prelude for easy imports
pub mod prelude {
    pub use super::instrumented::{IndexCallCounts, InstrumentedIndex};
    pub use super::recording::{RecordedMatch, RecordingRequestor};
}
