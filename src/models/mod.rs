pub mod declaration;
pub mod manifest;

pub use declaration::{Declaration, SourceDocument};
pub use manifest::IndexManifest;
