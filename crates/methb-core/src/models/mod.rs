//! Domain models for the case-report pipeline.

mod case;
mod document;
mod vocabulary;

pub use case::*;
pub use document::*;
pub use vocabulary::*;
