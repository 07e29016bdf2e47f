//! Scoring for ring targets.
//!
//! - [`DistanceScorer`] measures how far a region's center lies from the
//!   image center and looks the distance up in a [`RingTable`].
//! - [`ScoreSession`] accumulates shot scores for one shooter and
//!   classifies the total with a [`ClassificationTable`].
//!
//! No ring or classification values are built in; both tables come from
//! the caller's configuration.

mod classify;
mod ring;
mod session;

pub use classify::{classify, ClassEntry, Classification, ClassificationTable};
pub use ring::{
    image_center, region_distance, DistanceScorer, RingEntry, RingScore, RingTable,
};
pub use session::{ScoreSession, SessionIoError, SessionRecord};

/// Validation errors for ring and classification tables.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("table has no entries")]
    Empty,
    #[error("entry {index} is not strictly above the previous one")]
    NotAscending { index: usize },
    #[error("entry {index} has a negative or non-finite distance")]
    InvalidDistance { index: usize },
}
