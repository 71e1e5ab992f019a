//! Cutline Core Library
//!
//! This library provides rational time, the item variants of an edited
//! timeline and the range resolution of a [`Sequence`]: where each child sits,
//! what survives the sequence's own trim, how long the sequence is and which
//! items border a given one.

pub mod item;
pub mod sequence;
pub mod time;

pub use item::{Clip, Gap, Item, ItemKind, Transition, TransitionType};
pub use sequence::{NeighborGapPolicy, Sequence, SequenceKind};
pub use time::{RationalTime, TimeRange};

/// Result type for cutline-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cutline-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Item {item:?} is not in sequence {sequence:?}")]
    ItemNotFound { item: String, sequence: String },

    #[error("Child index {index} out of range for sequence of {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No available range set on {name:?}")]
    MissingAvailableRange { name: String },

    #[error("Invalid rate {rate}, rates must be positive")]
    InvalidRate { rate: i64 },

    #[error("Time arithmetic overflowed combining {lhs} and {rhs}")]
    TimeOverflow { lhs: RationalTime, rhs: RationalTime },
}
