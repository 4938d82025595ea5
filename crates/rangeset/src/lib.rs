//! Rangesets: labelled sets of disjoint text ranges that stay attached to
//! the text they mark while the buffer is edited.
//!
//! A [`RangesetTable`] holds up to 63 [`Rangeset`]s for one
//! [`TextBuffer`](weft_buffer::TextBuffer). Once attached it adjusts every
//! active set after each edit, before any ordinary observer runs, following
//! the set's [`UpdatePolicy`].

/// Rangeset error types.
pub mod error;
/// Flattened interval tables and their searches.
pub mod interval;
/// Labels naming rangeset slots.
pub mod label;
/// Edit maintenance policies.
pub mod policy;
/// A single rangeset.
pub mod rangeset;
/// The per-buffer table of rangesets.
pub mod table;

pub use error::{RangesetError, Result};
pub use interval::IntervalTable;
pub use label::{LABELS, Label, RANGESET_SLOTS, label_ok};
pub use policy::UpdatePolicy;
pub use rangeset::{ColorState, Rangeset, RangesetInfo};
pub use table::RangesetTable;
