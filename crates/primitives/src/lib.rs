//! Core types for the weft text store: ranges, selections and display columns.

/// Display-column metrics: tab expansion, control-code escapes, padding.
pub mod columns;
/// Half-open position ranges.
pub mod range;
/// Primary, secondary and highlight selections and their edit maintenance.
pub mod selection;

pub use columns::{
	CONTROL_CODE_NAMES, ColumnMetrics, ExpandedChar, MAX_EXPANDED_CHAR_LEN, char_width,
	expand_char,
};
pub use range::{Pos, TextRange};
pub use selection::{RedrawRanges, Selection, SelectionKind, SelectionSet, SelectionSpan};
