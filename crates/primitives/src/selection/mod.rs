//! Selections tracked by a text buffer.
//!
//! Every buffer owns three independent [`Selection`]s: the primary selection
//! (what the user is editing), the secondary selection (drag-copy source)
//! and the highlight (search match, bracket flash). Each is either linear,
//! spanning `[start, end)`, or rectangular, spanning the lines from `start`
//! to `end` between display columns `rect_start` and `rect_end`.
//!
//! # Zero-width selections
//!
//! A selection can be *unselected* yet still track an anchor point; this is
//! the `zero_width` state produced by selecting an empty range. Edits keep
//! the anchor in place the same way they keep a real selection in place, and
//! [`Selection::anchor_span`] reports it where [`Selection::span`] does not.
//!
//! # Edit maintenance
//!
//! [`Selection::maintain`] is called with `(pos, deleted, inserted)` after
//! every buffer mutation. The case split is ordered; each branch assumes the
//! earlier ones did not match:
//!
//! 1. inactive, or the edit starts past `end`: untouched
//! 2. edit entirely before `start`: both ends shift by the net change
//! 3. edit covers the whole selection: collapses to an inactive point at `pos`
//! 4. edit covers `start` only: `start` moves to `pos`, `end` shifts
//! 5. edit starts inside: `end` shifts, deselecting if it reaches `start`

use std::cmp::{max, min};

use smallvec::SmallVec;

use crate::range::{Pos, TextRange};


/// Ranges that must be redrawn after a selection changes.
///
/// Never more than two entries.
pub type RedrawRanges = SmallVec<[TextRange; 2]>;

/// Which of a buffer's three selections an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionKind {
	/// The user's editing selection.
	Primary,
	/// The drag-copy source selection.
	Secondary,
	/// Transient emphasis such as a search match.
	Highlight,
}

impl SelectionKind {
	/// All kinds, in maintenance order.
	pub const ALL: [SelectionKind; 3] = [
		SelectionKind::Primary,
		SelectionKind::Secondary,
		SelectionKind::Highlight,
	];
}

/// Extent of a selection as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSpan {
	/// First buffer position (for rectangular selections, a position on the
	/// first line).
	pub start: Pos,
	/// Last buffer position (for rectangular selections, a position on the
	/// last line).
	pub end: Pos,
	/// Display columns `(rect_start, rect_end)` for rectangular selections.
	pub rect: Option<(usize, usize)>,
}

/// One selection: linear or rectangular, possibly an inactive anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
	selected: bool,
	zero_width: bool,
	rectangular: bool,
	start: Pos,
	end: Pos,
	rect_start: usize,
	rect_end: usize,
}

impl Selection {
	/// A linear selection of `[min(a, b), max(a, b))`.
	pub fn linear(a: Pos, b: Pos) -> Self {
		let mut sel = Self::default();
		sel.set(a, b);
		sel
	}

	/// A rectangular selection.
	pub fn rectangle(start: Pos, end: Pos, rect_start: usize, rect_end: usize) -> Self {
		let mut sel = Self::default();
		sel.set_rect(start, end, rect_start, rect_end);
		sel
	}

	/// Replaces this selection with the linear span between `a` and `b`.
	///
	/// An empty span leaves the selection inactive but zero-width.
	pub fn set(&mut self, a: Pos, b: Pos) {
		self.selected = a != b;
		self.zero_width = a == b;
		self.rectangular = false;
		self.start = min(a, b);
		self.end = max(a, b);
	}

	/// Replaces this selection with a rectangle.
	///
	/// The rectangle is active only if `rect_start < rect_end`.
	pub fn set_rect(&mut self, start: Pos, end: Pos, rect_start: usize, rect_end: usize) {
		self.selected = rect_start < rect_end;
		self.zero_width = rect_start == rect_end;
		self.rectangular = true;
		self.start = start;
		self.end = end;
		self.rect_start = rect_start;
		self.rect_end = rect_end;
	}

	/// Drops the selection and its anchor.
	pub fn clear(&mut self) {
		self.selected = false;
		self.zero_width = false;
	}

	/// Marks the selection inactive without touching its anchor state.
	pub fn deselect(&mut self) {
		self.selected = false;
	}

	/// True if something is selected.
	#[inline]
	pub fn is_selected(&self) -> bool {
		self.selected
	}

	/// True if the selection is an inactive anchor point.
	#[inline]
	pub fn is_zero_width(&self) -> bool {
		self.zero_width
	}

	/// True for rectangular selections.
	#[inline]
	pub fn is_rectangular(&self) -> bool {
		self.rectangular
	}

	/// Start position, meaningful when selected or zero-width.
	#[inline]
	pub fn start(&self) -> Pos {
		self.start
	}

	/// End position, meaningful when selected or zero-width.
	#[inline]
	pub fn end(&self) -> Pos {
		self.end
	}

	fn raw_span(&self) -> SelectionSpan {
		SelectionSpan {
			start: self.start,
			end: self.end,
			rect: self.rectangular.then_some((self.rect_start, self.rect_end)),
		}
	}

	/// Extent of the selection, or `None` when nothing is selected.
	pub fn span(&self) -> Option<SelectionSpan> {
		self.selected.then(|| self.raw_span())
	}

	/// Like [`Self::span`], but also reports zero-width anchors.
	pub fn anchor_span(&self) -> Option<SelectionSpan> {
		(self.selected || self.zero_width).then(|| self.raw_span())
	}

	/// Adjusts the selection for `deleted` bytes removed and `inserted` bytes
	/// added at `pos`.
	pub fn maintain(&mut self, pos: Pos, deleted: usize, inserted: usize) {
		if (!self.selected && !self.zero_width) || pos > self.end {
			return;
		}

		if pos + deleted <= self.start {
			self.start = self.start - deleted + inserted;
			self.end = self.end - deleted + inserted;
		} else if pos <= self.start && pos + deleted >= self.end {
			self.start = pos;
			self.end = pos;
			self.selected = false;
			self.zero_width = false;
		} else if pos <= self.start {
			self.start = pos;
			self.end = self.end + inserted - deleted;
		} else if pos < self.end {
			self.end = (self.end + inserted).saturating_sub(deleted);
			if self.end <= self.start {
				self.selected = false;
			}
		}
	}

	/// True if the byte at `pos`, drawn at display column `column` on the
	/// line starting at `line_start`, is selected.
	pub fn contains(&self, pos: Pos, line_start: Pos, column: usize) -> bool {
		if !self.selected {
			return false;
		}
		if self.rectangular {
			pos >= self.start
				&& line_start <= self.end
				&& column >= self.rect_start
				&& column < self.rect_end
		} else {
			pos >= self.start && pos < self.end
		}
	}

	/// True if this is an active rectangle whose lines touch
	/// `[range_start, range_end]`.
	pub fn touches_rect(&self, range_start: Pos, range_end: Pos) -> bool {
		self.selected && self.rectangular && self.end >= range_start && self.start <= range_end
	}

	/// Computes the minimal set of ranges to redraw when a selection changes
	/// from `old` to `new`.
	///
	/// Rectangular selections are widened by one position so the renderer
	/// also clears the area past the ends of short lines.
	pub fn redraw_delta(old: &Selection, new: &Selection) -> RedrawRanges {
		let mut out = RedrawRanges::new();
		let old_end = old.end + usize::from(old.rectangular);
		let new_end = new.end + usize::from(new.rectangular);

		match (old.selected, new.selected) {
			(false, false) => return out,
			(false, true) => {
				out.push(TextRange::new(new.start, new_end));
				return out;
			}
			(true, false) => {
				out.push(TextRange::new(old.start, old_end));
				return out;
			}
			(true, true) => {}
		}

		let shape_changed = old.rectangular != new.rectangular
			|| (old.rectangular
				&& (old.rect_start != new.rect_start || old.rect_end != new.rect_end));
		if shape_changed {
			out.push(TextRange {
				start: min(old.start, new.start),
				end: max(old_end, new_end),
			});
			return out;
		}

		if old_end < new.start || new_end < old.start {
			out.push(TextRange::new(old.start, old_end));
			out.push(TextRange::new(new.start, new_end));
			return out;
		}

		let head = TextRange::new(old.start, new.start);
		let tail = TextRange::new(old_end, new_end);
		if !head.is_empty() {
			out.push(head);
		}
		if !tail.is_empty() {
			out.push(tail);
		}
		out
	}
}

/// The three selections of a buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
	primary: Selection,
	secondary: Selection,
	highlight: Selection,
}

impl SelectionSet {
	/// Creates a set with nothing selected.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the selection of the given kind.
	pub fn get(&self, kind: SelectionKind) -> &Selection {
		match kind {
			SelectionKind::Primary => &self.primary,
			SelectionKind::Secondary => &self.secondary,
			SelectionKind::Highlight => &self.highlight,
		}
	}

	/// Returns the selection of the given kind mutably.
	pub fn get_mut(&mut self, kind: SelectionKind) -> &mut Selection {
		match kind {
			SelectionKind::Primary => &mut self.primary,
			SelectionKind::Secondary => &mut self.secondary,
			SelectionKind::Highlight => &mut self.highlight,
		}
	}

	/// Maintains all three selections for one edit.
	pub fn maintain(&mut self, pos: Pos, deleted: usize, inserted: usize) {
		self.primary.maintain(pos, deleted, inserted);
		self.secondary.maintain(pos, deleted, inserted);
		self.highlight.maintain(pos, deleted, inserted);
	}
}
