//! Selection operations on a [`TextBuffer`].
//!
//! Changing a selection notifies modify observers with restyle-only events
//! covering just the ranges whose selected state changed.

use weft_primitives::{Pos, Selection, SelectionKind, SelectionSpan};

use super::TextBuffer;
use crate::error::Result;

impl TextBuffer {
	/// The selection of the given kind.
	pub fn selection(&self, kind: SelectionKind) -> &Selection {
		self.selections.get(kind)
	}

	/// Selects `[start, end)` as the selection of the given kind.
	pub fn set_selection(&mut self, kind: SelectionKind, start: Pos, end: Pos) {
		self.update_selection(kind, |sel| sel.set(start, end));
	}

	/// Selects the rectangle of display columns `[rect_start, rect_end)` on the
	/// lines from `start` to `end`.
	pub fn set_rect_selection(
		&mut self,
		kind: SelectionKind,
		start: Pos,
		end: Pos,
		rect_start: usize,
		rect_end: usize,
	) {
		self.update_selection(kind, |sel| sel.set_rect(start, end, rect_start, rect_end));
	}

	/// Drops the selection of the given kind.
	pub fn clear_selection(&mut self, kind: SelectionKind) {
		self.update_selection(kind, Selection::clear);
	}

	/// Selects `[start, end)` as the primary selection.
	pub fn select(&mut self, start: Pos, end: Pos) {
		self.set_selection(SelectionKind::Primary, start, end);
	}

	/// Makes the primary selection rectangular.
	pub fn rect_select(&mut self, start: Pos, end: Pos, rect_start: usize, rect_end: usize) {
		self.set_rect_selection(SelectionKind::Primary, start, end, rect_start, rect_end);
	}

	/// Drops the primary selection.
	pub fn unselect(&mut self) {
		self.clear_selection(SelectionKind::Primary);
	}

	/// Selects `[start, end)` as the secondary selection.
	pub fn secondary_select(&mut self, start: Pos, end: Pos) {
		self.set_selection(SelectionKind::Secondary, start, end);
	}

	/// Drops the secondary selection.
	pub fn secondary_unselect(&mut self) {
		self.clear_selection(SelectionKind::Secondary);
	}

	/// Highlights `[start, end)`.
	pub fn highlight(&mut self, start: Pos, end: Pos) {
		self.set_selection(SelectionKind::Highlight, start, end);
	}

	/// Drops the highlight.
	pub fn unhighlight(&mut self) {
		self.clear_selection(SelectionKind::Highlight);
	}

	/// Extent of the selection, or `None` when nothing is selected.
	pub fn selection_span(&self, kind: SelectionKind) -> Option<SelectionSpan> {
		self.selections.get(kind).span()
	}

	/// Like [`Self::selection_span`], but also reports the anchor of an empty
	/// selection.
	pub fn empty_selection_span(&self, kind: SelectionKind) -> Option<SelectionSpan> {
		self.selections.get(kind).anchor_span()
	}

	/// The primary selection as a linear span.
	///
	/// A rectangular selection is reduced to the byte positions of its columns
	/// on its first line.
	pub fn simple_selection(&self) -> Option<(Pos, Pos)> {
		let span = self.selection_span(SelectionKind::Primary)?;
		match span.rect {
			Some((rect_start, rect_end)) => {
				let line_start = self.line_start(span.start);
				Some((
					self.position_at_column(line_start, rect_start),
					self.position_at_column(line_start, rect_end),
				))
			}
			None => Some((span.start, span.end)),
		}
	}

	/// Copies out the selected text, or nothing when unselected.
	///
	/// Rectangular selections are realigned to column zero.
	pub fn selection_text(&self, kind: SelectionKind) -> Vec<u8> {
		match self.selection_span(kind) {
			Some(SelectionSpan {
				start,
				end,
				rect: Some((rect_start, rect_end)),
			}) => self.text_in_rect(start, end, rect_start, rect_end),
			Some(SelectionSpan { start, end, .. }) => self.range(start, end),
			None => Vec::new(),
		}
	}

	/// Deletes the selected text.
	pub fn remove_selected(&mut self, kind: SelectionKind) -> Result<()> {
		match self.selection_span(kind) {
			Some(SelectionSpan {
				start,
				end,
				rect: Some((rect_start, rect_end)),
			}) => {
				self.remove_rect(start, end, rect_start, rect_end)?;
			}
			Some(SelectionSpan { start, end, .. }) => self.remove(start, end),
			None => {}
		}
		Ok(())
	}

	/// Replaces the selected text with `text` and then deselects.
	///
	/// Does nothing when the selection is inactive.
	pub fn replace_selected(&mut self, kind: SelectionKind, text: &[u8]) -> Result<()> {
		let old = *self.selections.get(kind);
		let Some(span) = old.span() else {
			return Ok(());
		};
		match span.rect {
			Some((rect_start, rect_end)) => {
				self.replace_rect(span.start, span.end, rect_start, rect_end, text)?;
			}
			None => {
				self.replace(span.start, span.end, text)?;
			}
		}
		self.selections.get_mut(kind).deselect();
		let new = *self.selections.get(kind);
		self.redisplay_selection(&old, &new);
		Ok(())
	}

	fn update_selection(&mut self, kind: SelectionKind, change: impl FnOnce(&mut Selection)) {
		let old = *self.selections.get(kind);
		change(self.selections.get_mut(kind));
		let new = *self.selections.get(kind);
		self.redisplay_selection(&old, &new);
	}

	fn redisplay_selection(&mut self, old: &Selection, new: &Selection) {
		for range in Selection::redraw_delta(old, new) {
			self.check_display(range.start, range.end);
		}
	}
}
