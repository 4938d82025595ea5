//! Rectangular (columnar) editing.
//!
//! Each operation widens its span to whole lines, rewrites that block with
//! one of the [`columnar`](crate::columnar) functions and splices the result
//! back in as a single change, so observers see one pre-delete and one modify
//! covering exactly the rewritten lines.

use std::iter;

use tracing::trace;
use weft_primitives::Pos;
use weft_primitives::columns::count_newlines;

use super::TextBuffer;
use crate::columnar::{self, BlockEdit};
use crate::error::Result;

/// Size of a rectangular change, as reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnEdit {
	/// Bytes inserted (the length of the rewritten lines).
	pub inserted: usize,
	/// Bytes deleted (the length of the original lines).
	pub deleted: usize,
}

impl TextBuffer {
	/// Inserts `text` as a column starting at display column `column` of the
	/// line containing `start_pos`, one line of `text` per buffer line.
	///
	/// Lines past the end of the buffer are created. Text right of `column`
	/// is shifted by the widest line of `text`.
	pub fn insert_column(
		&mut self,
		column: usize,
		start_pos: Pos,
		text: &[u8],
	) -> Result<ColumnEdit> {
		let text = self.prepare_text(text)?;
		let start = self.line_start(start_pos);
		let end = self.line_end(self.forward_lines(start_pos, count_newlines(&text)));
		let block = self.range(start, end);
		let edit = columnar::insert_column(&self.metrics(), &block, column, &text);
		trace!(column, start, end, "buffer.insert_column");
		self.splice_block(start, end, edit)
	}

	/// Deletes display columns `[rect_start, rect_end)` from every line
	/// between `start` and `end`.
	pub fn remove_rect(
		&mut self,
		start: Pos,
		end: Pos,
		rect_start: usize,
		rect_end: usize,
	) -> Result<ColumnEdit> {
		let start = self.line_start(start);
		let end = self.line_end(end);
		let block = self.range(start, end);
		let edit = columnar::delete_rect(&self.metrics(), &block, rect_start, rect_end);
		trace!(start, end, rect_start, rect_end, "buffer.remove_rect");
		self.splice_block(start, end, edit)
	}

	/// Overwrites display columns `[rect_start, rect_end)` of successive
	/// lines, starting with the line containing `start_pos`, with the lines of
	/// `text`.
	///
	/// `rect_end` defaults to `rect_start` plus the width of `text`. Trailing
	/// blanks are trimmed from every rewritten line.
	pub fn overlay_rect(
		&mut self,
		start_pos: Pos,
		rect_start: usize,
		rect_end: Option<usize>,
		text: &[u8],
	) -> Result<ColumnEdit> {
		let text = self.prepare_text(text)?;
		let metrics = self.metrics();
		let rect_end = rect_end.unwrap_or_else(|| rect_start + metrics.text_width(&text));
		let start = self.line_start(start_pos);
		let end = self.line_end(self.forward_lines(start_pos, count_newlines(&text)));
		let block = self.range(start, end);
		let edit = columnar::overlay(&metrics, &block, rect_start, rect_end, &text);
		trace!(start, end, rect_start, rect_end, "buffer.overlay_rect");
		self.splice_block(start, end, edit)
	}

	/// Replaces the rectangle `[rect_start, rect_end)` on the lines between
	/// `start` and `end` with `text`.
	///
	/// If `text` has fewer lines than the rectangle, the rectangle's remaining
	/// lines are emptied; if it has more, lines are added below.
	pub fn replace_rect(
		&mut self,
		start: Pos,
		end: Pos,
		rect_start: usize,
		rect_end: usize,
		text: &[u8],
	) -> Result<ColumnEdit> {
		let mut text = self.prepare_text(text)?;
		let start = self.line_start(start);
		let end = self.line_end(end);
		let ins_lines = count_newlines(&text);
		let del_lines = self.count_lines(start, end);

		let mut block = self.range(start, end);
		if ins_lines < del_lines {
			text.to_mut().extend(iter::repeat_n(b'\n', del_lines - ins_lines));
		} else if del_lines < ins_lines {
			block.extend(iter::repeat_n(b'\n', ins_lines - del_lines));
		}

		let metrics = self.metrics();
		let cut = columnar::delete_rect(&metrics, &block, rect_start, rect_end);
		let edit = columnar::insert_column(&metrics, &cut.text, rect_start, &text);
		trace!(start, end, rect_start, rect_end, "buffer.replace_rect");
		self.splice_block(start, end, edit)
	}

	/// Blanks display columns `[rect_start, rect_end)` on the lines between
	/// `start` and `end`.
	pub fn clear_rect(
		&mut self,
		start: Pos,
		end: Pos,
		rect_start: usize,
		rect_end: usize,
	) -> Result<ColumnEdit> {
		let newlines: Vec<u8> = iter::repeat_n(b'\n', self.count_lines(start, end)).collect();
		self.overlay_rect(start, rect_start, Some(rect_end), &newlines)
	}

	/// Copies display columns `[rect_start, rect_end)` of the lines between
	/// `start` and `end`, one output line per buffer line, realigned to start
	/// at column zero.
	pub fn text_in_rect(
		&self,
		start: Pos,
		end: Pos,
		rect_start: usize,
		rect_end: usize,
	) -> Vec<u8> {
		let start = self.line_start(start);
		let end = self.line_end(end);
		let block = self.range(start, end);
		columnar::extract(&self.metrics(), &block, rect_start, rect_end)
	}

	fn splice_block(&mut self, start: Pos, end: Pos, edit: BlockEdit) -> Result<ColumnEdit> {
		self.splice(start, end, &edit.text, start + edit.end_offset)?;
		Ok(ColumnEdit {
			inserted: edit.text.len(),
			deleted: end - start,
		})
	}
}
