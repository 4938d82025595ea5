//! Rectangular editing on blocks of whole lines.
//!
//! Each operation takes a block of complete lines (no trailing newline),
//! rewrites every line independently by display column, and joins the
//! results. A rectangle edge that falls inside a tab splits the tab into
//! padding; one that falls inside a multi-column control code keeps the code
//! whole. Blanks after an edit point are rewritten with
//! [`ColumnMetrics::realign_tabs`] so that text to the right of the rectangle
//! keeps its columns.
//!
//! The functions are pure; [`TextBuffer`](crate::TextBuffer) cuts the block
//! out of the buffer, runs one of these, and splices the result back.

use weft_primitives::ColumnMetrics;

fn lines(block: &[u8]) -> impl Iterator<Item = &[u8]> {
	block.split(|&b| b == b'\n')
}

/// Output of a block rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlockEdit {
	/// The rewritten block.
	pub text: Vec<u8>,
	/// Offset in `text` just past the edit on the last line, used as the
	/// cursor hint.
	pub end_offset: usize,
}

/// Inserts `text` line by line at `column`, starting with the first line of
/// `block`. Lines missing from `block` are treated as empty.
pub(crate) fn insert_column(
	m: &ColumnMetrics,
	block: &[u8],
	column: usize,
	text: &[u8],
) -> BlockEdit {
	let ins_width = m.text_width(text);
	let mut existing = lines(block);
	let mut out = Vec::with_capacity(block.len() + text.len());
	let mut end_offset = 0;
	for (n, ins_line) in lines(text).enumerate() {
		if n > 0 {
			out.push(b'\n');
		}
		let line = existing.next().unwrap_or_default();
		let line_start = out.len();
		end_offset = line_start + insert_in_line(m, line, ins_line, column, ins_width, &mut out);
	}
	BlockEdit { text: out, end_offset }
}

/// Overwrites columns `[rect_start, rect_end)` of successive lines with the
/// lines of `text`, trimming trailing blanks from every rewritten line.
pub(crate) fn overlay(
	m: &ColumnMetrics,
	block: &[u8],
	rect_start: usize,
	rect_end: usize,
	text: &[u8],
) -> BlockEdit {
	let mut existing = lines(block);
	let mut out = Vec::with_capacity(block.len() + text.len());
	let mut end_offset = 0;
	for (n, ins_line) in lines(text).enumerate() {
		if n > 0 {
			out.push(b'\n');
		}
		let line = existing.next().unwrap_or_default();
		let line_start = out.len();
		end_offset = line_start + overlay_line(m, line, ins_line, rect_start, rect_end, &mut out);
		while out.len() > line_start + 1 && matches!(out.last(), Some(b' ' | b'\t')) {
			out.pop();
		}
	}
	BlockEdit { text: out, end_offset }
}

/// Removes columns `[rect_start, rect_end)` from every line of `block`.
pub(crate) fn delete_rect(
	m: &ColumnMetrics,
	block: &[u8],
	rect_start: usize,
	rect_end: usize,
) -> BlockEdit {
	let mut out = Vec::with_capacity(block.len());
	let mut end_offset = 0;
	for (n, line) in lines(block).enumerate() {
		if n > 0 {
			out.push(b'\n');
		}
		let line_start = out.len();
		end_offset = line_start + delete_from_line(m, line, rect_start, rect_end, &mut out);
	}
	BlockEdit { text: out, end_offset }
}

/// Copies columns `[rect_start, rect_end)` of every line of `block`, joined
/// by newlines and realigned to start at column zero.
pub(crate) fn extract(
	m: &ColumnMetrics,
	block: &[u8],
	rect_start: usize,
	rect_end: usize,
) -> Vec<u8> {
	let mut out = Vec::new();
	for (n, line) in lines(block).enumerate() {
		if n > 0 {
			out.push(b'\n');
		}
		let (start, end) = copy_bounds(m, line, rect_start, rect_end);
		out.extend_from_slice(&line[start..end]);
	}
	m.realign_tabs(&out, rect_start, 0).into_owned()
}

/// Byte offsets within `line` of the characters a rectangular copy takes.
///
/// A tab straddling either edge is included; any other character straddling
/// an edge is left out.
pub(crate) fn copy_bounds(
	m: &ColumnMetrics,
	line: &[u8],
	rect_start: usize,
	rect_end: usize,
) -> (usize, usize) {
	let mut indent = 0;
	let mut pos = 0;
	while let Some(&c) = line.get(pos) {
		let w = m.width(c, indent);
		if indent + w > rect_start {
			if indent != rect_start && c != b'\t' {
				pos += 1;
				indent += w;
			}
			break;
		}
		indent += w;
		pos += 1;
	}
	let start = pos;
	while let Some(&c) = line.get(pos) {
		let w = m.width(c, indent);
		indent += w;
		if indent > rect_end {
			if indent - w != rect_end && c != b'\t' {
				pos += 1;
			}
			break;
		}
		pos += 1;
	}
	(start, pos)
}

/// Appends `line` with `ins` inserted at `column` to `out`.
///
/// Returns the offset, relative to where this line began in `out`, just past
/// the inserted text and its padding.
fn insert_in_line(
	m: &ColumnMetrics,
	line: &[u8],
	ins: &[u8],
	column: usize,
	ins_width: usize,
	out: &mut Vec<u8>,
) -> usize {
	let base = out.len();
	let mut indent = 0;
	let mut width = 0;
	let mut pos = 0;
	while let Some(&c) = line.get(pos) {
		width = m.width(c, indent);
		if indent + width > column {
			break;
		}
		indent += width;
		out.push(c);
		pos += 1;
	}

	let post_col_indent = match line.get(pos) {
		Some(&c) if indent < column => {
			let after = indent + width;
			pos += 1;
			if c != b'\t' {
				out.push(c);
				indent = after;
			}
			after
		}
		_ => indent,
	};
	if ins.is_empty() && pos == line.len() {
		return out.len() - base;
	}

	if indent < column {
		m.pad(out, indent, column);
		indent = column;
	}
	for &c in m.realign_tabs(ins, 0, indent).iter() {
		out.push(c);
		indent += m.width(c, indent);
	}
	if pos == line.len() {
		return out.len() - base;
	}

	let to_indent = post_col_indent + ins_width;
	m.pad(out, indent, to_indent);
	let end_offset = out.len() - base;
	out.extend_from_slice(&m.realign_tabs(&line[pos..], post_col_indent, to_indent));
	end_offset
}

/// Appends `line` with columns `[rect_start, rect_end)` removed to `out`.
///
/// Returns the offset, relative to where this line began in `out`, of the
/// first byte after the cut.
fn delete_from_line(
	m: &ColumnMetrics,
	line: &[u8],
	rect_start: usize,
	rect_end: usize,
	out: &mut Vec<u8>,
) -> usize {
	let base = out.len();
	let mut indent = 0;
	let mut pos = 0;
	while let Some(&c) = line.get(pos) {
		if indent > rect_start {
			break;
		}
		let w = m.width(c, indent);
		if indent + w > rect_start && (indent == rect_start || c == b'\t') {
			break;
		}
		indent += w;
		out.push(c);
		pos += 1;
	}
	let pre_rect_indent = indent;

	while let Some(&c) = line.get(pos) {
		if indent >= rect_end {
			break;
		}
		indent += m.width(c, indent);
		pos += 1;
	}
	let post_rect_indent = indent;
	if pos == line.len() {
		return out.len() - base;
	}

	let fill_to = (rect_start + (post_rect_indent - rect_end)).max(pre_rect_indent);
	m.pad(out, pre_rect_indent, fill_to);
	let end_offset = out.len() - base;
	out.extend_from_slice(&m.realign_tabs(&line[pos..], post_rect_indent, fill_to));
	end_offset
}

/// Appends `line` with columns `[rect_start, rect_end)` replaced by `ins` to
/// `out`. Text right of the rectangle keeps its columns.
///
/// Returns the offset, relative to where this line began in `out`, just past
/// the overlaid text and its padding.
fn overlay_line(
	m: &ColumnMetrics,
	line: &[u8],
	ins: &[u8],
	rect_start: usize,
	rect_end: usize,
	out: &mut Vec<u8>,
) -> usize {
	let base = out.len();
	let mut in_indent = 0;
	let mut out_indent = 0;
	let mut width = 0;
	let mut pos = 0;
	while let Some(&c) = line.get(pos) {
		width = m.width(c, in_indent);
		if in_indent + width > rect_start {
			break;
		}
		in_indent += width;
		out_indent += width;
		out.push(c);
		pos += 1;
	}

	if let Some(&c) = line.get(pos).filter(|_| in_indent < rect_start) {
		if c != b'\t' {
			out.push(c);
			out_indent += width;
		}
		in_indent += width;
		pos += 1;
	}

	while let Some(&c) = line.get(pos) {
		if in_indent >= rect_end {
			break;
		}
		in_indent += m.width(c, in_indent);
		pos += 1;
	}
	let post_rect_indent = in_indent;
	if ins.is_empty() && pos == line.len() {
		return out.len() - base;
	}

	if out_indent < rect_start {
		m.pad(out, out_indent, rect_start);
	}
	out_indent = rect_start;
	for &c in m.realign_tabs(ins, 0, rect_start).iter() {
		out.push(c);
		out_indent += m.width(c, out_indent);
	}
	if pos == line.len() {
		return out.len() - base;
	}

	m.pad(out, out_indent, post_rect_indent);
	let end_offset = out.len() - base;
	out.extend_from_slice(&line[pos..]);
	end_offset
}
