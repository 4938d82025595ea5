//! Display-column metrics.
//!
//! A byte occupies one display column unless it is a tab (expanded to the
//! next tab stop), an ASCII control code (shown as `<name>`), DEL (shown as
//! `<del>`) or the buffer's null substitute (shown as `<nul>`). These rules
//! are pure functions of the byte, the column it starts at, the tab distance
//! and the active substitute byte, and every columnar algorithm in the
//! workspace goes through them.

use std::borrow::Cow;

use smallvec::SmallVec;


/// Upper bound on the expansion of a control code or substituted null.
///
/// Tabs wider than this spill into the heap; everything else fits inline in
/// an [`ExpandedChar`].
pub const MAX_EXPANDED_CHAR_LEN: usize = 20;

/// Names of the 32 ASCII control codes, indexed by byte value.
pub const CONTROL_CODE_NAMES: [&str; 32] = [
	"nul", "soh", "stx", "etx", "eot", "enq", "ack", "bel", "bs", "ht", "nl", "vt", "np", "cr",
	"so", "si", "dle", "dc1", "dc2", "dc3", "dc4", "nak", "syn", "etb", "can", "em", "sub", "esc",
	"fs", "gs", "rs", "us",
];

const DEL: u8 = 127;
const NUL_MARKER: &[u8] = b"<nul>";
const DEL_MARKER: &[u8] = b"<del>";

/// On-screen representation of a single buffer byte.
pub type ExpandedChar = SmallVec<[u8; MAX_EXPANDED_CHAR_LEN]>;

#[inline]
fn tab_width(indent: usize, tab_distance: usize) -> usize {
	let tab_distance = tab_distance.max(1);
	tab_distance - indent % tab_distance
}

/// Width in display columns of `byte` drawn at column `indent`.
///
/// `null_subs` is the byte currently standing in for `\0` (or `0` when no
/// substitution is active). Must agree with [`expand_char`] for every input.
pub fn char_width(byte: u8, indent: usize, tab_distance: usize, null_subs: u8) -> usize {
	match byte {
		b if b == null_subs => NUL_MARKER.len(),
		b'\t' => tab_width(indent, tab_distance),
		0..=31 => CONTROL_CODE_NAMES[byte as usize].len() + 2,
		DEL => DEL_MARKER.len(),
		_ => 1,
	}
}

/// Expands `byte` drawn at column `indent` into the bytes shown on screen.
pub fn expand_char(byte: u8, indent: usize, tab_distance: usize, null_subs: u8) -> ExpandedChar {
	match byte {
		b if b == null_subs => ExpandedChar::from_slice(NUL_MARKER),
		b'\t' => std::iter::repeat_n(b' ', tab_width(indent, tab_distance)).collect(),
		0..=31 => {
			let name = CONTROL_CODE_NAMES[byte as usize].as_bytes();
			let mut out = ExpandedChar::new();
			out.push(b'<');
			out.extend_from_slice(name);
			out.push(b'>');
			out
		}
		DEL => ExpandedChar::from_slice(DEL_MARKER),
		_ => ExpandedChar::from_slice(&[byte]),
	}
}

/// Tab settings bundled for the multi-byte column algorithms.
///
/// A buffer hands out one of these describing its current tab distance,
/// tab-for-indent preference and null substitute; the methods are pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMetrics {
	/// Columns between tab stops. Never zero.
	pub tab_distance: usize,
	/// Whether padding and re-alignment may emit tabs.
	pub use_tabs: bool,
	/// Active null substitute, or `0`.
	pub null_subs: u8,
}

impl Default for ColumnMetrics {
	fn default() -> Self {
		Self {
			tab_distance: 8,
			use_tabs: true,
			null_subs: 0,
		}
	}
}

impl ColumnMetrics {
	/// Creates metrics, raising a zero tab distance to one.
	pub fn new(tab_distance: usize, use_tabs: bool, null_subs: u8) -> Self {
		Self {
			tab_distance: tab_distance.max(1),
			use_tabs,
			null_subs,
		}
	}

	/// See [`char_width`].
	#[inline]
	pub fn width(&self, byte: u8, indent: usize) -> usize {
		char_width(byte, indent, self.tab_distance, self.null_subs)
	}

	/// See [`expand_char`].
	#[inline]
	pub fn expand(&self, byte: u8, indent: usize) -> ExpandedChar {
		expand_char(byte, indent, self.tab_distance, self.null_subs)
	}

	/// Width of the widest line in `text`.
	pub fn text_width(&self, text: &[u8]) -> usize {
		let mut width = 0;
		let mut widest = 0;
		for &b in text {
			if b == b'\n' {
				widest = widest.max(width);
				width = 0;
			} else {
				width += self.width(b, width);
			}
		}
		widest.max(width)
	}

	/// Replaces every tab with spaces.
	///
	/// Each line of `text` is taken to start at column `start_indent`, as is
	/// the case for a rectangular selection cut out of the middle of lines.
	pub fn expand_tabs(&self, text: &[u8], start_indent: usize) -> Vec<u8> {
		let mut out = Vec::with_capacity(text.len());
		let mut indent = start_indent;
		for &b in text {
			match b {
				b'\t' => {
					let w = self.width(b, indent);
					out.resize(out.len() + w, b' ');
					indent += w;
				}
				b'\n' => {
					indent = start_indent;
					out.push(b);
				}
				_ => {
					indent += self.width(b, indent);
					out.push(b);
				}
			}
		}
		out
	}

	/// Collapses runs of spaces that exactly reach a tab stop into tabs.
	///
	/// Only runs of three or more columns are converted so that double spaces
	/// after a sentence survive.
	pub fn unexpand_tabs(&self, text: &[u8], start_indent: usize) -> Vec<u8> {
		let mut out = Vec::with_capacity(text.len());
		let mut indent = start_indent;
		let mut pos = 0;
		while let Some(&b) = text.get(pos) {
			match b {
				b' ' => {
					let w = tab_width(indent, self.tab_distance);
					let fills_stop = text
						.get(pos..pos + w)
						.is_some_and(|run| run.iter().all(|&c| c == b' '));
					if w >= 3 && fills_stop {
						out.push(b'\t');
						pos += w;
						indent += w;
					} else {
						out.push(b' ');
						pos += 1;
						indent += 1;
					}
				}
				b'\n' => {
					out.push(b);
					pos += 1;
					indent = start_indent;
				}
				_ => {
					out.push(b);
					pos += 1;
					indent += self.width(b, indent);
				}
			}
		}
		out
	}

	/// Rewrites the blanks of `text` so that its non-blank bytes stay in the
	/// same display columns after moving from `orig_indent` to `new_indent`.
	pub fn realign_tabs<'a>(
		&self,
		text: &'a [u8],
		orig_indent: usize,
		new_indent: usize,
	) -> Cow<'a, [u8]> {
		let stop = self.tab_distance.max(1);
		if orig_indent % stop == new_indent % stop {
			return Cow::Borrowed(text);
		}
		let expanded = self.expand_tabs(text, orig_indent);
		if !self.use_tabs {
			return Cow::Owned(expanded);
		}
		Cow::Owned(self.unexpand_tabs(&expanded, new_indent))
	}

	/// Appends blanks to `out` to advance from column `from` to column `to`.
	///
	/// Returns the number of bytes appended.
	pub fn pad(&self, out: &mut Vec<u8>, from: usize, to: usize) -> usize {
		let before = out.len();
		let mut indent = from;
		while indent < to {
			let w = tab_width(indent, self.tab_distance);
			if self.use_tabs && w > 1 && indent + w <= to {
				out.push(b'\t');
				indent += w;
			} else {
				out.push(b' ');
				indent += 1;
			}
		}
		out.len() - before
	}
}

/// Number of `\n` bytes in `text`.
pub fn count_newlines(text: &[u8]) -> usize {
	text.iter().filter(|&&b| b == b'\n').count()
}
