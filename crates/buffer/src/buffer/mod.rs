//! [`TextBuffer`]: gap storage plus selections, observers and tab settings.
//!
//! Every mutation follows the same sequence: pre-delete observers run while
//! the old text is still in place, the storage changes, the three selections
//! are maintained, and modify observers run last. Anything that can fail
//! (growing the gap, choosing a null substitute) is done before the first
//! observer is notified, so an error leaves both the buffer and its observers
//! as they were.

mod nulls;
mod rect;
mod select;
#[cfg(test)]
mod tests;

use tracing::{trace, warn};
use weft_primitives::{ColumnMetrics, ExpandedChar, Pos, SelectionSet};

use crate::config::BufferConfig;
use crate::error::{BufferError, Result};
use crate::gap::GapStorage;
use crate::observer::{
	ModifyEvent, ModifyObserver, ObserverId, ObserverRegistry, PreDeleteEvent, PreDeleteObserver,
};

pub use rect::ColumnEdit;

/// An editable byte buffer.
#[derive(Debug)]
pub struct TextBuffer {
	storage: GapStorage,
	tab_distance: usize,
	use_tabs: bool,
	null_subs_char: u8,
	cursor_pos_hint: Pos,
	selections: SelectionSet,
	observers: ObserverRegistry,
}

impl Default for TextBuffer {
	fn default() -> Self {
		Self::new()
	}
}

impl TextBuffer {
	/// Creates an empty buffer with default settings.
	pub fn new() -> Self {
		Self::with_config(&BufferConfig::default())
	}

	/// Creates an empty buffer that can take `capacity` bytes before its
	/// first reallocation.
	pub fn with_capacity(capacity: usize) -> Self {
		let mut buf = Self::new();
		buf.storage = GapStorage::new(capacity, buf.storage.preferred_gap());
		buf
	}

	/// Creates an empty buffer from loaded settings.
	pub fn with_config(config: &BufferConfig) -> Self {
		Self {
			storage: GapStorage::new(0, config.preferred_gap),
			tab_distance: config.tab_distance.max(1),
			use_tabs: config.use_tabs,
			null_subs_char: 0,
			cursor_pos_hint: 0,
			selections: SelectionSet::new(),
			observers: ObserverRegistry::default(),
		}
	}

	/// Creates a buffer holding `text`.
	pub fn from_bytes(text: &[u8]) -> Result<Self> {
		let mut buf = Self::new();
		buf.set_text(text)?;
		Ok(buf)
	}

	/// Number of bytes of text.
	#[inline]
	pub fn len(&self) -> usize {
		self.storage.len()
	}

	/// True if the buffer holds no text.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.storage.is_empty()
	}

	/// Bytes allocated for text plus gap.
	pub fn capacity(&self) -> usize {
		self.storage.capacity()
	}

	/// Copies out the whole text.
	pub fn text(&self) -> Vec<u8> {
		self.storage.range(0, self.len())
	}

	/// Copies out `[start, end)`.
	///
	/// Reversed bounds are swapped and `end` is clamped to the buffer; a
	/// `start` past the end gives an empty result.
	pub fn range(&self, start: Pos, end: Pos) -> Vec<u8> {
		let len = self.len();
		if start > len {
			return Vec::new();
		}
		let (start, end) = if start > end { (end, start) } else { (start, end) };
		self.storage.range(start, end.min(len))
	}

	/// Byte at `pos`, or `0` past the end.
	#[inline]
	pub fn byte_at(&self, pos: Pos) -> u8 {
		self.storage.get(pos).unwrap_or(0)
	}

	/// The whole text as one slice, moving the gap to whichever end is
	/// cheaper.
	pub fn as_contiguous(&mut self) -> &[u8] {
		self.storage.make_contiguous()
	}

	/// True if the text at `pos` equals `text`. Never true when `text` would
	/// run past the end.
	pub fn matches_at(&self, pos: Pos, text: &[u8]) -> bool {
		self.storage.matches_at(pos, text)
	}

	/// Column rules for this buffer's current settings.
	pub fn metrics(&self) -> ColumnMetrics {
		ColumnMetrics::new(self.tab_distance, self.use_tabs, self.null_subs_char)
	}

	/// On-screen representation of the byte at `pos` drawn at column
	/// `indent`.
	pub fn expanded_char_at(&self, pos: Pos, indent: usize) -> ExpandedChar {
		self.metrics().expand(self.byte_at(pos), indent)
	}

	/// Columns between tab stops.
	pub fn tab_distance(&self) -> usize {
		self.tab_distance
	}

	/// Changes the tab distance.
	///
	/// Every column in the buffer may move, so observers see the whole text
	/// deleted and reinserted.
	pub fn set_tab_distance(&mut self, tab_distance: usize) -> Result<()> {
		if tab_distance == 0 {
			return Err(BufferError::InvalidTabDistance(tab_distance));
		}
		let len = self.len();
		self.notify_pre_delete(0, len);
		self.tab_distance = tab_distance;
		let all = self.text();
		self.notify_modify(0, len, len, 0, &all);
		Ok(())
	}

	/// Whether columnar edits may pad with tabs.
	pub fn use_tabs(&self) -> bool {
		self.use_tabs
	}

	/// See [`Self::use_tabs`].
	pub fn set_use_tabs(&mut self, use_tabs: bool) {
		self.use_tabs = use_tabs;
	}

	/// Byte currently standing in for `\0`, or `0` if none has been needed.
	pub fn null_subs_char(&self) -> u8 {
		self.null_subs_char
	}

	/// Where the last edit suggests the cursor should go.
	pub fn cursor_pos_hint(&self) -> Pos {
		self.cursor_pos_hint
	}

	/// The buffer's primary, secondary and highlight selections.
	pub fn selections(&self) -> &SelectionSet {
		&self.selections
	}

	/// Inserts `text` at `pos` (clamped to the end) and returns the number of
	/// bytes inserted.
	pub fn insert(&mut self, pos: Pos, text: &[u8]) -> Result<usize> {
		let pos = pos.min(self.len());
		let text = self.prepare_text(text)?;
		self.storage.prepare_insert(pos, text.len())?;
		self.notify_pre_delete(pos, 0);
		self.insert_raw(pos, &text)?;
		self.cursor_pos_hint = pos + text.len();
		trace!(pos, inserted = text.len(), "buffer.insert");
		self.notify_modify(pos, text.len(), 0, 0, &[]);
		Ok(text.len())
	}

	/// Inserts `text` at the end.
	pub fn append(&mut self, text: &[u8]) -> Result<usize> {
		self.insert(self.len(), text)
	}

	/// Removes `[start, end)`. Bounds are swapped if reversed and clamped to
	/// the buffer.
	pub fn remove(&mut self, start: Pos, end: Pos) {
		let (start, end) = self.clamp_span(start, end);
		self.notify_pre_delete(start, end - start);
		let deleted = self.storage.range(start, end);
		self.delete_raw(start, end);
		self.cursor_pos_hint = start;
		trace!(start, end, "buffer.remove");
		self.notify_modify(start, 0, deleted.len(), 0, &deleted);
	}

	/// Replaces `[start, end)` with `text` as a single change and returns the
	/// number of bytes inserted.
	pub fn replace(&mut self, start: Pos, end: Pos, text: &[u8]) -> Result<usize> {
		let (start, end) = self.clamp_span(start, end);
		let text = self.prepare_text(text)?;
		self.splice(start, end, &text, start + text.len())?;
		trace!(start, end, inserted = text.len(), "buffer.replace");
		Ok(text.len())
	}

	/// Replaces the whole text.
	///
	/// The new text gets fresh storage with the gap in its middle.
	pub fn set_text(&mut self, text: &[u8]) -> Result<()> {
		let text = self.prepare_text(text)?;
		let storage = GapStorage::from_text(&text, self.storage.preferred_gap())?;
		let old_len = self.len();
		self.notify_pre_delete(0, old_len);
		let deleted = self.storage.range(0, old_len);
		self.storage = storage;
		// selections collapse onto the start, as if the old text were deleted
		self.selections.maintain(0, old_len, 0);
		trace!(old_len, new_len = text.len(), "buffer.set_text");
		self.notify_modify(0, text.len(), old_len, 0, &deleted);
		Ok(())
	}

	/// Copies `[from_start, from_end)` of `other` to `to_pos` in this buffer
	/// and returns the number of bytes copied.
	///
	/// Selections are maintained but observers are not notified; callers
	/// batching several copies follow up with [`Self::check_display`] or
	/// their own bookkeeping.
	pub fn copy_from(
		&mut self,
		other: &TextBuffer,
		from_start: Pos,
		from_end: Pos,
		to_pos: Pos,
	) -> Result<usize> {
		let mut bytes = other.range(from_start, from_end);
		other.unsubstitute_nulls(&mut bytes);
		let to_pos = to_pos.min(self.len());
		let text = self.prepare_text(&bytes)?;
		self.insert_raw(to_pos, &text)?;
		Ok(text.len())
	}

	/// Asks observers to redraw `[start, end)` without any text change.
	pub fn check_display(&mut self, start: Pos, end: Pos) {
		self.notify_modify(start, 0, 0, end.saturating_sub(start), &[]);
	}

	/// Start of the line containing `pos`.
	pub fn line_start(&self, pos: Pos) -> Pos {
		self.storage
			.find_backward(pos.min(self.len()), b'\n')
			.map_or(0, |nl| nl + 1)
	}

	/// Position of the newline ending the line containing `pos`, or the end
	/// of the buffer.
	pub fn line_end(&self, pos: Pos) -> Pos {
		self.storage
			.find_forward(pos.min(self.len()), b'\n')
			.unwrap_or(self.len())
	}

	/// Newlines in `[start, end)`.
	pub fn count_lines(&self, start: Pos, end: Pos) -> usize {
		let end = end.min(self.len());
		if start >= end {
			return 0;
		}
		self.storage.count(start, end, b'\n')
	}

	/// Start of the line `n` lines after the one containing `start`, or the
	/// end of the buffer. `n == 0` returns `start` unchanged.
	pub fn forward_lines(&self, start: Pos, n: usize) -> Pos {
		let start = start.min(self.len());
		self.storage
			.find_nth_forward(start, b'\n', n)
			.unwrap_or(self.len())
	}

	/// Start of the line `n` lines before the one containing `start`.
	///
	/// A newline at `start` itself is not counted, so `n == 0` gives the start
	/// of the current line.
	pub fn backward_lines(&self, start: Pos, n: usize) -> Pos {
		let start = start.min(self.len());
		if start <= 1 {
			return 0;
		}
		let mut limit = start;
		let mut seen = 0;
		while let Some(nl) = self.storage.find_backward(limit, b'\n') {
			if seen >= n {
				return nl + 1;
			}
			seen += 1;
			limit = nl;
		}
		0
	}

	/// Display width of `[line_start, target)`.
	pub fn display_column(&self, line_start: Pos, target: Pos) -> usize {
		let end = target.min(self.len());
		let metrics = self.metrics();
		let mut indent = 0;
		for byte in self.storage.bytes(line_start.min(end), end) {
			indent += metrics.width(byte, indent);
		}
		indent
	}

	/// First position at or past `n_cols` display columns from `line_start`,
	/// stopping at the end of the line.
	pub fn position_at_column(&self, line_start: Pos, n_cols: usize) -> Pos {
		let metrics = self.metrics();
		let mut pos = line_start.min(self.len());
		let mut indent = 0;
		while indent < n_cols {
			let Some(byte) = self.storage.get(pos) else {
				break;
			};
			if byte == b'\n' {
				return pos;
			}
			indent += metrics.width(byte, indent);
			pos += 1;
		}
		pos
	}

	/// First position at or after `start` holding any byte of `set`.
	pub fn search_forward(&self, start: Pos, set: &[u8]) -> Option<Pos> {
		let start = start.min(self.len());
		match set {
			[byte] => self.storage.find_forward(start, *byte),
			_ => self
				.storage
				.bytes(start, self.len())
				.position(|b| set.contains(&b))
				.map(|offset| start + offset),
		}
	}

	/// Last position before `start` holding any byte of `set`.
	pub fn search_backward(&self, start: Pos, set: &[u8]) -> Option<Pos> {
		let start = start.min(self.len());
		match set {
			[byte] => self.storage.find_backward(start, *byte),
			_ => (0..start).rev().find(|&pos| {
				self.storage
					.get(pos)
					.is_some_and(|b| set.contains(&b))
			}),
		}
	}

	/// Registers an observer called after every change.
	pub fn add_modify_observer(
		&mut self,
		observer: impl FnMut(&TextBuffer, &ModifyEvent<'_>) + 'static,
	) -> ObserverId {
		let id = self.observers.next_id();
		self.observers.modify.push((id, Box::new(observer) as ModifyObserver));
		id
	}

	/// Registers a modify observer that runs before all observers registered
	/// so far.
	pub fn add_high_priority_modify_observer(
		&mut self,
		observer: impl FnMut(&TextBuffer, &ModifyEvent<'_>) + 'static,
	) -> ObserverId {
		let id = self.observers.next_id();
		self.observers
			.modify
			.insert(0, (id, Box::new(observer) as ModifyObserver));
		id
	}

	/// Unregisters a modify observer. Returns false if `id` is unknown.
	pub fn remove_modify_observer(&mut self, id: ObserverId) -> bool {
		let Some(index) = self.observers.modify.iter().position(|(i, _)| *i == id) else {
			warn!(?id, "removing unknown modify observer");
			return false;
		};
		self.observers.modify.remove(index);
		true
	}

	/// Registers an observer called before bytes are removed.
	pub fn add_pre_delete_observer(
		&mut self,
		observer: impl FnMut(&TextBuffer, &PreDeleteEvent) + 'static,
	) -> ObserverId {
		let id = self.observers.next_id();
		self.observers
			.pre_delete
			.push((id, Box::new(observer) as PreDeleteObserver));
		id
	}

	/// Unregisters a pre-delete observer. Returns false if `id` is unknown.
	pub fn remove_pre_delete_observer(&mut self, id: ObserverId) -> bool {
		let Some(index) = self
			.observers
			.pre_delete
			.iter()
			.position(|(i, _)| *i == id)
		else {
			warn!(?id, "removing unknown pre-delete observer");
			return false;
		};
		self.observers.pre_delete.remove(index);
		true
	}

	fn clamp_span(&self, start: Pos, end: Pos) -> (Pos, Pos) {
		let (start, end) = if start > end { (end, start) } else { (start, end) };
		(start.min(self.len()), end.min(self.len()))
	}

	fn insert_raw(&mut self, pos: Pos, text: &[u8]) -> Result<()> {
		self.storage.insert(pos, text)?;
		self.selections.maintain(pos, 0, text.len());
		Ok(())
	}

	fn delete_raw(&mut self, start: Pos, end: Pos) {
		self.storage.delete(start, end);
		self.selections.maintain(start, end - start, 0);
	}

	/// Replaces `[start, end)` with already-substituted `text`, notifying
	/// observers once.
	fn splice(&mut self, start: Pos, end: Pos, text: &[u8], hint: Pos) -> Result<()> {
		let deleted = end - start;
		self.storage.reserve_gap(text.len().saturating_sub(deleted))?;
		self.notify_pre_delete(start, deleted);
		let deleted_text = self.storage.range(start, end);
		self.delete_raw(start, end);
		self.insert_raw(start, text)?;
		self.cursor_pos_hint = hint.min(self.len());
		self.notify_modify(start, text.len(), deleted, 0, &deleted_text);
		Ok(())
	}

	fn notify_pre_delete(&mut self, pos: Pos, deleted: usize) {
		let event = PreDeleteEvent { pos, deleted };
		let mut observers = std::mem::take(&mut self.observers.pre_delete);
		for (_, observer) in &mut observers {
			observer(self, &event);
		}
		self.observers.pre_delete = observers;
	}

	fn notify_modify(
		&mut self,
		pos: Pos,
		inserted: usize,
		deleted: usize,
		restyled: usize,
		deleted_text: &[u8],
	) {
		let event = ModifyEvent {
			pos,
			inserted,
			deleted,
			restyled,
			deleted_text,
		};
		let mut observers = std::mem::take(&mut self.observers.modify);
		for (_, observer) in &mut observers {
			observer(self, &event);
		}
		self.observers.modify = observers;
	}
}
