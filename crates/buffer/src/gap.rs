//! Gap-buffer byte storage.
//!
//! Text lives in a single allocation split by a movable gap of unused bytes.
//! Logical position `p` maps to `data[p]` when `p < gap_start` and to
//! `data[p + gap_len]` otherwise. Edits at the gap are O(edit); moving the
//! gap costs the distance moved.

use std::collections::TryReserveError;

use memchr::{memchr, memchr_iter, memrchr};
use tracing::debug;

/// Gap size reserved on every reallocation and on construction.
pub const PREFERRED_GAP_SIZE: usize = 80;

/// Raw gap-buffer storage. Knows nothing about selections or observers.
#[derive(Debug, Clone)]
pub struct GapStorage {
	data: Vec<u8>,
	gap_start: usize,
	gap_end: usize,
	preferred_gap: usize,
}

impl Default for GapStorage {
	fn default() -> Self {
		Self::new(0, PREFERRED_GAP_SIZE)
	}
}

impl GapStorage {
	/// Creates empty storage able to hold `capacity` bytes plus the
	/// preferred gap before reallocating.
	pub fn new(capacity: usize, preferred_gap: usize) -> Self {
		let size = capacity + preferred_gap;
		Self {
			data: vec![0; size],
			gap_start: 0,
			gap_end: size,
			preferred_gap,
		}
	}

	/// Creates storage holding `text` with the preferred gap in its middle.
	pub fn from_text(text: &[u8], preferred_gap: usize) -> Result<Self, TryReserveError> {
		let mut data = Vec::new();
		data.try_reserve_exact(text.len() + preferred_gap)?;
		let mid = text.len() / 2;
		data.extend_from_slice(&text[..mid]);
		data.resize(mid + preferred_gap, 0);
		data.extend_from_slice(&text[mid..]);
		Ok(Self {
			data,
			gap_start: mid,
			gap_end: mid + preferred_gap,
			preferred_gap,
		})
	}

	/// Number of text bytes stored.
	#[inline]
	pub fn len(&self) -> usize {
		self.data.len() - self.gap_len()
	}

	/// True when no text is stored.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Size of the gap in bytes.
	#[inline]
	pub fn gap_len(&self) -> usize {
		self.gap_end - self.gap_start
	}

	/// Logical position of the gap.
	#[inline]
	pub fn gap_start(&self) -> usize {
		self.gap_start
	}

	/// Total bytes allocated for text plus gap.
	#[inline]
	pub fn capacity(&self) -> usize {
		self.data.len()
	}

	/// Gap size used when the storage has to grow.
	#[inline]
	pub fn preferred_gap(&self) -> usize {
		self.preferred_gap
	}

	/// The text before and after the gap.
	#[inline]
	pub fn as_slices(&self) -> (&[u8], &[u8]) {
		(&self.data[..self.gap_start], &self.data[self.gap_end..])
	}

	/// The two pieces of `[start, end)` on either side of the gap.
	///
	/// Both bounds must be `<= len()` with `start <= end`.
	pub fn slices(&self, start: usize, end: usize) -> (&[u8], &[u8]) {
		debug_assert!(start <= end && end <= self.len());
		let (before, after) = self.as_slices();
		let split = before.len();
		let head = &before[start.min(split)..end.min(split)];
		let tail = &after[start.saturating_sub(split)..end.saturating_sub(split)];
		(head, tail)
	}

	/// Byte at logical position `pos`.
	#[inline]
	pub fn get(&self, pos: usize) -> Option<u8> {
		if pos < self.gap_start {
			Some(self.data[pos])
		} else {
			self.data.get(pos + self.gap_len()).copied()
		}
	}

	/// Iterates the bytes of `[start, end)`.
	pub fn bytes(&self, start: usize, end: usize) -> impl Iterator<Item = u8> + '_ {
		let (head, tail) = self.slices(start, end);
		head.iter().chain(tail).copied()
	}

	/// Copies `[start, end)` into a new vector.
	pub fn range(&self, start: usize, end: usize) -> Vec<u8> {
		let (head, tail) = self.slices(start, end);
		let mut out = Vec::with_capacity(head.len() + tail.len());
		out.extend_from_slice(head);
		out.extend_from_slice(tail);
		out
	}

	/// True if the bytes starting at `pos` equal `text`.
	pub fn matches_at(&self, pos: usize, text: &[u8]) -> bool {
		let Some(end) = pos.checked_add(text.len()).filter(|&end| end <= self.len()) else {
			return false;
		};
		let (head, tail) = self.slices(pos, end);
		text[..head.len()] == *head && text[head.len()..] == *tail
	}

	/// Moves the gap so that it starts at logical position `pos`.
	pub fn move_gap(&mut self, pos: usize) {
		let gap_len = self.gap_len();
		if pos < self.gap_start {
			self.data.copy_within(pos..self.gap_start, pos + gap_len);
		} else if pos > self.gap_start {
			self.data.copy_within(self.gap_end..pos + gap_len, self.gap_start);
		}
		self.gap_start = pos;
		self.gap_end = pos + gap_len;
	}

	/// Rebuilds the storage with a gap of `new_gap_len` bytes at
	/// `new_gap_start`.
	///
	/// Leaves the storage untouched if the allocation fails.
	pub fn reallocate(
		&mut self,
		new_gap_start: usize,
		new_gap_len: usize,
	) -> Result<(), TryReserveError> {
		let len = self.len();
		debug!(len, new_gap_start, new_gap_len, "gap.reallocate");
		let mut data = Vec::new();
		data.try_reserve_exact(len + new_gap_len)?;
		let (head, tail) = self.slices(0, new_gap_start);
		data.extend_from_slice(head);
		data.extend_from_slice(tail);
		data.resize(new_gap_start + new_gap_len, 0);
		let (head, tail) = self.slices(new_gap_start, len);
		data.extend_from_slice(head);
		data.extend_from_slice(tail);
		self.data = data;
		self.gap_start = new_gap_start;
		self.gap_end = new_gap_start + new_gap_len;
		Ok(())
	}

	/// Ensures the gap can absorb `additional` bytes without reallocating.
	pub fn reserve_gap(&mut self, additional: usize) -> Result<(), TryReserveError> {
		if additional > self.gap_len() {
			self.reallocate(self.gap_start, additional + self.preferred_gap)?;
		}
		Ok(())
	}

	/// Positions the gap at `pos` with room for `len` bytes, reallocating if
	/// the current gap is too small.
	pub fn prepare_insert(&mut self, pos: usize, len: usize) -> Result<(), TryReserveError> {
		if len > self.gap_len() {
			self.reallocate(pos, len + self.preferred_gap)
		} else {
			if pos != self.gap_start {
				self.move_gap(pos);
			}
			Ok(())
		}
	}

	/// Inserts `text` at `pos`, which must be `<= len()`.
	pub fn insert(&mut self, pos: usize, text: &[u8]) -> Result<(), TryReserveError> {
		self.prepare_insert(pos, text.len())?;
		self.data[self.gap_start..self.gap_start + text.len()].copy_from_slice(text);
		self.gap_start += text.len();
		Ok(())
	}

	/// Removes `[start, end)` by widening the gap over it.
	pub fn delete(&mut self, start: usize, end: usize) {
		debug_assert!(start <= end && end <= self.len());
		if start > self.gap_start {
			self.move_gap(start);
		} else if end < self.gap_start {
			self.move_gap(end);
		}
		self.gap_end += end - self.gap_start;
		self.gap_start = start;
	}

	/// Moves the gap out of the way so the text is one contiguous slice.
	///
	/// The gap goes to whichever end requires moving fewer bytes.
	pub fn make_contiguous(&mut self) -> &[u8] {
		let len = self.len();
		if self.gap_start != 0 && self.gap_start != len {
			let suffix = len - self.gap_start;
			if self.gap_start < suffix {
				self.move_gap(0);
			} else {
				self.move_gap(len);
			}
		}
		let (head, tail) = self.as_slices();
		if head.is_empty() { tail } else { head }
	}

	/// Rewrites every occurrence of `from` to `to` in place.
	pub fn replace_byte(&mut self, from: u8, to: u8) {
		let (head, tail) = self.data.split_at_mut(self.gap_end);
		let head = &mut head[..self.gap_start];
		for b in head.iter_mut().chain(tail.iter_mut()) {
			if *b == from {
				*b = to;
			}
		}
	}

	/// Marks every byte value that occurs in the text.
	pub fn mark_used(&self, used: &mut [bool; 256]) {
		let (head, tail) = self.as_slices();
		for &b in head.iter().chain(tail) {
			used[b as usize] = true;
		}
	}

	/// First position `>= pos` holding `byte`.
	pub fn find_forward(&self, pos: usize, byte: u8) -> Option<usize> {
		let (head, tail) = self.slices(pos.min(self.len()), self.len());
		memchr(byte, head)
			.map(|i| pos + i)
			.or_else(|| memchr(byte, tail).map(|i| pos + head.len() + i))
	}

	/// Last position `< limit` holding `byte`.
	pub fn find_backward(&self, limit: usize, byte: u8) -> Option<usize> {
		let (head, tail) = self.slices(0, limit.min(self.len()));
		memrchr(byte, tail)
			.map(|i| head.len() + i)
			.or_else(|| memrchr(byte, head))
	}

	/// Position just past the `n`th occurrence of `byte` at or after `pos`.
	pub fn find_nth_forward(&self, pos: usize, byte: u8, n: usize) -> Option<usize> {
		if n == 0 {
			return Some(pos);
		}
		let (head, tail) = self.slices(pos.min(self.len()), self.len());
		let in_head = memchr_iter(byte, head).count();
		if n <= in_head {
			return memchr_iter(byte, head).nth(n - 1).map(|i| pos + i + 1);
		}
		memchr_iter(byte, tail)
			.nth(n - in_head - 1)
			.map(|i| pos + head.len() + i + 1)
	}

	/// Occurrences of `byte` in `[start, end)`.
	pub fn count(&self, start: usize, end: usize, byte: u8) -> usize {
		let (head, tail) = self.slices(start, end);
		memchr_iter(byte, head).count() + memchr_iter(byte, tail).count()
	}
}
