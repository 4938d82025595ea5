//! Sorted tables of disjoint half-open ranges.
//!
//! An [`IntervalTable`] stores its ranges flattened as
//! `[s0, e0, s1, e1, ...]`, so every even index holds a range start and
//! every odd index the matching end, with the whole array non-decreasing.
//! Edit maintenance then reduces to finding the first boundary at or after
//! a position and shifting the tail of the array by the net length change.


use weft_primitives::{Pos, TextRange};

use crate::policy::UpdatePolicy;

#[inline]
fn is_start(index: usize) -> bool {
	index % 2 == 0
}

#[inline]
fn is_end(index: usize) -> bool {
	index % 2 == 1
}

/// Index of the first entry of `table[base..]` that is `>= val`, or
/// `table.len()` if there is none.
pub fn at_or_before(table: &[Pos], base: usize, val: Pos) -> usize {
	if base >= table.len() {
		return table.len();
	}
	base + table[base..].partition_point(|&x| x < val)
}

/// Interpolation search over `table[base..len]`.
///
/// Returns an index whose entry equals `val` if there is one, otherwise the
/// index of the first entry greater than `val`, or `len` if every entry is
/// smaller.
pub fn weighted_at_or_before(table: &[Pos], base: usize, len: usize, val: Pos) -> usize {
	if base >= len {
		return len;
	}

	let mut lo = base as isize;
	let mut hi = len as isize - 1;
	let mut min = table[base];
	let mut max = table[len - 1];

	if val <= min {
		return base;
	} else if val > max {
		return len;
	} else if val == max {
		return len - 1;
	}

	let mut mid = lo;
	while lo <= hi {
		let fraction = (val - min) as f64 / (max - min) as f64;
		mid = lo + ((hi - lo) as f64 * fraction) as isize;
		let probe = table[mid as usize];
		if val == probe {
			return mid as usize;
		}
		if val < probe {
			hi = mid - 1;
			max = probe;
		} else {
			lo = mid + 1;
			min = probe;
		}
	}

	let mid = mid as usize;
	if val > table[mid] { mid + 1 } else { mid }
}

/// Moves `n` entries from `from` to `to`, adding `delta` to each.
///
/// Copies in whichever direction keeps overlapping source entries intact.
fn shuffle(table: &mut [Pos], to: usize, from: usize, n: usize, delta: isize) {
	if n == 0 {
		return;
	}
	if to < from {
		for k in 0..n {
			table[to + k] = table[from + k].saturating_add_signed(delta);
		}
	} else if to > from {
		for k in (0..n).rev() {
			table[to + k] = table[from + k].saturating_add_signed(delta);
		}
	} else if delta != 0 {
		for entry in &mut table[to..to + n] {
			*entry = entry.saturating_add_signed(delta);
		}
	}
}

/// An ordered set of disjoint `[start, end)` ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalTable {
	bounds: Vec<Pos>,
	last_index: usize,
}

impl IntervalTable {
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a table from ranges that are already sorted and disjoint.
	pub fn from_sorted(ranges: impl IntoIterator<Item = TextRange>) -> Self {
		let bounds = ranges.into_iter().flat_map(|r| [r.start, r.end]).collect();
		Self {
			bounds,
			last_index: 0,
		}
	}

	/// Number of ranges.
	pub fn len(&self) -> usize {
		self.bounds.len() / 2
	}

	/// Returns true if the table holds no ranges.
	pub fn is_empty(&self) -> bool {
		self.bounds.is_empty()
	}

	/// The `index`th range in ascending order.
	pub fn get(&self, index: usize) -> Option<TextRange> {
		let start = *self.bounds.get(2 * index)?;
		let end = *self.bounds.get(2 * index + 1)?;
		Some(TextRange { start, end })
	}

	/// The ranges in ascending order.
	pub fn iter(&self) -> impl ExactSizeIterator<Item = TextRange> + '_ {
		self.bounds
			.chunks_exact(2)
			.map(|pair| TextRange { start: pair[0], end: pair[1] })
	}

	/// The flattened boundary array.
	pub fn bounds(&self) -> &[Pos] {
		&self.bounds
	}

	/// The range index the last hinted lookup stopped at.
	pub fn last_index(&self) -> usize {
		self.last_index
	}

	/// Removes every range.
	pub fn clear(&mut self) {
		self.bounds.clear();
		self.last_index = 0;
	}

	/// Index of the range containing `pos`.
	///
	/// A position equal to a range's end counts only when `include_end` is
	/// set.
	pub fn find_range_of_pos(&self, pos: Pos, include_end: bool) -> Option<usize> {
		let table = &self.bounds;
		let ind = at_or_before(table, 0, pos);
		if ind == table.len() {
			return None;
		}
		if is_end(ind) {
			if pos < table[ind] || (include_end && pos == table[ind]) {
				return Some(ind / 2);
			}
			// an adjacent range may start where this one ends
			if table.get(ind + 1) == Some(&pos) {
				return Some(ind / 2 + 1);
			}
		} else if pos == table[ind] {
			return Some(ind / 2);
		}
		None
	}

	/// Like [`Self::find_range_of_pos`] without `include_end`, but starts
	/// from the range found by the previous lookup and narrows with an
	/// interpolation search. Updates the hint.
	pub fn check_range_of_pos(&mut self, pos: Pos) -> Option<usize> {
		let count = self.len();
		if count == 0 {
			return None;
		}
		if self.last_index >= count {
			self.last_index = count - 1;
		}

		let table = &self.bounds;
		let len = table.len();
		let mut last = 2 * self.last_index;

		let index = if pos >= table[last] {
			if pos < table[last + 1] {
				return Some(last / 2);
			}
			last += 2;
			if last == len {
				return None;
			}
			weighted_at_or_before(table, last, len, pos)
		} else if last > 0 {
			weighted_at_or_before(table, 0, last, pos)
		} else {
			0
		};

		self.last_index = index / 2;
		if index == len {
			return None;
		}
		let hit = if is_end(index) {
			pos < table[index]
		} else {
			pos == table[index]
		};
		hit.then_some(index / 2)
	}

	/// Index of the first boundary `>= pos`, searching from the hint.
	/// Updates the hint.
	fn hinted_at_or_before(&mut self, pos: Pos) -> usize {
		let count = self.len();
		if count == 0 {
			return 0;
		}
		let last = if self.last_index >= count { 0 } else { 2 * self.last_index };
		let len = self.bounds.len();
		let index = if pos >= self.bounds[last] {
			weighted_at_or_before(&self.bounds, last, len, pos)
		} else {
			weighted_at_or_before(&self.bounds, 0, last, pos)
		};
		self.last_index = index / 2;
		index
	}

	/// Adds `[start, end)`, merging it with every range it overlaps or
	/// touches. The endpoints may come in either order.
	///
	/// Returns the span whose coverage may have changed, or `None` when the
	/// table is unchanged.
	pub fn add_between(&mut self, start: Pos, end: Pos) -> Option<TextRange> {
		let (start, end) = if start > end { (end, start) } else { (start, end) };
		if start == end {
			return None;
		}

		let n = self.bounds.len();
		let mut i = if n == 0 { 0 } else { self.hinted_at_or_before(start) };
		if i == n {
			self.bounds.extend([start, end]);
			return Some(TextRange { start, end });
		}

		let mut j = i;
		while j < n && self.bounds[j] <= end {
			j += 1;
		}

		if i == j {
			if is_end(i) {
				// already covered
				return None;
			}
			self.bounds.resize(n + 2, 0);
			shuffle(&mut self.bounds, i + 2, i, n - i, 0);
			self.bounds[i] = start;
			self.bounds[i + 1] = end;
		} else {
			if is_start(i) {
				self.bounds[i] = start;
				i += 1;
			}
			if is_start(j) {
				j -= 1;
				self.bounds[j] = end;
			}
			if i < j {
				shuffle(&mut self.bounds, i, j, n - j, 0);
			}
			self.bounds.truncate(n - (j - i));
		}
		Some(TextRange { start, end })
	}

	/// Removes `[start, end)` from the table, trimming or splitting the
	/// ranges it overlaps. The endpoints may come in either order.
	///
	/// Returns the span whose coverage may have changed, or `None` when the
	/// table is unchanged.
	pub fn remove_between(&mut self, start: Pos, end: Pos) -> Option<TextRange> {
		let (start, end) = if start > end { (end, start) } else { (start, end) };
		if start == end {
			return None;
		}

		let n = self.bounds.len();
		let mut i = self.hinted_at_or_before(start);
		if i == n {
			return None;
		}

		let mut j = i;
		while j < n && self.bounds[j] <= end {
			j += 1;
		}

		if i == j {
			if is_start(i) {
				// falls between ranges
				return None;
			}
			i -= 1;
			self.bounds.resize(n + 2, 0);
			shuffle(&mut self.bounds, i + 2, i, n - i, 0);
			self.bounds[i + 1] = start;
			self.bounds[i + 2] = end;
		} else {
			if is_end(i) {
				self.bounds[i] = start;
				i += 1;
			}
			if is_end(j) {
				j -= 1;
				self.bounds[j] = end;
			}
			if i < j {
				shuffle(&mut self.bounds, i, j, n - j, 0);
			}
			self.bounds.truncate(n - (j - i));
		}
		Some(TextRange { start, end })
	}

	/// Replaces the table with its complement within `[0, max_pos)`.
	pub fn invert(&mut self, max_pos: Pos) {
		if self.bounds.is_empty() {
			if max_pos > 0 {
				self.bounds.extend([0, max_pos]);
			}
			return;
		}

		let mut n = self.bounds.len();
		let has_zero = self.bounds[0] == 0;
		let has_end = self.bounds[n - 1] == max_pos;
		self.bounds.extend([max_pos, max_pos]);

		if has_zero {
			shuffle(&mut self.bounds, 0, 1, n, 0);
			n -= 1;
		} else {
			shuffle(&mut self.bounds, 1, 0, n, 0);
			self.bounds[0] = 0;
			n += 1;
		}
		if has_end {
			n -= 1;
		} else {
			n += 1;
		}
		self.bounds.truncate(n);
	}

	/// Union of `self` and `other`; ranges that overlap or touch are merged.
	pub fn union(&self, other: &IntervalTable) -> IntervalTable {
		let mut merged: Vec<TextRange> = Vec::with_capacity(self.len() + other.len());
		let mut a = self.iter().peekable();
		let mut b = other.iter().peekable();
		loop {
			let next = match (a.peek().copied(), b.peek().copied()) {
				(Some(x), Some(y)) if x.start <= y.start => a.next(),
				(Some(_), Some(_)) => b.next(),
				(Some(_), None) => a.next(),
				(None, Some(_)) => b.next(),
				(None, None) => break,
			};
			let Some(range) = next else { break };
			match merged.last_mut() {
				Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
				_ => merged.push(range),
			}
		}
		IntervalTable::from_sorted(merged)
	}

	/// The parts of `self` not covered by `other`.
	pub fn difference(&self, other: &IntervalTable) -> IntervalTable {
		let minus: Vec<TextRange> = other.iter().collect();
		let mut out = Vec::with_capacity(self.len() + minus.len());
		let mut k = 0;
		for range in self.iter() {
			while let Some(m) = minus.get(k)
				&& m.end <= range.start
			{
				k += 1;
			}
			let mut start = range.start;
			for m in &minus[k..] {
				if m.start >= range.end || start >= range.end {
					break;
				}
				if m.start > start {
					out.push(TextRange { start, end: m.start });
				}
				start = start.max(m.end);
			}
			if start < range.end {
				out.push(TextRange { start, end: range.end });
			}
		}
		IntervalTable::from_sorted(out)
	}

	/// Adjusts the ranges for an edit that deleted `del` bytes at `pos` and
	/// inserted `ins` in their place.
	pub fn update(&mut self, policy: UpdatePolicy, pos: Pos, ins: usize, del: usize) {
		match policy {
			UpdatePolicy::InsDel => self.extend_update(pos, ins, del, Boundary::InsertFirst, false),
			UpdatePolicy::Include => self.extend_update(pos, ins, del, Boundary::InsertFirst, true),
			UpdatePolicy::DelIns => self.extend_update(pos, ins, del, Boundary::DeleteFirst, false),
			UpdatePolicy::Exclude => self.extend_update(pos, ins, del, Boundary::DeleteFirst, true),
			UpdatePolicy::Break => self.break_update(pos, ins, del),
		}
	}

	/// Shared body of the four non-splitting policies.
	///
	/// `nudge` moves the first affected boundary past one sitting exactly at
	/// `pos`: a range start for insert-first policies (so the insertion
	/// extends that range), a range end for delete-first ones (so it does
	/// not).
	fn extend_update(&mut self, pos: Pos, ins: usize, del: usize, order: Boundary, nudge: bool) {
		let n = self.bounds.len();
		let mut i = self.hinted_at_or_before(pos);
		if i == n {
			return;
		}

		if nudge && ins > 0 && self.bounds[i] == pos {
			let skip = match order {
				Boundary::InsertFirst => is_start(i),
				Boundary::DeleteFirst => is_end(i),
			};
			if skip {
				i += 1;
			}
		}

		let end_del = pos + del;
		let movement = ins as isize - del as isize;

		let mut j = i;
		while j < n && self.bounds[j] <= end_del {
			j += 1;
		}

		if j > i {
			self.bounds[i] = match order {
				Boundary::InsertFirst => pos + ins,
				// inserted text joins a range only if the deletion ended inside it
				Boundary::DeleteFirst if is_end(j) => pos + ins,
				Boundary::DeleteFirst => pos,
			};
		}

		if is_start(i) != is_start(j) {
			i += 1;
		}

		shuffle(&mut self.bounds, i, j, n - j, movement);
		self.bounds.truncate(n - (j - i));
	}

	fn break_update(&mut self, pos: Pos, ins: usize, del: usize) {
		let n = self.bounds.len();
		let mut i = self.hinted_at_or_before(pos);
		if i == n {
			return;
		}

		if is_end(i) && self.bounds[i] == pos && ins > 0 {
			i += 1;
		}

		let end_del = pos + del;
		let movement = ins as isize - del as isize;

		let mut j = i;
		while j < n && self.bounds[j] <= end_del {
			j += 1;
		}

		if j > i {
			self.bounds[i] = pos;
		}

		// i and j both ends: the edit sits inside the range they close, which
		// the insertion splits in two
		let need_gap = is_end(i) && is_end(j) && ins > 0;

		if is_start(i) != is_start(j) {
			if is_start(i) && self.bounds[i] == pos {
				self.bounds[i] = pos + ins;
			}
			i += 1;
		}

		if need_gap {
			i += 2;
			self.bounds.resize(n + 2, 0);
		}

		shuffle(&mut self.bounds, i, j, n - j, movement);

		if need_gap {
			self.bounds[i - 2] = pos;
			self.bounds[i - 1] = pos + ins;
		}

		self.bounds.truncate(n + i - j);
	}
}

#[derive(Debug, Clone, Copy)]
enum Boundary {
	InsertFirst,
	DeleteFirst,
}
