//! A single labelled rangeset.

#[cfg(test)]
mod tests;

use std::str::FromStr;

use tracing::trace;
use weft_primitives::{Pos, TextRange};

use crate::error::{RangesetError, Result};
use crate::interval::IntervalTable;
use crate::label::Label;
use crate::policy::UpdatePolicy;

/// Whether a rangeset's colour has been resolved by its highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorState {
	/// No colour looked up yet.
	#[default]
	Unset,
	/// The colour name resolved to a usable colour.
	Valid,
	/// The colour name could not be resolved; draw the ranges plainly.
	Invalid,
}

/// Summary of a rangeset for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangesetInfo<'a> {
	/// The set's label.
	pub label: Label,
	/// Number of ranges.
	pub count: usize,
	/// Assigned colour name, or empty.
	pub color_name: &'a str,
	/// Assigned name, or empty.
	pub name: &'a str,
	/// Update policy.
	pub policy: UpdatePolicy,
}

/// A labelled set of disjoint ranges that follows buffer edits.
///
/// Operations that change what is covered record the affected spans; the
/// owning table hands them to the buffer for redisplay. Pending spans are
/// merged as they are recorded and follow later edits like the ranges do.
#[derive(Debug, Clone)]
pub struct Rangeset {
	label: Label,
	ranges: IntervalTable,
	max_pos: Pos,
	policy: UpdatePolicy,
	name: Option<String>,
	color_name: Option<String>,
	color: ColorState,
	refresh: IntervalTable,
}

impl Rangeset {
	/// An empty set for a buffer of `max_pos` bytes.
	pub fn new(label: Label, max_pos: Pos) -> Self {
		Self {
			label,
			ranges: IntervalTable::new(),
			max_pos,
			policy: UpdatePolicy::default(),
			name: None,
			color_name: None,
			color: ColorState::Unset,
			refresh: IntervalTable::new(),
		}
	}

	/// The label this set was created under.
	pub fn label(&self) -> Label {
		self.label
	}

	/// Number of ranges.
	pub fn len(&self) -> usize {
		self.ranges.len()
	}

	/// True when the set covers nothing.
	pub fn is_empty(&self) -> bool {
		self.ranges.is_empty()
	}

	/// The `index`th range.
	pub fn range(&self, index: usize) -> Option<TextRange> {
		self.ranges.get(index)
	}

	/// All ranges in ascending order.
	pub fn ranges(&self) -> impl ExactSizeIterator<Item = TextRange> + '_ {
		self.ranges.iter()
	}

	pub(crate) fn intervals(&self) -> &IntervalTable {
		&self.ranges
	}

	/// Buffer length as of the last edit the set saw.
	pub fn max_pos(&self) -> Pos {
		self.max_pos
	}

	/// How the set follows edits.
	pub fn policy(&self) -> UpdatePolicy {
		self.policy
	}

	/// Changes how the set follows later edits.
	pub fn set_policy(&mut self, policy: UpdatePolicy) {
		self.policy = policy;
	}

	/// Selects the update policy by name (`maintain`, `ins_del`, `include`,
	/// `del_ins`, `exclude` or `break`).
	pub fn set_policy_name(&mut self, name: &str) -> Result<()> {
		self.policy = UpdatePolicy::from_str(name)
			.map_err(|_| RangesetError::UnknownPolicy(name.to_owned()))?;
		Ok(())
	}

	/// The set's name, if one was given.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Names the set. An empty name clears it.
	pub fn set_name(&mut self, name: &str) {
		self.name = (!name.is_empty()).then(|| name.to_owned());
	}

	/// The assigned colour name, if any.
	pub fn color_name(&self) -> Option<&str> {
		self.color_name.as_deref()
	}

	/// Assigns a colour name (empty clears it) and marks the colour for
	/// lookup again. Every range is redrawn.
	pub fn set_color_name(&mut self, color_name: &str) {
		self.color_name = (!color_name.is_empty()).then(|| color_name.to_owned());
		self.color = ColorState::Unset;
		self.refresh_all();
	}

	/// Whether the colour name has been resolved.
	pub fn color_state(&self) -> ColorState {
		self.color
	}

	/// Records whether the colour name resolved.
	pub fn set_color_valid(&mut self, ok: bool) {
		self.color = if ok { ColorState::Valid } else { ColorState::Invalid };
	}

	/// Label, range count, colour, name and policy in one record.
	pub fn info(&self) -> RangesetInfo<'_> {
		RangesetInfo {
			label: self.label,
			count: self.len(),
			color_name: self.color_name().unwrap_or(""),
			name: self.name().unwrap_or(""),
			policy: self.policy,
		}
	}

	/// Index of the range containing `pos`, counting a range's end only if
	/// `include_end` is set.
	pub fn find_range_of_pos(&self, pos: Pos, include_end: bool) -> Option<usize> {
		self.ranges.find_range_of_pos(pos, include_end)
	}

	/// Fast repeated lookup for nearby positions; see
	/// [`IntervalTable::check_range_of_pos`].
	pub fn check_range_of_pos(&mut self, pos: Pos) -> Option<usize> {
		self.ranges.check_range_of_pos(pos)
	}

	/// Adds `[start, end)`. Returns the new number of ranges.
	pub fn add_between(&mut self, start: Pos, end: Pos) -> usize {
		if let Some(changed) = self.ranges.add_between(start, end) {
			self.mark_refresh(changed);
		}
		self.len()
	}

	/// Removes `[start, end)`. Returns the new number of ranges.
	pub fn remove_between(&mut self, start: Pos, end: Pos) -> usize {
		if let Some(changed) = self.ranges.remove_between(start, end) {
			self.mark_refresh(changed);
		}
		self.len()
	}

	/// Merges `other`'s ranges into this set. Returns the new number of
	/// ranges.
	pub fn union(&mut self, other: &Rangeset) -> usize {
		self.union_table(&other.ranges)
	}

	pub(crate) fn union_table(&mut self, other: &IntervalTable) -> usize {
		if other.is_empty() {
			return self.len();
		}
		let added = other.difference(&self.ranges);
		self.ranges = self.ranges.union(other);
		added.iter().for_each(|range| self.mark_refresh(range));
		self.len()
	}

	/// Removes `other`'s ranges from this set. Returns the new number of
	/// ranges.
	pub fn subtract(&mut self, other: &Rangeset) -> usize {
		self.subtract_table(&other.ranges)
	}

	pub(crate) fn subtract_table(&mut self, other: &IntervalTable) -> usize {
		if self.is_empty() || other.is_empty() {
			return self.len();
		}
		let kept = self.ranges.difference(other);
		let removed = self.ranges.difference(&kept);
		self.ranges = kept;
		removed.iter().for_each(|range| self.mark_refresh(range));
		self.len()
	}

	/// Replaces the set with its complement within `[0, max_pos)`.
	pub fn invert(&mut self) -> usize {
		self.ranges.invert(self.max_pos);
		self.mark_refresh(TextRange::new(0, self.max_pos));
		self.len()
	}

	/// Follows a buffer edit that replaced `del` bytes at `pos` with `ins`.
	pub fn update_pos(&mut self, pos: Pos, ins: usize, del: usize) {
		trace!(label = %self.label, pos, ins, del, policy = %self.policy, "rangeset.update");
		self.ranges.update(self.policy, pos, ins, del);
		// text inserted inside a pending span is redrawn with it
		self.refresh.update(UpdatePolicy::Include, pos, ins, del);
		self.max_pos = (self.max_pos + ins).saturating_sub(del);
	}

	/// Empties the set and drops its name and colour. If its ranges were
	/// being drawn in colour they are redrawn.
	pub fn clear(&mut self) {
		if self.color_name.is_some() && self.color == ColorState::Valid {
			self.color = ColorState::Invalid;
			self.refresh_all();
		}
		self.color_name = None;
		self.name = None;
		self.ranges.clear();
	}

	/// Drains the spans recorded for redisplay.
	pub fn take_refresh(&mut self) -> Vec<TextRange> {
		let pending = std::mem::take(&mut self.refresh);
		pending.iter().collect()
	}

	/// Adopts the length of a buffer the set is moved to.
	pub(crate) fn set_max_pos(&mut self, max_pos: Pos) {
		self.max_pos = max_pos;
	}

	/// Reinitializes the slot for reuse.
	pub(crate) fn reset(&mut self, max_pos: Pos) {
		let refresh = std::mem::take(&mut self.refresh);
		*self = Self::new(self.label, max_pos);
		self.refresh = refresh;
	}

	fn refresh_all(&mut self) {
		for range in self.ranges.iter() {
			self.refresh.add_between(range.start, range.end);
		}
	}

	fn mark_refresh(&mut self, range: TextRange) {
		self.refresh.add_between(range.start, range.end);
	}
}
