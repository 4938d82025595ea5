//! The table of 63 rangeset slots owned by one buffer.
//!
//! Slots are fixed: a label always maps to the same slot, and activating
//! or forgetting a set only flips its bookkeeping. Active sets are kept in
//! priority order, most recently created first, and that order decides
//! which set wins when several cover the same position.
//!
//! A table is attached to its buffer as a high-priority modify observer so
//! that every set has followed an edit before any other observer reads the
//! buffer.


use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};
use weft_buffer::{ModifyEvent, ObserverId, TextBuffer};
use weft_primitives::{Pos, TextRange};

use crate::error::{RangesetError, Result};
use crate::interval::IntervalTable;
use crate::label::{Label, RANGESET_SLOTS};
use crate::rangeset::{ColorState, Rangeset};

/// Fixed-capacity collection of rangesets for one buffer.
#[derive(Debug)]
pub struct RangesetTable {
	sets: Vec<Rangeset>,
	/// Slot indices by priority; the first `active_count` are active.
	order: [u8; RANGESET_SLOTS],
	/// Position of each slot in `order`.
	depth: [u8; RANGESET_SLOTS],
	active: [bool; RANGESET_SLOTS],
	active_count: usize,
	buffer_len: Pos,
	observer: Option<ObserverId>,
}

impl Clone for RangesetTable {
	/// Copies every slot. The copy is not attached to any buffer.
	fn clone(&self) -> Self {
		Self {
			sets: self.sets.clone(),
			order: self.order,
			depth: self.depth,
			active: self.active,
			active_count: self.active_count,
			buffer_len: self.buffer_len,
			observer: None,
		}
	}
}

impl RangesetTable {
	/// An unattached table with every slot inactive, for a buffer of
	/// `buffer_len` bytes.
	pub fn new(buffer_len: Pos) -> Self {
		let mut order = [0; RANGESET_SLOTS];
		for (slot, entry) in order.iter_mut().enumerate() {
			*entry = slot as u8;
		}
		Self {
			sets: (0..RANGESET_SLOTS)
				.map(|slot| Rangeset::new(Label::from_slot(slot), buffer_len))
				.collect(),
			order,
			depth: order,
			active: [false; RANGESET_SLOTS],
			active_count: 0,
			buffer_len,
			observer: None,
		}
	}

	/// Creates a table for `buffer` and attaches it.
	pub fn attach(buffer: &mut TextBuffer) -> Rc<RefCell<Self>> {
		Self::new(buffer.len()).attach_to(buffer)
	}

	/// Attaches this table to `buffer`, which must hold the text the table's
	/// ranges refer to.
	///
	/// The returned handle is shared with the observer. It must not be
	/// borrowed while the buffer is being edited.
	pub fn attach_to(mut self, buffer: &mut TextBuffer) -> Rc<RefCell<Self>> {
		self.buffer_len = buffer.len();
		for set in &mut self.sets {
			set.set_max_pos(self.buffer_len);
		}
		let table = Rc::new(RefCell::new(self));
		let observed = Rc::clone(&table);
		let id = buffer.add_high_priority_modify_observer(move |buf, event| {
			observed.borrow_mut().on_modify(buf, event);
		});
		table.borrow_mut().observer = Some(id);
		debug!(?id, "rangeset.attach");
		table
	}

	/// Stops following `buffer`. Returns false if the table was not attached.
	pub fn detach(table: &RefCell<Self>, buffer: &mut TextBuffer) -> bool {
		let Some(id) = table.borrow_mut().observer.take() else {
			return false;
		};
		buffer.remove_modify_observer(id)
	}

	/// Activates the first free label and returns it, or `None` when all 63
	/// sets are in use.
	pub fn create(&mut self) -> Option<Label> {
		let Some(slot) = (0..RANGESET_SLOTS).find(|&slot| !self.active[slot]) else {
			debug!(active = self.active_count, "rangeset.exhausted");
			return None;
		};
		self.activate(slot);
		self.sets[slot].reset(self.buffer_len);
		let label = Label::from_slot(slot);
		trace!(%label, "rangeset.create");
		Some(label)
	}

	/// Empties and deactivates the set. Returns false if it was not active.
	pub fn forget(&mut self, label: Label) -> bool {
		let slot = label.slot();
		if !self.deactivate(slot) {
			return false;
		}
		self.sets[slot].clear();
		trace!(%label, "rangeset.forget");
		true
	}

	/// The active set with this label.
	pub fn fetch(&self, label: Label) -> Option<&Rangeset> {
		self.active[label.slot()].then(|| &self.sets[label.slot()])
	}

	/// The active set with this label, for editing.
	pub fn fetch_mut(&mut self, label: Label) -> Option<&mut Rangeset> {
		self.active[label.slot()].then(|| &mut self.sets[label.slot()])
	}

	/// Like [`Self::fetch_mut`], failing with
	/// [`RangesetError::InactiveLabel`].
	pub fn get_mut(&mut self, label: Label) -> Result<&mut Rangeset> {
		self.fetch_mut(label).ok_or(RangesetError::InactiveLabel(label))
	}

	/// Labels of the active sets in priority order.
	pub fn labels(&self) -> impl ExactSizeIterator<Item = Label> + '_ {
		self.order[..self.active_count]
			.iter()
			.map(|&slot| Label::from_slot(slot as usize))
	}

	/// Number of sets that can still be created.
	pub fn available(&self) -> usize {
		RANGESET_SLOTS - self.active_count
	}

	/// Merges the ranges of `src` into `dst`. Returns the new range count of
	/// `dst`.
	pub fn union(&mut self, dst: Label, src: Label) -> Result<usize> {
		let other = self.intervals_of(src)?;
		Ok(self.get_mut(dst)?.union_table(&other))
	}

	/// Removes the ranges of `src` from `dst`. Returns the new range count of
	/// `dst`.
	pub fn subtract(&mut self, dst: Label, src: Label) -> Result<usize> {
		let other = self.intervals_of(src)?;
		Ok(self.get_mut(dst)?.subtract_table(&other))
	}

	/// Runs every active set's policy for an edit that replaced `del` bytes
	/// at `pos` with `ins`.
	pub fn update_pos(&mut self, pos: Pos, ins: usize, del: usize) {
		if ins == 0 && del == 0 {
			return;
		}
		self.buffer_len = (self.buffer_len + ins).saturating_sub(del);
		for &slot in &self.order[..self.active_count] {
			self.sets[slot as usize].update_pos(pos, ins, del);
		}
	}

	/// Slot index of the highest-priority active set containing `pos`.
	///
	/// With `needs_color`, only sets with a colour name whose colour has not
	/// been found invalid are considered.
	pub fn highlight_index_at(&mut self, pos: Pos, needs_color: bool) -> Option<usize> {
		for &slot in &self.order[..self.active_count] {
			let set = &mut self.sets[slot as usize];
			if set.check_range_of_pos(pos).is_none() {
				continue;
			}
			let colored = set.color_name().is_some() && set.color_state() != ColorState::Invalid;
			if !needs_color || colored {
				return Some(slot as usize);
			}
		}
		None
	}

	/// Colour name of the set in `slot`.
	pub fn color_name(&self, slot: usize) -> Option<&str> {
		self.sets.get(slot)?.color_name()
	}

	/// Colour state of the set in `slot`.
	pub fn color_state(&self, slot: usize) -> Option<ColorState> {
		Some(self.sets.get(slot)?.color_state())
	}

	/// Records whether the colour of the set in `slot` resolved.
	pub fn set_color_valid(&mut self, slot: usize, ok: bool) {
		if let Some(set) = self.sets.get_mut(slot) {
			set.set_color_valid(ok);
		}
	}

	/// Drains the spans every set recorded for redisplay.
	pub fn take_refresh(&mut self) -> Vec<TextRange> {
		self.sets.iter_mut().flat_map(Rangeset::take_refresh).collect()
	}

	/// Forwards pending redisplay spans to `buffer`.
	///
	/// The table is released before the buffer notifies its observers.
	pub fn flush_refresh(table: &RefCell<Self>, buffer: &mut TextBuffer) {
		let pending = table.borrow_mut().take_refresh();
		for range in pending {
			buffer.check_display(range.start, range.end);
		}
	}

	fn intervals_of(&self, label: Label) -> Result<IntervalTable> {
		let set = self.fetch(label).ok_or(RangesetError::InactiveLabel(label))?;
		Ok(set.intervals().clone())
	}

	fn on_modify(&mut self, buffer: &TextBuffer, event: &ModifyEvent<'_>) {
		// same-length rewrite of identical text, e.g. a restyle
		if event.inserted == event.deleted && buffer.matches_at(event.pos, event.deleted_text) {
			return;
		}
		self.update_pos(event.pos, event.inserted, event.deleted);
	}

	fn activate(&mut self, slot: usize) -> bool {
		if self.active[slot] {
			return false;
		}
		let depth = self.depth[slot] as usize;
		for i in (1..=depth).rev() {
			let moved = self.order[i - 1];
			self.order[i] = moved;
			self.depth[moved as usize] = i as u8;
		}
		self.order[0] = slot as u8;
		self.depth[slot] = 0;
		self.active[slot] = true;
		self.active_count += 1;
		true
	}

	fn deactivate(&mut self, slot: usize) -> bool {
		if !self.active[slot] {
			return false;
		}
		let depth = self.depth[slot] as usize;
		let last = self.active_count - 1;
		for i in depth..last {
			let moved = self.order[i + 1];
			self.order[i] = moved;
			self.depth[moved as usize] = i as u8;
		}
		self.order[last] = slot as u8;
		self.depth[slot] = last as u8;
		self.active[slot] = false;
		self.active_count -= 1;
		true
	}
}
