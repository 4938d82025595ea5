//! Rangeset labels.

use std::fmt;

/// Number of rangeset slots in a table.
pub const RANGESET_SLOTS: usize = 63;

/// Every valid label, in the order `create` hands them out. A label's
/// position in this table is also its slot index.
pub const LABELS: [u8; RANGESET_SLOTS] = [
	58, 10, 15, 1, 27, 52, 14, 3, 61, 13, 31, 30, 45, 28, 41, 55, 33, 20, 62, 34, 42, 18, 57, 47,
	24, 49, 19, 50, 25, 38, 40, 2, 21, 39, 59, 22, 60, 4, 6, 16, 29, 37, 48, 46, 54, 43, 32, 56,
	51, 7, 9, 63, 5, 8, 36, 44, 26, 11, 23, 17, 53, 35, 12,
];

/// Identifies a rangeset within its table: a number from 1 to 63.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label {
	slot: u8,
}

impl Label {
	/// The label with value `value`, or `None` if no slot carries it.
	pub fn new(value: u8) -> Option<Self> {
		LABELS
			.iter()
			.position(|&l| l == value)
			.map(Self::from_slot)
	}

	pub(crate) fn from_slot(slot: usize) -> Self {
		debug_assert!(slot < RANGESET_SLOTS);
		Self { slot: slot as u8 }
	}

	/// The numeric label.
	pub fn value(self) -> u8 {
		LABELS[self.slot as usize]
	}

	/// Index of the slot this label names.
	pub fn slot(self) -> usize {
		self.slot as usize
	}
}

/// Returns true if `value` is a valid rangeset label.
pub fn label_ok(value: u8) -> bool {
	Label::new(value).is_some()
}

impl fmt::Debug for Label {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Label({})", self.value())
	}
}

impl fmt::Display for Label {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.value())
	}
}
