use std::cmp::{max, min};

/// A logical offset into a text buffer, measured in bytes.
///
/// Offsets are expressed in the ungapped coordinate space `[0, len]`; the
/// physical layout of the storage never leaks through this type.
pub type Pos = usize;

/// A half-open `[start, end)` span of buffer positions.
///
/// Used for redraw requests, rangeset entries and anything else that names
/// a stretch of text without caring about direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
	/// First position covered by the range.
	pub start: Pos,
	/// First position past the range.
	pub end: Pos,
}

impl TextRange {
	/// Creates a range from two positions in either order.
	pub fn new(a: Pos, b: Pos) -> Self {
		Self {
			start: min(a, b),
			end: max(a, b),
		}
	}

	/// Creates an empty range at `pos`.
	pub fn point(pos: Pos) -> Self {
		Self { start: pos, end: pos }
	}

	/// Number of positions covered.
	#[inline]
	pub fn len(&self) -> usize {
		self.end - self.start
	}

	/// Returns true if the range covers no positions.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Returns true if `pos` lies in `[start, end)`.
	#[inline]
	pub fn contains(&self, pos: Pos) -> bool {
		self.start <= pos && pos < self.end
	}

	/// Returns true if the two ranges share at least one position.
	pub fn overlaps(&self, other: &TextRange) -> bool {
		self.start < other.end && other.start < self.end
	}

	/// Smallest range enclosing both.
	pub fn cover(self, other: TextRange) -> TextRange {
		TextRange {
			start: min(self.start, other.start),
			end: max(self.end, other.end),
		}
	}

	/// Clamps both ends to `[0, len]`.
	pub fn clamp(self, len: usize) -> TextRange {
		TextRange {
			start: min(self.start, len),
			end: min(self.end, len),
		}
	}
}

impl From<std::ops::Range<Pos>> for TextRange {
	fn from(r: std::ops::Range<Pos>) -> Self {
		Self::new(r.start, r.end)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_orders_endpoints() {
		assert_eq!(TextRange::new(9, 3), TextRange { start: 3, end: 9 });
		assert_eq!(TextRange::new(9, 3).len(), 6);
	}

	#[test]
	fn contains_is_half_open() {
		let r = TextRange::new(2, 5);
		assert!(!r.contains(1));
		assert!(r.contains(2));
		assert!(r.contains(4));
		assert!(!r.contains(5));
		assert!(!TextRange::point(3).contains(3));
	}

	#[test]
	fn overlap_and_cover() {
		let a = TextRange::new(0, 10);
		let b = TextRange::new(10, 12);
		assert!(!a.overlaps(&b));
		assert!(a.overlaps(&TextRange::new(9, 11)));
		assert_eq!(a.cover(b), TextRange::new(0, 12));
	}

	#[test]
	fn clamp_to_length() {
		assert_eq!(TextRange::new(4, 40).clamp(10), TextRange::new(4, 10));
		assert_eq!(TextRange::new(20, 40).clamp(10), TextRange::point(10));
	}
}
