//! Change notification for buffer observers.
//!
//! Observers are plain closures owned by the buffer. Pre-delete observers
//! run before bytes are removed, while the doomed text is still readable;
//! modify observers run after every mutation and after pure display
//! invalidations (`inserted == deleted == 0`, `restyled > 0`). Both lists are
//! invoked in registration order, except that high-priority modify observers
//! are placed ahead of everything registered before them.

use weft_primitives::Pos;

use crate::buffer::TextBuffer;

/// Handle returned when registering an observer, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// A completed buffer change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifyEvent<'a> {
	/// Where the change happened.
	pub pos: Pos,
	/// Bytes inserted at `pos`.
	pub inserted: usize,
	/// Bytes removed at `pos`.
	pub deleted: usize,
	/// Bytes from `pos` whose display must be refreshed without any text
	/// change.
	pub restyled: usize,
	/// The removed bytes (empty for pure insertions and restyles).
	pub deleted_text: &'a [u8],
}

impl ModifyEvent<'_> {
	/// True for a display invalidation that changed no text.
	pub fn is_restyle_only(&self) -> bool {
		self.inserted == 0 && self.deleted == 0
	}
}

/// Bytes about to be removed. The buffer still holds them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreDeleteEvent {
	/// Start of the doomed span.
	pub pos: Pos,
	/// Length of the doomed span; zero for pure insertions.
	pub deleted: usize,
}

/// Callback invoked after a change.
pub type ModifyObserver = Box<dyn FnMut(&TextBuffer, &ModifyEvent<'_>)>;

/// Callback invoked before bytes are removed.
pub type PreDeleteObserver = Box<dyn FnMut(&TextBuffer, &PreDeleteEvent)>;

#[derive(Default)]
pub(crate) struct ObserverRegistry {
	next_id: u64,
	pub(crate) modify: Vec<(ObserverId, ModifyObserver)>,
	pub(crate) pre_delete: Vec<(ObserverId, PreDeleteObserver)>,
}

impl ObserverRegistry {
	pub(crate) fn next_id(&mut self) -> ObserverId {
		self.next_id += 1;
		ObserverId(self.next_id)
	}
}

impl std::fmt::Debug for ObserverRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ObserverRegistry")
			.field("modify", &self.modify.len())
			.field("pre_delete", &self.pre_delete.len())
			.finish()
	}
}
