//! Gap-buffer text storage for the weft editor core.
//!
//! [`TextBuffer`] stores bytes in a [`GapStorage`], maintains three
//! selections across edits, notifies observers before deletions and after
//! every change, and supports rectangular editing by display column.

/// The editable buffer and its operations.
pub mod buffer;
/// Pure block rewrites behind the rectangular operations.
mod columnar;
/// Settings loaded from TOML.
pub mod config;
/// Buffer error types.
pub mod error;
/// Raw gap-buffer storage.
pub mod gap;
/// Observer callbacks and the events they receive.
pub mod observer;

pub use buffer::{ColumnEdit, TextBuffer};
pub use config::BufferConfig;
pub use error::{BufferError, Result};
pub use gap::{GapStorage, PREFERRED_GAP_SIZE};
pub use observer::{ModifyEvent, ModifyObserver, ObserverId, PreDeleteEvent, PreDeleteObserver};
pub use weft_primitives::{Pos, SelectionKind};
