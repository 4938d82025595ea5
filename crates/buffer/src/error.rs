//! Error types for buffer operations.

use std::collections::TryReserveError;

use thiserror::Error;

/// Errors that can occur while editing or configuring a buffer.
#[derive(Debug, Error)]
pub enum BufferError {
	/// Growing the gap buffer failed. The buffer is unchanged.
	#[error("failed to grow text storage: {0}")]
	Allocation(#[from] TryReserveError),

	/// The text contains NUL bytes and every candidate substitute byte is
	/// already in use by the buffer or the text. The buffer is unchanged.
	#[error("no unused byte left to stand in for NUL")]
	NullSubstitutionExhausted,

	/// Buffer configuration could not be parsed.
	#[error("invalid buffer configuration: {0}")]
	Config(#[from] toml::de::Error),

	/// Tab stops must be at least one column apart.
	#[error("tab distance must be at least 1, got {0}")]
	InvalidTabDistance(usize),
}

/// Result type for buffer operations.
pub type Result<T> = std::result::Result<T, BufferError>;
