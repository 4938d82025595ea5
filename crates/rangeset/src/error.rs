//! Error types for rangeset operations.

use thiserror::Error;

use crate::label::Label;

/// Errors raised by the rangeset table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangesetError {
	/// The update policy name is not one of the known policies.
	#[error("unknown rangeset update policy {0:?}")]
	UnknownPolicy(String),

	/// The label does not name an active rangeset.
	#[error("rangeset {0} is not active")]
	InactiveLabel(Label),
}

/// Result type for rangeset operations.
pub type Result<T> = std::result::Result<T, RangesetError>;
