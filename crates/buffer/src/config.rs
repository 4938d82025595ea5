//! Buffer settings loaded from TOML.

use serde::Deserialize;

use crate::error::{BufferError, Result};
use crate::gap::PREFERRED_GAP_SIZE;

/// Initial settings for a [`TextBuffer`](crate::TextBuffer).
///
/// ```toml
/// tab-distance = 4
/// use-tabs = false
/// preferred-gap = 256
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BufferConfig {
	/// Columns between tab stops.
	pub tab_distance: usize,
	/// Whether columnar operations may emit tabs when padding.
	pub use_tabs: bool,
	/// Extra gap bytes reserved whenever the storage grows.
	pub preferred_gap: usize,
}

impl Default for BufferConfig {
	fn default() -> Self {
		Self {
			tab_distance: 8,
			use_tabs: true,
			preferred_gap: PREFERRED_GAP_SIZE,
		}
	}
}

impl BufferConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml(src: &str) -> Result<Self> {
		let config: Self = toml::from_str(src)?;
		config.validate()?;
		Ok(config)
	}

	/// Rejects settings a buffer cannot honor.
	pub fn validate(&self) -> Result<()> {
		if self.tab_distance == 0 {
			return Err(BufferError::InvalidTabDistance(self.tab_distance));
		}
		Ok(())
	}
}
