//! NUL handling.
//!
//! Text may contain `\0`, but consumers that treat the buffer as a C-style
//! string cannot see it, so the buffer stores every NUL as a rarely used
//! control byte, the *null substitute*. The substitute is chosen lazily and
//! changes when inserted text already uses it.

use std::borrow::Cow;

use memchr::{memchr, memchr2};
use tracing::debug;

use super::TextBuffer;
use crate::error::{BufferError, Result};

/// Substitute candidates in order of preference: control codes that rarely
/// appear in real text.
const SUBSTITUTE_CANDIDATES: [u8; 25] = [
	1, 2, 3, 4, 5, 6, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 28, 29, 30, 31, 11, 7,
];

impl TextBuffer {
	/// Replaces every `\0` in `text` with the buffer's null substitute.
	///
	/// If `text` already contains the current substitute, a byte unused by
	/// both the buffer and `text` is adopted instead and the buffer's
	/// existing substitutes are rewritten to it. Fails without touching the
	/// buffer or `text` when no candidate is free.
	pub fn substitute_nulls(&mut self, text: &mut [u8]) -> Result<()> {
		let mut used = [false; 256];
		for &b in text.iter() {
			used[b as usize] = true;
		}

		if used[self.null_subs_char as usize] {
			self.storage.mark_used(&mut used);
			let Some(&subs) = SUBSTITUTE_CANDIDATES.iter().find(|&&c| !used[c as usize]) else {
				return Err(BufferError::NullSubstitutionExhausted);
			};
			debug!(old = self.null_subs_char, new = subs, "buffer.null_subs_changed");
			self.storage.replace_byte(self.null_subs_char, subs);
			self.null_subs_char = subs;
		}

		if used[0] {
			let subs = self.null_subs_char;
			text.iter_mut().filter(|b| **b == 0).for_each(|b| *b = subs);
		}
		Ok(())
	}

	/// Turns substitutes in `text` back into `\0`.
	pub fn unsubstitute_nulls(&self, text: &mut [u8]) {
		let subs = self.null_subs_char;
		if subs == 0 {
			return;
		}
		text.iter_mut().filter(|b| **b == subs).for_each(|b| *b = 0);
	}

	/// Copy of `[start, end)` with substitutes turned back into `\0`.
	pub fn range_with_nulls(&self, start: usize, end: usize) -> Vec<u8> {
		let mut text = self.range(start, end);
		self.unsubstitute_nulls(&mut text);
		text
	}

	/// `text` as it will be stored: borrowed when it needs no substitution.
	pub(super) fn prepare_text<'a>(&mut self, text: &'a [u8]) -> Result<Cow<'a, [u8]>> {
		let needs_subs = match self.null_subs_char {
			0 => memchr(0, text).is_some(),
			subs => memchr2(0, subs, text).is_some(),
		};
		if !needs_subs {
			return Ok(Cow::Borrowed(text));
		}
		let mut owned = text.to_vec();
		self.substitute_nulls(&mut owned)?;
		Ok(Cow::Owned(owned))
	}
}
