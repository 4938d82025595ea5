//! How a rangeset follows edits to its buffer.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Rule for adjusting a rangeset's ranges when text changes.
///
/// Every policy shifts ranges after the edit by the net length change and
/// shrinks or merges ranges the deletion covers. They differ in whether
/// text inserted at or near a range boundary joins that range.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum UpdatePolicy {
	/// Insertions inside a range or at its end extend it; insertions at its
	/// start do not. Text is treated as inserted before it is deleted.
	#[default]
	#[strum(to_string = "ins_del", serialize = "maintain")]
	InsDel,
	/// Like [`UpdatePolicy::InsDel`], but insertions at a range's start
	/// extend it too.
	Include,
	/// Inserted text joins a range only when the deletion both starts and
	/// ends inside it. Text is treated as deleted before it is inserted.
	DelIns,
	/// Like [`UpdatePolicy::DelIns`], but an edit at a range's end never
	/// extends it.
	Exclude,
	/// Insertions strictly inside a range split it; inserted text never
	/// belongs to a range.
	Break,
}
