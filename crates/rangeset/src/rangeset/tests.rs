use pretty_assertions::assert_eq;

use super::*;

fn set(ranges: &[(Pos, Pos)]) -> Rangeset {
	let mut set = Rangeset::new(Label::from_slot(0), 100);
	for &(start, end) in ranges {
		set.add_between(start, end);
	}
	set.take_refresh();
	set
}

fn pairs(set: &Rangeset) -> Vec<(Pos, Pos)> {
	set.ranges().map(|r| (r.start, r.end)).collect()
}

fn spans(ranges: &[TextRange]) -> Vec<(Pos, Pos)> {
	ranges.iter().map(|r| (r.start, r.end)).collect()
}

#[test]
fn union_then_subtract() {
	let mut a = set(&[(0, 10)]);
	let b = set(&[(5, 15)]);

	assert_eq!(a.union(&b), 1);
	assert_eq!(pairs(&a), [(0, 15)]);
	assert_eq!(spans(&a.take_refresh()), [(10, 15)]);

	assert_eq!(a.subtract(&b), 1);
	assert_eq!(pairs(&a), [(0, 5)]);
	assert_eq!(spans(&a.take_refresh()), [(5, 15)]);
}

#[test]
fn union_with_empty_records_nothing() {
	let mut a = set(&[(0, 10)]);
	a.union(&set(&[]));
	assert_eq!(pairs(&a), [(0, 10)]);
	assert!(a.take_refresh().is_empty());
}

#[test]
fn subtract_refreshes_only_what_was_removed() {
	let mut a = set(&[(0, 10), (20, 30)]);
	let b = set(&[(5, 25), (40, 50)]);
	a.subtract(&b);
	assert_eq!(pairs(&a), [(0, 5), (25, 30)]);
	assert_eq!(spans(&a.take_refresh()), [(5, 10), (20, 25)]);
}

#[test]
fn edits_between_record_their_span() {
	let mut a = set(&[]);
	a.add_between(8, 3);
	a.remove_between(4, 4);
	a.remove_between(5, 6);
	assert_eq!(pairs(&a), [(3, 5), (6, 8)]);
	assert_eq!(spans(&a.take_refresh()), [(3, 8)]);
}

#[test]
fn repeated_edits_keep_one_pending_span() {
	let mut a = set(&[]);
	for _ in 0..10_000 {
		a.add_between(10, 20);
		a.remove_between(10, 20);
	}
	assert!(a.is_empty());
	assert_eq!(spans(&a.take_refresh()), [(10, 20)]);
}

#[test]
fn pending_spans_follow_later_edits() {
	let mut a = set(&[]);
	a.add_between(10, 20);
	a.add_between(40, 50);
	a.update_pos(0, 100, 0);
	a.update_pos(145, 0, 10);
	a.update_pos(112, 3, 0);
	assert_eq!(pairs(&a), [(110, 123), (143, 148)]);
	assert_eq!(spans(&a.take_refresh()), [(110, 123), (143, 148)]);
}

#[test]
fn invert_uses_buffer_length() {
	let mut a = set(&[(10, 20)]);
	assert_eq!(a.invert(), 2);
	assert_eq!(pairs(&a), [(0, 10), (20, 100)]);
	assert_eq!(spans(&a.take_refresh()), [(0, 100)]);
}

#[test]
fn update_tracks_buffer_length() {
	let mut a = set(&[(10, 20)]);
	a.update_pos(15, 5, 0);
	assert_eq!(a.max_pos(), 105);
	a.update_pos(0, 0, 10);
	assert_eq!(a.max_pos(), 95);
	assert_eq!(pairs(&a), [(0, 15)]);
}

#[test]
fn policy_by_name() {
	let mut a = set(&[(10, 20)]);
	a.set_policy_name("include").unwrap();
	assert_eq!(a.policy(), UpdatePolicy::Include);
	a.update_pos(10, 5, 0);
	assert_eq!(pairs(&a), [(10, 25)]);

	assert_eq!(
		a.set_policy_name("sticky"),
		Err(RangesetError::UnknownPolicy("sticky".into()))
	);
	assert_eq!(a.policy(), UpdatePolicy::Include);
}

#[test]
fn colour_name_resets_state_and_redraws() {
	let mut a = set(&[(1, 2), (5, 7)]);
	a.set_color_valid(true);
	a.set_color_name("red");
	assert_eq!(a.color_state(), ColorState::Unset);
	assert_eq!(a.color_name(), Some("red"));
	assert_eq!(spans(&a.take_refresh()), [(1, 2), (5, 7)]);

	a.set_color_name("");
	assert_eq!(a.color_name(), None);
}

#[test]
fn clear_redraws_only_valid_colour() {
	let mut plain = set(&[(1, 2)]);
	plain.set_name("notes");
	plain.clear();
	assert!(plain.take_refresh().is_empty());
	assert_eq!(plain.name(), None);
	assert!(plain.is_empty());

	let mut coloured = set(&[(1, 2), (4, 6)]);
	coloured.set_color_name("blue");
	coloured.set_color_valid(true);
	coloured.take_refresh();
	coloured.clear();
	assert_eq!(spans(&coloured.take_refresh()), [(1, 2), (4, 6)]);
	assert_eq!(coloured.color_state(), ColorState::Invalid);
	assert_eq!(coloured.color_name(), None);
}

#[test]
fn info_reports_empty_strings_for_unset_fields() {
	let mut a = set(&[(1, 2)]);
	let info = a.info();
	assert_eq!((info.count, info.name, info.color_name), (1, "", ""));
	assert_eq!(info.policy, UpdatePolicy::InsDel);

	a.set_name("todo");
	a.set_policy(UpdatePolicy::Break);
	assert_eq!(a.info().name, "todo");
	assert_eq!(a.info().policy.to_string(), "break");
}

#[test]
fn range_by_index() {
	let a = set(&[(1, 2), (4, 6)]);
	assert_eq!(a.range(1), Some(TextRange::new(4, 6)));
	assert_eq!(a.range(2), None);
	assert_eq!(a.find_range_of_pos(6, true), Some(1));
	assert_eq!(a.find_range_of_pos(6, false), None);
}
