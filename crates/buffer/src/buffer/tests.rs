use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use weft_primitives::{SelectionKind, SelectionSpan};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Seen {
	PreDelete(Pos, usize),
	Modify {
		pos: Pos,
		inserted: usize,
		deleted: usize,
		restyled: usize,
		deleted_text: Vec<u8>,
	},
}

fn modified(
	pos: Pos,
	inserted: usize,
	deleted: usize,
	restyled: usize,
	deleted_text: &[u8],
) -> Seen {
	Seen::Modify {
		pos,
		inserted,
		deleted,
		restyled,
		deleted_text: deleted_text.to_vec(),
	}
}

fn record(buf: &mut TextBuffer) -> Rc<RefCell<Vec<Seen>>> {
	let log = Rc::new(RefCell::new(Vec::new()));
	let pre = Rc::clone(&log);
	buf.add_pre_delete_observer(move |_, ev| {
		pre.borrow_mut().push(Seen::PreDelete(ev.pos, ev.deleted));
	});
	let post = Rc::clone(&log);
	buf.add_modify_observer(move |_, ev| {
		post.borrow_mut()
			.push(modified(ev.pos, ev.inserted, ev.deleted, ev.restyled, ev.deleted_text))
	});
	log
}

fn buffer(text: &str) -> TextBuffer {
	TextBuffer::from_bytes(text.as_bytes()).unwrap()
}

fn contents(buf: &TextBuffer) -> String {
	String::from_utf8(buf.text()).unwrap()
}

fn assert_gap_invariant(buf: &TextBuffer) {
	assert_eq!(buf.len() + buf.storage.gap_len(), buf.capacity());
}

#[test]
fn hello_world_scenario() {
	let _ = tracing_subscriber::fmt::try_init();
	let mut buf = TextBuffer::new();
	buf.insert(0, b"hello\nworld").unwrap();
	assert_eq!(buf.len(), 11);
	assert_eq!(buf.byte_at(5), b'\n');

	buf.select(0, 5);
	buf.insert(5, b"!").unwrap();
	assert_eq!(buf.selection_span(SelectionKind::Primary).map(|s| (s.start, s.end)), Some((0, 5)));
	assert_eq!(contents(&buf), "hello!\nworld");
}

#[test]
fn insert_clamps_and_reports_one_change() {
	let mut buf = buffer("abc");
	let log = record(&mut buf);
	assert_eq!(buf.insert(99, b"de").unwrap(), 2);
	assert_eq!(contents(&buf), "abcde");
	assert_eq!(buf.cursor_pos_hint(), 5);
	assert_eq!(*log.borrow(), vec![Seen::PreDelete(3, 0), modified(3, 2, 0, 0, b"")]);
}

#[test]
fn large_insert_keeps_gap_invariant() {
	let mut buf = TextBuffer::with_capacity(4);
	assert_gap_invariant(&buf);
	let big = vec![b'x'; 500];
	buf.insert(0, &big).unwrap();
	assert_gap_invariant(&buf);
	buf.insert(250, b"middle").unwrap();
	buf.remove(0, 100);
	assert_gap_invariant(&buf);
	assert_eq!(buf.len(), 406);
	assert!(buf.matches_at(150, b"middle"));
}

#[test]
fn remove_swaps_and_clamps() {
	let mut buf = buffer("0123456789");
	let log = record(&mut buf);
	buf.remove(8, 3);
	assert_eq!(contents(&buf), "01289");
	buf.remove(3, 50);
	assert_eq!(contents(&buf), "012");
	assert_eq!(buf.cursor_pos_hint(), 3);
	assert_eq!(
		*log.borrow(),
		vec![
			Seen::PreDelete(3, 5),
			modified(3, 0, 5, 0, b"34567"),
			Seen::PreDelete(3, 2),
			modified(3, 0, 2, 0, b"89"),
		]
	);
}

#[test]
fn replace_is_a_single_change() {
	let mut buf = buffer("hello world");
	let log = record(&mut buf);
	assert_eq!(buf.replace(6, 11, b"there").unwrap(), 5);
	assert_eq!(contents(&buf), "hello there");
	assert_eq!(buf.cursor_pos_hint(), 11);
	assert_eq!(*log.borrow(), vec![Seen::PreDelete(6, 5), modified(6, 5, 5, 0, b"world")]);
}

#[test]
fn pre_delete_observer_sees_doomed_text() {
	let mut buf = buffer("abcdef");
	let seen = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&seen);
	buf.add_pre_delete_observer(move |buf, ev| {
		sink.borrow_mut().push(buf.range(ev.pos, ev.pos + ev.deleted));
	});
	let after = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&after);
	buf.add_modify_observer(move |buf, _| sink.borrow_mut().push(buf.text()));

	buf.remove(1, 3);
	assert_eq!(*seen.borrow(), vec![b"bc".to_vec()]);
	assert_eq!(*after.borrow(), vec![b"adef".to_vec()]);
}

#[rstest]
#[case(0, 3, "abc")]
#[case(3, 0, "abc")]
#[case(4, 99, "ef")]
#[case(6, 6, "")]
#[case(7, 2, "")]
fn range_normalises_bounds(#[case] start: Pos, #[case] end: Pos, #[case] expected: &str) {
	let buf = buffer("abcdef");
	assert_eq!(buf.range(start, end), expected.as_bytes().to_vec());
}

#[test]
fn byte_at_past_end_is_zero() {
	let buf = buffer("ab");
	assert_eq!(buf.byte_at(1), b'b');
	assert_eq!(buf.byte_at(2), 0);
}

#[test]
fn as_contiguous_returns_whole_text() {
	let mut buf = buffer("abcdefgh");
	buf.insert(3, b"_").unwrap();
	assert_eq!(buf.as_contiguous(), b"abc_defgh");
	assert_gap_invariant(&buf);
}

#[test]
fn set_text_replaces_everything_at_once() {
	let mut buf = buffer("old text");
	buf.select(2, 5);
	let log = record(&mut buf);
	buf.set_text(b"new").unwrap();
	assert_eq!(contents(&buf), "new");
	assert_eq!(buf.selection_span(SelectionKind::Primary), None);
	assert_eq!(*log.borrow(), vec![Seen::PreDelete(0, 8), modified(0, 3, 8, 0, b"old text")]);
	assert_gap_invariant(&buf);
}

#[test]
fn set_text_moves_anchor_at_old_end_to_start() {
	let mut buf = buffer("old text");
	buf.secondary_select(8, 8);
	buf.set_text(b"new").unwrap();
	assert_eq!(
		buf.empty_selection_span(SelectionKind::Secondary).map(|s| (s.start, s.end)),
		Some((0, 0))
	);
}

#[test]
fn append_goes_to_the_end() {
	let mut buf = buffer("ab");
	buf.append(b"cd").unwrap();
	assert_eq!(contents(&buf), "abcd");
}

#[test]
fn tab_distance_change_redisplays_everything() {
	let mut buf = buffer("a\tb");
	let log = record(&mut buf);
	buf.set_tab_distance(4).unwrap();
	assert_eq!(buf.tab_distance(), 4);
	assert_eq!(*log.borrow(), vec![Seen::PreDelete(0, 3), modified(0, 3, 3, 0, b"a\tb")]);

	assert!(matches!(buf.set_tab_distance(0), Err(BufferError::InvalidTabDistance(0))));
	assert_eq!(buf.tab_distance(), 4);
}

#[test]
fn check_display_is_restyle_only() {
	let mut buf = buffer("abcdef");
	let log = record(&mut buf);
	buf.check_display(2, 5);
	assert_eq!(*log.borrow(), vec![modified(2, 0, 0, 3, b"")]);
}

#[test]
fn config_settings_apply() {
	let config = BufferConfig::from_toml("tab-distance = 4\nuse-tabs = false").unwrap();
	let buf = TextBuffer::with_config(&config);
	assert_eq!(buf.tab_distance(), 4);
	assert!(!buf.use_tabs());
	assert_eq!(buf.metrics(), ColumnMetrics::new(4, false, 0));
}

// a0 b1 \n2 c3 d4 \n5 \n6 e7 f8
const LINES: &str = "ab\ncd\n\nef";

#[rstest]
#[case(0, 0, 2)]
#[case(2, 0, 2)]
#[case(4, 3, 5)]
#[case(6, 6, 6)]
#[case(8, 7, 9)]
#[case(99, 7, 9)]
fn line_bounds(#[case] pos: Pos, #[case] start: Pos, #[case] end: Pos) {
	let buf = buffer(LINES);
	assert_eq!(buf.line_start(pos), start);
	assert_eq!(buf.line_end(pos), end);
}

#[rstest]
#[case(0, 0, 0)]
#[case(4, 0, 4)]
#[case(0, 1, 3)]
#[case(1, 1, 3)]
#[case(0, 2, 6)]
#[case(0, 3, 7)]
#[case(0, 4, 9)]
fn forward_lines_cases(#[case] start: Pos, #[case] n: usize, #[case] expected: Pos) {
	assert_eq!(buffer(LINES).forward_lines(start, n), expected);
}

#[rstest]
#[case(8, 0, 7)]
#[case(8, 1, 6)]
#[case(8, 2, 3)]
#[case(8, 3, 0)]
#[case(7, 0, 7)]
#[case(6, 0, 6)]
#[case(1, 0, 0)]
fn backward_lines_cases(#[case] start: Pos, #[case] n: usize, #[case] expected: Pos) {
	assert_eq!(buffer(LINES).backward_lines(start, n), expected);
}

#[test]
fn count_lines_is_half_open() {
	let buf = buffer(LINES);
	assert_eq!(buf.count_lines(0, 9), 3);
	assert_eq!(buf.count_lines(3, 5), 0);
	assert_eq!(buf.count_lines(3, 6), 1);
	assert_eq!(buf.count_lines(6, 3), 0);
}

#[test]
fn display_columns_follow_tabs_and_control_codes() {
	// \t0 a1 b2 \x01 3 c4 \n5
	let buf = buffer("\tab\x01c\nxyz");
	assert_eq!(buf.display_column(0, 1), 8);
	assert_eq!(buf.display_column(0, 3), 10);
	assert_eq!(buf.display_column(0, 4), 15);
	assert_eq!(buf.position_at_column(0, 9), 2);
	assert_eq!(buf.position_at_column(0, 11), 4);
	assert_eq!(buf.position_at_column(0, 100), 5);
	assert_eq!(buf.position_at_column(6, 100), 9);
	assert_eq!(buf.expanded_char_at(3, 10).as_slice(), b"<soh>");
}

#[test]
fn search_both_directions() {
	let buf = buffer("one, two; three");
	assert_eq!(buf.search_forward(0, b","), Some(3));
	assert_eq!(buf.search_forward(4, b",;"), Some(8));
	assert_eq!(buf.search_forward(9, b",;"), None);
	assert_eq!(buf.search_backward(15, b",;"), Some(8));
	assert_eq!(buf.search_backward(8, b";"), None);
	assert_eq!(buf.search_backward(8, b",;"), Some(3));
	assert_eq!(buf.search_backward(0, b"o"), None);
}

#[test]
fn observers_run_in_priority_order() {
	let mut buf = TextBuffer::new();
	let order = Rc::new(RefCell::new(Vec::new()));
	let sink = Rc::clone(&order);
	let first = buf.add_modify_observer(move |_, _| sink.borrow_mut().push("first"));
	let sink = Rc::clone(&order);
	buf.add_modify_observer(move |_, _| sink.borrow_mut().push("second"));
	let sink = Rc::clone(&order);
	buf.add_high_priority_modify_observer(move |_, _| sink.borrow_mut().push("urgent"));

	buf.insert(0, b"x").unwrap();
	assert_eq!(*order.borrow(), vec!["urgent", "first", "second"]);

	assert!(buf.remove_modify_observer(first));
	assert!(!buf.remove_modify_observer(first));
	order.borrow_mut().clear();
	buf.insert(0, b"y").unwrap();
	assert_eq!(*order.borrow(), vec!["urgent", "second"]);
}

#[test]
fn removing_pre_delete_observer_stops_calls() {
	let mut buf = buffer("abc");
	let count = Rc::new(RefCell::new(0));
	let sink = Rc::clone(&count);
	let id = buf.add_pre_delete_observer(move |_, _| *sink.borrow_mut() += 1);
	buf.remove(0, 1);
	assert!(buf.remove_pre_delete_observer(id));
	buf.remove(0, 1);
	assert_eq!(*count.borrow(), 1);
	assert!(!buf.remove_pre_delete_observer(id));
}

#[test]
fn null_bytes_round_trip_through_substitute() {
	let mut buf = TextBuffer::new();
	buf.insert(0, b"a\0b").unwrap();
	assert_eq!(buf.null_subs_char(), 0x01);
	assert_eq!(buf.text(), b"a\x01b".to_vec());
	assert_eq!(buf.range_with_nulls(0, 3), b"a\0b".to_vec());
	assert_eq!(buf.expanded_char_at(1, 0).as_slice(), b"<nul>");
}

#[test]
fn inserting_the_substitute_moves_to_next_candidate() {
	let mut buf = TextBuffer::new();
	buf.insert(0, b"a\0b").unwrap();
	buf.append(b"\x01").unwrap();
	assert_eq!(buf.null_subs_char(), 0x02);
	assert_eq!(buf.text(), b"a\x02b\x01".to_vec());
	assert_eq!(buf.range_with_nulls(0, 4), b"a\0b\x01".to_vec());
}

#[test]
fn exhausted_substitutes_leave_buffer_untouched() {
	let mut buf = TextBuffer::new();
	let candidates: Vec<u8> = vec![
		1, 2, 3, 4, 5, 6, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 28, 29, 30, 31, 11, 7,
	];
	buf.insert(0, &candidates).unwrap();
	let log = record(&mut buf);

	let err = buf.insert(0, b"x\0").unwrap_err();
	assert!(matches!(err, BufferError::NullSubstitutionExhausted));
	assert_eq!(buf.text(), candidates);
	assert_eq!(buf.null_subs_char(), 0);
	assert!(log.borrow().is_empty());
}

#[test]
fn copy_from_converts_between_substitutes() {
	let mut src = TextBuffer::new();
	src.insert(0, b"\x01\0").unwrap();
	assert_eq!(src.null_subs_char(), 0x02);

	let mut dst = buffer("[]");
	dst.select(0, 2);
	let log = record(&mut dst);
	assert_eq!(dst.copy_from(&src, 0, 2, 1).unwrap(), 2);
	assert_eq!(dst.range_with_nulls(0, 4), b"[\x01\0]".to_vec());
	assert!(log.borrow().is_empty());
	assert_eq!(dst.selection_span(SelectionKind::Primary).map(|s| (s.start, s.end)), Some((0, 4)));
}

#[test]
fn selection_follows_edits() {
	let mut buf = buffer("01234567890123456789");
	buf.select(5, 10);
	buf.insert(2, b"abc").unwrap();
	assert_eq!(buf.selection_span(SelectionKind::Primary).map(|s| (s.start, s.end)), Some((8, 13)));
	buf.insert(10, b"abc").unwrap();
	assert_eq!(buf.selection_span(SelectionKind::Primary).map(|s| (s.start, s.end)), Some((8, 16)));
	buf.remove(0, 26);
	assert_eq!(buf.selection_span(SelectionKind::Primary), None);
	assert!(!buf.selection(SelectionKind::Primary).is_zero_width());
}

#[test]
fn selecting_redraws_changed_ranges_only() {
	let mut buf = buffer("0123456789");
	let log = record(&mut buf);
	buf.select(2, 6);
	buf.select(2, 8);
	buf.unselect();
	assert_eq!(
		*log.borrow(),
		vec![modified(2, 0, 0, 4, b""), modified(6, 0, 0, 2, b""), modified(2, 0, 0, 6, b"")]
	);
}

#[test]
fn empty_selection_keeps_anchor() {
	let mut buf = buffer("0123456789");
	buf.secondary_select(4, 4);
	assert_eq!(buf.selection_span(SelectionKind::Secondary), None);
	assert_eq!(
		buf.empty_selection_span(SelectionKind::Secondary),
		Some(SelectionSpan {
			start: 4,
			end: 4,
			rect: None
		})
	);
	buf.secondary_unselect();
	assert_eq!(buf.empty_selection_span(SelectionKind::Secondary), None);
}

#[test]
fn highlight_is_independent_of_primary() {
	let mut buf = buffer("0123456789");
	buf.select(0, 2);
	buf.highlight(5, 7);
	buf.unselect();
	let span = buf.selection_span(SelectionKind::Highlight);
	assert_eq!(span.map(|s| (s.start, s.end)), Some((5, 7)));
	buf.unhighlight();
	assert_eq!(buf.selection_span(SelectionKind::Highlight), None);
}

#[test]
fn replace_and_remove_linear_selection() {
	let mut buf = buffer("hello world");
	buf.select(0, 5);
	assert_eq!(buf.selection_text(SelectionKind::Primary), b"hello".to_vec());
	buf.replace_selected(SelectionKind::Primary, b"howdy").unwrap();
	assert_eq!(contents(&buf), "howdy world");
	assert_eq!(buf.selection_span(SelectionKind::Primary), None);

	// nothing selected: no-op
	buf.replace_selected(SelectionKind::Primary, b"zzz").unwrap();
	assert_eq!(contents(&buf), "howdy world");

	buf.select(5, 11);
	buf.remove_selected(SelectionKind::Primary).unwrap();
	assert_eq!(contents(&buf), "howdy");
}

const GRID: &str = "abcdef\nghijkl\nmnopqr";

#[test]
fn rectangular_selection_text_and_replacement() {
	let mut buf = buffer(GRID);
	buf.rect_select(0, 20, 1, 3);
	assert_eq!(buf.selection_text(SelectionKind::Primary), b"bc\nhi\nno".to_vec());
	assert_eq!(buf.simple_selection(), Some((1, 3)));

	buf.replace_selected(SelectionKind::Primary, b"X\nY\nZ").unwrap();
	assert_eq!(contents(&buf), "aXdef\ngYjkl\nmZpqr");
	assert_eq!(buf.selection_span(SelectionKind::Primary), None);
}

#[test]
fn remove_rectangular_selection() {
	let mut buf = buffer(GRID);
	buf.rect_select(8, 15, 2, 4);
	buf.remove_selected(SelectionKind::Primary).unwrap();
	assert_eq!(contents(&buf), "abcdef\nghkl\nmnqr");
}

#[test]
fn insert_column_reports_whole_lines() {
	let mut buf = buffer(GRID);
	let log = record(&mut buf);
	let edit = buf.insert_column(2, 8, b"XY\nZW").unwrap();
	assert_eq!(contents(&buf), "abcdef\nghXYijkl\nmnZWopqr");
	assert_eq!(edit, ColumnEdit { inserted: 17, deleted: 13 });
	assert_eq!(buf.cursor_pos_hint(), 20);
	assert_eq!(
		*log.borrow(),
		vec![Seen::PreDelete(7, 13), modified(7, 17, 13, 0, b"ghijkl\nmnopqr")]
	);
}

#[test]
fn insert_column_creates_missing_lines() {
	let mut buf = buffer("ab");
	buf.set_use_tabs(false);
	buf.insert_column(1, 0, b"X\nY").unwrap();
	assert_eq!(contents(&buf), "aXb\n Y");
}

#[test]
fn remove_rect_cuts_every_line() {
	let mut buf = buffer(GRID);
	let edit = buf.remove_rect(0, 20, 1, 3).unwrap();
	assert_eq!(contents(&buf), "adef\ngjkl\nmpqr");
	assert_eq!(edit, ColumnEdit { inserted: 14, deleted: 20 });
}

#[test]
fn overlay_rect_measures_text_when_unbounded() {
	let mut buf = buffer(GRID);
	buf.overlay_rect(7, 1, None, b"XY").unwrap();
	assert_eq!(contents(&buf), "abcdef\ngXYjkl\nmnopqr");
}

#[test]
fn overlay_rect_with_nonempty_insertion_text_inserts_it() {
	let mut buf = buffer("0123456789");
	buf.overlay_rect(0, 3, Some(5), b"ab").unwrap();
	assert_eq!(contents(&buf), "012ab56789");
}

#[test]
fn replace_rect_pads_short_text() {
	let mut buf = buffer(GRID);
	buf.replace_rect(0, 20, 1, 3, b"X").unwrap();
	assert_eq!(contents(&buf), "aXdef\ng jkl\nm pqr");
}

#[test]
fn replace_rect_adds_lines_for_long_text() {
	let mut buf = buffer("abc\ndef");
	buf.set_use_tabs(false);
	let edit = buf.replace_rect(0, 7, 1, 2, b"X\nY\nZ").unwrap();
	assert_eq!(contents(&buf), "aXc\ndYf\n Z");
	assert_eq!(edit, ColumnEdit { inserted: 10, deleted: 7 });
}

#[test]
fn clear_rect_blanks_columns() {
	let mut buf = buffer(GRID);
	buf.clear_rect(0, 20, 1, 3).unwrap();
	assert_eq!(contents(&buf), "a  def\ng  jkl\nm  pqr");
}

#[test]
fn text_in_rect_then_remove_then_insert_restores() {
	let mut buf = buffer(GRID);
	let cut = buf.text_in_rect(0, 20, 2, 4);
	assert_eq!(cut, b"cd\nij\nop".to_vec());
	buf.remove_rect(0, 20, 2, 4).unwrap();
	buf.insert_column(2, 0, &cut).unwrap();
	assert_eq!(contents(&buf), GRID);
}
