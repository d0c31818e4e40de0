//! Column merge properties

use std::collections::HashSet;

use proptest::prelude::*;
use rstest::rstest;
use tablecring_core::column::{Column, Label, merge_columns};
use tablecring_core::filter::Filter;

fn declared(keys: &[Option<u8>]) -> Vec<Column> {
	keys.iter()
		.enumerate()
		.map(|(i, key)| {
			let column = Column::new(format!("c{i}"), format!("L{i}"))
				.filter(Filter::text(format!("f{i}")));
			match key {
				Some(key) => column.join(format!("k{key}")),
				None => column,
			}
		})
		.collect()
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(128))]

	#[test]
	fn test_merge_count(keys in prop::collection::vec(prop::option::of(0u8..4), 0..12)) {
		let distinct: HashSet<_> = keys.iter().flatten().collect();
		let plain = keys.iter().filter(|k| k.is_none()).count();

		let merged = merge_columns(declared(&keys));
		prop_assert_eq!(merged.len(), distinct.len() + plain);
	}

	#[test]
	fn test_merge_is_idempotent(keys in prop::collection::vec(prop::option::of(0u8..4), 0..12)) {
		let once = merge_columns(declared(&keys));
		let twice = merge_columns(once.clone());
		prop_assert_eq!(once, twice);
	}

	#[test]
	fn test_merge_preserves_declaration_order(keys in prop::collection::vec(prop::option::of(0u8..4), 0..12)) {
		let merged = merge_columns(declared(&keys));

		for entry in &merged {
			let Some(key) = entry.column().join_key() else {
				continue;
			};
			let expected: Vec<String> = keys
				.iter()
				.enumerate()
				.filter(|(_, k)| k.map(|k| format!("k{k}")).as_deref() == Some(key))
				.map(|(i, _)| format!("L{i}"))
				.collect();
			let labels: Vec<&str> = entry
				.label()
				.parts()
				.iter()
				.filter_map(|part| part.as_text())
				.collect();
			prop_assert_eq!(labels, expected.iter().map(String::as_str).collect::<Vec<_>>());

			let filters: Vec<&str> = entry.filters().iter().map(Filter::name).collect();
			prop_assert_eq!(filters.len(), expected.len());
		}
	}
}

#[rstest]
fn test_three_column_scenario() {
	let merged = merge_columns(vec![
		Column::new("a", "A").join("x"),
		Column::new("b", "B").join("x"),
		Column::new("c", "C"),
	]);

	assert_eq!(merged.len(), 2);
	assert_eq!(merged[0].label(), &Label::stacked(["A", "B"]));
	let joined: Vec<&str> = merged[0].joined().iter().map(Column::name).collect();
	assert_eq!(joined, vec!["a", "b"]);
	assert_eq!(merged[1].label(), &Label::text("C"));
	assert!(merged[1].joined().is_empty());
}

#[rstest]
#[case::empty_key(vec![Column::new("a", "A").join(""), Column::new("b", "B").join("")], 2)]
#[case::lone_key(vec![Column::new("a", "A").join("x"), Column::new("b", "B")], 2)]
#[case::all_hidden(vec![Column::new("a", "A").visible(false)], 0)]
fn test_merge_edge_cases(#[case] columns: Vec<Column>, #[case] expected: usize) {
	assert_eq!(merge_columns(columns).len(), expected);
}
