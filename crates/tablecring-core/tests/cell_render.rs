//! Cell rendering through the public pipeline

use std::sync::Arc;

use rstest::*;
use serde_json::{Value, json};
use tablecring_core::cell::{CellContext, MemoryClipboard, NO_DATA, render_cell};
use tablecring_core::column::{Ability, Column, merge_columns};
use tablecring_core::format::NumberFormat;
use tablecring_core::value::{Params, Row};
use tablecring_view::{EventData, EventType};

fn object(value: Value) -> Row {
	value.as_object().cloned().unwrap_or_default()
}

fn render_with(column: Column, row: Value, ctx: &CellContext<'_>) -> String {
	let merged = merge_columns(vec![column]);
	render_cell(&merged[0], &object(row), ctx).render_to_string()
}

fn render(column: Column, row: Value) -> String {
	render_with(column, row, &CellContext::new(&Params::new()))
}

#[rstest]
#[case(json!(null))]
#[case(json!(""))]
#[case(json!({"nested": true}))]
fn test_dash_fallback_for_every_ability(#[case] value: Value) {
	let abilities = [
		Ability::new(),
		Ability::new().copy(),
		Ability::new().currency("Rp"),
		Ability::new().copy().currency("Rp").style("text-align: right"),
	];
	for ability in abilities {
		let html = render(
			Column::new("amount", "Amount").ability(ability),
			json!({"amount": value.clone()}),
		);
		assert_eq!(html, NO_DATA);
	}
	assert_eq!(render(Column::new("amount", "Amount"), json!({})), NO_DATA);
}

#[rstest]
fn test_currency_snapshot() {
	let html = render(
		Column::new("amount", "Amount").ability(Ability::new().currency("Rp")),
		json!({"amount": 150000}),
	);
	insta::assert_snapshot!(html, @"Rp 150.000");
}

#[rstest]
fn test_currency_with_configured_separators() {
	let params = Params::new();
	let ctx = CellContext::new(&params).with_number_format(NumberFormat {
		thousands: ',',
		decimal: '.',
	});
	let html = render_with(
		Column::new("amount", "Amount").ability(Ability::new().currency("$")),
		json!({"amount": "1234567.25"}),
		&ctx,
	);
	insta::assert_snapshot!(html, @"$ 1,234,567.25");
}

#[rstest]
fn test_highlight_and_copy_compose() {
	let params = object(json!({"reference": "ABC"}));
	let clipboard = Arc::new(MemoryClipboard::new());
	let ctx = CellContext::new(&params).with_clipboard(clipboard.clone());
	let merged = merge_columns(vec![
		Column::new("reference", "Reference").ability(Ability::new().copy()),
	]);

	let view = render_cell(&merged[0], &object(json!({"reference": "xabcx-abc"})), &ctx);
	insta::assert_snapshot!(
		view.render_to_string(),
		@r#"<span class="tablecring-copy" data-copy="xabcx-abc">x<mark>abc</mark>x-<mark>abc</mark></span>"#
	);

	let span = view.find(&|el| el.has_class("tablecring-copy")).unwrap();
	span.fire(EventType::Click, &EventData::default());
	assert_eq!(clipboard.content().as_deref(), Some("xabcx-abc"));
}

#[rstest]
fn test_markup_in_values_is_escaped() {
	let html = render(Column::new("note", "Note"), json!({"note": "<b>bold</b>"}));
	assert_eq!(html, "&lt;b&gt;bold&lt;/b&gt;");
}
