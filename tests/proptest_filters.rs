//! Property-based tests using proptest
//!
//! These tests verify the correctness of the status filter, JSON path
//! extraction, date formatting and field validation using randomized inputs.

use mediadesk::resource::{
    all_resources, check_rules, extract_json_value, filter_by_status, format_date, Draft, Rule,
    Status,
};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Generate an arbitrary catalog record; `estado` may be missing
fn arb_record() -> impl Strategy<Value = Value> {
    (
        "[a-f0-9]{24}",
        "[A-Za-zÁÉÍÓÚáéíóúñ ]{1,40}",
        prop_oneof![
            Just(Some("Activo")),
            Just(Some("Inactivo")),
            Just(None)
        ],
    )
        .prop_map(|(id, name, status)| {
            let mut record = json!({"_id": id, "nombre": name});
            if let Some(status) = status {
                record["estado"] = json!(status);
            }
            record
        })
}

/// Generate a list of records
fn arb_record_list() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(arb_record(), 0..100)
}

/// Every min-length rule with a bound above one, across all resources
fn min_length_rules() -> Vec<(String, Vec<Rule>)> {
    all_resources()
        .iter()
        .flat_map(|def| def.fields.iter())
        .filter(|field| {
            field
                .rules
                .iter()
                .any(|r| matches!(r, Rule::MinLength { value, .. } if *value > 1))
        })
        .map(|field| (field.name.clone(), field.rules.clone()))
        .collect()
}

proptest! {
    /// Hidden records are exactly the inactive ones, and order is kept
    #[test]
    fn test_status_filter_preserves_order(items in arb_record_list()) {
        let visible = filter_by_status(&items, false);

        let expected: Vec<&Value> = items
            .iter()
            .filter(|item| Status::of(item) == Status::Active)
            .collect();
        prop_assert_eq!(&visible, &expected);

        for item in &visible {
            prop_assert_ne!(item.get("estado").and_then(|v| v.as_str()), Some("Inactivo"));
        }
    }

    /// Showing inactive records returns the collection unchanged
    #[test]
    fn test_show_inactive_is_identity(items in arb_record_list()) {
        let all = filter_by_status(&items, true);
        prop_assert_eq!(all.len(), items.len());
        for (shown, original) in all.iter().zip(items.iter()) {
            prop_assert_eq!(*shown, original);
        }
    }

    /// A single character never satisfies a min-length rule above one
    #[test]
    fn test_single_char_names_are_rejected(c in "[A-Za-z0-9ñ]") {
        for (name, rules) in min_length_rules() {
            prop_assert!(check_rules(&rules, &c).is_some(), "{} accepted {:?}", name, c);
        }
    }

    /// Whitespace-only values fail every required field
    #[test]
    fn test_blank_values_fail_required(blank in "[ \t]{0,10}") {
        for def in all_resources() {
            for field in def.fields.iter().filter(|f| f.is_required()) {
                prop_assert!(check_rules(&field.rules, &blank).is_some());
            }
        }
    }

    /// Missing paths never panic and render as "-"
    #[test]
    fn test_extract_missing_path(path in "[a-z]{1,8}(\\.[a-z]{1,8}){0,3}") {
        let item = json!({"_id": "x"});
        prop_assert_eq!(extract_json_value(&item, &path), "-");
    }

    /// Calendar dates are formatted as d/m/yyyy without zero padding
    #[test]
    fn test_date_format(year in 1900i32..2100, month in 1u32..=12, day in 1u32..=28) {
        let raw = format!("{:04}-{:02}-{:02}T12:00:00.000Z", year, month, day);
        prop_assert_eq!(format_date(&raw), format!("{}/{}/{}", day, month, year));
    }

    /// Numeric drafts are sent as JSON numbers
    #[test]
    fn test_year_is_sent_as_number(year in 1888i64..2100) {
        let media = all_resources().iter().find(|d| d.key == "media").unwrap();
        let mut draft = Draft::defaults(media);
        draft.set("anio_estreno", &year.to_string());
        prop_assert_eq!(&draft.to_body(media)["anio_estreno"], &json!(year));
    }
}
