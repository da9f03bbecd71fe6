//! Records and Drafts
//!
//! Records are kept as raw JSON the way the backend returns them. This
//! module holds the helpers that read them (ids, status, column values)
//! and the [`Draft`] type holding the editable field set of an open form.

use super::registry::{ColumnDef, ColumnFormat, FieldKind, ResourceDef};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Field carrying the record status
pub const STATUS_FIELD: &str = "estado";

/// Placeholder shown for missing dates
const MISSING_DATE: &str = "—";

/// Logical record status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl Status {
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Active => "Activo",
            Status::Inactive => "Inactivo",
        }
    }

    /// Status of a record. Anything other than `Inactivo` (including a
    /// missing field) counts as active.
    pub fn of(record: &Value) -> Self {
        Self::from_label(record.get(STATUS_FIELD).and_then(|v| v.as_str()).unwrap_or(""))
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "Inactivo" => Status::Inactive,
            _ => Status::Active,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Status::Active => Status::Inactive,
            Status::Inactive => Status::Active,
        }
    }
}

/// Id of a record (`_id`, falling back to `id`)
pub fn record_id(record: &Value) -> Option<String> {
    ["_id", "id"].iter().find_map(|key| match record.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Records visible under the "show inactive" toggle, in original order
pub fn filter_by_status(items: &[Value], show_inactive: bool) -> Vec<&Value> {
    items
        .iter()
        .filter(|item| show_inactive || Status::of(item) != Status::Inactive)
        .collect()
}

/// Extract a value from JSON using a dot-notation path
pub fn extract_json_value(item: &Value, path: &str) -> String {
    let mut current = item;

    for part in path.split('.') {
        // Handle array index
        let next = match part.parse::<usize>() {
            Ok(idx) => current.get(idx),
            Err(_) => current.get(part),
        };
        current = match next {
            Some(v) => v,
            None => return "-".to_string(),
        };
    }

    match current {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(_) => "[object]".to_string(),
    }
}

/// Display value of a table cell, applying the column's default and format
pub fn column_value(item: &Value, column: &ColumnDef) -> String {
    let raw = extract_json_value(item, &column.json_path);

    match column.format {
        Some(ColumnFormat::Date) => format_date(&raw),
        None if raw == "-" => column.default.clone().unwrap_or(raw),
        None => raw,
    }
}

/// Format an RFC 3339 timestamp as `d/m/yyyy`
pub fn format_date(timestamp: &str) -> String {
    if timestamp == "-" || timestamp.is_empty() {
        return MISSING_DATE.to_string();
    }

    match chrono::DateTime::parse_from_rfc3339(timestamp) {
        Ok(dt) => dt.format("%-d/%-m/%Y").to_string(),
        Err(_) => {
            let day = timestamp.get(..10).unwrap_or("");
            match chrono::NaiveDate::parse_from_str(day, "%Y-%m-%d") {
                Ok(date) => date.format("%-d/%-m/%Y").to_string(),
                Err(_) => timestamp.to_string(),
            }
        },
    }
}

/// In-progress, unsaved field set of an open form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    values: HashMap<String, String>,
}

impl Draft {
    /// Defaults for a new record: empty strings, status `Activo`
    pub fn defaults(resource: &ResourceDef) -> Self {
        let values = resource
            .fields
            .iter()
            .map(|field| {
                let value = match field.kind {
                    FieldKind::Status => Status::Active.as_str().to_string(),
                    _ => String::new(),
                };
                (field.name.clone(), value)
            })
            .collect();

        Self { values }
    }

    /// Seed a draft from an existing record.
    /// Embedded references are read as their `_id`.
    pub fn from_record(resource: &ResourceDef, record: &Value) -> Self {
        let values = resource
            .fields
            .iter()
            .map(|field| {
                let raw = record.get(&field.name);
                let value = match (field.kind, raw) {
                    (FieldKind::Status, _) => Status::of(record).as_str().to_string(),
                    (FieldKind::Reference, Some(v @ Value::Object(_))) => {
                        record_id(v).unwrap_or_default()
                    },
                    (_, Some(Value::String(s))) => s.clone(),
                    (_, Some(Value::Number(n))) => n.to_string(),
                    _ => String::new(),
                };
                (field.name.clone(), value)
            })
            .collect();

        Self { values }
    }

    /// Current value of a field ("" when unset)
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    /// JSON body for create/update: editable fields only, no id
    pub fn to_body(&self, resource: &ResourceDef) -> Value {
        let mut body = Map::new();

        for field in &resource.fields {
            let value = self.get(&field.name);
            let json = match field.kind {
                FieldKind::Number if value.trim().is_empty() => Value::Null,
                FieldKind::Number => match value.trim().parse::<i64>() {
                    Ok(n) => Value::from(n),
                    Err(_) => Value::String(value.to_string()),
                },
                _ => Value::String(value.to_string()),
            };
            body.insert(field.name.clone(), json);
        }

        Value::Object(body)
    }
}
