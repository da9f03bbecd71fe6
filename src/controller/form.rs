//! Form Controller
//!
//! Owns one draft record, its field errors and the submit dispatch.
//! The state machine is `Editing -> Validating -> Submitting -> Closed`,
//! falling back to `Editing` when validation or the request fails.

use crate::api::CatalogClient;
use crate::resource::{
    extract_json_value, get_resource, record_id, validate, Draft, FieldDef, FieldErrors,
    FieldKind, ResourceClient, ResourceDef, Status,
};
use futures::future::join_all;
use std::collections::HashMap;

/// Form lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Validating,
    Submitting,
    Closed,
}

/// One entry of a reference selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub id: String,
    pub label: String,
}

pub struct FormController {
    def: &'static ResourceDef,
    existing_id: Option<String>,
    draft: Draft,
    errors: FieldErrors,
    submit_error: Option<String>,
    state: FormState,
    options: HashMap<String, Vec<SelectOption>>,
    focus: usize,
}

impl FormController {
    /// Form for a new record, seeded with field defaults
    pub fn new_create(def: &'static ResourceDef) -> Self {
        Self::with_draft(def, None, Draft::defaults(def))
    }

    /// Form editing an existing record
    pub fn new_edit(def: &'static ResourceDef, record: &serde_json::Value) -> Self {
        Self::with_draft(def, record_id(record), Draft::from_record(def, record))
    }

    fn with_draft(def: &'static ResourceDef, existing_id: Option<String>, draft: Draft) -> Self {
        Self {
            def,
            existing_id,
            draft,
            errors: FieldErrors::new(),
            submit_error: None,
            state: FormState::Editing,
            options: HashMap::new(),
            focus: 0,
        }
    }

    pub fn def(&self) -> &'static ResourceDef {
        self.def
    }

    pub fn is_edit(&self) -> bool {
        self.existing_id.is_some()
    }

    pub fn title(&self) -> &str {
        if self.is_edit() {
            &self.def.messages.edit_title
        } else {
            &self.def.messages.create_title
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Input is locked while a request is in flight
    pub fn is_locked(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn is_closed(&self) -> bool {
        self.state == FormState::Closed
    }

    // =========================================================================
    // Reference options
    // =========================================================================

    /// Fetch option lists for every reference field in parallel.
    /// Any failure leaves all lists empty; it is only logged.
    pub async fn load_options(&mut self, api: &CatalogClient) {
        let lookups: Vec<(&FieldDef, &'static ResourceDef)> = self
            .def
            .reference_fields()
            .filter_map(|field| {
                let reference = field.reference.as_ref()?;
                match get_resource(&reference.resource) {
                    Some(def) => Some((field, def)),
                    None => {
                        tracing::warn!("Unknown reference resource: {}", reference.resource);
                        None
                    },
                }
            })
            .collect();

        if lookups.is_empty() {
            return;
        }

        let results = join_all(
            lookups
                .iter()
                .map(|&(_, def)| async move { ResourceClient::new(api, def).list().await }),
        )
        .await;

        let mut options = HashMap::new();
        for ((field, _), result) in lookups.iter().zip(results) {
            let items = match result {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!("Failed to load options for {}: {}", self.def.key, e);
                    self.options.clear();
                    return;
                },
            };

            let Some(reference) = field.reference.as_ref() else {
                continue;
            };
            let choices = items
                .iter()
                .filter(|item| !reference.active_only || Status::of(item) == Status::Active)
                .filter_map(|item| {
                    Some(SelectOption {
                        id: record_id(item)?,
                        label: extract_json_value(item, &reference.label_field),
                    })
                })
                .collect();
            options.insert(field.name.clone(), choices);
        }

        self.options = options;
    }

    /// Options loaded for a reference field
    pub fn options(&self, field: &str) -> &[SelectOption] {
        self.options.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Label of the option currently selected in a reference field
    pub fn selected_label(&self, field: &str) -> Option<&str> {
        let id = self.draft.get(field);
        self.options(field)
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.label.as_str())
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Update a field. A non-empty value clears that field's error.
    pub fn set_field(&mut self, name: &str, value: &str) {
        if self.state != FormState::Editing {
            return;
        }
        self.draft.set(name, value);
        if !value.is_empty() {
            self.errors.remove(name);
        }
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_field(&self) -> Option<&'static FieldDef> {
        self.def.fields.get(self.focus)
    }

    pub fn focus_next(&mut self) {
        if !self.def.fields.is_empty() {
            self.focus = (self.focus + 1) % self.def.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        let len = self.def.fields.len();
        if len > 0 {
            self.focus = (self.focus + len - 1) % len;
        }
    }

    /// Type a character into the focused field
    pub fn input_char(&mut self, c: char) {
        let Some(field) = self.focused_field() else {
            return;
        };
        if !field.kind.is_typed() || (field.kind == FieldKind::Number && !c.is_ascii_digit()) {
            return;
        }
        let mut value = self.draft.get(&field.name).to_string();
        value.push(c);
        self.set_field(&field.name, &value);
    }

    /// Delete the last character of the focused field
    pub fn backspace(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        if !field.kind.is_typed() {
            return;
        }
        let mut value = self.draft.get(&field.name).to_string();
        value.pop();
        self.set_field(&field.name, &value);
    }

    /// Cycle the focused selector (status or reference)
    pub fn cycle_option(&mut self, forward: bool) {
        let Some(field) = self.focused_field() else {
            return;
        };

        match field.kind {
            FieldKind::Status => {
                let next = Status::from_label(self.draft.get(&field.name)).toggle();
                self.set_field(&field.name, next.as_str());
            },
            FieldKind::Reference => {
                // Empty id first: nothing selected
                let mut ids: Vec<String> = vec![String::new()];
                ids.extend(self.options(&field.name).iter().map(|o| o.id.clone()));

                let current = self.draft.get(&field.name);
                let pos = ids.iter().position(|id| id == current).unwrap_or(0);
                let next = if forward {
                    (pos + 1) % ids.len()
                } else {
                    (pos + ids.len() - 1) % ids.len()
                };
                self.set_field(&field.name, &ids[next]);
            },
            _ => {},
        }
    }

    // =========================================================================
    // Submit
    // =========================================================================

    /// Validate the draft. Returns true when the form may be dispatched.
    pub fn begin_submit(&mut self) -> bool {
        if self.state != FormState::Editing {
            return false;
        }

        self.state = FormState::Validating;
        self.submit_error = None;
        self.errors = validate(self.def, &self.draft);

        if self.errors.is_empty() {
            self.state = FormState::Submitting;
            true
        } else {
            tracing::debug!("{} form has {} invalid fields", self.def.key, self.errors.len());
            self.state = FormState::Editing;
            false
        }
    }

    /// Send the validated draft: update when editing, create otherwise.
    /// Returns true when the request succeeded and the form closed.
    pub async fn dispatch(&mut self, api: &CatalogClient) -> bool {
        if self.state != FormState::Submitting {
            return false;
        }

        let body = self.draft.to_body(self.def);
        let client = ResourceClient::new(api, self.def);
        let result = match &self.existing_id {
            Some(id) => client.update(id, &body).await,
            None => client.create(&body).await,
        };

        match result {
            Ok(_) => {
                self.state = FormState::Closed;
                true
            },
            Err(_) => {
                let message = if self.is_edit() {
                    &self.def.messages.update_error
                } else {
                    &self.def.messages.create_error
                };
                self.submit_error = Some(message.clone());
                self.state = FormState::Editing;
                false
            },
        }
    }

    /// Validate and dispatch in one step
    pub async fn submit(&mut self, api: &CatalogClient) -> bool {
        self.begin_submit() && self.dispatch(api).await
    }

    /// Close without saving. Ignored while a request is in flight.
    pub fn cancel(&mut self) {
        if !self.is_locked() {
            self.state = FormState::Closed;
        }
    }
}
