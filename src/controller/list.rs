//! List Controller
//!
//! Owns the loaded collection of one resource, its load state and the
//! "show inactive" view predicate. Every mutation ends in a full reload;
//! the collection is replaced wholesale, never patched in place.

use super::form::FormController;
use crate::api::CatalogClient;
use crate::resource::{filter_by_status, ResourceClient, ResourceDef, Status};
use serde_json::Value;

/// Load state of the collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Entity-specific message shown to the user
    Failed(String),
}

pub struct ListController {
    def: &'static ResourceDef,
    items: Vec<Value>,
    state: LoadState,
    show_inactive: bool,
    form: Option<FormController>,
}

impl ListController {
    pub fn new(def: &'static ResourceDef, show_inactive: bool) -> Self {
        Self {
            def,
            items: Vec::new(),
            state: LoadState::Loading,
            show_inactive,
            form: None,
        }
    }

    pub fn def(&self) -> &'static ResourceDef {
        self.def
    }

    /// Every loaded record, inactive ones included
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    // =========================================================================
    // Loading
    // =========================================================================

    pub fn begin_load(&mut self) {
        self.state = LoadState::Loading;
    }

    /// Fetch the full collection. On failure the previous records stay.
    pub async fn refresh(&mut self, api: &CatalogClient) {
        self.begin_load();

        match ResourceClient::new(api, self.def).list().await {
            Ok(items) => {
                self.items = items;
                self.state = LoadState::Ready;
            },
            Err(_) => {
                self.state = LoadState::Failed(self.def.messages.load_error.clone());
            },
        }
    }

    // =========================================================================
    // View
    // =========================================================================

    pub fn show_inactive(&self) -> bool {
        self.show_inactive
    }

    pub fn set_show_inactive(&mut self, show: bool) {
        self.show_inactive = show;
    }

    /// Flip the inactive toggle. Never re-fetches.
    pub fn toggle_inactive(&mut self) -> bool {
        self.show_inactive = !self.show_inactive;
        self.show_inactive
    }

    /// Records passing the status predicate, in load order
    pub fn visible(&self) -> Vec<&Value> {
        filter_by_status(&self.items, self.show_inactive)
    }

    /// Message for an empty table
    pub fn empty_message(&self) -> &str {
        if self.show_inactive {
            &self.def.messages.empty_all
        } else {
            &self.def.messages.empty_active
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Whether delete is offered for a record
    pub fn can_delete(&self, record: &Value) -> bool {
        !self.def.delete_requires_active || Status::of(record) == Status::Active
    }

    /// Soft-delete a record, then reload. Returns true on success.
    pub async fn delete(&mut self, api: &CatalogClient, id: &str) -> bool {
        match ResourceClient::new(api, self.def).delete(id).await {
            Ok(_) => {
                self.refresh(api).await;
                true
            },
            Err(_) => {
                self.state = LoadState::Failed(self.def.messages.delete_error.clone());
                false
            },
        }
    }

    // =========================================================================
    // Form
    // =========================================================================

    pub fn form(&self) -> Option<&FormController> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut FormController> {
        self.form.as_mut()
    }

    /// Open a create form. Ignored while another form is open.
    pub async fn open_new(&mut self, api: &CatalogClient) -> bool {
        self.open(api, FormController::new_create(self.def)).await
    }

    /// Open an edit form for a record. Ignored while another form is open.
    pub async fn open_edit(&mut self, api: &CatalogClient, record: &Value) -> bool {
        self.open(api, FormController::new_edit(self.def, record)).await
    }

    async fn open(&mut self, api: &CatalogClient, mut form: FormController) -> bool {
        if self.form.is_some() {
            return false;
        }
        form.load_options(api).await;
        self.form = Some(form);
        true
    }

    /// Drop the form and reload, whether it saved or was cancelled
    pub async fn close_form(&mut self, api: &CatalogClient) {
        if self.form.take().is_some() {
            self.refresh(api).await;
        }
    }

    /// Validate and send the open form; a successful save closes it and
    /// reloads. Returns true when the form closed.
    pub async fn submit_form(&mut self, api: &CatalogClient) -> bool {
        let valid = self.form.as_mut().is_some_and(|form| form.begin_submit());
        valid && self.dispatch_form(api).await
    }

    /// Send a form that already passed validation
    pub async fn dispatch_form(&mut self, api: &CatalogClient) -> bool {
        let Some(form) = self.form.as_mut() else {
            return false;
        };

        if form.dispatch(api).await {
            self.close_form(api).await;
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    pub(crate) fn replace_items(&mut self, items: Vec<Value>) {
        self.items = items;
        self.state = LoadState::Ready;
    }

    #[cfg(test)]
    pub(crate) fn attach_form(&mut self, form: FormController) {
        self.form = Some(form);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::get_resource;
    use serde_json::json;

    fn controller(key: &str, items: Vec<Value>) -> ListController {
        let mut list = ListController::new(get_resource(key).unwrap(), false);
        list.items = items;
        list.state = LoadState::Ready;
        list
    }

    #[test]
    fn test_toggle_inactive_changes_visible_rows_only() {
        let mut list = controller(
            "directores",
            vec![
                json!({"_id": "1", "nombres": "A", "estado": "Activo"}),
                json!({"_id": "2", "nombres": "B", "estado": "Inactivo"}),
            ],
        );
        assert_eq!(list.visible().len(), 1);
        assert!(list.toggle_inactive());
        assert_eq!(list.visible().len(), 2);
        assert_eq!(list.items().len(), 2);
        assert_eq!(list.state(), &LoadState::Ready);
    }

    #[test]
    fn test_delete_gating_per_resource() {
        let inactive = json!({"_id": "x", "estado": "Inactivo"});
        let active = json!({"_id": "y", "estado": "Activo"});

        let directors = controller("directores", vec![]);
        assert!(!directors.can_delete(&inactive));
        assert!(directors.can_delete(&active));

        let media = controller("media", vec![]);
        assert!(media.can_delete(&inactive));
    }

    #[test]
    fn test_empty_message_follows_toggle() {
        let mut list = controller("directores", vec![]);
        assert_eq!(list.empty_message(), "No hay directores activos");
        list.toggle_inactive();
        assert_eq!(list.empty_message(), "No hay directores registrados");
    }
}
