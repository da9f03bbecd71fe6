//! Application State
//!
//! Central application state management for mediadesk.

use crate::api::CatalogClient;
use crate::config::Config;
use crate::controller::ListController;
use crate::resource::{
    column_value, get_all_resource_keys, get_resource, record_id, ResourceClient, ResourceDef,
};
use crate::stats::{fetch_active_counts, ResourceCount};
use ratatui::layout::Rect;
use serde_json::Value;
use std::ops::Range;

// =========================================================================
// Configuration Constants
// =========================================================================

/// Default viewport height (will be updated during render based on terminal size)
const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

const READONLY_WARNING: &str = "Read-only mode: create, edit and delete are disabled";

/// Application modes
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,   // Viewing list
    Command,  // : command input
    Help,     // ? help popup
    Confirm,  // Delete confirmation
    Warning,  // Warning/info dialog (OK only)
    Form,     // Create/edit overlay
    Describe, // Viewing JSON details of selected item
}

/// Delete waiting for confirmation
#[derive(Debug, Clone)]
pub struct PendingDelete {
    pub id: String,
    pub message: String,
    pub name: String,
    pub selected_yes: bool,
}

/// Network work queued by an event, run after the next draw so the
/// loading state is visible while it is in flight
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Reload the current collection
    Refresh,
    /// Reload the collection and the dashboard counts
    LoadResource,
    Delete(String),
    /// Open the form; `None` creates a new record
    OpenForm(Option<Value>),
    SubmitForm,
    CloseForm,
    /// Fetch a single record for the describe view
    Describe(String),
}

/// Main application state
pub struct App {
    // Backend client
    pub client: CatalogClient,

    // Current resource being viewed
    pub current_resource_key: String,
    pub list: ListController,

    // Rows after the status and text filters
    pub filtered_items: Vec<Value>,

    // Navigation state
    pub selected: usize,
    pub mode: Mode,
    pub filter_text: String,
    pub filter_active: bool,

    // Command input
    pub command_text: String,
    pub command_suggestions: Vec<String>,
    pub command_suggestion_selected: usize,
    pub command_preview: Option<String>,

    // Confirmation
    pub pending_delete: Option<PendingDelete>,

    // Queued network work
    pub pending_task: Option<Task>,

    // UI state
    pub error_message: Option<String>,
    pub describe_scroll: usize,
    pub describe_data: Option<Value>,

    // Dashboard counts
    pub stats: Vec<ResourceCount>,

    // Persistent configuration
    pub config: Config,

    // Read-only mode
    pub readonly: bool,

    // Warning message
    pub warning_message: Option<String>,

    // Virtual scrolling
    pub viewport_height: usize,
    pub scroll_offset: usize,

    // Last rendered form popup, for backdrop clicks
    pub form_area: Option<Rect>,
}

impl App {
    /// Create App from pre-initialized components
    pub fn from_initialized(
        client: CatalogClient,
        list: ListController,
        stats: Vec<ResourceCount>,
        config: Config,
        readonly: bool,
    ) -> Self {
        let mut app = Self {
            client,
            current_resource_key: list.def().key.clone(),
            list,
            filtered_items: Vec::new(),
            selected: 0,
            mode: Mode::Normal,
            filter_text: String::new(),
            filter_active: false,
            command_text: String::new(),
            command_suggestions: Vec::new(),
            command_suggestion_selected: 0,
            command_preview: None,
            pending_delete: None,
            pending_task: None,
            error_message: None,
            describe_scroll: 0,
            describe_data: None,
            stats,
            config,
            readonly,
            warning_message: None,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            scroll_offset: 0,
            form_area: None,
        };
        app.apply_filter();
        app
    }

    // =========================================================================
    // Resource Definition Access
    // =========================================================================

    pub fn current_resource(&self) -> &'static ResourceDef {
        self.list.def()
    }

    pub fn get_available_commands(&self) -> Vec<String> {
        let mut commands: Vec<String> = get_all_resource_keys()
            .iter()
            .map(|s| s.to_string())
            .collect();

        commands.push("new".to_string());
        commands.push("refresh".to_string());
        commands.push("inactive".to_string());
        commands.push("quit".to_string());

        commands
    }

    // =========================================================================
    // Pending Tasks
    // =========================================================================

    /// Queue network work. The loading state is entered right away so the
    /// next frame shows it.
    pub fn queue(&mut self, task: Task) {
        if matches!(task, Task::Refresh | Task::LoadResource | Task::Delete(_)) {
            self.list.begin_load();
        }
        self.pending_task = Some(task);
    }

    /// Run the queued task, if any
    pub async fn run_pending_task(&mut self) {
        let Some(task) = self.pending_task.take() else {
            return;
        };

        match task {
            Task::Refresh => {
                self.list.refresh(&self.client).await;
            },
            Task::LoadResource => {
                self.list.refresh(&self.client).await;
                self.refresh_stats().await;
            },
            Task::Delete(id) => {
                if self.list.delete(&self.client, &id).await {
                    self.refresh_stats().await;
                }
            },
            Task::OpenForm(record) => {
                let opened = match record {
                    Some(record) => self.list.open_edit(&self.client, &record).await,
                    None => self.list.open_new(&self.client).await,
                };
                if opened {
                    self.mode = Mode::Form;
                }
            },
            Task::SubmitForm => {
                if self.list.dispatch_form(&self.client).await {
                    self.close_form_view();
                    self.refresh_stats().await;
                }
            },
            Task::CloseForm => {
                self.list.close_form(&self.client).await;
                self.close_form_view();
            },
            Task::Describe(id) => {
                let client = ResourceClient::new(&self.client, self.current_resource());
                // Keep the row data when the single fetch fails
                if let Ok(record) = client.get_by_id(&id).await {
                    self.describe_data = Some(record);
                }
            },
        }

        self.error_message = self.list.error().map(str::to_string);
        self.apply_filter();
    }

    /// Recount the header stats. The current collection was just reloaded,
    /// so only the other resources are fetched.
    async fn refresh_stats(&mut self) {
        let loaded = Some((self.current_resource_key.as_str(), self.list.items()));
        self.stats = fetch_active_counts(&self.client, loaded).await;
    }

    fn close_form_view(&mut self) {
        self.form_area = None;
        if self.mode == Mode::Form {
            self.mode = Mode::Normal;
        }
    }

    /// Whether input is locked by in-flight work
    pub fn is_busy(&self) -> bool {
        self.pending_task.is_some()
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    /// Rebuild the visible rows: status predicate first, then the text filter
    pub fn apply_filter(&mut self) {
        let filter = self.filter_text.to_lowercase();
        let resource = self.current_resource();

        self.filtered_items = self
            .list
            .visible()
            .into_iter()
            .filter(|item| {
                filter.is_empty()
                    || resource
                        .columns
                        .iter()
                        .any(|col| column_value(item, col).to_lowercase().contains(&filter))
            })
            .cloned()
            .collect();

        if self.selected >= self.filtered_items.len() {
            self.selected = self.filtered_items.len().saturating_sub(1);
        }
        self.scroll_offset = 0;
    }

    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
        self.apply_filter();
    }

    /// Flip the inactive toggle without re-fetching
    pub fn toggle_inactive(&mut self) {
        let show = self.list.toggle_inactive();
        if let Err(e) = self.config.set_show_inactive(show) {
            tracing::warn!("Failed to save inactive toggle to config: {}", e);
        }
        self.apply_filter();
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn selected_item(&self) -> Option<&Value> {
        self.filtered_items.get(self.selected)
    }

    pub fn selected_item_json(&self) -> Option<String> {
        if let Some(ref data) = self.describe_data {
            return Some(serde_json::to_string_pretty(data).unwrap_or_default());
        }
        self.selected_item()
            .map(|item| serde_json::to_string_pretty(item).unwrap_or_default())
    }

    pub fn describe_line_count(&self) -> usize {
        self.selected_item_json()
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }

    pub fn describe_scroll_to_bottom(&mut self, visible_lines: usize) {
        let total = self.describe_line_count();
        self.describe_scroll = total.saturating_sub(visible_lines);
    }

    pub fn next(&mut self) {
        if !self.filtered_items.is_empty() {
            self.selected = (self.selected + 1).min(self.filtered_items.len() - 1);
        }
    }

    pub fn previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn go_to_top(&mut self) {
        self.selected = 0;
    }

    pub fn go_to_bottom(&mut self) {
        if !self.filtered_items.is_empty() {
            self.selected = self.filtered_items.len() - 1;
        }
    }

    pub fn page_down(&mut self, page_size: usize) {
        if !self.filtered_items.is_empty() {
            self.selected = (self.selected + page_size).min(self.filtered_items.len() - 1);
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
    }

    // =========================================================================
    // Mode Transitions
    // =========================================================================

    pub fn enter_command_mode(&mut self) {
        self.mode = Mode::Command;
        self.command_text.clear();
        self.command_suggestions = self.get_available_commands();
        self.command_suggestion_selected = 0;
        self.command_preview = None;
    }

    pub fn update_command_suggestions(&mut self) {
        let input = self.command_text.to_lowercase();
        let all_commands = self.get_available_commands();

        if input.is_empty() {
            self.command_suggestions = all_commands;
        } else {
            self.command_suggestions = all_commands
                .into_iter()
                .filter(|cmd| cmd.contains(&input))
                .collect();
        }

        if self.command_suggestion_selected >= self.command_suggestions.len() {
            self.command_suggestion_selected = 0;
        }

        self.update_preview();
    }

    fn update_preview(&mut self) {
        self.command_preview = self
            .command_suggestions
            .get(self.command_suggestion_selected)
            .cloned();
    }

    pub fn next_suggestion(&mut self) {
        if !self.command_suggestions.is_empty() {
            self.command_suggestion_selected =
                (self.command_suggestion_selected + 1) % self.command_suggestions.len();
            self.update_preview();
        }
    }

    pub fn prev_suggestion(&mut self) {
        if !self.command_suggestions.is_empty() {
            if self.command_suggestion_selected == 0 {
                self.command_suggestion_selected = self.command_suggestions.len() - 1;
            } else {
                self.command_suggestion_selected -= 1;
            }
            self.update_preview();
        }
    }

    pub fn apply_suggestion(&mut self) {
        if let Some(preview) = &self.command_preview {
            self.command_text = preview.clone();
            self.update_command_suggestions();
        }
    }

    pub fn enter_help_mode(&mut self) {
        self.mode = Mode::Help;
    }

    /// Show the selected row, then fetch the full record
    pub fn enter_describe_mode(&mut self) {
        let Some(item) = self.selected_item().cloned() else {
            return;
        };

        self.mode = Mode::Describe;
        self.describe_scroll = 0;
        if let Some(id) = record_id(&item) {
            self.queue(Task::Describe(id));
        }
        self.describe_data = Some(item);
    }

    pub fn show_warning(&mut self, message: &str) {
        self.warning_message = Some(message.to_string());
        self.mode = Mode::Warning;
    }

    pub fn exit_mode(&mut self) {
        self.mode = Mode::Normal;
        self.pending_delete = None;
        self.describe_data = None;
    }

    // =========================================================================
    // Record Actions
    // =========================================================================

    /// Open the create form
    pub fn request_new(&mut self) {
        if self.readonly {
            self.show_warning(READONLY_WARNING);
            return;
        }
        self.queue(Task::OpenForm(None));
    }

    /// Open the edit form for the selected row
    pub fn request_edit(&mut self) {
        if self.readonly {
            self.show_warning(READONLY_WARNING);
            return;
        }
        if let Some(item) = self.selected_item().cloned() {
            self.queue(Task::OpenForm(Some(item)));
        }
    }

    /// Ask for confirmation before deleting the selected row.
    /// Inactive catalog records offer no delete.
    pub fn request_delete(&mut self) {
        if self.readonly {
            self.show_warning(READONLY_WARNING);
            return;
        }

        let Some(item) = self.selected_item() else {
            return;
        };
        if !self.list.can_delete(item) {
            return;
        }
        let Some(id) = record_id(item) else {
            return;
        };

        let resource = self.current_resource();
        let name = item
            .get(&resource.name_field)
            .and_then(|v| v.as_str())
            .unwrap_or(&id)
            .to_string();

        self.pending_delete = Some(PendingDelete {
            id,
            message: resource.messages.confirm_delete.clone(),
            name,
            selected_yes: false,
        });
        self.mode = Mode::Confirm;
    }

    /// Run the confirmed delete
    pub fn confirm_delete(&mut self) {
        if let Some(pending) = self.pending_delete.take() {
            self.queue(Task::Delete(pending.id));
        }
        self.mode = Mode::Normal;
    }

    /// Validate and, when valid, queue the submit
    pub fn submit_form(&mut self) {
        let Some(form) = self.list.form_mut() else {
            return;
        };
        if form.begin_submit() {
            self.queue(Task::SubmitForm);
        }
    }

    /// Dismiss the form without saving
    pub fn cancel_form(&mut self) {
        let Some(form) = self.list.form_mut() else {
            return;
        };
        if form.is_locked() {
            return;
        }
        form.cancel();
        self.queue(Task::CloseForm);
    }

    // =========================================================================
    // Resource Navigation
    // =========================================================================

    pub fn navigate_to_resource(&mut self, resource_key: &str) {
        let Some(def) = get_resource(resource_key) else {
            self.error_message = Some(format!("Unknown resource: {}", resource_key));
            return;
        };

        self.list = ListController::new(def, self.list.show_inactive());
        self.current_resource_key = resource_key.to_string();
        self.selected = 0;
        self.filter_text.clear();
        self.filter_active = false;
        self.mode = Mode::Normal;
        self.scroll_offset = 0;
        self.error_message = None;
        self.apply_filter();

        if let Err(e) = self.config.set_last_resource(resource_key) {
            tracing::warn!("Failed to save resource to config: {}", e);
        }

        self.queue(Task::LoadResource);
    }

    pub fn get_breadcrumb(&self) -> Vec<String> {
        let mut path = vec![self.current_resource_key.clone()];
        if self.list.show_inactive() {
            path.push("all".to_string());
        }
        path
    }

    // =========================================================================
    // Command Execution
    // =========================================================================

    pub fn execute_command(&mut self) -> bool {
        let command_text = if self.command_text.is_empty() {
            self.command_preview.clone().unwrap_or_default()
        } else if let Some(preview) = &self.command_preview {
            if preview.contains(&self.command_text) {
                preview.clone()
            } else {
                self.command_text.clone()
            }
        } else {
            self.command_text.clone()
        };

        let Some(cmd) = command_text.split_whitespace().next() else {
            return false;
        };

        self.mode = Mode::Normal;
        match cmd {
            "q" | "quit" => return true,
            "new" => self.request_new(),
            "refresh" => self.queue(Task::Refresh),
            "inactive" => self.toggle_inactive(),
            key if get_resource(key).is_some() => self.navigate_to_resource(key),
            other => {
                self.error_message = Some(format!("Unknown command: {}", other));
            },
        }

        false
    }

    // =========================================================================
    // Virtual Scrolling
    // =========================================================================

    /// Update the viewport height (called from UI during render)
    pub fn update_viewport(&mut self, height: usize) {
        self.viewport_height = height.max(1);
    }

    /// Ensure the selected item is visible in the viewport
    pub fn ensure_visible(&mut self) {
        if self.filtered_items.is_empty() {
            self.scroll_offset = 0;
            return;
        }

        let visible_height = self.viewport_height;
        let margin = 2; // Keep cursor at least this far from edge

        if self.selected < self.scroll_offset + margin {
            self.scroll_offset = self.selected.saturating_sub(margin);
        } else if self.selected >= self.scroll_offset + visible_height.saturating_sub(margin) {
            self.scroll_offset = self
                .selected
                .saturating_sub(visible_height.saturating_sub(margin + 1));
        }

        // Clamp scroll offset to valid range
        let max_offset = self
            .filtered_items
            .len()
            .saturating_sub(self.viewport_height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    /// Get the range of visible items based on scroll offset and viewport
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.scroll_offset;
        let end = (self.scroll_offset + self.viewport_height).min(self.filtered_items.len());
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn app_with(key: &str, items: Vec<Value>) -> App {
        let client = CatalogClient::new("http://localhost:4000/api/").unwrap();
        let mut list = ListController::new(get_resource(key).unwrap(), false);
        list.replace_items(items);
        App::from_initialized(client, list, Vec::new(), Config::default(), false)
    }

    fn directors() -> Vec<Value> {
        vec![
            json!({"_id": "1", "nombres": "Christopher Nolan", "estado": "Activo"}),
            json!({"_id": "2", "nombres": "Sofia Coppola", "estado": "Inactivo"}),
            json!({"_id": "3", "nombres": "Céline Sciamma"}),
        ]
    }

    #[test]
    fn test_text_filter_applies_after_status_filter() {
        let mut app = app_with("directores", directors());
        assert_eq!(app.filtered_items.len(), 2);

        app.filter_text = "sofia".to_string();
        app.apply_filter();
        assert!(app.filtered_items.is_empty());

        app.filter_text = "céline".to_string();
        app.apply_filter();
        assert_eq!(app.filtered_items.len(), 1);
    }

    #[test]
    fn test_delete_request_is_gated_for_inactive_catalog_rows() {
        let mut app = app_with("directores", directors());
        app.list.set_show_inactive(true);
        app.apply_filter();

        app.selected = 1;
        app.request_delete();
        assert!(app.pending_delete.is_none());
        assert_eq!(app.mode, Mode::Normal);

        app.selected = 0;
        app.request_delete();
        assert_eq!(app.mode, Mode::Confirm);
        let pending = app.pending_delete.as_ref().unwrap();
        assert_eq!(pending.id, "1");
        assert_eq!(pending.name, "Christopher Nolan");
    }

    #[test]
    fn test_confirm_delete_queues_task_and_enters_loading() {
        let mut app = app_with("directores", directors());
        app.request_delete();
        app.confirm_delete();
        assert_eq!(app.pending_task, Some(Task::Delete("1".to_string())));
        assert!(app.list.is_loading());
        assert!(app.is_busy());
    }

    #[test]
    fn test_readonly_blocks_mutations() {
        let mut app = app_with("directores", directors());
        app.readonly = true;
        app.request_new();
        assert_eq!(app.mode, Mode::Warning);
        assert!(app.pending_task.is_none());
    }

    #[test]
    fn test_invalid_form_is_not_queued() {
        let mut app = app_with("directores", directors());
        app.list.attach_form(crate::controller::FormController::new_create(
            get_resource("directores").unwrap(),
        ));
        app.mode = Mode::Form;
        app.submit_form();
        assert!(app.pending_task.is_none());
        assert_eq!(
            app.list.form().unwrap().error("nombres"),
            Some("El nombre es obligatorio")
        );
    }

    #[test]
    fn test_command_switches_resource() {
        let mut app = app_with("directores", directors());
        app.command_text = "generos".to_string();
        assert!(!app.execute_command());
        assert_eq!(app.current_resource_key, "generos");
        assert_eq!(app.pending_task, Some(Task::LoadResource));
    }

    #[test]
    fn test_visible_range_at_end() {
        let items: Vec<Value> = (0..25)
            .map(|i| json!({"_id": i.to_string(), "nombres": format!("D{}", i)}))
            .collect();
        let mut app = app_with("directores", items);
        app.update_viewport(10);
        app.selected = 24;
        app.ensure_visible();
        assert_eq!(app.visible_range(), 15..25);
    }
}
