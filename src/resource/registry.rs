//! Resource Registry - Load resource definitions from JSON
//!
//! This module loads the catalog entity schemas from the embedded JSON file
//! and provides lookup functions for the rest of the application. Each
//! schema describes one REST collection: its path, table columns, form
//! fields with their validation rules, and user-facing messages.

use super::validation::Rule;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[include_str!("../resources/catalog.json")];

/// Color definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ColorDef {
    pub value: String,
    pub color: [u8; 3],
}

/// How a column value is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFormat {
    /// RFC 3339 timestamp shown as `d/m/yyyy`
    Date,
}

/// Column definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub header: String,
    pub json_path: String,
    pub width: u16,
    #[serde(default)]
    pub color_map: Option<String>,
    #[serde(default)]
    pub format: Option<ColumnFormat>,
    /// Value shown when the record has no value at `json_path`
    #[serde(default)]
    pub default: Option<String>,
}

/// Kind of form input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Textarea,
    Url,
    /// Digits only; sent as a JSON number
    Number,
    /// `Activo` / `Inactivo` selector
    Status,
    /// Id of a record from another collection
    Reference,
}

impl FieldKind {
    /// Whether the field is edited by typing (as opposed to cycling options)
    pub fn is_typed(self) -> bool {
        matches!(
            self,
            FieldKind::Text | FieldKind::Textarea | FieldKind::Url | FieldKind::Number
        )
    }
}

/// Link from a reference field to the collection providing its options
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceDef {
    /// Registry key of the referenced resource
    pub resource: String,
    /// Field of the referenced record shown as option label
    pub label_field: String,
    /// Only offer records whose status is `Activo`
    #[serde(default)]
    pub active_only: bool,
}

/// Form field definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub reference: Option<ReferenceDef>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl FieldDef {
    /// Check if the field carries a required rule
    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, Rule::Required { .. }))
    }

    /// Upper length bound, if any (used for character counters)
    pub fn max_length(&self) -> Option<usize> {
        self.rules.iter().find_map(|r| match r {
            Rule::MaxLength { value, .. } => Some(*value),
            _ => None,
        })
    }
}

/// User-facing messages of one resource
#[derive(Debug, Clone, Deserialize)]
pub struct Messages {
    pub load_error: String,
    pub delete_error: String,
    pub create_error: String,
    pub update_error: String,
    pub confirm_delete: String,
    pub empty_active: String,
    pub empty_all: String,
    pub create_title: String,
    pub edit_title: String,
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    pub key: String,
    /// Collection path relative to the API base URL
    pub collection: String,
    pub display_name: String,
    /// Entity name used in error tags ("failed to create director")
    pub entity: String,
    pub entity_plural: String,
    pub name_field: String,
    pub shortcut: String,
    /// Hide delete once a record is `Inactivo`
    #[serde(default)]
    pub delete_requires_active: bool,
    pub messages: Messages,
    pub columns: Vec<ColumnDef>,
    pub fields: Vec<FieldDef>,
}

impl ResourceDef {
    /// Get a field definition by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Reference fields, in form order
    pub fn reference_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.kind == FieldKind::Reference)
    }
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub color_maps: HashMap<String, Vec<ColorDef>>,
    #[serde(default)]
    pub resources: Vec<ResourceDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            color_maps: HashMap::new(),
            resources: Vec::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.color_maps.extend(partial.color_maps);
            final_config.resources.extend(partial.resources);
        }

        final_config
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.iter().find(|r| r.key == key)
}

/// Get a resource definition by its tab shortcut
pub fn get_resource_by_shortcut(shortcut: char) -> Option<&'static ResourceDef> {
    get_registry()
        .resources
        .iter()
        .find(|r| r.shortcut.chars().eq(std::iter::once(shortcut)))
}

/// All resources in registry order
pub fn all_resources() -> &'static [ResourceDef] {
    &get_registry().resources
}

/// Get all resource keys in registry order (for autocomplete and tabs)
pub fn get_all_resource_keys() -> Vec<&'static str> {
    all_resources().iter().map(|r| r.key.as_str()).collect()
}

/// Key of the resource shown when nothing else is configured
pub fn default_resource_key() -> &'static str {
    all_resources()
        .first()
        .map(|r| r.key.as_str())
        .unwrap_or("media")
}

/// Get a color map by name
pub fn get_color_map(name: &str) -> Option<&'static Vec<ColorDef>> {
    get_registry().color_maps.get(name)
}

/// Get color for a value based on color map name
pub fn get_color_for_value(color_map_name: &str, value: &str) -> Option<[u8; 3]> {
    get_color_map(color_map_name)?
        .iter()
        .find(|c| c.value == value)
        .map(|c| c.color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads_all_five_resources() {
        let keys = get_all_resource_keys();
        assert_eq!(
            keys,
            vec!["media", "directores", "generos", "productoras", "tipos"]
        );
    }

    #[test]
    fn test_collection_paths_match_rest_conventions() {
        for (key, path) in [
            ("directores", "directores"),
            ("generos", "generos"),
            ("productoras", "productoras"),
            ("tipos", "tipos"),
            ("media", "media"),
        ] {
            assert_eq!(get_resource(key).unwrap().collection, path);
        }
    }

    #[test]
    fn test_media_has_four_reference_fields() {
        let media = get_resource("media").unwrap();
        let refs: Vec<&str> = media
            .reference_fields()
            .map(|f| f.reference.as_ref().unwrap().resource.as_str())
            .collect();
        assert_eq!(refs, vec!["generos", "directores", "productoras", "tipos"]);

        let director = media.field("director").unwrap();
        assert!(director.reference.as_ref().unwrap().active_only);
        let genre = media.field("genero").unwrap();
        assert!(!genre.reference.as_ref().unwrap().active_only);
    }

    #[test]
    fn test_delete_gating_is_asymmetric() {
        assert!(!get_resource("media").unwrap().delete_requires_active);
        for key in ["directores", "generos", "productoras", "tipos"] {
            assert!(get_resource(key).unwrap().delete_requires_active, "{}", key);
        }
    }

    #[test]
    fn test_every_catalog_has_status_field() {
        for key in ["directores", "generos", "productoras", "tipos"] {
            let resource = get_resource(key).unwrap();
            assert_eq!(
                resource.field("estado").map(|f| f.kind),
                Some(FieldKind::Status),
                "{}",
                key
            );
        }
        assert!(get_resource("media").unwrap().field("estado").is_none());
    }

    #[test]
    fn test_description_counter_bound() {
        let genre = get_resource("generos").unwrap();
        assert_eq!(genre.field("descripcion").unwrap().max_length(), Some(500));
        assert!(genre.field("descripcion").unwrap().is_required());
        assert!(!genre.field("estado").unwrap().is_required());
    }

    #[test]
    fn test_shortcut_lookup() {
        assert_eq!(get_resource_by_shortcut('2').unwrap().key, "directores");
        assert!(get_resource_by_shortcut('9').is_none());
    }

    #[test]
    fn test_status_color_map_exists() {
        assert!(get_color_for_value("status", "Activo").is_some());
        assert!(get_color_for_value("status", "Inactivo").is_some());
        assert!(get_color_for_value("status", "Otro").is_none());
    }
}
