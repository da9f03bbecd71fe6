//! Dashboard counts shown in the header

use crate::api::CatalogClient;
use crate::resource::{all_resources, ResourceClient, Status};
use futures::future::join_all;
use serde_json::Value;

/// Active record count of one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCount {
    pub key: String,
    pub display_name: String,
    pub active: usize,
}

fn count_active(items: &[Value]) -> usize {
    items
        .iter()
        .filter(|item| Status::of(item) == Status::Active)
        .count()
}

/// Count active records of every resource, fetching the collections in
/// parallel. `loaded` is a collection already in memory (resource key and
/// its records); it is counted as-is instead of being fetched again.
/// A collection that fails to load counts as zero.
pub async fn fetch_active_counts(
    api: &CatalogClient,
    loaded: Option<(&str, &[Value])>,
) -> Vec<ResourceCount> {
    let resources = all_resources();
    let results = join_all(resources.iter().map(|def| async move {
        match loaded {
            Some((key, items)) if key == def.key => Some(count_active(items)),
            _ => match ResourceClient::new(api, def).list().await {
                Ok(items) => Some(count_active(&items)),
                Err(e) => {
                    tracing::debug!("Counting {} failed: {}", def.key, e);
                    None
                },
            },
        }
    }))
    .await;

    resources
        .iter()
        .zip(results)
        .map(|(def, active)| ResourceCount {
            key: def.key.clone(),
            display_name: def.display_name.clone(),
            active: active.unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_status_counts_as_active() {
        let items = vec![
            json!({"_id": "1"}),
            json!({"_id": "2", "estado": "Activo"}),
            json!({"_id": "3", "estado": "Inactivo"}),
        ];
        assert_eq!(count_active(&items), 2);
    }
}
