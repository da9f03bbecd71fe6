//! Resource Client - one REST collection, five operations
//!
//! Each call issues exactly one HTTP request to
//! `{base}{collection}[/{id}]`. Failures are tagged with the operation and
//! entity so controllers can map them to user-facing messages.

use super::registry::ResourceDef;
use crate::api::{ApiError, CatalogClient};
use serde_json::Value;
use std::fmt;

/// CRUD operation performed by a [`ResourceClient`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    fn verb(self) -> &'static str {
        match self {
            Operation::List | Operation::Get => "fetch",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Failure of a resource operation ("failed to create director")
#[derive(Debug, thiserror::Error)]
#[error("failed to {op} {entity}")]
pub struct ResourceError {
    pub op: Operation,
    pub entity: String,
    #[source]
    pub source: ApiError,
}

impl ResourceError {
    fn new(op: Operation, def: &ResourceDef, source: ApiError) -> Self {
        let entity = match op {
            Operation::List => def.entity_plural.clone(),
            _ => def.entity.clone(),
        };
        Self { op, entity, source }
    }
}

/// Client bound to one resource collection
#[derive(Clone, Copy)]
pub struct ResourceClient<'a> {
    api: &'a CatalogClient,
    def: &'static ResourceDef,
}

impl<'a> ResourceClient<'a> {
    pub fn new(api: &'a CatalogClient, def: &'static ResourceDef) -> Self {
        Self { api, def }
    }

    pub fn def(&self) -> &'static ResourceDef {
        self.def
    }

    /// `GET {collection}`; the answer must be an array
    pub async fn list(&self) -> Result<Vec<Value>, ResourceError> {
        let items = self.tag(Operation::List, self.fetch_all().await)?;
        tracing::debug!("Fetched {} {}", items.len(), self.def.entity_plural);
        Ok(items)
    }

    /// `GET {collection}/{id}`
    pub async fn get_by_id(&self, id: &str) -> Result<Value, ResourceError> {
        let result = async {
            let url = self.api.item_url(&self.def.collection, id)?;
            self.api.get(&url).await
        };
        self.tag(Operation::Get, result.await)
    }

    /// `POST {collection}` with the draft body
    pub async fn create(&self, body: &Value) -> Result<Value, ResourceError> {
        let result = async {
            let url = self.api.collection_url(&self.def.collection)?;
            self.api.post(&url, body).await
        };
        let created = self.tag(Operation::Create, result.await)?;
        tracing::info!("Created {}", self.def.entity);
        Ok(created)
    }

    /// `PUT {collection}/{id}` with the draft body
    pub async fn update(&self, id: &str, body: &Value) -> Result<Value, ResourceError> {
        let result = async {
            let url = self.api.item_url(&self.def.collection, id)?;
            self.api.put(&url, body).await
        };
        let updated = self.tag(Operation::Update, result.await)?;
        tracing::info!("Updated {} {}", self.def.entity, id);
        Ok(updated)
    }

    /// `DELETE {collection}/{id}`; the server soft-deletes
    pub async fn delete(&self, id: &str) -> Result<Value, ResourceError> {
        let result = async {
            let url = self.api.item_url(&self.def.collection, id)?;
            self.api.delete(&url).await
        };
        let deleted = self.tag(Operation::Delete, result.await)?;
        tracing::info!("Deleted {} {}", self.def.entity, id);
        Ok(deleted)
    }

    async fn fetch_all(&self) -> Result<Vec<Value>, ApiError> {
        let url = self.api.collection_url(&self.def.collection)?;
        match self.api.get(&url).await? {
            Value::Array(items) => Ok(items),
            _ => Err(ApiError::Shape("array")),
        }
    }

    fn tag<T>(&self, op: Operation, result: Result<T, ApiError>) -> Result<T, ResourceError> {
        result.map_err(|source| {
            let err = ResourceError::new(op, self.def, source);
            tracing::warn!("{}: {}", err, err.source);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::get_resource;
    use reqwest::StatusCode;

    #[test]
    fn test_error_tag_uses_entity_name() {
        let directors = get_resource("directores").unwrap();
        let err = ResourceError::new(
            Operation::Create,
            directors,
            ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR),
        );
        assert_eq!(err.to_string(), "failed to create director");
    }

    #[test]
    fn test_list_error_uses_plural() {
        let genres = get_resource("generos").unwrap();
        let err = ResourceError::new(Operation::List, genres, ApiError::Shape("array"));
        assert_eq!(err.to_string(), "failed to fetch genres");

        let err = ResourceError::new(Operation::Get, genres, ApiError::Shape("object"));
        assert_eq!(err.to_string(), "failed to fetch genre");
    }
}
