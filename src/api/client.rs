//! Catalog Client
//!
//! Main client for the catalog REST backend, combining the configured base
//! URL with the HTTP functionality.

use super::http::{ApiError, ApiHttpClient};
use serde_json::Value;
use url::Url;

/// Main catalog client
#[derive(Clone)]
pub struct CatalogClient {
    pub http: ApiHttpClient,
    base_url: Url,
}

impl CatalogClient {
    /// Create a new client for the given base URL
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(base_url)?;
        let http = ApiHttpClient::new()?;

        Ok(Self { http, base_url })
    }

    /// Base URL all collection paths are resolved against
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Make a GET request
    pub async fn get(&self, url: &str) -> Result<Value, ApiError> {
        self.http.get(url).await
    }

    /// Make a POST request
    pub async fn post(&self, url: &str, body: &Value) -> Result<Value, ApiError> {
        self.http.post(url, body).await
    }

    /// Make a PUT request
    pub async fn put(&self, url: &str, body: &Value) -> Result<Value, ApiError> {
        self.http.put(url, body).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &str) -> Result<Value, ApiError> {
        self.http.delete(url).await
    }

    // =========================================================================
    // URL helpers
    // =========================================================================

    /// Build a collection URL: `{base}{collection}`
    pub fn collection_url(&self, collection: &str) -> Result<String, ApiError> {
        Ok(self.base_url.join(collection)?.to_string())
    }

    /// Build an item URL: `{base}{collection}/{id}`
    pub fn item_url(&self, collection: &str, id: &str) -> Result<String, ApiError> {
        let path = format!("{}/{}", collection, urlencoding::encode(id));
        Ok(self.base_url.join(&path)?.to_string())
    }
}

/// Parse a base URL and make sure it ends with `/` so joins append
/// instead of replacing the last segment.
fn normalize_base_url(raw: &str) -> Result<Url, ApiError> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Ok(Url::parse(trimmed)?)
    } else {
        Ok(Url::parse(&format!("{}/", trimmed))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_url_appends_path() {
        let client = CatalogClient::new("http://localhost:4000/api/").unwrap();
        assert_eq!(
            client.collection_url("directores").unwrap(),
            "http://localhost:4000/api/directores"
        );
    }

    #[test]
    fn test_base_url_without_trailing_slash_is_normalized() {
        let client = CatalogClient::new("http://localhost:4000/api").unwrap();
        assert_eq!(client.base_url(), "http://localhost:4000/api/");
        assert_eq!(
            client.collection_url("generos").unwrap(),
            "http://localhost:4000/api/generos"
        );
    }

    #[test]
    fn test_item_url_encodes_id() {
        let client = CatalogClient::new("http://localhost:4000/api/").unwrap();
        assert_eq!(
            client.item_url("media", "65a1f0c2e4b0").unwrap(),
            "http://localhost:4000/api/media/65a1f0c2e4b0"
        );
        assert_eq!(
            client.item_url("tipos", "a b").unwrap(),
            "http://localhost:4000/api/tipos/a%20b"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            CatalogClient::new("not a url"),
            Err(ApiError::Url(_))
        ));
    }
}
