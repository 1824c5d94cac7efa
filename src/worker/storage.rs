//! Cache Storage
//!
//! Named cache generations, each mapping a request URL to a stored
//! response. Only GET requests are stored or matched. Generations are kept
//! in creation order.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use thiserror::Error;
use tokio::sync::RwLock;

use super::http::{BodyError, Request, Response, StoredResponse};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("{0} requests cannot be cached")]
    UnsupportedMethod(Method),

    #[error(transparent)]
    Body(#[from] BodyError),
}

// == Cache ==
/// One cache generation. Cloning yields another handle to the same entries.
#[derive(Debug, Clone)]
pub struct Cache {
    name: Arc<str>,
    entries: Arc<RwLock<HashMap<String, StoredResponse>>>,
}

impl Cache {
    fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores `response` under `request`, consuming it. Pass a clone if the
    /// response is still needed.
    pub async fn put(&self, request: &Request, response: Response) -> Result<(), CacheError> {
        if !request.is_cacheable() {
            return Err(CacheError::UnsupportedMethod(request.method().clone()));
        }
        let stored = response.into_stored()?;
        self.entries
            .write()
            .await
            .insert(request.cache_key().to_string(), stored);
        Ok(())
    }

    /// Returns a fresh, unread copy of the stored response. Non-GET
    /// requests never match.
    pub async fn match_request(&self, request: &Request) -> Option<Response> {
        if !request.is_cacheable() {
            return None;
        }
        self.entries
            .read()
            .await
            .get(request.cache_key())
            .map(StoredResponse::to_response)
    }

    pub async fn delete(&self, request: &Request) -> bool {
        self.entries
            .write()
            .await
            .remove(request.cache_key())
            .is_some()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

// == Cache Storage ==
/// All cache generations for one origin.
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    caches: Arc<RwLock<Vec<Cache>>>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the generation called `name`, creating it if needed.
    pub async fn open(&self, name: &str) -> Cache {
        let mut caches = self.caches.write().await;
        if let Some(cache) = caches.iter().find(|c| c.name() == name) {
            return cache.clone();
        }
        let cache = Cache::new(name);
        caches.push(cache.clone());
        cache
    }

    /// Returns the generation called `name` without creating it.
    pub async fn get(&self, name: &str) -> Option<Cache> {
        self.caches
            .read()
            .await
            .iter()
            .find(|c| c.name() == name)
            .cloned()
    }

    pub async fn has(&self, name: &str) -> bool {
        self.caches.read().await.iter().any(|c| c.name() == name)
    }

    /// Removes the generation. Returns false if it did not exist.
    pub async fn delete(&self, name: &str) -> bool {
        let mut caches = self.caches.write().await;
        let before = caches.len();
        caches.retain(|c| c.name() != name);
        caches.len() != before
    }

    /// Generation names in creation order.
    pub async fn keys(&self) -> Vec<String> {
        self.caches
            .read()
            .await
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    /// First match across all generations, oldest first.
    pub async fn match_request(&self, request: &Request) -> Option<Response> {
        let caches = self.caches.read().await.clone();
        for cache in caches {
            if let Some(response) = cache.match_request(request).await {
                return Some(response);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn request(path: &str) -> Request {
        Request::parse(&format!("https://livepay.org{path}")).unwrap()
    }

    #[tokio::test]
    async fn test_open_is_idempotent() {
        let storage = CacheStorage::new();
        let a = storage.open("v1").await;
        a.put(&request("/a.css"), Response::new(StatusCode::OK, "a")).await.unwrap();

        let again = storage.open("v1").await;
        assert_eq!(again.len().await, 1);
        assert_eq!(storage.keys().await, vec!["v1".to_string()]);
    }

    #[tokio::test]
    async fn test_match_returns_fresh_copies() {
        let storage = CacheStorage::new();
        let cache = storage.open("v1").await;
        cache.put(&request("/app.js"), Response::new(StatusCode::OK, "js")).await.unwrap();

        let mut first = cache.match_request(&request("/app.js")).await.unwrap();
        let mut second = cache.match_request(&request("/app.js")).await.unwrap();
        assert_eq!(first.text().unwrap(), "js");
        assert_eq!(second.text().unwrap(), "js");
    }

    #[tokio::test]
    async fn test_put_rejects_consumed_response() {
        let cache = CacheStorage::new().open("v1").await;
        let mut response = Response::new(StatusCode::OK, "x");
        response.bytes().unwrap();

        let result = cache.put(&request("/x"), response).await;
        assert_eq!(result, Err(CacheError::Body(BodyError::AlreadyConsumed)));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_put_rejects_non_get_requests() {
        let cache = CacheStorage::new().open("v1").await;
        let url = request("/api/petition/sign").url().clone();
        let post = Request::new(Method::POST, url).with_body("{}");

        let result = cache
            .put(&post, Response::new(StatusCode::CREATED, "{\"success\":true}"))
            .await;
        assert_eq!(result, Err(CacheError::UnsupportedMethod(Method::POST)));
        assert!(cache.is_empty().await);
        assert!(cache.match_request(&post).await.is_none());
    }

    #[tokio::test]
    async fn test_get_does_not_create_generation() {
        let storage = CacheStorage::new();
        assert!(storage.get("v1").await.is_none());
        assert!(storage.keys().await.is_empty());

        storage.open("v1").await;
        assert_eq!(storage.get("v1").await.unwrap().name(), "v1");
    }

    #[tokio::test]
    async fn test_delete_generation() {
        let storage = CacheStorage::new();
        storage.open("old").await;
        storage.open("new").await;

        assert!(storage.delete("old").await);
        assert!(!storage.delete("old").await);
        assert!(!storage.has("old").await);
        assert_eq!(storage.keys().await, vec!["new".to_string()]);
    }

    #[tokio::test]
    async fn test_storage_match_searches_all_generations() {
        let storage = CacheStorage::new();
        storage.open("empty").await;
        let full = storage.open("full").await;
        full.put(&request("/logo.png"), Response::new(StatusCode::OK, "png")).await.unwrap();

        assert!(storage.match_request(&request("/logo.png")).await.is_some());
        assert!(storage.match_request(&request("/missing.png")).await.is_none());
    }

    #[tokio::test]
    async fn test_cache_delete_entry() {
        let cache = CacheStorage::new().open("v1").await;
        cache.put(&request("/a"), Response::new(StatusCode::OK, "a")).await.unwrap();

        assert!(cache.delete(&request("/a")).await);
        assert!(cache.keys().await.is_empty());
    }
}
