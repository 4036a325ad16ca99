//! Image fetching.
//!
//! Exporters never download images themselves. Every `src` met during
//! assembly is handed to an [`ImageFetcher`], which returns the raw bytes or
//! `None`. `None` always means "leave this image out": fetch failures are
//! logged and never abort an export.

#[cfg(feature = "proxy")]
mod proxy;

#[cfg(feature = "proxy")]
pub use proxy::{EditorClient, ProxyImageFetcher};

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::model::ImageAsset;

/// Resolves image URLs into raw bytes.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch the image at `url`. Returns `None` on any failure.
    async fn fetch(&self, url: &str) -> Option<Vec<u8>>;
}

#[async_trait]
impl<F: ImageFetcher + ?Sized> ImageFetcher for &F {
    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        (**self).fetch(url).await
    }
}

/// Fetcher that never returns an image. Used when no proxy is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

#[async_trait]
impl ImageFetcher for NoImages {
    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        log::debug!("image fetching disabled, skipping {}", url);
        None
    }
}

/// Request-scoped cache in front of another fetcher.
///
/// Each distinct URL reaches the inner fetcher at most once for the lifetime
/// of the wrapper, failures included. Build one per export call.
pub struct MemoizedFetcher<F> {
    inner: F,
    cache: Mutex<HashMap<String, Option<Vec<u8>>>>,
    misses: AtomicUsize,
}

impl<F: ImageFetcher> MemoizedFetcher<F> {
    /// Wrap `inner` with an empty cache.
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
            misses: AtomicUsize::new(0),
        }
    }

    /// Number of requests forwarded to the inner fetcher.
    pub fn upstream_requests(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    fn cached(&self, url: &str) -> Option<Option<Vec<u8>>> {
        self.cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(url).cloned())
    }
}

#[async_trait]
impl<F: ImageFetcher> ImageFetcher for MemoizedFetcher<F> {
    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        if let Some(hit) = self.cached(url) {
            return hit;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let result = self.inner.fetch(url).await;
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(url.to_string(), result.clone());
        }
        result
    }
}

/// Fetch `url` and turn the bytes into an embeddable asset.
///
/// Unsupported formats are logged and treated like a failed fetch.
pub async fn resolve_image<F: ImageFetcher + ?Sized>(fetcher: &F, url: &str) -> Option<ImageAsset> {
    let data = fetcher.fetch(url).await?;
    match ImageAsset::from_bytes(url, data) {
        Ok(asset) => Some(asset),
        Err(e) => {
            log::warn!("skipping image {}: {}", url, e);
            None
        }
    }
}
