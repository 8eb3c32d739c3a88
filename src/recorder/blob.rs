use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use super::constants::OBJECT_URL_PREFIX;

/// Media type tag attached to an assembled blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobOptions {
    pub mime_type: String,
}

impl BlobOptions {
    pub fn new(mime_type: impl Into<String>) -> Self {
        BlobOptions {
            mime_type: mime_type.into(),
        }
    }
}

/// An immutable binary assembled from recorded chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    data: Vec<u8>,
    mime_type: String,
}

impl Blob {
    /// Concatenates `chunks` in order.
    pub fn new<C: AsRef<[u8]>>(chunks: &[C], options: &BlobOptions) -> Self {
        let size = chunks.iter().map(|chunk| chunk.as_ref().len()).sum();
        let mut data = Vec::with_capacity(size);
        for chunk in chunks {
            data.extend_from_slice(chunk.as_ref());
        }

        Blob {
            data,
            mime_type: options.mime_type.clone(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Maps `blob:` URLs to the blobs they reference.
///
/// Clones share the same table, so a URL published by a recorder can be
/// resolved from anywhere holding a clone. Blobs are held until their URL is
/// revoked.
#[derive(Debug, Clone, Default)]
pub struct BlobRegistry {
    next_id: Arc<AtomicU64>,
    blobs: Arc<Mutex<HashMap<String, Arc<Blob>>>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_object_url(&self, blob: Blob) -> String {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let url = format!("{OBJECT_URL_PREFIX}{id}");

        match self.blobs.lock() {
            Ok(mut blobs) => {
                blobs.insert(url.clone(), Arc::new(blob));
            }
            Err(error) => {
                tracing::error!("Failed to lock the blob registry: {}", error);
            }
        }

        url
    }

    pub fn resolve(&self, url: &str) -> Option<Arc<Blob>> {
        match self.blobs.lock() {
            Ok(blobs) => blobs.get(url).cloned(),
            Err(error) => {
                tracing::error!("Failed to lock the blob registry: {}", error);
                None
            }
        }
    }

    /// Returns `false` if the URL was unknown or already revoked.
    pub fn revoke_object_url(&self, url: &str) -> bool {
        match self.blobs.lock() {
            Ok(mut blobs) => blobs.remove(url).is_some(),
            Err(error) => {
                tracing::error!("Failed to lock the blob registry: {}", error);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().map(|blobs| blobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
