use crate::blog::{BlogPost, NewPost, PostUpdate};
use std::sync::Arc;
use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error in post store: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored post {id} is not a valid document: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported database url {0:?}")]
    UnsupportedUrl(String),
}

/// Persistence for blog posts. Lookups that can miss return `Option`/`bool`
/// so callers can tell "not found" apart from a failing store.
#[async_trait::async_trait]
pub trait PostStore: Send + Sync + std::fmt::Debug {
    /// Every stored post, in whatever order the backend yields them.
    async fn list_all(&self) -> Result<Vec<BlogPost>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<BlogPost>, StoreError>;

    /// Persists a new post under a freshly assigned id.
    async fn create(&self, new_post: NewPost) -> Result<BlogPost, StoreError>;

    /// `Ok(None)` if there is no post with this id.
    async fn update(&self, id: &str, update: PostUpdate)
        -> Result<Option<BlogPost>, StoreError>;

    /// `Ok(false)` if there was nothing to remove.
    async fn remove(&self, id: &str) -> Result<bool, StoreError>;

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub type SharedStore = Arc<dyn PostStore>;

/// Opens the store a database url points at.
///
/// `memory:` (or `memory://`) keeps posts in process memory. `file://<dir>` or a
/// bare path keeps one JSON document per post under `<dir>/post`.
pub async fn connect(database_url: &str) -> Result<SharedStore, StoreError> {
    let database_url = database_url.trim();

    if database_url == "memory:" || database_url == "memory://" {
        return Ok(Arc::new(MemoryStore::new()));
    }

    let path = match database_url.split_once("://") {
        Some(("file", path)) => path,
        Some(_) => return Err(StoreError::UnsupportedUrl(database_url.to_owned())),
        None if database_url.is_empty() => {
            return Err(StoreError::UnsupportedUrl(database_url.to_owned()))
        }
        None => database_url,
    };

    Ok(Arc::new(FileStore::open(path).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connects_to_memory_store() {
        let store = connect("memory://").await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_unknown_schemes() {
        let err = connect("mongodb://localhost/blog-app").await.unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedUrl(_)));

        let err = connect("   ").await.unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedUrl(_)));
    }

    #[tokio::test]
    async fn connects_to_file_store() {
        let root = file::tests::scratch_dir();
        let store = connect(&format!("file://{}", root.display())).await.unwrap();

        assert!(store.list_all().await.unwrap().is_empty());
        assert!(root.join("post").is_dir());

        let _ = std::fs::remove_dir_all(root);
    }
}
