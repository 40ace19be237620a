use super::{PostStore, StoreError};
use crate::blog::{BlogPost, NewPost, PostUpdate};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps each post as its own JSON document at `<root>/post/<id>.json`.
///
/// Documents are written to a temporary sibling and then moved into place, so
/// readers only ever see complete documents.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    // held across update's read-modify-write and across remove
    writes: Arc<RwLock<()>>,
}

impl FileStore {
    pub async fn open(root: impl AsRef<Path>) -> Result<FileStore, StoreError> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(root.join("post")).await?;

        tracing::debug!(root = %root.display(), "opened file post store");
        Ok(FileStore {
            root,
            writes: Arc::new(RwLock::new(())),
        })
    }

    fn post_path(&self, id: &str) -> PathBuf {
        self.root.join("post").join(format!("{id}.json"))
    }

    // the leading dot keeps temporary files out of `list_all`
    fn temp_path(&self, id: &str) -> PathBuf {
        self.root.join("post").join(format!(
            ".{id}.{}.tmp",
            crate::blog::get_random_hex_string::<8>()
        ))
    }

    async fn read_post(&self, path: &Path, id: &str) -> Result<Option<BlogPost>, StoreError> {
        let file = match tokio::fs::read(path).await {
            Ok(it) => it,
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    return Ok(None);
                } else {
                    return Err(err.into());
                }
            }
        };

        match serde_json::from_slice(&file) {
            Ok(post) => Ok(Some(post)),
            Err(source) => Err(StoreError::Corrupt {
                id: id.to_owned(),
                source,
            }),
        }
    }

    async fn write_temp(&self, post: &BlogPost) -> Result<PathBuf, StoreError> {
        let temp_path = self.temp_path(&post.id);

        match tokio::fs::write(
            &temp_path,
            serde_json::to_vec(post).expect("post should serialize"),
        )
        .await
        {
            Ok(()) => Ok(temp_path),
            Err(err) => {
                discard_temp(&temp_path).await;
                Err(err.into())
            }
        }
    }

    /// Replaces an existing document in one step.
    async fn replace_post(&self, post: &BlogPost) -> Result<(), StoreError> {
        let temp_path = self.write_temp(post).await?;

        if let Err(err) = tokio::fs::rename(&temp_path, self.post_path(&post.id)).await {
            discard_temp(&temp_path).await;
            return Err(err.into());
        }

        Ok(())
    }
}

async fn discard_temp(temp_path: &Path) {
    match tokio::fs::remove_file(temp_path).await {
        Ok(()) => (),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => (),
        Err(err) => tracing::warn!("error removing temporary post {temp_path:?}: {err}"),
    }
}

#[async_trait::async_trait]
impl PostStore for FileStore {
    async fn list_all(&self) -> Result<Vec<BlogPost>, StoreError> {
        let mut posts_dir = tokio::fs::read_dir(self.root.join("post")).await?;
        let mut posts = Vec::new();

        while let Some(entry) = posts_dir.next_entry().await? {
            let path = entry.path();
            let Some(id) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(".json"))
                .filter(|id| crate::blog::is_valid_post_id(id))
            else {
                continue;
            };

            // a post removed between read_dir and read is simply skipped
            if let Some(post) = self.read_post(&path, id).await? {
                posts.push(post);
            }
        }

        Ok(posts)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        if !crate::blog::is_valid_post_id(id) {
            return Ok(None);
        }

        self.read_post(&self.post_path(id), id).await
    }

    async fn create(&self, new_post: NewPost) -> Result<BlogPost, StoreError> {
        loop {
            let post = BlogPost::from_new(crate::blog::new_post_id(), new_post.clone());
            let temp_path = self.write_temp(&post).await?;

            // hard_link never overwrites, so an id collision just picks another id
            let published = tokio::fs::hard_link(&temp_path, self.post_path(&post.id)).await;
            discard_temp(&temp_path).await;

            match published {
                Ok(()) => return Ok(post),
                Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(err.into()),
            }
        }
    }

    async fn update(
        &self,
        id: &str,
        update: PostUpdate,
    ) -> Result<Option<BlogPost>, StoreError> {
        let _writes = self.writes.write().await;

        // checked under the lock, so a concurrent remove can't be undone
        let Some(mut post) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        if !update.is_empty() {
            update.apply(&mut post);
            self.replace_post(&post).await?;
        }

        Ok(Some(post))
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        if !crate::blog::is_valid_post_id(id) {
            return Ok(false);
        }

        let _writes = self.writes.write().await;
        match tokio::fs::remove_file(self.post_path(id)).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::blog::tests::sample_new_post;

    pub(crate) fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!(
            "blog-posts-test-{}",
            crate::blog::get_random_hex_string::<8>()
        ))
    }

    #[tokio::test]
    async fn round_trips_through_disk() {
        let root = scratch_dir();
        let store = FileStore::open(&root).await.unwrap();

        let created = store.create(sample_new_post("on disk")).await.unwrap();
        assert!(root
            .join("post")
            .join(format!("{}.json", created.id))
            .is_file());

        // a second handle on the same directory sees the same documents
        let reopened = FileStore::open(&root).await.unwrap();
        assert_eq!(
            reopened.find_by_id(&created.id).await.unwrap(),
            Some(created.clone())
        );

        let updated = reopened
            .update(
                &created.id,
                PostUpdate {
                    title: Some("renamed".to_owned()),
                    ..PostUpdate::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.content, created.content);
        assert_eq!(store.find_by_id(&created.id).await.unwrap(), Some(updated));

        assert!(store.remove(&created.id).await.unwrap());
        assert!(!store.remove(&created.id).await.unwrap());
        assert!(store.find_by_id(&created.id).await.unwrap().is_none());

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn lists_only_post_documents() {
        let root = scratch_dir();
        let store = FileStore::open(&root).await.unwrap();

        for i in 0..3 {
            store.create(sample_new_post(&format!("post {i}"))).await.unwrap();
        }
        std::fs::write(root.join("post").join("notes.txt"), "ignore me").unwrap();

        assert_eq!(store.list_all().await.unwrap().len(), 3);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn malformed_ids_never_touch_the_filesystem() {
        let root = scratch_dir();
        let store = FileStore::open(&root).await.unwrap();

        assert!(store.find_by_id("../escape").await.unwrap().is_none());
        assert!(!store.remove("../escape").await.unwrap());
        assert!(store
            .update("../escape", PostUpdate::default())
            .await
            .unwrap()
            .is_none());

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn corrupt_documents_are_errors() {
        let root = scratch_dir();
        let store = FileStore::open(&root).await.unwrap();

        let id = crate::blog::new_post_id();
        std::fs::write(root.join("post").join(format!("{id}.json")), "{not json").unwrap();

        let err = store.find_by_id(&id).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
        assert!(store.list_all().await.is_err());

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn leaves_no_temporary_files() {
        let root = scratch_dir();
        let store = FileStore::open(&root).await.unwrap();

        let post = store.create(sample_new_post("tidy")).await.unwrap();
        store
            .update(
                &post.id,
                PostUpdate {
                    content: Some("edited".to_owned()),
                    ..PostUpdate::default()
                },
            )
            .await
            .unwrap();

        let names: Vec<_> = std::fs::read_dir(root.join("post"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec![format!("{}.json", post.id)]);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn reads_never_see_partial_documents() {
        let root = scratch_dir();
        let store = FileStore::open(&root).await.unwrap();

        let mut big = sample_new_post("big");
        big.content = "x".repeat(4 * 1024 * 1024);
        let post = store.create(big).await.unwrap();

        let writer = {
            let store = store.clone();
            let id = post.id.clone();
            tokio::spawn(async move {
                for i in 0..40 {
                    store
                        .update(
                            &id,
                            PostUpdate {
                                content: Some((i % 10).to_string().repeat(4 * 1024 * 1024)),
                                ..PostUpdate::default()
                            },
                        )
                        .await
                        .unwrap();
                }
            })
        };
        let creator = {
            let store = store.clone();
            tokio::spawn(async move {
                for i in 0..20 {
                    store.create(sample_new_post(&format!("new {i}"))).await.unwrap();
                }
            })
        };

        while !(writer.is_finished() && creator.is_finished()) {
            let found = store.find_by_id(&post.id).await.unwrap();
            assert!(found.is_some());
            store.list_all().await.unwrap();
        }
        writer.await.unwrap();
        creator.await.unwrap();

        assert_eq!(store.list_all().await.unwrap().len(), 21);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn removed_posts_stay_removed_under_concurrent_updates() {
        let root = scratch_dir();
        let store = FileStore::open(&root).await.unwrap();

        for i in 0..30 {
            let post = store.create(sample_new_post(&format!("doomed {i}"))).await.unwrap();

            let updater = {
                let store = store.clone();
                let id = post.id.clone();
                tokio::spawn(async move {
                    store
                        .update(
                            &id,
                            PostUpdate {
                                title: Some("still here".to_owned()),
                                ..PostUpdate::default()
                            },
                        )
                        .await
                        .unwrap()
                })
            };
            let remover = {
                let store = store.clone();
                let id = post.id.clone();
                tokio::spawn(async move { store.remove(&id).await.unwrap() })
            };

            updater.await.unwrap();
            assert!(remover.await.unwrap());
            assert!(store.find_by_id(&post.id).await.unwrap().is_none());
        }

        assert!(store.list_all().await.unwrap().is_empty());

        let _ = std::fs::remove_dir_all(root);
    }
}
