use super::{PostStore, StoreError};
use crate::blog::{BlogPost, NewPost, PostID, PostUpdate};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: RwLock<HashMap<PostID, BlogPost>>,
    // every id ever handed out, so deleted ids stay retired; grows with each
    // create and is never pruned
    issued_ids: RwLock<HashSet<PostID>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    async fn issue_id(&self) -> PostID {
        let mut issued_ids = self.issued_ids.write().await;
        loop {
            let id = crate::blog::new_post_id();
            if issued_ids.insert(id.clone()) {
                return id;
            }
        }
    }
}

#[async_trait::async_trait]
impl PostStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<BlogPost>, StoreError> {
        Ok(self.posts.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn create(&self, new_post: NewPost) -> Result<BlogPost, StoreError> {
        let post = BlogPost::from_new(self.issue_id().await, new_post);

        self.posts
            .write()
            .await
            .insert(post.id.clone(), post.clone());

        Ok(post)
    }

    async fn update(
        &self,
        id: &str,
        update: PostUpdate,
    ) -> Result<Option<BlogPost>, StoreError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.get_mut(id) else {
            return Ok(None);
        };

        update.apply(post);
        Ok(Some(post.clone()))
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.posts.write().await.remove(id).is_some())
    }
}
