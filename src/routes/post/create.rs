use super::{missing_field, present, AuthorOptions};
use crate::blog::{NewPost, PostView};
use crate::error::ApiError;
use crate::state::SharedState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct CreateOptions {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    author: Option<AuthorOptions>,
    #[serde(default, alias = "publishDate")]
    created: Option<String>,
}

impl CreateOptions {
    /// Checks `title`, `content` and `author` in that order and names the first
    /// one that is missing.
    fn validate(self) -> Result<NewPost, &'static str> {
        let title = present(self.title).ok_or("title")?;
        let content = present(self.content).ok_or("content")?;
        let author = self.author.ok_or("author")?.validate()?;

        Ok(NewPost {
            title,
            content,
            author,
            created: self.created,
        })
    }
}

pub(super) async fn post(
    State(state): SharedState,
    request: Result<Json<CreateOptions>, JsonRejection>,
) -> Result<(StatusCode, Json<PostView>), ApiError> {
    let Json(request) = request?;
    let new_post = request.validate().map_err(missing_field)?;

    let post = state.store.create(new_post).await?;
    tracing::info!(post_id = %post.id, "created post");

    Ok((StatusCode::CREATED, Json(post.serialize())))
}
