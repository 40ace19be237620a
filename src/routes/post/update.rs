use super::{missing_field, AuthorOptions};
use crate::blog::{PostID, PostUpdate};
use crate::error::ApiError;
use crate::state::SharedState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

/// Anything outside of these fields is ignored.
#[derive(Debug, Deserialize)]
pub(super) struct UpdateOptions {
    #[serde(default)]
    id: Option<PostID>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    author: Option<AuthorOptions>,
    #[serde(default, alias = "publishDate")]
    created: Option<String>,
}

impl UpdateOptions {
    fn into_update(self) -> Result<PostUpdate, ApiError> {
        for (field, value) in [("title", &self.title), ("content", &self.content)] {
            if value.as_ref().is_some_and(|text| text.trim().is_empty()) {
                return Err(ApiError::Validation(format!("`{field}` must not be empty")));
            }
        }

        let author = match self.author {
            Some(author) => Some(author.validate().map_err(missing_field)?),
            None => None,
        };

        Ok(PostUpdate {
            title: self.title,
            content: self.content,
            author,
            created: self.created,
        })
    }
}

pub(super) async fn put(
    State(state): SharedState,
    Path(post_id): Path<PostID>,
    request: Result<Json<UpdateOptions>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = request?;

    if request.id.as_deref() != Some(post_id.as_str()) {
        return Err(ApiError::Validation(format!(
            "Request path id ({post_id}) and request body id ({}) must match",
            request.id.as_deref().unwrap_or("missing")
        )));
    }
    if !crate::blog::is_valid_post_id(&post_id) {
        return Err(ApiError::Validation(format!(
            "`{post_id}` is not a valid post id"
        )));
    }

    let update = request.into_update()?;
    match state.store.update(&post_id, update).await? {
        Some(_) => {
            tracing::info!(%post_id, "updated post");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::NotFound),
    }
}
