use crate::blog::{BlogPost, PostView};
use crate::error::ApiError;
use crate::state::SharedState;
use axum::extract::State;
use axum::Json;

pub(super) async fn get(State(state): SharedState) -> Result<Json<Vec<PostView>>, ApiError> {
    let posts = state.store.list_all().await?;

    Ok(Json(posts.iter().map(BlogPost::serialize).collect()))
}
