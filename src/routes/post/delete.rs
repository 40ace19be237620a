use crate::blog::PostID;
use crate::error::ApiError;
use crate::state::SharedState;
use axum::extract::{Path, State};
use axum::http::StatusCode;

// deleting a post that is already gone still succeeds
pub(super) async fn delete(
    State(state): SharedState,
    Path(post_id): Path<PostID>,
) -> Result<StatusCode, ApiError> {
    if state.store.remove(&post_id).await? {
        tracing::info!(%post_id, "deleted post");
    } else {
        tracing::debug!(%post_id, "nothing to delete");
    }

    Ok(StatusCode::NO_CONTENT)
}
