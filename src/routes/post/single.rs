use crate::blog::{PostID, PostView};
use crate::error::ApiError;
use crate::state::SharedState;
use axum::extract::{Path, State};
use axum::Json;

pub(super) async fn get(
    State(state): SharedState,
    Path(post_id): Path<PostID>,
) -> Result<Json<PostView>, ApiError> {
    if !crate::blog::is_valid_post_id(&post_id) {
        return Err(ApiError::Validation(format!(
            "`{post_id}` is not a valid post id"
        )));
    }

    let Some(post) = state.store.find_by_id(&post_id).await? else {
        return Err(ApiError::NotFound);
    };

    Ok(Json(post.serialize()))
}
