use crate::blog::Author;
use crate::state::NestedRouter;
use axum::routing::{get, post};
use serde::Deserialize;

mod create;
mod delete;
mod list;
mod single;
mod update;

pub fn route() -> NestedRouter {
    axum::Router::new()
        .route("/posts", get(list::get).fallback(super::not_found))
        .route("/post", post(create::post).fallback(super::not_found))
        .route(
            "/post/:id",
            get(single::get)
                .put(update::put)
                .delete(delete::delete)
                .fallback(super::not_found),
        )
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthorOptions {
    #[serde(default, rename = "firstName")]
    first_name: Option<String>,
    #[serde(default, rename = "lastName")]
    last_name: Option<String>,
}

impl AuthorOptions {
    /// On failure, names the first missing subfield.
    fn validate(self) -> Result<Author, &'static str> {
        Ok(Author {
            first_name: present(self.first_name).ok_or("author.firstName")?,
            last_name: present(self.last_name).ok_or("author.lastName")?,
        })
    }
}

// blank text counts as absent
fn present(field: Option<String>) -> Option<String> {
    field.filter(|text| !text.trim().is_empty())
}

fn missing_field(field: &str) -> crate::error::ApiError {
    crate::error::ApiError::Validation(format!("Missing `{field}` in request body"))
}
