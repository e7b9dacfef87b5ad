use crate::state::NestedRouter;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;

mod post;

pub fn route() -> NestedRouter {
    axum::Router::new().route("/post/:slug", get(post::get).post(post::post))
}

/// Terminal page states other than a rendered post.
#[derive(Debug)]
pub enum PageError {
    NotFound(String),
    Unavailable,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound(slug) => {
                (StatusCode::NOT_FOUND, crate::render::not_found_page(&slug)).into_response()
            }
            PageError::Unavailable => {
                (StatusCode::BAD_GATEWAY, crate::render::unavailable_page()).into_response()
            }
        }
    }
}
