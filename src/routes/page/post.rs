use super::PageError;
use crate::blog::Post;
use crate::comment::{self, CommentForm, FormState};
use crate::loader::PageProps;
use crate::render::{self, FormView};
use crate::state::SharedState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Form;
use std::sync::Arc;
use std::time::Duration;

async fn load_post(
    state: &crate::state::State,
    slug: &str,
) -> Result<(Arc<Post>, Duration), PageError> {
    match state.pages.get(slug).await {
        Ok(PageProps::Found { post, revalidate }) => Ok((post, revalidate)),
        Ok(PageProps::NotFound) => Err(PageError::NotFound(slug.to_string())),
        Err(err) => {
            tracing::error!(%slug, "Error loading post: {err}");
            Err(PageError::Unavailable)
        }
    }
}

pub(super) async fn get(
    State(state): SharedState,
    Path(slug): Path<String>,
) -> Result<Response, PageError> {
    let (post, revalidate) = load_post(&state, &slug).await?;

    let cache_control = format!(
        "s-maxage={}, stale-while-revalidate",
        revalidate.as_secs()
    );
    let page = render::post_page(&post, &FormView::idle(&post));

    Ok(([(header::CACHE_CONTROL, cache_control)], page).into_response())
}

pub(super) async fn post(
    State(state): SharedState,
    Path(slug): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<Response, PageError> {
    let (post, _) = load_post(&state, &slug).await?;

    // the hidden id always names the post being viewed
    let form = CommentForm {
        post_id: post.id.clone(),
        ..form
    };

    let form_state = comment::submit_form(&state.submitter, form.clone(), |form_state| {
        tracing::debug!(%slug, ?form_state, "comment form transition")
    })
    .await;

    let status = match form_state {
        FormState::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };
    let view = FormView::after(&post, form, form_state);

    Ok((status, render::post_page(&post, &view)).into_response())
}
