//! Browser upload form and result page

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Html,
};
use cardscan_core::{AppError, ErrorMetadata};
use std::sync::Arc;

use crate::error::{log_error, status_of};
use crate::render::{self, PageContext};
use crate::state::AppState;
use crate::utils::upload::read_card_upload;

fn page_context(state: &AppState) -> PageContext<'_> {
    PageContext {
        locale: state.locale(),
        allowed_extensions: &state.config.uploads.allowed_extensions,
        debug: state.config.debug(),
    }
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render::index_page(&page_context(&state)))
}

#[tracing::instrument(skip(state, multipart), fields(operation = "scan_page"))]
pub async fn scan_page(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let ctx = page_context(&state);

    let file = match read_card_upload(multipart, &state.config.uploads).await {
        Ok(file) => file,
        Err(e) => return error_page(&ctx, None, e),
    };
    let file_name = file.file_name.clone();

    match state.scanner.scan(file).await {
        Ok(outcome) => (StatusCode::OK, Html(render::result_page(&ctx, &outcome))),
        Err(e) => error_page(&ctx, Some(&file_name), e),
    }
}

fn error_page(
    ctx: &PageContext<'_>,
    file_name: Option<&str>,
    error: AppError,
) -> (StatusCode, Html<String>) {
    log_error(&error);
    let message = match (&error, file_name) {
        (AppError::Storage(_) | AppError::Configuration(_), Some(name)) => {
            ctx.locale.upload_failed(name)
        }
        _ => format!("{}: {}", ctx.locale.processing_failed(), error.client_message()),
    };
    (status_of(&error), Html(render::error_page(ctx, &message)))
}
