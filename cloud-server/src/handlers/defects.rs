//! Defect detection handlers

use axum::{extract::{Multipart, State}, Json};

use qc_signal_core::constants::IMAGE_FIELD_NAME;
use qc_signal_core::logic::gateway::{DetectionVerdict, ImageUpload};
use qc_signal_core::logic::lifecycle::{Completion, RequestState};

use crate::{AppState, AppResult, AppError};
use crate::middleware::auth::SessionContext;
use crate::models::RequestView;

/// Upload one image for classification; rejected while the previous one is pending
pub async fn detect(
    State(state): State<AppState>,
    session: SessionContext,
    mut multipart: Multipart,
) -> AppResult<Json<RequestView<DetectionVerdict>>> {
    let image = read_image(&mut multipart).await?;
    let dashboard = state.sessions.get_or_create(&session.session_id)?;

    let ticket = dashboard.lock().begin_detection(image)?;
    tracing::debug!(session = %session.session_id, request = %ticket.request_id, "Defect detection submitted");

    // completes on its own task so a dropped client cannot leave the request pending
    let gateway = state.gateway.clone();
    let completion = tokio::spawn(async move {
        let result = gateway.detect_defect(&ticket.input).await;

        let mut ctx = dashboard.lock();
        if ctx.finish_detection(&ticket, result) == Completion::Discarded {
            return Err(AppError::Superseded);
        }

        match ctx.detection().state() {
            RequestState::Failed(err) => Err(err.clone().into()),
            _ => Ok(RequestView::of(ctx.detection())),
        }
    });

    Ok(Json(completion.await??))
}

/// Latest detection request of this session
pub async fn current(
    State(state): State<AppState>,
    session: SessionContext,
) -> AppResult<Json<RequestView<DetectionVerdict>>> {
    let dashboard = state.sessions.get_or_create(&session.session_id)?;
    let ctx = dashboard.lock();
    Ok(Json(RequestView::of(ctx.detection())))
}

async fn read_image(multipart: &mut Multipart) -> AppResult<ImageUpload> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD_NAME) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        let mut image = ImageUpload::new(data.to_vec());
        if let Some(name) = file_name {
            image = image.with_file_name(name);
        }
        if let Some(content_type) = content_type {
            image = image.with_content_type(content_type);
        }
        return Ok(image);
    }

    Err(AppError::ValidationError(format!("missing '{}' part", IMAGE_FIELD_NAME)))
}
