use axum::extract::State;
use tracing::info;

use crate::database::fixtures;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, MessageBody};
use crate::state::AppState;

/// POST /api/seed-students - Replace the collection with the bundled sample students
pub async fn post(State(state): State<AppState>) -> ApiResult<MessageBody> {
    let students = fixtures::sample_students().map_err(ApiError::unexpected)?;
    let inserted = state.store().replace_all(&students).await?;

    info!("Seeded {} students", inserted);
    Ok(ApiResponse::created(MessageBody::new(format!(
        "Successfully seeded {} student documents.",
        inserted
    ))))
}
