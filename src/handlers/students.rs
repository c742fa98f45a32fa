use axum::extract::State;
use tracing::info;

use crate::database::models::Student;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, JsonObject, MessageBody, PathId};
use crate::state::AppState;
use crate::validation;

/// GET /api - List every student
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Student>> {
    let students = state.store().find_all().await?;
    Ok(ApiResponse::success(students))
}

/// GET /api/:id - Get a single student by id
pub async fn get(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<Student> {
    let id = validation::validate_lookup(&id)?;

    let student = state
        .store()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::student_not_found(id))?;

    Ok(ApiResponse::success(student))
}

/// POST /api - Create a student; a duplicate national code surfaces from the store as 409
pub async fn create(
    State(state): State<AppState>,
    JsonObject(body): JsonObject,
) -> ApiResult<Student> {
    let attrs = validation::validate_create(&body)?;

    let student = Student::build(attrs);
    state.store().insert(&student).await?;

    info!("Created student {}", student.id);
    Ok(ApiResponse::created(student))
}

/// PATCH /api/:id - Overwrite the fields present in the body, keep the rest
pub async fn edit(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonObject(body): JsonObject,
) -> ApiResult<Student> {
    let (id, patch) = validation::validate_edit(&id, &body)?;

    let mut student = state
        .store()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::student_not_found(id))?;

    patch.apply(&mut student);

    // Deleted between the read and the write
    if !state.store().update_by_id(&student).await? {
        return Err(ApiError::student_not_found(id));
    }

    info!("Edited student {}", id);
    Ok(ApiResponse::success(student))
}

/// DELETE /api/:id - Delete a student
pub async fn delete(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<MessageBody> {
    let id = validation::validate_lookup(&id)?;

    if !state.store().delete_by_id(id).await? {
        return Err(ApiError::student_not_found(id));
    }

    info!("Deleted student {}", id);
    Ok(ApiResponse::success(MessageBody::new(format!(
        "Student with id {} deleted successfully.",
        id
    ))))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::app;
    use crate::config::AppConfig;
    use crate::database::models::NewStudent;
    use crate::database::{DatabaseError, StudentStore};
    use crate::state::AppState;

    use super::*;

    /// Finds its one record but loses it before the write lands
    struct VanishingStore {
        student: Student,
    }

    #[async_trait]
    impl StudentStore for VanishingStore {
        async fn find_all(&self) -> Result<Vec<Student>, DatabaseError> {
            Ok(vec![self.student.clone()])
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, DatabaseError> {
            Ok((id == self.student.id).then(|| self.student.clone()))
        }

        async fn insert(&self, _student: &Student) -> Result<(), DatabaseError> {
            Ok(())
        }

        async fn update_by_id(&self, _student: &Student) -> Result<bool, DatabaseError> {
            Ok(false)
        }

        async fn delete_by_id(&self, _id: Uuid) -> Result<bool, DatabaseError> {
            Ok(false)
        }

        async fn replace_all(&self, students: &[Student]) -> Result<u64, DatabaseError> {
            Ok(students.len() as u64)
        }

        async fn ping(&self) -> Result<(), DatabaseError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn edit_of_record_deleted_mid_request_is_not_found() {
        let student = Student::build(NewStudent {
            first_name: "Sara".into(),
            last_name: "Ahmadi".into(),
            national_code: "0012345678".into(),
            phone_number: "09121234567".into(),
            father_name: "Reza".into(),
            school_name: "Farzanegan".into(),
            educational_level: "Tenth grade".into(),
        });
        let id = student.id;
        let store = Arc::new(VanishingStore { student });
        let router = app(AppState::new(store, AppConfig::development()));

        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/api/{}", id))
            .header("content-type", "application/json")
            .body(Body::from(json!({ "firstName": "Maryam" }).to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({ "errors": [{ "message": format!("Student with id {} not found.", id) }] })
        );
    }
}
