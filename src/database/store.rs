use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Student;

/// Persistence operations the student controller depends on.
///
/// Each call is atomic for a single record. Uniqueness of `national_code` is the
/// store's job and is reported as [`DatabaseError::DuplicateKey`].
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Student>, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, DatabaseError>;

    async fn insert(&self, student: &Student) -> Result<(), DatabaseError>;

    /// Replace the stored record with the same id. `false` when no such record exists.
    async fn update_by_id(&self, student: &Student) -> Result<bool, DatabaseError>;

    /// `false` when no such record exists
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DatabaseError>;

    /// Drop every record and insert `students`, returning how many were inserted
    async fn replace_all(&self, students: &[Student]) -> Result<u64, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}
