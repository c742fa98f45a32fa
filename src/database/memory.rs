use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Student;
use crate::database::store::StudentStore;

/// Process-local store with the same unique index semantics as the Postgres table.
/// Backs `serve --in-memory` and the test suites.
#[derive(Default)]
pub struct MemoryStudentStore {
    students: RwLock<Vec<Student>>,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn duplicate_national_code(students: &[Student], candidate: &Student) -> Option<DatabaseError> {
        students
            .iter()
            .find(|s| s.id != candidate.id && s.national_code == candidate.national_code)
            .map(|_| DatabaseError::DuplicateKey {
                field: "national_code".to_string(),
                value: Some(candidate.national_code.clone()),
            })
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn find_all(&self) -> Result<Vec<Student>, DatabaseError> {
        Ok(self.students.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, DatabaseError> {
        let students = self.students.read().await;
        Ok(students.iter().find(|s| s.id == id).cloned())
    }

    async fn insert(&self, student: &Student) -> Result<(), DatabaseError> {
        let mut students = self.students.write().await;
        if students.iter().any(|s| s.id == student.id) {
            return Err(DatabaseError::DuplicateKey {
                field: "id".to_string(),
                value: Some(student.id.to_string()),
            });
        }
        if let Some(err) = Self::duplicate_national_code(&students, student) {
            return Err(err);
        }
        students.push(student.clone());
        Ok(())
    }

    async fn update_by_id(&self, student: &Student) -> Result<bool, DatabaseError> {
        let mut students = self.students.write().await;
        let Some(index) = students.iter().position(|s| s.id == student.id) else {
            return Ok(false);
        };
        if let Some(err) = Self::duplicate_national_code(&students, student) {
            return Err(err);
        }
        students[index] = student.clone();
        Ok(true)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut students = self.students.write().await;
        let before = students.len();
        students.retain(|s| s.id != id);
        Ok(students.len() < before)
    }

    async fn replace_all(&self, replacement: &[Student]) -> Result<u64, DatabaseError> {
        let mut staged: Vec<Student> = Vec::with_capacity(replacement.len());
        for student in replacement {
            if let Some(err) = Self::duplicate_national_code(&staged, student) {
                return Err(err);
            }
            staged.push(student.clone());
        }

        *self.students.write().await = staged;
        Ok(replacement.len() as u64)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
