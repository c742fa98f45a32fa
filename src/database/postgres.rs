use async_trait::async_trait;
use sqlx::{postgres::PgDatabaseError, PgExecutor, PgPool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::Student;
use crate::database::store::StudentStore;

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

const STUDENT_COLUMNS: &str = "id, first_name, last_name, national_code, phone_number, \
                               father_name, school_name, educational_level";

/// Normalize a driver error into the persistence error taxonomy.
///
/// Unique index violations become [`DatabaseError::DuplicateKey`] with the column
/// and value parsed from the Postgres error detail; everything else is kept as is.
pub fn classify(err: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let parsed = db_err
                .try_downcast_ref::<PgDatabaseError>()
                .and_then(|pg| pg.detail())
                .and_then(parse_key_detail);

            debug!(constraint = ?db_err.constraint(), "unique index violation");

            return match parsed {
                Some((field, value)) => DatabaseError::DuplicateKey {
                    field,
                    value: Some(value),
                },
                None => DatabaseError::DuplicateKey {
                    field: db_err.constraint().unwrap_or_default().to_string(),
                    value: None,
                },
            };
        }
    }
    DatabaseError::Sqlx(err)
}

/// Parse `Key (national_code)=(123456123) already exists.` into its column and value
fn parse_key_detail(detail: &str) -> Option<(String, String)> {
    let rest = detail.strip_prefix("Key (")?;
    let (column, rest) = rest.split_once(")=(")?;
    let end = rest.rfind(')')?;
    Some((column.to_string(), rest[..end].to_string()))
}

/// Student table in Postgres
pub struct PgStudentRepository {
    pool: PgPool,
    table: String,
}

impl PgStudentRepository {
    pub fn new(pool: PgPool, table_name: &str) -> Result<Self, DatabaseError> {
        if !DatabaseManager::is_valid_table_name(table_name) {
            return Err(DatabaseError::InvalidTableName(table_name.to_string()));
        }
        Ok(Self {
            pool,
            table: DatabaseManager::quote_identifier(table_name),
        })
    }

    /// Create the table and its unique index on national_code if missing
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                national_code TEXT NOT NULL UNIQUE,
                phone_number TEXT NOT NULL,
                father_name TEXT NOT NULL,
                school_name TEXT NOT NULL,
                educational_level TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
            self.table
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        info!("Ensured table {} exists", self.table);
        Ok(())
    }

    async fn insert_with<'c, E>(&self, executor: E, student: &Student) -> Result<(), DatabaseError>
    where
        E: PgExecutor<'c>,
    {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            self.table, STUDENT_COLUMNS
        );
        sqlx::query(&sql)
            .bind(student.id)
            .bind(&student.first_name)
            .bind(&student.last_name)
            .bind(&student.national_code)
            .bind(&student.phone_number)
            .bind(&student.father_name)
            .bind(&student.school_name)
            .bind(&student.educational_level)
            .execute(executor)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl StudentStore for PgStudentRepository {
    async fn find_all(&self) -> Result<Vec<Student>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY created_at, id",
            STUDENT_COLUMNS, self.table
        );
        let students = sqlx::query_as::<_, Student>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(students)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Student>, DatabaseError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", STUDENT_COLUMNS, self.table);
        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    async fn insert(&self, student: &Student) -> Result<(), DatabaseError> {
        self.insert_with(&self.pool, student).await
    }

    async fn update_by_id(&self, student: &Student) -> Result<bool, DatabaseError> {
        let sql = format!(
            "UPDATE {} SET first_name = $2, last_name = $3, national_code = $4, phone_number = $5,
                father_name = $6, school_name = $7, educational_level = $8
             WHERE id = $1",
            self.table
        );
        let result = sqlx::query(&sql)
            .bind(student.id)
            .bind(&student.first_name)
            .bind(&student.last_name)
            .bind(&student.national_code)
            .bind(&student.phone_number)
            .bind(&student.father_name)
            .bind(&student.school_name)
            .bind(&student.educational_level)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn replace_all(&self, students: &[Student]) -> Result<u64, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!("DELETE FROM {}", self.table);
        sqlx::query(&sql).execute(&mut *tx).await?;

        for student in students {
            self.insert_with(&mut *tx, student).await?;
        }

        tx.commit().await?;
        Ok(students.len() as u64)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unique_violation_detail() {
        assert_eq!(
            parse_key_detail("Key (national_code)=(123456123) already exists."),
            Some(("national_code".to_string(), "123456123".to_string()))
        );
    }

    #[test]
    fn keeps_parentheses_inside_values() {
        assert_eq!(
            parse_key_detail("Key (national_code)=(12 (34) 56) already exists."),
            Some(("national_code".to_string(), "12 (34) 56".to_string()))
        );
    }

    #[test]
    fn rejects_unrelated_detail_text() {
        assert_eq!(parse_key_detail("Failing row contains (null)."), None);
        assert_eq!(parse_key_detail(""), None);
    }

    #[test]
    fn non_database_errors_stay_unclassified() {
        assert!(matches!(classify(sqlx::Error::RowNotFound), DatabaseError::Sqlx(_)));
        assert!(matches!(classify(sqlx::Error::PoolTimedOut), DatabaseError::Sqlx(_)));
    }
}
