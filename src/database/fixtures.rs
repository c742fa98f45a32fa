use thiserror::Error;

use crate::database::models::{NewStudent, Student};

const STUDENTS_YAML: &str = include_str!("fixtures/students.yaml");

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Invalid student fixture: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Attributes of the bundled sample students
pub fn sample_attrs() -> Result<Vec<NewStudent>, FixtureError> {
    Ok(serde_yaml::from_str(STUDENTS_YAML)?)
}

/// Sample students with fresh ids, ready to insert
pub fn sample_students() -> Result<Vec<Student>, FixtureError> {
    Ok(sample_attrs()?.into_iter().map(Student::build).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_create;
    use std::collections::HashSet;

    #[test]
    fn fixtures_parse_and_have_unique_national_codes() {
        let students = sample_students().unwrap();
        assert_eq!(students.len(), 5);

        let codes: HashSet<&str> = students.iter().map(|s| s.national_code.as_str()).collect();
        assert_eq!(codes.len(), students.len());
    }

    #[test]
    fn fixtures_pass_create_validation() {
        for attrs in sample_attrs().unwrap() {
            let body = match serde_json::to_value(&attrs).unwrap() {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            };
            assert_eq!(validate_create(&body).unwrap(), attrs);
        }
    }
}
