//! Request validation for the student endpoints.
//!
//! Each endpoint has a rule set that checks the raw path parameter and JSON body
//! and either yields typed input or the full list of failures. Rules never touch
//! the store.

mod rules;

pub use rules::{rule_for, FieldRule, STUDENT_RULES};

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::models::student::{NewStudent, StudentPatch};

pub const INVALID_ID_MESSAGE: &str =
    "Invalid request parameter: Please provide a valid student id.";
pub const EMPTY_EDIT_MESSAGE: &str = "Please provide at least one field to update.";

/// A single failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failures accumulated while checking one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Ok when no rule failed
    pub fn into_result(self) -> Result<(), Self> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Checks the `:id` path parameter, recording a failure when it is not a UUID
pub fn check_id(raw: &str, errors: &mut ValidationErrors) -> Option<Uuid> {
    match Uuid::parse_str(raw) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(FieldError::new("id", INVALID_ID_MESSAGE));
            None
        }
    }
}

/// Rule set for GET and DELETE `/api/:id`
pub fn validate_lookup(raw_id: &str) -> Result<Uuid, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    match check_id(raw_id, &mut errors) {
        Some(id) => Ok(id),
        None => Err(errors),
    }
}

/// Rule set for POST `/api`
pub fn validate_create(body: &Map<String, Value>) -> Result<NewStudent, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let mut values: [String; 7] = Default::default();

    for (slot, rule) in values.iter_mut().zip(STUDENT_RULES.iter()) {
        match rule.check_required(body.get(rule.field)) {
            Ok(value) => *slot = value,
            Err(message) => errors.push(FieldError::new(rule.field, message)),
        }
    }
    errors.into_result()?;

    let [first_name, last_name, national_code, phone_number, father_name, school_name, educational_level] =
        values;

    Ok(NewStudent {
        first_name,
        last_name,
        national_code,
        phone_number,
        father_name,
        school_name,
        educational_level,
    })
}

/// Rule set for PATCH `/api/:id`. Path and body failures are reported together.
pub fn validate_edit(
    raw_id: &str,
    body: &Map<String, Value>,
) -> Result<(Uuid, StudentPatch), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let id = check_id(raw_id, &mut errors);

    let mut values: [Option<String>; 7] = Default::default();
    for (slot, rule) in values.iter_mut().zip(STUDENT_RULES.iter()) {
        match rule.check_optional(body.get(rule.field)) {
            Ok(value) => *slot = value,
            Err(message) => errors.push(FieldError::new(rule.field, message)),
        }
    }

    let has_known_field = STUDENT_RULES.iter().any(|rule| body.contains_key(rule.field));
    if !has_known_field {
        errors.push(FieldError::new("body", EMPTY_EDIT_MESSAGE));
    }

    errors.into_result()?;

    let [first_name, last_name, national_code, phone_number, father_name, school_name, educational_level] =
        values;

    let patch = StudentPatch {
        first_name,
        last_name,
        national_code,
        phone_number,
        father_name,
        school_name,
        educational_level,
    };

    // check_id recorded a failure whenever it returned None
    match id {
        Some(id) => Ok((id, patch)),
        None => Err(FieldError::new("id", INVALID_ID_MESSAGE).into()),
    }
}
