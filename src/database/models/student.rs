use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// JSON key to table column, in declaration order
pub const COLUMNS: [(&str, &str); 7] = [
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("nationalCode", "national_code"),
    ("phoneNumber", "phone_number"),
    ("fatherName", "father_name"),
    ("schoolName", "school_name"),
    ("educationalLevel", "educational_level"),
];

/// JSON key for a table column
pub fn field_for_column(column: &str) -> Option<&'static str> {
    COLUMNS
        .iter()
        .find(|(_, col)| *col == column)
        .map(|(field, _)| *field)
}

/// A persisted student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub national_code: String,
    pub phone_number: String,
    pub father_name: String,
    pub school_name: String,
    pub educational_level: String,
}

/// Validated input for a new student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub national_code: String,
    pub phone_number: String,
    pub father_name: String,
    pub school_name: String,
    pub educational_level: String,
}

/// Validated partial update; `None` means the field was not in the request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub national_code: Option<String>,
    pub phone_number: Option<String>,
    pub father_name: Option<String>,
    pub school_name: Option<String>,
    pub educational_level: Option<String>,
}

impl Student {
    /// Factory for new records; assigns a fresh id
    pub fn build(attrs: NewStudent) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: attrs.first_name,
            last_name: attrs.last_name,
            national_code: attrs.national_code,
            phone_number: attrs.phone_number,
            father_name: attrs.father_name,
            school_name: attrs.school_name,
            educational_level: attrs.educational_level,
        }
    }
}

impl StudentPatch {
    /// Overwrite every field present in the patch, keep the rest
    pub fn apply(self, student: &mut Student) {
        fn merge(target: &mut String, value: Option<String>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        merge(&mut student.first_name, self.first_name);
        merge(&mut student.last_name, self.last_name);
        merge(&mut student.national_code, self.national_code);
        merge(&mut student.phone_number, self.phone_number);
        merge(&mut student.father_name, self.father_name);
        merge(&mut student.school_name, self.school_name);
        merge(&mut student.educational_level, self.educational_level);
    }
}
