use serde_json::Value;

/// Constraint on one string field of a student body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// JSON key in request and response bodies
    pub field: &'static str,
    /// Human-readable name used in messages
    pub label: &'static str,
    /// Name used in create messages when it differs from `label`
    pub create_label: Option<&'static str>,
    /// Minimum length after trimming
    pub min_len: usize,
}

/// Rules in the declaration order of the student record
pub const STUDENT_RULES: [FieldRule; 7] = [
    FieldRule::new("firstName", "First name", 3),
    FieldRule::new("lastName", "Last name", 3),
    FieldRule::new("nationalCode", "National code", 8),
    FieldRule::new("phoneNumber", "Phone number", 8),
    FieldRule::new("fatherName", "Father name", 3),
    FieldRule::new("schoolName", "School name", 3),
    FieldRule {
        create_label: Some("Educational level name"),
        ..FieldRule::new("educationalLevel", "Educational level", 3)
    },
];

pub fn rule_for(field: &str) -> Option<&'static FieldRule> {
    STUDENT_RULES.iter().find(|rule| rule.field == field)
}

impl FieldRule {
    const fn new(field: &'static str, label: &'static str, min_len: usize) -> Self {
        Self {
            field,
            label,
            create_label: None,
            min_len,
        }
    }

    fn too_short(&self, label: &str) -> String {
        format!("{} should be at least {} characters.", label, self.min_len)
    }

    fn not_a_string(&self, label: &str) -> String {
        format!("{} must be a string.", label)
    }

    fn empty(&self) -> String {
        format!(
            "Please provide a valid {} or remove the field entirely.",
            self.label.to_lowercase()
        )
    }

    fn check_length(&self, raw: &str, label: &str) -> Result<String, String> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < self.min_len {
            return Err(self.too_short(label));
        }
        Ok(trimmed.to_string())
    }

    /// Create: the field must be present, a string, and long enough once trimmed
    pub fn check_required(&self, value: Option<&Value>) -> Result<String, String> {
        let label = self.create_label.unwrap_or(self.label);
        match value {
            None | Some(Value::Null) => Err(self.too_short(label)),
            Some(Value::String(s)) => self.check_length(s, label),
            Some(_) => Err(self.not_a_string(label)),
        }
    }

    /// Edit: an absent field is fine, a present one must pass the create checks
    /// and may not be empty
    pub fn check_optional(&self, value: Option<&Value>) -> Result<Option<String>, String> {
        match value {
            None => Ok(None),
            Some(Value::Null) => Err(self.empty()),
            Some(Value::String(s)) if s.is_empty() => Err(self.empty()),
            Some(Value::String(s)) => self.check_length(s, self.label).map(Some),
            Some(_) => Err(self.not_a_string(self.label)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finds_rules_by_json_key() {
        assert_eq!(rule_for("phoneNumber").map(|r| r.min_len), Some(8));
        assert_eq!(rule_for("schoolName").map(|r| r.label), Some("School name"));
        assert!(rule_for("school_name").is_none());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let rule = rule_for("firstName").unwrap();
        assert_eq!(rule.check_required(Some(&json!("علی"))), Ok("علی".to_string()));
    }

    #[test]
    fn educational_level_create_messages_use_long_name() {
        let rule = rule_for("educationalLevel").unwrap();
        assert_eq!(
            rule.check_required(None),
            Err("Educational level name should be at least 3 characters.".to_string())
        );
        assert_eq!(
            rule.check_required(Some(&json!(10))),
            Err("Educational level name must be a string.".to_string())
        );
        assert_eq!(
            rule.check_optional(Some(&json!("ab"))),
            Err("Educational level should be at least 3 characters.".to_string())
        );
    }

    #[test]
    fn whitespace_only_values_are_too_short() {
        let rule = rule_for("lastName").unwrap();
        assert_eq!(
            rule.check_optional(Some(&json!("     "))),
            Err("Last name should be at least 3 characters.".to_string())
        );
    }
}
