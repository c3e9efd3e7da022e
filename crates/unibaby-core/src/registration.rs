//! Registration form draft and validation.
//!
//! The draft is edited one field at a time and only turns into a
//! `RegistrationData` payload once every constraint holds. The constraints
//! are the ones a browser form would enforce declaratively: required text
//! fields, a numeric child age within bounds and an optional email address.

use std::fmt;

use thiserror::Error;

use crate::models::RegistrationData;

/// Youngest child age the form accepts
pub const MIN_CHILD_AGE: u8 = 0;

/// Oldest child age the form accepts
pub const MAX_CHILD_AGE: u8 = 18;

/// Maximum length for name, phone and email fields
const MAX_SHORT_FIELD_LENGTH: usize = 100;

/// Maximum length for the free-text notes
const MAX_NOTES_LENGTH: usize = 1000;

/// Two digits cover the whole age range
const MAX_AGE_LENGTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    ParentName,
    Phone,
    ChildName,
    ChildAge,
    Email,
    Notes,
}

impl FormField {
    /// Fields in form order
    pub const ALL: [FormField; 6] = [
        FormField::ParentName,
        FormField::Phone,
        FormField::ChildName,
        FormField::ChildAge,
        FormField::Email,
        FormField::Notes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::ParentName => "Parent name",
            FormField::Phone => "Phone",
            FormField::ChildName => "Child name",
            FormField::ChildAge => "Child age",
            FormField::Email => "Email",
            FormField::Notes => "Additional info",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(
            self,
            FormField::ParentName | FormField::Phone | FormField::ChildName | FormField::ChildAge
        )
    }

    pub fn max_len(&self) -> usize {
        match self {
            FormField::ChildAge => MAX_AGE_LENGTH,
            FormField::Notes => MAX_NOTES_LENGTH,
            _ => MAX_SHORT_FIELD_LENGTH,
        }
    }

    /// Next field (wrapping around)
    pub fn next(&self) -> Self {
        let i = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Previous field (wrapping around)
    pub fn prev(&self) -> Self {
        let i = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Whether a typed character may be appended to a field currently
    /// holding `current_len` characters.
    pub fn accepts_char(&self, current_len: usize, c: char) -> bool {
        if current_len >= self.max_len() || c.is_control() {
            return false;
        }
        *self != FormField::ChildAge || c.is_ascii_digit()
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(FormField),

    #[error("Child age must be a whole number, got '{0}'")]
    ChildAgeNotANumber(String),

    #[error("Child age must be between 0 and 18, got {0}")]
    ChildAgeOutOfRange(i64),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

impl ValidationError {
    /// The field the problem belongs to
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::MissingField(field) => *field,
            ValidationError::ChildAgeNotANumber(_) | ValidationError::ChildAgeOutOfRange(_) => {
                FormField::ChildAge
            }
            ValidationError::InvalidEmail(_) => FormField::Email,
        }
    }
}

/// The in-progress registration, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub parent_name: String,
    pub phone: String,
    pub child_name: String,
    pub child_age: String,
    pub email: String,
    pub notes: String,
}

impl RegistrationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::ParentName => &self.parent_name,
            FormField::Phone => &self.phone,
            FormField::ChildName => &self.child_name,
            FormField::ChildAge => &self.child_age,
            FormField::Email => &self.email,
            FormField::Notes => &self.notes,
        }
    }

    /// Replace one field, leaving the others untouched
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::ParentName => &mut self.parent_name,
            FormField::Phone => &mut self.phone,
            FormField::ChildName => &mut self.child_name,
            FormField::ChildAge => &mut self.child_age,
            FormField::Email => &mut self.email,
            FormField::Notes => &mut self.notes,
        };
        *slot = value.into();
    }

    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|f| self.field(*f).is_empty())
    }

    /// Parse the child age the way a number input with min/max bounds would.
    pub fn parse_child_age(&self) -> Result<u8, ValidationError> {
        let raw = self.child_age.trim();
        if raw.is_empty() {
            return Err(ValidationError::MissingField(FormField::ChildAge));
        }
        let age: i64 = raw
            .parse()
            .map_err(|_| ValidationError::ChildAgeNotANumber(raw.to_string()))?;
        if age < i64::from(MIN_CHILD_AGE) || age > i64::from(MAX_CHILD_AGE) {
            return Err(ValidationError::ChildAgeOutOfRange(age));
        }
        // In range, so the conversion cannot fail
        u8::try_from(age).map_err(|_| ValidationError::ChildAgeOutOfRange(age))
    }

    /// Check every constraint, reporting the first problem in form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in [FormField::ParentName, FormField::Phone, FormField::ChildName] {
            if self.field(field).trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }
        self.parse_child_age()?;

        let email = self.email.trim();
        if !email.is_empty() && !looks_like_email(email) {
            return Err(ValidationError::InvalidEmail(email.to_string()));
        }
        Ok(())
    }

    /// Build the wire payload for `package_id`, coercing the age to an integer.
    pub fn to_registration_data(&self, package_id: &str) -> Result<RegistrationData, ValidationError> {
        self.validate()?;
        Ok(RegistrationData {
            name: self.parent_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            child_name: self.child_name.trim().to_string(),
            child_age: self.parse_child_age()?,
            email: non_empty(&self.email),
            additional_info: non_empty(&self.notes),
            package_id: package_id.to_string(),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Same shape check an email input performs: `local@domain`, no whitespace.
fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_draft() -> RegistrationDraft {
        let mut draft = RegistrationDraft::new();
        draft.set_field(FormField::ParentName, "Анна Смирнова");
        draft.set_field(FormField::Phone, "+7 777 123 4567");
        draft.set_field(FormField::ChildName, "Максим");
        draft.set_field(FormField::ChildAge, "4");
        draft
    }

    #[test]
    fn test_set_field_preserves_other_fields() {
        let mut draft = filled_draft();
        draft.set_field(FormField::Phone, "+7 701 000 0000");
        assert_eq!(draft.phone, "+7 701 000 0000");
        assert_eq!(draft.parent_name, "Анна Смирнова");
        assert_eq!(draft.child_name, "Максим");
        assert_eq!(draft.child_age, "4");
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(
            RegistrationDraft::new().validate(),
            Err(ValidationError::MissingField(FormField::ParentName))
        );

        let mut draft = filled_draft();
        draft.set_field(FormField::ChildName, "   ");
        assert_eq!(draft.validate(), Err(ValidationError::MissingField(FormField::ChildName)));

        let mut draft = filled_draft();
        draft.set_field(FormField::ChildAge, "");
        assert_eq!(draft.validate(), Err(ValidationError::MissingField(FormField::ChildAge)));
    }

    #[test]
    fn test_child_age_bounds() {
        for age in ["0", "4", "18"] {
            let mut draft = filled_draft();
            draft.set_field(FormField::ChildAge, age);
            assert!(draft.validate().is_ok(), "age {} should be accepted", age);
        }

        let mut draft = filled_draft();
        draft.set_field(FormField::ChildAge, "19");
        assert_eq!(draft.validate(), Err(ValidationError::ChildAgeOutOfRange(19)));

        draft.set_field(FormField::ChildAge, "-1");
        assert_eq!(draft.validate(), Err(ValidationError::ChildAgeOutOfRange(-1)));

        draft.set_field(FormField::ChildAge, "4.5");
        assert_eq!(draft.validate(), Err(ValidationError::ChildAgeNotANumber("4.5".into())));

        draft.set_field(FormField::ChildAge, "four");
        assert!(matches!(draft.validate(), Err(ValidationError::ChildAgeNotANumber(_))));
    }

    #[test]
    fn test_out_of_range_age_never_builds_payload() {
        let mut draft = filled_draft();
        draft.set_field(FormField::ChildAge, "25");
        let err = draft.to_registration_data("junior_swim").unwrap_err();
        assert_eq!(err.field(), FormField::ChildAge);
    }

    #[test]
    fn test_email_is_optional_but_checked() {
        let mut draft = filled_draft();
        assert!(draft.validate().is_ok());

        draft.set_field(FormField::Email, "anna.smirnova@example.com");
        assert!(draft.validate().is_ok());

        for bad in ["anna", "anna@", "@example.com", "an na@example.com", "a@b@c"] {
            draft.set_field(FormField::Email, bad);
            assert!(
                matches!(draft.validate(), Err(ValidationError::InvalidEmail(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_registration_payload() {
        let mut draft = filled_draft();
        draft.set_field(FormField::ChildAge, " 04 ");
        draft.set_field(FormField::Notes, "Умеет держаться на воде");

        let data = draft.to_registration_data("junior_swim").unwrap();
        assert_eq!(data.child_age, 4);
        assert_eq!(data.package_id, "junior_swim");
        assert_eq!(data.name, "Анна Смирнова");
        assert_eq!(data.email, None);
        assert_eq!(data.additional_info.as_deref(), Some("Умеет держаться на воде"));
    }

    #[test]
    fn test_field_cycle() {
        assert_eq!(FormField::ParentName.next(), FormField::Phone);
        assert_eq!(FormField::Notes.next(), FormField::ParentName); // Wraps around
        assert_eq!(FormField::ParentName.prev(), FormField::Notes);
        assert_eq!(FormField::Email.prev(), FormField::ChildAge);
    }

    #[test]
    fn test_accepts_char() {
        assert!(FormField::ParentName.accepts_char(0, 'А'));
        assert!(!FormField::ParentName.accepts_char(0, '\n'));
        assert!(!FormField::ParentName.accepts_char(MAX_SHORT_FIELD_LENGTH, 'a'));

        // Age takes digits only, at most two
        assert!(FormField::ChildAge.accepts_char(0, '7'));
        assert!(!FormField::ChildAge.accepts_char(0, '-'));
        assert!(!FormField::ChildAge.accepts_char(0, '.'));
        assert!(!FormField::ChildAge.accepts_char(2, '1'));

        assert!(FormField::Notes.accepts_char(500, ' '));
        assert!(!FormField::Notes.accepts_char(0, '\t'));
    }
}
