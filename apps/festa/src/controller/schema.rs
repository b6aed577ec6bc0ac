//! Field-level validation for the student-portal credential form.

use std::fmt;

use shared::protocol::DkuVerificationRequest;
use thiserror::Error;

const STUDENT_ID_LEN: usize = 8;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    StudentId,
    Password,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StudentId => f.write_str("student id"),
            Self::Password => f.write_str("password"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(Field),
    #[error("student id must be exactly 8 digits")]
    StudentIdFormat,
    #[error("password must be at least 8 characters")]
    PasswordTooShort,
}

impl ValidationError {
    pub fn field(&self) -> Field {
        match self {
            Self::Required(field) => *field,
            Self::StudentIdFormat => Field::StudentId,
            Self::PasswordTooShort => Field::Password,
        }
    }
}

pub fn is_student_id(value: &str) -> bool {
    value.len() == STUDENT_ID_LEN && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn validate_student_id(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required(Field::StudentId));
    }
    if !is_student_id(value) {
        return Err(ValidationError::StudentIdFormat);
    }
    Ok(())
}

pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required(Field::Password));
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Whatever the user has typed so far.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PartialCredentials {
    pub student_id: String,
    pub password: String,
}

impl PartialCredentials {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::StudentId => &self.student_id,
            Field::Password => &self.password,
        }
    }

    pub fn validate(&self) -> Result<DkuVerificationRequest, Vec<ValidationError>> {
        let errors: Vec<ValidationError> = [
            validate_student_id(&self.student_id),
            validate_password(&self.password),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(DkuVerificationRequest {
            dku_student_id: self.student_id.clone(),
            dku_password: self.password.clone(),
        })
    }
}

impl fmt::Debug for PartialCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialCredentials")
            .field("student_id", &self.student_id)
            .field("password", &"<redacted>")
            .finish()
    }
}
