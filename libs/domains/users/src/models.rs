use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 255;
pub const AGE_MIN: i32 = 0;
pub const AGE_MAX: i32 = 150;

/// local-part@domain, where the domain ends in a label of two or more letters
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap()
});

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Name must have content after trimming and fit the column.
fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(validation_error("blank", "Name cannot be empty"));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(validation_error(
            "length",
            "Name must be at most 100 characters",
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(validation_error("blank", "Email cannot be empty"));
    }
    if email.chars().count() > EMAIL_MAX_LEN {
        return Err(validation_error(
            "length",
            "Email must be at most 255 characters",
        ));
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(validation_error("email", "Invalid email format"));
    }
    Ok(())
}

/// Patch variant: blank means "leave unchanged"
fn validate_patch_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Ok(());
    }
    validate_name(name)
}

fn validate_patch_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Ok(());
    }
    validate_email(email)
}

/// Flatten validator output into one message, ordered by field name.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("Invalid {}", field),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// A stored user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Store-assigned identifier
    pub id: i64,
    pub name: String,
    /// Unique across all users (exact match)
    pub email: String,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful update
    pub updated_at: DateTime<Utc>,
}

/// Validated fields handed to the store on insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
}

/// Request body for creating a user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Jane Doe", max_length = 100)]
    pub name: String,
    #[validate(custom(function = "validate_email"))]
    #[schema(example = "jane@example.com", max_length = 255)]
    pub email: String,
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    #[schema(minimum = 0, maximum = 150)]
    pub age: Option<i32>,
}

impl CreateUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: Option<i32>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age,
        }
    }

    /// Trimmed copy of the input, ready for the store
    pub fn normalized(&self) -> NewUser {
        NewUser {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            age: self.age,
        }
    }
}

/// Partial update. Absent and blank fields are left unchanged; there is no
/// way to clear a field.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(custom(function = "validate_patch_name"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_patch_email"))]
    pub email: Option<String>,
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<i32>,
}

impl UpdateUser {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    /// New name, if one was supplied with content
    pub fn new_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    pub fn new_email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Query filters for listing users
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    /// Inclusive lower age bound; users without an age never match
    pub min_age: Option<i32>,
    /// Inclusive upper age bound; users without an age never match
    pub max_age: Option<i32>,
}

impl UserFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.min_age.is_none() && self.max_age.is_none()
    }

    pub fn matches(&self, user: &User) -> bool {
        if let Some(fragment) = &self.name {
            if !user.name.to_lowercase().contains(&fragment.to_lowercase()) {
                return false;
            }
        }

        if self.min_age.is_none() && self.max_age.is_none() {
            return true;
        }

        match user.age {
            Some(age) => {
                self.min_age.is_none_or(|min| age >= min) && self.max_age.is_none_or(|max| age <= max)
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum UserOperation {
    Create,
    Delete,
}

/// Change notification published after a create or delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserEvent {
    pub operation: UserOperation,
    pub email: String,
    pub username: String,
}

impl UserEvent {
    pub fn created(user: &User) -> Self {
        Self {
            operation: UserOperation::Create,
            email: user.email.clone(),
            username: user.name.clone(),
        }
    }

    pub fn deleted(user: &User) -> Self {
        Self {
            operation: UserOperation::Delete,
            email: user.email.clone(),
            username: user.name.clone(),
        }
    }
}
