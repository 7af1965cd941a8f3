use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::user::{NewUser, Role, UpdateUser};
use crate::forms::{optional_text, sanitize_inline_text};

/// Passwords shorter than this are refused.
const PASSWORD_MIN_LEN: u64 = 8;

#[derive(Debug, Error)]
pub enum UserFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("full name cannot be empty")]
    EmptyName,
}

/// Payload of the create user endpoint. The password is hashed by the service.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddUserForm {
    #[validate(custom(function = "crate::forms::validate_mobile"))]
    pub mobile_no: String,
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub role: Role,
    #[validate(length(min = PASSWORD_MIN_LEN))]
    pub password: String,
}

impl AddUserForm {
    /// Validated user payload and the plain password still to be hashed.
    pub fn into_parts(self) -> Result<(NewUserDraft, String), UserFormError> {
        self.validate()?;

        let full_name = sanitize_inline_text(&self.full_name);
        if full_name.is_empty() {
            return Err(UserFormError::EmptyName);
        }

        Ok((
            NewUserDraft {
                mobile_no: self.mobile_no.trim().to_string(),
                full_name,
                email: optional_text(self.email.as_deref()),
                role: self.role,
            },
            self.password,
        ))
    }
}

/// User fields awaiting a password hash.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUserDraft {
    pub mobile_no: String,
    pub full_name: String,
    pub email: Option<String>,
    pub role: Role,
}

impl NewUserDraft {
    pub fn with_password_hash(self, password_hash: String) -> NewUser {
        let user = NewUser::new(self.mobile_no, self.full_name, self.role, password_hash);
        match self.email {
            Some(email) => user.with_email(email),
            None => user,
        }
    }
}

/// Partial update of a user; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct EditUserForm {
    #[validate(length(min = 1, max = 120))]
    pub full_name: Option<String>,
    /// An empty string clears the email.
    pub email: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    #[validate(length(min = PASSWORD_MIN_LEN))]
    pub password: Option<String>,
}

impl EditUserForm {
    /// Validated patch and the new plain password, if any.
    pub fn into_parts(self) -> Result<(UpdateUser, Option<String>), UserFormError> {
        self.validate()?;

        if let Some(email) = optional_text(self.email.as_deref()) {
            let probe = EmailProbe { email };
            probe.validate()?;
        }

        let mut updates = UpdateUser::new();

        if let Some(full_name) = self.full_name.as_deref() {
            let full_name = sanitize_inline_text(full_name);
            if full_name.is_empty() {
                return Err(UserFormError::EmptyName);
            }
            updates = updates.full_name(full_name);
        }
        if self.email.is_some() {
            updates = updates.email(optional_text(self.email.as_deref()));
        }
        if let Some(role) = self.role {
            updates = updates.role(role);
        }
        if let Some(is_active) = self.is_active {
            updates = updates.active(is_active);
        }

        Ok((updates, self.password))
    }
}

#[derive(Validate)]
struct EmailProbe {
    #[validate(email)]
    email: String,
}
