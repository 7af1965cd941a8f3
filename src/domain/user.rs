use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

text_enum! {
    /// Access tier of an application user.
    pub enum Role {
        Admin => "admin",
        SalesManager => "sales_manager",
        FieldStaff => "field_staff",
    }
    default = FieldStaff;
}

/// Application user. The password hash never leaves the repository layer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i32,
    pub mobile_no: String,
    pub full_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// User row together with its stored credential, used only for login.
#[derive(Clone, Debug)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub mobile_no: String,
    pub full_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub password_hash: String,
}

impl NewUser {
    #[must_use]
    pub fn new(
        mobile_no: impl Into<String>,
        full_name: impl Into<String>,
        role: Role,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            mobile_no: mobile_no.into(),
            full_name: full_name.into(),
            email: None,
            role,
            password_hash: password_hash.into(),
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into().to_lowercase());
        self
    }
}

/// Patch applied to an existing user. `None` leaves a field untouched.
#[derive(Clone, Debug)]
pub struct UpdateUser {
    pub full_name: Option<String>,
    pub email: Option<Option<String>>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl Default for UpdateUser {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateUser {
    pub fn new() -> Self {
        Self {
            full_name: None,
            email: None,
            role: None,
            is_active: None,
            password_hash: None,
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn email(mut self, email: Option<impl Into<String>>) -> Self {
        self.email = Some(email.map(|value| value.into().to_lowercase()));
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.password_hash = Some(password_hash.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    /// Matches name, mobile number or email.
    pub search: Option<String>,
    pub role: Option<Role>,
    pub active_only: bool,
    pub pagination: Option<Pagination>,
}

impl UserListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
