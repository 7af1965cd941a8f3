//! Business operations invoked by the HTTP handlers.
//!
//! Every service function takes the repository as a generic `R: Trait +
//! ?Sized` and the signed-in [`AuthenticatedUser`], checks the caller's role,
//! converts the incoming form and talks to storage through the repository
//! traits only.

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthenticatedUser;
use crate::domain::user::Role;
use crate::pagination::Paginated;
use crate::repository::RepositoryError;

pub mod auth;
pub mod beat_plans;
pub mod collections;
pub mod customers;
pub mod locations;
pub mod orders;
pub mod price_list;
pub mod products;
pub mod reports;
pub mod routes;
pub mod telecalling;
pub mod uploads;
pub mod users;

#[cfg(test)]
mod fixtures;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("authentication required")]
    Unauthorized,
    #[error("you are not allowed to perform this action")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Form(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Conflict(message) => ServiceError::Conflict(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

/// Roles allowed to manage master data.
pub const MANAGER_ROLES: &[Role] = &[Role::Admin, Role::SalesManager];

/// Roles allowed to manage users.
pub const ADMIN_ROLES: &[Role] = &[Role::Admin];

pub(crate) fn require_role(user: &AuthenticatedUser, roles: &[Role]) -> ServiceResult<()> {
    if user.has_role(roles) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

/// Outcome of a CSV import.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ImportReport {
    pub inserted: usize,
    pub errors: Vec<String>,
}

pub(crate) fn page_of<T>(
    items: Vec<T>,
    total: usize,
    page: usize,
    per_page: usize,
) -> Paginated<T> {
    Paginated::new(items, page, total, per_page)
}

pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_utc()
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_map_to_service_errors() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::Conflict("dup".into())),
            ServiceError::Conflict(message) if message == "dup"
        ));
    }

    #[test]
    fn role_check_rejects_other_roles() {
        let user = fixtures::user(Role::FieldStaff);
        assert!(matches!(
            require_role(&user, MANAGER_ROLES),
            Err(ServiceError::Forbidden)
        ));
        assert!(require_role(&fixtures::user(Role::SalesManager), MANAGER_ROLES).is_ok());
    }
}
