use serde::Deserialize;

use crate::auth::{AuthenticatedUser, hash_password};
use crate::domain::user::{Role, User, UserListQuery};
use crate::forms::users::{AddUserForm, EditUserForm};
use crate::pagination::{Paginated, page_params};
use crate::repository::{UserReader, UserWriter};
use crate::services::{
    ADMIN_ROLES, MANAGER_ROLES, ServiceError, ServiceResult, page_of, require_role,
};

/// Query parameters of the user list.
#[derive(Debug, Default, Deserialize)]
pub struct UsersQuery {
    pub search: Option<String>,
    pub role: Option<Role>,
    #[serde(default)]
    pub active_only: bool,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Managers may list users to pick assignees; only admins change them.
pub fn list_users<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: UsersQuery,
) -> ServiceResult<Paginated<User>>
where
    R: UserReader + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    let (page, per_page) = page_params(query.page, query.per_page);
    let mut list_query = UserListQuery::new().paginate(page, per_page);
    if let Some(term) = query.search.as_deref().filter(|term| !term.trim().is_empty()) {
        list_query = list_query.search(term);
    }
    if let Some(role) = query.role {
        list_query = list_query.role(role);
    }
    if query.active_only {
        list_query = list_query.active_only();
    }

    let (total, users) = repo.list_users(list_query).map_err(ServiceError::from)?;
    Ok(page_of(users, total, page, per_page))
}

pub fn get_user<R>(repo: &R, user: &AuthenticatedUser, user_id: i32) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    repo.get_user_by_id(user_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_user<R>(repo: &R, user: &AuthenticatedUser, form: AddUserForm) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    require_role(user, ADMIN_ROLES)?;

    let (draft, password) = form
        .into_parts()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    let password_hash =
        hash_password(&password).map_err(|err| ServiceError::Internal(err.to_string()))?;

    let created = repo
        .create_user(&draft.with_password_hash(password_hash))
        .map_err(ServiceError::from)?;
    log::info!("User {} created by {}", created.id, user.id());
    Ok(created)
}

/// Apply a partial update. Admins cannot deactivate or demote themselves.
pub fn update_user<R>(
    repo: &R,
    user: &AuthenticatedUser,
    user_id: i32,
    form: EditUserForm,
) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    require_role(user, ADMIN_ROLES)?;

    let (mut updates, password) = form
        .into_parts()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if user_id == user.id() {
        if updates.is_active == Some(false) {
            return Err(ServiceError::Form(
                "you cannot deactivate your own account".to_string(),
            ));
        }
        if updates.role.is_some_and(|role| role != Role::Admin) {
            return Err(ServiceError::Form(
                "you cannot remove your own admin role".to_string(),
            ));
        }
    }

    if let Some(password) = password {
        let hash =
            hash_password(&password).map_err(|err| ServiceError::Internal(err.to_string()))?;
        updates = updates.password_hash(hash);
    }

    let updated = repo
        .update_user(user_id, &updates)
        .map_err(ServiceError::from)?;
    log::info!("User {} updated by {}", updated.id, user.id());
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures;

    fn add_form() -> AddUserForm {
        AddUserForm {
            mobile_no: "9123456789".to_string(),
            full_name: "Ravi Kumar".to_string(),
            email: None,
            role: Role::FieldStaff,
            password: "long-enough".to_string(),
        }
    }

    #[test]
    fn only_admins_create_users() {
        let repo = MockRepository::new();
        let manager = fixtures::user(Role::SalesManager);

        assert!(matches!(
            create_user(&repo, &manager, add_form()),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn created_user_gets_a_password_hash() {
        let mut repo = MockRepository::new();
        repo.expect_create_user()
            .times(1)
            .withf(|new_user| {
                new_user.password_hash.starts_with("$argon2")
                    && new_user.password_hash != "long-enough"
            })
            .returning(|_| Ok(fixtures::stored_user(12, Role::FieldStaff)));

        let admin = fixtures::user(Role::Admin);
        let created = create_user(&repo, &admin, add_form()).expect("created");
        assert_eq!(created.id, 12);
    }

    #[test]
    fn admin_cannot_deactivate_self() {
        let repo = MockRepository::new();
        let admin = fixtures::user(Role::Admin);
        let form = EditUserForm {
            is_active: Some(false),
            ..EditUserForm::default()
        };

        assert!(matches!(
            update_user(&repo, &admin, fixtures::USER_ID, form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn list_passes_filters_through() {
        let mut repo = MockRepository::new();
        repo.expect_list_users()
            .times(1)
            .withf(|query| {
                query.role == Some(Role::FieldStaff)
                    && query.search.as_deref() == Some("ravi")
                    && query.pagination.is_some_and(|page| page.page == 2)
            })
            .returning(|_| Ok((21, vec![fixtures::stored_user(3, Role::FieldStaff)])));

        let query = UsersQuery {
            search: Some("ravi".to_string()),
            role: Some(Role::FieldStaff),
            page: Some(2),
            ..UsersQuery::default()
        };
        let page = list_users(&repo, &fixtures::user(Role::SalesManager), query).expect("listed");

        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);
    }
}
