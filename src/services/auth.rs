use serde::Serialize;
use validator::Validate;

use crate::auth::{AuthenticatedUser, hash_password, issue_token, verify_password};
use crate::config::BootstrapAdmin;
use crate::domain::user::{NewUser, Role, User};
use crate::forms::auth::LoginForm;
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

/// Name given to the administrator created on an empty database.
const BOOTSTRAP_ADMIN_NAME: &str = "Administrator";

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Verify the credentials and issue a session token.
///
/// Unknown mobile numbers, wrong passwords and deactivated accounts all
/// answer `Unauthorized`.
pub fn login<R>(
    repo: &R,
    form: LoginForm,
    secret: &[u8],
    ttl_hours: i64,
) -> ServiceResult<LoginResponse>
where
    R: UserReader + ?Sized,
{
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let Some(credentials) = repo
        .get_credentials_by_mobile(form.mobile_no.trim())
        .map_err(ServiceError::from)?
    else {
        log::info!("Login attempt for unknown mobile number");
        return Err(ServiceError::Unauthorized);
    };

    if !credentials.user.is_active {
        log::info!("Login attempt for inactive user {}", credentials.user.id);
        return Err(ServiceError::Unauthorized);
    }

    if !verify_password(&form.password, &credentials.password_hash) {
        log::info!("Wrong password for user {}", credentials.user.id);
        return Err(ServiceError::Unauthorized);
    }

    let claims = AuthenticatedUser::new(&credentials.user, ttl_hours);
    let token =
        issue_token(&claims, secret).map_err(|err| ServiceError::Internal(err.to_string()))?;

    Ok(LoginResponse {
        token,
        user: credentials.user,
    })
}

/// Fresh copy of the signed-in user's record.
pub fn current_user<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    match repo.get_user_by_id(user.id()).map_err(ServiceError::from)? {
        Some(found) if found.is_active => Ok(found),
        _ => Err(ServiceError::Unauthorized),
    }
}

/// Check session claims against the stored user.
///
/// Deleted and deactivated accounts answer `Unauthorized` even while their
/// token is still valid, and the role always comes from the stored row.
pub fn resolve_session<R>(repo: &R, claims: AuthenticatedUser) -> ServiceResult<AuthenticatedUser>
where
    R: UserReader + ?Sized,
{
    match repo.get_user_by_id(claims.id()).map_err(ServiceError::from)? {
        Some(user) if user.is_active => Ok(claims.with_record(&user)),
        Some(user) => {
            log::info!("Refused session of inactive user {}", user.id);
            Err(ServiceError::Unauthorized)
        }
        None => Err(ServiceError::Unauthorized),
    }
}

/// Create the first administrator when the user table is empty.
pub fn bootstrap_admin<R>(repo: &R, admin: &BootstrapAdmin) -> ServiceResult<Option<User>>
where
    R: UserReader + UserWriter + ?Sized,
{
    if repo.count_users().map_err(ServiceError::from)? > 0 {
        return Ok(None);
    }

    let password_hash =
        hash_password(&admin.password).map_err(|err| ServiceError::Internal(err.to_string()))?;
    let new_user = NewUser::new(
        admin.mobile_no.trim(),
        BOOTSTRAP_ADMIN_NAME,
        Role::Admin,
        password_hash,
    );

    let created = repo.create_user(&new_user).map_err(ServiceError::from)?;
    log::info!("Created bootstrap administrator {}", created.id);
    Ok(Some(created))
}
