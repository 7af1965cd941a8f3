//! Session tokens, password hashing and the request extractor for the
//! signed-in user.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ServerConfig;
use crate::domain::user::{Role, User};
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::auth as auth_service;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to issue token: {0}")]
    Issue(jsonwebtoken::errors::Error),
    #[error("invalid token: {0}")]
    InvalidToken(jsonwebtoken::errors::Error),
    #[error("failed to hash password: {0}")]
    Hash(String),
}

/// Claims carried by a session token and exposed to handlers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    /// User id.
    pub sub: i32,
    pub mobile_no: String,
    pub name: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl AuthenticatedUser {
    pub fn new(user: &User, ttl_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id,
            mobile_no: user.mobile_no.clone(),
            name: user.full_name.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
        }
    }

    /// Take identity and role from the stored record, keeping the token times.
    pub fn with_record(self, user: &User) -> Self {
        Self {
            sub: user.id,
            mobile_no: user.mobile_no.clone(),
            name: user.full_name.clone(),
            role: user.role,
            ..self
        }
    }

    pub fn id(&self) -> i32 {
        self.sub
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    /// Admins and sales managers see every record; field staff only their own.
    pub fn is_manager(&self) -> bool {
        self.has_role(&[Role::Admin, Role::SalesManager])
    }

    /// Id to restrict "own records" queries to, or `None` for managers.
    pub fn scope(&self) -> Option<i32> {
        if self.is_manager() {
            None
        } else {
            Some(self.sub)
        }
    }
}

pub fn issue_token(claims: &AuthenticatedUser, secret: &[u8]) -> Result<String, AuthError> {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret)).map_err(AuthError::Issue)
}

pub fn decode_token(token: &str, secret: &[u8]) -> Result<AuthenticatedUser, AuthError> {
    decode::<AuthenticatedUser>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(AuthError::InvalidToken)
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AuthError::Hash(err.to_string()))
}

/// Check `password` against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(err) => {
            log::error!("Stored password hash is malformed: {err}");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    header
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn session_token(req: &HttpRequest) -> Option<String> {
    req.get_identity().ok()?.id().ok()
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
        log::error!("ServerConfig is not registered as app data");
        return Err(ErrorInternalServerError("server misconfigured"));
    };

    let token = bearer_token(req)
        .or_else(|| session_token(req))
        .ok_or_else(|| ErrorUnauthorized("authentication required"))?;

    let claims = decode_token(&token, &config.secret).map_err(|err| {
        log::debug!("Rejected session token: {err}");
        ErrorUnauthorized("invalid or expired session")
    })?;

    let Some(repo) = req.app_data::<web::Data<DieselRepository>>() else {
        log::error!("DieselRepository is not registered as app data");
        return Err(ErrorInternalServerError("server misconfigured"));
    };

    match auth_service::resolve_session(repo.get_ref(), claims) {
        Ok(user) => Ok(user),
        Err(ServiceError::Unauthorized) => Err(ErrorUnauthorized("invalid or expired session")),
        Err(err) => {
            log::error!("Failed to load session user: {err}");
            Err(ErrorInternalServerError("internal server error"))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
