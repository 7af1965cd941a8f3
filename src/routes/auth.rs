use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};

use crate::auth::AuthenticatedUser;
use crate::config::ServerConfig;
use crate::forms::auth::LoginForm;
use crate::repository::DieselRepository;
use crate::routes::{ErrorBody, error_response, ok};
use crate::services::auth as auth_service;

#[post("/auth/login")]
/// Exchange mobile number and password for a session token.
///
/// The token is returned in the body for API clients and also stored in the
/// identity cookie for browsers.
pub async fn login(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
    payload: web::Json<LoginForm>,
) -> impl Responder {
    let response = match auth_service::login(
        repo.get_ref(),
        payload.into_inner(),
        &config.secret,
        config.token_ttl_hours,
    ) {
        Ok(response) => response,
        Err(err) => return error_response(err, "log in"),
    };

    if let Err(err) = Identity::login(&req.extensions(), response.token.clone()) {
        log::error!("Failed to store session identity: {err}");
        return HttpResponse::InternalServerError().json(ErrorBody::new("internal server error"));
    }

    HttpResponse::Ok().json(response)
}

#[post("/auth/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    HttpResponse::NoContent().finish()
}

#[get("/auth/me")]
pub async fn me(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> impl Responder {
    ok(auth_service::current_user(repo.get_ref(), &user), "load current user")
}
