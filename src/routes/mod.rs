//! JSON handlers mounted under `/api/v1`.
//!
//! Handlers only extract the request parts, call one service function and
//! translate its [`ServiceError`] into a status code.

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;

use crate::services::ServiceError;
use crate::services::reports::CsvExport;

pub mod auth;
pub mod beats;
pub mod collections;
pub mod customers;
pub mod locations;
pub mod orders;
pub mod prices;
pub mod products;
pub mod reports;
pub mod telecalling;
pub mod uploads;
pub mod users;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Map a failed service call to its HTTP response.
///
/// Internal errors are logged with `context` and answered with a generic
/// message.
pub fn error_response(err: ServiceError, context: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            HttpResponse::Unauthorized().json(ErrorBody::new(err.to_string()))
        }
        ServiceError::Forbidden => HttpResponse::Forbidden().json(ErrorBody::new(err.to_string())),
        ServiceError::NotFound => HttpResponse::NotFound().json(ErrorBody::new(err.to_string())),
        ServiceError::Conflict(message) => HttpResponse::Conflict().json(ErrorBody::new(message)),
        ServiceError::Form(message) => {
            HttpResponse::UnprocessableEntity().json(ErrorBody::new(message))
        }
        ServiceError::Internal(message) => {
            log::error!("Failed to {context}: {message}");
            HttpResponse::InternalServerError().json(ErrorBody::new("internal server error"))
        }
    }
}

pub(crate) fn ok<T: Serialize>(result: Result<T, ServiceError>, context: &str) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(err) => error_response(err, context),
    }
}

pub(crate) fn created<T: Serialize>(
    result: Result<T, ServiceError>,
    context: &str,
) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Created().json(value),
        Err(err) => error_response(err, context),
    }
}

pub(crate) fn no_content(result: Result<(), ServiceError>, context: &str) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, context),
    }
}

/// Send a CSV file as a download.
pub(crate) fn csv_download(result: Result<CsvExport, ServiceError>, context: &str) -> HttpResponse {
    match result {
        Ok(export) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(export.file_name)],
            })
            .body(export.bytes),
        Err(err) => error_response(err, context),
    }
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorBody::new(err.to_string()));
    InternalError::from_response(err, response).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ErrorBody::new(err.to_string()));
    InternalError::from_response(err, response).into()
}

/// Register every handler. Mounted by `main` under `/api/v1`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(auth::login)
        .service(auth::logout)
        .service(auth::me)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::get_user)
        .service(users::update_user)
        .service(customers::list_customers)
        .service(customers::create_customer)
        .service(customers::import_customers)
        .service(customers::get_customer)
        .service(customers::update_customer)
        .service(customers::capture_location)
        .service(products::list_products)
        .service(products::create_product)
        .service(products::import_products)
        .service(products::get_product)
        .service(products::update_product)
        .service(prices::list_prices)
        .service(prices::create_price)
        .service(prices::import_prices)
        .service(prices::update_price)
        .service(orders::list_orders)
        .service(orders::create_order)
        .service(orders::quote_order)
        .service(orders::get_order)
        .service(orders::update_order_status)
        .service(collections::list_collections)
        .service(collections::create_collection)
        .service(collections::get_collection)
        .service(collections::update_collection_status)
        .service(beats::list_routes)
        .service(beats::create_route)
        .service(beats::get_route)
        .service(beats::update_route)
        .service(beats::list_route_customers)
        .service(beats::add_route_customer)
        .service(beats::update_visit_sequence)
        .service(beats::remove_route_customer)
        .service(beats::list_beat_plans)
        .service(beats::create_beat_plan)
        .service(beats::routes_for_day)
        .service(beats::update_beat_plan)
        .service(beats::delete_beat_plan)
        .service(telecalling::summary)
        .service(telecalling::list_call_logs)
        .service(telecalling::log_call)
        .service(telecalling::get_call_log)
        .service(telecalling::update_call_log)
        .service(telecalling::list_follow_ups)
        .service(telecalling::schedule_follow_up)
        .service(telecalling::get_follow_up)
        .service(telecalling::update_follow_up)
        .service(telecalling::list_leads)
        .service(telecalling::create_lead)
        .service(telecalling::get_lead)
        .service(locations::record_location)
        .service(locations::latest_locations)
        .service(locations::user_history)
        .service(reports::order_report)
        .service(reports::order_report_csv)
        .service(reports::collection_report)
        .service(reports::collection_report_csv)
        .service(uploads::upload_template);
}
