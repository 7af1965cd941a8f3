use actix_multipart::form::MultipartForm;
use actix_web::{Responder, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::price_list::{AddPriceForm, EditPriceForm};
use crate::forms::uploads::UploadCsvForm;
use crate::repository::DieselRepository;
use crate::routes::{created, error_response, ok};
use crate::services::ServiceError;
use crate::services::price_list::{self, PricesQuery};

#[get("/prices")]
pub async fn list_prices(
    params: web::Query<PricesQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        price_list::list_prices(repo.get_ref(), &user, params.into_inner()),
        "list prices",
    )
}

#[post("/prices")]
pub async fn create_price(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<AddPriceForm>,
) -> impl Responder {
    created(
        price_list::create_price(repo.get_ref(), &user, payload.into_inner()),
        "create price",
    )
}

#[post("/prices/import")]
/// Bulk import price list entries keyed by product code.
pub async fn import_prices(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadCsvForm>,
) -> impl Responder {
    let upload = match form.into_upload() {
        Ok(upload) => upload,
        Err(err) => return error_response(ServiceError::Form(err.to_string()), "read upload"),
    };
    ok(
        price_list::import_prices(repo.get_ref(), &user, upload),
        "import prices",
    )
}

#[put("/prices/{entry_id}")]
pub async fn update_price(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<EditPriceForm>,
) -> impl Responder {
    ok(
        price_list::update_price(repo.get_ref(), &user, path.into_inner(), payload.into_inner()),
        "update price",
    )
}
