use actix_web::{Responder, get, web};

use crate::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{csv_download, ok};
use crate::services::reports::{self, CollectionReportQuery, OrderReportQuery};

#[get("/reports/orders")]
pub async fn order_report(
    params: web::Query<OrderReportQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        reports::order_report(repo.get_ref(), &user, params.into_inner()),
        "build order report",
    )
}

#[get("/reports/orders.csv")]
pub async fn order_report_csv(
    params: web::Query<OrderReportQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    csv_download(
        reports::order_report_csv(repo.get_ref(), &user, params.into_inner()),
        "export order report",
    )
}

#[get("/reports/collections")]
pub async fn collection_report(
    params: web::Query<CollectionReportQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(
        reports::collection_report(repo.get_ref(), &user, params.into_inner()),
        "build collection report",
    )
}

#[get("/reports/collections.csv")]
pub async fn collection_report_csv(
    params: web::Query<CollectionReportQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    csv_download(
        reports::collection_report_csv(repo.get_ref(), &user, params.into_inner()),
        "export collection report",
    )
}
