use actix_web::{Responder, get, post, put, web};

use crate::auth::AuthenticatedUser;
use crate::forms::orders::{OrderForm, OrderStatusForm};
use crate::repository::DieselRepository;
use crate::routes::{created, ok};
use crate::services::orders::{self, OrdersQuery};

#[get("/orders")]
pub async fn list_orders(
    params: web::Query<OrdersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(orders::list_orders(repo.get_ref(), &user, params.into_inner()), "list orders")
}

#[post("/orders")]
pub async fn create_order(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<OrderForm>,
) -> impl Responder {
    created(
        orders::create_order(repo.get_ref(), &user, payload.into_inner()),
        "create order",
    )
}

#[post("/orders/quote")]
/// Price an order without saving it.
pub async fn quote_order(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<OrderForm>,
) -> impl Responder {
    ok(
        orders::quote_order(repo.get_ref(), &user, payload.into_inner()),
        "quote order",
    )
}

#[get("/orders/{order_id}")]
pub async fn get_order(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    ok(orders::get_order(repo.get_ref(), &user, path.into_inner()), "load order")
}

#[put("/orders/{order_id}/status")]
pub async fn update_order_status(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    payload: web::Json<OrderStatusForm>,
) -> impl Responder {
    ok(
        orders::update_order_status(repo.get_ref(), &user, path.into_inner(), payload.into_inner()),
        "update order status",
    )
}
