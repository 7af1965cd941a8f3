//! Sample records shared by the service tests.

use chrono::{NaiveDate, NaiveDateTime};

use crate::auth::AuthenticatedUser;
use crate::domain::beat_plan::{BeatPlan, DayMask};
use crate::domain::customer::{Address, Customer, CustomerType};
use crate::domain::order::{Order, OrderDetail, OrderStatus};
use crate::domain::price_list::PriceListEntry;
use crate::domain::product::Product;
use crate::domain::route::Route;
use crate::domain::user::{Role, User};

pub const USER_ID: i32 = 7;

pub fn datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 6)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .unwrap_or_default()
}

pub fn user(role: Role) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: USER_ID,
        mobile_no: "9876543210".to_string(),
        name: "Asha Rao".to_string(),
        role,
        iat: 0,
        exp: 0,
    }
}

pub fn stored_user(id: i32, role: Role) -> User {
    User {
        id,
        mobile_no: format!("98765432{:02}", id % 100),
        full_name: format!("User {id}"),
        email: None,
        role,
        is_active: true,
        created_at: datetime(),
        updated_at: datetime(),
    }
}

pub fn customer(id: i32, customer_type: CustomerType, assigned: Vec<i32>) -> Customer {
    Customer {
        id,
        customer_code: format!("C{id:03}"),
        customer_name: format!("Customer {id}"),
        contact_person: None,
        mobile_no: "9123456780".to_string(),
        email: None,
        gstin: None,
        pan_no: None,
        owner_name: None,
        customer_type,
        credit_limit: 0.0,
        credit_days: 0,
        address: Address::default(),
        location: None,
        is_active: true,
        assigned_user_ids: assigned,
        created_by: None,
        created_at: datetime(),
        updated_at: datetime(),
    }
}

pub fn product(id: i32, gst_rate: f64) -> Product {
    Product {
        id,
        product_code: format!("P{id:03}"),
        product_name: format!("Product {id}"),
        category: None,
        subcategory: None,
        unit_of_measure: "pcs".to_string(),
        hsn_code: None,
        gst_rate,
        description: None,
        is_active: true,
        created_at: datetime(),
        updated_at: datetime(),
    }
}

pub fn price_entry(
    id: i32,
    product_id: i32,
    customer_type: CustomerType,
    price: f64,
    discount_percentage: f64,
) -> PriceListEntry {
    PriceListEntry {
        id,
        product_id,
        customer_type,
        price,
        discount_percentage,
        effective_from: datetime().date(),
        effective_to: None,
        is_active: true,
        created_at: datetime(),
        updated_at: datetime(),
    }
}

pub fn order(id: i32, customer_id: i32, created_by: Option<i32>) -> OrderDetail {
    OrderDetail {
        order: Order {
            id,
            order_no: format!("ORD{id}"),
            customer_id,
            order_date: datetime().date(),
            delivery_date: None,
            status: OrderStatus::Draft,
            total_amount: 0.0,
            discount_amount: 0.0,
            tax_amount: 0.0,
            net_amount: 0.0,
            notes: None,
            created_by,
            created_at: datetime(),
            updated_at: datetime(),
        },
        customer_code: format!("C{customer_id:03}"),
        customer_name: format!("Customer {customer_id}"),
        lines: Vec::new(),
    }
}

pub fn route(id: i32) -> Route {
    Route {
        id,
        route_code: format!("R{id}"),
        route_name: format!("Route {id}"),
        route_description: None,
        is_active: true,
        created_by: None,
        created_at: datetime(),
        updated_at: datetime(),
    }
}

pub fn beat_plan(id: i32, user_id: i32, route_id: i32, days: DayMask) -> BeatPlan {
    BeatPlan {
        id,
        user_id,
        route_id,
        days,
        is_active: true,
        created_at: datetime(),
        updated_at: datetime(),
    }
}
