use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::order::{
    NewOrder as DomainNewOrder, NewOrderLine as DomainNewOrderLine, Order as DomainOrder,
    OrderLine as DomainOrderLine,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::orders)]
pub struct Order {
    pub id: i32,
    pub order_no: String,
    pub customer_id: i32,
    pub order_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub status: String,
    pub total_amount: f64,
    pub discount_amount: f64,
    pub tax_amount: f64,
    pub net_amount: f64,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::order_lines)]
#[diesel(belongs_to(Order, foreign_key = order_id))]
pub struct OrderLine {
    pub id: i32,
    pub order_id: i32,
    pub line_no: i32,
    pub product_id: i32,
    pub quantity: f64,
    pub unit_price: f64,
    pub discount_percentage: f64,
    pub discount_amount: f64,
    pub tax_percentage: f64,
    pub tax_amount: f64,
    pub line_total: f64,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub order_no: &'a str,
    pub customer_id: i32,
    pub order_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub status: &'a str,
    pub total_amount: f64,
    pub discount_amount: f64,
    pub tax_amount: f64,
    pub net_amount: f64,
    pub notes: Option<&'a str>,
    pub created_by: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::order_lines)]
pub struct NewOrderLine {
    pub order_id: i32,
    pub line_no: i32,
    pub product_id: i32,
    pub quantity: f64,
    pub unit_price: f64,
    pub discount_percentage: f64,
    pub discount_amount: f64,
    pub tax_percentage: f64,
    pub tax_amount: f64,
    pub line_total: f64,
}

impl From<Order> for DomainOrder {
    fn from(value: Order) -> Self {
        Self {
            id: value.id,
            order_no: value.order_no,
            customer_id: value.customer_id,
            order_date: value.order_date,
            delivery_date: value.delivery_date,
            status: value.status.as_str().into(),
            total_amount: value.total_amount,
            discount_amount: value.discount_amount,
            tax_amount: value.tax_amount,
            net_amount: value.net_amount,
            notes: value.notes,
            created_by: value.created_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<OrderLine> for DomainOrderLine {
    fn from(value: OrderLine) -> Self {
        Self {
            id: value.id,
            order_id: value.order_id,
            line_no: value.line_no,
            product_id: value.product_id,
            quantity: value.quantity,
            unit_price: value.unit_price,
            discount_percentage: value.discount_percentage,
            discount_amount: value.discount_amount,
            tax_percentage: value.tax_percentage,
            tax_amount: value.tax_amount,
            line_total: value.line_total,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewOrder> for NewOrder<'a> {
    fn from(value: &'a DomainNewOrder) -> Self {
        Self {
            order_no: value.order_no.as_str(),
            customer_id: value.customer_id,
            order_date: value.order_date,
            delivery_date: value.delivery_date,
            status: value.status.into(),
            total_amount: value.totals.total_amount,
            discount_amount: value.totals.discount_amount,
            tax_amount: value.totals.tax_amount,
            net_amount: value.totals.net_amount,
            notes: value.notes.as_deref(),
            created_by: value.created_by,
        }
    }
}

impl NewOrderLine {
    pub fn from_domain(order_id: i32, value: &DomainNewOrderLine) -> Self {
        Self {
            order_id,
            line_no: value.line_no,
            product_id: value.product_id,
            quantity: value.quantity,
            unit_price: value.unit_price,
            discount_percentage: value.discount_percentage,
            discount_amount: value.discount_amount,
            tax_percentage: value.tax_percentage,
            tax_amount: value.tax_amount,
            line_total: value.line_total,
        }
    }
}
