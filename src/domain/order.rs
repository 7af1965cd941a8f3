use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerType;
use crate::domain::pricing::{OrderTotals, PricedLine};
use crate::pagination::Pagination;

text_enum! {
    /// Lifecycle state of an order.
    pub enum OrderStatus {
        Draft => "draft",
        Confirmed => "confirmed",
        Processing => "processing",
        Dispatched => "dispatched",
        Delivered => "delivered",
        Cancelled => "cancelled",
    }
    default = Draft;
}

/// Persisted order line. Lines never change after the order is written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
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

/// Order line together with the product it references.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderLineDetail {
    #[serde(flatten)]
    pub line: OrderLine,
    pub product_code: String,
    pub product_name: String,
    pub unit_of_measure: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: i32,
    pub order_no: String,
    pub customer_id: i32,
    pub order_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub discount_amount: f64,
    pub tax_amount: f64,
    pub net_amount: f64,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Order header with its customer and lines, as returned by the detail view.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub customer_code: String,
    pub customer_name: String,
    pub lines: Vec<OrderLineDetail>,
}

/// Header and lines written together in one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub order_no: String,
    pub customer_id: i32,
    pub order_date: NaiveDate,
    pub delivery_date: Option<NaiveDate>,
    pub status: OrderStatus,
    pub totals: OrderTotals,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
    pub lines: Vec<NewOrderLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
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

impl From<&PricedLine> for NewOrderLine {
    fn from(line: &PricedLine) -> Self {
        Self {
            line_no: line.line_no,
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
            discount_percentage: line.discount_percentage,
            discount_amount: line.discount_amount,
            tax_percentage: line.tax_percentage,
            tax_amount: line.tax_amount,
            line_total: line.line_total,
        }
    }
}

/// Generate an order number from a millisecond timestamp.
pub fn order_number(now: NaiveDateTime) -> String {
    format!("ORD{}", now.and_utc().timestamp_millis())
}

#[derive(Debug, Clone, Default)]
pub struct OrderListQuery {
    /// Matches order number, customer code or customer name.
    pub search: Option<String>,
    pub customer_id: Option<i32>,
    pub customer_type: Option<CustomerType>,
    pub created_by: Option<i32>,
    pub status: Option<OrderStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub pagination: Option<Pagination>,
}

impl OrderListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn customer(mut self, customer_id: i32) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn customer_type(mut self, customer_type: CustomerType) -> Self {
        self.customer_type = Some(customer_type);
        self
    }

    pub fn created_by(mut self, user_id: i32) -> Self {
        self.created_by = Some(user_id);
        self
    }

    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Inclusive order date range. Either bound may be open.
    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Order header joined with customer and creator, used by lists and reports.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderSummary {
    #[serde(flatten)]
    pub order: Order,
    pub customer_code: String,
    pub customer_name: String,
    pub customer_type: CustomerType,
    pub created_by_name: Option<String>,
}

/// Summed amounts over the orders matched by a report.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct OrderReportTotals {
    pub order_count: usize,
    pub total_amount: f64,
    pub discount_amount: f64,
    pub tax_amount: f64,
    pub net_amount: f64,
}

impl OrderReportTotals {
    pub fn from_rows(rows: &[OrderSummary]) -> Self {
        rows.iter().fold(
            Self {
                order_count: rows.len(),
                ..Self::default()
            },
            |mut totals, row| {
                totals.total_amount += row.order.total_amount;
                totals.discount_amount += row.order.discount_amount;
                totals.tax_amount += row.order.tax_amount;
                totals.net_amount += row.order.net_amount;
                totals
            },
        )
    }
}
