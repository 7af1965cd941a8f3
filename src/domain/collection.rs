use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

text_enum! {
    pub enum PaymentMode {
        Cash => "cash",
        Cheque => "cheque",
        Upi => "upi",
        Neft => "neft",
        Card => "card",
    }
    default = Cash;
}

text_enum! {
    pub enum CollectionStatus {
        Pending => "pending",
        Cleared => "cleared",
        Bounced => "bounced",
    }
    default = Pending;
}

/// Payment received from a customer, optionally against an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub id: i32,
    pub collection_no: String,
    pub customer_id: i32,
    pub order_id: Option<i32>,
    pub collection_date: NaiveDate,
    pub amount: f64,
    pub payment_mode: PaymentMode,
    pub payment_reference: Option<String>,
    pub status: CollectionStatus,
    pub notes: Option<String>,
    pub collected_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCollection {
    pub collection_no: String,
    pub customer_id: i32,
    pub order_id: Option<i32>,
    pub collection_date: NaiveDate,
    pub amount: f64,
    pub payment_mode: PaymentMode,
    pub payment_reference: Option<String>,
    pub status: CollectionStatus,
    pub notes: Option<String>,
    pub collected_by: Option<i32>,
}

/// Generate a collection number from a millisecond timestamp.
pub fn collection_number(now: NaiveDateTime) -> String {
    format!("COL{}", now.and_utc().timestamp_millis())
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CollectionSummary {
    #[serde(flatten)]
    pub collection: Collection,
    pub customer_code: String,
    pub customer_name: String,
    pub order_no: Option<String>,
    pub collected_by_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CollectionListQuery {
    /// Matches collection number, customer code or name, or payment reference.
    pub search: Option<String>,
    pub customer_id: Option<i32>,
    pub collected_by: Option<i32>,
    pub payment_mode: Option<PaymentMode>,
    pub status: Option<CollectionStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub pagination: Option<Pagination>,
}

impl CollectionListQuery {
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

    pub fn collected_by(mut self, user_id: i32) -> Self {
        self.collected_by = Some(user_id);
        self
    }

    pub fn payment_mode(mut self, mode: PaymentMode) -> Self {
        self.payment_mode = Some(mode);
        self
    }

    pub fn status(mut self, status: CollectionStatus) -> Self {
        self.status = Some(status);
        self
    }

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

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct CollectionReportTotals {
    pub collection_count: usize,
    pub total_amount: f64,
}

impl CollectionReportTotals {
    pub fn from_rows(rows: &[CollectionSummary]) -> Self {
        Self {
            collection_count: rows.len(),
            total_amount: rows.iter().map(|row| row.collection.amount).sum(),
        }
    }
}
