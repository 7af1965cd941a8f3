//! Order and collection reports with CSV export.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedUser;
use crate::domain::collection::{
    CollectionListQuery, CollectionReportTotals, CollectionStatus, CollectionSummary, PaymentMode,
};
use crate::domain::customer::CustomerType;
use crate::domain::order::{OrderListQuery, OrderReportTotals, OrderStatus, OrderSummary};
use crate::repository::{CollectionReader, OrderReader};
use crate::services::{MANAGER_ROLES, ServiceError, ServiceResult, require_role, today};

const ORDER_COLUMNS: &[&str] = &[
    "Order No",
    "Order Date",
    "Customer Code",
    "Customer Name",
    "Customer Type",
    "Status",
    "Total Amount",
    "Discount",
    "Tax",
    "Net Amount",
    "Created By",
];

const COLLECTION_COLUMNS: &[&str] = &[
    "Collection No",
    "Date",
    "Customer Code",
    "Customer Name",
    "Amount",
    "Payment Mode",
    "Reference",
    "Status",
    "Order No",
    "Collected By",
];

#[derive(Debug, Default, Deserialize)]
pub struct OrderReportQuery {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub customer_type: Option<CustomerType>,
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderReport {
    pub rows: Vec<OrderSummary>,
    pub totals: OrderReportTotals,
}

#[derive(Debug, Default, Deserialize)]
pub struct CollectionReportQuery {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub payment_mode: Option<PaymentMode>,
    pub status: Option<CollectionStatus>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PaymentModeTotal {
    pub payment_mode: PaymentMode,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct CollectionReport {
    pub rows: Vec<CollectionSummary>,
    pub totals: CollectionReportTotals,
    /// Amount per payment mode, omitting modes with no collections.
    pub by_payment_mode: Vec<PaymentModeTotal>,
}

/// Exported report file.
#[derive(Debug)]
pub struct CsvExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

fn order_rows<R>(repo: &R, query: &OrderReportQuery) -> ServiceResult<Vec<OrderSummary>>
where
    R: OrderReader + ?Sized,
{
    let mut list_query = OrderListQuery::new().between(query.date_from, query.date_to);

    if let Some(customer_type) = query.customer_type {
        list_query = list_query.customer_type(customer_type);
    }
    if let Some(status) = query.status {
        list_query = list_query.status(status);
    }
    if let Some(term) = query.search.as_deref().filter(|term| !term.trim().is_empty()) {
        list_query = list_query.search(term);
    }

    let (_, rows) = repo.list_orders(list_query).map_err(ServiceError::from)?;
    Ok(rows)
}

pub fn order_report<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: OrderReportQuery,
) -> ServiceResult<OrderReport>
where
    R: OrderReader + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    let rows = order_rows(repo, &query)?;
    let totals = OrderReportTotals::from_rows(&rows);
    Ok(OrderReport { rows, totals })
}

fn finish(writer: csv::Writer<Vec<u8>>) -> ServiceResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|err| ServiceError::Internal(err.to_string()))
}

pub fn order_report_csv<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: OrderReportQuery,
) -> ServiceResult<CsvExport>
where
    R: OrderReader + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    let rows = order_rows(repo, &query)?;
    let mut writer = csv::Writer::from_writer(Vec::new());
    let csv_error = |err: csv::Error| ServiceError::Internal(err.to_string());

    writer.write_record(ORDER_COLUMNS).map_err(csv_error)?;
    for row in &rows {
        writer
            .write_record([
                row.order.order_no.clone(),
                row.order.order_date.to_string(),
                row.customer_code.clone(),
                row.customer_name.clone(),
                row.customer_type.to_string(),
                row.order.status.to_string(),
                format!("{:.2}", row.order.total_amount),
                format!("{:.2}", row.order.discount_amount),
                format!("{:.2}", row.order.tax_amount),
                format!("{:.2}", row.order.net_amount),
                row.created_by_name.clone().unwrap_or_default(),
            ])
            .map_err(csv_error)?;
    }

    log::info!("Order report with {} rows exported by {}", rows.len(), user.id());
    Ok(CsvExport {
        file_name: format!("sales_orders_{}.csv", today()),
        bytes: finish(writer)?,
    })
}

fn collection_rows<R>(
    repo: &R,
    query: &CollectionReportQuery,
) -> ServiceResult<Vec<CollectionSummary>>
where
    R: CollectionReader + ?Sized,
{
    let mut list_query = CollectionListQuery::new().between(query.date_from, query.date_to);

    if let Some(mode) = query.payment_mode {
        list_query = list_query.payment_mode(mode);
    }
    if let Some(status) = query.status {
        list_query = list_query.status(status);
    }

    let (_, rows) = repo
        .list_collections(list_query)
        .map_err(ServiceError::from)?;
    Ok(rows)
}

fn by_payment_mode(rows: &[CollectionSummary]) -> Vec<PaymentModeTotal> {
    PaymentMode::ALL
        .iter()
        .filter_map(|mode| {
            let mut matched = rows
                .iter()
                .filter(|row| row.collection.payment_mode == *mode)
                .peekable();
            matched.peek()?;
            Some(PaymentModeTotal {
                payment_mode: *mode,
                amount: matched.map(|row| row.collection.amount).sum(),
            })
        })
        .collect()
}

pub fn collection_report<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CollectionReportQuery,
) -> ServiceResult<CollectionReport>
where
    R: CollectionReader + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    let rows = collection_rows(repo, &query)?;
    Ok(CollectionReport {
        totals: CollectionReportTotals::from_rows(&rows),
        by_payment_mode: by_payment_mode(&rows),
        rows,
    })
}

pub fn collection_report_csv<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CollectionReportQuery,
) -> ServiceResult<CsvExport>
where
    R: CollectionReader + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    let rows = collection_rows(repo, &query)?;
    let mut writer = csv::Writer::from_writer(Vec::new());
    let csv_error = |err: csv::Error| ServiceError::Internal(err.to_string());

    writer.write_record(COLLECTION_COLUMNS).map_err(csv_error)?;
    for row in &rows {
        let collection = &row.collection;
        writer
            .write_record([
                collection.collection_no.clone(),
                collection.collection_date.to_string(),
                row.customer_code.clone(),
                row.customer_name.clone(),
                format!("{:.2}", collection.amount),
                collection.payment_mode.to_string(),
                collection.payment_reference.clone().unwrap_or_default(),
                collection.status.to_string(),
                row.order_no.clone().unwrap_or_default(),
                row.collected_by_name.clone().unwrap_or_default(),
            ])
            .map_err(csv_error)?;
    }

    Ok(CsvExport {
        file_name: format!("collections_{}.csv", today()),
        bytes: finish(writer)?,
    })
}
