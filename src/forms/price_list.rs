use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::customer::CustomerType;
use crate::domain::price_list::{NewPriceListEntry, UpdatePriceListEntry};
use crate::forms::customers::parse_customer_type;
use crate::forms::parse_lenient;
use crate::forms::uploads::{CsvRow, CsvSheet, ImportBatch, UploadForm, UploadFormError};

/// Columns of the price upload template, in order.
pub const CSV_COLUMNS: &[&str] = &[
    "product_code",
    "customer_type",
    "price",
    "discount_percentage",
    "effective_from",
    "effective_to",
];

const REQUIRED_COLUMNS: &[&str] = &["product_code", "customer_type", "price"];

pub type PriceFormResult<T> = Result<T, PriceFormError>;

#[derive(Debug, Error, PartialEq)]
pub enum PriceFormError {
    #[error("price cannot be negative")]
    NegativePrice,
    #[error("discount percentage must be between 0 and 100")]
    DiscountOutOfRange,
    #[error("effective_to cannot precede effective_from")]
    InvertedRange,
    #[error("invalid customer type `{0}`; expected retail, dealer or distributor")]
    InvalidCustomerType(String),
}

#[derive(Debug, Error)]
pub enum PriceUploadError {
    #[error(transparent)]
    Upload(#[from] UploadFormError),
}

fn check_terms(
    price: f64,
    discount_percentage: f64,
    effective_from: NaiveDate,
    effective_to: Option<NaiveDate>,
) -> PriceFormResult<()> {
    if price < 0.0 {
        return Err(PriceFormError::NegativePrice);
    }
    if !(0.0..=100.0).contains(&discount_percentage) {
        return Err(PriceFormError::DiscountOutOfRange);
    }
    if effective_to.is_some_and(|to| to < effective_from) {
        return Err(PriceFormError::InvertedRange);
    }
    Ok(())
}

/// Payload of the create price entry endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AddPriceForm {
    pub product_id: i32,
    pub customer_type: String,
    #[serde(deserialize_with = "crate::forms::lenient_number")]
    pub price: f64,
    #[serde(default, deserialize_with = "crate::forms::lenient_number")]
    pub discount_percentage: f64,
    /// Defaults to the upload date.
    pub effective_from: Option<NaiveDate>,
    pub effective_to: Option<NaiveDate>,
}

impl AddPriceForm {
    pub fn into_new_entry(self, today: NaiveDate) -> PriceFormResult<NewPriceListEntry> {
        let customer_type = parse_customer_type(Some(&self.customer_type))
            .map_err(PriceFormError::InvalidCustomerType)?;
        let effective_from = self.effective_from.unwrap_or(today);
        check_terms(
            self.price,
            self.discount_percentage,
            effective_from,
            self.effective_to,
        )?;

        let mut entry =
            NewPriceListEntry::new(self.product_id, customer_type, self.price, effective_from)
                .with_discount(self.discount_percentage);
        if let Some(effective_to) = self.effective_to {
            entry = entry.until(effective_to);
        }
        Ok(entry)
    }
}

/// Payload of the edit price entry endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EditPriceForm {
    #[serde(deserialize_with = "crate::forms::lenient_number")]
    pub price: f64,
    #[serde(default, deserialize_with = "crate::forms::lenient_number")]
    pub discount_percentage: f64,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl EditPriceForm {
    pub fn into_update(self) -> PriceFormResult<UpdatePriceListEntry> {
        check_terms(
            self.price,
            self.discount_percentage,
            self.effective_from,
            self.effective_to,
        )?;

        Ok(UpdatePriceListEntry {
            price: self.price,
            discount_percentage: self.discount_percentage,
            effective_from: self.effective_from,
            effective_to: self.effective_to,
            is_active: self.is_active,
            updated_at: chrono::Local::now().naive_utc(),
        })
    }
}

/// Price row parsed from CSV, still keyed by product code.
#[derive(Debug, Clone, PartialEq)]
struct PendingPrice {
    product_code: String,
    customer_type: CustomerType,
    price: f64,
    discount_percentage: f64,
    effective_from: NaiveDate,
    effective_to: Option<NaiveDate>,
}

/// Price upload awaiting product code resolution.
#[derive(Debug)]
pub struct PriceUpload {
    rows: Vec<(usize, Result<PendingPrice, String>)>,
}

fn parse_date(row: &CsvRow<'_>, column: &str) -> Result<Option<NaiveDate>, String> {
    row.get(column)
        .map(|value| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_err(|_| format!("Invalid {column} `{value}`. Expected YYYY-MM-DD"))
        })
        .transpose()
}

fn price_from_row(row: &CsvRow<'_>, today: NaiveDate) -> Result<PendingPrice, String> {
    let missing = row.missing(REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(format!("Missing required fields ({})", missing.join(", ")));
    }

    let customer_type = parse_customer_type(row.get("customer_type"))
        .map_err(|_| "Invalid customer_type. Must be retail, dealer, or distributor".to_string())?;

    let price = row.get("price").map(parse_lenient).unwrap_or(0.0);
    let discount_percentage = row.get("discount_percentage").map(parse_lenient).unwrap_or(0.0);
    let effective_from = parse_date(row, "effective_from")?.unwrap_or(today);
    let effective_to = parse_date(row, "effective_to")?;

    check_terms(price, discount_percentage, effective_from, effective_to)
        .map_err(|err| err.to_string())?;

    Ok(PendingPrice {
        product_code: row.get("product_code").unwrap_or_default().to_string(),
        customer_type,
        price,
        discount_percentage,
        effective_from,
        effective_to,
    })
}

impl PriceUpload {
    /// Parse the CSV. Rows without a start date take effect on `today`.
    pub fn parse(upload: UploadForm, today: NaiveDate) -> Result<Self, PriceUploadError> {
        let sheet = CsvSheet::parse(&upload.bytes)?;
        sheet.require_columns(REQUIRED_COLUMNS)?;

        let rows: Vec<_> = sheet
            .rows()
            .map(|row| (row.line, price_from_row(&row, today)))
            .collect();

        if rows.is_empty() {
            return Err(UploadFormError::Empty.into());
        }

        Ok(Self { rows })
    }

    /// Distinct product codes referenced by the parsable rows.
    pub fn product_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self
            .rows
            .iter()
            .filter_map(|(_, row)| row.as_ref().ok())
            .map(|row| row.product_code.clone())
            .collect();
        codes.sort();
        codes.dedup();
        codes
    }

    /// Attach product ids; rows naming unknown codes become errors.
    pub fn resolve(self, product_ids: &HashMap<String, i32>) -> ImportBatch<NewPriceListEntry> {
        let mut batch = ImportBatch::default();

        for (line, row) in self.rows {
            let pending = match row {
                Ok(pending) => pending,
                Err(message) => {
                    batch.reject(line, message);
                    continue;
                }
            };

            let Some(&product_id) = product_ids.get(&pending.product_code) else {
                batch.reject(
                    line,
                    format!("Product code '{}' not found", pending.product_code),
                );
                continue;
            };

            let mut entry = NewPriceListEntry::new(
                product_id,
                pending.customer_type,
                pending.price,
                pending.effective_from,
            )
            .with_discount(pending.discount_percentage);
            if let Some(effective_to) = pending.effective_to {
                entry = entry.until(effective_to);
            }
            batch.rows.push(entry);
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn add_form_defaults_start_date_to_today() {
        let form = AddPriceForm {
            product_id: 4,
            customer_type: "dealer".to_string(),
            price: 900.0,
            discount_percentage: 10.0,
            effective_from: None,
            effective_to: None,
        };

        let entry = form.into_new_entry(today()).expect("valid");
        assert_eq!(entry.effective_from, today());
        assert_eq!(entry.customer_type, CustomerType::Dealer);
        assert_eq!(entry.discount_percentage, 10.0);
    }

    #[test]
    fn terms_are_checked() {
        let from = today();
        assert_eq!(check_terms(-1.0, 0.0, from, None), Err(PriceFormError::NegativePrice));
        assert_eq!(check_terms(1.0, 101.0, from, None), Err(PriceFormError::DiscountOutOfRange));
        assert_eq!(
            check_terms(1.0, 0.0, from, from.pred_opt()),
            Err(PriceFormError::InvertedRange)
        );
        assert_eq!(check_terms(0.0, 100.0, from, Some(from)), Ok(()));
    }

    #[test]
    fn upload_resolves_codes_and_reports_rows() {
        let csv = "product_code,customer_type,price,discount_percentage,effective_from,effective_to\n\
                   P1,retail,1000,5,2025-01-01,\n\
                   P1,dealer,900,10,,\n\
                   P9,retail,10,,,\n\
                   P1,vip,10,,,\n\
                   P1,retail,,,,\n\
                   P1,retail,10,,01/02/2025,\n";
        let upload = PriceUpload::parse(UploadForm::new(None, csv.as_bytes().to_vec()), today())
            .expect("parses");
        assert_eq!(upload.product_codes(), vec!["P1".to_string(), "P9".to_string()]);

        let ids = HashMap::from([("P1".to_string(), 11)]);
        let batch = upload.resolve(&ids);

        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.rows[0].product_id, 11);
        assert_eq!(batch.rows[1].effective_from, today());
        assert_eq!(
            batch.errors,
            vec![
                "Row 4: Product code 'P9' not found".to_string(),
                "Row 5: Invalid customer_type. Must be retail, dealer, or distributor".to_string(),
                "Row 6: Missing required fields (price)".to_string(),
                "Row 7: Invalid effective_from `01/02/2025`. Expected YYYY-MM-DD".to_string(),
            ]
        );
    }
}
