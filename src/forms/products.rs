use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{DEFAULT_UNIT_OF_MEASURE, NewProduct, UpdateProduct};
use crate::forms::uploads::{CsvRow, CsvSheet, ImportBatch, UploadForm, UploadFormError};
use crate::forms::{optional_multiline, optional_text, parse_lenient, sanitize_inline_text};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: u64 = 200;

/// Maximum allowed length for a product code.
const CODE_MAX_LEN: u64 = 32;

/// Columns of the product upload template, in order.
pub const CSV_COLUMNS: &[&str] = &[
    "product_code",
    "product_name",
    "category",
    "subcategory",
    "unit_of_measure",
    "hsn_code",
    "gst_rate",
    "description",
];

const REQUIRED_COLUMNS: &[&str] = &["product_code", "product_name"];

pub type ProductFormResult<T> = Result<T, ProductFormError>;

#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
    #[error("GST rate cannot be negative")]
    NegativeGstRate,
    #[error(transparent)]
    Upload(#[from] UploadFormError),
}

/// Payload of the create / edit product endpoints.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductForm {
    #[validate(length(min = 1, max = CODE_MAX_LEN))]
    pub product_code: String,
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub product_name: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub unit_of_measure: Option<String>,
    pub hsn_code: Option<String>,
    #[serde(default, deserialize_with = "crate::forms::lenient_number")]
    pub gst_rate: f64,
    pub description: Option<String>,
    /// Only read on edit.
    pub is_active: Option<bool>,
}

impl ProductForm {
    fn checked(&self) -> ProductFormResult<(String, String)> {
        self.validate()?;

        let code = sanitize_inline_text(&self.product_code);
        if code.is_empty() {
            return Err(ProductFormError::Empty {
                field: "product_code",
            });
        }
        let name = sanitize_inline_text(&self.product_name);
        if name.is_empty() {
            return Err(ProductFormError::Empty {
                field: "product_name",
            });
        }
        if self.gst_rate < 0.0 {
            return Err(ProductFormError::NegativeGstRate);
        }
        Ok((code, name))
    }

    fn unit(&self) -> String {
        optional_text(self.unit_of_measure.as_deref())
            .unwrap_or_else(|| DEFAULT_UNIT_OF_MEASURE.to_string())
    }

    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        let (code, name) = self.checked()?;
        let unit = self.unit();

        let mut product = NewProduct::new(code, name)
            .with_gst_rate(self.gst_rate)
            .with_unit_of_measure(unit);
        product.category = optional_text(self.category.as_deref());
        product.subcategory = optional_text(self.subcategory.as_deref());
        product.hsn_code = optional_text(self.hsn_code.as_deref());
        product.description = optional_multiline(self.description.as_deref());

        Ok(product)
    }

    /// The code is immutable after creation and ignored here.
    pub fn into_update_product(self) -> ProductFormResult<UpdateProduct> {
        let (_, name) = self.checked()?;

        Ok(UpdateProduct {
            product_name: name,
            category: optional_text(self.category.as_deref()),
            subcategory: optional_text(self.subcategory.as_deref()),
            unit_of_measure: self.unit(),
            hsn_code: optional_text(self.hsn_code.as_deref()),
            gst_rate: self.gst_rate,
            description: optional_multiline(self.description.as_deref()),
            is_active: self.is_active.unwrap_or(true),
            updated_at: chrono::Local::now().naive_utc(),
        })
    }
}

fn product_from_row(row: &CsvRow<'_>) -> Result<NewProduct, String> {
    let missing = row.missing(REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(format!("Missing required fields ({})", missing.join(", ")));
    }

    let gst_rate = row.get("gst_rate").map(parse_lenient).unwrap_or(0.0);
    if gst_rate < 0.0 {
        return Err("gst_rate cannot be negative".to_string());
    }

    let mut product = NewProduct::new(
        sanitize_inline_text(row.get("product_code").unwrap_or_default()),
        sanitize_inline_text(row.get("product_name").unwrap_or_default()),
    )
    .with_gst_rate(gst_rate);

    if let Some(unit) = optional_text(row.get("unit_of_measure")) {
        product = product.with_unit_of_measure(unit);
    }
    product.category = optional_text(row.get("category"));
    product.subcategory = optional_text(row.get("subcategory"));
    product.hsn_code = optional_text(row.get("hsn_code"));
    product.description = optional_multiline(row.get("description"));

    Ok(product)
}

/// Parse a product upload into insertable rows and per-row errors.
pub fn parse_product_upload(upload: UploadForm) -> ProductFormResult<ImportBatch<NewProduct>> {
    let sheet = CsvSheet::parse(&upload.bytes)?;
    sheet.require_columns(REQUIRED_COLUMNS)?;

    let mut batch = ImportBatch::default();
    for row in sheet.rows() {
        match product_from_row(&row) {
            Ok(product) => batch.rows.push(product),
            Err(message) => batch.reject(row.line, message),
        }
    }

    if batch.rows.is_empty() && batch.errors.is_empty() {
        return Err(UploadFormError::Empty.into());
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(gst_rate: f64) -> ProductForm {
        ProductForm {
            product_code: " P-1 ".to_string(),
            product_name: "Steel   Bolt".to_string(),
            category: Some("Hardware".to_string()),
            subcategory: Some(" ".to_string()),
            unit_of_measure: None,
            hsn_code: None,
            gst_rate,
            description: None,
            is_active: None,
        }
    }

    #[test]
    fn unit_defaults_to_pieces() {
        let product = form(18.0).into_new_product().expect("valid");

        assert_eq!(product.product_code, "P-1");
        assert_eq!(product.product_name, "Steel Bolt");
        assert_eq!(product.unit_of_measure, "pcs");
        assert_eq!(product.subcategory, None);
        assert_eq!(product.gst_rate, 18.0);
    }

    #[test]
    fn negative_gst_is_rejected() {
        assert!(matches!(
            form(-1.0).into_new_product(),
            Err(ProductFormError::NegativeGstRate)
        ));
    }

    #[test]
    fn upload_keeps_valid_rows_and_reports_the_rest() {
        let csv = "product_code,product_name,unit_of_measure,gst_rate\n\
                   P1,Bolt,box,18\n\
                   ,Nut,,5\n\
                   P3,Washer,,abc\n";
        let batch =
            parse_product_upload(UploadForm::new(None, csv.as_bytes().to_vec())).expect("parses");

        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.rows[0].unit_of_measure, "box");
        assert_eq!(batch.rows[1].unit_of_measure, "pcs");
        assert_eq!(batch.rows[1].gst_rate, 0.0);
        assert_eq!(
            batch.errors,
            vec!["Row 3: Missing required fields (product_code)".to_string()]
        );
    }
}
