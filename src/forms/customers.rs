use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::customer::{Address, CustomerType, GeoPoint, NewCustomer, UpdateCustomer};
use crate::forms::uploads::{CsvRow, CsvSheet, ImportBatch, UploadForm, UploadFormError};
use crate::forms::{optional_text, parse_lenient, sanitize_inline_text};

/// Columns of the customer upload template, in order.
pub const CSV_COLUMNS: &[&str] = &[
    "customer_code",
    "customer_name",
    "contact_person",
    "mobile_no",
    "email",
    "gstin",
    "pan_no",
    "customer_type",
    "credit_limit",
    "credit_days",
    "owner_name",
    "address_line1",
    "address_line2",
    "address_line3",
    "city",
    "state",
    "pincode",
];

const REQUIRED_COLUMNS: &[&str] = &["customer_code", "customer_name", "mobile_no"];

pub type CustomerFormResult<T> = Result<T, CustomerFormError>;

#[derive(Debug, Error)]
pub enum CustomerFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
    #[error("invalid customer type `{0}`; expected retail, dealer or distributor")]
    InvalidCustomerType(String),
    #[error("latitude must be within ±90 and longitude within ±180")]
    InvalidLocation,
    #[error(transparent)]
    Upload(#[from] UploadFormError),
}

/// Resolve a customer type, logging when the legacy `wholesale` spelling is used.
pub(crate) fn parse_customer_type(value: Option<&str>) -> Result<CustomerType, String> {
    let Some(raw) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(CustomerType::default());
    };

    match CustomerType::parse_with_alias(raw) {
        Some((customer_type, true)) => {
            log::warn!("Customer type `{raw}` is a legacy alias and was stored as `dealer`");
            Ok(customer_type)
        }
        Some((customer_type, false)) => Ok(customer_type),
        None => Err(raw.to_string()),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressForm {
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub address_line3: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

impl AddressForm {
    fn into_address(self) -> Address {
        Address {
            address_line1: optional_text(self.address_line1.as_deref()),
            address_line2: optional_text(self.address_line2.as_deref()),
            address_line3: optional_text(self.address_line3.as_deref()),
            city: optional_text(self.city.as_deref()),
            state: optional_text(self.state.as_deref()),
            pincode: optional_text(self.pincode.as_deref()),
        }
    }
}

/// Payload of the create / edit customer endpoints.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerForm {
    #[validate(length(min = 1, max = 32))]
    pub customer_code: String,
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    pub contact_person: Option<String>,
    #[validate(length(min = 1, max = 15))]
    pub mobile_no: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 15))]
    pub gstin: Option<String>,
    #[validate(length(max = 10))]
    pub pan_no: Option<String>,
    pub owner_name: Option<String>,
    pub customer_type: Option<String>,
    #[serde(default, deserialize_with = "crate::forms::lenient_number")]
    pub credit_limit: f64,
    #[serde(default, deserialize_with = "crate::forms::lenient_number")]
    pub credit_days: f64,
    #[serde(default, flatten)]
    pub address: AddressForm,
    pub assigned_user_ids: Option<Vec<i32>>,
    /// Only read on edit.
    pub is_active: Option<bool>,
}

struct CleanCustomer {
    customer_code: String,
    customer_name: String,
    mobile_no: String,
    customer_type: CustomerType,
}

impl CustomerForm {
    fn clean(&self) -> CustomerFormResult<CleanCustomer> {
        self.validate()?;

        let customer_code = sanitize_inline_text(&self.customer_code);
        if customer_code.is_empty() {
            return Err(CustomerFormError::Empty {
                field: "customer_code",
            });
        }
        let customer_name = sanitize_inline_text(&self.customer_name);
        if customer_name.is_empty() {
            return Err(CustomerFormError::Empty {
                field: "customer_name",
            });
        }
        let mobile_no = sanitize_inline_text(&self.mobile_no);
        if mobile_no.is_empty() {
            return Err(CustomerFormError::Empty { field: "mobile_no" });
        }
        let customer_type = parse_customer_type(self.customer_type.as_deref())
            .map_err(CustomerFormError::InvalidCustomerType)?;

        Ok(CleanCustomer {
            customer_code,
            customer_name,
            mobile_no,
            customer_type,
        })
    }

    pub fn into_new_customer(self, created_by: i32) -> CustomerFormResult<NewCustomer> {
        let clean = self.clean()?;

        let mut customer =
            NewCustomer::new(clean.customer_code, clean.customer_name, clean.mobile_no)
            .with_customer_type(clean.customer_type)
            .with_credit(self.credit_limit, self.credit_days as i32)
            .with_assigned_users(self.assigned_user_ids.unwrap_or_default())
            .created_by(created_by);

        customer.contact_person = optional_text(self.contact_person.as_deref());
        customer.email = optional_text(self.email.as_deref()).map(|email| email.to_lowercase());
        customer.gstin = optional_text(self.gstin.as_deref()).map(|gstin| gstin.to_uppercase());
        customer.pan_no = optional_text(self.pan_no.as_deref()).map(|pan| pan.to_uppercase());
        customer.owner_name = optional_text(self.owner_name.as_deref());
        customer.address = self.address.into_address();

        Ok(customer)
    }

    /// The code is immutable after creation and ignored here.
    pub fn into_update_customer(self) -> CustomerFormResult<UpdateCustomer> {
        let clean = self.clean()?;

        Ok(UpdateCustomer {
            customer_name: clean.customer_name,
            contact_person: optional_text(self.contact_person.as_deref()),
            mobile_no: clean.mobile_no,
            email: optional_text(self.email.as_deref()).map(|email| email.to_lowercase()),
            gstin: optional_text(self.gstin.as_deref()).map(|gstin| gstin.to_uppercase()),
            pan_no: optional_text(self.pan_no.as_deref()).map(|pan| pan.to_uppercase()),
            owner_name: optional_text(self.owner_name.as_deref()),
            customer_type: clean.customer_type,
            credit_limit: self.credit_limit,
            credit_days: self.credit_days as i32,
            address: self.address.into_address(),
            is_active: self.is_active.unwrap_or(true),
            assigned_user_ids: self.assigned_user_ids,
            updated_at: chrono::Local::now().naive_utc(),
        })
    }
}

/// Geolocation captured at the customer's premises.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CaptureLocationForm {
    pub latitude: f64,
    pub longitude: f64,
}

impl CaptureLocationForm {
    pub fn into_point(self) -> CustomerFormResult<GeoPoint> {
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CustomerFormError::InvalidLocation);
        }
        Ok(GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

fn customer_from_row(row: &CsvRow<'_>, created_by: i32) -> Result<NewCustomer, String> {
    let missing = row.missing(REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(format!("Missing required fields ({})", missing.join(", ")));
    }

    let customer_type = parse_customer_type(row.get("customer_type")).map_err(|value| {
        format!("Invalid customer_type `{value}`. Must be retail, dealer, or distributor")
    })?;

    let mut customer = NewCustomer::new(
        sanitize_inline_text(row.get("customer_code").unwrap_or_default()),
        sanitize_inline_text(row.get("customer_name").unwrap_or_default()),
        sanitize_inline_text(row.get("mobile_no").unwrap_or_default()),
    )
    .with_customer_type(customer_type)
    .with_credit(
        row.get("credit_limit").map(parse_lenient).unwrap_or(0.0),
        row.get("credit_days").map(parse_lenient).unwrap_or(0.0) as i32,
    )
    .created_by(created_by);

    customer.contact_person = optional_text(row.get("contact_person"));
    customer.email = optional_text(row.get("email")).map(|email| email.to_lowercase());
    customer.gstin = optional_text(row.get("gstin")).map(|gstin| gstin.to_uppercase());
    customer.pan_no = optional_text(row.get("pan_no")).map(|pan| pan.to_uppercase());
    customer.owner_name = optional_text(row.get("owner_name"));
    customer.address = Address {
        address_line1: optional_text(row.get("address_line1")),
        address_line2: optional_text(row.get("address_line2")),
        address_line3: optional_text(row.get("address_line3")),
        city: optional_text(row.get("city")),
        state: optional_text(row.get("state")),
        pincode: optional_text(row.get("pincode")),
    };

    Ok(customer)
}

/// Parse a customer upload into insertable rows and per-row errors.
pub fn parse_customer_upload(
    upload: UploadForm,
    created_by: i32,
) -> CustomerFormResult<ImportBatch<NewCustomer>> {
    let sheet = CsvSheet::parse(&upload.bytes)?;
    sheet.require_columns(REQUIRED_COLUMNS)?;

    let mut batch = ImportBatch::default();
    for row in sheet.rows() {
        match customer_from_row(&row, created_by) {
            Ok(customer) => batch.rows.push(customer),
            Err(message) => batch.reject(row.line, message),
        }
    }

    if batch.rows.is_empty() && batch.errors.is_empty() {
        return Err(UploadFormError::Empty.into());
    }

    Ok(batch)
}
