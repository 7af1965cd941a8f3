use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Pricing tier of a customer and the key into the price list.
///
/// Customer records historically used `wholesale` where price lists used
/// `dealer`. Both spellings map to [`CustomerType::Dealer`]; see
/// [`CustomerType::parse_with_alias`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    #[default]
    Retail,
    #[serde(alias = "wholesale")]
    Dealer,
    Distributor,
}

/// Customer-side spelling accepted as an alias of `dealer`.
pub const LEGACY_DEALER_ALIAS: &str = "wholesale";

impl CustomerType {
    pub const ALL: &'static [CustomerType] = &[
        CustomerType::Retail,
        CustomerType::Dealer,
        CustomerType::Distributor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Retail => "retail",
            CustomerType::Dealer => "dealer",
            CustomerType::Distributor => "distributor",
        }
    }

    /// Parse a customer type, reporting whether the legacy alias was used.
    pub fn parse_with_alias(value: &str) -> Option<(Self, bool)> {
        match value.trim().to_ascii_lowercase().as_str() {
            "retail" => Some((CustomerType::Retail, false)),
            "dealer" => Some((CustomerType::Dealer, false)),
            LEGACY_DEALER_ALIAS => Some((CustomerType::Dealer, true)),
            "distributor" => Some((CustomerType::Distributor, false)),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::parse_with_alias(value).map(|(kind, _)| kind)
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for CustomerType {
    fn from(value: &str) -> Self {
        CustomerType::parse(value).unwrap_or_default()
    }
}

impl From<CustomerType> for &'static str {
    fn from(value: CustomerType) -> Self {
        value.as_str()
    }
}

/// Postal address printed on invoices and used for route planning.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Address {
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub address_line3: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
}

/// Last geolocation fix captured at the customer's premises.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Domain representation of a customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: i32,
    pub customer_code: String,
    pub customer_name: String,
    pub contact_person: Option<String>,
    pub mobile_no: String,
    pub email: Option<String>,
    pub gstin: Option<String>,
    pub pan_no: Option<String>,
    pub owner_name: Option<String>,
    pub customer_type: CustomerType,
    pub credit_limit: f64,
    pub credit_days: i32,
    pub address: Address,
    pub location: Option<GeoPoint>,
    pub is_active: bool,
    /// Users responsible for the customer.
    pub assigned_user_ids: Vec<i32>,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new customer.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub customer_code: String,
    pub customer_name: String,
    pub contact_person: Option<String>,
    pub mobile_no: String,
    pub email: Option<String>,
    pub gstin: Option<String>,
    pub pan_no: Option<String>,
    pub owner_name: Option<String>,
    pub customer_type: CustomerType,
    pub credit_limit: f64,
    pub credit_days: i32,
    pub address: Address,
    pub assigned_user_ids: Vec<i32>,
    pub created_by: Option<i32>,
}

impl NewCustomer {
    /// Build a retail customer with no credit terms.
    #[must_use]
    pub fn new(
        customer_code: impl Into<String>,
        customer_name: impl Into<String>,
        mobile_no: impl Into<String>,
    ) -> Self {
        Self {
            customer_code: customer_code.into(),
            customer_name: customer_name.into(),
            contact_person: None,
            mobile_no: mobile_no.into(),
            email: None,
            gstin: None,
            pan_no: None,
            owner_name: None,
            customer_type: CustomerType::default(),
            credit_limit: 0.0,
            credit_days: 0,
            address: Address::default(),
            assigned_user_ids: Vec::new(),
            created_by: None,
        }
    }

    #[must_use]
    pub fn with_customer_type(mut self, customer_type: CustomerType) -> Self {
        self.customer_type = customer_type;
        self
    }

    #[must_use]
    pub fn with_credit(mut self, credit_limit: f64, credit_days: i32) -> Self {
        self.credit_limit = credit_limit;
        self.credit_days = credit_days;
        self
    }

    #[must_use]
    pub fn with_assigned_users(mut self, user_ids: Vec<i32>) -> Self {
        self.assigned_user_ids = user_ids;
        self
    }

    #[must_use]
    pub fn created_by(mut self, user_id: i32) -> Self {
        self.created_by = Some(user_id);
        self
    }
}

/// Full replacement of the editable customer fields. The code is immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCustomer {
    pub customer_name: String,
    pub contact_person: Option<String>,
    pub mobile_no: String,
    pub email: Option<String>,
    pub gstin: Option<String>,
    pub pan_no: Option<String>,
    pub owner_name: Option<String>,
    pub customer_type: CustomerType,
    pub credit_limit: f64,
    pub credit_days: i32,
    pub address: Address,
    pub is_active: bool,
    /// `Some` replaces the assignment set, `None` keeps it.
    pub assigned_user_ids: Option<Vec<i32>>,
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list customers.
#[derive(Debug, Clone, Default)]
pub struct CustomerListQuery {
    /// Matches code, name, mobile number or city.
    pub search: Option<String>,
    pub customer_type: Option<CustomerType>,
    pub active_only: bool,
    /// Restrict to customers assigned to this user.
    pub assigned_to: Option<i32>,
    pub pagination: Option<Pagination>,
}

impl CustomerListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn customer_type(mut self, customer_type: CustomerType) -> Self {
        self.customer_type = Some(customer_type);
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    pub fn assigned_to(mut self, user_id: i32) -> Self {
        self.assigned_to = Some(user_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wholesale_is_read_as_dealer() {
        assert_eq!(
            CustomerType::parse_with_alias("Wholesale"),
            Some((CustomerType::Dealer, true))
        );
        assert_eq!(
            CustomerType::parse_with_alias("dealer"),
            Some((CustomerType::Dealer, false))
        );
        assert_eq!(CustomerType::parse("unknown"), None);
    }

    #[test]
    fn serde_accepts_alias_but_writes_dealer() {
        let parsed: CustomerType = serde_json::from_str("\"wholesale\"").expect("alias parses");
        assert_eq!(parsed, CustomerType::Dealer);

        let written = serde_json::to_string(&parsed).expect("serialize");
        assert_eq!(written, "\"dealer\"");
    }
}
