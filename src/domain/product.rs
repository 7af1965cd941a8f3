use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// Unit of measure applied when none is supplied.
pub const DEFAULT_UNIT_OF_MEASURE: &str = "pcs";

/// Domain representation of a sellable product.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    pub id: i32,
    pub product_code: String,
    pub product_name: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub unit_of_measure: String,
    pub hsn_code: Option<String>,
    /// GST rate as a percentage, used as the default line tax.
    pub gst_rate: f64,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub product_code: String,
    pub product_name: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub unit_of_measure: String,
    pub hsn_code: Option<String>,
    pub gst_rate: f64,
    pub description: Option<String>,
}

impl NewProduct {
    /// Build a product payload with the default unit and no tax.
    pub fn new(product_code: impl Into<String>, product_name: impl Into<String>) -> Self {
        Self {
            product_code: product_code.into(),
            product_name: product_name.into(),
            category: None,
            subcategory: None,
            unit_of_measure: DEFAULT_UNIT_OF_MEASURE.to_string(),
            hsn_code: None,
            gst_rate: 0.0,
            description: None,
        }
    }

    pub fn with_gst_rate(mut self, gst_rate: f64) -> Self {
        self.gst_rate = gst_rate;
        self
    }

    pub fn with_unit_of_measure(mut self, unit: impl Into<String>) -> Self {
        self.unit_of_measure = unit.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Full replacement of the editable product fields. The code is immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProduct {
    pub product_name: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub unit_of_measure: String,
    pub hsn_code: Option<String>,
    pub gst_rate: f64,
    pub description: Option<String>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Matches code or name.
    pub search: Option<String>,
    pub category: Option<String>,
    pub include_inactive: bool,
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn include_inactive(mut self) -> Self {
        self.include_inactive = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
