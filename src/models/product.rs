use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub product_code: String,
    pub product_name: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub unit_of_measure: String,
    pub hsn_code: Option<String>,
    pub gst_rate: f64,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub product_code: &'a str,
    pub product_name: &'a str,
    pub category: Option<&'a str>,
    pub subcategory: Option<&'a str>,
    pub unit_of_measure: &'a str,
    pub hsn_code: Option<&'a str>,
    pub gst_rate: f64,
    pub description: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProduct<'a> {
    pub product_name: &'a str,
    pub category: Option<&'a str>,
    pub subcategory: Option<&'a str>,
    pub unit_of_measure: &'a str,
    pub hsn_code: Option<&'a str>,
    pub gst_rate: f64,
    pub description: Option<&'a str>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            product_code: value.product_code,
            product_name: value.product_name,
            category: value.category,
            subcategory: value.subcategory,
            unit_of_measure: value.unit_of_measure,
            hsn_code: value.hsn_code,
            gst_rate: value.gst_rate,
            description: value.description,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            product_code: value.product_code.as_str(),
            product_name: value.product_name.as_str(),
            category: value.category.as_deref(),
            subcategory: value.subcategory.as_deref(),
            unit_of_measure: value.unit_of_measure.as_str(),
            hsn_code: value.hsn_code.as_deref(),
            gst_rate: value.gst_rate,
            description: value.description.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        Self {
            product_name: value.product_name.as_str(),
            category: value.category.as_deref(),
            subcategory: value.subcategory.as_deref(),
            unit_of_measure: value.unit_of_measure.as_str(),
            hsn_code: value.hsn_code.as_deref(),
            gst_rate: value.gst_rate,
            description: value.description.as_deref(),
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}
