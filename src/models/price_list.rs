use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::price_list::{
    NewPriceListEntry as DomainNewEntry, PriceListEntry as DomainEntry,
    UpdatePriceListEntry as DomainUpdateEntry,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::product_prices)]
#[diesel(belongs_to(super::product::Product, foreign_key = product_id))]
pub struct ProductPrice {
    pub id: i32,
    pub product_id: i32,
    pub customer_type: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_prices)]
pub struct NewProductPrice<'a> {
    pub product_id: i32,
    pub customer_type: &'a str,
    pub price: f64,
    pub discount_percentage: f64,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::product_prices)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProductPrice {
    pub price: f64,
    pub discount_percentage: f64,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl From<ProductPrice> for DomainEntry {
    fn from(value: ProductPrice) -> Self {
        Self {
            id: value.id,
            product_id: value.product_id,
            customer_type: value.customer_type.as_str().into(),
            price: value.price,
            discount_percentage: value.discount_percentage,
            effective_from: value.effective_from,
            effective_to: value.effective_to,
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewEntry> for NewProductPrice<'a> {
    fn from(value: &'a DomainNewEntry) -> Self {
        Self {
            product_id: value.product_id,
            customer_type: value.customer_type.into(),
            price: value.price,
            discount_percentage: value.discount_percentage,
            effective_from: value.effective_from,
            effective_to: value.effective_to,
        }
    }
}

impl From<&DomainUpdateEntry> for UpdateProductPrice {
    fn from(value: &DomainUpdateEntry) -> Self {
        Self {
            price: value.price,
            discount_percentage: value.discount_percentage,
            effective_from: value.effective_from,
            effective_to: value.effective_to,
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}
