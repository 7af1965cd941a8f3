use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::collection::{
    Collection as DomainCollection, NewCollection as DomainNewCollection,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::collections)]
pub struct Collection {
    pub id: i32,
    pub collection_no: String,
    pub customer_id: i32,
    pub order_id: Option<i32>,
    pub collection_date: NaiveDate,
    pub amount: f64,
    pub payment_mode: String,
    pub payment_reference: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub collected_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::collections)]
pub struct NewCollection<'a> {
    pub collection_no: &'a str,
    pub customer_id: i32,
    pub order_id: Option<i32>,
    pub collection_date: NaiveDate,
    pub amount: f64,
    pub payment_mode: &'a str,
    pub payment_reference: Option<&'a str>,
    pub status: &'a str,
    pub notes: Option<&'a str>,
    pub collected_by: Option<i32>,
}

impl From<Collection> for DomainCollection {
    fn from(value: Collection) -> Self {
        Self {
            id: value.id,
            collection_no: value.collection_no,
            customer_id: value.customer_id,
            order_id: value.order_id,
            collection_date: value.collection_date,
            amount: value.amount,
            payment_mode: value.payment_mode.as_str().into(),
            payment_reference: value.payment_reference,
            status: value.status.as_str().into(),
            notes: value.notes,
            collected_by: value.collected_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewCollection> for NewCollection<'a> {
    fn from(value: &'a DomainNewCollection) -> Self {
        Self {
            collection_no: value.collection_no.as_str(),
            customer_id: value.customer_id,
            order_id: value.order_id,
            collection_date: value.collection_date,
            amount: value.amount,
            payment_mode: value.payment_mode.into(),
            payment_reference: value.payment_reference.as_deref(),
            status: value.status.into(),
            notes: value.notes.as_deref(),
            collected_by: value.collected_by,
        }
    }
}
