use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::customer::{
    Address, Customer as DomainCustomer, GeoPoint, NewCustomer as DomainNewCustomer,
    UpdateCustomer as DomainUpdateCustomer,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::customers)]
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
    pub customer_type: String,
    pub credit_limit: f64,
    pub credit_days: i32,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub address_line3: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: bool,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::customer_user_assignments)]
#[diesel(belongs_to(Customer, foreign_key = customer_id))]
pub struct CustomerAssignment {
    pub id: i32,
    pub customer_id: i32,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customer_user_assignments)]
pub struct NewCustomerAssignment {
    pub customer_id: i32,
    pub user_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customers)]
pub struct NewCustomer<'a> {
    pub customer_code: &'a str,
    pub customer_name: &'a str,
    pub contact_person: Option<&'a str>,
    pub mobile_no: &'a str,
    pub email: Option<&'a str>,
    pub gstin: Option<&'a str>,
    pub pan_no: Option<&'a str>,
    pub owner_name: Option<&'a str>,
    pub customer_type: &'a str,
    pub credit_limit: f64,
    pub credit_days: i32,
    pub address_line1: Option<&'a str>,
    pub address_line2: Option<&'a str>,
    pub address_line3: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub pincode: Option<&'a str>,
    pub created_by: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateCustomer<'a> {
    pub customer_name: &'a str,
    pub contact_person: Option<&'a str>,
    pub mobile_no: &'a str,
    pub email: Option<&'a str>,
    pub gstin: Option<&'a str>,
    pub pan_no: Option<&'a str>,
    pub owner_name: Option<&'a str>,
    pub customer_type: &'a str,
    pub credit_limit: f64,
    pub credit_days: i32,
    pub address_line1: Option<&'a str>,
    pub address_line2: Option<&'a str>,
    pub address_line3: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub pincode: Option<&'a str>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl Customer {
    pub fn into_domain(self, assigned_user_ids: Vec<i32>) -> DomainCustomer {
        let location = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
            }),
            _ => None,
        };

        DomainCustomer {
            id: self.id,
            customer_code: self.customer_code,
            customer_name: self.customer_name,
            contact_person: self.contact_person,
            mobile_no: self.mobile_no,
            email: self.email,
            gstin: self.gstin,
            pan_no: self.pan_no,
            owner_name: self.owner_name,
            customer_type: self.customer_type.as_str().into(),
            credit_limit: self.credit_limit,
            credit_days: self.credit_days,
            address: Address {
                address_line1: self.address_line1,
                address_line2: self.address_line2,
                address_line3: self.address_line3,
                city: self.city,
                state: self.state,
                pincode: self.pincode,
            },
            location,
            is_active: self.is_active,
            assigned_user_ids,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<(Customer, Vec<i32>)> for DomainCustomer {
    fn from(value: (Customer, Vec<i32>)) -> Self {
        value.0.into_domain(value.1)
    }
}

impl<'a> From<&'a DomainNewCustomer> for NewCustomer<'a> {
    fn from(value: &'a DomainNewCustomer) -> Self {
        Self {
            customer_code: value.customer_code.as_str(),
            customer_name: value.customer_name.as_str(),
            contact_person: value.contact_person.as_deref(),
            mobile_no: value.mobile_no.as_str(),
            email: value.email.as_deref(),
            gstin: value.gstin.as_deref(),
            pan_no: value.pan_no.as_deref(),
            owner_name: value.owner_name.as_deref(),
            customer_type: value.customer_type.into(),
            credit_limit: value.credit_limit,
            credit_days: value.credit_days,
            address_line1: value.address.address_line1.as_deref(),
            address_line2: value.address.address_line2.as_deref(),
            address_line3: value.address.address_line3.as_deref(),
            city: value.address.city.as_deref(),
            state: value.address.state.as_deref(),
            pincode: value.address.pincode.as_deref(),
            created_by: value.created_by,
        }
    }
}

impl<'a> From<&'a DomainUpdateCustomer> for UpdateCustomer<'a> {
    fn from(value: &'a DomainUpdateCustomer) -> Self {
        Self {
            customer_name: value.customer_name.as_str(),
            contact_person: value.contact_person.as_deref(),
            mobile_no: value.mobile_no.as_str(),
            email: value.email.as_deref(),
            gstin: value.gstin.as_deref(),
            pan_no: value.pan_no.as_deref(),
            owner_name: value.owner_name.as_deref(),
            customer_type: value.customer_type.into(),
            credit_limit: value.credit_limit,
            credit_days: value.credit_days,
            address_line1: value.address.address_line1.as_deref(),
            address_line2: value.address.address_line2.as_deref(),
            address_line3: value.address.address_line3.as_deref(),
            city: value.address.city.as_deref(),
            state: value.address.state.as_deref(),
            pincode: value.address.pincode.as_deref(),
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}
