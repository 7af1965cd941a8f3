use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::user::{
    NewUser as DomainNewUser, UpdateUser as DomainUpdateUser, User as DomainUser,
    UserCredentials,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: i32,
    pub mobile_no: String,
    pub full_name: String,
    pub email: Option<String>,
    pub role: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub mobile_no: &'a str,
    pub full_name: &'a str,
    pub email: Option<&'a str>,
    pub role: &'a str,
    pub password_hash: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUser<'a> {
    pub full_name: Option<&'a str>,
    pub email: Option<Option<&'a str>>,
    pub role: Option<&'a str>,
    pub is_active: Option<bool>,
    pub password_hash: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<User> for DomainUser {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            mobile_no: value.mobile_no,
            full_name: value.full_name,
            email: value.email,
            role: value.role.as_str().into(),
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<User> for UserCredentials {
    fn from(mut value: User) -> Self {
        let password_hash = std::mem::take(&mut value.password_hash);
        Self {
            user: value.into(),
            password_hash,
        }
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(value: &'a DomainNewUser) -> Self {
        Self {
            mobile_no: value.mobile_no.as_str(),
            full_name: value.full_name.as_str(),
            email: value.email.as_deref(),
            role: value.role.into(),
            password_hash: value.password_hash.as_str(),
        }
    }
}

impl<'a> From<&'a DomainUpdateUser> for UpdateUser<'a> {
    fn from(value: &'a DomainUpdateUser) -> Self {
        Self {
            full_name: value.full_name.as_deref(),
            email: value.email.as_ref().map(|email| email.as_deref()),
            role: value.role.map(Into::into),
            is_active: value.is_active,
            password_hash: value.password_hash.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
