use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::route::{
    NewRoute as DomainNewRoute, Route as DomainRoute, RouteCustomer as DomainRouteCustomer,
    UpdateRoute as DomainUpdateRoute,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::routes)]
pub struct Route {
    pub id: i32,
    pub route_code: String,
    pub route_name: String,
    pub route_description: Option<String>,
    pub is_active: bool,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::routes)]
pub struct NewRoute<'a> {
    pub route_code: &'a str,
    pub route_name: &'a str,
    pub route_description: Option<&'a str>,
    pub created_by: Option<i32>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::routes)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateRoute<'a> {
    pub route_name: &'a str,
    pub route_description: Option<&'a str>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::route_customers)]
#[diesel(belongs_to(Route, foreign_key = route_id))]
pub struct RouteCustomer {
    pub id: i32,
    pub route_id: i32,
    pub customer_id: i32,
    pub visit_sequence: i32,
    pub is_active: bool,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::route_customers)]
pub struct NewRouteCustomer {
    pub route_id: i32,
    pub customer_id: i32,
    pub visit_sequence: i32,
    pub created_by: Option<i32>,
}

impl From<Route> for DomainRoute {
    fn from(value: Route) -> Self {
        Self {
            id: value.id,
            route_code: value.route_code,
            route_name: value.route_name,
            route_description: value.route_description,
            is_active: value.is_active,
            created_by: value.created_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<RouteCustomer> for DomainRouteCustomer {
    fn from(value: RouteCustomer) -> Self {
        Self {
            id: value.id,
            route_id: value.route_id,
            customer_id: value.customer_id,
            visit_sequence: value.visit_sequence,
            is_active: value.is_active,
            created_by: value.created_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewRoute> for NewRoute<'a> {
    fn from(value: &'a DomainNewRoute) -> Self {
        Self {
            route_code: value.route_code.as_str(),
            route_name: value.route_name.as_str(),
            route_description: value.route_description.as_deref(),
            created_by: value.created_by,
        }
    }
}

impl<'a> From<&'a DomainUpdateRoute> for UpdateRoute<'a> {
    fn from(value: &'a DomainUpdateRoute) -> Self {
        Self {
            route_name: value.route_name.as_str(),
            route_description: value.route_description.as_deref(),
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}
