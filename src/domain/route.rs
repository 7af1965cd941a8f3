use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
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

#[derive(Debug, Clone, PartialEq)]
pub struct NewRoute {
    pub route_code: String,
    pub route_name: String,
    pub route_description: Option<String>,
    pub created_by: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRoute {
    pub route_name: String,
    pub route_description: Option<String>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct RouteListQuery {
    pub search: Option<String>,
    pub active_only: bool,
    pub pagination: Option<Pagination>,
}

impl RouteListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Customer placed on a route at a visit position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteCustomer {
    pub id: i32,
    pub route_id: i32,
    pub customer_id: i32,
    /// 1-based. Not guaranteed unique after manual edits.
    pub visit_sequence: i32,
    pub is_active: bool,
    pub created_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Mapping joined with the customer fields shown in route lists.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteCustomerDetail {
    #[serde(flatten)]
    pub mapping: RouteCustomer,
    pub customer_code: String,
    pub customer_name: String,
    pub city: Option<String>,
}

/// Request to append a customer to a route. The sequence is assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRouteCustomer {
    pub route_id: i32,
    pub customer_id: i32,
    pub created_by: Option<i32>,
}
