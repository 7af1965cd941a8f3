//! Storage contract of the service and its diesel implementation.
//!
//! Each entity gets a `*Reader` and a `*Writer` trait. Services depend on
//! the traits only, so they can be exercised against the mocks in
//! [`mock`] without a database.

use chrono::NaiveDate;

use crate::db::{DbConnection, DbPool};
use crate::domain::beat_plan::{BeatPlan, BeatPlanDetail, NewBeatPlan, UpdateBeatPlan};
use crate::domain::call_log::{CallDetails, CallLog, CallLogListQuery, NewCallLog};
use crate::domain::collection::{
    Collection, CollectionListQuery, CollectionStatus, CollectionSummary, NewCollection,
};
use crate::domain::customer::{
    Customer, CustomerListQuery, CustomerType, GeoPoint, NewCustomer, UpdateCustomer,
};
use crate::domain::follow_up::{FollowUp, FollowUpDetails, FollowUpListQuery, NewFollowUp};
use crate::domain::lead::{Lead, LeadListQuery, NewLead};
use crate::domain::location::{LatestUserLocation, NewUserLocation, UserLocation};
use crate::domain::order::{NewOrder, Order, OrderDetail, OrderListQuery, OrderStatus, OrderSummary};
use crate::domain::price_list::{
    NewPriceListEntry, PriceListEntry, PriceListQuery, PriceListRow, UpdatePriceListEntry,
};
use crate::domain::product::{NewProduct, Product, ProductListQuery, UpdateProduct};
use crate::domain::route::{
    NewRoute, NewRouteCustomer, Route, RouteCustomer, RouteCustomerDetail, RouteListQuery,
    UpdateRoute,
};
use crate::domain::user::{NewUser, UpdateUser, User, UserCredentials, UserListQuery};
use crate::pagination::Pagination;

pub use errors::{RepositoryError, RepositoryResult};

pub mod beat_plan;
pub mod collection;
pub mod customer;
pub mod errors;
pub mod location;
pub mod order;
pub mod price_list;
pub mod product;
pub mod route;
pub mod telecalling;
pub mod user;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// `LIKE` pattern matching `term` anywhere in a column.
fn like_pattern(term: &str) -> String {
    format!("%{}%", term.trim())
}

/// Offset and limit of an optional page selection.
fn page_window(pagination: Option<&Pagination>) -> Option<(i64, i64)> {
    pagination.map(|page| (page.offset(), page.limit()))
}

pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_credentials_by_mobile(
        &self,
        mobile_no: &str,
    ) -> RepositoryResult<Option<UserCredentials>>;
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    fn count_users(&self) -> RepositoryResult<usize>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_user(&self, user_id: i32, updates: &UpdateUser) -> RepositoryResult<User>;
}

pub trait CustomerReader {
    fn get_customer_by_id(&self, id: i32) -> RepositoryResult<Option<Customer>>;
    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
}

pub trait CustomerWriter {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
    /// Insert all customers in one transaction.
    fn create_customers(&self, new_customers: &[NewCustomer]) -> RepositoryResult<usize>;
    fn update_customer(
        &self,
        customer_id: i32,
        updates: &UpdateCustomer,
    ) -> RepositoryResult<Customer>;
    fn set_customer_location(
        &self,
        customer_id: i32,
        location: GeoPoint,
    ) -> RepositoryResult<Customer>;
}

pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn get_products_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Product>>;
    fn get_products_by_codes(&self, codes: &[String]) -> RepositoryResult<Vec<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}

pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
    fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
}

pub trait PriceListReader {
    fn get_price_entry(&self, id: i32) -> RepositoryResult<Option<PriceListEntry>>;
    fn list_price_entries(
        &self,
        query: PriceListQuery,
    ) -> RepositoryResult<(usize, Vec<PriceListRow>)>;
    /// Entry that prices `product_id` for `customer_type` on `on_date`.
    fn resolve_price(
        &self,
        product_id: i32,
        customer_type: CustomerType,
        on_date: NaiveDate,
    ) -> RepositoryResult<Option<PriceListEntry>>;
    /// [`PriceListReader::resolve_price`] for several products at once.
    fn resolve_prices(
        &self,
        product_ids: &[i32],
        customer_type: CustomerType,
        on_date: NaiveDate,
    ) -> RepositoryResult<Vec<PriceListEntry>>;
}

pub trait PriceListWriter {
    fn create_price_entry(&self, entry: &NewPriceListEntry) -> RepositoryResult<PriceListEntry>;
    fn create_price_entries(&self, entries: &[NewPriceListEntry]) -> RepositoryResult<usize>;
    fn update_price_entry(
        &self,
        entry_id: i32,
        updates: &UpdatePriceListEntry,
    ) -> RepositoryResult<PriceListEntry>;
}

pub trait OrderReader {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<OrderDetail>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<OrderSummary>)>;
}

pub trait OrderWriter {
    /// Write the header and all lines in one transaction.
    fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<OrderDetail>;
    fn update_order_status(&self, order_id: i32, status: OrderStatus) -> RepositoryResult<Order>;
}

pub trait CollectionReader {
    fn get_collection_by_id(&self, id: i32) -> RepositoryResult<Option<Collection>>;
    fn list_collections(
        &self,
        query: CollectionListQuery,
    ) -> RepositoryResult<(usize, Vec<CollectionSummary>)>;
}

pub trait CollectionWriter {
    fn create_collection(&self, new_collection: &NewCollection) -> RepositoryResult<Collection>;
    fn update_collection_status(
        &self,
        collection_id: i32,
        status: CollectionStatus,
    ) -> RepositoryResult<Collection>;
}

pub trait RouteReader {
    fn get_route_by_id(&self, id: i32) -> RepositoryResult<Option<Route>>;
    fn list_routes(&self, query: RouteListQuery) -> RepositoryResult<(usize, Vec<Route>)>;
    fn get_route_customer(&self, mapping_id: i32) -> RepositoryResult<Option<RouteCustomer>>;
    /// Mappings of a route ordered by visit sequence.
    fn list_route_customers(&self, route_id: i32) -> RepositoryResult<Vec<RouteCustomerDetail>>;
}

pub trait RouteWriter {
    fn create_route(&self, new_route: &NewRoute) -> RepositoryResult<Route>;
    fn update_route(&self, route_id: i32, updates: &UpdateRoute) -> RepositoryResult<Route>;
    /// Append a customer at the end of the route's visit order.
    fn add_route_customer(&self, mapping: &NewRouteCustomer) -> RepositoryResult<RouteCustomer>;
    fn update_visit_sequence(
        &self,
        mapping_id: i32,
        visit_sequence: i32,
    ) -> RepositoryResult<RouteCustomer>;
    fn remove_route_customer(&self, mapping_id: i32) -> RepositoryResult<()>;
}

pub trait BeatPlanReader {
    fn get_beat_plan(&self, id: i32) -> RepositoryResult<Option<BeatPlan>>;
    fn list_beat_plans(&self, user_id: Option<i32>) -> RepositoryResult<Vec<BeatPlanDetail>>;
    fn list_active_beat_plans_for_user(&self, user_id: i32) -> RepositoryResult<Vec<BeatPlan>>;
}

pub trait BeatPlanWriter {
    fn create_beat_plan(&self, plan: &NewBeatPlan) -> RepositoryResult<BeatPlan>;
    fn update_beat_plan(
        &self,
        plan_id: i32,
        updates: &UpdateBeatPlan,
    ) -> RepositoryResult<BeatPlan>;
    fn delete_beat_plan(&self, plan_id: i32) -> RepositoryResult<()>;
}

pub trait CallLogReader {
    fn get_call_log(&self, id: i32) -> RepositoryResult<Option<CallLog>>;
    fn list_call_logs(&self, query: CallLogListQuery) -> RepositoryResult<(usize, Vec<CallLog>)>;
}

pub trait CallLogWriter {
    fn create_call_log(&self, call: &NewCallLog) -> RepositoryResult<CallLog>;
    fn update_call_log(&self, call_id: i32, details: &CallDetails) -> RepositoryResult<CallLog>;
}

pub trait FollowUpReader {
    fn get_follow_up(&self, id: i32) -> RepositoryResult<Option<FollowUp>>;
    fn list_follow_ups(&self, query: FollowUpListQuery) -> RepositoryResult<(usize, Vec<FollowUp>)>;
}

pub trait FollowUpWriter {
    fn create_follow_up(&self, follow_up: &NewFollowUp) -> RepositoryResult<FollowUp>;
    fn update_follow_up(
        &self,
        follow_up_id: i32,
        details: &FollowUpDetails,
    ) -> RepositoryResult<FollowUp>;
}

pub trait LeadReader {
    fn get_lead(&self, id: i32) -> RepositoryResult<Option<Lead>>;
    fn list_leads(&self, query: LeadListQuery) -> RepositoryResult<(usize, Vec<Lead>)>;
}

pub trait LeadWriter {
    fn create_lead(&self, lead: &NewLead) -> RepositoryResult<Lead>;
}

pub trait LocationReader {
    /// Most recent fix of every user that reported one.
    fn latest_locations(&self) -> RepositoryResult<Vec<LatestUserLocation>>;
    fn list_user_locations(&self, user_id: i32, limit: i64) -> RepositoryResult<Vec<UserLocation>>;
}

pub trait LocationWriter {
    fn record_location(&self, location: &NewUserLocation) -> RepositoryResult<UserLocation>;
}
