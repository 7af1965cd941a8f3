use chrono::NaiveDate;
use mockall::mock;

use super::{
    BeatPlanReader, BeatPlanWriter, CallLogReader, CallLogWriter, CollectionReader,
    CollectionWriter, CustomerReader, CustomerWriter, FollowUpReader, FollowUpWriter, LeadReader,
    LeadWriter, LocationReader, LocationWriter, OrderReader, OrderWriter, PriceListReader,
    PriceListWriter, ProductReader, ProductWriter, RepositoryResult, RouteReader, RouteWriter,
    UserReader, UserWriter,
};
use crate::domain::{
    beat_plan::{BeatPlan, BeatPlanDetail, NewBeatPlan, UpdateBeatPlan},
    call_log::{CallDetails, CallLog, CallLogListQuery, NewCallLog},
    collection::{
        Collection, CollectionListQuery, CollectionStatus, CollectionSummary, NewCollection,
    },
    customer::{Customer, CustomerListQuery, CustomerType, GeoPoint, NewCustomer, UpdateCustomer},
    follow_up::{FollowUp, FollowUpDetails, FollowUpListQuery, NewFollowUp},
    lead::{Lead, LeadListQuery, NewLead},
    location::{LatestUserLocation, NewUserLocation, UserLocation},
    order::{NewOrder, Order, OrderDetail, OrderListQuery, OrderStatus, OrderSummary},
    price_list::{
        NewPriceListEntry, PriceListEntry, PriceListQuery, PriceListRow, UpdatePriceListEntry,
    },
    product::{NewProduct, Product, ProductListQuery, UpdateProduct},
    route::{
        NewRoute, NewRouteCustomer, Route, RouteCustomer, RouteCustomerDetail, RouteListQuery,
        UpdateRoute,
    },
    user::{NewUser, UpdateUser, User, UserCredentials, UserListQuery},
};

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_credentials_by_mobile(&self, mobile_no: &str) -> RepositoryResult<Option<UserCredentials>>;
        fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
        fn count_users(&self) -> RepositoryResult<usize>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_user(&self, user_id: i32, updates: &UpdateUser) -> RepositoryResult<User>;
    }

    impl CustomerReader for Repository {
        fn get_customer_by_id(&self, id: i32) -> RepositoryResult<Option<Customer>>;
        fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
    }

    impl CustomerWriter for Repository {
        fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
        fn create_customers(&self, new_customers: &[NewCustomer]) -> RepositoryResult<usize>;
        fn update_customer(&self, customer_id: i32, updates: &UpdateCustomer) -> RepositoryResult<Customer>;
        fn set_customer_location(&self, customer_id: i32, location: GeoPoint) -> RepositoryResult<Customer>;
    }

    impl ProductReader for Repository {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
        fn get_products_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Product>>;
        fn get_products_by_codes(&self, codes: &[String]) -> RepositoryResult<Vec<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    }

    impl ProductWriter for Repository {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
        fn update_product(&self, product_id: i32, updates: &UpdateProduct) -> RepositoryResult<Product>;
    }

    impl PriceListReader for Repository {
        fn get_price_entry(&self, id: i32) -> RepositoryResult<Option<PriceListEntry>>;
        fn list_price_entries(&self, query: PriceListQuery) -> RepositoryResult<(usize, Vec<PriceListRow>)>;
        fn resolve_price(
            &self,
            product_id: i32,
            customer_type: CustomerType,
            on_date: NaiveDate,
        ) -> RepositoryResult<Option<PriceListEntry>>;
        fn resolve_prices(
            &self,
            product_ids: &[i32],
            customer_type: CustomerType,
            on_date: NaiveDate,
        ) -> RepositoryResult<Vec<PriceListEntry>>;
    }

    impl PriceListWriter for Repository {
        fn create_price_entry(&self, entry: &NewPriceListEntry) -> RepositoryResult<PriceListEntry>;
        fn create_price_entries(&self, entries: &[NewPriceListEntry]) -> RepositoryResult<usize>;
        fn update_price_entry(
            &self,
            entry_id: i32,
            updates: &UpdatePriceListEntry,
        ) -> RepositoryResult<PriceListEntry>;
    }

    impl OrderReader for Repository {
        fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<OrderDetail>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<OrderSummary>)>;
    }

    impl OrderWriter for Repository {
        fn create_order(&self, new_order: &NewOrder) -> RepositoryResult<OrderDetail>;
        fn update_order_status(&self, order_id: i32, status: OrderStatus) -> RepositoryResult<Order>;
    }

    impl CollectionReader for Repository {
        fn get_collection_by_id(&self, id: i32) -> RepositoryResult<Option<Collection>>;
        fn list_collections(
            &self,
            query: CollectionListQuery,
        ) -> RepositoryResult<(usize, Vec<CollectionSummary>)>;
    }

    impl CollectionWriter for Repository {
        fn create_collection(&self, new_collection: &NewCollection) -> RepositoryResult<Collection>;
        fn update_collection_status(
            &self,
            collection_id: i32,
            status: CollectionStatus,
        ) -> RepositoryResult<Collection>;
    }

    impl RouteReader for Repository {
        fn get_route_by_id(&self, id: i32) -> RepositoryResult<Option<Route>>;
        fn list_routes(&self, query: RouteListQuery) -> RepositoryResult<(usize, Vec<Route>)>;
        fn get_route_customer(&self, mapping_id: i32) -> RepositoryResult<Option<RouteCustomer>>;
        fn list_route_customers(&self, route_id: i32) -> RepositoryResult<Vec<RouteCustomerDetail>>;
    }

    impl RouteWriter for Repository {
        fn create_route(&self, new_route: &NewRoute) -> RepositoryResult<Route>;
        fn update_route(&self, route_id: i32, updates: &UpdateRoute) -> RepositoryResult<Route>;
        fn add_route_customer(&self, mapping: &NewRouteCustomer) -> RepositoryResult<RouteCustomer>;
        fn update_visit_sequence(&self, mapping_id: i32, visit_sequence: i32) -> RepositoryResult<RouteCustomer>;
        fn remove_route_customer(&self, mapping_id: i32) -> RepositoryResult<()>;
    }

    impl BeatPlanReader for Repository {
        fn get_beat_plan(&self, id: i32) -> RepositoryResult<Option<BeatPlan>>;
        fn list_beat_plans(&self, user_id: Option<i32>) -> RepositoryResult<Vec<BeatPlanDetail>>;
        fn list_active_beat_plans_for_user(&self, user_id: i32) -> RepositoryResult<Vec<BeatPlan>>;
    }

    impl BeatPlanWriter for Repository {
        fn create_beat_plan(&self, plan: &NewBeatPlan) -> RepositoryResult<BeatPlan>;
        fn update_beat_plan(&self, plan_id: i32, updates: &UpdateBeatPlan) -> RepositoryResult<BeatPlan>;
        fn delete_beat_plan(&self, plan_id: i32) -> RepositoryResult<()>;
    }

    impl CallLogReader for Repository {
        fn get_call_log(&self, id: i32) -> RepositoryResult<Option<CallLog>>;
        fn list_call_logs(&self, query: CallLogListQuery) -> RepositoryResult<(usize, Vec<CallLog>)>;
    }

    impl CallLogWriter for Repository {
        fn create_call_log(&self, call: &NewCallLog) -> RepositoryResult<CallLog>;
        fn update_call_log(&self, call_id: i32, details: &CallDetails) -> RepositoryResult<CallLog>;
    }

    impl FollowUpReader for Repository {
        fn get_follow_up(&self, id: i32) -> RepositoryResult<Option<FollowUp>>;
        fn list_follow_ups(&self, query: FollowUpListQuery) -> RepositoryResult<(usize, Vec<FollowUp>)>;
    }

    impl FollowUpWriter for Repository {
        fn create_follow_up(&self, follow_up: &NewFollowUp) -> RepositoryResult<FollowUp>;
        fn update_follow_up(&self, follow_up_id: i32, details: &FollowUpDetails) -> RepositoryResult<FollowUp>;
    }

    impl LeadReader for Repository {
        fn get_lead(&self, id: i32) -> RepositoryResult<Option<Lead>>;
        fn list_leads(&self, query: LeadListQuery) -> RepositoryResult<(usize, Vec<Lead>)>;
    }

    impl LeadWriter for Repository {
        fn create_lead(&self, lead: &NewLead) -> RepositoryResult<Lead>;
    }

    impl LocationReader for Repository {
        fn latest_locations(&self) -> RepositoryResult<Vec<LatestUserLocation>>;
        fn list_user_locations(&self, user_id: i32, limit: i64) -> RepositoryResult<Vec<UserLocation>>;
    }

    impl LocationWriter for Repository {
        fn record_location(&self, location: &NewUserLocation) -> RepositoryResult<UserLocation>;
    }
}
