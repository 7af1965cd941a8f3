use diesel::dsl::max;
use diesel::prelude::*;

use crate::{
    domain::route::{
        NewRoute as DomainNewRoute, NewRouteCustomer as DomainNewRouteCustomer,
        Route as DomainRoute, RouteCustomer as DomainRouteCustomer, RouteCustomerDetail,
        RouteListQuery, UpdateRoute as DomainUpdateRoute,
    },
    models::route::{
        NewRoute as DbNewRoute, NewRouteCustomer as DbNewRouteCustomer, Route as DbRoute,
        RouteCustomer as DbRouteCustomer, UpdateRoute as DbUpdateRoute,
    },
    repository::{
        DieselRepository, RepositoryError, RepositoryResult, RouteReader, RouteWriter,
        like_pattern, page_window,
    },
    schema::{customers, route_customers, routes},
};

fn filtered_routes(query: &RouteListQuery) -> routes::BoxedQuery<'static, diesel::sqlite::Sqlite> {
    let mut items = routes::table.into_boxed::<diesel::sqlite::Sqlite>();

    if let Some(term) = query.search.as_deref() {
        let pattern = like_pattern(term);
        items = items.filter(
            routes::route_code
                .like(pattern.clone())
                .or(routes::route_name.like(pattern)),
        );
    }

    if query.active_only {
        items = items.filter(routes::is_active.eq(true));
    }

    items
}

impl RouteReader for DieselRepository {
    fn get_route_by_id(&self, id: i32) -> RepositoryResult<Option<DomainRoute>> {
        let mut conn = self.conn()?;
        let route = routes::table
            .filter(routes::id.eq(id))
            .first::<DbRoute>(&mut conn)
            .optional()?;

        Ok(route.map(Into::into))
    }

    fn list_routes(&self, query: RouteListQuery) -> RepositoryResult<(usize, Vec<DomainRoute>)> {
        let mut conn = self.conn()?;

        let total = filtered_routes(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_routes(&query).order(routes::route_code.asc());

        if let Some((offset, limit)) = page_window(query.pagination.as_ref()) {
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbRoute>(&mut conn)?;

        Ok((total, rows.into_iter().map(Into::into).collect()))
    }

    fn get_route_customer(&self, mapping_id: i32) -> RepositoryResult<Option<DomainRouteCustomer>> {
        let mut conn = self.conn()?;
        let mapping = route_customers::table
            .filter(route_customers::id.eq(mapping_id))
            .first::<DbRouteCustomer>(&mut conn)
            .optional()?;

        Ok(mapping.map(Into::into))
    }

    fn list_route_customers(&self, route_id: i32) -> RepositoryResult<Vec<RouteCustomerDetail>> {
        let mut conn = self.conn()?;

        let rows = route_customers::table
            .inner_join(customers::table)
            .filter(route_customers::route_id.eq(route_id))
            .order((route_customers::visit_sequence.asc(), route_customers::id.asc()))
            .select((
                DbRouteCustomer::as_select(),
                customers::customer_code,
                customers::customer_name,
                customers::city,
            ))
            .load::<(DbRouteCustomer, String, String, Option<String>)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(mapping, customer_code, customer_name, city)| RouteCustomerDetail {
                mapping: mapping.into(),
                customer_code,
                customer_name,
                city,
            })
            .collect())
    }
}

impl RouteWriter for DieselRepository {
    fn create_route(&self, new_route: &DomainNewRoute) -> RepositoryResult<DomainRoute> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(routes::table)
            .values(&DbNewRoute::from(new_route))
            .get_result::<DbRoute>(&mut conn)?;

        Ok(created.into())
    }

    fn update_route(
        &self,
        route_id: i32,
        updates: &DomainUpdateRoute,
    ) -> RepositoryResult<DomainRoute> {
        let mut conn = self.conn()?;

        let updated = diesel::update(routes::table.filter(routes::id.eq(route_id)))
            .set(&DbUpdateRoute::from(updates))
            .get_result::<DbRoute>(&mut conn)?;

        Ok(updated.into())
    }

    fn add_route_customer(
        &self,
        mapping: &DomainNewRouteCustomer,
    ) -> RepositoryResult<DomainRouteCustomer> {
        let mut conn = self.conn()?;

        // IMMEDIATE takes the write lock up front so two sessions cannot read
        // the same maximum sequence.
        conn.immediate_transaction::<DomainRouteCustomer, RepositoryError, _>(|conn| {
            let already_mapped = route_customers::table
                .filter(route_customers::route_id.eq(mapping.route_id))
                .filter(route_customers::customer_id.eq(mapping.customer_id))
                .count()
                .get_result::<i64>(conn)?;

            if already_mapped > 0 {
                return Err(RepositoryError::Conflict(format!(
                    "customer {} is already on route {}",
                    mapping.customer_id, mapping.route_id
                )));
            }

            let current_max = route_customers::table
                .filter(route_customers::route_id.eq(mapping.route_id))
                .select(max(route_customers::visit_sequence))
                .first::<Option<i32>>(conn)?;

            let created = diesel::insert_into(route_customers::table)
                .values(&DbNewRouteCustomer {
                    route_id: mapping.route_id,
                    customer_id: mapping.customer_id,
                    visit_sequence: current_max.unwrap_or(0) + 1,
                    created_by: mapping.created_by,
                })
                .get_result::<DbRouteCustomer>(conn)?;

            Ok(created.into())
        })
    }

    fn update_visit_sequence(
        &self,
        mapping_id: i32,
        visit_sequence: i32,
    ) -> RepositoryResult<DomainRouteCustomer> {
        let mut conn = self.conn()?;

        let updated =
            diesel::update(route_customers::table.filter(route_customers::id.eq(mapping_id)))
            .set((
                route_customers::visit_sequence.eq(visit_sequence),
                route_customers::updated_at.eq(chrono::Local::now().naive_utc()),
            ))
            .get_result::<DbRouteCustomer>(&mut conn)?;

        Ok(updated.into())
    }

    fn remove_route_customer(&self, mapping_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted =
            diesel::delete(route_customers::table.filter(route_customers::id.eq(mapping_id)))
                .execute(&mut conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
