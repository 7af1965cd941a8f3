use std::collections::HashMap;

use diesel::prelude::*;

use crate::{
    domain::customer::{
        Customer as DomainCustomer, CustomerListQuery, GeoPoint, NewCustomer as DomainNewCustomer,
        UpdateCustomer as DomainUpdateCustomer,
    },
    models::customer::{
        Customer as DbCustomer, CustomerAssignment, NewCustomer as DbNewCustomer,
        NewCustomerAssignment, UpdateCustomer as DbUpdateCustomer,
    },
    repository::{
        CustomerReader, CustomerWriter, DieselRepository, RepositoryError, RepositoryResult,
        like_pattern, page_window,
    },
    schema::{customer_user_assignments, customers},
};

type BoxedCustomers<'a> = customers::BoxedQuery<'a, diesel::sqlite::Sqlite>;

fn filtered_customers(query: &CustomerListQuery) -> BoxedCustomers<'static> {
    let mut items = customers::table.into_boxed::<diesel::sqlite::Sqlite>();

    if let Some(term) = query.search.as_deref() {
        let pattern = like_pattern(term);
        items = items.filter(
            customers::customer_code
                .like(pattern.clone())
                .or(customers::customer_name.like(pattern.clone()))
                .or(customers::mobile_no.like(pattern.clone()))
                .or(customers::city.like(pattern)),
        );
    }

    if let Some(customer_type) = query.customer_type {
        items = items.filter(customers::customer_type.eq(customer_type.as_str()));
    }

    if query.active_only {
        items = items.filter(customers::is_active.eq(true));
    }

    if let Some(user_id) = query.assigned_to {
        items = items.filter(
            customers::id.eq_any(
                customer_user_assignments::table
                    .filter(customer_user_assignments::user_id.eq(user_id))
                    .select(customer_user_assignments::customer_id),
            ),
        );
    }

    items
}

fn load_assignments(
    conn: &mut SqliteConnection,
    customer_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<i32>>> {
    let rows = customer_user_assignments::table
        .filter(customer_user_assignments::customer_id.eq_any(customer_ids))
        .order(customer_user_assignments::user_id.asc())
        .load::<CustomerAssignment>(conn)?;

    let mut by_customer: HashMap<i32, Vec<i32>> = HashMap::new();
    for row in rows {
        by_customer.entry(row.customer_id).or_default().push(row.user_id);
    }
    Ok(by_customer)
}

fn replace_assignments(
    conn: &mut SqliteConnection,
    customer_id: i32,
    user_ids: &[i32],
) -> RepositoryResult<()> {
    diesel::delete(
        customer_user_assignments::table
            .filter(customer_user_assignments::customer_id.eq(customer_id)),
    )
    .execute(conn)?;

    let mut unique = user_ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    if unique.is_empty() {
        return Ok(());
    }

    let payload: Vec<NewCustomerAssignment> = unique
        .into_iter()
        .map(|user_id| NewCustomerAssignment {
            customer_id,
            user_id,
        })
        .collect();

    diesel::insert_into(customer_user_assignments::table)
        .values(&payload)
        .execute(conn)?;

    Ok(())
}

fn load_customer(
    conn: &mut SqliteConnection,
    customer_id: i32,
) -> RepositoryResult<DomainCustomer> {
    let customer = customers::table
        .filter(customers::id.eq(customer_id))
        .first::<DbCustomer>(conn)?;
    let mut assignments = load_assignments(conn, &[customer_id])?;
    let assigned = assignments.remove(&customer_id).unwrap_or_default();
    Ok(customer.into_domain(assigned))
}

fn insert_customer(
    conn: &mut SqliteConnection,
    new_customer: &DomainNewCustomer,
) -> RepositoryResult<DbCustomer> {
    let created = diesel::insert_into(customers::table)
        .values(&DbNewCustomer::from(new_customer))
        .get_result::<DbCustomer>(conn)?;

    replace_assignments(conn, created.id, &new_customer.assigned_user_ids)?;
    Ok(created)
}

impl CustomerReader for DieselRepository {
    fn get_customer_by_id(&self, id: i32) -> RepositoryResult<Option<DomainCustomer>> {
        let mut conn = self.conn()?;
        match load_customer(&mut conn, id) {
            Ok(customer) => Ok(Some(customer)),
            Err(RepositoryError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn list_customers(
        &self,
        query: CustomerListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainCustomer>)> {
        let mut conn = self.conn()?;

        let total = filtered_customers(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_customers(&query).order(customers::customer_name.asc());

        if let Some((offset, limit)) = page_window(query.pagination.as_ref()) {
            items = items.offset(offset).limit(limit);
        }

        let db_customers = items.load::<DbCustomer>(&mut conn)?;

        if db_customers.is_empty() {
            return Ok((total, Vec::new()));
        }

        let ids: Vec<i32> = db_customers.iter().map(|customer| customer.id).collect();
        let mut assignments = load_assignments(&mut conn, &ids)?;

        let customers = db_customers
            .into_iter()
            .map(|customer| {
                let assigned = assignments.remove(&customer.id).unwrap_or_default();
                customer.into_domain(assigned)
            })
            .collect();

        Ok((total, customers))
    }
}

impl CustomerWriter for DieselRepository {
    fn create_customer(
        &self,
        new_customer: &DomainNewCustomer,
    ) -> RepositoryResult<DomainCustomer> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainCustomer, RepositoryError, _>(|conn| {
            let created = insert_customer(conn, new_customer)?;
            load_customer(conn, created.id)
        })
    }

    fn create_customers(&self, new_customers: &[DomainNewCustomer]) -> RepositoryResult<usize> {
        if new_customers.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            for new_customer in new_customers {
                insert_customer(conn, new_customer)?;
            }
            Ok(new_customers.len())
        })
    }

    fn update_customer(
        &self,
        customer_id: i32,
        updates: &DomainUpdateCustomer,
    ) -> RepositoryResult<DomainCustomer> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainCustomer, RepositoryError, _>(|conn| {
            let updated = diesel::update(customers::table.filter(customers::id.eq(customer_id)))
                .set(&DbUpdateCustomer::from(updates))
                .execute(conn)?;

            if updated == 0 {
                return Err(RepositoryError::NotFound);
            }

            if let Some(user_ids) = updates.assigned_user_ids.as_ref() {
                replace_assignments(conn, customer_id, user_ids)?;
            }

            load_customer(conn, customer_id)
        })
    }

    fn set_customer_location(
        &self,
        customer_id: i32,
        location: GeoPoint,
    ) -> RepositoryResult<DomainCustomer> {
        let mut conn = self.conn()?;

        let updated = diesel::update(customers::table.filter(customers::id.eq(customer_id)))
            .set((
                customers::latitude.eq(Some(location.latitude)),
                customers::longitude.eq(Some(location.longitude)),
                customers::updated_at.eq(chrono::Local::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        if updated == 0 {
            return Err(RepositoryError::NotFound);
        }

        load_customer(&mut conn, customer_id)
    }
}
