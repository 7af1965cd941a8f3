use diesel::prelude::*;

use crate::{
    domain::order::{
        NewOrder as DomainNewOrder, Order as DomainOrder, OrderDetail, OrderLineDetail,
        OrderListQuery, OrderStatus, OrderSummary,
    },
    models::order::{
        NewOrder as DbNewOrder, NewOrderLine as DbNewOrderLine, Order as DbOrder,
        OrderLine as DbOrderLine,
    },
    repository::{
        DieselRepository, OrderReader, OrderWriter, RepositoryError, RepositoryResult,
        like_pattern, page_window,
    },
    schema::{customers, order_lines, orders, products, users},
};

/// Apply the list filters to a boxed query joining `orders` and `customers`.
macro_rules! filter_orders {
    ($query:expr, $filters:expr) => {{
        let filters: &OrderListQuery = $filters;
        let mut query = $query;

        if let Some(term) = filters.search.as_deref() {
            let pattern = like_pattern(term);
            query = query.filter(
                orders::order_no
                    .like(pattern.clone())
                    .or(customers::customer_code.like(pattern.clone()))
                    .or(customers::customer_name.like(pattern)),
            );
        }
        if let Some(customer_id) = filters.customer_id {
            query = query.filter(orders::customer_id.eq(customer_id));
        }
        if let Some(customer_type) = filters.customer_type {
            query = query.filter(customers::customer_type.eq(customer_type.as_str()));
        }
        if let Some(user_id) = filters.created_by {
            query = query.filter(orders::created_by.eq(Some(user_id)));
        }
        if let Some(status) = filters.status {
            query = query.filter(orders::status.eq(status.as_str()));
        }
        if let Some(from) = filters.date_from {
            query = query.filter(orders::order_date.ge(from));
        }
        if let Some(to) = filters.date_to {
            query = query.filter(orders::order_date.le(to));
        }

        query
    }};
}

fn load_order_detail(
    conn: &mut SqliteConnection,
    order_id: i32,
) -> RepositoryResult<Option<OrderDetail>> {
    let header = orders::table
        .inner_join(customers::table)
        .filter(orders::id.eq(order_id))
        .select((
            DbOrder::as_select(),
            customers::customer_code,
            customers::customer_name,
        ))
        .first::<(DbOrder, String, String)>(conn)
        .optional()?;

    let Some((order, customer_code, customer_name)) = header else {
        return Ok(None);
    };

    let lines = order_lines::table
        .inner_join(products::table)
        .filter(order_lines::order_id.eq(order_id))
        .order(order_lines::line_no.asc())
        .select((
            DbOrderLine::as_select(),
            products::product_code,
            products::product_name,
            products::unit_of_measure,
        ))
        .load::<(DbOrderLine, String, String, String)>(conn)?
        .into_iter()
        .map(
            |(line, product_code, product_name, unit_of_measure)| OrderLineDetail {
                line: line.into(),
                product_code,
                product_name,
                unit_of_measure,
            },
        )
        .collect();

    Ok(Some(OrderDetail {
        order: order.into(),
        customer_code,
        customer_name,
        lines,
    }))
}

impl OrderReader for DieselRepository {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<OrderDetail>> {
        let mut conn = self.conn()?;
        load_order_detail(&mut conn, id)
    }

    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<OrderSummary>)> {
        let mut conn = self.conn()?;

        let count_query = filter_orders!(
            orders::table
                .inner_join(customers::table)
                .into_boxed::<diesel::sqlite::Sqlite>(),
            &query
        );
        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filter_orders!(
            orders::table
                .inner_join(customers::table)
                .left_join(users::table.on(orders::created_by.eq(users::id.nullable())))
                .into_boxed::<diesel::sqlite::Sqlite>(),
            &query
        );

        items = items.order((orders::order_date.desc(), orders::id.desc()));

        if let Some((offset, limit)) = page_window(query.pagination.as_ref()) {
            items = items.offset(offset).limit(limit);
        }

        let rows = items
            .select((
                DbOrder::as_select(),
                customers::customer_code,
                customers::customer_name,
                customers::customer_type,
                users::full_name.nullable(),
            ))
            .load::<(DbOrder, String, String, String, Option<String>)>(&mut conn)?;

        let summaries = rows
            .into_iter()
            .map(
                |(order, customer_code, customer_name, customer_type, created_by_name)| {
                    OrderSummary {
                        order: order.into(),
                        customer_code,
                        customer_name,
                        customer_type: customer_type.as_str().into(),
                        created_by_name,
                    }
                },
            )
            .collect();

        Ok((total, summaries))
    }
}

impl OrderWriter for DieselRepository {
    fn create_order(&self, new_order: &DomainNewOrder) -> RepositoryResult<OrderDetail> {
        let mut conn = self.conn()?;

        conn.transaction::<OrderDetail, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(orders::table)
                .values(&DbNewOrder::from(new_order))
                .get_result::<DbOrder>(conn)?;

            let order_id = created.id;

            if !new_order.lines.is_empty() {
                let payload: Vec<DbNewOrderLine> = new_order
                    .lines
                    .iter()
                    .map(|line| DbNewOrderLine::from_domain(order_id, line))
                    .collect();

                diesel::insert_into(order_lines::table)
                    .values(&payload)
                    .execute(conn)?;
            }

            load_order_detail(conn, order_id)?.ok_or(RepositoryError::NotFound)
        })
    }

    fn update_order_status(
        &self,
        order_id: i32,
        status: OrderStatus,
    ) -> RepositoryResult<DomainOrder> {
        let mut conn = self.conn()?;

        let updated = diesel::update(orders::table.filter(orders::id.eq(order_id)))
            .set((
                orders::status.eq(status.as_str()),
                orders::updated_at.eq(chrono::Local::now().naive_utc()),
            ))
            .get_result::<DbOrder>(&mut conn)?;

        Ok(updated.into())
    }
}
