use diesel::prelude::*;

use crate::{
    domain::collection::{
        Collection as DomainCollection, CollectionListQuery, CollectionStatus, CollectionSummary,
        NewCollection as DomainNewCollection,
    },
    models::collection::{Collection as DbCollection, NewCollection as DbNewCollection},
    repository::{
        CollectionReader, CollectionWriter, DieselRepository, RepositoryResult, like_pattern,
        page_window,
    },
    schema::{collections, customers, orders, users},
};

macro_rules! filter_collections {
    ($query:expr, $filters:expr) => {{
        let filters: &CollectionListQuery = $filters;
        let mut query = $query;

        if let Some(term) = filters.search.as_deref() {
            let pattern = like_pattern(term);
            query = query.filter(
                collections::collection_no
                    .like(pattern.clone())
                    .or(customers::customer_code.like(pattern.clone()))
                    .or(customers::customer_name.like(pattern.clone()))
                    .or(collections::payment_reference.like(pattern)),
            );
        }
        if let Some(customer_id) = filters.customer_id {
            query = query.filter(collections::customer_id.eq(customer_id));
        }
        if let Some(user_id) = filters.collected_by {
            query = query.filter(collections::collected_by.eq(Some(user_id)));
        }
        if let Some(mode) = filters.payment_mode {
            query = query.filter(collections::payment_mode.eq(mode.as_str()));
        }
        if let Some(status) = filters.status {
            query = query.filter(collections::status.eq(status.as_str()));
        }
        if let Some(from) = filters.date_from {
            query = query.filter(collections::collection_date.ge(from));
        }
        if let Some(to) = filters.date_to {
            query = query.filter(collections::collection_date.le(to));
        }

        query
    }};
}

impl CollectionReader for DieselRepository {
    fn get_collection_by_id(&self, id: i32) -> RepositoryResult<Option<DomainCollection>> {
        let mut conn = self.conn()?;
        let collection = collections::table
            .filter(collections::id.eq(id))
            .first::<DbCollection>(&mut conn)
            .optional()?;

        Ok(collection.map(Into::into))
    }

    fn list_collections(
        &self,
        query: CollectionListQuery,
    ) -> RepositoryResult<(usize, Vec<CollectionSummary>)> {
        let mut conn = self.conn()?;

        let count_query = filter_collections!(
            collections::table
                .inner_join(customers::table)
                .into_boxed::<diesel::sqlite::Sqlite>(),
            &query
        );
        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = filter_collections!(
            collections::table
                .inner_join(customers::table)
                .left_join(orders::table.on(collections::order_id.eq(orders::id.nullable())))
                .left_join(users::table.on(collections::collected_by.eq(users::id.nullable())))
                .into_boxed::<diesel::sqlite::Sqlite>(),
            &query
        );

        items = items.order((collections::collection_date.desc(), collections::id.desc()));

        if let Some((offset, limit)) = page_window(query.pagination.as_ref()) {
            items = items.offset(offset).limit(limit);
        }

        let rows = items
            .select((
                DbCollection::as_select(),
                customers::customer_code,
                customers::customer_name,
                orders::order_no.nullable(),
                users::full_name.nullable(),
            ))
            .load::<(DbCollection, String, String, Option<String>, Option<String>)>(&mut conn)?;

        let summaries = rows
            .into_iter()
            .map(
                |(collection, customer_code, customer_name, order_no, collected_by_name)| {
                    CollectionSummary {
                        collection: collection.into(),
                        customer_code,
                        customer_name,
                        order_no,
                        collected_by_name,
                    }
                },
            )
            .collect();

        Ok((total, summaries))
    }
}

impl CollectionWriter for DieselRepository {
    fn create_collection(
        &self,
        new_collection: &DomainNewCollection,
    ) -> RepositoryResult<DomainCollection> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(collections::table)
            .values(&DbNewCollection::from(new_collection))
            .get_result::<DbCollection>(&mut conn)?;

        Ok(created.into())
    }

    fn update_collection_status(
        &self,
        collection_id: i32,
        status: CollectionStatus,
    ) -> RepositoryResult<DomainCollection> {
        let mut conn = self.conn()?;

        let updated = diesel::update(collections::table.filter(collections::id.eq(collection_id)))
            .set((
                collections::status.eq(status.as_str()),
                collections::updated_at.eq(chrono::Local::now().naive_utc()),
            ))
            .get_result::<DbCollection>(&mut conn)?;

        Ok(updated.into())
    }
}
