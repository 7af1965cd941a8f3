use std::collections::HashMap;

use chrono::NaiveDate;
use diesel::dsl::{InnerJoin, IntoBoxed};
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::customer::CustomerType,
    domain::price_list::{
        NewPriceListEntry as DomainNewEntry, PriceListEntry as DomainEntry, PriceListQuery,
        PriceListRow, UpdatePriceListEntry as DomainUpdateEntry, select_effective,
    },
    models::price_list::{NewProductPrice, ProductPrice, UpdateProductPrice},
    repository::{
        DieselRepository, PriceListReader, PriceListWriter, RepositoryError, RepositoryResult,
        like_pattern, page_window,
    },
    schema::{product_prices, products},
};

type PriceJoin = IntoBoxed<'static, InnerJoin<product_prices::table, products::table>, Sqlite>;

fn filtered_prices(query: &PriceListQuery) -> PriceJoin {
    let mut items = product_prices::table
        .inner_join(products::table)
        .into_boxed::<Sqlite>();

    if let Some(term) = query.search.as_deref() {
        let pattern = like_pattern(term);
        items = items.filter(
            products::product_code
                .like(pattern.clone())
                .or(products::product_name.like(pattern)),
        );
    }

    if let Some(product_id) = query.product_id {
        items = items.filter(product_prices::product_id.eq(product_id));
    }

    if let Some(customer_type) = query.customer_type {
        items = items.filter(product_prices::customer_type.eq(customer_type.as_str()));
    }

    if query.active_only {
        items = items.filter(product_prices::is_active.eq(true));
    }

    items
}

/// Active rows for the products and customer type whose range covers `on_date`.
fn load_candidates(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
    customer_type: CustomerType,
    on_date: NaiveDate,
) -> RepositoryResult<Vec<DomainEntry>> {
    let rows = product_prices::table
        .filter(product_prices::product_id.eq_any(product_ids))
        .filter(product_prices::customer_type.eq(customer_type.as_str()))
        .filter(product_prices::is_active.eq(true))
        .filter(product_prices::effective_from.le(on_date))
        .filter(
            product_prices::effective_to
                .is_null()
                .or(product_prices::effective_to.ge(on_date)),
        )
        .load::<ProductPrice>(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

impl PriceListReader for DieselRepository {
    fn get_price_entry(&self, id: i32) -> RepositoryResult<Option<DomainEntry>> {
        let mut conn = self.conn()?;
        let entry = product_prices::table
            .filter(product_prices::id.eq(id))
            .first::<ProductPrice>(&mut conn)
            .optional()?;

        Ok(entry.map(Into::into))
    }

    fn list_price_entries(
        &self,
        query: PriceListQuery,
    ) -> RepositoryResult<(usize, Vec<PriceListRow>)> {
        let mut conn = self.conn()?;

        let total = filtered_prices(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_prices(&query).order((
            products::product_name.asc(),
            product_prices::customer_type.asc(),
            product_prices::effective_from.desc(),
        ));

        if let Some((offset, limit)) = page_window(query.pagination.as_ref()) {
            items = items.offset(offset).limit(limit);
        }

        let rows = items
            .select((
                ProductPrice::as_select(),
                products::product_code,
                products::product_name,
            ))
            .load::<(ProductPrice, String, String)>(&mut conn)?;

        let entries = rows
            .into_iter()
            .map(|(entry, product_code, product_name)| PriceListRow {
                entry: entry.into(),
                product_code,
                product_name,
            })
            .collect();

        Ok((total, entries))
    }

    fn resolve_price(
        &self,
        product_id: i32,
        customer_type: CustomerType,
        on_date: NaiveDate,
    ) -> RepositoryResult<Option<DomainEntry>> {
        let mut conn = self.conn()?;
        let candidates = load_candidates(&mut conn, &[product_id], customer_type, on_date)?;
        Ok(select_effective(&candidates, on_date).cloned())
    }

    fn resolve_prices(
        &self,
        product_ids: &[i32],
        customer_type: CustomerType,
        on_date: NaiveDate,
    ) -> RepositoryResult<Vec<DomainEntry>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let candidates = load_candidates(&mut conn, product_ids, customer_type, on_date)?;

        let mut by_product: HashMap<i32, Vec<DomainEntry>> = HashMap::new();
        for entry in candidates {
            by_product.entry(entry.product_id).or_default().push(entry);
        }

        Ok(by_product
            .values()
            .filter_map(|entries| select_effective(entries, on_date).cloned())
            .collect())
    }
}

impl PriceListWriter for DieselRepository {
    fn create_price_entry(&self, entry: &DomainNewEntry) -> RepositoryResult<DomainEntry> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(product_prices::table)
            .values(&NewProductPrice::from(entry))
            .get_result::<ProductPrice>(&mut conn)?;

        Ok(created.into())
    }

    fn create_price_entries(&self, entries: &[DomainNewEntry]) -> RepositoryResult<usize> {
        if entries.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let payload: Vec<NewProductPrice> = entries.iter().map(NewProductPrice::from).collect();

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let inserted = diesel::insert_into(product_prices::table)
                .values(&payload)
                .execute(conn)?;
            Ok(inserted)
        })
    }

    fn update_price_entry(
        &self,
        entry_id: i32,
        updates: &DomainUpdateEntry,
    ) -> RepositoryResult<DomainEntry> {
        let mut conn = self.conn()?;

        let updated = diesel::update(product_prices::table.filter(product_prices::id.eq(entry_id)))
            .set(&UpdateProductPrice::from(updates))
            .get_result::<ProductPrice>(&mut conn)?;

        Ok(updated.into())
    }
}
