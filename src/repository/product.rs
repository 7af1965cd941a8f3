use diesel::prelude::*;

use crate::{
    domain::product::{
        NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
        UpdateProduct as DomainUpdateProduct,
    },
    models::product::{
        NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
    },
    repository::{
        DieselRepository, ProductReader, ProductWriter, RepositoryError, RepositoryResult,
        like_pattern, page_window,
    },
    schema::products,
};

fn filtered_products(
    query: &ProductListQuery,
) -> products::BoxedQuery<'static, diesel::sqlite::Sqlite> {
    let mut items = products::table.into_boxed::<diesel::sqlite::Sqlite>();

    if let Some(term) = query.search.as_deref() {
        let pattern = like_pattern(term);
        items = items.filter(
            products::product_code
                .like(pattern.clone())
                .or(products::product_name.like(pattern)),
        );
    }

    if let Some(category) = query.category.as_ref() {
        items = items.filter(products::category.eq(category.clone()));
    }

    if !query.include_inactive {
        items = items.filter(products::is_active.eq(true));
    }

    items
}

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(Into::into))
    }

    fn get_products_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<DomainProduct>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let rows = products::table
            .filter(products::id.eq_any(ids))
            .load::<DbProduct>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn get_products_by_codes(&self, codes: &[String]) -> RepositoryResult<Vec<DomainProduct>> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let rows = products::table
            .filter(products::product_code.eq_any(codes))
            .load::<DbProduct>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        let mut conn = self.conn()?;

        let total = filtered_products(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_products(&query).order(products::product_name.asc());

        if let Some((offset, limit)) = page_window(query.pagination.as_ref()) {
            items = items.offset(offset).limit(limit);
        }

        let rows = items.load::<DbProduct>(&mut conn)?;

        Ok((total, rows.into_iter().map(Into::into).collect()))
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(products::table)
            .values(&DbNewProduct::from(new_product))
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.into())
    }

    fn create_products(&self, new_products: &[DomainNewProduct]) -> RepositoryResult<usize> {
        if new_products.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let payload: Vec<DbNewProduct> = new_products.iter().map(DbNewProduct::from).collect();

        conn.transaction::<usize, RepositoryError, _>(|conn| {
            let inserted = diesel::insert_into(products::table)
                .values(&payload)
                .execute(conn)?;
            Ok(inserted)
        })
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;

        let updated = diesel::update(products::table.filter(products::id.eq(product_id)))
            .set(&DbUpdateProduct::from(updates))
            .get_result::<DbProduct>(&mut conn)?;

        Ok(updated.into())
    }
}
