use std::collections::HashMap;

use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::customer::CustomerType;
use crate::domain::price_list::{PriceListEntry, PriceListQuery, PriceListRow};
use crate::forms::price_list::{AddPriceForm, EditPriceForm, PriceUpload};
use crate::forms::uploads::UploadForm;
use crate::pagination::{Paginated, page_params};
use crate::repository::{PriceListReader, PriceListWriter, ProductReader, RepositoryError};
use crate::services::{
    ImportReport, MANAGER_ROLES, ServiceError, ServiceResult, page_of, require_role, today,
};

/// Query parameters of the price list.
#[derive(Debug, Default, Deserialize)]
pub struct PricesQuery {
    /// Matches product code or name.
    pub search: Option<String>,
    pub product_id: Option<i32>,
    pub customer_type: Option<CustomerType>,
    #[serde(default)]
    pub active_only: bool,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

pub fn list_prices<R>(
    repo: &R,
    _user: &AuthenticatedUser,
    query: PricesQuery,
) -> ServiceResult<Paginated<PriceListRow>>
where
    R: PriceListReader + ?Sized,
{
    let (page, per_page) = page_params(query.page, query.per_page);
    let mut list_query = PriceListQuery::new().paginate(page, per_page);

    if let Some(term) = query.search.as_deref().filter(|term| !term.trim().is_empty()) {
        list_query = list_query.search(term);
    }
    if let Some(product_id) = query.product_id {
        list_query = list_query.product_id(product_id);
    }
    if let Some(customer_type) = query.customer_type {
        list_query = list_query.customer_type(customer_type);
    }
    if query.active_only {
        list_query = list_query.active_only();
    }

    let (total, rows) = repo
        .list_price_entries(list_query)
        .map_err(ServiceError::from)?;
    Ok(page_of(rows, total, page, per_page))
}

pub fn create_price<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddPriceForm,
) -> ServiceResult<PriceListEntry>
where
    R: ProductReader + PriceListWriter + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    let entry = form
        .into_new_entry(today())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if repo
        .get_product_by_id(entry.product_id)
        .map_err(ServiceError::from)?
        .is_none()
    {
        return Err(ServiceError::Form(format!(
            "product {} does not exist",
            entry.product_id
        )));
    }

    let created = repo
        .create_price_entry(&entry)
        .map_err(ServiceError::from)?;
    log::info!(
        "Price entry {} for product {} ({}) created by {}",
        created.id,
        created.product_id,
        created.customer_type,
        user.id()
    );
    Ok(created)
}

pub fn update_price<R>(
    repo: &R,
    user: &AuthenticatedUser,
    entry_id: i32,
    form: EditPriceForm,
) -> ServiceResult<PriceListEntry>
where
    R: PriceListWriter + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    let updates = form
        .into_update()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_price_entry(entry_id, &updates)
        .map_err(ServiceError::from)
}

/// Import a price CSV keyed by product code.
pub fn import_prices<R>(
    repo: &R,
    user: &AuthenticatedUser,
    upload: UploadForm,
) -> ServiceResult<ImportReport>
where
    R: ProductReader + PriceListWriter + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    let upload =
        PriceUpload::parse(upload, today()).map_err(|err| ServiceError::Form(err.to_string()))?;

    let codes = upload.product_codes();
    let product_ids: HashMap<String, i32> = if codes.is_empty() {
        HashMap::new()
    } else {
        repo.get_products_by_codes(&codes)
            .map_err(ServiceError::from)?
            .into_iter()
            .map(|product| (product.product_code, product.id))
            .collect()
    };

    let batch = upload.resolve(&product_ids);
    if batch.rows.is_empty() {
        return Ok(ImportReport {
            inserted: 0,
            errors: batch.errors,
        });
    }

    let inserted = match repo.create_price_entries(&batch.rows) {
        Ok(inserted) => inserted,
        Err(RepositoryError::Conflict(message)) => {
            log::warn!(
                "Price upload rolled back, {} rows discarded: {message}",
                batch.rows.len()
            );
            return Err(ServiceError::Conflict(format!(
                "upload rejected, no prices were imported: {message}"
            )));
        }
        Err(err) => return Err(ServiceError::from(err)),
    };

    log::info!("Imported {inserted} price entries for {}", user.id());
    Ok(ImportReport {
        inserted,
        errors: batch.errors,
    })
}
