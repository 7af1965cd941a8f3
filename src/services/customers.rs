use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::customer::{Customer, CustomerListQuery, CustomerType};
use crate::forms::customers::{CaptureLocationForm, CustomerForm, parse_customer_upload};
use crate::forms::uploads::UploadForm;
use crate::pagination::{Paginated, page_params};
use crate::repository::{CustomerReader, CustomerWriter, RepositoryError};
use crate::services::{
    ImportReport, MANAGER_ROLES, ServiceError, ServiceResult, page_of, require_role,
};

/// Query parameters of the customer list.
#[derive(Debug, Default, Deserialize)]
pub struct CustomersQuery {
    pub search: Option<String>,
    pub customer_type: Option<CustomerType>,
    #[serde(default)]
    pub active_only: bool,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

fn is_visible(customer: &Customer, user: &AuthenticatedUser) -> bool {
    match user.scope() {
        None => true,
        Some(user_id) => customer.assigned_user_ids.contains(&user_id),
    }
}

/// Customer `customer_id` if the caller may see it.
pub(crate) fn visible_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
) -> ServiceResult<Customer>
where
    R: CustomerReader + ?Sized,
{
    match repo
        .get_customer_by_id(customer_id)
        .map_err(ServiceError::from)?
    {
        Some(customer) if is_visible(&customer, user) => Ok(customer),
        _ => Err(ServiceError::NotFound),
    }
}

/// Customer referenced from another payload, such as an order.
pub(crate) fn referenced_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
) -> ServiceResult<Customer>
where
    R: CustomerReader + ?Sized,
{
    match visible_customer(repo, user, customer_id) {
        Err(ServiceError::NotFound) => Err(ServiceError::Form(format!(
            "customer {customer_id} does not exist"
        ))),
        other => other,
    }
}

/// Field staff only see the customers assigned to them.
pub fn list_customers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CustomersQuery,
) -> ServiceResult<Paginated<Customer>>
where
    R: CustomerReader + ?Sized,
{
    let (page, per_page) = page_params(query.page, query.per_page);
    let mut list_query = CustomerListQuery::new().paginate(page, per_page);

    if let Some(term) = query.search.as_deref().filter(|term| !term.trim().is_empty()) {
        list_query = list_query.search(term);
    }
    if let Some(customer_type) = query.customer_type {
        list_query = list_query.customer_type(customer_type);
    }
    if query.active_only {
        list_query = list_query.active_only();
    }
    if let Some(user_id) = user.scope() {
        list_query = list_query.assigned_to(user_id);
    }

    let (total, customers) = repo.list_customers(list_query).map_err(ServiceError::from)?;
    Ok(page_of(customers, total, page, per_page))
}

pub fn get_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
) -> ServiceResult<Customer>
where
    R: CustomerReader + ?Sized,
{
    visible_customer(repo, user, customer_id)
}

/// Customers created by field staff are assigned to their creator.
pub fn create_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CustomerForm,
) -> ServiceResult<Customer>
where
    R: CustomerWriter + ?Sized,
{
    let mut new_customer = form
        .into_new_customer(user.id())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if let Some(user_id) = user.scope() {
        if !new_customer.assigned_user_ids.contains(&user_id) {
            new_customer.assigned_user_ids.push(user_id);
        }
    }

    let created = repo
        .create_customer(&new_customer)
        .map_err(ServiceError::from)?;
    log::info!("Customer {} created by {}", created.customer_code, user.id());
    Ok(created)
}

/// Field staff may edit their customers but not reassign them.
pub fn update_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
    form: CustomerForm,
) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    visible_customer(repo, user, customer_id)?;

    let mut updates = form
        .into_update_customer()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    if user.scope().is_some() {
        updates.assigned_user_ids = None;
    }

    repo.update_customer(customer_id, &updates)
        .map_err(ServiceError::from)
}

/// Store the geolocation captured at the customer's premises.
pub fn capture_location<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
    form: CaptureLocationForm,
) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    visible_customer(repo, user, customer_id)?;

    let point = form
        .into_point()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let updated = repo
        .set_customer_location(customer_id, point)
        .map_err(ServiceError::from)?;
    log::info!(
        "Location captured for customer {} by {}",
        customer_id,
        user.id()
    );
    Ok(updated)
}

/// Insert every valid row of a customer CSV in one transaction.
pub fn import_customers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    upload: UploadForm,
) -> ServiceResult<ImportReport>
where
    R: CustomerWriter + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    let batch = parse_customer_upload(upload, user.id())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if batch.rows.is_empty() {
        return Ok(ImportReport {
            inserted: 0,
            errors: batch.errors,
        });
    }

    let inserted = match repo.create_customers(&batch.rows) {
        Ok(inserted) => inserted,
        Err(RepositoryError::Conflict(message)) => {
            log::warn!(
                "Customer upload rolled back, {} rows discarded: {message}",
                batch.rows.len()
            );
            return Err(ServiceError::Conflict(format!(
                "upload rejected, no customers were imported: {message}"
            )));
        }
        Err(err) => return Err(ServiceError::from(err)),
    };

    log::info!("Imported {inserted} customers for {}", user.id());
    Ok(ImportReport {
        inserted,
        errors: batch.errors,
    })
}
