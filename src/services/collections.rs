use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::collection::{
    Collection, CollectionListQuery, CollectionStatus, CollectionSummary, PaymentMode,
    collection_number,
};
use crate::forms::collections::{CollectionForm, CollectionStatusForm};
use crate::pagination::{Paginated, page_params};
use crate::repository::{CollectionReader, CollectionWriter, CustomerReader, OrderReader};
use crate::services::customers::referenced_customer;
use crate::services::{ServiceError, ServiceResult, now, page_of, today};

/// Query parameters of the collection list.
#[derive(Debug, Default, Deserialize)]
pub struct CollectionsQuery {
    /// Matches collection number, customer code or customer name.
    pub search: Option<String>,
    pub customer_id: Option<i32>,
    pub payment_mode: Option<PaymentMode>,
    pub status: Option<CollectionStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Record a payment. A referenced order must belong to the same customer.
pub fn create_collection<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CollectionForm,
) -> ServiceResult<Collection>
where
    R: CustomerReader + OrderReader + CollectionWriter + ?Sized,
{
    let customer = referenced_customer(repo, user, form.customer_id)?;

    if let Some(order_id) = form.order_id {
        let order = repo
            .get_order_by_id(order_id)
            .map_err(ServiceError::from)?
            .ok_or_else(|| ServiceError::Form(format!("order {order_id} does not exist")))?;
        if order.order.customer_id != customer.id {
            return Err(ServiceError::Form(format!(
                "order {} does not belong to customer {}",
                order.order.order_no, customer.customer_code
            )));
        }
    }

    let new_collection = form
        .into_new_collection(collection_number(now()), today(), user.id())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let created = repo
        .create_collection(&new_collection)
        .map_err(ServiceError::from)?;
    log::info!(
        "Collection {} of {:.2} ({}) recorded for customer {} by {}",
        created.collection_no,
        created.amount,
        created.payment_mode,
        customer.customer_code,
        user.id()
    );
    Ok(created)
}

fn is_visible(collection: &Collection, user: &AuthenticatedUser) -> bool {
    match user.scope() {
        None => true,
        Some(user_id) => collection.collected_by == Some(user_id),
    }
}

pub fn get_collection<R>(
    repo: &R,
    user: &AuthenticatedUser,
    collection_id: i32,
) -> ServiceResult<Collection>
where
    R: CollectionReader + ?Sized,
{
    match repo
        .get_collection_by_id(collection_id)
        .map_err(ServiceError::from)?
    {
        Some(collection) if is_visible(&collection, user) => Ok(collection),
        _ => Err(ServiceError::NotFound),
    }
}

/// Field staff only see the collections they recorded.
pub fn list_collections<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: CollectionsQuery,
) -> ServiceResult<Paginated<CollectionSummary>>
where
    R: CollectionReader + ?Sized,
{
    let (page, per_page) = page_params(query.page, query.per_page);
    let mut list_query = CollectionListQuery::new()
        .between(query.date_from, query.date_to)
        .paginate(page, per_page);

    if let Some(term) = query.search.as_deref().filter(|term| !term.trim().is_empty()) {
        list_query = list_query.search(term);
    }
    if let Some(customer_id) = query.customer_id {
        list_query = list_query.customer(customer_id);
    }
    if let Some(mode) = query.payment_mode {
        list_query = list_query.payment_mode(mode);
    }
    if let Some(status) = query.status {
        list_query = list_query.status(status);
    }
    if let Some(user_id) = user.scope() {
        list_query = list_query.collected_by(user_id);
    }

    let (total, rows) = repo
        .list_collections(list_query)
        .map_err(ServiceError::from)?;
    Ok(page_of(rows, total, page, per_page))
}

pub fn update_collection_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    collection_id: i32,
    form: CollectionStatusForm,
) -> ServiceResult<Collection>
where
    R: CollectionReader + CollectionWriter + ?Sized,
{
    get_collection(repo, user, collection_id)?;

    let updated = repo
        .update_collection_status(collection_id, form.status)
        .map_err(ServiceError::from)?;
    log::info!(
        "Collection {} marked {} by {}",
        updated.collection_no,
        updated.status,
        user.id()
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::CustomerType;
    use crate::domain::user::Role;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::{self, USER_ID};

    fn sample(id: i32, collected_by: Option<i32>) -> Collection {
        Collection {
            id,
            collection_no: format!("COL{id}"),
            customer_id: 5,
            order_id: None,
            collection_date: fixtures::datetime().date(),
            amount: 250.0,
            payment_mode: PaymentMode::Upi,
            payment_reference: None,
            status: CollectionStatus::Pending,
            notes: None,
            collected_by,
            created_at: fixtures::datetime(),
            updated_at: fixtures::datetime(),
        }
    }

    fn form(order_id: Option<i32>) -> CollectionForm {
        CollectionForm {
            customer_id: 5,
            order_id,
            collection_date: None,
            amount: 250.0,
            payment_mode: PaymentMode::Upi,
            payment_reference: Some("UTR123".to_string()),
            status: CollectionStatus::Pending,
            notes: None,
        }
    }

    fn repo_with_customer() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .returning(|id| Ok(Some(fixtures::customer(id, CustomerType::Retail, vec![USER_ID]))));
        repo
    }

    #[test]
    fn order_of_another_customer_is_rejected() {
        let mut repo = repo_with_customer();
        repo.expect_get_order_by_id()
            .returning(|id| Ok(Some(fixtures::order(id, 6, Some(USER_ID)))));
        repo.expect_create_collection().never();

        let result = create_collection(&repo, &fixtures::user(Role::FieldStaff), form(Some(3)));
        let Err(ServiceError::Form(message)) = &result else {
            panic!("expected a form error, got {result:?}");
        };
        assert!(message.contains("does not belong"));
    }

    #[test]
    fn collection_gets_number_and_collector() {
        let mut repo = repo_with_customer();
        repo.expect_get_order_by_id()
            .returning(|id| Ok(Some(fixtures::order(id, 5, Some(USER_ID)))));
        repo.expect_create_collection()
            .times(1)
            .withf(|collection| {
                collection.collection_no.starts_with("COL")
                    && collection.collected_by == Some(USER_ID)
                    && collection.order_id == Some(3)
            })
            .returning(|_| Ok(sample(1, Some(USER_ID))));

        create_collection(&repo, &fixtures::user(Role::FieldStaff), form(Some(3)))
            .expect("created");
    }

    #[test]
    fn field_staff_cannot_touch_other_collections() {
        let mut repo = MockRepository::new();
        repo.expect_get_collection_by_id()
            .returning(|id| Ok(Some(sample(id, Some(42)))));
        repo.expect_update_collection_status().never();

        let result = update_collection_status(
            &repo,
            &fixtures::user(Role::FieldStaff),
            1,
            CollectionStatusForm {
                status: CollectionStatus::Cleared,
            },
        );
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn list_is_scoped_for_field_staff() {
        let mut repo = MockRepository::new();
        repo.expect_list_collections()
            .times(1)
            .withf(|query| query.collected_by == Some(USER_ID))
            .returning(|_| Ok((0, Vec::new())));

        list_collections(&repo, &fixtures::user(Role::FieldStaff), CollectionsQuery::default())
            .expect("listed");
    }
}
