use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedUser;
use crate::domain::customer::{Customer, CustomerType};
use crate::domain::order::{
    NewOrder, NewOrderLine, Order, OrderDetail, OrderListQuery, OrderStatus, OrderSummary,
    order_number,
};
use crate::domain::pricing::{
    OrderTotals, PricedLine, PricedOrder, PricingError, price_order, referenced_products,
};
use crate::domain::price_list::PriceListEntry;
use crate::domain::product::Product;
use crate::forms::orders::{OrderForm, OrderStatusForm};
use crate::pagination::{Paginated, page_params};
use crate::repository::{CustomerReader, OrderReader, OrderWriter, PriceListReader, ProductReader};
use crate::services::customers::referenced_customer;
use crate::services::{ServiceError, ServiceResult, now, page_of, today};

/// Query parameters of the order list.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    /// Matches order number, customer code or customer name.
    pub search: Option<String>,
    pub customer_id: Option<i32>,
    pub status: Option<OrderStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Priced order returned by the quote endpoint.
#[derive(Debug, Serialize)]
pub struct OrderQuote {
    pub customer_id: i32,
    pub customer_type: CustomerType,
    pub order_date: NaiveDate,
    pub lines: Vec<PricedLine>,
    pub totals: OrderTotals,
}

/// Load every product and price list entry `form` references and price it.
fn price_form<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &OrderForm,
    order_date: NaiveDate,
) -> ServiceResult<(Customer, PricedOrder)>
where
    R: CustomerReader + ProductReader + PriceListReader + ?Sized,
{
    let customer = referenced_customer(repo, user, form.customer_id)?;
    if !customer.is_active {
        return Err(ServiceError::Form(format!(
            "customer {} is inactive",
            customer.customer_code
        )));
    }

    let inputs = form.line_inputs();
    let product_ids = referenced_products(&inputs);
    if product_ids.is_empty() {
        return Err(ServiceError::Form(PricingError::NoProducts.to_string()));
    }

    let products: HashMap<i32, Product> = repo
        .get_products_by_ids(&product_ids)
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|product| (product.id, product))
        .collect();

    let prices: HashMap<i32, PriceListEntry> = repo
        .resolve_prices(&product_ids, customer.customer_type, order_date)
        .map_err(ServiceError::from)?
        .into_iter()
        .map(|entry| (entry.product_id, entry))
        .collect();

    let priced = price_order(&inputs, &products, &prices)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if !priced.totals.is_consistent() {
        log::warn!(
            "Order totals for customer {} drift by {} from gross - discount + tax",
            customer.id,
            priced.totals.drift()
        );
    }

    Ok((customer, priced))
}

/// Price an order without saving it.
pub fn quote_order<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: OrderForm,
) -> ServiceResult<OrderQuote>
where
    R: CustomerReader + ProductReader + PriceListReader + ?Sized,
{
    let order_date = form.order_date.unwrap_or_else(today);
    let (customer, priced) = price_form(repo, user, &form, order_date)?;

    Ok(OrderQuote {
        customer_id: customer.id,
        customer_type: customer.customer_type,
        order_date,
        lines: priced.lines,
        totals: priced.totals,
    })
}

/// Price the order and write the header with its lines.
pub fn create_order<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: OrderForm,
) -> ServiceResult<OrderDetail>
where
    R: CustomerReader + ProductReader + PriceListReader + OrderWriter + ?Sized,
{
    let order_date = form.order_date.unwrap_or_else(today);
    if form.delivery_date.is_some_and(|delivery| delivery < order_date) {
        return Err(ServiceError::Form(
            "delivery date cannot precede the order date".to_string(),
        ));
    }

    let (customer, priced) = price_form(repo, user, &form, order_date)?;

    let new_order = NewOrder {
        order_no: order_number(now()),
        customer_id: customer.id,
        order_date,
        delivery_date: form.delivery_date,
        status: form.status,
        totals: priced.totals,
        notes: form.clean_notes(),
        created_by: Some(user.id()),
        lines: priced.lines.iter().map(NewOrderLine::from).collect(),
    };

    let created = repo.create_order(&new_order).map_err(ServiceError::from)?;
    log::info!(
        "Order {} created for customer {} by {} ({} lines, net {:.2})",
        created.order.order_no,
        customer.customer_code,
        user.id(),
        created.lines.len(),
        created.order.net_amount
    );
    Ok(created)
}

fn is_visible(order: &Order, user: &AuthenticatedUser) -> bool {
    match user.scope() {
        None => true,
        Some(user_id) => order.created_by == Some(user_id),
    }
}

/// Field staff only see the orders they created.
pub fn get_order<R>(repo: &R, user: &AuthenticatedUser, order_id: i32) -> ServiceResult<OrderDetail>
where
    R: OrderReader + ?Sized,
{
    match repo.get_order_by_id(order_id).map_err(ServiceError::from)? {
        Some(detail) if is_visible(&detail.order, user) => Ok(detail),
        _ => Err(ServiceError::NotFound),
    }
}

pub fn list_orders<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: OrdersQuery,
) -> ServiceResult<Paginated<OrderSummary>>
where
    R: OrderReader + ?Sized,
{
    let (page, per_page) = page_params(query.page, query.per_page);
    let mut list_query = OrderListQuery::new()
        .between(query.date_from, query.date_to)
        .paginate(page, per_page);

    if let Some(term) = query.search.as_deref().filter(|term| !term.trim().is_empty()) {
        list_query = list_query.search(term);
    }
    if let Some(customer_id) = query.customer_id {
        list_query = list_query.customer(customer_id);
    }
    if let Some(status) = query.status {
        list_query = list_query.status(status);
    }
    if let Some(user_id) = user.scope() {
        list_query = list_query.created_by(user_id);
    }

    let (total, orders) = repo.list_orders(list_query).map_err(ServiceError::from)?;
    Ok(page_of(orders, total, page, per_page))
}

pub fn update_order_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    order_id: i32,
    form: OrderStatusForm,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter + ?Sized,
{
    let current = get_order(repo, user, order_id)?;

    let updated = repo
        .update_order_status(order_id, form.status)
        .map_err(ServiceError::from)?;
    log::info!(
        "Order {} moved from {} to {} by {}",
        updated.order_no,
        current.order.status,
        updated.status,
        user.id()
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::PriceSource;
    use crate::domain::user::Role;
    use crate::forms::orders::OrderLineForm;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::{self, USER_ID};

    const EPS: f64 = 1e-9;

    fn line(product_id: Option<i32>, quantity: f64) -> OrderLineForm {
        OrderLineForm {
            product_id,
            quantity,
            ..OrderLineForm::default()
        }
    }

    fn form(lines: Vec<OrderLineForm>) -> OrderForm {
        OrderForm {
            customer_id: 5,
            order_date: Some(fixtures::datetime().date()),
            delivery_date: None,
            status: OrderStatus::Draft,
            notes: Some("  deliver before noon ".to_string()),
            lines,
        }
    }

    fn pricing_repo(customer_type: CustomerType) -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .returning(move |id| Ok(Some(fixtures::customer(id, customer_type, vec![USER_ID]))));
        repo.expect_get_products_by_ids()
            .returning(|ids| Ok(ids.iter().map(|id| fixtures::product(*id, 18.0)).collect()));
        repo.expect_resolve_prices()
            .withf(move |ids, kind, _| ids == [1, 2] && *kind == customer_type)
            .returning(move |_, kind, _| Ok(vec![fixtures::price_entry(9, 1, kind, 100.0, 10.0)]));
        repo
    }

    #[test]
    fn quote_prefills_from_price_list_and_gst() {
        let repo = pricing_repo(CustomerType::Dealer);
        let staff = fixtures::user(Role::FieldStaff);

        let quote = quote_order(
            &repo,
            &staff,
            form(vec![line(Some(1), 10.0), line(None, 3.0), line(Some(2), 1.0)]),
        )
        .expect("quoted");

        assert_eq!(quote.customer_type, CustomerType::Dealer);
        assert_eq!(quote.lines.len(), 2);

        let first = &quote.lines[0];
        assert_eq!(first.line_no, 1);
        assert_eq!(first.price_source, PriceSource::PriceList);
        assert!((first.discount_amount - 100.0).abs() < EPS);
        assert!((first.tax_amount - 162.0).abs() < EPS);
        assert!((first.line_total - 1062.0).abs() < EPS);

        let second = &quote.lines[1];
        assert_eq!(second.line_no, 2);
        assert_eq!(second.price_source, PriceSource::Missing);
        assert_eq!(second.line_total, 0.0);

        assert!((quote.totals.net_amount - 1062.0).abs() < EPS);
    }

    #[test]
    fn order_without_products_is_rejected_before_pricing() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .returning(|id| Ok(Some(fixtures::customer(id, CustomerType::Retail, vec![]))));
        repo.expect_get_products_by_ids().never();
        repo.expect_create_order().never();

        let result = create_order(
            &repo,
            &fixtures::user(Role::Admin),
            form(vec![line(None, 1.0)]),
        );
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn create_writes_header_and_lines_together() {
        let mut repo = pricing_repo(CustomerType::Retail);
        repo.expect_create_order()
            .times(1)
            .withf(|order| {
                order.order_no.starts_with("ORD")
                    && order.lines.len() == 2
                    && order.created_by == Some(USER_ID)
                    && order.notes.as_deref() == Some("deliver before noon")
                    && (order.totals.net_amount
                        - order.lines.iter().map(|line| line.line_total).sum::<f64>())
                    .abs()
                        < EPS
            })
            .returning(|order| {
                let mut detail = fixtures::order(1, order.customer_id, order.created_by);
                detail.order.net_amount = order.totals.net_amount;
                Ok(detail)
            });

        let staff = fixtures::user(Role::FieldStaff);
        let created = create_order(
            &repo,
            &staff,
            form(vec![line(Some(1), 10.0), line(Some(2), 2.0)]),
        )
        .expect("created");
        assert!((created.order.net_amount - 1062.0).abs() < EPS);
    }

    #[test]
    fn unassigned_customer_cannot_be_ordered_for_by_field_staff() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .returning(|id| Ok(Some(fixtures::customer(id, CustomerType::Retail, vec![1]))));

        let result = quote_order(
            &repo,
            &fixtures::user(Role::FieldStaff),
            form(vec![line(Some(1), 1.0)]),
        );
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn inactive_customer_cannot_be_ordered_for() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id().returning(|id| {
            let mut customer = fixtures::customer(id, CustomerType::Retail, vec![USER_ID]);
            customer.is_active = false;
            Ok(Some(customer))
        });
        repo.expect_get_products_by_ids().never();
        repo.expect_create_order().never();

        let result = create_order(
            &repo,
            &fixtures::user(Role::Admin),
            form(vec![line(Some(1), 1.0)]),
        );
        assert!(matches!(result, Err(ServiceError::Form(message)) if message.contains("inactive")));
    }

    #[test]
    fn inactive_product_cannot_be_ordered() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .returning(|id| Ok(Some(fixtures::customer(id, CustomerType::Retail, vec![USER_ID]))));
        repo.expect_get_products_by_ids().returning(|ids| {
            Ok(ids
                .iter()
                .map(|id| {
                    let mut product = fixtures::product(*id, 18.0);
                    product.is_active = *id != 2;
                    product
                })
                .collect())
        });
        repo.expect_resolve_prices().returning(|_, _, _| Ok(Vec::new()));
        repo.expect_create_order().never();

        let result = create_order(
            &repo,
            &fixtures::user(Role::Admin),
            form(vec![line(Some(1), 1.0), line(Some(2), 1.0)]),
        );
        assert!(
            matches!(result, Err(ServiceError::Form(message)) if message == "product 2 is inactive")
        );
    }

    #[test]
    fn delivery_before_order_date_is_rejected() {
        let repo = MockRepository::new();
        let mut order = form(vec![line(Some(1), 1.0)]);
        order.delivery_date = fixtures::datetime().date().pred_opt();

        assert!(matches!(
            create_order(&repo, &fixtures::user(Role::Admin), order),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn field_staff_cannot_see_other_orders() {
        let mut repo = MockRepository::new();
        repo.expect_get_order_by_id()
            .returning(|id| Ok(Some(fixtures::order(id, 5, Some(99)))));

        assert!(matches!(
            get_order(&repo, &fixtures::user(Role::FieldStaff), 3),
            Err(ServiceError::NotFound)
        ));
        assert!(get_order(&repo, &fixtures::user(Role::SalesManager), 3).is_ok());
    }

    #[test]
    fn field_staff_list_is_scoped_to_creator() {
        let mut repo = MockRepository::new();
        repo.expect_list_orders()
            .times(1)
            .withf(|query| {
                query.created_by == Some(USER_ID) && query.status == Some(OrderStatus::Confirmed)
            })
            .returning(|_| Ok((0, Vec::new())));

        let query = OrdersQuery {
            status: Some(OrderStatus::Confirmed),
            ..OrdersQuery::default()
        };
        list_orders(&repo, &fixtures::user(Role::FieldStaff), query).expect("listed");
    }
}
