use chrono::NaiveDate;

use fieldsales::auth::{decode_token, issue_token};
use fieldsales::domain::customer::{CustomerListQuery, CustomerType, NewCustomer};
use fieldsales::domain::order::{NewOrder, NewOrderLine, OrderListQuery, OrderStatus};
use fieldsales::domain::pricing::OrderTotals;
use fieldsales::domain::price_list::NewPriceListEntry;
use fieldsales::domain::product::UpdateProduct;
use fieldsales::domain::user::Role;
use fieldsales::forms::orders::OrderForm;
use fieldsales::forms::uploads::UploadForm;
use fieldsales::forms::users::EditUserForm;
use fieldsales::repository::{
    CustomerReader, OrderReader, OrderWriter, PriceListWriter, ProductWriter,
};
use fieldsales::services::{ServiceError, auth, customers, orders, users};

mod common;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-6, "{actual} != {expected}");
}

#[test]
fn create_order_prices_lines_and_stores_them_together() {
    let test_db = common::TestDb::new("service_create_order_prices_lines.db");
    let repo = test_db.repo();
    let staff = common::user(&repo, "9000000010", Role::FieldStaff);
    let customer = common::customer(
        &repo,
        NewCustomer::new("C1", "Sharma Traders", "9100000010")
            .with_customer_type(CustomerType::Dealer)
            .with_assigned_users(vec![staff.id]),
    );
    let product = common::product(&repo, "P1", 18.0);
    repo.create_price_entry(
        &NewPriceListEntry::new(product.id, CustomerType::Dealer, 100.0, date(2025, 1, 1))
            .with_discount(10.0),
    )
    .expect("create price");

    let form: OrderForm = serde_json::from_value(serde_json::json!({
        "customer_id": customer.id,
        "order_date": "2025-01-06",
        "lines": [
            {"product_id": product.id, "quantity": "10"},
            {"product_id": "", "quantity": "3"}
        ]
    }))
    .expect("form parses");

    let created =
        orders::create_order(&repo, &common::claims(&staff), form).expect("order created");

    assert!(created.order.order_no.starts_with("ORD"));
    assert_close(created.order.total_amount, 1000.0);
    assert_close(created.order.discount_amount, 100.0);
    assert_close(created.order.tax_amount, 162.0);
    assert_close(created.order.net_amount, 1062.0);
    assert_eq!(created.lines.len(), 1);
    assert_eq!(created.lines[0].product_code, "P1");

    let stored = repo
        .get_order_by_id(created.order.id)
        .expect("load order")
        .expect("order exists");
    assert_eq!(stored, created);
}

#[test]
fn order_with_unknown_product_is_rejected() {
    let test_db = common::TestDb::new("service_order_unknown_product.db");
    let repo = test_db.repo();
    let admin = common::user(&repo, "9000000011", Role::Admin);
    let customer = common::customer(&repo, NewCustomer::new("C1", "Patel Stores", "9100000011"));

    let form: OrderForm = serde_json::from_value(serde_json::json!({
        "customer_id": customer.id,
        "lines": [{"product_id": 999, "quantity": 1}]
    }))
    .expect("form parses");

    let result = orders::create_order(&repo, &common::claims(&admin), form);
    assert!(matches!(result, Err(ServiceError::Form(_))), "{result:?}");
}

#[test]
fn deactivated_product_cannot_be_ordered() {
    let test_db = common::TestDb::new("service_order_inactive_product.db");
    let repo = test_db.repo();
    let admin = common::user(&repo, "9000000012", Role::Admin);
    let customer = common::customer(&repo, NewCustomer::new("C1", "Patel Stores", "9100000012"));
    let product = common::product(&repo, "P1", 18.0);
    repo.update_product(
        product.id,
        &UpdateProduct {
            product_name: product.product_name.clone(),
            category: None,
            subcategory: None,
            unit_of_measure: product.unit_of_measure.clone(),
            hsn_code: None,
            gst_rate: product.gst_rate,
            description: None,
            is_active: false,
            updated_at: product.updated_at,
        },
    )
    .expect("deactivate product");

    let form: OrderForm = serde_json::from_value(serde_json::json!({
        "customer_id": customer.id,
        "lines": [{"product_id": product.id, "quantity": 1}]
    }))
    .expect("form parses");

    let result = orders::create_order(&repo, &common::claims(&admin), form);
    assert!(matches!(result, Err(ServiceError::Form(_))), "{result:?}");

    let (total, _) = repo.list_orders(OrderListQuery::new()).expect("list orders");
    assert_eq!(total, 0);
}

#[test]
fn failed_line_insert_rolls_back_the_header() {
    let test_db = common::TestDb::new("service_failed_line_insert.db");
    let repo = test_db.repo();
    let customer = common::customer(&repo, NewCustomer::new("C1", "Patel Stores", "9100000011"));

    let new_order = NewOrder {
        order_no: "ORD1".to_string(),
        customer_id: customer.id,
        order_date: date(2025, 1, 6),
        delivery_date: None,
        status: OrderStatus::Draft,
        totals: OrderTotals {
            total_amount: 10.0,
            discount_amount: 0.0,
            tax_amount: 0.0,
            net_amount: 10.0,
        },
        notes: None,
        created_by: None,
        lines: vec![NewOrderLine {
            line_no: 1,
            product_id: 999,
            quantity: 1.0,
            unit_price: 10.0,
            discount_percentage: 0.0,
            discount_amount: 0.0,
            tax_percentage: 0.0,
            tax_amount: 0.0,
            line_total: 10.0,
        }],
    };

    assert!(repo.create_order(&new_order).is_err());

    let (total, _) = repo.list_orders(OrderListQuery::new()).expect("list orders");
    assert_eq!(total, 0);
}

#[test]
fn field_staff_cannot_order_for_unassigned_customer() {
    let test_db = common::TestDb::new("service_unassigned_customer_order.db");
    let repo = test_db.repo();
    let staff = common::user(&repo, "9000000012", Role::FieldStaff);
    let customer = common::customer(&repo, NewCustomer::new("C1", "Elsewhere", "9100000012"));
    let product = common::product(&repo, "P1", 5.0);

    let form: OrderForm = serde_json::from_value(serde_json::json!({
        "customer_id": customer.id,
        "lines": [{"product_id": product.id, "quantity": 1, "unit_price": 10}]
    }))
    .expect("form parses");

    assert!(matches!(
        orders::create_order(&repo, &common::claims(&staff), form),
        Err(ServiceError::Form(_))
    ));
}

#[test]
fn customer_import_keeps_valid_rows_and_reports_the_rest() {
    let test_db = common::TestDb::new("service_customer_import.db");
    let repo = test_db.repo();
    let manager = common::user(&repo, "9000000013", Role::SalesManager);

    let csv = "customer_code,customer_name,mobile_no,customer_type,credit_limit\n\
               C1,Alpha,9100000001,retail,5000\n\
               C2,Beta,,dealer,0\n\
               C3,Gamma,9100000003,vip,0\n\
               C4,Delta,9100000004,wholesale,abc\n";
    let upload = UploadForm::new(Some("customers.csv".to_string()), csv.as_bytes().to_vec());

    let report = customers::import_customers(&repo, &common::claims(&manager), upload)
        .expect("import runs");

    assert_eq!(report.inserted, 2);
    assert_eq!(report.errors.len(), 2);
    assert!(report.errors[0].starts_with("Row 3:"));
    assert!(report.errors[1].starts_with("Row 4:"));

    let (total, mut stored) = repo
        .list_customers(CustomerListQuery::new())
        .expect("list customers");
    stored.sort_by(|a, b| a.customer_code.cmp(&b.customer_code));
    assert_eq!(total, 2);
    assert_eq!(stored[0].credit_limit, 5000.0);
    assert_eq!(stored[1].customer_type, CustomerType::Dealer);
    assert_eq!(stored[1].credit_limit, 0.0);
}

#[test]
fn customer_import_with_duplicate_code_imports_nothing() {
    let test_db = common::TestDb::new("service_customer_import_duplicate.db");
    let repo = test_db.repo();
    let manager = common::user(&repo, "9000000014", Role::Admin);
    common::customer(&repo, NewCustomer::new("C1", "Existing", "9100000001"));

    let csv = "customer_code,customer_name,mobile_no\n\
               C9,Fresh,9100000009\n\
               C1,Clash,9100000002\n";
    let upload = UploadForm::new(None, csv.as_bytes().to_vec());

    let result = customers::import_customers(&repo, &common::claims(&manager), upload);
    assert!(matches!(result, Err(ServiceError::Conflict(_))), "{result:?}");

    let (total, _) = repo
        .list_customers(CustomerListQuery::new())
        .expect("list customers");
    assert_eq!(total, 1);
}

#[test]
fn deactivated_user_token_is_refused() {
    let test_db = common::TestDb::new("service_deactivated_user_token.db");
    let repo = test_db.repo();
    let admin = common::user(&repo, "9000000020", Role::Admin);
    let staff = common::user(&repo, "9000000021", Role::FieldStaff);

    let token = issue_token(&common::claims(&staff), b"secret").expect("token issued");
    let claims = decode_token(&token, b"secret").expect("token decodes");
    assert!(auth::resolve_session(&repo, claims.clone()).is_ok());

    let deactivate = EditUserForm {
        is_active: Some(false),
        ..EditUserForm::default()
    };
    users::update_user(&repo, &common::claims(&admin), staff.id, deactivate).expect("deactivated");

    let result = auth::resolve_session(&repo, claims);
    assert!(matches!(result, Err(ServiceError::Unauthorized)), "{result:?}");
}

#[test]
fn demoted_user_session_loses_manager_access() {
    let test_db = common::TestDb::new("service_demoted_user_session.db");
    let repo = test_db.repo();
    let admin = common::user(&repo, "9000000022", Role::Admin);
    let manager = common::user(&repo, "9000000023", Role::SalesManager);
    let claims = common::claims(&manager);

    let demote = EditUserForm {
        role: Some(Role::FieldStaff),
        ..EditUserForm::default()
    };
    users::update_user(&repo, &common::claims(&admin), manager.id, demote).expect("demoted");

    let session = auth::resolve_session(&repo, claims).expect("still active");
    assert_eq!(session.role, Role::FieldStaff);
    assert_eq!(session.scope(), Some(manager.id));
}
