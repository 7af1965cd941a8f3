use chrono::{Duration, NaiveDate};

use fieldsales::domain::beat_plan::{DayMask, NewBeatPlan};
use fieldsales::domain::customer::{CustomerListQuery, CustomerType, NewCustomer};
use fieldsales::domain::location::NewUserLocation;
use fieldsales::domain::price_list::NewPriceListEntry;
use fieldsales::domain::route::{NewRoute, NewRouteCustomer};
use fieldsales::domain::user::Role;
use fieldsales::repository::{
    BeatPlanReader, BeatPlanWriter, CustomerReader, LocationReader, LocationWriter,
    PriceListReader, PriceListWriter, RepositoryError, RouteReader, RouteWriter,
};

mod common;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

#[test]
fn test_route_customers_get_consecutive_sequences() {
    let test_db = common::TestDb::new("test_route_customers_get_consecutive_sequences.db");
    let repo = test_db.repo();
    let manager = common::user(&repo, "9000000001", Role::SalesManager);

    let route = repo
        .create_route(&NewRoute {
            route_code: "R1".to_string(),
            route_name: "North".to_string(),
            route_description: None,
            created_by: Some(manager.id),
        })
        .unwrap();
    let first = common::customer(&repo, NewCustomer::new("C1", "First", "9100000001"));
    let second = common::customer(&repo, NewCustomer::new("C2", "Second", "9100000002"));

    let mapping = |customer_id| NewRouteCustomer {
        route_id: route.id,
        customer_id,
        created_by: Some(manager.id),
    };

    assert_eq!(repo.add_route_customer(&mapping(first.id)).unwrap().visit_sequence, 1);
    assert_eq!(repo.add_route_customer(&mapping(second.id)).unwrap().visit_sequence, 2);

    let err = repo
        .add_route_customer(&mapping(first.id))
        .expect_err("expected duplicate mapping to fail");
    assert!(matches!(err, RepositoryError::Conflict(_)));

    let ordered: Vec<i32> = repo
        .list_route_customers(route.id)
        .unwrap()
        .into_iter()
        .map(|detail| detail.mapping.customer_id)
        .collect();
    assert_eq!(ordered, vec![first.id, second.id]);
}

#[test]
fn test_beat_plan_is_unique_per_user_and_route() {
    let test_db = common::TestDb::new("test_beat_plan_is_unique_per_user_and_route.db");
    let repo = test_db.repo();
    let staff = common::user(&repo, "9000000002", Role::FieldStaff);
    let route = repo
        .create_route(&NewRoute {
            route_code: "R2".to_string(),
            route_name: "South".to_string(),
            route_description: None,
            created_by: None,
        })
        .unwrap();

    let plan = NewBeatPlan {
        user_id: staff.id,
        route_id: route.id,
        days: DayMask {
            monday: true,
            thursday: true,
            ..DayMask::default()
        },
    };
    let created = repo.create_beat_plan(&plan).unwrap();
    assert!(created.days.thursday);

    let err = repo
        .create_beat_plan(&plan)
        .expect_err("expected duplicate plan to fail");
    assert!(matches!(err, RepositoryError::Conflict(_)));

    let active = repo.list_active_beat_plans_for_user(staff.id).unwrap();
    assert_eq!(active.len(), 1);

    repo.delete_beat_plan(created.id).unwrap();
    assert!(repo.get_beat_plan(created.id).unwrap().is_none());
}

#[test]
fn test_price_resolution_prefers_latest_effective_entry() {
    let test_db = common::TestDb::new("test_price_resolution_prefers_latest_effective_entry.db");
    let repo = test_db.repo();
    let product = common::product(&repo, "P1", 18.0);

    repo.create_price_entries(&[
        NewPriceListEntry::new(product.id, CustomerType::Retail, 100.0, date(2025, 1, 1)),
        NewPriceListEntry::new(product.id, CustomerType::Retail, 110.0, date(2025, 3, 1))
            .until(date(2025, 3, 31)),
        NewPriceListEntry::new(product.id, CustomerType::Dealer, 90.0, date(2025, 1, 1))
            .with_discount(5.0),
    ])
    .unwrap();

    let in_march = repo
        .resolve_price(product.id, CustomerType::Retail, date(2025, 3, 15))
        .unwrap()
        .expect("price in march");
    assert_eq!(in_march.price, 110.0);

    let after_expiry = repo
        .resolve_price(product.id, CustomerType::Retail, date(2025, 4, 1))
        .unwrap()
        .expect("price after expiry");
    assert_eq!(after_expiry.price, 100.0);

    let dealer = repo
        .resolve_prices(&[product.id], CustomerType::Dealer, date(2025, 2, 1))
        .unwrap();
    assert_eq!(dealer.len(), 1);
    assert_eq!(dealer[0].discount_percentage, 5.0);

    assert!(
        repo.resolve_price(product.id, CustomerType::Distributor, date(2025, 2, 1))
            .unwrap()
            .is_none()
    );
    assert!(
        repo.resolve_price(product.id, CustomerType::Retail, date(2024, 12, 31))
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_latest_location_per_user() {
    let test_db = common::TestDb::new("test_latest_location_per_user.db");
    let repo = test_db.repo();
    let asha = common::user(&repo, "9000000003", Role::FieldStaff);
    let ravi = common::user(&repo, "9000000004", Role::FieldStaff);
    let start = date(2025, 1, 6).and_hms_opt(9, 0, 0).expect("valid time");

    let fix = |user_id, latitude, minutes| NewUserLocation {
        user_id,
        latitude,
        longitude: 72.8,
        accuracy: None,
        battery_level: Some(50),
        recorded_at: start + Duration::minutes(minutes),
    };

    for location in [fix(asha.id, 19.0, 0), fix(asha.id, 19.5, 30), fix(ravi.id, 18.0, 10)] {
        repo.record_location(&location).unwrap();
    }

    let mut latest = repo.latest_locations().unwrap();
    latest.sort_by_key(|entry| entry.location.user_id);

    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0].location.user_id, asha.id);
    assert_eq!(latest[0].location.latitude, 19.5);
    assert_eq!(latest[0].mobile_no, "9000000003");
    assert_eq!(latest[1].location.latitude, 18.0);

    let history = repo.list_user_locations(asha.id, 10).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].latitude, 19.5);
}

#[test]
fn test_customers_are_scoped_by_assignment() {
    let test_db = common::TestDb::new("test_customers_are_scoped_by_assignment.db");
    let repo = test_db.repo();
    let staff = common::user(&repo, "9000000005", Role::FieldStaff);

    common::customer(
        &repo,
        NewCustomer::new("C1", "Assigned", "9100000001").with_assigned_users(vec![staff.id]),
    );
    common::customer(&repo, NewCustomer::new("C2", "Unassigned", "9100000002"));

    let (total, visible) = repo
        .list_customers(CustomerListQuery::new().assigned_to(staff.id))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(visible[0].customer_code, "C1");
    assert_eq!(visible[0].assigned_user_ids, vec![staff.id]);

    let (total, _) = repo.list_customers(CustomerListQuery::new()).unwrap();
    assert_eq!(total, 2);
}
