use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::Integer;

mod common;

#[derive(QueryableByName)]
struct Pragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

#[test]
fn test_creates_and_removes_db_files() {
    let base = "test_creates_and_removes_db_files.db";

    {
        let test_db = common::TestDb::new(base);
        let conn = test_db.pool().get();
        assert!(conn.is_ok());
    }

    let db_path = std::path::Path::new(base);
    assert!(!db_path.exists());
    assert!(!std::path::Path::new(&format!("{base}-shm")).exists());
    assert!(!std::path::Path::new(&format!("{base}-wal")).exists());
}

#[test]
fn test_connections_enforce_foreign_keys() {
    let test_db = common::TestDb::new("test_connections_enforce_foreign_keys.db");
    let mut conn = test_db.pool().get().expect("connection");

    let pragma: Pragma = diesel::sql_query("PRAGMA foreign_keys")
        .get_result(&mut conn)
        .expect("pragma");
    assert_eq!(pragma.foreign_keys, 1);

    let orphan = conn.batch_execute(
        "INSERT INTO order_lines (order_id, line_no, product_id, quantity, unit_price, \
         discount_percentage, discount_amount, tax_percentage, tax_amount, line_total) \
         VALUES (999, 1, 999, 1, 1, 0, 0, 0, 0, 1)",
    );
    assert!(orphan.is_err());
}
