//! Helpers for integration tests.

#![allow(dead_code)]

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use fieldsales::auth::AuthenticatedUser;
use fieldsales::db::{DbPool, establish_connection_pool};
use fieldsales::domain::customer::{Customer, NewCustomer};
use fieldsales::domain::product::{NewProduct, Product};
use fieldsales::domain::user::{NewUser, Role, User};
use fieldsales::repository::{CustomerWriter, DieselRepository, ProductWriter, UserWriter};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

pub fn user(repo: &DieselRepository, mobile_no: &str, role: Role) -> User {
    repo.create_user(&NewUser::new(mobile_no, format!("User {mobile_no}"), role, "not-a-hash"))
        .expect("create user")
}

/// Claims of `user` as a handler would see them.
pub fn claims(user: &User) -> AuthenticatedUser {
    AuthenticatedUser::new(user, 1)
}

pub fn customer(repo: &DieselRepository, new_customer: NewCustomer) -> Customer {
    repo.create_customer(&new_customer).expect("create customer")
}

pub fn product(repo: &DieselRepository, code: &str, gst_rate: f64) -> Product {
    repo.create_product(&NewProduct::new(code, format!("Product {code}")).with_gst_rate(gst_rate))
        .expect("create product")
}
