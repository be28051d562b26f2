use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use crate::db::connect;

/// CRUD operations tests for the service entity and join tables
pub mod crud_tests;

/// Transaction handling around join-table rewrites
pub mod transaction_tests;

/// Connect and migrate, or `None` when no database is available.
pub(crate) async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}
