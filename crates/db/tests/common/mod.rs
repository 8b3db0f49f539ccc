use redraft_db::DbPool;

/// Create an in-memory database with all migrations applied.
///
/// Each call returns an isolated database, so tests never observe each
/// other's writes.
pub async fn setup_db() -> DbPool {
    let pool = redraft_db::create_memory_pool()
        .await
        .expect("create in-memory pool");
    redraft_db::run_migrations(&pool)
        .await
        .expect("run migrations");
    pool
}
