use diesel::RunQueryDsl;
use gf_persistence::config::DbConfig;
use gf_persistence::pg::build_pool;
mod test_support;

#[test]
fn pool_builds_and_migrations_are_idempotent() {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("skip (no DATABASE_URL)");
        return;
    }
    let cfg = DbConfig::from_env().expect("config");
    // dos pools seguidos: la segunda corrida de migraciones no debe fallar
    for _ in 0..2 {
        let pool = build_pool(&cfg.url, 1, 1).expect("pool");
        let mut conn = pool.get().expect("conn");
        diesel::sql_query("SELECT 1").execute(&mut conn).expect("ping");
    }
}

#[test]
fn tables_exist_after_migrations() {
    let Some(pool) = test_support::with_pool(|p| p.clone()) else {
        eprintln!("skip (no DATABASE_URL)");
        return;
    };
    let mut conn = pool.get().expect("conn");
    for table in ["flows_groups", "flows", "chain_transactions", "contract_events"] {
        diesel::sql_query(format!("SELECT 1 FROM {table} LIMIT 1")).execute(&mut conn)
                                                                   .unwrap_or_else(|e| panic!("{table}: {e}"));
    }
}
