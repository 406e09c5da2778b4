use diesel::RunQueryDsl;
use diesel::sql_types::Integer;

mod common;

#[derive(diesel::QueryableByName)]
struct Flag {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

#[test]
fn test_creates_and_removes_db_files() {
    let test_db = common::TestDb::new("test_creates_and_removes_db_files.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
}

#[test]
fn test_connections_enforce_foreign_keys() {
    let test_db = common::TestDb::new("test_connections_enforce_foreign_keys.db");
    let mut conn = test_db.pool().get().unwrap();

    let flag: Flag = diesel::sql_query("PRAGMA foreign_keys")
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(flag.foreign_keys, 1);
}
