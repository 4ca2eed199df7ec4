//! SQLite-backed fixtures shared by the integration tests.

use crate::{ExecLog, LoggingDriver};

use fauxrm::{db::Builder, Db, Result, Value};
use fauxrm_core::driver::{Capability, Flavor};
use fauxrm_driver_sqlite::Sqlite;

/// SQLite without `returning`, so inserts fall back to the max lookup.
pub static SQLITE_NO_RETURNING: Capability = Capability {
    flavor: Flavor::Sqlite,
    select_for_update: false,
    returning: false,
    max_in_list: 1000,
};

const NO_PARAMS: [(&str, Value); 0] = [];

const SCHEMA: &[&str] = &[
    "create table phonebook (
        id integer primary key autoincrement not null,
        first_name varchar2(50),
        last_name varchar2(50) not null,
        phone varchar2(20)
    )",
    "create view phonebook_names as select first_name, last_name from phonebook",
    "create table band_members (
        band_name varchar2(100) not null,
        first_name varchar2(50),
        last_name varchar2(50) not null,
        instrument varchar2(50) not null,
        primary key (band_name, last_name, instrument)
    )",
    "create table sessions (
        user_name varchar2(50),
        device varchar2(50),
        primary key (user_name, device)
    )",
    "create table medical (
        id integer primary key,
        first_name varchar2(50),
        last_name varchar2(50),
        age number,
        weight float,
        visit_date date
    )",
    "create table lobs (
        id integer primary key,
        title varchar2(100),
        doc clob,
        image blob
    )",
    "create table audit_log (
        message varchar2(200) not null,
        logged_at timestamp
    )",
];

/// A connected database with the test schema and a log of every operation
/// sent to it after setup.
pub struct Test {
    pub db: Db,
    pub log: ExecLog,
}

impl Test {
    pub async fn new() -> Test {
        Test::with(Db::builder(), None).await
    }

    pub async fn with_builder(builder: Builder) -> Test {
        Test::with(builder, None).await
    }

    /// Connects reporting `capability` in place of SQLite's own.
    pub async fn with_capability(capability: &'static Capability) -> Test {
        Test::with(Db::builder(), Some(capability)).await
    }

    async fn with(mut builder: Builder, capability: Option<&'static Capability>) -> Test {
        crate::init_tracing();

        let mut driver = LoggingDriver::new(Box::new(Sqlite::in_memory()));
        if let Some(capability) = capability {
            driver = driver.with_capability(capability);
        }
        let log = ExecLog::new(driver.ops_log_handle());

        let mut db = builder.build(driver).await.unwrap();
        create_schema(&mut db).await.unwrap();

        log.clear();
        Test { db, log }
    }
}

async fn create_schema(db: &mut Db) -> Result<()> {
    for ddl in SCHEMA {
        db.execute(ddl, NO_PARAMS).await?;
    }
    db.commit().await
}
