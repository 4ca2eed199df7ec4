use fauxrm::{Filter, Query, Value};
use tests::{assert_err, setup::SQLITE_NO_RETURNING, Test};

#[tokio::test]
async fn insert_then_truncate() {
    for n in [0, 1, 25] {
        let Test { mut db, .. } = Test::new().await;
        let phonebook = db.table("phonebook").await.unwrap();

        for i in 0..n {
            phonebook
                .save(
                    &mut db,
                    [("first_name", format!("first {i}")), ("last_name", format!("last {i}"))],
                )
                .await
                .unwrap();
        }

        assert_eq!(phonebook.count(&mut db, Filter::All).await.unwrap(), n);
        assert_eq!(phonebook.truncate(&mut db).await.unwrap(), n);
        assert_eq!(phonebook.count(&mut db, Filter::All).await.unwrap(), 0);
    }
}

#[tokio::test]
async fn delete_where_requires_a_filter() {
    let Test { mut db, log } = Test::new().await;
    let phonebook = db.table("phonebook").await.unwrap();

    for last in ["Lovelace", "Hopper", "Liskov"] {
        phonebook.save(&mut db, [("last_name", last)]).await.unwrap();
    }
    log.clear();

    let err = assert_err!(phonebook.delete_where(&mut db, Filter::All).await);
    assert!(err.is_invalid_statement());
    let err = assert_err!(phonebook.delete_where(&mut db, Query::new()).await);
    assert!(err.is_invalid_statement());
    assert!(log.is_empty());

    let deleted = phonebook
        .delete_where(&mut db, [("last_name___like", "L%")])
        .await
        .unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(log.sql(), ["delete from phonebook where last_name like :last_name"]);
    assert_eq!(phonebook.count(&mut db, Filter::All).await.unwrap(), 1);
}

#[tokio::test]
async fn generated_values_without_returning_are_looked_up() {
    let Test { mut db, log } = Test::with_capability(&SQLITE_NO_RETURNING).await;
    let phonebook = db.table("phonebook").await.unwrap();

    phonebook.save(&mut db, [("last_name", "Hopper")]).await.unwrap();
    let row = phonebook.save(&mut db, [("last_name", "Liskov")]).await.unwrap();

    assert_eq!(row.get_as::<String>("last_name").unwrap(), "Liskov");
    assert_eq!(row.get_as::<i64>("id").unwrap(), 2);

    let sql = log.sql();
    assert_eq!(
        &sql[sql.len() - 3..],
        [
            "insert into phonebook (last_name) values (:last_name)",
            "select max(id) as gen_col from phonebook",
            "select * from phonebook where id = :id limit 1",
        ]
    );
}

#[tokio::test]
async fn commit_and_rollback() {
    let Test { mut db, log } = Test::new().await;
    let phonebook = db.table("phonebook").await.unwrap();

    phonebook.save(&mut db, [("last_name", "Hopper")]).await.unwrap();
    db.commit().await.unwrap();

    phonebook.save(&mut db, [("last_name", "Liskov")]).await.unwrap();
    assert_eq!(phonebook.count(&mut db, Filter::All).await.unwrap(), 2);
    db.rollback().await.unwrap();

    assert_eq!(phonebook.count(&mut db, Filter::All).await.unwrap(), 1);
    assert!(log.has_commit());
    assert!(log.has_rollback());
}

#[tokio::test]
async fn integrity_violations_roll_back() {
    let Test { mut db, log } = Test::new().await;
    let members = db.table("band_members").await.unwrap();

    members
        .save(
            &mut db,
            [("band_name", "Rush"), ("last_name", "Peart"), ("instrument", "drums")],
        )
        .await
        .unwrap();

    let err = assert_err!(
        db.execute(
            "insert into band_members (band_name, last_name, instrument) values (:band, :last, :instrument)",
            [("band", "Rush"), ("last", "Peart"), ("instrument", "drums")],
        )
        .await
    );
    assert!(err.is_integrity_violation());
    assert!(log.has_rollback());

    // the uncommitted insert went with the rollback
    assert_eq!(members.count(&mut db, Filter::All).await.unwrap(), 0);
}

#[tokio::test]
async fn backend_errors_carry_the_statement() {
    let Test { mut db, log } = Test::new().await;

    let err = assert_err!(
        db.execute_query("select * from no_such_table where id = :id", [("id", 1)])
            .await
    );
    assert!(err.is_backend());
    assert_eq!(err.sql(), Some("select * from no_such_table where id = :id"));
    assert!(err.to_string().starts_with("database error with statement `select * from no_such_table"));
    assert!(log.has_rollback());
}

#[tokio::test]
async fn raw_queries_return_detached_rows() {
    let Test { mut db, .. } = Test::new().await;
    let phonebook = db.table("phonebook").await.unwrap();

    for last in ["Lovelace", "Hopper"] {
        phonebook.save(&mut db, [("last_name", last)]).await.unwrap();
    }

    let rows = db
        .execute_query(
            "select last_name, length(last_name) as len from phonebook where last_name <> :skip order by last_name",
            [("skip", Value::from("Hopper"))],
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_as::<String>("last_name").unwrap(), "Lovelace");
    assert_eq!(rows[0].get_as::<i64>("len").unwrap(), 8);
    assert!(rows[0].schema().is_none());

    let mut row = rows.into_iter().next().unwrap();
    assert!(assert_err!(row.save(&mut db).await).is_invalid_statement());
}

#[tokio::test]
async fn default_owner_qualifies_names() {
    let mut builder = fauxrm::Db::builder();
    builder.default_owner("MAIN");
    let Test { mut db, .. } = Test::with_builder(builder).await;

    let phonebook = db.table("phonebook").await.unwrap();
    assert_eq!(phonebook.name().to_string(), "main.phonebook");

    let row = phonebook.save(&mut db, [("last_name", "Hopper")]).await.unwrap();
    assert_eq!(row.schema().unwrap().name.to_string(), "main.phonebook");
}

#[tokio::test]
async fn find_limit_caps_rows() {
    let Test { mut db, log } = Test::new().await;
    let phonebook = db.table("phonebook").await.unwrap();

    for last in ["Lovelace", "Hopper", "Liskov", "Lamport"] {
        phonebook.save(&mut db, [("last_name", last)]).await.unwrap();
    }
    log.clear();

    let rows = phonebook
        .find_limit(&mut db, [("last_name___like", "L%")], 2)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(log.sql()[0].ends_with("limit 2"));

    let names = db.view("phonebook_names").await.unwrap();
    let rows = names.find_limit(&mut db, Filter::All, 10).await.unwrap();
    assert_eq!(rows.len(), 4);
}

#[tokio::test]
async fn sql_functions() {
    let Test { mut db, log } = Test::new().await;

    let value = db.execute_function("upper", ["hopper"]).await.unwrap();
    assert_eq!(value, Value::from("HOPPER"));
    assert_eq!(log.sql()[0], "select upper(:a_0) as result");

    let value = db
        .execute_function("trunc", [Value::from("2024-03-01 09:30:00")])
        .await
        .unwrap();
    assert_eq!(value, Value::from("2024-03-01 00:00:00"));

    let value = db
        .execute_function("coalesce", [Value::Null, Value::from(7)])
        .await
        .unwrap();
    assert_eq!(value, Value::I64(7));

    log.clear();
    let err = assert_err!(
        db.execute_function("upper(1)); drop table phonebook; --", ["x"])
            .await
    );
    assert!(err.is_invalid_statement());
    assert!(log.is_empty());

    let err = assert_err!(db.execute_function("no_such_function", ["x"]).await);
    assert!(err.is_backend());
}

#[tokio::test]
async fn sql_files() {
    let Test { mut db, .. } = Test::new().await;
    let phonebook = db.table("phonebook").await.unwrap();

    for last in ["Lovelace", "Hopper", "Liskov"] {
        phonebook.save(&mut db, [("last_name", last)]).await.unwrap();
    }

    let path = std::env::temp_dir().join(format!("fauxrm-sql-file-{}.sql", std::process::id()));
    std::fs::write(
        &path,
        "select last_name from phonebook\nwhere last_name like 'L%'\norder by last_name;\n",
    )
    .unwrap();

    let rows = db.execute_file(&path).await.unwrap();
    std::fs::remove_file(&path).unwrap();

    let names: Vec<String> = rows
        .iter()
        .map(|row| row.get_as("last_name").unwrap())
        .collect();
    assert_eq!(names, ["Liskov", "Lovelace"]);
    assert!(rows[0].schema().is_none());

    let missing = std::env::temp_dir().join("fauxrm-no-such-file.sql");
    assert_err!(db.execute_file(&missing).await);
}
