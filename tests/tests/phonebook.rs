use fauxrm::{Cell, Key, Model, Value};
use tests::{assert_err, assert_none, assert_ok, assert_some, Test};

#[tokio::test]
async fn crud() {
    let Test { mut db, log } = Test::new().await;
    let phonebook = db.table("phonebook").await.unwrap();

    let ada = phonebook
        .save(
            &mut db,
            [("first_name", "Ada"), ("last_name", "Lovelace"), ("phone", "555-0100")],
        )
        .await
        .unwrap();

    let id: i64 = ada.get_as("id").unwrap();
    assert!(!ada.is_new());
    assert_eq!(ada.get_as::<String>("last_name").unwrap(), "Lovelace");

    // inserts read the generated key back in the same statement
    assert_eq!(log.len(), 1);
    assert!(log.sql()[0].ends_with("returning *"));

    let found = assert_some!(phonebook.get(&mut db, id).await.unwrap());
    assert_eq!(found, ada);
    assert_eq!(found.get_as::<String>("phone").unwrap(), "555-0100");

    let mut row = found;
    row.set("phone", "555-0199").unwrap();
    row.save(&mut db).await.unwrap();
    assert_eq!(row.get_as::<i64>("id").unwrap(), id);

    let reread = assert_some!(phonebook.find_one(&mut db, [("last_name", "Lovelace")]).await.unwrap());
    assert_eq!(reread.get_as::<String>("phone").unwrap(), "555-0199");

    row.delete(&mut db).await.unwrap();
    assert!(row.is_new());
    assert_none!(phonebook.get(&mut db, id).await.unwrap());
    assert_eq!(phonebook.count(&mut db, fauxrm::Filter::All).await.unwrap(), 0);
}

#[tokio::test]
async fn save_with_existing_key_updates() {
    let Test { mut db, .. } = Test::new().await;
    let phonebook = db.table("phonebook").await.unwrap();

    let grace = phonebook
        .save(&mut db, [("first_name", "Grace"), ("last_name", "Hopper")])
        .await
        .unwrap();
    let id = grace.get_as::<i64>("id").unwrap();

    let updated = phonebook
        .save(
            &mut db,
            [
                ("ID", Value::from(id)),
                ("Last_Name", Value::from("Hopper")),
                ("phone", Value::from("555-0142")),
            ],
        )
        .await
        .unwrap();

    assert_eq!(updated, grace);
    assert_eq!(updated.get_as::<String>("first_name").unwrap(), "Grace");
    assert_eq!(updated.get_as::<String>("phone").unwrap(), "555-0142");
    assert_eq!(phonebook.count(&mut db, fauxrm::Filter::All).await.unwrap(), 1);
}

#[tokio::test]
async fn new_row_placeholders() {
    let Test { mut db, .. } = Test::new().await;
    let phonebook = db.table("phonebook").await.unwrap();

    let mut row = phonebook.new_row([("last_name", "Hamilton")]).unwrap();
    assert!(row.is_new());
    assert_eq!(row.cell("id"), Some(&Cell::Generated));
    assert_eq!(row.cell("first_name"), Some(&Cell::Unset));
    assert_eq!(row.fields().collect::<Vec<_>>(), ["id", "first_name", "last_name", "phone"]);

    row.set("first_name", "Margaret").unwrap();
    row.save(&mut db).await.unwrap();

    assert!(!row.is_new());
    assert!(matches!(row.cell("id"), Some(Cell::Value(Value::I64(_)))));
    assert_eq!(row.get_opt::<String>("phone").unwrap(), None);
}

#[tokio::test]
async fn primary_key_change_replaces_row() {
    let Test { mut db, .. } = Test::new().await;
    let phonebook = db.table("phonebook").await.unwrap();

    let mut row = phonebook
        .save(&mut db, [("first_name", "Alan"), ("last_name", "Turing")])
        .await
        .unwrap();
    let old_id = row.get_as::<i64>("id").unwrap();

    row.set("id", 1000).unwrap();
    row.save(&mut db).await.unwrap();

    assert_eq!(row.get_as::<i64>("id").unwrap(), 1000);
    assert_none!(phonebook.get(&mut db, old_id).await.unwrap());
    assert_some!(phonebook.get(&mut db, 1000).await.unwrap());
    assert_eq!(phonebook.count(&mut db, fauxrm::Filter::All).await.unwrap(), 1);
}

#[tokio::test]
async fn validation_happens_before_sql() {
    let Test { mut db, log } = Test::new().await;
    let phonebook = db.table("phonebook").await.unwrap();

    let err = assert_err!(phonebook.save(&mut db, [("first_name", "Edsger")]).await);
    assert!(err.is_nullability_violation());
    assert_eq!(err.to_string(), "field `last_name` cannot be null");

    let err = assert_err!(
        phonebook
            .save(&mut db, [("first_name", Value::from(223.13)), ("last_name", Value::from("Dijkstra"))])
            .await
    );
    assert!(err.is_type_mismatch());

    let err = assert_err!(phonebook.save(&mut db, [("fax", "555-0111")]).await);
    assert!(err.is_unknown_field());

    let err = assert_err!(phonebook.find(&mut db, [("last_name___between", "D")]).await);
    assert!(err.is_unknown_field());

    let err = assert_err!(phonebook.find(&mut db, [("last_name___trunc___like", "D%")]).await);
    assert!(err.is_invalid_operator());

    assert!(log.is_empty());
}

#[tokio::test]
async fn views_are_read_only() {
    let Test { mut db, .. } = Test::new().await;

    let phonebook = db.table("phonebook").await.unwrap();
    for (first, last) in [("Ada", "Lovelace"), ("Grace", "Hopper")] {
        phonebook
            .save(&mut db, [("first_name", first), ("last_name", last)])
            .await
            .unwrap();
    }

    let model = db.model("PHONEBOOK_NAMES").await.unwrap();
    assert!(model.is_view());
    assert!(!model.schema().primary_key.exists());

    let Model::View(names) = model else {
        panic!("expected a view")
    };

    let rows = names.find(&mut db, [("last_name___like", "%o%")]).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(names.count(&mut db, [("first_name", "Ada")]).await.unwrap(), 1);

    let err = assert_err!(db.table("phonebook_names").await);
    assert!(err.is_invalid_statement());

    let mut row = rows.into_iter().next().unwrap();
    row.set("first_name", "Augusta").unwrap();
    assert!(assert_err!(row.save(&mut db).await).is_invalid_statement());

    let err = assert_err!(db.table("missing").await);
    assert!(err.is_invalid_schema());
}

#[tokio::test]
async fn keyless_get_is_refused() {
    let Test { mut db, log } = Test::new().await;
    let audit = db.table("audit_log").await.unwrap();

    let err = assert_err!(audit.get(&mut db, Key::from("anything")).await);
    assert!(err.is_invalid_statement());
    assert!(log.is_empty());

    let row = audit
        .save(&mut db, [("message", "started")])
        .await
        .unwrap();
    assert_eq!(row.key(), None);
    assert_ok!(row.get_opt::<String>("logged_at"));
}

#[tokio::test]
async fn keyless_rows_cannot_be_updated() {
    let Test { mut db, log } = Test::new().await;
    let audit = db.table("audit_log").await.unwrap();

    audit.save(&mut db, [("message", "started")]).await.unwrap();
    log.clear();

    let mut row = assert_some!(audit.find_one(&mut db, [("message", "started")]).await.unwrap());
    row.set("message", "restarted").unwrap();

    let err = assert_err!(row.save(&mut db).await);
    assert!(err.is_invalid_statement());
    assert_eq!(log.len(), 1);

    assert_eq!(audit.count(&mut db, fauxrm::Filter::All).await.unwrap(), 1);
    assert_eq!(audit.count(&mut db, [("message", "restarted")]).await.unwrap(), 0);
}

#[tokio::test]
async fn nedry_has_no_phone() {
    let Test { mut db, .. } = Test::new().await;
    let phonebook = db.table("phonebook").await.unwrap();

    phonebook
        .save(&mut db, [("first_name", "Ada"), ("last_name", "Lovelace"), ("phone", "555-0100")])
        .await
        .unwrap();

    let mut nedry = phonebook
        .new_row([("first_name", "Dennis"), ("last_name", "Nedry")])
        .unwrap();
    assert!(nedry.is_new());
    nedry.save(&mut db).await.unwrap();

    let id: i64 = nedry.get_as("id").unwrap();
    assert!(id > 0);
    assert_eq!(nedry.get("phone"), Some(&Value::Null));

    let found = phonebook.find(&mut db, [("phone", Value::Null)]).await.unwrap();
    assert_eq!(found, [nedry]);
    assert_eq!(found[0].get_as::<String>("last_name").unwrap(), "Nedry");
}

#[tokio::test]
async fn key_change_writes_before_deleting() {
    let Test { mut db, log } = Test::new().await;
    let phonebook = db.table("phonebook").await.unwrap();

    let mut row = phonebook
        .save(&mut db, [("first_name", "Alan"), ("last_name", "Turing")])
        .await
        .unwrap();
    log.clear();

    row.set("id", 2000).unwrap();
    row.save(&mut db).await.unwrap();

    let sql = log.sql();
    let insert = sql.iter().position(|sql| sql.starts_with("insert into phonebook"));
    let delete = sql.iter().position(|sql| sql.starts_with("delete from phonebook"));
    assert!(insert.unwrap() < delete.unwrap(), "{sql:#?}");

    assert_eq!(phonebook.count(&mut db, fauxrm::Filter::All).await.unwrap(), 1);
}

#[tokio::test]
async fn save_and_commit_survives_rollback() {
    let Test { mut db, log } = Test::new().await;
    let phonebook = db.table("phonebook").await.unwrap();

    let mut row = phonebook
        .new_row([("first_name", "Barbara"), ("last_name", "Liskov")])
        .unwrap();
    row.save_and_commit(&mut db).await.unwrap();
    assert!(log.has_commit());

    db.rollback().await.unwrap();
    assert_eq!(phonebook.count(&mut db, [("last_name", "Liskov")]).await.unwrap(), 1);
}
