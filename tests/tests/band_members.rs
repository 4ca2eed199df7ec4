use fauxrm::{Key, Value};
use tests::{assert_err, assert_none, assert_some, Test};

const MEMBERS: &[(&str, &str, &str, &str)] = &[
    ("Rush", "Geddy", "Lee", "bass"),
    ("Rush", "Alex", "Lifeson", "guitar"),
    ("Rush", "Neil", "Peart", "drums"),
    ("Yes", "Chris", "Squire", "bass"),
];

async fn seed(test: &mut Test) -> fauxrm::Table {
    let members = test.db.table("band_members").await.unwrap();

    for (band, first, last, instrument) in MEMBERS {
        members
            .save(
                &mut test.db,
                [
                    ("band_name", *band),
                    ("first_name", *first),
                    ("last_name", *last),
                    ("instrument", *instrument),
                ],
            )
            .await
            .unwrap();
    }

    members
}

#[tokio::test]
async fn get_by_composite_key() {
    let mut test = Test::new().await;
    let members = seed(&mut test).await;
    let db = &mut test.db;

    assert!(members.schema().primary_key.is_composite());

    let neil = assert_some!(
        members
            .get(
                db,
                [("band_name", "Rush"), ("last_name", "Peart"), ("instrument", "drums")],
            )
            .await
            .unwrap()
    );
    assert_eq!(neil.get_as::<String>("first_name").unwrap(), "Neil");

    assert_none!(members
        .get(
            db,
            [("band_name", "Rush"), ("last_name", "Peart"), ("instrument", "keys")],
        )
        .await
        .unwrap());
}

#[tokio::test]
async fn incomplete_keys_are_refused() {
    let mut test = Test::new().await;
    let members = seed(&mut test).await;
    test.log.clear();

    let err = assert_err!(
        members
            .get(&mut test.db, [("band_name", "Rush"), ("last_name", "Peart")])
            .await
    );
    assert!(err.is_incomplete_key());

    let err = assert_err!(members.get(&mut test.db, "Rush").await);
    assert!(err.is_incomplete_key());

    let err = assert_err!(
        members
            .get(
                &mut test.db,
                [("band_name", "Rush"), ("last_name", "Peart"), ("first_name", "Neil")],
            )
            .await
    );
    assert!(err.is_incomplete_key());

    assert!(test.log.is_empty());
}

#[tokio::test]
async fn save_on_existing_key_updates_in_place() {
    let mut test = Test::new().await;
    let members = seed(&mut test).await;
    let db = &mut test.db;

    let row = members
        .save(
            db,
            [
                ("band_name", "Rush"),
                ("last_name", "Peart"),
                ("instrument", "drums"),
                ("first_name", "Neil Ellwood"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(row.get_as::<String>("first_name").unwrap(), "Neil Ellwood");
    assert_eq!(members.count(db, fauxrm::Filter::All).await.unwrap(), 4);
    assert_eq!(members.count(db, [("band_name", "Rush")]).await.unwrap(), 3);
}

#[tokio::test]
async fn ambiguous_keys_are_reported() {
    let Test { mut db, .. } = Test::new().await;
    let sessions = db.table("sessions").await.unwrap();

    // SQLite lets nullable primary key columns repeat null
    db.execute(
        "insert into sessions (user_name, device) values (null, :device), (null, :device)",
        [("device", "phone")],
    )
    .await
    .unwrap();

    let key = Key::from([("user_name", Value::Null), ("device", Value::from("phone"))]);
    let err = assert_err!(sessions.get(&mut db, key).await);
    assert!(err.is_ambiguous_key());
}
