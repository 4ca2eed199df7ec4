use chrono::NaiveDate;
use fauxrm::{Db, Expr, Query, Row, Table, Value};
use tests::Test;

const PATIENTS: &[(&str, &str, i64, f64, (i32, u32, u32))] = &[
    ("Ada", "Lovelace", 36, 120.5, (2024, 3, 1)),
    ("Grace", "Hopper", 85, 110.0, (2024, 3, 1)),
    ("Alan", "Turing", 41, 150.25, (2024, 3, 2)),
    ("Edsger", "Dijkstra", 72, 160.0, (2024, 3, 5)),
    ("Barbara", "Liskov", 30, 125.75, (2024, 3, 5)),
];

async fn seed(db: &mut Db) -> Table {
    let medical = db.table("medical").await.unwrap();

    for (index, (first, last, age, weight, (y, m, d))) in PATIENTS.iter().enumerate() {
        let visit = NaiveDate::from_ymd_opt(*y, *m, *d)
            .unwrap()
            .and_hms_opt(9 + index as u32, 30, 0)
            .unwrap();

        medical
            .save(
                db,
                [
                    ("first_name", Value::from(*first)),
                    ("last_name", Value::from(*last)),
                    ("age", Value::from(*age)),
                    ("weight", Value::from(*weight)),
                    ("visit_date", Value::from(visit)),
                ],
            )
            .await
            .unwrap();
    }

    medical
}

fn last_names(rows: &[Row]) -> Vec<String> {
    let mut names: Vec<String> = rows
        .iter()
        .map(|row| row.get_as::<String>("last_name").unwrap())
        .collect();
    names.sort();
    names
}

async fn find(db: &mut Db, medical: &Table, filter: impl Into<fauxrm::Filter>) -> Vec<String> {
    last_names(&medical.find(db, filter).await.unwrap())
}

#[tokio::test]
async fn comparison_operators() {
    let Test { mut db, .. } = Test::new().await;
    let medical = seed(&mut db).await;

    assert_eq!(find(&mut db, &medical, [("age___gt", 72)]).await, ["Hopper"]);
    assert_eq!(find(&mut db, &medical, [("age___gte", 72)]).await, ["Dijkstra", "Hopper"]);
    assert_eq!(find(&mut db, &medical, [("age___lt", 36)]).await, ["Liskov"]);
    assert_eq!(find(&mut db, &medical, [("age___lte", 36)]).await, ["Liskov", "Lovelace"]);
    assert_eq!(
        find(&mut db, &medical, [("age___ne", 36)]).await,
        ["Dijkstra", "Hopper", "Liskov", "Turing"]
    );
    assert_eq!(find(&mut db, &medical, [("weight___gt", 150.0)]).await, ["Dijkstra", "Turing"]);
    assert_eq!(find(&mut db, &medical, [("age___gte", 30), ("age___lte", 40)]).await, ["Liskov", "Lovelace"]);
}

#[tokio::test]
async fn pattern_operators() {
    let Test { mut db, .. } = Test::new().await;
    let medical = seed(&mut db).await;

    assert_eq!(find(&mut db, &medical, [("last_name___like", "L%")]).await, ["Liskov", "Lovelace"]);
    assert_eq!(
        find(&mut db, &medical, [("last_name___nlike", "L%")]).await,
        ["Dijkstra", "Hopper", "Turing"]
    );
}

#[tokio::test]
async fn list_operators() {
    let Test { mut db, .. } = Test::new().await;
    let medical = seed(&mut db).await;

    let ages = Value::list([36_i64, 41, 99]);
    assert_eq!(find(&mut db, &medical, [("age", ages.clone())]).await, ["Lovelace", "Turing"]);
    assert_eq!(find(&mut db, &medical, [("age___in", ages.clone())]).await, ["Lovelace", "Turing"]);
    assert_eq!(
        find(&mut db, &medical, [("age___nin", ages.clone())]).await,
        ["Dijkstra", "Hopper", "Liskov"]
    );
    assert_eq!(
        find(&mut db, &medical, [("age___ne", ages)]).await,
        ["Dijkstra", "Hopper", "Liskov"]
    );

    let empty = Value::list(Vec::<i64>::new());
    assert!(find(&mut db, &medical, [("age___in", empty.clone())]).await.is_empty());
    assert_eq!(find(&mut db, &medical, [("age___nin", empty)]).await.len(), 5);
}

#[tokio::test]
async fn oversized_in_list_runs_against_the_database() {
    let Test { mut db, log } = Test::new().await;
    let medical = seed(&mut db).await;
    log.clear();

    let ages = Value::list(0..2500_i64);
    let rows = medical.find(&mut db, [("age", ages)]).await.unwrap();
    assert_eq!(rows.len(), 5);

    let op = log.query_sql().pop().unwrap();
    assert_eq!(op.params.len(), 2500);
    assert_eq!(op.sql.matches("age in (").count(), 3);
}

#[tokio::test]
async fn null_checks() {
    let Test { mut db, .. } = Test::new().await;
    let medical = seed(&mut db).await;

    medical
        .save(&mut db, [("first_name", Value::from("Anonymous")), ("age", Value::Null)])
        .await
        .unwrap();

    let rows = medical.find(&mut db, [("age", Value::Null)]).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_opt::<String>("last_name").unwrap(), None);

    assert_eq!(medical.count(&mut db, [("age___ne", Value::Null)]).await.unwrap(), 5);

    let err = medical.find(&mut db, [("age___gt", Value::Null)]).await.unwrap_err();
    assert!(err.is_invalid_operator());
}

#[tokio::test]
async fn truncated_dates() {
    let Test { mut db, .. } = Test::new().await;
    let medical = seed(&mut db).await;

    let march_1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let march_5 = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

    assert_eq!(
        find(&mut db, &medical, [("visit_date___trunc", march_1)]).await,
        ["Hopper", "Lovelace"]
    );
    assert_eq!(
        find(&mut db, &medical, [("visit_date___trunc___lt", march_5)]).await,
        ["Hopper", "Lovelace", "Turing"]
    );
    assert_eq!(
        find(&mut db, &medical, [("visit_date___trunc___in", Value::list([march_1, march_5]))]).await,
        ["Dijkstra", "Hopper", "Liskov", "Lovelace"]
    );

    // without truncation the time of day counts
    assert!(find(&mut db, &medical, [("visit_date", march_1)]).await.is_empty());

    let row = medical.find_one(&mut db, [("last_name", "Turing")]).await.unwrap().unwrap();
    let visit: chrono::NaiveDateTime = row.get_as("visit_date").unwrap();
    assert_eq!(visit.date(), NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
}

#[tokio::test]
async fn composed_expressions() {
    let Test { mut db, log } = Test::new().await;
    let medical = seed(&mut db).await;
    log.clear();

    // (age < 35 or age > 80) and weight > 115
    let extremes = Query::or().field("age___lt", 35).field("age___gt", 80).build().unwrap();
    let heavy = Query::new().field("weight___gt", 115.0).build().unwrap();

    let expr: Expr = heavy & extremes;
    assert_eq!(find(&mut db, &medical, expr).await, ["Liskov"]);

    // the same column on both sides binds distinct parameters
    let young = Query::new().field("age___lt", 40).build().unwrap();
    let old = Query::new().field("age___gt", 80).build().unwrap();
    let either = young | old;
    assert_eq!(either.sql(), "(age < :age or (age > :age__1))");
    assert_eq!(find(&mut db, &medical, either).await, ["Hopper", "Liskov", "Lovelace"]);

    let nested = Query::and()
        .field("last_name___like", "%o%")
        .expr(Query::or().field("age", 36).field("age", 85).build().unwrap());
    assert_eq!(find(&mut db, &medical, nested).await, ["Hopper", "Lovelace"]);

    // a plain builder ANDs its fields but ORs what is nested in it
    let either = Query::new()
        .field("last_name___like", "%o%")
        .expr(Query::new().field("age", 41).build().unwrap());
    assert_eq!(
        find(&mut db, &medical, either).await,
        ["Hopper", "Liskov", "Lovelace", "Turing"]
    );

    assert_eq!(log.failures(), 0);
}

#[tokio::test]
async fn or_group_on_the_left_keeps_its_meaning() {
    let Test { mut db, log } = Test::new().await;
    let medical = seed(&mut db).await;
    log.clear();

    let extremes = || {
        Query::or()
            .field("age___lt", 35)
            .field("age___gt", 80)
            .build()
            .unwrap()
    };
    let hopper = || Query::new().field("last_name", "Hopper").build().unwrap();

    // (age < 35 or age > 80) and last_name = 'Hopper'
    let expr = extremes() & hopper();
    assert_eq!(
        expr.sql(),
        "((age < :age or age > :age__1) and (last_name = :last_name))"
    );
    assert_eq!(find(&mut db, &medical, expr).await, ["Hopper"]);

    let heavy = Query::new().field("weight___gt", 115.0).build().unwrap();
    assert_eq!(find(&mut db, &medical, extremes() & heavy).await, ["Liskov"]);

    let nested = Query::and().expr(extremes()).expr(hopper());
    assert_eq!(find(&mut db, &medical, nested).await, ["Hopper"]);

    assert_eq!(log.failures(), 0);
}

#[tokio::test]
async fn cursor_batches_and_restarts() {
    let mut builder = Db::builder();
    builder.fetch_batch_size(2);
    let Test { mut db, log } = Test::with_builder(builder).await;
    let medical = seed(&mut db).await;
    log.clear();

    let mut cursor = medical.cursor(&mut db, [("age___gte", 0)]).unwrap();
    assert_eq!(cursor.batch_size(), 2);

    let sizes = [
        cursor.next_batch().await.unwrap().len(),
        cursor.next_batch().await.unwrap().len(),
        cursor.next_batch().await.unwrap().len(),
        cursor.next_batch().await.unwrap().len(),
    ];
    assert_eq!(sizes, [2, 2, 1, 0]);

    cursor.restart();
    let rows: Vec<Row> = cursor.collect().await.unwrap();
    assert_eq!(rows.len(), 5);

    // one statement per run
    assert_eq!(log.len(), 2);
}
