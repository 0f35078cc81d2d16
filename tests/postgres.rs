use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;

use quotes::config::get_variable;
use quotes::db::{Db, PgDb};
use quotes::errors::QuotesError;
use quotes::quote::{GeoPoint, NewQuote, RandKey, Submission};
use quotes::selector;

const SCHEMA: &str = "quotes_test";
const MIGRATION: &str = include_str!("../migrations/2021-06-01-000000_create_quotes/up.sql");

/// Runs against `QUOTES_DB_CONNECTION_STRING` inside a scratch schema that
/// is dropped afterwards. Skipped when the variable is not set.
#[tokio::test]
async fn postgres_store() {
    dotenv::dotenv().ok();

    let connection_string = match get_variable("QUOTES_DB_CONNECTION_STRING") {
        Ok(s) => s,
        Err(e) => {
            eprintln!("skipping PostgreSQL tests: {}", e);
            return;
        }
    };

    let pool = make_pool(&connection_string).await;
    pool.execute(format!("DROP SCHEMA IF EXISTS {} CASCADE", SCHEMA).as_str())
        .await
        .expect("drop old schema");
    pool.execute(format!("CREATE SCHEMA {}", SCHEMA).as_str())
        .await
        .expect("create schema");
    pool.execute(MIGRATION).await.expect("apply migration");

    let db = PgDb::new(pool.clone());

    picks_with_wrap_around(&db).await;
    stores_origin_location(&db).await;
    schema_rejects_bad_rows(&pool).await;
    half_set_location_is_decode_error(&db, &pool).await;

    pool.execute(format!("DROP SCHEMA {} CASCADE", SCHEMA).as_str())
        .await
        .expect("drop schema");
}

async fn picks_with_wrap_around(db: &PgDb) {
    let key = |v| RandKey::new(v).expect("valid key");

    assert!(selector::pick(db, key(0.5))
        .await
        .expect("pick from empty table")
        .is_none());

    seed(db, "Low", 0.2).await;
    seed(db, "High", 0.7).await;

    let picked = selector::pick(db, key(0.5))
        .await
        .expect("pick at r = 0.5")
        .expect("a quote at or above 0.5");
    assert_eq!(picked.name(), "High");
    assert_eq!(picked.rand().value(), 0.7);

    let picked = selector::pick(db, key(0.9))
        .await
        .expect("pick at r = 0.9")
        .expect("wrapped-around quote");
    assert_eq!(picked.name(), "Low");
    assert_eq!(picked.rand().value(), 0.2);

    let picked = selector::pick(db, key(0.2))
        .await
        .expect("pick at r = 0.2")
        .expect("exact match");
    assert_eq!(picked.name(), "Low");
}

async fn stores_origin_location(db: &PgDb) {
    let id = seed(db, "Origin", 0.4).await;

    let quote = db
        .retrieve(id)
        .await
        .expect("retrieve quote")
        .expect("quote must exist");
    assert_eq!(quote.quote(), "said by Origin");
    assert_eq!(quote.location(), Some(GeoPoint::origin()));
    assert_eq!(quote.latitude(), Some(0.0));
    assert_eq!(quote.longitude(), Some(0.0));

    assert!(db.retrieve(id + 1000).await.expect("retrieve").is_none());
}

async fn schema_rejects_bad_rows(pool: &PgPool) {
    let error = insert_raw(pool, "0.5", "1.0", "NULL")
        .await
        .expect_err("latitude without longitude");
    assert!(
        error.to_string().contains("quotes_complete_location"),
        "{}",
        error
    );

    let error = insert_raw(pool, "1.0", "NULL", "NULL")
        .await
        .expect_err("rand of 1");
    assert!(error.to_string().contains("quotes_rand_range"), "{}", error);

    let error = insert_raw(pool, "-0.1", "NULL", "NULL")
        .await
        .expect_err("negative rand");
    assert!(error.to_string().contains("quotes_rand_range"), "{}", error);
}

async fn half_set_location_is_decode_error(db: &PgDb, pool: &PgPool) {
    pool.execute("ALTER TABLE quotes DROP CONSTRAINT quotes_complete_location")
        .await
        .expect("drop location constraint");

    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO quotes (quote, name, city, state, rand, latitude, longitude) \
         VALUES ('half', 'Half', 'Nowhere', 'NA', 0.99, 1.0, NULL) RETURNING id",
    )
    .fetch_one(pool)
    .await
    .expect("insert half-set location");

    match db.retrieve(id).await {
        Err(QuotesError::Sqlx { source }) => {
            assert!(
                source.to_string().contains("incomplete location"),
                "{}",
                source
            );
        }
        other => panic!("expected decode error, got {:?}", other),
    }
}

async fn make_pool(connection_string: &str) -> PgPool {
    PgPoolOptions::new()
        .max_connections(1)
        .after_connect(|conn| {
            Box::pin(async move {
                conn.execute(format!("SET search_path TO {}", SCHEMA).as_str())
                    .await?;
                Ok(())
            })
        })
        .connect(connection_string)
        .await
        .expect("create PgPool from QUOTES_DB_CONNECTION_STRING")
}

async fn insert_raw(
    pool: &PgPool,
    rand: &str,
    latitude: &str,
    longitude: &str,
) -> Result<(), sqlx::Error> {
    let statement = format!(
        "INSERT INTO quotes (quote, name, city, state, rand, latitude, longitude) \
         VALUES ('raw', 'Raw', 'Nowhere', 'NA', {}, {}, {})",
        rand, latitude, longitude
    );

    pool.execute(statement.as_str()).await.map(|_| ())
}

async fn seed(db: &PgDb, name: &str, rand: f64) -> i64 {
    let submission = Submission {
        quote: format!("said by {}", name),
        name: name.to_owned(),
        city: "Rome".to_owned(),
        state: "LZ".to_owned(),
    };
    let rand = RandKey::new(rand).expect("valid key");

    db.insert(NewQuote::new(submission, rand))
        .await
        .expect("insert quote")
        .id()
}
