use futures::future::BoxFuture;

use crate::errors::QuotesError;
use crate::quote::{Id, NewQuote, Quote, RandKey};

pub mod memory;

/// The record store holding quotes.
pub trait Db {
    /// Saves a quote, returning it with its assigned ID and timestamp.
    fn insert(&self, quote: NewQuote) -> BoxFuture<Result<Quote, QuotesError>>;

    fn retrieve(&self, id: Id) -> BoxFuture<Result<Option<Quote>, QuotesError>>;

    /// Returns the quote with the smallest key that is at least `key`.
    fn first_at_or_above(&self, key: RandKey) -> BoxFuture<Result<Option<Quote>, QuotesError>>;

    /// Returns the quote with the smallest key that is below `key`.
    fn first_below(&self, key: RandKey) -> BoxFuture<Result<Option<Quote>, QuotesError>>;
}

pub use self::postgres::*;

mod postgres {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use sqlx::{
        self,
        postgres::{PgPool, PgRow},
    };
    use time::OffsetDateTime;

    use crate::errors::QuotesError;
    use crate::quote::{GeoPoint, Id, NewQuote, Quote, RandKey};

    pub struct PgDb {
        pool: PgPool,
    }

    impl PgDb {
        pub fn new(pool: PgPool) -> Self {
            PgDb { pool }
        }
    }

    // these can be simplified once async functions in traits are stabilized
    impl super::Db for PgDb {
        fn insert(&self, new_quote: NewQuote) -> BoxFuture<Result<Quote, QuotesError>> {
            async move {
                let query = sqlx::query_as(include_str!("queries/create.sql"));
                let location = new_quote.location;

                let (id, timestamp): (Id, OffsetDateTime) = query
                    .bind(&new_quote.quote)
                    .bind(&new_quote.name)
                    .bind(&new_quote.city)
                    .bind(&new_quote.state)
                    .bind(new_quote.rand.value())
                    .bind(location.map(|point| point.lat))
                    .bind(location.map(|point| point.lon))
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(Quote::new(id, timestamp, new_quote))
            }
            .boxed()
        }

        fn retrieve(&self, id: Id) -> BoxFuture<Result<Option<Quote>, QuotesError>> {
            async move {
                let query = sqlx::query(include_str!("queries/retrieve.sql"));

                let quote = query
                    .bind(id)
                    .try_map(|row: PgRow| quote_from_row(&row))
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(quote)
            }
            .boxed()
        }

        fn first_at_or_above(
            &self,
            key: RandKey,
        ) -> BoxFuture<Result<Option<Quote>, QuotesError>> {
            async move {
                let query = sqlx::query(include_str!("queries/retrieve_at_or_above.sql"));

                let quote = query
                    .bind(key.value())
                    .try_map(|row: PgRow| quote_from_row(&row))
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(quote)
            }
            .boxed()
        }

        fn first_below(&self, key: RandKey) -> BoxFuture<Result<Option<Quote>, QuotesError>> {
            async move {
                let query = sqlx::query(include_str!("queries/retrieve_lowest_below.sql"));

                let quote = query
                    .bind(key.value())
                    .try_map(|row: PgRow| quote_from_row(&row))
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(quote)
            }
            .boxed()
        }
    }

    fn quote_from_row(row: &PgRow) -> Result<Quote, sqlx::Error> {
        let id: Id = try_get(row, "id")?;
        let timestamp: OffsetDateTime = try_get(row, "created_at")?;

        let rand: f64 = try_get(row, "rand")?;
        let rand = RandKey::new(rand).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        let latitude: Option<f64> = try_get(row, "latitude")?;
        let longitude: Option<f64> = try_get(row, "longitude")?;

        // the table constraint should rule out a half-set location
        let location = match (latitude, longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            (None, None) => None,
            _ => {
                return Err(sqlx::Error::Decode(Box::new(
                    QuotesError::IncompleteLocation(id),
                )))
            }
        };

        let new_quote = NewQuote {
            quote: try_get(row, "quote")?,
            name: try_get(row, "name")?,
            city: try_get(row, "city")?,
            state: try_get(row, "state")?,
            rand,
            location,
        };

        Ok(Quote::new(id, timestamp, new_quote))
    }

    fn try_get<'a, T: sqlx::Type<sqlx::Postgres> + sqlx::decode::Decode<'a, sqlx::Postgres>>(
        row: &'a PgRow,
        column: &str,
    ) -> Result<T, sqlx::Error> {
        use sqlx::prelude::*;

        row.try_get(column)
    }

    fn map_sqlx_error(error: sqlx::Error) -> QuotesError {
        QuotesError::Sqlx { source: error }
    }
}
