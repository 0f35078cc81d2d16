use std::collections::BTreeMap;

use futures::future::{BoxFuture, FutureExt};
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::errors::QuotesError;
use crate::quote::{Id, NewQuote, Quote, RandKey};

/// A store that keeps quotes in memory. Used by the tests and for running
/// the site without a database.
#[derive(Default)]
pub struct MemoryDb {
    quotes: RwLock<BTreeMap<Id, Quote>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Default::default()
    }

    pub async fn len(&self) -> usize {
        self.quotes.read().await.len()
    }

    async fn lowest_where(&self, predicate: impl Fn(f64) -> bool) -> Option<Quote> {
        let quotes = self.quotes.read().await;

        quotes
            .values()
            .filter(|quote| predicate(quote.rand().value()))
            .min_by(|a, b| a.rand().value().total_cmp(&b.rand().value()))
            .cloned()
    }
}

impl super::Db for MemoryDb {
    fn insert(&self, new_quote: NewQuote) -> BoxFuture<Result<Quote, QuotesError>> {
        async move {
            let mut quotes = self.quotes.write().await;

            // IDs start at 1 and are never reused, since nothing is deleted
            let id = quotes.keys().next_back().map_or(1, |last| last + 1);
            let quote = Quote::new(id, OffsetDateTime::now_utc(), new_quote);
            quotes.insert(id, quote.clone());

            Ok(quote)
        }
        .boxed()
    }

    fn retrieve(&self, id: Id) -> BoxFuture<Result<Option<Quote>, QuotesError>> {
        async move { Ok(self.quotes.read().await.get(&id).cloned()) }.boxed()
    }

    fn first_at_or_above(&self, key: RandKey) -> BoxFuture<Result<Option<Quote>, QuotesError>> {
        let bound = key.value();

        async move { Ok(self.lowest_where(|rand| rand >= bound).await) }.boxed()
    }

    fn first_below(&self, key: RandKey) -> BoxFuture<Result<Option<Quote>, QuotesError>> {
        let bound = key.value();

        async move { Ok(self.lowest_where(|rand| rand < bound).await) }.boxed()
    }
}
