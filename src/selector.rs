//! Picks a quote at random using the stored selection keys.
//!
//! Every quote gets a key drawn uniformly from `[0, 1)` when it is saved.
//! To pick one, a fresh key is drawn and the quote with the next key at or
//! above it is returned, wrapping around to the lowest key when nothing is
//! above. Only two range queries are needed, never a count or a scan.
//!
//! The result is close to uniform but not exact: a quote is chosen with
//! probability equal to the gap between its key and the key below it.

use crate::db::Db;
use crate::errors::QuotesError;
use crate::quote::{Quote, RandKey};

/// Returns a quote for the drawn `key`, or `None` if the store is empty.
pub async fn pick(
    db: &(dyn Db + Send + Sync),
    key: RandKey,
) -> Result<Option<Quote>, QuotesError> {
    if let Some(quote) = db.first_at_or_above(key).await? {
        return Ok(Some(quote));
    }

    // nothing at or above the key, so every quote is below it and the
    // lowest one closes the circle
    db.first_below(key).await
}
