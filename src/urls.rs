use url::Url;

use crate::quote::Id;

/// Convenience wrapper for URL generation functions.
#[derive(Clone, Debug)]
pub struct Urls {
    /// Top-level URL, including trailing slash.
    base: Url,
}

impl Urls {
    /// Create a new instance. A trailing slash is added to `base` if it
    /// lacks one.
    pub fn new(base: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let base = base.as_ref();
        let base = if base.ends_with('/') {
            Url::parse(base)?
        } else {
            Url::parse(&format!("{}/", base))?
        };

        Ok(Urls { base })
    }

    /// The page showing a single quote.
    pub fn quote(&self, id: Id) -> Result<Url, url::ParseError> {
        self.base.join(&format!("q/{}", id))
    }
}
