use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::errors::QuotesError;

/// An ID in the database.
pub type Id = i64;

/// A latitude/longitude pair, stored as a single field.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }

    /// The point at `(0, 0)`.
    pub fn origin() -> Self {
        GeoPoint::new(0.0, 0.0)
    }
}

/// The key used to pick quotes at random. Always in `[0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct RandKey(f64);

impl RandKey {
    pub fn new(value: f64) -> Result<Self, QuotesError> {
        if (0.0..1.0).contains(&value) {
            Ok(RandKey(value))
        } else {
            Err(QuotesError::InvalidRandKey(value))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// The fields a visitor fills in to add a quote.
#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub quote: String,
    pub name: String,
    pub city: String,
    pub state: String,
}

impl Submission {
    /// Extracts the four required fields from a decoded form body.
    /// Extra fields are ignored. The form decoder has already replaced
    /// percent-encoded bytes that are not valid UTF-8 with U+FFFD.
    pub fn from_form(mut form: HashMap<String, String>) -> Result<Self, QuotesError> {
        let mut take = |field: &'static str| {
            form.remove(field)
                .ok_or(QuotesError::MissingField(field))
        };

        Ok(Submission {
            quote: take("quote")?,
            name: take("name")?,
            city: take("city")?,
            state: take("state")?,
        })
    }
}

/// A quote that has not been saved yet.
#[derive(Clone, Debug, PartialEq)]
pub struct NewQuote {
    pub(crate) quote: String,
    pub(crate) name: String,
    pub(crate) city: String,
    pub(crate) state: String,
    pub(crate) rand: RandKey,
    pub(crate) location: Option<GeoPoint>,
}

impl NewQuote {
    /// Creates a quote placed at the origin. The city and state are not
    /// geocoded.
    pub fn new(submission: Submission, rand: RandKey) -> Self {
        let Submission {
            quote,
            name,
            city,
            state,
        } = submission;

        NewQuote {
            quote,
            name,
            city,
            state,
            rand,
            location: Some(GeoPoint::origin()),
        }
    }

    pub fn rand(&self) -> RandKey {
        self.rand
    }
}

/// A single quote in the database.
#[derive(Clone, Debug, PartialEq)]
pub struct Quote {
    /// The ID assigned by the store.
    id: Id,

    /// The quote itself.
    quote: String,

    /// Who said it.
    name: String,

    city: String,

    state: String,

    /// The selection key, fixed at creation.
    rand: RandKey,

    /// When it was saved.
    timestamp: OffsetDateTime,

    /// Where it was said, if known.
    location: Option<GeoPoint>,
}

impl Quote {
    pub fn new(id: Id, timestamp: OffsetDateTime, new_quote: NewQuote) -> Self {
        let NewQuote {
            quote,
            name,
            city,
            state,
            rand,
            location,
        } = new_quote;

        Quote {
            id,
            quote,
            name,
            city,
            state,
            rand,
            timestamp,
            location,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn rand(&self) -> RandKey {
        self.rand
    }

    pub fn timestamp(&self) -> OffsetDateTime {
        self.timestamp
    }

    pub fn location(&self) -> Option<GeoPoint> {
        self.location
    }

    pub fn latitude(&self) -> Option<f64> {
        self.location.map(|point| point.lat)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.location.map(|point| point.lon)
    }

    /// Sets the latitude, placing the quote at the origin first if it has
    /// no location.
    pub fn set_latitude(&mut self, lat: f64) {
        self.location.get_or_insert_with(GeoPoint::origin).lat = lat;
    }

    /// Sets the longitude, placing the quote at the origin first if it
    /// has no location.
    pub fn set_longitude(&mut self, lon: f64) {
        self.location.get_or_insert_with(GeoPoint::origin).lon = lon;
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use time::OffsetDateTime;

    use super::*;

    fn submission() -> Submission {
        Submission {
            quote: "Brevity is the soul of wit.".to_owned(),
            name: "Polonius".to_owned(),
            city: "Elsinore".to_owned(),
            state: "DK".to_owned(),
        }
    }

    fn saved(location: Option<GeoPoint>) -> Quote {
        let mut new_quote = NewQuote::new(submission(), RandKey::new(0.5).unwrap());
        new_quote.location = location;

        Quote::new(7, OffsetDateTime::now_utc(), new_quote)
    }

    #[test]
    fn coordinates_are_absent_without_location() {
        let quote = saved(None);

        assert_eq!(quote.latitude(), None);
        assert_eq!(quote.longitude(), None);
    }

    #[test]
    fn setting_latitude_creates_zero_point() {
        let mut quote = saved(None);

        quote.set_latitude(42.5);

        assert_eq!(quote.latitude(), Some(42.5));
        assert_eq!(quote.longitude(), Some(0.0));
    }

    #[test]
    fn setting_longitude_keeps_latitude() {
        let mut quote = saved(Some(GeoPoint::new(10.0, 20.0)));

        quote.set_longitude(-71.1);

        assert_eq!(quote.location(), Some(GeoPoint::new(10.0, -71.1)));
    }

    #[test]
    fn new_quotes_start_at_origin() {
        let new_quote = NewQuote::new(submission(), RandKey::new(0.25).unwrap());

        assert_eq!(new_quote.location, Some(GeoPoint::origin()));
        assert_eq!(new_quote.rand().value(), 0.25);
    }

    #[test]
    fn rand_keys_must_be_in_unit_interval() {
        assert!(RandKey::new(0.0).is_ok());
        assert!(RandKey::new(0.999_999).is_ok());
        assert!(matches!(
            RandKey::new(1.0),
            Err(QuotesError::InvalidRandKey(_))
        ));
        assert!(RandKey::new(-0.1).is_err());
        assert!(RandKey::new(f64::NAN).is_err());
    }

    #[test]
    fn submissions_require_every_field() {
        let mut form: HashMap<String, String> = vec![
            ("quote", "To be or not to be"),
            ("name", "Hamlet"),
            ("city", "Elsinore"),
            ("extra", "ignored"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();

        assert!(matches!(
            Submission::from_form(form.clone()),
            Err(QuotesError::MissingField("state"))
        ));

        form.insert("state".to_owned(), "DK".to_owned());
        let submission = Submission::from_form(form).unwrap();

        assert_eq!(submission.name, "Hamlet");
        assert_eq!(submission.state, "DK");
    }
}
