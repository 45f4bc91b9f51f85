//! Member record

use std::fmt;

use serde::de;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// One user entry from the member feed.
///
/// Only `name` is editable. Fields in the payload other than `id`, `name`,
/// `email` and `role` are ignored.
///
/// # Example
///
/// ```
/// use roster_lib::model::Record;
///
/// let record: Record =
///     serde_json::from_str(r#"{"id": "7", "name": "Ann", "email": "a@x.com", "role": "admin"}"#)
///         .unwrap();
/// assert_eq!(record.id, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique, stable identifier.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role label (e.g. "admin", "member").
    pub role: String,
}

impl Record {
    /// Creates a new record.
    pub fn new(
        id: u64,
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role: role.into(),
        }
    }

    /// Returns the id as decimal text, the form matched by search.
    pub fn id_text(&self) -> String {
        self.id.to_string()
    }

    /// Returns a copy with only the name replaced.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

/// Accepts the id either as a JSON number or as a string of decimal digits.
fn deserialize_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl de::Visitor<'_> for IdVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or a string of decimal digits")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
            u64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
            v.trim()
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(IdVisitor)
}
