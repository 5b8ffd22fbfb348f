//! Helpers for reading the gateway's JSON, which is not always consistent about types.
use std::fmt;

use chrono::{DateTime, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};

/// An identifier as it may arrive on the wire: a number, or a string holding a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseId {
    Number(i64),
    Text(String),
}

impl LooseId {
    fn parse(self) -> Result<i64, String> {
        match self {
            LooseId::Number(n) => Ok(n),
            LooseId::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| format!("invalid identifier {:?}", s)),
        }
    }
}

macro_rules! loose_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                LooseId::deserialize(deserializer)?
                    .parse()
                    .map($name)
                    .map_err(de::Error::custom)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                $name(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

loose_id!(
    /// Identifies a course
    CourseId
);
loose_id!(
    /// Identifies a module within a course
    ModuleId
);
loose_id!(
    /// Identifies a lesson within a module
    LessonId
);
loose_id!(
    /// Identifies a review
    ReviewId
);
loose_id!(
    /// Identifies a user of the platform
    UserId
);

/// Deserialize a list that may be missing or `null`, treating both as empty.
pub(crate) fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a timestamp that may be a local date-time (`2025-11-27T10:00:00`) or RFC 3339.
/// Anything else is dropped rather than failing the whole record.
pub(crate) fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(s) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(dt) = s.parse::<NaiveDateTime>() {
        return Ok(Some(dt));
    }
    match DateTime::parse_from_rfc3339(&s) {
        Ok(dt) => Ok(Some(dt.naive_utc())),
        Err(e) => {
            log::debug!("ignoring unparseable timestamp {:?}: {}", s, e);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "lenient_datetime")]
        at: Option<NaiveDateTime>,
    }

    #[test]
    fn ids_accept_numbers_and_strings() {
        let a: LessonId = serde_json::from_str("7").unwrap();
        let b: LessonId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<LessonId>("\"seven\"").is_err());
    }

    #[test]
    fn timestamps_are_lenient() {
        let h: Holder = serde_json::from_str(r#"{"at": "2025-11-27T10:00:00"}"#).unwrap();
        assert!(h.at.is_some());
        let h: Holder = serde_json::from_str(r#"{"at": "2025-11-27T10:00:00Z"}"#).unwrap();
        assert!(h.at.is_some());
        let h: Holder = serde_json::from_str(r#"{"at": "yesterday"}"#).unwrap();
        assert!(h.at.is_none());
        let h: Holder = serde_json::from_str(r#"{}"#).unwrap();
        assert!(h.at.is_none());
    }
}
