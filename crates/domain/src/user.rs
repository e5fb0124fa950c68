//! User records exported from the account service.
//!
//! Records are read from a JSON export where flags are encoded as `0`/`1`
//! and timestamps use the `YYYY-MM-DD HH:MM:SS` layout.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Layout of every timestamp in the user export.
pub const LOGIN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Numeric identifier assigned to a user by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a user identifier from the remote numeric value.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// One entry of the user export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Remote user identifier.
    pub id: UserId,
    /// Account email address, as exported.
    pub email: String,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Timestamp of the last successful login.
    #[serde(with = "login_timestamp")]
    pub last_login_time: NaiveDateTime,
    /// Timestamp of account creation, when exported.
    #[serde(default)]
    pub setup_time: Option<String>,
    /// Whether the account is disabled.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_disabled: bool,
    /// Whether the account has administrator rights.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_admin: bool,
    /// IANA time zone configured for the account.
    #[serde(default)]
    pub time_zone: Option<String>,
}

impl UserRecord {
    /// Returns the last login formatted the way the export writes it.
    #[must_use]
    pub fn last_login_display(&self) -> String {
        self.last_login_time
            .format(LOGIN_TIMESTAMP_FORMAT)
            .to_string()
    }
}

mod login_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::LOGIN_TIMESTAMP_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(LOGIN_TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), LOGIN_TIMESTAMP_FORMAT).map_err(|error| {
            serde::de::Error::custom(format!("invalid last login timestamp '{raw}': {error}"))
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let flag = Option::<RawFlag>::deserialize(deserializer)?;
    Ok(match flag {
        Some(RawFlag::Bool(value)) => value,
        Some(RawFlag::Int(value)) => value != 0,
        None => false,
    })
}
