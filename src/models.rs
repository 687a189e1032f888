use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::LeadsError;

/// Heat of a sales contact.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Hot,
    Warm,
    Cold,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 3] = [LeadStatus::Hot, LeadStatus::Warm, LeadStatus::Cold];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Hot => "hot",
            LeadStatus::Warm => "warm",
            LeadStatus::Cold => "cold",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = LeadsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Ok(LeadStatus::Hot),
            "warm" => Ok(LeadStatus::Warm),
            "cold" => Ok(LeadStatus::Cold),
            _ => Err(LeadsError::validation("status")),
        }
    }
}

// Backend data is not normalized; "HOT" and "Hot" both occur.
impl<'de> Deserialize<'de> for LeadStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| serde::de::Error::custom(format!("unknown lead status '{}'", raw)))
    }
}

/// Status selector of the list screen. `All` means no narrowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Hot,
    Warm,
    Cold,
}

impl StatusFilter {
    pub fn status(&self) -> Option<LeadStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Hot => Some(LeadStatus::Hot),
            StatusFilter::Warm => Some(LeadStatus::Warm),
            StatusFilter::Cold => Some(LeadStatus::Cold),
        }
    }
}

impl From<Option<LeadStatus>> for StatusFilter {
    fn from(status: Option<LeadStatus>) -> Self {
        match status {
            None => StatusFilter::All,
            Some(LeadStatus::Hot) => StatusFilter::Hot,
            Some(LeadStatus::Warm) => StatusFilter::Warm,
            Some(LeadStatus::Cold) => StatusFilter::Cold,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = LeadsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        Ok(Some(trimmed.parse::<LeadStatus>()?).into())
    }
}

/// A persisted sales contact as returned by the backend.
///
/// Backend records are loosely shaped: the key may be `_id`, the id may be a
/// number, optional fields may be `null`. Only the id is required. A missing
/// or unrecognised status reads as `None`, which no status filter matches.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Lead {
    #[serde(alias = "_id", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_status", skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "pin", default, deserialize_with = "null_as_default")]
    pub pinned: bool,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "lead id must be a string or number, got {}",
            other
        ))),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<LeadStatus>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(|s| s.parse().ok()))
}

/// A lead that has not been persisted yet (no id).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LeadDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: LeadStatus,
    #[serde(default)]
    pub notes: String,
    pub date: String,
    #[serde(rename = "pin", default)]
    pub pinned: bool,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static email pattern"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{10,15}$").expect("static phone pattern"))
}

impl LeadDraft {
    /// Draft dated today with empty notes, unpinned.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        status: LeadStatus,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            status,
            notes: String::new(),
            date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            pinned: false,
        }
    }

    /// Checks name, email and phone in that order; the first failure wins.
    pub fn validate(&self) -> Result<(), LeadsError> {
        if self.name.trim().is_empty() {
            return Err(LeadsError::validation("name"));
        }
        if !email_pattern().is_match(&self.email) {
            return Err(LeadsError::validation("email"));
        }
        if !phone_pattern().is_match(&self.phone) {
            return Err(LeadsError::validation("phone"));
        }
        Ok(())
    }
}

/// Token and employee id that authorize backend calls. Both or neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub employee_id: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>, employee_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            employee_id: employee_id.into(),
        }
    }
}

/// Client-side list filter, owned by whoever renders the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Filter {
    pub status: StatusFilter,
    pub date: Option<NaiveDate>,
}

impl Filter {
    pub fn new(status: StatusFilter, date: Option<NaiveDate>) -> Self {
        Self { status, date }
    }
}

/// Dashboard tile counts.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeadSummary {
    pub total: usize,
    pub hot: usize,
    pub warm: usize,
    pub cold: usize,
    pub pinned: usize,
}
