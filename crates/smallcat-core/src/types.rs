//! Core data types for the small.cat client
//!
//! Contains link lifetimes, the anti-forgery token and the submission form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Allowed lifetime of a shortened link
///
/// Each variant maps to a fixed number of minutes sent to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiry {
    TenMinutes,
    OneHour,
    OneDay,
    OneWeek,
}

impl Expiry {
    /// Every supported lifetime, shortest first
    pub const ALL: [Expiry; 4] = [
        Expiry::TenMinutes,
        Expiry::OneHour,
        Expiry::OneDay,
        Expiry::OneWeek,
    ];

    /// Lifetime in minutes, as sent in `entry[duration_in_minutes]`
    pub const fn minutes(self) -> u32 {
        match self {
            Expiry::TenMinutes => 10,
            Expiry::OneHour => 60,
            Expiry::OneDay => 1440,
            Expiry::OneWeek => 10080,
        }
    }

    /// Short label used on the command line (e.g. "1d")
    pub const fn label(self) -> &'static str {
        match self {
            Expiry::TenMinutes => "10m",
            Expiry::OneHour => "1h",
            Expiry::OneDay => "1d",
            Expiry::OneWeek => "1w",
        }
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Expiry {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Expiry::ALL
            .into_iter()
            .find(|expiry| expiry.label() == s)
            .ok_or_else(|| format!("unknown expiry '{}', expected one of 10m, 1h, 1d, 1w", s))
    }
}

/// Anti-forgery token scraped from the landing page
///
/// Only valid for the cookie session it was issued in. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticityToken(String);

impl AuthenticityToken {
    /// Wraps a token value, rejecting empty strings
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthenticityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Form submission for the `/entries` endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    /// URL to shorten
    pub url: String,

    /// Requested link lifetime
    pub expiry: Expiry,

    /// Token from the landing page fetched in the same session
    pub token: AuthenticityToken,
}

impl SubmissionRequest {
    pub fn new(url: impl Into<String>, expiry: Expiry, token: AuthenticityToken) -> Self {
        Self {
            url: url.into(),
            expiry,
            token,
        }
    }

    /// Form fields in submission order
    pub fn form_fields(&self) -> [(&'static str, String); 4] {
        [
            ("utf8", "\u{2713}".to_string()),
            ("authenticity_token", self.token.as_str().to_string()),
            ("entry[value]", self.url.clone()),
            (
                "entry[duration_in_minutes]",
                self.expiry.minutes().to_string(),
            ),
        ]
    }

    /// `application/x-www-form-urlencoded` body
    pub fn form_body(&self) -> String {
        self.form_fields()
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}
