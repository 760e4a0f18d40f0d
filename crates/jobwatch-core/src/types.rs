//! Shared types used across jobwatch.
//!
//! This module defines the job data model that is scraped, persisted and
//! logged, plus the validated `Country` newtype that drives the search loop.

use crate::error::JobwatchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value recorded for any field that could not be extracted.
pub const PLACEHOLDER: &str = "N/A";

/// Countries searched when the configuration does not name any.
pub const DEFAULT_COUNTRIES: &[&str] = &[
    "Greenland",
    "Seychelles",
    "Trinidad and Tobago",
    "Norway",
    "Kuwait",
    "Guam",
    "Luxembourg",
    "Iceland",
    "United Kingdom",
    "United States",
    "Switzerland",
    "Netherlands",
    "Philippines",
    "United Arab Emirates",
    "India",
    "Saudi Arabia",
    "Ireland",
    "New Zealand",
    "Italy",
    "Nigeria",
    "Israel",
    "Qatar",
    "Portugal",
    "Poland",
    "Gibraltar",
    "Greece",
    "Grenada",
    "Latvia",
    "Lebanon",
    "Lesotho",
    "Liberia",
    "Liechtenstein",
    "Lithuania",
    "Macau Sar China",
    "Macedonia",
    "Madagascar",
    "Malawi",
    "Malaysia",
    "Maldives",
    "South Korea",
];

fn placeholder() -> String {
    PLACEHOLDER.to_string()
}

/// One scraped job listing.
///
/// Every field is always serialized. Values that could not be extracted hold
/// [`PLACEHOLDER`], and records written by older runs with missing keys are
/// read back with the placeholder filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// Job title from the detail page
    #[serde(default = "placeholder")]
    pub title: String,
    /// Hiring company name
    #[serde(default = "placeholder")]
    pub company: String,
    /// Company flavor row (company, location, applicant count)
    #[serde(default = "placeholder")]
    pub company_description: String,
    /// City part of the posting location
    #[serde(default = "placeholder")]
    pub location: String,
    /// Full job description text
    #[serde(default = "placeholder")]
    pub job_description: String,
    /// Canonical link to the job detail page
    #[serde(default = "placeholder")]
    pub link: String,
    /// Country whose search produced this job
    #[serde(default = "placeholder")]
    pub country: String,
    /// Relative posting time as shown by the site ("2 hours ago")
    #[serde(default = "placeholder")]
    pub posted_time: String,
    /// Job function from the criteria list
    #[serde(default = "placeholder")]
    pub job_category: String,
}

impl JobRecord {
    /// Create a record for `link` in `country` with every scraped field set
    /// to the placeholder.
    #[must_use]
    pub fn placeholder(link: impl Into<String>, country: &Country) -> Self {
        Self {
            title: placeholder(),
            company: placeholder(),
            company_description: placeholder(),
            location: placeholder(),
            job_description: placeholder(),
            link: link.into(),
            country: country.as_str().to_string(),
            posted_time: placeholder(),
            job_category: placeholder(),
        }
    }
}

/// A job link discovered on a search results page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobLink {
    /// Card title (screen-reader text), placeholder if missing
    pub title: String,
    /// Absolute link to the job detail page
    pub link: String,
}

/// Newtype for country names with validation.
///
/// Country names are trimmed and must not be empty. They are used verbatim in
/// records and percent-encoded in search URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Country(String);

impl Country {
    /// Create a new `Country` from a string.
    ///
    /// # Errors
    /// Returns error if the name is empty after trimming.
    pub fn new(name: impl Into<String>) -> Result<Self, JobwatchError> {
        let name = name.into();
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(JobwatchError::Validation(
                "invalid country: name cannot be empty".to_string(),
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Country {
    type Error = JobwatchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Country> for String {
    fn from(country: Country) -> Self {
        country.0
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reduce a full location ("Oslo, Oslo, Norway") to its first component.
#[must_use]
pub fn primary_location(full: &str) -> String {
    let first = full.split(',').next().unwrap_or_default().trim();
    if first.is_empty() {
        placeholder()
    } else {
        first.to_string()
    }
}
