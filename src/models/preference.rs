use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DESTINATION_TYPES: &[&str] = &["Beach", "Mountains", "City", "Temple", "Adventure"];
pub const DURATION_BUCKETS: &[&str] = &["1-3 days", "4-7 days", "1-2 weeks", "2+ weeks"];
pub const PARTY_SIZES: &[&str] = &["Solo", "Couple", "3-4", "5-8", "9+"];
pub const INTEREST_TAGS: &[&str] = &["Food", "Nature", "History", "Shopping", "Wildlife", "Nightlife"];
pub const MONTHS: &[&str] = &[
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DEFAULT_DURATION: &str = "4-7 days";
const DEFAULT_PARTY_SIZE: &str = "2";
const ANY_REGION: &str = "Any";

/// Validated trip preferences submitted by the user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    /// Kind of destination, empty when the user has no preference
    pub destination_type: String,
    /// Region all results must fall within
    pub region: Option<String>,
    pub budget_ceiling: u32,
    pub duration_bucket: String,
    pub party_size: String,
    pub travel_month: Option<String>,
    /// Interest tags, kept sorted so prompts render deterministically
    pub interests: BTreeSet<String>,
}

impl Preference {
    /// Creates a preference with no region, month or interests
    pub fn new(
        destination_type: impl Into<String>,
        budget_ceiling: u32,
        duration_bucket: impl Into<String>,
        party_size: impl Into<String>,
    ) -> Self {
        Self {
            destination_type: destination_type.into(),
            region: None,
            budget_ceiling,
            duration_bucket: duration_bucket.into(),
            party_size: party_size.into(),
            travel_month: None,
            interests: BTreeSet::new(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_month(mut self, month: impl Into<String>) -> Self {
        self.travel_month = Some(month.into());
        self
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }
}

/// Raw preference form as posted by the front end
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferenceRequest {
    pub destination_type: String,
    pub region: Option<String>,
    pub budget_ceiling: Option<i64>,
    pub duration_bucket: String,
    pub party_size: String,
    pub travel_month: String,
    pub interests: Vec<String>,
}

impl PreferenceRequest {
    /// Validates the form against the known option sets and fills in defaults
    pub fn into_preference(self) -> AppResult<Preference> {
        let destination_type = self.destination_type.trim().to_string();
        if !destination_type.is_empty() && !DESTINATION_TYPES.contains(&destination_type.as_str())
        {
            return Err(AppError::InvalidInput(format!(
                "Unknown destination type: {}",
                destination_type
            )));
        }

        let budget_ceiling = match self.budget_ceiling {
            None => 5000,
            Some(budget) if budget > 0 => u32::try_from(budget).map_err(|_| {
                AppError::InvalidInput(format!("Budget out of range: {}", budget))
            })?,
            Some(budget) => {
                return Err(AppError::InvalidInput(format!(
                    "Budget must be positive, got {}",
                    budget
                )))
            }
        };

        let duration_bucket = non_empty_or(&self.duration_bucket, DEFAULT_DURATION);
        if !DURATION_BUCKETS.contains(&duration_bucket.as_str()) {
            return Err(AppError::InvalidInput(format!(
                "Unknown duration: {}",
                duration_bucket
            )));
        }

        let party_size = non_empty_or(&self.party_size, DEFAULT_PARTY_SIZE);
        if !is_valid_party_size(&party_size) {
            return Err(AppError::InvalidInput(format!(
                "Unknown party size: {}",
                party_size
            )));
        }

        let travel_month = match self.travel_month.trim() {
            "" => None,
            month if MONTHS.contains(&month) => Some(month.to_string()),
            month => {
                return Err(AppError::InvalidInput(format!("Unknown month: {}", month)));
            }
        };

        let region = self
            .region
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty() && r != ANY_REGION);

        let mut interests = BTreeSet::new();
        for interest in self.interests {
            let interest = interest.trim().to_string();
            if !INTEREST_TAGS.contains(&interest.as_str()) {
                return Err(AppError::InvalidInput(format!(
                    "Unknown interest: {}",
                    interest
                )));
            }
            interests.insert(interest);
        }

        Ok(Preference {
            destination_type,
            region,
            budget_ceiling,
            duration_bucket,
            party_size,
            travel_month,
            interests,
        })
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    match value.trim() {
        "" => fallback.to_string(),
        v => v.to_string(),
    }
}

/// Accepts the form's party buckets or a plain head count
fn is_valid_party_size(value: &str) -> bool {
    PARTY_SIZES.contains(&value) || value.parse::<u32>().map(|n| n > 0).unwrap_or(false)
}
