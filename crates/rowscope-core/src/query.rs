//! Free-text search and categorical filtering over record sequences.
//!
//! Both operations are pure filters that borrow from their input, so they
//! compose in either order: `filter_records(search_records(&rows, t), &c)`.
//! Matching is case-insensitive substring containment; a filter value of
//! `"tower"` matches both `"Tower 1"` and `"Tower 12"`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::field_resolver::{LogicalField, EMAIL_FIELD};
use crate::record::Record;

/// Categorical filters. Empty or absent criteria are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        active(&self.location).is_none() && active(&self.building).is_none()
    }
}

/// A search term plus filters, in the shape HTTP query strings and CLI flags arrive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
}

impl Query {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            location: self.location.clone(),
            building: self.building.clone(),
        }
    }

    /// Search first, then filter.
    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        let searched = search_records(records, self.search.as_deref().unwrap_or(""));
        filter_records(searched, &self.criteria())
    }
}

fn active(criterion: &Option<String>) -> Option<&str> {
    criterion.as_deref().filter(|v| !v.is_empty())
}

fn contains_lower(value: Option<&str>, needle: &str) -> bool {
    value.unwrap_or("").to_lowercase().contains(needle)
}

/// Keep records whose display name, contact or email contains `term`.
///
/// A blank term returns every record.
pub fn search_records<'a, I>(records: I, term: &str) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    if term.trim().is_empty() {
        return records.into_iter().collect();
    }

    let term = term.to_lowercase();
    let matched: Vec<&Record> = records
        .into_iter()
        .filter(|record| {
            contains_lower(LogicalField::DisplayName.resolve(record), &term)
                || contains_lower(LogicalField::Contact.resolve(record), &term)
                || contains_lower(record.get(EMAIL_FIELD), &term)
        })
        .collect();
    debug!("Search '{}' matched {} records", term, matched.len());
    matched
}

/// Keep records whose resolved location and building contain the criteria.
pub fn filter_records<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let location = active(&criteria.location).map(str::to_lowercase);
    let building = active(&criteria.building).map(str::to_lowercase);

    let filtered: Vec<&Record> = records
        .into_iter()
        .filter(|record| {
            location
                .as_deref()
                .map_or(true, |loc| contains_lower(LogicalField::Location.resolve(record), loc))
        })
        .filter(|record| {
            building
                .as_deref()
                .map_or(true, |bldg| contains_lower(LogicalField::Building.resolve(record), bldg))
        })
        .collect();
    if !criteria.is_empty() {
        debug!("Filter {:?} kept {} records", criteria, filtered.len());
    }
    filtered
}
