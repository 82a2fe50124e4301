//! Unique-value extraction and grouped counts for charts and filter dropdowns.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::field_resolver::{resolve_field, LogicalField};
use crate::record::Record;

/// (group name, occurrence count)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    pub name: String,
    pub count: usize,
}

impl GroupCount {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Summary consumed directly as chart data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total: usize,
    pub by_building: Vec<GroupCount>,
    pub by_location: Vec<GroupCount>,
}

impl Statistics {
    pub fn unique_building_count(&self) -> usize {
        self.by_building.len()
    }

    pub fn unique_location_count(&self) -> usize {
        self.by_location.len()
    }

    pub fn top_buildings(&self, n: usize) -> &[GroupCount] {
        &self.by_building[..n.min(self.by_building.len())]
    }

    pub fn top_locations(&self, n: usize) -> &[GroupCount] {
        &self.by_location[..n.min(self.by_location.len())]
    }
}

/// Counts occurrences while remembering first-encounter order.
#[derive(Default)]
struct GroupCounter {
    groups: Vec<GroupCount>,
    index: HashMap<String, usize>,
}

impl GroupCounter {
    fn add(&mut self, name: &str) {
        match self.index.get(name) {
            Some(&i) => self.groups[i].count += 1,
            None => {
                self.index.insert(name.to_string(), self.groups.len());
                self.groups.push(GroupCount::new(name, 1));
            }
        }
    }

    /// Count descending; `sort_by` is stable so ties keep encounter order.
    fn into_sorted(self) -> Vec<GroupCount> {
        let mut groups = self.groups;
        groups.sort_by(|a, b| b.count.cmp(&a.count));
        groups
    }
}

/// Distinct values of the first non-blank field in `field_names`, per record,
/// sorted ascending. Values are trimmed; case is preserved.
pub fn unique_values<'a, I, S>(records: I, field_names: &[S]) -> Vec<String>
where
    I: IntoIterator<Item = &'a Record>,
    S: AsRef<str>,
{
    let values: BTreeSet<String> = records
        .into_iter()
        .filter_map(|record| resolve_field(record, field_names))
        .map(str::to_string)
        .collect();
    values.into_iter().collect()
}

/// Total count plus per-building and per-location counts in one pass.
pub fn statistics<'a, I>(records: I) -> Statistics
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut total = 0;
    let mut buildings = GroupCounter::default();
    let mut locations = GroupCounter::default();

    for record in records {
        total += 1;
        buildings.add(LogicalField::Building.resolve_or_unknown(record));
        locations.add(LogicalField::Location.resolve_or_unknown(record));
    }

    let stats = Statistics {
        total,
        by_building: buildings.into_sorted(),
        by_location: locations.into_sorted(),
    };
    debug!(
        "Aggregated {} records into {} buildings, {} locations",
        stats.total,
        stats.unique_building_count(),
        stats.unique_location_count()
    );
    stats
}

/// Dropdown options for the location and building filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub locations: Vec<String>,
    pub buildings: Vec<String>,
}

impl FilterOptions {
    /// `limit` truncates each list after sorting.
    pub fn from_records(records: &[Record], limit: Option<usize>) -> Self {
        let mut locations = unique_values(records, LogicalField::Location.aliases());
        let mut buildings = unique_values(records, LogicalField::Building.aliases());
        if let Some(limit) = limit {
            locations.truncate(limit);
            buildings.truncate(limit);
        }
        Self {
            locations,
            buildings,
        }
    }
}
