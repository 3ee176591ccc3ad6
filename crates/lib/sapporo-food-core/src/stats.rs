//! In-memory aggregation over facility record batches.
//!
//! Every view is recomputed from scratch on each call: a single pass groups
//! the batch, then counts are finalized with a stable descending sort. Output
//! ordering is deterministic for a given input order: keys enter tables in
//! first-seen order and the stable sort keeps that order for tied counts.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::catalog::FacilityRecord;

/// Label substituted when a grouping field is absent from a record.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Number of matching records echoed back in a ward detail report.
const SAMPLE_SIZE: usize = 10;

fn or_unknown(value: Option<&str>) -> &str {
    value.unwrap_or(UNKNOWN_LABEL)
}

/// Insertion-ordered count table, serialized as a JSON object in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountTable {
    entries: Vec<(String, usize)>,
}

impl CountTable {
    fn bump(&mut self, key: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| name == key) {
            entry.1 += 1;
        } else {
            self.entries.push((key.to_string(), 1));
        }
    }

    // Stable, so tied counts keep first-seen order.
    fn sort_desc(&mut self) {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, count)| *count)
    }

    /// Key with the highest count; ties resolve to the first-seen key.
    #[must_use]
    pub fn leading(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (key, count) in &self.entries {
            if best.is_none_or(|(_, max)| *count > max) {
                best = Some((key.as_str(), *count));
            }
        }
        best.map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(key, count)| (key.as_str(), *count))
    }
}

impl Serialize for CountTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

/// Named groups in a fixed order, serialized as a JSON object in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTable<T> {
    entries: Vec<(String, T)>,
}

impl<T> GroupTable<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, group)| group)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(key, group)| (key.as_str(), group))
    }
}

impl<T: Serialize> Serialize for GroupTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, group) in &self.entries {
            map.serialize_entry(key, group)?;
        }
        map.end()
    }
}

/// One ward's share of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardGroup {
    pub total_facilities: usize,
    pub business_types: CountTable,
}

/// One business type's share of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessTypeGroup {
    pub total_facilities: usize,
    pub ward_distribution: CountTable,
}

/// Per-ward statistics over one fetched batch. Wards appear in first-seen
/// order; nested business-type counts are sorted descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardStatistics {
    pub total_records_analyzed: usize,
    pub ward_statistics: GroupTable<WardGroup>,
    pub summary: WardSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardSummary {
    pub total_wards: usize,
    /// Absent when the batch produced zero ward groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_facilities_ward: Option<String>,
    pub total_facilities: usize,
}

/// Per-business-type statistics over one fetched batch. Types are sorted
/// descending by facility count; nested ward counts likewise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessTypeStatistics {
    pub total_records_analyzed: usize,
    pub business_type_statistics: GroupTable<BusinessTypeGroup>,
    pub summary: BusinessTypeSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessTypeSummary {
    pub total_business_types: usize,
    /// Absent when the batch produced zero business-type groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common_business: Option<String>,
    pub total_facilities: usize,
}

/// Detail report for one ward, or a success-shaped not-found result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WardDetail {
    Found(WardReport),
    NotFound(WardNotFound),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardReport {
    pub ward_name: String,
    pub total_facilities: usize,
    pub business_type_breakdown: CountTable,
    /// First matching records in source order, capped at ten.
    pub sample_facilities: Vec<FacilityRecord>,
    pub analysis_summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WardNotFound {
    pub ward_name: String,
    pub message: String,
    pub total_facilities: usize,
}

/// Groups a batch by ward with nested business-type counts.
#[must_use]
pub fn reduce_by_ward(records: &[FacilityRecord]) -> WardStatistics {
    let mut groups: Vec<(String, CountTable)> = Vec::new();
    for record in records {
        let ward = or_unknown(record.ward());
        let business_type = or_unknown(record.business_type());
        bump_group(&mut groups, ward, business_type);
    }

    let most_facilities_ward = leading_group(&groups);
    let total_facilities: usize = groups.iter().map(|(_, table)| table.total()).sum();
    let total_wards = groups.len();
    let entries = groups
        .into_iter()
        .map(|(ward, mut business_types)| {
            business_types.sort_desc();
            let group = WardGroup {
                total_facilities: business_types.total(),
                business_types,
            };
            (ward, group)
        })
        .collect();

    WardStatistics {
        total_records_analyzed: records.len(),
        ward_statistics: GroupTable { entries },
        summary: WardSummary {
            total_wards,
            most_facilities_ward,
            total_facilities,
        },
    }
}

/// Groups a batch by business type with nested ward counts.
#[must_use]
pub fn reduce_by_business_type(records: &[FacilityRecord]) -> BusinessTypeStatistics {
    let mut groups: Vec<(String, CountTable)> = Vec::new();
    for record in records {
        let business_type = or_unknown(record.business_type());
        let ward = or_unknown(record.ward());
        bump_group(&mut groups, business_type, ward);
    }

    let most_common_business = leading_group(&groups);
    let total_facilities: usize = groups.iter().map(|(_, table)| table.total()).sum();
    let total_business_types = groups.len();
    let mut entries: Vec<(String, BusinessTypeGroup)> = groups
        .into_iter()
        .map(|(business_type, mut ward_distribution)| {
            ward_distribution.sort_desc();
            let group = BusinessTypeGroup {
                total_facilities: ward_distribution.total(),
                ward_distribution,
            };
            (business_type, group)
        })
        .collect();
    // Unlike wards, the type ranking itself is sorted; stable, so ties keep
    // first-seen order.
    entries.sort_by(|a, b| b.1.total_facilities.cmp(&a.1.total_facilities));

    BusinessTypeStatistics {
        total_records_analyzed: records.len(),
        business_type_statistics: GroupTable { entries },
        summary: BusinessTypeSummary {
            total_business_types,
            most_common_business,
            total_facilities,
        },
    }
}

/// Reports on one ward by exact, case-sensitive name match.
///
/// A batch with no matching records yields a not-found value with
/// `total_facilities: 0`, never an error.
#[must_use]
pub fn ward_detail(records: &[FacilityRecord], ward_name: &str) -> WardDetail {
    let matching: Vec<&FacilityRecord> = records
        .iter()
        .filter(|record| record.ward() == Some(ward_name))
        .collect();
    if matching.is_empty() {
        return WardDetail::NotFound(WardNotFound {
            ward_name: ward_name.to_string(),
            message: format!("No facilities found for ward: {ward_name}"),
            total_facilities: 0,
        });
    }

    let mut breakdown = CountTable::default();
    for record in &matching {
        breakdown.bump(or_unknown(record.business_type()));
    }
    let total_facilities = matching.len();
    let leading = breakdown.leading().unwrap_or(UNKNOWN_LABEL);
    let analysis_summary = format!(
        "{ward_name}には{total_facilities}件の食品営業許可施設があり、最も多い業種は{leading}です。"
    );
    breakdown.sort_desc();

    WardDetail::Found(WardReport {
        ward_name: ward_name.to_string(),
        total_facilities,
        business_type_breakdown: breakdown,
        sample_facilities: matching
            .into_iter()
            .take(SAMPLE_SIZE)
            .cloned()
            .collect(),
        analysis_summary,
    })
}

fn bump_group(groups: &mut Vec<(String, CountTable)>, outer: &str, inner: &str) {
    if let Some((_, table)) = groups.iter_mut().find(|(name, _)| name == outer) {
        table.bump(inner);
    } else {
        let mut table = CountTable::default();
        table.bump(inner);
        groups.push((outer.to_string(), table));
    }
}

/// Group with the highest record count; ties resolve to the earliest group.
fn leading_group(groups: &[(String, CountTable)]) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for (key, table) in groups {
        let total = table.total();
        if best.is_none_or(|(_, max)| total > max) {
            best = Some((key.as_str(), total));
        }
    }
    best.map(|(key, _)| key.to_string())
}
