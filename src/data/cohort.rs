use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::model::Record;

/// Identifiers per peer group.
pub const PEER_GROUP_SIZE: usize = 10;

const PERSONAL_LABEL: &str = "Personal Data";
const PEER_PREFIX: &str = "Fitbit Users ";

// ---------------------------------------------------------------------------
// Cohort label
// ---------------------------------------------------------------------------

/// Mutually exclusive grouping of records by originating identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cohort {
    /// The identifier that appears first in the source.
    Personal,
    /// Peer group by 1-based rank: rank 1 holds the 1st–10th peer identifiers.
    Peers(usize),
}

impl Cohort {
    /// Options offered by the cohort selector.
    pub const SELECTOR_OPTIONS: [Cohort; 4] = [
        Cohort::Peers(1),
        Cohort::Peers(2),
        Cohort::Peers(3),
        Cohort::Personal,
    ];

    pub fn label(&self) -> String {
        self.to_string()
    }

    pub fn is_personal(&self) -> bool {
        matches!(self, Cohort::Personal)
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cohort::Personal => f.write_str(PERSONAL_LABEL),
            Cohort::Peers(rank) => {
                // Rank 0 is never assigned; show it as the first group.
                let rank = (*rank).max(1);
                let first = (rank - 1) * PEER_GROUP_SIZE + 1;
                let last = rank * PEER_GROUP_SIZE;
                write!(f, "{PEER_PREFIX}{first}-{last}")
            }
        }
    }
}

impl FromStr for Cohort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == PERSONAL_LABEL {
            return Ok(Cohort::Personal);
        }
        let range = s
            .strip_prefix(PEER_PREFIX)
            .ok_or_else(|| format!("not a cohort label: {s}"))?;
        let (first, last) = range
            .split_once('-')
            .ok_or_else(|| format!("not a cohort label: {s}"))?;
        let first: usize = first.parse().map_err(|_| format!("not a cohort label: {s}"))?;
        let last: usize = last.parse().map_err(|_| format!("not a cohort label: {s}"))?;

        if last >= PEER_GROUP_SIZE
            && last % PEER_GROUP_SIZE == 0
            && first == last - PEER_GROUP_SIZE + 1
        {
            Ok(Cohort::Peers(last / PEER_GROUP_SIZE))
        } else {
            Err(format!("not a cohort label: {s}"))
        }
    }
}

impl Serialize for Cohort {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// Label every record by the first-appearance order of its identifier.
///
/// The first identifier seen is `Personal`; the remaining identifiers are
/// bucketed in consecutive groups of [`PEER_GROUP_SIZE`]. A short final group
/// is still a group.
pub fn assign_cohorts(records: &[Record]) -> Vec<Cohort> {
    let personal = records.first().map(|r| r.id);
    let mut by_id: HashMap<i64, Cohort> = HashMap::new();
    let mut peers_seen = 0usize;

    records
        .iter()
        .map(|record| {
            *by_id.entry(record.id).or_insert_with(|| {
                if Some(record.id) == personal {
                    Cohort::Personal
                } else {
                    peers_seen += 1;
                    Cohort::Peers((peers_seen - 1) / PEER_GROUP_SIZE + 1)
                }
            })
        })
        .collect()
}
