//! Queries and Host Groups
//!
//! A [`Query`] is one time-range request for one host. Queries are grouped by
//! host into [`WorkGroup`]s, which are the unit a worker claims: all queries for
//! a host run sequentially on the same worker, keeping connection and cache
//! locality on the database side.

use chrono::{DateTime, Utc};
use fxhash::FxHashMap;

/// A single time-range query for one host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Host the query filters on
    pub host: String,
    /// Inclusive range start
    pub start: DateTime<Utc>,
    /// Inclusive range end
    pub end: DateTime<Utc>,
}

impl Query {
    /// Create a new query
    pub fn new(host: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            host: host.into(),
            start,
            end,
        }
    }
}

/// Order in which host groups are handed to workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOrder {
    /// Largest groups first, so no worker picks up a long group at the end of
    /// the run while the others sit idle. Ties keep first-seen host order.
    #[default]
    LargestFirst,
    /// First-seen host order
    Arrival,
}

/// All queries for one host, in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkGroup {
    host: String,
    queries: Vec<Query>,
}

impl WorkGroup {
    /// Host shared by every query in the group
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Queries in input order
    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    /// Number of queries in the group
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether the group holds no queries (never true for partitioned groups)
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Partition queries into per-host groups.
    ///
    /// Every input query lands in exactly one group, grouped by exact host
    /// string equality, with the relative order of a host's queries preserved.
    pub fn partition(queries: Vec<Query>, order: GroupOrder) -> Vec<WorkGroup> {
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        let mut groups: Vec<WorkGroup> = Vec::new();

        for query in queries {
            match index.get(&query.host) {
                Some(&i) => groups[i].queries.push(query),
                None => {
                    index.insert(query.host.clone(), groups.len());
                    groups.push(WorkGroup {
                        host: query.host.clone(),
                        queries: vec![query],
                    });
                }
            }
        }

        if order == GroupOrder::LargestFirst {
            // Stable, so equal-sized groups stay in first-seen order
            groups.sort_by(|a, b| b.len().cmp(&a.len()));
        }

        groups
    }
}
