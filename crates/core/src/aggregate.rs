//! Merging extraction batches into one deduplicated endpoint list.

use crate::model::EndpointRecord;
use std::collections::HashSet;
use tracing::debug;

/// What happened to one batch handed to [`Aggregator::ingest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub offered: usize,
    pub accepted: usize,
    pub duplicates: usize,
    pub incomplete: usize,
}

/// Accumulated endpoints plus the identity keys already seen.
///
/// Records are kept in arrival order: first by batch, then by their order
/// within the batch. The first record for an identity wins.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    seen: HashSet<String>,
    records: Vec<EndpointRecord>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a batch of candidates. Duplicates and records failing the
    /// required-field check are dropped.
    pub fn ingest<I>(&mut self, batch: I) -> BatchSummary
    where
        I: IntoIterator<Item = EndpointRecord>,
    {
        let mut summary = BatchSummary::default();
        for record in batch {
            summary.offered += 1;

            let key = record.identity_key();
            if self.seen.contains(&key) {
                summary.duplicates += 1;
                continue;
            }
            if !record.is_complete() {
                debug!(key = %key, "dropping endpoint with missing required fields");
                summary.incomplete += 1;
                continue;
            }

            self.seen.insert(key);
            self.records.push(record);
            summary.accepted += 1;
        }
        summary
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    pub fn records(&self) -> &[EndpointRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<EndpointRecord> {
        self.records
    }
}

/// By-value form of [`Aggregator::ingest`]: state in, state out.
pub fn fold<I>(mut aggregator: Aggregator, batch: I) -> Aggregator
where
    I: IntoIterator<Item = EndpointRecord>,
{
    aggregator.ingest(batch);
    aggregator
}
