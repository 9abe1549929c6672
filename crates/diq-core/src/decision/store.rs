use super::model::{DecisionId, DecisionRecord};
use super::stats::{DecisionSummary, guarded_divide};
use crate::error::{DiqError, Result};

/// The authoritative, ordered collection of decision records for the
/// active session.
///
/// Ordering is newest-first: the server returns the list that way and
/// freshly created records are prepended. The store never re-sorts and
/// never caches aggregates; each statistic is recomputed from the current
/// records on every call.
#[derive(Debug, Default, Clone)]
pub struct DecisionStore {
    records: Vec<DecisionRecord>,
}

impl DecisionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current records, newest first.
    pub fn records(&self) -> &[DecisionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by id.
    pub fn get(&self, id: &str) -> Option<&DecisionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Replaces the whole collection, keeping the given order.
    pub fn replace_all(&mut self, records: Vec<DecisionRecord>) {
        self.records = records;
    }

    /// Drops every record (session loss).
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Prepends a record the server has just created.
    pub fn insert_created(&mut self, record: DecisionRecord) {
        self.records.insert(0, record);
    }

    /// Swaps in the server's copy of an updated record, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` and leaves the store untouched when no record has
    /// that id; the updated record is never inserted.
    pub fn apply_outcome_patch(&mut self, id: &str, updated: DecisionRecord) -> Result<()> {
        let slot = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DiqError::not_found("decision", id))?;
        *slot = updated;
        Ok(())
    }

    /// Removes the record with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    /// Percentage of all records whose outcome was a success.
    ///
    /// Pending records count in the denominator. `0.0` when empty.
    pub fn compute_success_rate(&self) -> f64 {
        let successes = self.records.iter().filter(|r| r.is_success()).count();
        guarded_divide(successes as f64, self.records.len()) * 100.0
    }

    /// Mean happiness over records that have an outcome; `0.0` if none do.
    pub fn compute_average_happiness(&self) -> f64 {
        self.average_over_outcomes(|o| o.happiness)
    }

    /// Mean stress over records that have an outcome; `0.0` if none do.
    pub fn compute_average_stress(&self) -> f64 {
        self.average_over_outcomes(|o| o.stress)
    }

    fn average_over_outcomes(&self, score: impl Fn(&super::Outcome) -> u8) -> f64 {
        let (sum, count) = self
            .records
            .iter()
            .filter_map(|r| r.outcome.as_ref())
            .fold((0u64, 0usize), |(sum, count), o| {
                (sum + u64::from(score(o)), count + 1)
            });
        guarded_divide(sum as f64, count)
    }

    /// Records whose situation or decision contains `query`, ignoring case.
    ///
    /// The returned iterator is lazy and `Clone`, so it can be restarted.
    /// An empty query matches everything.
    pub fn filter_by_query<'a>(
        &'a self,
        query: &str,
    ) -> impl Iterator<Item = &'a DecisionRecord> + Clone + use<'a> {
        let needle = query.to_lowercase();
        self.records
            .iter()
            .filter(move |r| r.matches_lowercase(&needle))
    }

    /// Records still waiting for an outcome, in store order.
    pub fn pending_outcomes(&self) -> impl Iterator<Item = &DecisionRecord> + Clone {
        self.records.iter().filter(|r| r.is_pending_outcome())
    }

    /// Ids currently held, in order.
    pub fn ids(&self) -> Vec<DecisionId> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }

    /// Dashboard figures for the current collection.
    pub fn summary(&self) -> DecisionSummary {
        let pending = self.pending_outcomes().count();
        DecisionSummary {
            total: self.records.len(),
            with_outcome: self.records.len() - pending,
            pending,
            success_rate: self.compute_success_rate(),
            average_happiness: self.compute_average_happiness(),
            average_stress: self.compute_average_stress(),
        }
    }
}
