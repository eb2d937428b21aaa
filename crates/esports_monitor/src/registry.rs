use std::collections::HashSet;

use crate::record::{MatchId, MatchRecord};

/// Identities already alerted during this process lifetime.
///
/// Append-only and in-memory: a restart forgets everything, so currently
/// listed matches are alerted again once.
#[derive(Debug, Default, Clone)]
pub struct DedupRegistry {
    seen: HashSet<MatchId>,
}

impl DedupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &MatchId) -> bool {
        self.seen.contains(id)
    }

    /// Returns `true` when the identity was not present before.
    pub fn insert(&mut self, id: MatchId) -> bool {
        self.seen.insert(id)
    }

    pub fn mark_all<'a>(&mut self, records: impl IntoIterator<Item = &'a MatchRecord>) {
        for rec in records {
            self.seen.insert(rec.id.clone());
        }
    }

    /// Drops records already seen and repeats inside the batch, keeping order.
    pub fn fresh(&self, batch: Vec<MatchRecord>) -> Vec<MatchRecord> {
        let mut in_batch = HashSet::new();
        batch
            .into_iter()
            .filter(|rec| !self.contains(&rec.id) && in_batch.insert(rec.id.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
