use std::collections::HashMap;

/// `stable_id -> person.id` for one event-year, seeded inside the ingestion
/// transaction and extended as new participants are inserted.
///
/// Later rows for a participant first seen earlier in the same batch hit the
/// update branch of the upsert, so their ids must come from here as well.
#[derive(Debug, Default)]
pub(crate) struct PersonIdMap {
    ids: HashMap<String, i64>,
}

impl PersonIdMap {
    pub(crate) fn new(existing: Vec<(String, i64)>) -> Self {
        Self {
            ids: existing.into_iter().collect(),
        }
    }

    pub(crate) fn get(&self, stable_id: &str) -> Option<i64> {
        self.ids.get(stable_id).copied()
    }

    pub(crate) fn record(&mut self, stable_id: &str, id: i64) {
        self.ids.insert(stable_id.to_string(), id);
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }
}
