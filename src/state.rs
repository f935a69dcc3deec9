use crate::errors::SyncError;
use crate::models::Item;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Client-side cache mirroring the last successful server responses.
#[derive(Debug, Default)]
pub struct ListData {
    pub items: Vec<Item>,
    pub categories: Vec<String>,
    issued_loads: u64,
    in_flight: HashSet<i64>,
}

impl ListData {
    pub fn find(&self, id: i64) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Replaces the cached entry with the same id; returns false if none matched.
    pub fn replace(&mut self, updated: Item) -> bool {
        match self.items.iter_mut().find(|item| item.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: i64) {
        self.items.retain(|item| item.id != id);
    }

    /// Makes every load issued so far stale, so a list fetched before a
    /// successful write cannot overwrite it.
    pub fn invalidate_loads(&mut self) {
        self.issued_loads += 1;
    }
}

#[derive(Clone, Default)]
pub struct ListState {
    data: Arc<Mutex<ListData>>,
}

impl ListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, ListData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a list load and returns its sequence number.
    pub fn begin_load(&self) -> u64 {
        let mut data = self.lock();
        data.invalidate_loads();
        data.issued_loads
    }

    /// Installs a loaded list unless a newer load was issued meanwhile.
    pub fn finish_load(&self, seq: u64, items: Vec<Item>) -> bool {
        let mut data = self.lock();
        if seq != data.issued_loads {
            return false;
        }
        data.items = items;
        true
    }

    /// Marks `id` as having a write in flight until the returned guard drops.
    pub fn claim(&self, id: i64) -> Result<InFlight, SyncError> {
        let mut data = self.lock();
        if !data.in_flight.insert(id) {
            return Err(SyncError::Busy(id));
        }
        Ok(InFlight {
            state: self.clone(),
            ids: vec![id],
        })
    }

    /// Claims every cached id at once, for list-wide writes.
    pub fn claim_all(&self) -> Result<InFlight, SyncError> {
        let mut data = self.lock();
        let ids: Vec<i64> = data.items.iter().map(|item| item.id).collect();
        if let Some(busy) = ids.iter().find(|id| data.in_flight.contains(*id)) {
            return Err(SyncError::Busy(*busy));
        }
        data.in_flight.extend(ids.iter().copied());
        Ok(InFlight {
            state: self.clone(),
            ids,
        })
    }

    pub fn is_in_flight(&self, id: i64) -> bool {
        self.lock().in_flight.contains(&id)
    }
}

pub struct InFlight {
    state: ListState,
    ids: Vec<i64>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let mut data = self.state.lock();
        for id in &self.ids {
            data.in_flight.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64) -> Item {
        Item {
            id,
            name: format!("item {id}"),
            category: "Outros".to_string(),
            purchased: false,
            quantity: None,
            unit_price: None,
            total_value: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn stale_load_is_discarded() {
        let state = ListState::new();
        let first = state.begin_load();
        let second = state.begin_load();

        assert!(state.finish_load(second, vec![item(2)]));
        assert!(!state.finish_load(first, vec![item(1)]));

        let data = state.lock();
        assert_eq!(data.items.len(), 1);
        assert_eq!(data.items[0].id, 2);
    }

    #[test]
    fn claim_is_exclusive_until_released() {
        let state = ListState::new();
        let guard = state.claim(5).unwrap();
        assert!(state.is_in_flight(5));
        assert!(matches!(state.claim(5), Err(SyncError::Busy(5))));
        assert!(state.claim(6).is_ok());

        drop(guard);
        assert!(!state.is_in_flight(5));
        assert!(state.claim(5).is_ok());
    }

    #[test]
    fn claim_all_conflicts_with_pending_item() {
        let state = ListState::new();
        state.lock().items = vec![item(1), item(2)];
        let pending = state.claim(2).unwrap();
        assert!(matches!(state.claim_all(), Err(SyncError::Busy(2))));
        drop(pending);

        let all = state.claim_all().unwrap();
        assert!(state.is_in_flight(1));
        drop(all);
        assert!(!state.is_in_flight(1));
    }

    #[test]
    fn replace_and_remove_by_id() {
        let mut data = ListData::default();
        data.items = vec![item(1), item(2)];

        let mut updated = item(2);
        updated.purchased = true;
        assert!(data.replace(updated));
        assert!(data.find(2).unwrap().purchased);
        assert!(!data.replace(item(9)));

        data.remove(1);
        assert!(data.find(1).is_none());
        assert_eq!(data.items.len(), 1);
    }

    #[test]
    fn write_invalidates_pending_load() {
        let state = ListState::new();
        let seq = state.begin_load();
        state.lock().invalidate_loads();
        assert!(!state.finish_load(seq, vec![item(1)]));
        assert!(state.lock().items.is_empty());
    }
}
