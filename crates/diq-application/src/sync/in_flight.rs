use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use diq_core::{DiqError, Result};

/// Set of decision ids with a mutation currently on the wire.
///
/// A second mutation on an id already present is rejected rather than
/// queued. Ids leave the set when their [`InFlightPermit`] is dropped,
/// whatever the request's outcome.
#[derive(Debug, Default, Clone)]
pub struct InFlightRegistry {
    ids: Arc<Mutex<HashSet<String>>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // The set is only ever mutated by single insert/remove calls.
        self.ids.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Claims `id`, or fails with `OperationInProgress` if already claimed.
    pub fn try_acquire(&self, id: &str) -> Result<InFlightPermit> {
        if !self.lock().insert(id.to_string()) {
            return Err(DiqError::OperationInProgress(id.to_string()));
        }
        Ok(InFlightPermit {
            registry: self.clone(),
            id: id.to_string(),
        })
    }

    pub fn is_in_flight(&self, id: &str) -> bool {
        self.lock().contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// RAII claim on one id.
#[derive(Debug)]
pub struct InFlightPermit {
    registry: InFlightRegistry,
    id: String,
}

impl Drop for InFlightPermit {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_rejected() {
        let registry = InFlightRegistry::new();
        let _permit = registry.try_acquire("a").unwrap();

        let err = registry.try_acquire("a").unwrap_err();
        assert_eq!(err, DiqError::OperationInProgress("a".to_string()));
        assert!(registry.try_acquire("b").is_ok());
    }

    #[test]
    fn test_drop_releases() {
        let registry = InFlightRegistry::new();
        {
            let _permit = registry.try_acquire("a").unwrap();
            assert!(registry.is_in_flight("a"));
        }
        assert!(!registry.is_in_flight("a"));
        assert!(registry.is_empty());
        assert!(registry.try_acquire("a").is_ok());
    }
}
