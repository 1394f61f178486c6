//! Per-collection mutation serializer.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Serializes read-modify-write cycles on one collection.
///
/// Every load → transform → save span runs while holding the gate, so two
/// concurrent mutations of the same collection never interleave and no
/// update is lost. Blocking and async callers contend on the same lock.
/// Gates of different collections are independent.
#[derive(Debug, Default)]
pub struct MutationGate {
    lock: Mutex<()>,
}

impl MutationGate {
    /// Creates an open gate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for the gate, blocking the current thread.
    ///
    /// # Panics
    ///
    /// Panics when called from within an async execution context; use
    /// [`MutationGate::enter`] there.
    pub fn enter_blocking(&self) -> MutexGuard<'_, ()> {
        self.lock.blocking_lock()
    }

    /// Waits for the gate, suspending the current task.
    pub async fn enter(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

/// Hands out one shared gate per collection name.
#[derive(Debug, Default)]
pub(crate) struct GateRegistry {
    gates: RwLock<HashMap<String, Arc<MutationGate>>>,
}

impl GateRegistry {
    /// Returns the gate for `name`, creating it on first use.
    pub(crate) fn gate(&self, name: &str) -> Arc<MutationGate> {
        if let Some(gate) = self.gates.read().get(name) {
            return Arc::clone(gate);
        }

        let mut gates = self.gates.write();
        Arc::clone(gates.entry(name.to_string()).or_default())
    }

    /// Number of collections that have been resolved so far.
    pub(crate) fn len(&self) -> usize {
        self.gates.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn same_name_shares_gate() {
        let registry = GateRegistry::default();
        let a = registry.gate("users");
        let b = registry.gate("users");
        let c = registry.gate("posts");

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn blocking_gate_excludes() {
        let gate = Arc::new(MutationGate::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = Arc::clone(&gate);
                let inside = Arc::clone(&inside);
                let max_seen = Arc::clone(&max_seen);
                thread::spawn(move || {
                    for _ in 0..50 {
                        let _guard = gate.enter_blocking();
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_seen.fetch_max(now, Ordering::SeqCst);
                        thread::yield_now();
                        inside.fetch_sub(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn async_gate_waits_for_holder() {
        let gate = Arc::new(MutationGate::new());
        let guard = gate.enter().await;

        let waiter = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                let _guard = gate.enter().await;
            })
        };

        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());
        drop(guard);
        waiter.await.unwrap();
    }
}
