//! Per-runtime bookkeeping that would otherwise live in process globals.

use rustc_hash::FxHashSet;
use std::cell::{Cell, RefCell};

/// Id generator and warn-once cache scoped to one [`FrameRuntime`](crate::FrameRuntime).
#[derive(Debug, Default)]
pub struct EngineRegistry {
    next_id: Cell<u64>,
    warned: RefCell<FxHashSet<String>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id. Ids start at 1 and never repeat within a registry.
    pub fn next_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }

    /// Logs `message` at warn level the first time `key` is seen.
    ///
    /// Returns `true` when the warning was emitted.
    pub fn warn_once(&self, key: &str, message: impl FnOnce() -> String) -> bool {
        if self.warned.borrow().contains(key) {
            return false;
        }
        self.warned.borrow_mut().insert(key.to_owned());
        log::warn!("{}", message());
        true
    }

    pub fn has_warned(&self, key: &str) -> bool {
        self.warned.borrow().contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let registry = EngineRegistry::new();
        assert_eq!(registry.next_id(), 1);
        assert_eq!(registry.next_id(), 2);
    }

    #[test]
    fn warn_once_dedupes_by_key() {
        let registry = EngineRegistry::new();
        assert!(registry.warn_once("detached:3", || "element 3 detached".into()));
        assert!(!registry.warn_once("detached:3", || unreachable!()));
        assert!(registry.has_warned("detached:3"));
        assert!(!registry.has_warned("detached:4"));
    }
}
