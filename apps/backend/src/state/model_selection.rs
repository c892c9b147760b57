use std::sync::Arc;

use parking_lot::RwLock;

/// Reference default inference model.
pub const DEFAULT_MODEL: &str = "gemma3:12b";

/// Currently selected inference model, shared by every request.
///
/// Cloning yields another handle to the same value. Reads and writes each
/// take the lock once, so a reader sees either the old or the new name in
/// full. Any string is accepted.
#[derive(Debug, Clone)]
pub struct ModelSelection {
    inner: Arc<RwLock<String>>,
}

impl ModelSelection {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(default.into())),
        }
    }

    pub fn current(&self) -> String {
        self.inner.read().clone()
    }

    /// Replace the selection, returning the previous one.
    pub fn select(&self, name: impl Into<String>) -> String {
        std::mem::replace(&mut *self.inner.write(), name.into())
    }
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn starts_with_default() {
        assert_eq!(ModelSelection::default().current(), "gemma3:12b");
    }

    #[test]
    fn select_returns_previous_and_is_shared_across_clones() {
        let models = ModelSelection::new("a");
        let handle = models.clone();

        assert_eq!(handle.select("b"), "a");
        assert_eq!(models.current(), "b");
    }

    #[test]
    fn concurrent_selects_never_tear() {
        let long_a = "a".repeat(4096);
        let long_b = "b".repeat(4096);
        let models = ModelSelection::new("initial");

        let writers: Vec<_> = [long_a.clone(), long_b.clone()]
            .into_iter()
            .map(|name| {
                let models = models.clone();
                thread::spawn(move || {
                    for _ in 0..200 {
                        models.select(name.clone());
                    }
                })
            })
            .collect();

        let reader = {
            let models = models.clone();
            let (a, b) = (long_a.clone(), long_b.clone());
            thread::spawn(move || {
                for _ in 0..2000 {
                    let seen = models.current();
                    assert!(seen == "initial" || seen == a || seen == b);
                }
            })
        };

        for w in writers {
            w.join().unwrap();
        }
        reader.join().unwrap();

        let last = models.current();
        assert!(last == long_a || last == long_b);
    }
}
