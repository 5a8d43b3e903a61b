use std::sync::{Mutex, MutexGuard};

/// Address-bar collaborator of the table view.
pub trait Navigator: Send + Sync {
    /// Replaces the query string of the current history entry.
    fn replace_query(&self, query: &str);
    /// Pushes a new location, e.g. a detail page.
    fn navigate(&self, path: &str);
}

#[derive(Debug, Default)]
struct MemoryLocation {
    query: String,
    visited: Vec<String>,
}

/// In-process [`Navigator`] for headless use.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    location: Mutex<MemoryLocation>,
}

impl MemoryNavigator {
    pub fn new(initial_query: impl Into<String>) -> Self {
        Self {
            location: Mutex::new(MemoryLocation {
                query: initial_query.into(),
                visited: Vec::new(),
            }),
        }
    }

    pub fn query(&self) -> String {
        self.lock().query.clone()
    }

    pub fn visited(&self) -> Vec<String> {
        self.lock().visited.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryLocation> {
        self.location
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Navigator for MemoryNavigator {
    fn replace_query(&self, query: &str) {
        self.lock().query = query.to_string();
    }

    fn navigate(&self, path: &str) {
        self.lock().visited.push(path.to_string());
    }
}
