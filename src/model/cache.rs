//! Cached child collections.

/// State of a cached collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheState<T> {
    /// Never loaded.
    Unloaded,
    /// Loaded and current.
    Loaded(Vec<T>),
    /// Loaded, but a mutation may have changed membership.
    Stale(Vec<T>),
}

impl<T> Default for CacheState<T> {
    fn default() -> Self {
        Self::Unloaded
    }
}

/// A child collection that is replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cache<T> {
    state: CacheState<T>,
}

impl<T> Default for Cache<T> {
    fn default() -> Self {
        Self { state: CacheState::Unloaded }
    }
}

impl<T> Cache<T> {
    /// An unloaded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &CacheState<T> {
        &self.state
    }

    /// Whether the next read has to go to the backend.
    ///
    /// An empty loaded collection is reloaded too, so a list that was empty
    /// at first read picks up later additions.
    pub fn needs_load(&self, force: bool) -> bool {
        match &self.state {
            CacheState::Loaded(items) => force || items.is_empty(),
            CacheState::Unloaded | CacheState::Stale(_) => true,
        }
    }

    /// Replace the contents and mark them current.
    pub fn replace(&mut self, items: Vec<T>) {
        self.state = CacheState::Loaded(items);
    }

    /// Mark loaded contents as stale. An unloaded cache stays unloaded.
    pub fn invalidate(&mut self) {
        self.state = match std::mem::take(&mut self.state) {
            CacheState::Loaded(items) | CacheState::Stale(items) => CacheState::Stale(items),
            CacheState::Unloaded => CacheState::Unloaded,
        };
    }

    /// The cached items, current or stale. Empty when unloaded.
    pub fn items(&self) -> &[T] {
        match &self.state {
            CacheState::Loaded(items) | CacheState::Stale(items) => items,
            CacheState::Unloaded => &[],
        }
    }
}
