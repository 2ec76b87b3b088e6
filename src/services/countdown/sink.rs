//! Render seams: a container resolved from a selector, and the sinks inside
//! it that receive one slot's formatted text per tick.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One resolved render container.
#[cfg_attr(test, mockall::automock)]
pub trait RenderTarget: Send {
    /// Writes `text` to every sink inside this container matching
    /// `selector`, returning how many sinks received it.
    fn render(&mut self, selector: &str, text: &str) -> usize;
}

/// Maps a container selector to the containers it matches.
pub trait SinkResolver {
    fn resolve(&self, selector: &str) -> Vec<Box<dyn RenderTarget>>;
}

#[derive(Debug, Default)]
struct BufferState {
    /// selector -> number of sinks and the last text written to them
    slots: HashMap<String, (usize, Option<String>)>,
    writes: usize,
}

/// In-memory render container. Clones share state, so a host can keep a
/// handle to read back what the engine rendered.
#[derive(Debug, Clone, Default)]
pub struct BufferTarget {
    state: Arc<Mutex<BufferState>>,
}

impl BufferTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sink answering to `selector`. Repeated calls add more sinks
    /// behind the same selector.
    pub fn with_sink(self, selector: impl Into<String>) -> Self {
        self.lock()
            .slots
            .entry(selector.into())
            .or_insert((0, None))
            .0 += 1;
        self
    }

    /// Buffer with one sink per default slot selector.
    pub fn with_default_slots() -> Self {
        Self::new()
            .with_sink(".days")
            .with_sink(".hours")
            .with_sink(".minutes")
            .with_sink(".seconds")
    }

    /// Last text written to `selector`.
    pub fn text(&self, selector: &str) -> Option<String> {
        self.lock()
            .slots
            .get(selector)
            .and_then(|(_, text)| text.clone())
    }

    /// Total sink writes so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, BufferState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RenderTarget for BufferTarget {
    fn render(&mut self, selector: &str, text: &str) -> usize {
        let mut state = self.lock();
        let Some((sinks, last)) = state.slots.get_mut(selector) else {
            return 0;
        };
        let sinks = *sinks;
        *last = Some(text.to_string());
        state.writes += sinks;
        sinks
    }
}

/// Resolver over registered [`BufferTarget`]s.
#[derive(Debug, Clone, Default)]
pub struct BufferResolver {
    containers: HashMap<String, Vec<BufferTarget>>,
}

impl BufferResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, selector: impl Into<String>, target: BufferTarget) -> Self {
        self.containers.entry(selector.into()).or_default().push(target);
        self
    }
}

impl SinkResolver for BufferResolver {
    fn resolve(&self, selector: &str) -> Vec<Box<dyn RenderTarget>> {
        self.containers
            .get(selector)
            .map(|targets| {
                targets
                    .iter()
                    .cloned()
                    .map(|target| Box::new(target) as Box<dyn RenderTarget>)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_records_last_text_per_selector() {
        let buffer = BufferTarget::new().with_sink(".days");
        let mut target = buffer.clone();

        assert_eq!(target.render(".days", "03"), 1);
        assert_eq!(target.render(".days", "02"), 1);
        assert_eq!(buffer.text(".days").as_deref(), Some("02"));
        assert_eq!(buffer.write_count(), 2);
    }

    #[test]
    fn buffer_reports_zero_for_unknown_selector() {
        let mut target = BufferTarget::new().with_sink(".days");
        assert_eq!(target.render(".hours", "01"), 0);
        assert_eq!(target.write_count(), 0);
    }

    #[test]
    fn duplicate_sinks_each_receive_text() {
        let buffer = BufferTarget::new().with_sink(".seconds").with_sink(".seconds");
        let mut target = buffer.clone();
        assert_eq!(target.render(".seconds", "59"), 2);
        assert_eq!(buffer.write_count(), 2);
    }

    #[test]
    fn resolver_returns_every_registered_container() {
        let resolver = BufferResolver::new()
            .register("#clock", BufferTarget::with_default_slots())
            .register("#clock", BufferTarget::with_default_slots());

        assert_eq!(resolver.resolve("#clock").len(), 2);
        assert!(resolver.resolve("#missing").is_empty());
    }
}
