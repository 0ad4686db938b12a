//! Progress observation
//!
//! Observers are called synchronously, in emission order, on the task that
//! runs the pipeline. Nothing in the pipeline reads back from an observer.

use lyricount_common::PipelineEvent;
use std::sync::{Arc, Mutex};

/// Receives pipeline events as they happen
pub trait ProgressObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

impl<F> ProgressObserver for F
where
    F: Fn(&PipelineEvent) + Send + Sync,
{
    fn on_event(&self, event: &PipelineEvent) {
        self(event)
    }
}

/// Deliver an event if an observer is attached
///
/// The event is only built when someone is listening.
pub(crate) fn emit(
    observer: Option<&Arc<dyn ProgressObserver>>,
    make_event: impl FnOnce() -> PipelineEvent,
) {
    if let Some(observer) = observer {
        let event = make_event();
        tracing::trace!(event = event.event_type(), "Pipeline event");
        observer.on_event(&event);
    }
}

/// Observer that keeps every event it receives
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Arc<Mutex<Vec<PipelineEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Event type names in arrival order
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(PipelineEvent::event_type)
            .collect()
    }
}

impl ProgressObserver for EventLog {
    fn on_event(&self, event: &PipelineEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
    }
}
