use crate::event_error::EventError;
use crate::events::{ModelEvent, ModelObserver};
use tracing::debug;

/// Observers registered for one model type, fired in registration order.
/// The first error stops the chain.
pub struct ObserverRegistry<T: Send + Sync> {
    observers: Vec<Box<dyn ModelObserver<T>>>,
}

impl<T: Send + Sync> ObserverRegistry<T> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn register(&mut self, observer: Box<dyn ModelObserver<T>>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub async fn trigger_validating(&self, model: &T) -> Result<(), EventError> {
        for observer in &self.observers {
            settle(ModelEvent::Validating, observer.validating(model).await)?;
        }
        Ok(())
    }

    pub async fn trigger_validated(&self, model: &T, passed: bool) -> Result<(), EventError> {
        for observer in &self.observers {
            settle(ModelEvent::Validated, observer.validated(model, passed).await)?;
        }
        Ok(())
    }

    pub async fn trigger_saving(&self, model: &mut T) -> Result<(), EventError> {
        for observer in &self.observers {
            settle(ModelEvent::Saving, observer.saving(model).await)?;
        }
        Ok(())
    }

    pub async fn trigger_saved(&self, model: &T) -> Result<(), EventError> {
        for observer in &self.observers {
            settle(ModelEvent::Saved, observer.saved(model).await)?;
        }
        Ok(())
    }
}

/// A veto on an event that cannot be vetoed is ignored
fn settle(event: ModelEvent, result: Result<(), EventError>) -> Result<(), EventError> {
    match result {
        Err(err) if err.is_veto() && !event.is_vetoable() => {
            debug!("Ignoring veto on non-vetoable '{}' event: {}", event, err);
            Ok(())
        }
        other => other,
    }
}

impl<T: Send + Sync> Default for ObserverRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
