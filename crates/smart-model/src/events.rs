use crate::event_error::EventError;
use async_trait::async_trait;
use std::fmt;

/// Lifecycle signals fired around validation and persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelEvent {
    Validating,
    Validated,
    Saving,
    Saved,
}

impl ModelEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelEvent::Validating => "validating",
            ModelEvent::Validated => "validated",
            ModelEvent::Saving => "saving",
            ModelEvent::Saved => "saved",
        }
    }

    /// "Before" events honour `EventError::PropagationStopped` as a veto
    pub fn is_vetoable(self) -> bool {
        matches!(self, ModelEvent::Validating | ModelEvent::Saving)
    }
}

impl fmt::Display for ModelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-level lifecycle listener. Return
/// `EventError::propagation_stopped` from `validating` or `saving` to veto.
#[async_trait]
pub trait ModelObserver<T: Send + Sync>: Send + Sync {
    async fn validating(&self, _model: &T) -> Result<(), EventError> {
        Ok(())
    }

    async fn validated(&self, _model: &T, _passed: bool) -> Result<(), EventError> {
        Ok(())
    }

    async fn saving(&self, _model: &mut T) -> Result<(), EventError> {
        Ok(())
    }

    async fn saved(&self, _model: &T) -> Result<(), EventError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    struct TestUser {
        name: String,
    }

    #[derive(Debug, Clone, Default)]
    struct TestObserver {
        events: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl ModelObserver<TestUser> for TestObserver {
        async fn saving(&self, model: &mut TestUser) -> Result<(), EventError> {
            self.events.lock().unwrap().push(format!("saving: {}", model.name));
            model.name = model.name.trim().to_string();
            Ok(())
        }

        async fn saved(&self, model: &TestUser) -> Result<(), EventError> {
            self.events.lock().unwrap().push(format!("saved: {}", model.name));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_observer_defaults_and_overrides() {
        let observer = TestObserver::default();
        let mut user = TestUser {
            name: " Ada ".to_string(),
        };

        assert!(observer.validating(&user).await.is_ok());
        assert!(observer.validated(&user, false).await.is_ok());
        observer.saving(&mut user).await.unwrap();
        observer.saved(&user).await.unwrap();

        assert_eq!(user.name, "Ada");
        assert_eq!(
            *observer.events.lock().unwrap(),
            vec!["saving:  Ada ".to_string(), "saved: Ada".to_string()]
        );
    }

    #[test]
    fn test_only_before_events_are_vetoable() {
        assert!(ModelEvent::Validating.is_vetoable());
        assert!(ModelEvent::Saving.is_vetoable());
        assert!(!ModelEvent::Validated.is_vetoable());
        assert!(!ModelEvent::Saved.is_vetoable());
        assert_eq!(ModelEvent::Saved.to_string(), "saved");
    }
}
