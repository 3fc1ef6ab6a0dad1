use std::fmt;

/// Failure raised by a lifecycle observer or per-call hook
#[derive(Debug, Clone, PartialEq)]
pub enum EventError {
    Observer {
        message: String,
    },
    /// Veto: the "before" event asked the operation to stop
    PropagationStopped {
        reason: String,
    },
}

impl EventError {
    pub fn observer(message: &str) -> Self {
        Self::Observer {
            message: message.to_string(),
        }
    }

    pub fn propagation_stopped(reason: &str) -> Self {
        Self::PropagationStopped {
            reason: reason.to_string(),
        }
    }

    pub fn is_veto(&self) -> bool {
        matches!(self, Self::PropagationStopped { .. })
    }
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventError::Observer { message } => write!(f, "Observer error: {}", message),
            EventError::PropagationStopped { reason } => {
                write!(f, "Event propagation stopped: {}", reason)
            }
        }
    }
}

impl std::error::Error for EventError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observer_error_display() {
        let error = EventError::observer("audit log unavailable");
        assert_eq!(error.to_string(), "Observer error: audit log unavailable");
    }

    #[test]
    fn test_only_propagation_stopped_is_a_veto() {
        assert!(EventError::propagation_stopped("locked").is_veto());
        assert!(!EventError::observer("boom").is_veto());
    }

    #[test]
    fn test_propagation_stopped_display() {
        let error = EventError::propagation_stopped("User cancelled operation");
        assert_eq!(error.to_string(), "Event propagation stopped: User cancelled operation");
    }
}
