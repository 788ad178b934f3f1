//! Loader session status tracking

/// State of a loader session after its last operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// More objects may follow
    #[default]
    Ready,

    /// The sequence is exhausted
    Exhausted,

    /// The last operation failed
    Failed {
        /// Failure details
        details: String,
    },
}

impl SessionStatus {
    /// Check if the session can produce more objects
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionStatus::Ready)
    }

    /// Check if the sequence is exhausted
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, SessionStatus::Exhausted)
    }

    /// Check if the last operation failed
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, SessionStatus::Failed { .. })
    }

    /// Convert a failed status to a `StoreError`
    #[must_use]
    pub fn to_store_error(&self) -> Option<crate::StoreError> {
        match self {
            SessionStatus::Failed { details } => Some(crate::StoreError::loader(details.clone())),
            SessionStatus::Ready | SessionStatus::Exhausted => None,
        }
    }
}

/// Trait for loader sessions that track their status
pub trait SessionStatusTracking {
    /// Get the current session status
    fn status(&self) -> &SessionStatus;

    /// Set the session status
    fn set_status(&mut self, status: SessionStatus);

    /// Record a failure and hand the error back for propagation
    fn fail(&mut self, error: crate::StoreError) -> crate::StoreError {
        self.set_status(SessionStatus::Failed {
            details: error.to_string(),
        });
        error
    }

    /// Check if the last operation failed
    fn last_operation_failed(&self) -> bool {
        self.status().is_failed()
    }
}
