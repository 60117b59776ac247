use thiserror::Error;

/// Why a dialog future finished without a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogError {
    /// Dismissed without a result: escape, overlay click, back button, `cancel`.
    #[error("dialog cancelled")]
    Cancelled,

    /// Removed by `close_all` or store teardown.
    #[error("all dialogs closed")]
    AllClosed,

    /// `close` was called with a value of a different type than the caller awaits.
    #[error("dialog closed with unexpected result type, expected {expected}")]
    UnexpectedResult { expected: &'static str },
}

impl DialogError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DialogError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(DialogError::Cancelled.to_string(), "dialog cancelled");
        assert_eq!(DialogError::AllClosed.to_string(), "all dialogs closed");
        assert_eq!(
            DialogError::UnexpectedResult { expected: "u32" }.to_string(),
            "dialog closed with unexpected result type, expected u32"
        );
    }

    #[test]
    fn test_cancellation_is_distinguishable() {
        assert!(DialogError::Cancelled.is_cancelled());
        assert!(!DialogError::AllClosed.is_cancelled());
    }
}
