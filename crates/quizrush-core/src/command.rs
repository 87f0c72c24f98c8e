//! Command abstractions.

use uuid::Uuid;

use crate::event::Causation;

/// Trait that all commands implement.
///
/// Every command opens a correlation: the events it produces, and every
/// reaction they trigger downstream, carry its correlation ID.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted `<context>.<verb>` name used in logs.
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the saga.
    fn correlation_id(&self) -> Uuid;

    /// Causation for mutations the command performs directly.
    fn causation(&self) -> Causation {
        Causation::root(self.correlation_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Ping(Uuid);

    impl Command for Ping {
        fn command_type(&self) -> &'static str {
            "test.ping"
        }

        fn correlation_id(&self) -> Uuid {
            self.0
        }
    }

    #[test]
    fn test_causation_is_rooted_at_the_correlation_id() {
        let correlation_id = Uuid::new_v4();

        let cause = Ping(correlation_id).causation();

        assert_eq!(cause.correlation_id, correlation_id);
        assert_eq!(cause.causation_id, correlation_id);
    }
}
