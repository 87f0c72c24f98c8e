//! Shared test doubles and utilities for the QuizRush game backend.

mod clock;
mod publisher;
mod repository;
mod rng;

pub use clock::{FixedClock, SteppingClock, fixed_now};
pub use publisher::{FailingPublisher, RecordingPublisher};
pub use repository::InMemoryUserRepository;
pub use rng::{MockRng, SequenceRng};
