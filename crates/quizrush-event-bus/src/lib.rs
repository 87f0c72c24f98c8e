//! QuizRush: in-process event bus.
//!
//! Choreography handlers are collected once into an immutable
//! [`HandlerRegistry`] at startup. The [`InProcessEventBus`] dispatches each
//! published event to the handlers subscribed to its name, one at a time,
//! in registration order.

pub mod bus;
pub mod registry;

pub use bus::InProcessEventBus;
pub use registry::{HandlerRegistry, HandlerRegistryBuilder};
