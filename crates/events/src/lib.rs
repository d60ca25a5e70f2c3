//! Event publishing/subscription primitives.
//!
//! Real-time features (chat, connection status) are modelled as events pushed
//! onto a bus. Services subscribe to the bus they are handed at construction
//! instead of reaching for process-wide state.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
