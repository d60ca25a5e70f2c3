//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus is the seam between a transport (a WebSocket client, a test harness)
//! and the services that keep client-side state from what it delivers:
//!
//! ```text
//! socket transport ──publish──▶ EventBus ──subscribe──▶ ChatService
//!        ▲                                                  │
//!        └────────────── publish (outgoing) ────────────────┘
//! ```
//!
//! - **Transport-agnostic**: in-memory channels in tests, a socket bridge in the app
//! - **At-least-once delivery**: consumers must be idempotent
//! - **Broadcast**: each subscription receives a copy of every message

use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// A subscription to an event stream.
///
/// ```ignore
/// let subscription = bus.subscribe();
/// while let Ok(event) = subscription.try_recv() {
///     state.apply(event);
/// }
/// ```
///
/// Subscriptions are meant for single-threaded consumption.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain every message currently queued, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Broadcast channel between a transport and the services it feeds.
///
/// `publish` fails only on a fault of the bus itself (poisoned lock, closed
/// transport). Publishing with no subscriber is not an error.
pub trait EventBus<M>: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
