//! Messaging module: client-side chat state fed by socket events.
//!
//! The socket transport publishes [`ChatEvent`]s on an event bus; a
//! [`ChatService`] built once per session subscribes to that bus and keeps the
//! conversations, unread counters and connection status consumers read.

pub mod chat;
pub mod diff;
pub mod service;

pub use chat::{
    ChatEvent, ChatMessage, ConnectionStatus, Conversation, ConversationId, DeliveryStatus,
    MessageId,
};
pub use diff::{MergeOutcome, merge_messages};
pub use service::ChatService;
