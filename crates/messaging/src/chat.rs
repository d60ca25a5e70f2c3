use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use meublerp_core::Entity;
use meublerp_events::Event;

use crate::diff::{MergeOutcome, merge_messages};

/// Conversation identifier, as assigned by the chat server.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(pub u64);

impl core::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Message identifier, as assigned by the chat server.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// Published locally, not yet echoed back by the server.
    Pending,
    Sent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Server id; `None` until the server acknowledged the message.
    pub id: Option<MessageId>,
    /// Id generated by the sending client, echoed back by the server.
    pub client_id: Option<Uuid>,
    pub conversation_id: ConversationId,
    pub author: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    pub status: DeliveryStatus,
}

impl Entity for ChatMessage {
    type Id = MessageId;

    fn id(&self) -> Option<&Self::Id> {
        self.id.as_ref()
    }
}

/// Events of the chat socket, as seen by client-side consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatEvent {
    Connected {
        at: DateTime<Utc>,
    },
    Disconnected {
        at: DateTime<Utc>,
        reason: Option<String>,
    },
    /// Full history of a conversation (initial load or resync).
    HistoryLoaded {
        conversation_id: ConversationId,
        messages: Vec<ChatMessage>,
        at: DateTime<Utc>,
    },
    MessageReceived(ChatMessage),
    /// A message this client wants delivered; the transport forwards it.
    OutgoingMessage(ChatMessage),
    ConversationRead {
        conversation_id: ConversationId,
        reader: String,
        at: DateTime<Utc>,
    },
}

impl Event for ChatEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ChatEvent::Connected { .. } => "messaging.chat.connected",
            ChatEvent::Disconnected { .. } => "messaging.chat.disconnected",
            ChatEvent::HistoryLoaded { .. } => "messaging.chat.history_loaded",
            ChatEvent::MessageReceived(_) => "messaging.chat.message_received",
            ChatEvent::OutgoingMessage(_) => "messaging.chat.outgoing_message",
            ChatEvent::ConversationRead { .. } => "messaging.chat.conversation_read",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ChatEvent::Connected { at } => *at,
            ChatEvent::Disconnected { at, .. } => *at,
            ChatEvent::HistoryLoaded { at, .. } => *at,
            ChatEvent::MessageReceived(m) => m.sent_at,
            ChatEvent::OutgoingMessage(m) => m.sent_at,
            ChatEvent::ConversationRead { at, .. } => *at,
        }
    }
}

/// Client-side state of one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    id: ConversationId,
    messages: Vec<ChatMessage>,
    /// Reader → everything up to this instant has been read.
    read_until: HashMap<String, DateTime<Utc>>,
}

impl Conversation {
    pub fn new(id: ConversationId) -> Self {
        Self {
            id,
            messages: Vec::new(),
            read_until: HashMap::new(),
        }
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    /// Messages ordered by send time.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.messages.last().map(|m| m.sent_at)
    }

    pub fn pending_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.status == DeliveryStatus::Pending)
            .count()
    }

    /// Messages from other authors sent after `viewer` last read the conversation.
    pub fn unread_count(&self, viewer: &str) -> usize {
        let read_until = self.read_until.get(viewer);
        self.messages
            .iter()
            .filter(|m| m.author != viewer)
            .filter(|m| read_until.is_none_or(|at| m.sent_at > *at))
            .count()
    }

    pub(crate) fn merge(&mut self, incoming: Vec<ChatMessage>) -> MergeOutcome {
        merge_messages(&mut self.messages, incoming)
    }

    pub(crate) fn mark_read(&mut self, reader: &str, at: DateTime<Utc>) {
        let entry = self.read_until.entry(reader.to_string()).or_insert(at);
        if at > *entry {
            *entry = at;
        }
    }
}
