//! Chat service: one instance per application session.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use meublerp_core::{DomainError, DomainResult};
use meublerp_events::{Event, EventBus, Subscription};

use crate::chat::{
    ChatEvent, ChatMessage, ConnectionStatus, Conversation, ConversationId, DeliveryStatus,
};

/// Client-side chat state, kept up to date from the events of an injected bus.
///
/// The service never talks to the socket directly: the transport publishes
/// what it receives on the bus, and forwards the `OutgoingMessage` events the
/// service publishes. State only changes in [`ChatService::sync`], so a message
/// sent with [`ChatService::send`] shows up (as pending) after the next sync.
pub struct ChatService<B>
where
    B: EventBus<ChatEvent>,
{
    bus: B,
    subscription: Subscription<ChatEvent>,
    connection: ConnectionStatus,
    last_disconnect_reason: Option<String>,
    conversations: HashMap<ConversationId, Conversation>,
}

impl<B> ChatService<B>
where
    B: EventBus<ChatEvent>,
{
    pub fn new(bus: B) -> Self {
        let subscription = bus.subscribe();
        Self {
            bus,
            subscription,
            connection: ConnectionStatus::Disconnected,
            last_disconnect_reason: None,
            conversations: HashMap::new(),
        }
    }

    /// Apply every event queued on the subscription. Returns how many were applied.
    pub fn sync(&mut self) -> usize {
        let events = self.subscription.drain();
        for event in &events {
            self.apply(event);
        }
        events.len()
    }

    /// Apply one event. Safe to call more than once with the same event.
    pub fn apply(&mut self, event: &ChatEvent) {
        tracing::trace!(
            event_type = event.event_type(),
            occurred_at = %event.occurred_at(),
            "applying chat event"
        );

        match event {
            ChatEvent::Connected { .. } => {
                self.connection = ConnectionStatus::Connected;
                self.last_disconnect_reason = None;
            }
            ChatEvent::Disconnected { reason, .. } => {
                if self.connection == ConnectionStatus::Connected {
                    tracing::info!(reason = ?reason, "chat transport disconnected");
                }
                self.connection = ConnectionStatus::Disconnected;
                self.last_disconnect_reason = reason.clone();
            }
            ChatEvent::HistoryLoaded {
                conversation_id,
                messages,
                ..
            } => {
                let outcome = self.conversation_mut(*conversation_id).merge(messages.clone());
                tracing::debug!(
                    conversation = %conversation_id,
                    added = outcome.added,
                    updated = outcome.updated,
                    "history merged"
                );
            }
            ChatEvent::MessageReceived(message) | ChatEvent::OutgoingMessage(message) => {
                self.conversation_mut(message.conversation_id)
                    .merge(vec![message.clone()]);
            }
            ChatEvent::ConversationRead {
                conversation_id,
                reader,
                at,
            } => {
                self.conversation_mut(*conversation_id).mark_read(reader, *at);
            }
        }
    }

    /// Publish a new message for the transport to deliver.
    ///
    /// Returns the client id the server will echo back.
    pub fn send(
        &self,
        conversation_id: ConversationId,
        author: &str,
        body: &str,
    ) -> DomainResult<Uuid> {
        let body = body.trim();
        if body.is_empty() {
            return Err(DomainError::validation("message body must not be empty"));
        }
        if self.connection != ConnectionStatus::Connected {
            return Err(DomainError::conflict("chat is disconnected"));
        }
        if !self.conversations.contains_key(&conversation_id) {
            return Err(DomainError::not_found());
        }

        let client_id = Uuid::now_v7();
        let message = ChatMessage {
            id: None,
            client_id: Some(client_id),
            conversation_id,
            author: author.to_string(),
            body: body.to_string(),
            sent_at: Utc::now(),
            status: DeliveryStatus::Pending,
        };
        self.publish(ChatEvent::OutgoingMessage(message))?;
        Ok(client_id)
    }

    /// Publish that `reader` has read the conversation up to now.
    pub fn mark_read(&self, conversation_id: ConversationId, reader: &str) -> DomainResult<()> {
        if !self.conversations.contains_key(&conversation_id) {
            return Err(DomainError::not_found());
        }
        self.publish(ChatEvent::ConversationRead {
            conversation_id,
            reader: reader.to_string(),
            at: Utc::now(),
        })
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn last_disconnect_reason(&self) -> Option<&str> {
        self.last_disconnect_reason.as_deref()
    }

    pub fn conversation(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations.get(&id)
    }

    /// Conversations, most recent activity first.
    pub fn conversations(&self) -> Vec<&Conversation> {
        let mut list: Vec<&Conversation> = self.conversations.values().collect();
        list.sort_by(|a, b| {
            b.last_activity()
                .cmp(&a.last_activity())
                .then_with(|| a.id().cmp(&b.id()))
        });
        list
    }

    pub fn unread_count(&self, id: ConversationId, viewer: &str) -> usize {
        self.conversation(id)
            .map(|c| c.unread_count(viewer))
            .unwrap_or(0)
    }

    pub fn unread_total(&self, viewer: &str) -> usize {
        self.conversations
            .values()
            .map(|c| c.unread_count(viewer))
            .sum()
    }

    fn conversation_mut(&mut self, id: ConversationId) -> &mut Conversation {
        self.conversations
            .entry(id)
            .or_insert_with(|| Conversation::new(id))
    }

    fn publish(&self, event: ChatEvent) -> DomainResult<()> {
        self.bus.publish(event).map_err(|e| {
            tracing::error!(error = %e, "failed to publish chat event");
            DomainError::conflict(format!("chat event not published: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::MessageId;
    use chrono::{DateTime, TimeZone};
    use meublerp_events::InMemoryEventBus;
    use std::sync::Arc;

    type Bus = Arc<InMemoryEventBus<ChatEvent>>;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
    }

    fn message(id: u64, conversation: u64, author: &str, seconds: i64) -> ChatMessage {
        ChatMessage {
            id: Some(MessageId(id)),
            client_id: None,
            conversation_id: ConversationId(conversation),
            author: author.to_string(),
            body: format!("message {id}"),
            sent_at: at(seconds),
            status: DeliveryStatus::Sent,
        }
    }

    fn connected_service() -> (Bus, ChatService<Bus>) {
        let bus: Bus = Arc::new(InMemoryEventBus::new());
        let mut service = ChatService::new(bus.clone());
        bus.publish(ChatEvent::Connected { at: at(0) }).unwrap();
        bus.publish(ChatEvent::HistoryLoaded {
            conversation_id: ConversationId(1),
            messages: vec![
                message(1, 1, "atelier", 10),
                message(2, 1, "bureau", 20),
                message(3, 1, "atelier", 30),
            ],
            at: at(31),
        })
        .unwrap();
        service.sync();
        (bus, service)
    }

    #[test]
    fn starts_disconnected_and_follows_transport_status() {
        let bus: Bus = Arc::new(InMemoryEventBus::new());
        let mut service = ChatService::new(bus.clone());
        assert_eq!(service.connection(), ConnectionStatus::Disconnected);

        bus.publish(ChatEvent::Connected { at: at(0) }).unwrap();
        assert_eq!(service.sync(), 1);
        assert_eq!(service.connection(), ConnectionStatus::Connected);

        bus.publish(ChatEvent::Disconnected {
            at: at(5),
            reason: Some("ping timeout".to_string()),
        })
        .unwrap();
        service.sync();
        assert_eq!(service.connection(), ConnectionStatus::Disconnected);
        assert_eq!(service.last_disconnect_reason(), Some("ping timeout"));
    }

    #[test]
    fn unread_counts_ignore_own_messages_and_reads() {
        let (bus, mut service) = connected_service();

        assert_eq!(service.unread_count(ConversationId(1), "bureau"), 2);
        assert_eq!(service.unread_total("bureau"), 2);

        bus.publish(ChatEvent::ConversationRead {
            conversation_id: ConversationId(1),
            reader: "bureau".to_string(),
            at: at(25),
        })
        .unwrap();
        service.sync();
        assert_eq!(service.unread_count(ConversationId(1), "bureau"), 1);

        // Reads never move backwards.
        bus.publish(ChatEvent::ConversationRead {
            conversation_id: ConversationId(1),
            reader: "bureau".to_string(),
            at: at(5),
        })
        .unwrap();
        service.sync();
        assert_eq!(service.unread_count(ConversationId(1), "bureau"), 1);
    }

    #[test]
    fn sent_message_is_pending_until_echoed() {
        let (bus, mut service) = connected_service();
        let transport = bus.subscribe();

        let client_id = service
            .send(ConversationId(1), "bureau", "  Livraison confirmée  ")
            .unwrap();
        service.sync();

        let conversation = service.conversation(ConversationId(1)).unwrap();
        assert_eq!(conversation.messages().len(), 4);
        assert_eq!(conversation.pending_count(), 1);

        // The transport forwards the outgoing message and the server echoes it.
        let outgoing = match transport.try_recv().unwrap() {
            ChatEvent::OutgoingMessage(m) => m,
            other => panic!("Expected OutgoingMessage, got {other:?}"),
        };
        assert_eq!(outgoing.body, "Livraison confirmée");
        assert_eq!(outgoing.client_id, Some(client_id));

        bus.publish(ChatEvent::MessageReceived(ChatMessage {
            id: Some(MessageId(4)),
            status: DeliveryStatus::Sent,
            ..outgoing
        }))
        .unwrap();
        service.sync();

        let conversation = service.conversation(ConversationId(1)).unwrap();
        assert_eq!(conversation.messages().len(), 4);
        assert_eq!(conversation.pending_count(), 0);
    }

    #[test]
    fn send_is_rejected_when_it_cannot_be_delivered() {
        let (bus, mut service) = connected_service();

        assert!(matches!(
            service.send(ConversationId(1), "bureau", "   "),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(
            service.send(ConversationId(99), "bureau", "bonjour"),
            Err(DomainError::NotFound)
        );

        bus.publish(ChatEvent::Disconnected { at: at(40), reason: None }).unwrap();
        service.sync();
        assert!(matches!(
            service.send(ConversationId(1), "bureau", "bonjour"),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn replayed_events_do_not_duplicate_state() {
        let (bus, mut service) = connected_service();
        let received = ChatEvent::MessageReceived(message(10, 2, "atelier", 50));

        bus.publish(received.clone()).unwrap();
        bus.publish(received).unwrap();
        assert_eq!(service.sync(), 2);

        assert_eq!(service.conversation(ConversationId(2)).unwrap().messages().len(), 1);
        assert_eq!(service.unread_total("bureau"), 3);
    }

    #[test]
    fn conversations_are_listed_by_recent_activity() {
        let (bus, mut service) = connected_service();
        bus.publish(ChatEvent::MessageReceived(message(20, 2, "atelier", 100)))
            .unwrap();
        bus.publish(ChatEvent::MessageReceived(message(21, 3, "atelier", 5)))
            .unwrap();
        service.sync();

        let order: Vec<u64> = service.conversations().iter().map(|c| c.id().0).collect();
        assert_eq!(order, vec![2, 1, 3]);
    }

    #[test]
    fn mark_read_publishes_the_read_and_clears_unread() {
        let (bus, mut service) = connected_service();
        let transport = bus.subscribe();

        assert_eq!(
            service.mark_read(ConversationId(99), "bureau"),
            Err(DomainError::NotFound)
        );
        assert!(transport.try_recv().is_err());

        assert_eq!(service.unread_count(ConversationId(1), "bureau"), 2);
        service.mark_read(ConversationId(1), "bureau").unwrap();

        match transport.try_recv().unwrap() {
            ChatEvent::ConversationRead {
                conversation_id,
                reader,
                ..
            } => {
                assert_eq!(conversation_id, ConversationId(1));
                assert_eq!(reader, "bureau");
            }
            other => panic!("Expected ConversationRead, got {other:?}"),
        }

        service.sync();
        assert_eq!(service.unread_count(ConversationId(1), "bureau"), 0);
        assert_eq!(service.unread_total("bureau"), 0);
    }
}
