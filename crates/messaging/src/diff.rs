//! List diffing for message lists pushed by the socket.
//!
//! The server may resend messages (history resync, reconnect) and echoes our
//! own messages back with their server id. Merging must therefore be
//! idempotent and must confirm pending messages instead of duplicating them.

use crate::chat::{ChatMessage, DeliveryStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub added: usize,
    pub updated: usize,
}

impl MergeOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.updated == 0
    }
}

/// Merge `incoming` into `existing`.
///
/// A message matches an existing one by server id, or failing that by client
/// id. Matches are replaced when they differ; the rest are appended. The list
/// ends up ordered by send time, then server id, with unacknowledged messages
/// after acknowledged ones sent at the same instant.
pub fn merge_messages(
    existing: &mut Vec<ChatMessage>,
    incoming: impl IntoIterator<Item = ChatMessage>,
) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for mut message in incoming {
        let position = existing.iter().position(|current| {
            (message.id.is_some() && current.id == message.id)
                || (message.client_id.is_some() && current.client_id == message.client_id)
        });

        match position {
            Some(idx) => {
                let current = &mut existing[idx];
                if message.client_id.is_none() {
                    message.client_id = current.client_id;
                }
                // A late local copy must not downgrade an acknowledged message.
                if message.id.is_none() && current.id.is_some() {
                    continue;
                }
                if *current != message {
                    *current = message;
                    outcome.updated += 1;
                }
            }
            None => {
                existing.push(message);
                outcome.added += 1;
            }
        }
    }

    if !outcome.is_unchanged() {
        existing.sort_by_key(|m| {
            (
                m.sent_at,
                m.status == DeliveryStatus::Pending,
                m.id.map(|id| id.0).unwrap_or(u64::MAX),
            )
        });
    }

    outcome
}
