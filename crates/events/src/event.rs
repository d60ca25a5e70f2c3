use chrono::{DateTime, Utc};

/// Something that happened on a real-time channel.
///
/// Transports may deliver the same event twice (reconnects, resyncs), so
/// whoever applies events must tolerate duplicates.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Dotted name used in logs, e.g. `messaging.chat.message_received`.
    fn event_type(&self) -> &'static str;

    /// When the event happened according to its source.
    fn occurred_at(&self) -> DateTime<Utc>;
}
