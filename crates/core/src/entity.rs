//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Back-office records (purchase orders, conversations) are owned by the remote
/// API, so their identifiers are optional until the server has assigned one.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier, if the record has been persisted remotely.
    fn id(&self) -> Option<&Self::Id>;

    /// Whether the record is known to the remote API.
    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}
