//! Optimistic values awaiting remote confirmation.

/// A confirmed value plus at most one unconfirmed replacement.
///
/// Edits are staged locally, written remotely, then either committed (the
/// write succeeded) or reverted (it failed). Readers that must not observe
/// unconfirmed data use [`confirmed`](Self::confirmed).
#[derive(Debug, Clone, PartialEq)]
pub struct Staged<T> {
    confirmed: T,
    pending: Option<T>,
}

impl<T> Staged<T> {
    pub fn new(confirmed: T) -> Self {
        Self {
            confirmed,
            pending: None,
        }
    }

    pub fn confirmed(&self) -> &T {
        &self.confirmed
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// The pending value if there is one, otherwise the confirmed value.
    pub fn current(&self) -> &T {
        self.pending.as_ref().unwrap_or(&self.confirmed)
    }

    pub fn is_dirty(&self) -> bool {
        self.pending.is_some()
    }

    /// Replaces any earlier pending value.
    pub fn stage(&mut self, value: T) {
        self.pending = Some(value);
    }

    /// Promotes the pending value. Returns false when nothing was staged.
    pub fn commit(&mut self) -> bool {
        match self.pending.take() {
            Some(value) => {
                self.confirmed = value;
                true
            }
            None => false,
        }
    }

    /// Replaces the confirmed value with the authoritative one and drops any
    /// pending value.
    pub fn confirm(&mut self, value: T) {
        self.confirmed = value;
        self.pending = None;
    }

    /// Drops the pending value after a failed write and hands it back.
    pub fn revert(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Abandons an unconfirmed edit.
    pub fn discard(&mut self) {
        self.pending = None;
    }

    pub fn into_confirmed(self) -> T {
        self.confirmed
    }
}

impl<T: Default> Default for Staged<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
