//! Subscription handles.

use crate::writable::Cell;
use std::sync::Weak;

/// Handle for a registered subscriber.
///
/// Returned by [`Writable::subscribe`](crate::Writable::subscribe) and
/// [`Derived::subscribe`](crate::Derived::subscribe). Call
/// [`unsubscribe`](Self::unsubscribe) to remove the callback; dropping the
/// handle without calling it leaves the subscription alive for the lifetime
/// of the cell.
///
/// The handle holds only a weak reference, so it never keeps the cell
/// itself alive.
pub struct Subscription<S> {
    id: u64,
    cell: Weak<Cell<S>>,
}

impl<S> Subscription<S> {
    pub(crate) fn new(id: u64, cell: Weak<Cell<S>>) -> Self {
        Self { id, cell }
    }

    /// Removes the callback from the observer list.
    ///
    /// A no-op if the cell has already been dropped.
    pub fn unsubscribe(self) {
        if let Some(cell) = self.cell.upgrade() {
            cell.remove_subscriber(self.id);
        }
    }
}

impl<S> std::fmt::Debug for Subscription<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &(self.cell.strong_count() > 0))
            .finish()
    }
}
