//! Ordering engine for lander.
//!
//! Sections and embedded items share one ordering model:
//!
//! - [`Ordered`]: anything with a key and a positive `order` value
//! - [`next_order`] / [`is_duplicate`]: assignment and collision checks
//! - [`swap_and_repack`], [`move_up`], [`move_down`]: explicit reordering,
//!   which always leaves orders contiguous `1..=N`
//! - [`OrderPool`]: the orderable subset of a list; pinned items (hero)
//!   never enter it
//!
//! Outside explicit reorders, orders are "unique, gaps allowed".

mod engine;
mod pool;

pub use engine::{
    duplicate_orders, is_duplicate, move_down, move_up, next_order, position, repack,
    sort_by_order, swap_and_repack,
};
pub use pool::OrderPool;

use std::fmt;

/// Result type for ordering operations.
pub type OrderingResult<T> = Result<T, OrderingError>;

/// Errors that can occur while reordering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderingError {
    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("item not found in orderable list: {0}")]
    NotFound(String),
}

/// An element that carries a display order.
pub trait Ordered {
    /// Identity used to exclude an item from its own duplicate check.
    type Key: PartialEq + Clone + fmt::Debug;

    fn key(&self) -> &Self::Key;

    fn order(&self) -> u32;

    fn set_order(&mut self, order: u32);

    /// Pinned elements have a fixed position and are kept out of every
    /// [`OrderPool`].
    fn is_pinned(&self) -> bool {
        false
    }
}
