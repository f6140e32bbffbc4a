//! Free functions over ordered slices.

use crate::{OrderingError, OrderingResult, Ordered};
use std::collections::BTreeMap;
use tracing::debug;

/// Returns `max(existing) + 1`, or 1 when there are no orders.
pub fn next_order(existing: impl IntoIterator<Item = u32>) -> u32 {
    existing.into_iter().max().map_or(1, |max| max.saturating_add(1))
}

/// Whether `order` is already held by an item other than `exclude`.
pub fn is_duplicate<T: Ordered>(order: u32, items: &[T], exclude: Option<&T::Key>) -> bool {
    items
        .iter()
        .filter(|item| exclude.is_none_or(|key| item.key() != key))
        .any(|item| item.order() == order)
}

/// Order values held by more than one item, ascending.
pub fn duplicate_orders<T: Ordered>(items: &[T]) -> Vec<u32> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for item in items {
        *counts.entry(item.order()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(order, _)| order)
        .collect()
}

/// Stable sort by order; ties keep their relative position.
pub fn sort_by_order<T: Ordered>(items: &mut [T]) {
    items.sort_by_key(Ordered::order);
}

/// Index of the item with the given key.
pub fn position<T: Ordered>(items: &[T], key: &T::Key) -> Option<usize> {
    items.iter().position(|item| item.key() == key)
}

/// Reassigns every item's order to its 1-based position.
pub fn repack<T: Ordered>(items: &mut [T]) {
    for (idx, item) in items.iter_mut().enumerate() {
        item.set_order(idx as u32 + 1);
    }
}

/// Swaps two elements, then repacks the whole list.
///
/// The result has no gaps and no duplicates regardless of the orders the
/// list held before.
pub fn swap_and_repack<T: Ordered>(items: &mut [T], a: usize, b: usize) -> OrderingResult<()> {
    let len = items.len();
    for index in [a, b] {
        if index >= len {
            return Err(OrderingError::IndexOutOfBounds { index, len });
        }
    }
    items.swap(a, b);
    repack(items);
    debug!(a, b, len, "swapped and repacked");
    Ok(())
}

/// Moves the item at `index` one slot towards the front.
///
/// Returns `false` (list untouched) when it is already first.
pub fn move_up<T: Ordered>(items: &mut [T], index: usize) -> OrderingResult<bool> {
    if index >= items.len() {
        return Err(OrderingError::IndexOutOfBounds {
            index,
            len: items.len(),
        });
    }
    if index == 0 {
        return Ok(false);
    }
    swap_and_repack(items, index, index - 1)?;
    Ok(true)
}

/// Moves the item at `index` one slot towards the back.
///
/// Returns `false` (list untouched) when it is already last.
pub fn move_down<T: Ordered>(items: &mut [T], index: usize) -> OrderingResult<bool> {
    if index >= items.len() {
        return Err(OrderingError::IndexOutOfBounds {
            index,
            len: items.len(),
        });
    }
    if index + 1 == items.len() {
        return Ok(false);
    }
    swap_and_repack(items, index, index + 1)?;
    Ok(true)
}
