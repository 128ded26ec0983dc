//! Image slot allocation.
//!
//! Every restaurant has five ordinal photo slots (`1..=5`); slot 1 is the
//! cover image. A slot holds at most one live image.

use std::collections::BTreeSet;

/// Number of photo slots per restaurant.
pub const MAX_IMAGES_PER_RESTAURANT: i32 = 5;

/// The cover slot.
pub const FIRST_SLOT: i32 = 1;

/// Returns `true` if `slot` is within `1..=MAX_IMAGES_PER_RESTAURANT`.
pub fn is_valid_slot(slot: i32) -> bool {
    (FIRST_SLOT..=MAX_IMAGES_PER_RESTAURANT).contains(&slot)
}

/// Result of placing uploads into free slots.
#[derive(Debug)]
pub struct Allocation<T> {
    /// Uploads paired with their assigned slot, in upload order.
    pub placed: Vec<(i32, T)>,
    /// Number of uploads that found no free slot.
    pub dropped: usize,
}

/// Assign each upload the lowest free slot, first come first served.
///
/// `occupied` holds the slots of images that remain after deletions. Once
/// every slot is taken the remaining uploads are dropped without error.
pub fn allocate<T, I, U>(occupied: I, uploads: U) -> Allocation<T>
where
    I: IntoIterator<Item = i32>,
    U: IntoIterator<Item = T>,
{
    let mut used: BTreeSet<i32> = occupied.into_iter().collect();
    let mut placed = Vec::new();
    let mut dropped = 0;

    for upload in uploads {
        match (FIRST_SLOT..=MAX_IMAGES_PER_RESTAURANT).find(|slot| !used.contains(slot)) {
            Some(slot) => {
                used.insert(slot);
                placed.push((slot, upload));
            }
            None => dropped += 1,
        }
    }

    Allocation { placed, dropped }
}

/// Keep uploads submitted for explicit slots, ordered by slot.
///
/// Slots outside the valid range are discarded, as is any repeat of a slot
/// already seen.
pub fn explicit_slots<T, U>(uploads: U) -> Vec<(i32, T)>
where
    U: IntoIterator<Item = (i32, T)>,
{
    let mut seen = BTreeSet::new();
    let mut kept: Vec<(i32, T)> = uploads
        .into_iter()
        .filter(|(slot, _)| is_valid_slot(*slot) && seen.insert(*slot))
        .collect();
    kept.sort_by_key(|(slot, _)| *slot);
    kept
}
