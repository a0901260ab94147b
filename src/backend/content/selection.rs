/**
 * Unseen Content Selection
 *
 * Users should not see the same question or fact twice until they have seen
 * everything. Each content kind keeps a per-user "seen" join table; selection
 * draws randomly from the unseen candidates and, once too few remain, cycles:
 * the caller clears the user's seen rows and the draw is made from the full
 * candidate set.
 */

use std::collections::HashSet;

use rand::seq::IndexedRandom;

/// Result of a draw
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<T> {
    pub items: Vec<T>,
    /// Too few unseen items remained; the draw used the full set and the
    /// caller should clear the user's seen history
    pub cycled: bool,
}

/// Draw `count` random items not in `seen`
///
/// # Arguments
/// * `candidates` - Every eligible item
/// * `seen` - Ids the user has already seen
/// * `id_of` - Extracts an item's id
/// * `count` - Number of items wanted
///
/// # Returns
/// `None` when even the full candidate set is smaller than `count`.
pub fn pick_unseen<T, F>(candidates: &[T], seen: &HashSet<i64>, id_of: F, count: usize) -> Option<Selection<T>>
where
    T: Clone,
    F: Fn(&T) -> i64,
{
    if count == 0 {
        return Some(Selection { items: Vec::new(), cycled: false });
    }

    let unseen: Vec<&T> = candidates.iter().filter(|c| !seen.contains(&id_of(c))).collect();
    let mut rng = rand::rng();

    if unseen.len() >= count {
        let items = unseen.choose_multiple(&mut rng, count).map(|c| (*c).clone()).collect();
        return Some(Selection { items, cycled: false });
    }

    if candidates.len() < count {
        return None;
    }

    let items = candidates.choose_multiple(&mut rng, count).cloned().collect();
    Some(Selection { items, cycled: true })
}
