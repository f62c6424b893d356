//! Dense position planning for ordered sibling lists
//!
//! Tasks within a column and columns within the board both carry a dense,
//! zero-based integer position: for n siblings the positions are exactly
//! {0, .., n-1}, no duplicates, no gaps. The planners here compute the
//! renumbering an insert, move, or delete requires as pure data; commands
//! apply the resulting updates through one staged commit so readers never
//! observe a duplicate or missing position.
//!
//! Planners are generic over the sibling ID so the same code orders tasks
//! (`TaskId`) and columns (`ColumnId`).

/// A sibling and its current position within the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot<I> {
    pub id: I,
    pub index: usize,
}

impl<I> Slot<I> {
    pub fn new(id: I, index: usize) -> Self {
        Self { id, index }
    }
}

/// A planned position change for one sibling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotUpdate<I> {
    pub id: I,
    pub index: usize,
}

/// Plan inserting a new item into a container.
///
/// Returns the index the new item takes plus the shifts existing siblings
/// need. A target at or beyond the current count appends (no shifts, the
/// common case); a smaller target makes room by incrementing every sibling
/// at or after it.
pub fn plan_insertion<I: Clone>(siblings: &[Slot<I>], target: usize) -> (usize, Vec<SlotUpdate<I>>) {
    let target = target.min(siblings.len());

    let updates = siblings
        .iter()
        .filter(|s| s.index >= target)
        .map(|s| SlotUpdate {
            id: s.id.clone(),
            index: s.index + 1,
        })
        .collect();

    (target, updates)
}

/// Plan moving an item to a new index within its own container.
///
/// `siblings` must include the moving item at index `old`. Returns the
/// clamped destination index and the shifts for the *other* siblings; the
/// moving item itself is never in the update list. A no-op move (target
/// resolves to `old`) yields an empty plan.
pub fn plan_same_container_move<I: Clone>(
    siblings: &[Slot<I>],
    old: usize,
    target: usize,
) -> (usize, Vec<SlotUpdate<I>>) {
    // The item stays in the container, so the largest reachable index is
    // len - 1 ("append" clamps to the end).
    let new = target.min(siblings.len().saturating_sub(1));

    let updates = if new > old {
        // Everyone in (old, new] shifts down one
        siblings
            .iter()
            .filter(|s| s.index > old && s.index <= new)
            .map(|s| SlotUpdate {
                id: s.id.clone(),
                index: s.index - 1,
            })
            .collect()
    } else if new < old {
        // Everyone in [new, old) shifts up one
        siblings
            .iter()
            .filter(|s| s.index >= new && s.index < old)
            .map(|s| SlotUpdate {
                id: s.id.clone(),
                index: s.index + 1,
            })
            .collect()
    } else {
        Vec::new()
    };

    (new, updates)
}

/// The planned renumbering for a move between two containers
#[derive(Debug, Clone)]
pub struct CrossContainerMove<I> {
    /// The index the moved item takes in the destination
    pub new_index: usize,
    /// Gap-closing shifts in the source container
    pub source_updates: Vec<SlotUpdate<I>>,
    /// Room-making shifts in the destination container
    pub dest_updates: Vec<SlotUpdate<I>>,
}

/// Plan moving an item from one container to another.
///
/// `source` must include the moving item at index `old`; `dest` must not
/// include it. The source gap closes (decrement everything past `old`) and
/// the destination makes room (increment everything at or past the target).
/// A target beyond the destination's count appends.
pub fn plan_cross_container_move<I: Clone>(
    source: &[Slot<I>],
    dest: &[Slot<I>],
    old: usize,
    target: usize,
) -> CrossContainerMove<I> {
    let new_index = target.min(dest.len());

    let source_updates = source
        .iter()
        .filter(|s| s.index > old)
        .map(|s| SlotUpdate {
            id: s.id.clone(),
            index: s.index - 1,
        })
        .collect();

    let dest_updates = dest
        .iter()
        .filter(|s| s.index >= new_index)
        .map(|s| SlotUpdate {
            id: s.id.clone(),
            index: s.index + 1,
        })
        .collect();

    CrossContainerMove {
        new_index,
        source_updates,
        dest_updates,
    }
}

/// Plan removing the item at `removed` from a container: every sibling past
/// it decrements by one, restoring density.
pub fn plan_removal<I: Clone>(siblings: &[Slot<I>], removed: usize) -> Vec<SlotUpdate<I>> {
    siblings
        .iter()
        .filter(|s| s.index > removed)
        .map(|s| SlotUpdate {
            id: s.id.clone(),
            index: s.index - 1,
        })
        .collect()
}

/// Check the density invariant: the positions are exactly {0, .., n-1}
pub fn is_dense(indexes: &[usize]) -> bool {
    let mut sorted = indexes.to_vec();
    sorted.sort_unstable();
    sorted.iter().enumerate().all(|(i, &v)| i == v)
}
