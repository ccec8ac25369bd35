/// Index to select after the entry at `removed_index` was removed from a
/// list that held `len_before` entries. `None` when the list is now empty.
///
/// The first entry hands the selection to the new first entry, the last one
/// to the new last entry, anything else to its predecessor.
pub fn selection_after_removal(len_before: usize, removed_index: usize) -> Option<usize> {
    let len_after = len_before.checked_sub(1)?;
    if len_after == 0 {
        return None;
    }
    if removed_index == 0 {
        return Some(0);
    }
    if removed_index >= len_after {
        return Some(len_after - 1);
    }
    Some(removed_index - 1)
}
