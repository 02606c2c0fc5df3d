//! Drag-and-drop move semantics over an ordered sequence.

/// Move the element at `from` to `to` in place, shifting everything between
/// by one slot.
///
/// Returns `false` and leaves `seq` untouched if either index is out of range.
pub fn move_within<T>(seq: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= seq.len() || to >= seq.len() {
        return false;
    }
    if from != to {
        let item = seq.remove(from);
        seq.insert(to, item);
    }
    true
}

/// Copying variant of [`move_within`].
///
/// ```
/// use qsheet::domain::reorder::array_move;
/// assert_eq!(array_move(&["A", "B", "C", "D"], 2, 0), Some(vec!["C", "A", "B", "D"]));
/// assert_eq!(array_move(&["A", "B"], 0, 5), None);
/// ```
pub fn array_move<T: Clone>(seq: &[T], from: usize, to: usize) -> Option<Vec<T>> {
    let mut moved = seq.to_vec();
    move_within(&mut moved, from, to).then_some(moved)
}
