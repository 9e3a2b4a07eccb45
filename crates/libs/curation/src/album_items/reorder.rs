/// Moves `dragged` to the index `target` occupied, shifting everything in between.
///
/// This is array "move" semantics, not a swap. Returns the input unchanged when
/// both ids are equal or either id is missing.
#[must_use]
pub fn move_item<T: Copy + PartialEq>(order: &[T], dragged: T, target: T) -> Vec<T> {
    let mut moved = order.to_vec();
    if dragged == target {
        return moved;
    }
    let from = order.iter().position(|id| *id == dragged);
    let to = order.iter().position(|id| *id == target);
    let (Some(from), Some(to)) = (from, to) else {
        return moved;
    };
    let item = moved.remove(from);
    moved.insert(to, item);
    moved
}
