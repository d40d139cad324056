//! Z-order and layer-flag operations.
//!
//! All reorder operations mutate the target object's `z_index` in place and
//! report whether anything changed; no-ops (unknown id, already at the
//! extreme) leave the slice untouched and return `false`. Duplicate z values
//! can accumulate over repeated move-up/down use; render order stays total
//! because consumers sort stably with insertion order as the tie-breaker.

use crate::draw::{AnnotationObject, ObjectId};

/// Reorder operation selector for the `reorder_layer` command surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerOp {
    Top,
    Bottom,
    Up,
    Down,
}

/// Applies a reorder operation; returns whether anything changed.
pub fn apply(objects: &mut [AnnotationObject], target: ObjectId, op: LayerOp) -> bool {
    match op {
        LayerOp::Top => move_to_top(objects, target),
        LayerOp::Bottom => move_to_bottom(objects, target),
        LayerOp::Up => move_up(objects, target),
        LayerOp::Down => move_down(objects, target),
    }
}

/// Raises the target above every other object: `z = max(all) + 1`.
pub fn move_to_top(objects: &mut [AnnotationObject], target: ObjectId) -> bool {
    let Some(max_z) = objects.iter().map(|o| o.z_index).max() else {
        return false;
    };
    let Some(current) = objects.iter().find(|o| o.id == target).map(|o| o.z_index) else {
        return false;
    };
    if current == max_z && is_unique_extreme(objects, target, max_z) {
        return false; // already the unique topmost object
    }
    set_z(objects, target, max_z + 1)
}

/// Lowers the target below every other object: `z = min(0, min(all) - 1)`.
pub fn move_to_bottom(objects: &mut [AnnotationObject], target: ObjectId) -> bool {
    let Some(min_z) = objects.iter().map(|o| o.z_index).min() else {
        return false;
    };
    let Some(current) = objects.iter().find(|o| o.id == target).map(|o| o.z_index) else {
        return false;
    };
    if current == min_z && is_unique_extreme(objects, target, min_z) {
        return false; // already the unique bottommost object
    }
    set_z(objects, target, (min_z - 1).min(0))
}

/// Moves the target one slot up: its z becomes the next-higher neighbor's
/// z + 1 in ascending z order.
///
/// This collapses an adjacent gap and may tie with objects further up; the
/// total order is preserved by the stable sort, not by numeric uniqueness.
pub fn move_up(objects: &mut [AnnotationObject], target: ObjectId) -> bool {
    let order = sorted_ids(objects);
    let Some(idx) = order.iter().position(|(id, _)| *id == target) else {
        return false;
    };
    if idx + 1 == order.len() {
        return false; // already topmost
    }
    let new_z = order[idx + 1].1 + 1;
    set_z(objects, target, new_z)
}

/// Moves the target one slot down: its z becomes the next-lower neighbor's
/// z - 1 in ascending z order.
pub fn move_down(objects: &mut [AnnotationObject], target: ObjectId) -> bool {
    let order = sorted_ids(objects);
    let Some(idx) = order.iter().position(|(id, _)| *id == target) else {
        return false;
    };
    if idx == 0 {
        return false; // already bottommost
    }
    let new_z = order[idx - 1].1 - 1;
    set_z(objects, target, new_z)
}

/// Flips the lock flag on the target only. Locked objects ignore
/// drag/transform but can still be deleted.
pub fn toggle_lock(objects: &mut [AnnotationObject], target: ObjectId) -> bool {
    match objects.iter_mut().find(|o| o.id == target) {
        Some(obj) => {
            obj.locked = !obj.locked;
            true
        }
        None => false,
    }
}

/// Flips the visibility flag on the target only. Hidden objects are skipped
/// by rendering and hit-testing.
pub fn toggle_visibility(objects: &mut [AnnotationObject], target: ObjectId) -> bool {
    match objects.iter_mut().find(|o| o.id == target) {
        Some(obj) => {
            obj.visible = !obj.visible;
            true
        }
        None => false,
    }
}

/// Stable ascending z sort; render order (topmost painted last).
pub fn sorted_by_z(objects: &[AnnotationObject]) -> Vec<&AnnotationObject> {
    let mut sorted: Vec<&AnnotationObject> = objects.iter().collect();
    sorted.sort_by_key(|o| o.z_index);
    sorted
}

/// Layer-panel projection: topmost first.
pub fn panel_order(objects: &[AnnotationObject]) -> Vec<&AnnotationObject> {
    let mut sorted = sorted_by_z(objects);
    sorted.reverse();
    sorted
}

fn sorted_ids(objects: &[AnnotationObject]) -> Vec<(ObjectId, i64)> {
    let mut pairs: Vec<(ObjectId, i64)> = objects.iter().map(|o| (o.id, o.z_index)).collect();
    pairs.sort_by_key(|(_, z)| *z);
    pairs
}

fn set_z(objects: &mut [AnnotationObject], target: ObjectId, z: i64) -> bool {
    match objects.iter_mut().find(|o| o.id == target) {
        Some(obj) => {
            obj.z_index = z;
            true
        }
        None => false,
    }
}

fn is_unique_extreme(objects: &[AnnotationObject], target: ObjectId, z: i64) -> bool {
    objects
        .iter()
        .filter(|o| o.z_index == z && o.id != target)
        .count()
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{FactoryDefaults, IdAllocator, ToolKind, factory};
    use crate::util::Point;

    fn three_objects() -> Vec<AnnotationObject> {
        // z indices 1, 2, 3 in insertion order.
        let mut ids = IdAllocator::new();
        let defaults = FactoryDefaults::default();
        let mut out: Vec<AnnotationObject> = Vec::new();
        for _ in 0..3 {
            let obj = factory::create(
                ToolKind::Rectangle,
                Point::new(0.0, 0.0),
                &out,
                &mut ids,
                &defaults,
            );
            out.push(obj);
        }
        out
    }

    #[test]
    fn move_to_top_is_strictly_above_all_others() {
        let mut objects = three_objects();
        let bottom = objects[0].id;
        assert!(move_to_top(&mut objects, bottom));

        let target_z = objects.iter().find(|o| o.id == bottom).unwrap().z_index;
        assert!(objects.iter().filter(|o| o.id != bottom).all(|o| o.z_index < target_z));
    }

    #[test]
    fn move_to_bottom_is_strictly_below_all_others() {
        let mut objects = three_objects();
        let top = objects[2].id;
        assert!(move_to_bottom(&mut objects, top));

        let target_z = objects.iter().find(|o| o.id == top).unwrap().z_index;
        assert!(target_z <= 0);
        assert!(objects.iter().filter(|o| o.id != top).all(|o| o.z_index > target_z));
    }

    #[test]
    fn move_down_uses_lower_neighbor_minus_one() {
        // Objects with z 1,2,3: moving the z=3 object down lands on the
        // next-lower neighbor (z=2)'s z - 1 = 1, tying with the first object.
        let mut objects = three_objects();
        let top = objects[2].id;
        assert!(move_down(&mut objects, top));
        assert_eq!(objects[2].z_index, 1);

        // Order stays total: stable sort keeps the older z=1 object first.
        let order: Vec<ObjectId> = sorted_by_z(&objects).iter().map(|o| o.id).collect();
        assert_eq!(order[0], objects[0].id);
        assert_eq!(order[1], top);
    }

    #[test]
    fn move_up_collapses_gap_above() {
        let mut objects = three_objects();
        objects[2].z_index = 10; // gap between 2 and 10
        let middle = objects[1].id;
        assert!(move_up(&mut objects, middle));
        assert_eq!(objects[1].z_index, 11);
    }

    #[test]
    fn extremes_and_unknown_ids_are_noops() {
        let mut objects = three_objects();
        let top = objects[2].id;
        let bottom = objects[0].id;
        let before: Vec<i64> = objects.iter().map(|o| o.z_index).collect();

        assert!(!move_up(&mut objects, top));
        assert!(!move_down(&mut objects, bottom));
        assert!(!move_to_top(&mut objects, top));

        let mut ids = IdAllocator::new();
        let stranger = ids.fresh();
        assert!(!move_up(&mut objects, stranger));
        assert!(!toggle_lock(&mut objects, stranger));

        let after: Vec<i64> = objects.iter().map(|o| o.z_index).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn toggles_flip_only_the_target() {
        let mut objects = three_objects();
        let id = objects[1].id;

        assert!(toggle_lock(&mut objects, id));
        assert!(objects[1].locked);
        assert!(!objects[0].locked && !objects[2].locked);

        assert!(toggle_visibility(&mut objects, id));
        assert!(!objects[1].visible);
        assert!(toggle_visibility(&mut objects, id));
        assert!(objects[1].visible);
    }

    #[test]
    fn panel_order_is_reversed_render_order() {
        let objects = three_objects();
        let render: Vec<ObjectId> = sorted_by_z(&objects).iter().map(|o| o.id).collect();
        let panel: Vec<ObjectId> = panel_order(&objects).iter().map(|o| o.id).collect();
        let mut reversed = render.clone();
        reversed.reverse();
        assert_eq!(panel, reversed);
    }
}
