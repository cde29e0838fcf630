//! Overlap queries.
//!
//! Plain AABB tests over [`MapPosition`] + [`BoxCollider`]. Used by spatial
//! triggers for membership and by holdables to find the field they sit in.
use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;

/// Whether `a` overlaps `b`. Entities missing a position or collider never overlap.
pub fn overlaps(world: &World, a: Entity, b: Entity) -> bool {
    overlaps_at(world, a, b, Vec2::ZERO)
}

/// Whether `a`, moved by `offset`, would overlap `b`.
pub fn overlaps_at(world: &World, a: Entity, b: Entity, offset: Vec2) -> bool {
    let (Some(pos_a), Some(col_a)) = (world.get::<MapPosition>(a), world.get::<BoxCollider>(a))
    else {
        return false;
    };
    let (Some(pos_b), Some(col_b)) = (world.get::<MapPosition>(b), world.get::<BoxCollider>(b))
    else {
        return false;
    };
    col_a.overlaps(pos_a.pos + offset, col_b, pos_b.pos)
}

/// Every entity with component `T` whose collider overlaps `entity`.
pub fn overlapping_with<T: Component>(world: &mut World, entity: Entity) -> Vec<Entity> {
    let mut query = world.query_filtered::<Entity, (With<T>, With<MapPosition>, With<BoxCollider>)>();
    let candidates: Vec<Entity> = query.iter(world).filter(|e| *e != entity).collect();
    candidates
        .into_iter()
        .filter(|other| overlaps(world, entity, *other))
        .collect()
}
