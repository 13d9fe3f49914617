//! Collision detection between falling entities and the player
//!
//! Sprites are axis-aligned rectangles. Touching edges count as contact.

use glam::Vec2;

use super::layout::FieldLayout;
use super::state::Entity;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// True if the boxes overlap or touch
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }

    /// Overlap on the vertical axis only
    pub fn overlaps_vertically(&self, other: &Aabb) -> bool {
        !(self.max.y < other.min.y || self.min.y > other.max.y)
    }
}

/// Whether an entity is touching the player's car.
///
/// Lanes are exclusive: entities in another lane never hit, whatever their
/// sprite width.
pub fn hits_player(layout: &FieldLayout, player_lane: usize, entity: &Entity) -> bool {
    if entity.consumed || entity.lane != player_lane {
        return false;
    }
    layout
        .player_box(player_lane)
        .overlaps_vertically(&layout.entity_box(entity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::consts::*;
    use crate::sim::state::EntityKind;

    fn obstacle(lane: usize, position: f32) -> Entity {
        Entity {
            id: 1,
            kind: EntityKind::Obstacle,
            lane,
            position,
            vertical_speed: 180.0,
            consumed: false,
        }
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::from_origin_size(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::from_origin_size(Vec2::new(5.0, 5.0), Vec2::splat(10.0));
        let c = Aabb::from_origin_size(Vec2::new(20.0, 0.0), Vec2::splat(10.0));
        let touching = Aabb::from_origin_size(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.overlaps(&touching));
        assert!(a.overlaps_vertically(&c));
    }

    #[test]
    fn test_hit_requires_same_lane() {
        let layout = FieldLayout::new(&GameConfig::default());
        let e = obstacle(2, layout.player_top);
        assert!(hits_player(&layout, 2, &e));
        assert!(!hits_player(&layout, 1, &e));
    }

    #[test]
    fn test_hit_requires_vertical_overlap() {
        let layout = FieldLayout::new(&GameConfig::default());
        let above = obstacle(1, layout.player_top - OBSTACLE_HEIGHT - 1.0);
        let edge = obstacle(1, layout.player_top - OBSTACLE_HEIGHT);
        let below = obstacle(1, layout.player_top + PLAYER_HEIGHT + 1.0);
        assert!(!hits_player(&layout, 1, &above));
        assert!(hits_player(&layout, 1, &edge));
        assert!(!hits_player(&layout, 1, &below));
    }

    #[test]
    fn test_consumed_entity_never_hits() {
        let layout = FieldLayout::new(&GameConfig::default());
        let mut e = obstacle(1, layout.player_top);
        e.consumed = true;
        assert!(!hits_player(&layout, 1, &e));
    }
}
