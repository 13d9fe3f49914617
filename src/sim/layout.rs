//! Play field geometry
//!
//! Lanes are evenly spaced between two road shoulders. Sprites are centred in
//! their lane; the player's car sits a fixed distance above the bottom edge.

use glam::Vec2;

use super::collision::Aabb;
use super::state::{Entity, EntityKind};
use crate::config::GameConfig;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldLayout {
    pub lanes: usize,
    pub width: f32,
    pub height: f32,
    pub lane_left: f32,
    pub lane_width: f32,
    /// Top edge of the player sprite
    pub player_top: f32,
}

impl FieldLayout {
    pub fn new(config: &GameConfig) -> Self {
        let lanes = config.lanes.max(1);
        let lane_left = LANE_MARGIN;
        let lane_right = config.field_width - LANE_MARGIN;
        Self {
            lanes,
            width: config.field_width,
            height: config.field_height,
            lane_left,
            lane_width: (lane_right - lane_left) / lanes as f32,
            player_top: config.field_height - PLAYER_HEIGHT - PLAYER_BOTTOM_GAP,
        }
    }

    /// Horizontal centre of a lane
    pub fn lane_center_x(&self, lane: usize) -> f32 {
        self.lane_left + self.lane_width * lane as f32 + self.lane_width / 2.0
    }

    /// Top-left corner for a sprite of `size` whose top edge is at `top`
    pub fn sprite_origin(&self, lane: usize, top: f32, size: Vec2) -> Vec2 {
        Vec2::new(self.lane_center_x(lane) - size.x / 2.0, top)
    }

    pub fn player_size(&self) -> Vec2 {
        Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    /// The player's hit zone in a given lane
    pub fn player_box(&self, lane: usize) -> Aabb {
        let size = self.player_size();
        Aabb::from_origin_size(self.sprite_origin(lane, self.player_top, size), size)
    }

    pub fn entity_box(&self, entity: &Entity) -> Aabb {
        let size = entity.kind.size();
        Aabb::from_origin_size(self.sprite_origin(entity.lane, entity.position, size), size)
    }

    /// Spawn height: at least the sprite's own height above the field
    pub fn spawn_position(kind: EntityKind, jitter: f32) -> f32 {
        match kind {
            EntityKind::Obstacle => -OBSTACLE_HEIGHT - jitter,
            EntityKind::Collectible => -COLLECTIBLE_SIZE - COLLECTIBLE_SPAWN_GAP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lane_geometry() {
        let layout = FieldLayout::new(&GameConfig::default());
        assert_eq!(layout.lane_width, 104.0);
        assert_eq!(layout.lane_center_x(0), 84.0);
        assert_eq!(layout.lane_center_x(3), 396.0);
        assert_eq!(layout.player_top, 638.0);
    }

    #[test]
    fn test_spawn_positions_are_offscreen() {
        assert!(FieldLayout::spawn_position(EntityKind::Obstacle, 0.0) <= -OBSTACLE_HEIGHT);
        assert!(FieldLayout::spawn_position(EntityKind::Collectible, 0.0) <= -COLLECTIBLE_SIZE);
    }
}
