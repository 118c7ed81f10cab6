//! Level container
//!
//! The board as the level designer builds it: a named rectangle of pegs and
//! blocks where nothing overlaps and everything fits on the board. Rejected
//! edits are no-ops reported through a `false` return.
//!
//! The engine trusts whatever it is given; this is where placement rules live.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BLOCK_HEIGHT, PEG_RADIUS};
use crate::error::{LevelError, PhysicsError};
use crate::game::state::PegDescriptor;
use crate::sim::obb::OrientedBoundingBox;
use crate::sim::world::Frame;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    width: f32,
    height: f32,
    /// Radius of pegs that do not carry their own
    #[serde(default = "default_peg_radius")]
    peg_radius: f32,
    pegs: Vec<PegDescriptor>,
    blocks: Vec<OrientedBoundingBox>,
}

fn default_peg_radius() -> f32 {
    PEG_RADIUS
}

impl Level {
    /// Empty level. Width and height must be positive.
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Result<Self, LevelError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(LevelError::InvalidDimensions { width, height });
        }
        Ok(Self {
            name: name.into(),
            width,
            height,
            peg_radius: PEG_RADIUS,
            pegs: Vec::new(),
            blocks: Vec::new(),
        })
    }

    /// Change the radius used for pegs without one. Only allowed while the
    /// level is empty, so stored pegs never stop fitting.
    pub fn with_peg_radius(mut self, radius: f32) -> Result<Self, LevelError> {
        if !(radius > 0.0) || !self.is_empty() {
            return Err(LevelError::InvalidPegRadius(radius));
        }
        self.peg_radius = radius;
        Ok(self)
    }

    /// Block with the default 2:1 footprint
    pub fn default_block(center: Vec2, angle: f32) -> Result<OrientedBoundingBox, PhysicsError> {
        OrientedBoundingBox::new(center, 2.0 * BLOCK_HEIGHT, BLOCK_HEIGHT, angle)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn peg_radius(&self) -> f32 {
        self.peg_radius
    }

    /// Radius `peg` takes on this board
    pub fn radius_of(&self, peg: &PegDescriptor) -> f32 {
        peg.radius.unwrap_or(self.peg_radius)
    }

    pub fn frame(&self) -> Frame {
        Frame::new(self.width, self.height)
    }

    pub fn pegs(&self) -> &[PegDescriptor] {
        &self.pegs
    }

    pub fn blocks(&self) -> &[OrientedBoundingBox] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.pegs.is_empty() && self.blocks.is_empty()
    }

    pub fn contains_peg(&self, peg: &PegDescriptor) -> bool {
        self.pegs.contains(peg)
    }

    pub fn contains_block(&self, block: &OrientedBoundingBox) -> bool {
        self.blocks.contains(block)
    }

    /// Add a peg if it fits and overlaps nothing
    pub fn insert_peg(&mut self, peg: PegDescriptor) -> bool {
        if !self.peg_fits(&peg, None) {
            return false;
        }
        self.pegs.push(peg);
        true
    }

    /// Add a block if it fits and overlaps nothing
    pub fn insert_block(&mut self, block: OrientedBoundingBox) -> bool {
        if !self.block_fits(&block, None) {
            return false;
        }
        self.blocks.push(block);
        true
    }

    pub fn delete_peg(&mut self, peg: &PegDescriptor) -> bool {
        let Some(index) = self.pegs.iter().position(|p| p == peg) else {
            return false;
        };
        self.pegs.remove(index);
        true
    }

    pub fn delete_block(&mut self, block: &OrientedBoundingBox) -> bool {
        let Some(index) = self.blocks.iter().position(|b| b == block) else {
            return false;
        };
        self.blocks.remove(index);
        true
    }

    /// Swap `old` for `new` in place. Nothing changes unless `old` is stored
    /// and `new` fits once `old` is gone.
    pub fn replace_peg(&mut self, old: &PegDescriptor, new: PegDescriptor) -> bool {
        let Some(index) = self.pegs.iter().position(|p| p == old) else {
            return false;
        };
        if !self.peg_fits(&new, Some(index)) {
            return false;
        }
        self.pegs[index] = new;
        true
    }

    pub fn replace_block(&mut self, old: &OrientedBoundingBox, new: OrientedBoundingBox) -> bool {
        let Some(index) = self.blocks.iter().position(|b| b == old) else {
            return false;
        };
        if !self.block_fits(&new, Some(index)) {
            return false;
        }
        self.blocks[index] = new;
        true
    }

    /// Peg covering `point`, if any
    pub fn peg_at(&self, point: Vec2) -> Option<&PegDescriptor> {
        self.pegs
            .iter()
            .find(|peg| peg.center.distance(point) < self.radius_of(peg))
    }

    /// Block covering `point`, if any
    pub fn block_at(&self, point: Vec2) -> Option<&OrientedBoundingBox> {
        self.blocks.iter().find(|block| block.contains_point(point))
    }

    pub fn remove_all(&mut self) {
        self.pegs.clear();
        self.blocks.clear();
    }

    /// Whether `peg` could be stored, ignoring the peg at `skip`
    fn peg_fits(&self, peg: &PegDescriptor, skip: Option<usize>) -> bool {
        let radius = self.radius_of(peg);
        if !(radius > 0.0) {
            return false;
        }
        let c = peg.center;
        let on_board = c.x >= radius
            && c.y >= radius
            && self.width - c.x >= radius
            && self.height - c.y >= radius;
        if !on_board {
            return false;
        }

        let clashes_peg = self
            .pegs
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .any(|(_, other)| c.distance(other.center) < radius + self.radius_of(other));
        let clashes_block = self.blocks.iter().any(|b| b.overlaps_ball(c, radius));
        !clashes_peg && !clashes_block
    }

    /// Whether `block` could be stored, ignoring the block at `skip`
    fn block_fits(&self, block: &OrientedBoundingBox, skip: Option<usize>) -> bool {
        let on_board = block.corners().iter().all(|p| {
            p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
        });
        if !on_board {
            return false;
        }

        let clashes_peg = self
            .pegs
            .iter()
            .any(|peg| block.overlaps_ball(peg.center, self.radius_of(peg)));
        let clashes_block = self
            .blocks
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip)
            .any(|(_, other)| block.overlaps_block(other));
        !clashes_peg && !clashes_block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::peg::PegColor;
    use std::f32::consts::FRAC_PI_4;

    fn level() -> Level {
        Level::new("test", 500.0, 400.0).unwrap()
    }

    fn peg(x: f32, y: f32) -> PegDescriptor {
        PegDescriptor::new(Vec2::new(x, y), PegColor::Blue)
    }

    fn block(x: f32, y: f32) -> OrientedBoundingBox {
        Level::default_block(Vec2::new(x, y), 0.0).unwrap()
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        assert!(matches!(
            Level::new("bad", 0.0, 100.0),
            Err(LevelError::InvalidDimensions { .. })
        ));
        assert!(Level::new("bad", 100.0, -1.0).is_err());
        assert!(Level::new("bad", f32::NAN, 100.0).is_err());
    }

    #[test]
    fn test_default_block_is_two_to_one() {
        let b = block(100.0, 100.0);
        assert_eq!(b.width, 60.0);
        assert_eq!(b.height, 30.0);
    }

    #[test]
    fn test_insert_peg_rejects_overlap_and_edges() {
        let mut level = level();
        assert!(level.insert_peg(peg(100.0, 100.0)));
        // Centers 49 apart with radius 25 each
        assert!(!level.insert_peg(peg(149.0, 100.0)));
        assert!(level.insert_peg(peg(150.0, 100.0)));
        assert!(!level.insert_peg(peg(10.0, 200.0)));
        assert!(!level.insert_peg(peg(480.0, 200.0)));
        assert!(level.insert_peg(peg(25.0, 375.0)));
        assert_eq!(level.pegs().len(), 3);
    }

    #[test]
    fn test_insert_block_rejects_overlap_and_edges() {
        let mut level = level();
        assert!(level.insert_peg(peg(100.0, 100.0)));
        assert!(!level.insert_block(block(100.0, 130.0)));
        assert!(level.insert_block(block(300.0, 300.0)));
        assert!(!level.insert_block(block(320.0, 310.0)));
        // Corners poke out of the board
        assert!(!level.insert_block(block(20.0, 300.0)));
        let rotated = Level::default_block(Vec2::new(25.0, 200.0), FRAC_PI_4).unwrap();
        assert!(!level.insert_block(rotated));
        assert!(!level.insert_peg(peg(300.0, 270.0)));
        assert_eq!(level.blocks().len(), 1);
    }

    #[test]
    fn test_replace_peg() {
        let mut level = level();
        let a = peg(100.0, 100.0);
        let b = peg(200.0, 100.0);
        level.insert_peg(a);
        level.insert_peg(b);

        // Moving `a` slightly is fine: it only has to avoid the others
        let moved = peg(110.0, 100.0);
        assert!(level.replace_peg(&a, moved));
        assert!(level.contains_peg(&moved));
        assert!(!level.contains_peg(&a));

        // Onto `b` is not
        assert!(!level.replace_peg(&moved, peg(190.0, 100.0)));
        // `a` is gone already
        assert!(!level.replace_peg(&a, peg(300.0, 300.0)));
        assert_eq!(level.pegs().len(), 2);
    }

    #[test]
    fn test_replace_block() {
        let mut level = level();
        let a = block(100.0, 100.0);
        level.insert_block(a);
        let rotated = Level::default_block(Vec2::new(100.0, 100.0), 0.5).unwrap();
        assert!(level.replace_block(&a, rotated));
        assert!(level.contains_block(&rotated));
        assert!(!level.replace_block(&a, block(200.0, 200.0)));
    }

    #[test]
    fn test_delete_and_remove_all() {
        let mut level = level();
        let p = peg(100.0, 100.0);
        let b = block(300.0, 300.0);
        level.insert_peg(p);
        level.insert_block(b);
        assert!(!level.delete_peg(&peg(1.0, 1.0)));
        assert!(level.delete_peg(&p));
        assert!(level.delete_block(&b));
        assert!(level.is_empty());

        level.insert_peg(p);
        level.remove_all();
        assert!(level.is_empty());
    }

    #[test]
    fn test_hit_testing() {
        let mut level = level();
        level.insert_peg(peg(100.0, 100.0));
        level.insert_block(Level::default_block(Vec2::new(300.0, 300.0), FRAC_PI_4).unwrap());

        assert!(level.peg_at(Vec2::new(110.0, 110.0)).is_some());
        assert!(level.peg_at(Vec2::new(125.0, 100.0)).is_none());
        assert!(level.block_at(Vec2::new(300.0, 300.0)).is_some());
        assert!(level.block_at(Vec2::new(329.0, 300.0)).is_none());
    }

    #[test]
    fn test_custom_peg_radius() {
        let mut level = level().with_peg_radius(10.0).unwrap();
        assert!(level.insert_peg(peg(100.0, 100.0)));
        // 25 apart clears two radius 10 pegs
        assert!(level.insert_peg(peg(125.0, 100.0)));
        assert!(!level.insert_peg(peg(140.0, 100.0)));
        assert!(level.insert_peg(peg(10.0, 200.0)));
        assert_eq!(level.radius_of(&peg(0.0, 0.0)), 10.0);
        assert_eq!(level.radius_of(&peg(0.0, 0.0).with_radius(4.0)), 4.0);

        assert!(matches!(
            level.clone().with_peg_radius(5.0),
            Err(LevelError::InvalidPegRadius(_))
        ));
        assert!(Level::new("bad", 100.0, 100.0).unwrap().with_peg_radius(0.0).is_err());
    }

    #[test]
    fn test_peg_radius_defaults_when_missing_from_json() {
        let json = r#"{"name":"old","width":200.0,"height":100.0,"pegs":[],"blocks":[]}"#;
        let level: Level = serde_json::from_str(json).unwrap();
        assert_eq!(level.peg_radius(), PEG_RADIUS);
    }

    #[test]
    fn test_json_round_trip() {
        let mut level = level();
        level.insert_peg(peg(100.0, 100.0));
        level.insert_block(block(300.0, 300.0));
        let json = serde_json::to_string(&level).unwrap();
        let back: Level = serde_json::from_str(&json).unwrap();
        assert_eq!(back, level);
    }
}
