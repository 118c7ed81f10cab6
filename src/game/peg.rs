//! Pegs and blocks as the game sees them
//!
//! Pegs are one struct carrying a color; per-color behavior comes from the
//! score and effect tables below.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::body::BodyId;
use crate::sim::obb::OrientedBoundingBox;

/// Peg color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PegColor {
    Blue,
    Orange,
    Green,
}

/// What happens besides scoring when a peg is hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitEffect {
    ScoreOnly,
    /// Fire the next power-up in the rotation
    TriggerPowerUp,
}

impl PegColor {
    pub const ALL: [PegColor; 3] = [PegColor::Blue, PegColor::Orange, PegColor::Green];

    /// Points awarded when a peg of this color is hit
    pub fn score(&self) -> u32 {
        match self {
            PegColor::Blue => BLUE_PEG_SCORE,
            PegColor::Orange => ORANGE_PEG_SCORE,
            PegColor::Green => GREEN_PEG_SCORE,
        }
    }

    pub fn on_hit(&self) -> HitEffect {
        match self {
            PegColor::Blue | PegColor::Orange => HitEffect::ScoreOnly,
            PegColor::Green => HitEffect::TriggerPowerUp,
        }
    }
}

/// A peg loaded into the engine; its physics body is a static ball
#[derive(Debug, Clone, PartialEq)]
pub struct GamePeg {
    pub id: BodyId,
    pub center: Vec2,
    pub radius: f32,
    pub color: PegColor,
    hit: bool,
}

impl GamePeg {
    pub fn new(id: BodyId, center: Vec2, radius: f32, color: PegColor) -> Self {
        Self {
            id,
            center,
            radius,
            color,
            hit: false,
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// Flag the peg as hit. Returns true only on the first call.
    pub fn mark_hit(&mut self) -> bool {
        if self.hit {
            return false;
        }
        self.hit = true;
        true
    }

    pub fn score(&self) -> u32 {
        self.color.score()
    }
}

/// A static obstacle; restitution 0 and never moves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameBlock {
    pub id: BodyId,
    pub bounds: OrientedBoundingBox,
}

impl GameBlock {
    pub fn new(id: BodyId, bounds: OrientedBoundingBox) -> Self {
        Self { id, bounds }
    }
}

/// Pegs whose centers lie within `distance` of `center`
pub fn pegs_within(
    pegs: &[GamePeg],
    center: Vec2,
    distance: f32,
) -> impl Iterator<Item = &GamePeg> {
    pegs.iter()
        .filter(move |peg| peg.center.distance(center) <= distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_score_table() {
        assert_eq!(PegColor::Blue.score(), 100);
        assert_eq!(PegColor::Orange.score(), 200);
        assert_eq!(PegColor::Green.score(), 100);
    }

    #[test]
    fn test_only_green_triggers_power_up() {
        for color in PegColor::ALL {
            let expected = if color == PegColor::Green {
                HitEffect::TriggerPowerUp
            } else {
                HitEffect::ScoreOnly
            };
            assert_eq!(color.on_hit(), expected);
        }
    }

    #[test]
    fn test_mark_hit_once() {
        let mut peg = GamePeg::new(BodyId(1), Vec2::ZERO, 25.0, PegColor::Blue);
        assert!(!peg.is_hit());
        assert!(peg.mark_hit());
        assert!(!peg.mark_hit());
        assert!(peg.is_hit());
    }

    #[test]
    fn test_pegs_within_is_inclusive() {
        let pegs = vec![
            GamePeg::new(BodyId(1), Vec2::new(0.0, 0.0), 25.0, PegColor::Blue),
            GamePeg::new(BodyId(2), Vec2::new(30.0, 40.0), 25.0, PegColor::Blue),
            GamePeg::new(BodyId(3), Vec2::new(60.0, 80.0), 25.0, PegColor::Blue),
        ];
        let ids: Vec<BodyId> = pegs_within(&pegs, Vec2::ZERO, 50.0).map(|p| p.id).collect();
        assert_eq!(ids, vec![BodyId(1), BodyId(2)]);
        assert_eq!(pegs_within(&pegs, Vec2::new(500.0, 0.0), 10.0).count(), 0);
    }

    proptest! {
        #[test]
        fn prop_hit_is_monotonic(calls in prop::collection::vec(any::<bool>(), 1..50)) {
            let mut peg = GamePeg::new(BodyId(1), Vec2::ZERO, 25.0, PegColor::Green);
            let mut seen_hit = false;
            for call in calls {
                if call {
                    let first = peg.mark_hit();
                    prop_assert_eq!(first, !seen_hit);
                    seen_hit = true;
                }
                prop_assert_eq!(peg.is_hit(), seen_hit);
            }
        }
    }
}
