//! Physics world
//!
//! Owns every live body, the simulation frame and the set of walls that
//! bounce. Bodies are kept in insertion order so stepping is deterministic.
//! Set changes are queued as [`WorldEvent`]s for the owner to drain right
//! after the call that caused them.

use serde::{Deserialize, Serialize};

use super::body::{BodyId, RigidBody};

/// Simulation area, anchored at the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
}

impl Frame {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// One edge of the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Border {
    Top,
    Bottom,
    Left,
    Right,
}

/// Set of walls that take part in bouncing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borders {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for Borders {
    /// Balls fall out through the bottom
    fn default() -> Self {
        Self::all().without(Border::Bottom)
    }
}

impl Borders {
    pub fn all() -> Self {
        Self {
            top: true,
            bottom: true,
            left: true,
            right: true,
        }
    }

    pub fn none() -> Self {
        Self {
            top: false,
            bottom: false,
            left: false,
            right: false,
        }
    }

    pub fn with(mut self, border: Border) -> Self {
        *self.slot(border) = true;
        self
    }

    pub fn without(mut self, border: Border) -> Self {
        *self.slot(border) = false;
        self
    }

    pub fn contains(&self, border: Border) -> bool {
        match border {
            Border::Top => self.top,
            Border::Bottom => self.bottom,
            Border::Left => self.left,
            Border::Right => self.right,
        }
    }

    fn slot(&mut self, border: Border) -> &mut bool {
        match border {
            Border::Top => &mut self.top,
            Border::Bottom => &mut self.bottom,
            Border::Left => &mut self.left,
            Border::Right => &mut self.right,
        }
    }
}

/// Body set change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldEvent {
    BodyAdded(BodyId),
    BodyRemoved(BodyId),
}

/// An overlapping pair seen during a step (ids ordered, each pair once)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: BodyId,
    pub b: BodyId,
}

impl Contact {
    fn new(x: BodyId, y: BodyId) -> Self {
        if x <= y { Self { a: x, b: y } } else { Self { a: y, b: x } }
    }

    /// The partner of `id` in this contact
    pub fn other(&self, id: BodyId) -> Option<BodyId> {
        if self.a == id {
            Some(self.b)
        } else if self.b == id {
            Some(self.a)
        } else {
            None
        }
    }
}

/// The physics engine
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    bodies: Vec<RigidBody>,
    frame: Frame,
    borders: Borders,
    events: Vec<WorldEvent>,
    next_id: u32,
}

impl PhysicsWorld {
    /// World bouncing off all four walls
    pub fn new(frame: Frame) -> Self {
        Self::with_borders(frame, Borders::all())
    }

    pub fn with_borders(frame: Frame, borders: Borders) -> Self {
        Self {
            bodies: Vec::new(),
            frame,
            borders,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// World without the given walls; bodies pass through them
    pub fn excluding(frame: Frame, excluded: &[Border]) -> Self {
        let borders = excluded
            .iter()
            .fold(Borders::all(), |set, border| set.without(*border));
        Self::with_borders(frame, borders)
    }

    /// Allocate an id for a body about to be inserted. Never returns the id
    /// of a live body; the counter wraps once it reaches `u32::MAX`.
    pub fn next_body_id(&mut self) -> BodyId {
        while self.contains(BodyId(self.next_id)) {
            self.next_id = self.next_id.wrapping_add(1);
        }
        let id = BodyId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    #[inline]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[inline]
    pub fn borders(&self) -> &Borders {
        &self.borders
    }

    /// Live bodies in insertion order
    #[inline]
    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.iter().any(|b| b.id() == id)
    }

    pub fn get(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.iter().find(|b| b.id() == id)
    }

    /// Direct access for domain actions that reposition a body (e.g. respawns)
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.bodies.iter_mut().find(|b| b.id() == id)
    }

    /// Add a body. A body whose id is already present is ignored.
    pub fn insert(&mut self, body: RigidBody) -> bool {
        let id = body.id();
        if self.contains(id) {
            return false;
        }
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        self.bodies.push(body);
        self.events.push(WorldEvent::BodyAdded(id));
        true
    }

    /// Remove a body, returning it if it was live
    pub fn remove(&mut self, id: BodyId) -> Option<RigidBody> {
        let index = self.bodies.iter().position(|b| b.id() == id)?;
        let body = self.bodies.remove(index);
        self.events.push(WorldEvent::BodyRemoved(id));
        Some(body)
    }

    pub fn remove_all(&mut self) {
        for body in self.bodies.drain(..) {
            self.events.push(WorldEvent::BodyRemoved(body.id()));
        }
    }

    /// Take pending set-change notifications, oldest first
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance every body by `dt`, then resolve its collisions against every
    /// other live body and against the enabled walls.
    ///
    /// Returns each pair that overlapped at some point during the step.
    pub fn step(&mut self, dt: f32) -> Vec<Contact> {
        let mut contacts: Vec<Contact> = Vec::new();
        let count = self.bodies.len();

        for i in 0..count {
            // Static bodies neither move nor respond; their contacts are
            // picked up from the dynamic side.
            if self.bodies[i].is_static() {
                continue;
            }
            self.bodies[i].advance(dt);

            for j in 0..count {
                if i == j {
                    continue;
                }
                let (body, other) = pair_mut(&mut self.bodies, i, j);
                if !body.collides(other) {
                    continue;
                }
                let contact = Contact::new(body.id(), other.id());
                if !contacts.contains(&contact) {
                    contacts.push(contact);
                }
                body.resolve_collision(other);
            }

            let (frame, borders) = (self.frame, self.borders);
            self.bodies[i].resolve_border_collision(&frame, &borders);
        }

        contacts
    }
}

/// Mutable access to `bodies[i]` alongside shared access to `bodies[j]`
fn pair_mut(bodies: &mut [RigidBody], i: usize, j: usize) -> (&mut RigidBody, &RigidBody) {
    debug_assert_ne!(i, j);
    if i < j {
        let (head, tail) = bodies.split_at_mut(j);
        (&mut head[i], &tail[0])
    } else {
        let (head, tail) = bodies.split_at_mut(i);
        (&mut tail[0], &head[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obb::OrientedBoundingBox;
    use glam::Vec2;
    use proptest::prelude::*;

    const EPS: f32 = 1e-3;

    fn frame() -> Frame {
        Frame::new(300.0, 300.0)
    }

    fn body_a() -> RigidBody {
        RigidBody::ball(BodyId(1), Vec2::new(150.0, 30.0), 30.0, 0.0, Vec2::ZERO, Vec2::ZERO)
            .unwrap()
    }

    fn body_b() -> RigidBody {
        RigidBody::ball(
            BodyId(2),
            Vec2::new(70.0, 90.0),
            30.0,
            0.8,
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 9.81),
        )
        .unwrap()
    }

    #[test]
    fn test_insert_ignores_duplicates() {
        let mut world = PhysicsWorld::new(frame());
        assert!(world.insert(body_a()));
        assert!(!world.insert(body_a()));
        assert!(world.insert(body_b()));
        assert_eq!(world.len(), 2);
        assert_eq!(
            world.drain_events(),
            vec![
                WorldEvent::BodyAdded(BodyId(1)),
                WorldEvent::BodyAdded(BodyId(2))
            ]
        );
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn test_next_body_id_skips_inserted_ids() {
        let mut world = PhysicsWorld::new(frame());
        world.insert(body_b());
        assert_eq!(world.next_body_id(), BodyId(3));
    }

    #[test]
    fn test_next_body_id_after_max_id() {
        let mut world = PhysicsWorld::new(frame());
        let top = RigidBody::fixed_ball(BodyId(u32::MAX), Vec2::new(50.0, 50.0), 10.0).unwrap();
        assert!(world.insert(top));

        let id = world.next_body_id();
        assert_ne!(id, BodyId(u32::MAX));
        assert!(!world.contains(id));
        assert!(world.insert(
            RigidBody::fixed_ball(id, Vec2::new(150.0, 50.0), 10.0).unwrap()
        ));
        let next = world.next_body_id();
        assert!(!world.contains(next));
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn test_contains_and_remove() {
        let mut world = PhysicsWorld::new(frame());
        assert!(!world.contains(BodyId(1)));
        assert!(world.remove(BodyId(1)).is_none());

        world.insert(body_a());
        world.insert(body_b());
        world.drain_events();

        assert!(world.contains(BodyId(1)));
        let removed = world.remove(BodyId(2)).unwrap();
        assert_eq!(removed.id(), BodyId(2));
        assert!(!world.contains(BodyId(2)));
        assert_eq!(world.drain_events(), vec![WorldEvent::BodyRemoved(BodyId(2))]);
    }

    #[test]
    fn test_remove_all_notifies_each_body() {
        let mut world = PhysicsWorld::new(frame());
        world.insert(body_a());
        world.insert(body_b());
        world.drain_events();
        world.remove_all();
        assert!(world.is_empty());
        assert_eq!(world.drain_events().len(), 2);
    }

    #[test]
    fn test_excluding_borders() {
        let world = PhysicsWorld::excluding(frame(), &[Border::Bottom]);
        assert!(!world.borders().contains(Border::Bottom));
        assert!(world.borders().contains(Border::Top));
        assert_eq!(*world.borders(), Borders::default());
    }

    #[test]
    fn test_step_integrates_free_bodies() {
        let mut world = PhysicsWorld::new(frame());
        world.insert(body_a());
        world.insert(body_b());
        let contacts = world.step(2.0);
        assert!(contacts.is_empty());

        let b = world.get(BodyId(2)).unwrap();
        assert!((b.center() - Vec2::new(72.0, 109.62)).length() < EPS);
        assert!((b.velocity - Vec2::new(1.0, 19.62)).length() < EPS);
        let a = world.get(BodyId(1)).unwrap();
        assert_eq!(a.center(), Vec2::new(150.0, 30.0));
    }

    #[test]
    fn test_step_reports_each_contact_once() {
        let mut world = PhysicsWorld::new(frame());
        let mover = RigidBody::ball(
            BodyId(1),
            Vec2::new(100.0, 100.0),
            10.0,
            0.9,
            Vec2::new(0.0, 60.0),
            Vec2::ZERO,
        )
        .unwrap();
        let peg = RigidBody::fixed_ball(BodyId(2), Vec2::new(100.0, 118.0), 10.0).unwrap();
        world.insert(mover);
        world.insert(peg);

        let contacts = world.step(1.0 / 60.0);
        assert_eq!(contacts, vec![Contact { a: BodyId(1), b: BodyId(2) }]);
        assert_eq!(contacts[0].other(BodyId(2)), Some(BodyId(1)));

        let mover = world.get(BodyId(1)).unwrap();
        assert!(mover.velocity.y < 0.0, "mover should bounce back up");
        assert_eq!(world.get(BodyId(2)).unwrap().center(), Vec2::new(100.0, 118.0));
    }

    #[test]
    fn test_step_ball_rests_on_block() {
        let mut world = PhysicsWorld::new(frame());
        let bounds = OrientedBoundingBox::new(Vec2::new(150.0, 200.0), 200.0, 20.0, 0.1).unwrap();
        world.insert(RigidBody::fixed_block(BodyId(1), bounds));
        world.insert(
            RigidBody::ball(
                BodyId(2),
                Vec2::new(150.0, 100.0),
                10.0,
                0.5,
                Vec2::ZERO,
                Vec2::new(0.0, 300.0),
            )
            .unwrap(),
        );
        for _ in 0..600 {
            world.step(1.0 / 60.0);
        }
        let ball = world.get(BodyId(2)).unwrap();
        assert!(ball.center().y < 200.0, "ball fell through the block");
    }

    #[test]
    fn test_step_ball_falls_through_open_bottom() {
        let mut world = PhysicsWorld::excluding(frame(), &[Border::Bottom]);
        world.insert(
            RigidBody::ball(
                BodyId(1),
                Vec2::new(150.0, 250.0),
                10.0,
                0.9,
                Vec2::new(0.0, 200.0),
                Vec2::new(0.0, 300.0),
            )
            .unwrap(),
        );
        for _ in 0..60 {
            world.step(1.0 / 60.0);
        }
        assert!(world.get(BodyId(1)).unwrap().center().y > 300.0);
    }

    proptest! {
        #[test]
        fn prop_border_containment(
            x in 30.0f32..270.0,
            y in 30.0f32..270.0,
            vx in -300.0f32..300.0,
            vy in -300.0f32..300.0,
            r in 15.0f32..30.0,
        ) {
            let x = x.clamp(r, 300.0 - r);
            let y = y.clamp(r, 300.0 - r);
            let mut world = PhysicsWorld::new(frame());
            world.insert(
                RigidBody::ball(BodyId(1), Vec2::new(x, y), r, 0.9, Vec2::new(vx, vy), Vec2::new(0.0, 300.0))
                    .unwrap(),
            );
            for _ in 0..600 {
                world.step(1.0 / 60.0);
                let c = world.get(BodyId(1)).unwrap().center();
                prop_assert!(c.x >= -r && c.x <= 300.0 + r, "x escaped: {}", c.x);
                prop_assert!(c.y >= -r && c.y <= 300.0 + r, "y escaped: {}", c.y);
            }
        }
    }
}
