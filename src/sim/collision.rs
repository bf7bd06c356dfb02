//! Collision detection and reflection
//!
//! Axis-aligned tests only: rectangle-vs-rectangle, circle-vs-rectangle
//! (closest point) and circle-vs-circle. Contact normals point from the
//! struck surface toward the moving entity, ready for reflection.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::world::{Entity, Shape};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self { min: center - half, max: center + half }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// Strict AABB overlap test. Boxes that merely touch do not overlap.
#[inline]
pub fn aabb_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

/// A resolved contact between a moving entity and a struck one.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Contact point on the struck surface.
    pub point: Vec2,
    /// Unit normal pointing from the struck surface toward the mover.
    pub normal: Vec2,
    /// Penetration depth, for position correction.
    pub penetration: f32,
}

/// Contact between two entities, shape-aware. The normal points toward
/// `mover`.
pub fn entity_contact(mover: &Entity, other: &Entity) -> Option<Contact> {
    match (mover.shape, other.shape) {
        (Shape::Circle { radius }, Shape::Rect { .. }) => {
            circle_rect_contact(mover.pos, radius, &other.aabb())
        }
        (Shape::Rect { .. }, Shape::Rect { .. }) => rect_rect_contact(&mover.aabb(), &other.aabb()),
        (Shape::Circle { radius }, Shape::Circle { radius: other_radius }) => {
            circle_circle_contact(mover.pos, radius, other.pos, other_radius)
        }
        (Shape::Rect { .. }, Shape::Circle { radius }) => {
            // Flip a circle-vs-rect test so the normal still points at the mover.
            circle_rect_contact(other.pos, radius, &mover.aabb()).map(|c| Contact {
                point: c.point,
                normal: -c.normal,
                penetration: c.penetration,
            })
        }
    }
}

/// Rect-vs-rect contact along the axis of least penetration.
pub fn rect_rect_contact(mover: &Aabb, other: &Aabb) -> Option<Contact> {
    if !aabb_overlap(mover, other) {
        return None;
    }
    let overlap_x = (mover.max.x.min(other.max.x)) - (mover.min.x.max(other.min.x));
    let overlap_y = (mover.max.y.min(other.max.y)) - (mover.min.y.max(other.min.y));
    let delta = mover.center() - other.center();

    let (normal, penetration) = if overlap_x < overlap_y {
        (Vec2::new(if delta.x >= 0.0 { 1.0 } else { -1.0 }, 0.0), overlap_x)
    } else {
        (Vec2::new(0.0, if delta.y >= 0.0 { 1.0 } else { -1.0 }), overlap_y)
    };
    Some(Contact { point: mover.center() - normal * penetration, normal, penetration })
}

/// Circle-vs-rect contact via the closest point on the box.
pub fn circle_rect_contact(center: Vec2, radius: f32, rect: &Aabb) -> Option<Contact> {
    let closest = center.clamp(rect.min, rect.max);
    let delta = center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > radius * radius {
        return None;
    }

    if dist_sq > 1e-6 {
        let dist = dist_sq.sqrt();
        return Some(Contact { point: closest, normal: delta / dist, penetration: radius - dist });
    }

    // Center is inside the box; push out through the nearest face.
    let to_right = rect.max.x - center.x;
    let to_left = center.x - rect.min.x;
    let to_bottom = rect.max.y - center.y;
    let to_top = center.y - rect.min.y;
    let least = to_right.min(to_left).min(to_bottom).min(to_top);

    let normal = if least == to_right {
        Vec2::X
    } else if least == to_left {
        -Vec2::X
    } else if least == to_bottom {
        Vec2::Y
    } else {
        -Vec2::Y
    };
    Some(Contact { point: center, normal, penetration: radius + least })
}

/// Circle-vs-circle contact.
pub fn circle_circle_contact(
    center: Vec2,
    radius: f32,
    other_center: Vec2,
    other_radius: f32,
) -> Option<Contact> {
    let delta = center - other_center;
    let dist_sq = delta.length_squared();
    let reach = radius + other_radius;
    if dist_sq >= reach * reach {
        return None;
    }
    let dist = dist_sq.sqrt();
    // Coincident centers: pick a fixed axis so resolution stays deterministic.
    let normal = if dist > 1e-6 { delta / dist } else { Vec2::X };
    Some(Contact {
        point: other_center + normal * other_radius,
        normal,
        penetration: reach - dist,
    })
}

/// Reflect velocity off a surface.
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Paddle-style reflection: the outgoing normal speed equals the incoming
/// one, and the tangential speed is set from the impact offset, so a hit
/// near the paddle edge deflects sharply (classic Pong/Breakout rule).
///
/// `offset` is the signed impact position relative to the paddle center,
/// in [-1, 1]; `strength` is the tangential speed at a full-edge hit.
#[inline]
pub fn deflect_velocity(velocity: Vec2, normal: Vec2, offset: f32, strength: f32) -> Vec2 {
    let tangent = Vec2::new(-normal.y, normal.x);
    let normal_speed = velocity.dot(normal).abs();
    normal * normal_speed + tangent * (offset * strength)
}
