//! Collision detection and response against the innermost ring
//!
//! Only the innermost ring is ever tested: the field is sorted by radius, so the
//! ball can't reach any other ring without first getting through this one.

use glam::Vec2;
use rand::Rng;

use super::ball::Ball;
use super::field::RingField;
use super::ring::Ring;
use crate::cartesian_to_polar;
use crate::consts::*;

/// How a ring was left behind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeKind {
    /// Ball passed through the gap
    Gap,
    /// Ring got too small to matter and was removed
    AutoPop,
}

/// Outcome of one collision pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionOutcome {
    /// No contact this tick
    None,
    /// Innermost ring removed; worth one point
    Escaped(EscapeKind),
    /// Ball reflected off the ring's inner wall
    Bounced {
        /// Overlap removed by the position correction
        penetration: f32,
    },
}

/// Contact info between the ball and a ring's inner wall
#[derive(Debug, Clone)]
pub struct Contact {
    /// Ball angle around the center, in [0, 2π)
    pub theta: f32,
    /// Unit radial direction from center to ball (points into the wall)
    pub normal: Vec2,
    /// How far the ball's outer edge is past the inner wall
    pub penetration: f32,
}

/// Radius below which a ring is popped without a contact test
#[inline]
pub fn auto_pop_radius(ball_radius: f32) -> f32 {
    ball_radius + AUTO_POP_MARGIN
}

/// Check whether the ball's outer edge has reached the ring's inner wall.
///
/// A ball sitting exactly on the center has no defined normal and never touches.
pub fn ball_ring_contact(ball_pos: Vec2, ball_radius: f32, ring: &Ring) -> Option<Contact> {
    let (dist, theta) = cartesian_to_polar(ball_pos);
    let inner_r = ring.inner_radius();

    if dist + ball_radius < inner_r || dist <= f32::EPSILON {
        return None;
    }

    Some(Contact {
        theta,
        normal: ball_pos / dist,
        penetration: dist + ball_radius - inner_r,
    })
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Reflect, scale by the bounce coefficient, then rotate by `distortion` radians
pub fn bounce_velocity(velocity: Vec2, normal: Vec2, bounce: f32, distortion: f32) -> Vec2 {
    let reflected = reflect_velocity(velocity, normal) * bounce;
    Vec2::from_angle(distortion).rotate(reflected)
}

/// Test the ball against the innermost ring and apply the result.
///
/// Escapes pop the ring and leave the ball alone. Bounces push the ball back
/// inside the wall and send it off with a reflected, slightly rotated velocity.
pub fn resolve<R: Rng + ?Sized>(
    ball: &mut Ball,
    field: &mut RingField,
    bounce: f32,
    rng: &mut R,
) -> CollisionOutcome {
    let Some(ring) = field.innermost() else {
        return CollisionOutcome::None;
    };

    if ring.radius < auto_pop_radius(ball.radius) {
        field.pop_front();
        return CollisionOutcome::Escaped(EscapeKind::AutoPop);
    }

    let Some(contact) = ball_ring_contact(ball.pos, ball.radius, ring) else {
        return CollisionOutcome::None;
    };

    if ring.gap_contains(contact.theta) {
        field.pop_front();
        return CollisionOutcome::Escaped(EscapeKind::Gap);
    }

    ball.pos -= contact.normal * contact.penetration;
    let distortion = rng.random_range(-BOUNCE_DISTORTION..=BOUNCE_DISTORTION);
    ball.vel = bounce_velocity(ball.vel, contact.normal, bounce, distortion);

    CollisionOutcome::Bounced {
        penetration: contact.penetration,
    }
}
