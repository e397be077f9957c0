//! Collision resolution: turn a desired displacement into an allowed one.
//!
//! Every attached shape is swept along the desired direction, padded by the
//! shell radius. Contacts are then walked in arrival order (shape order, then
//! nearest-first within a shape):
//!
//! - with slide correction on, the velocity loses its component into each
//!   contact normal, compounding across contacts;
//! - the travel distance is clamped to `contact.distance - shell_radius`;
//! - a padded distance below `overlap_threshold` means the shapes already
//!   interpenetrate. With slide correction on, the move is redirected from the
//!   contact point toward the body and the velocity becomes that push. A later
//!   deep contact replaces an earlier one.

use glam::Vec2;

use crate::api::ShapeQuery;
use crate::config::{OverflowPolicy, ResolverConfig};
use crate::error::MoveError;
use crate::filter::ResolutionFilter;
use crate::types::*;

/// Resolver with its reusable contact buffers. One per body.
#[derive(Clone, Debug)]
pub struct CollisionResolver {
    cfg: ResolverConfig,
    /// Per-cast scratch, `contact_capacity` long.
    hit_array: Vec<ContactResult>,
    /// Contacts gathered across all shapes for the current call.
    hit_list: Vec<ContactResult>,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::with_config(ResolverConfig::default())
    }
}

impl CollisionResolver {
    /// Validate `cfg` and allocate buffers.
    pub fn new(cfg: ResolverConfig) -> Result<Self, MoveError> {
        cfg.validate()?;
        Ok(Self::with_config(cfg))
    }

    fn with_config(cfg: ResolverConfig) -> Self {
        let cap = cfg.contact_capacity.max(1);
        Self { hit_array: vec![ContactResult::default(); cap], hit_list: Vec::with_capacity(cap), cfg }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.cfg
    }

    /// Contacts gathered by the last call that reached the casting stage.
    pub fn last_contacts(&self) -> &[ContactResult] {
        &self.hit_list
    }

    /// Resolve `desired` for a body at `position` moving with `velocity`.
    pub fn resolve<Q>(
        &mut self,
        query: &Q,
        shapes: &[AttachedShape],
        position: Vec2,
        desired: Vec2,
        velocity: Vec2,
    ) -> Result<Resolution, MoveError>
    where
        Q: ShapeQuery + ?Sized,
    {
        let mut distance = desired.length();
        if distance <= self.cfg.min_move_distance {
            return Ok(Resolution { displacement: desired, velocity, ..Default::default() });
        }
        let direction = desired / distance;

        let truncated = self.gather(query, shapes, position, direction, distance)?;

        let shell = self.cfg.shell_radius;
        let slide = self.cfg.slide_correction;
        let mut velocity = velocity;
        let mut move_vector = desired;
        let mut recovered = false;

        for hit in &self.hit_list {
            if slide {
                let projection = velocity.dot(hit.normal);
                if projection < 0.0 {
                    velocity -= projection * hit.normal;
                }
            }

            let modified_distance = hit.distance - shell;
            if distance > modified_distance {
                if slide && modified_distance < self.cfg.overlap_threshold {
                    move_vector = position - hit.point;
                    velocity = move_vector;
                    recovered = true;
                    log::debug!(
                        "overlap recovery at {:?} (padded distance {modified_distance:.4}), pushing {move_vector:?}",
                        hit.point
                    );
                } else {
                    distance = modified_distance;
                }
            }
            log::trace!("contact d={:.4} n={:?} -> distance {distance:.4}", hit.distance, hit.normal);
        }

        Ok(Resolution {
            displacement: move_vector.normalize_or_zero() * distance,
            velocity,
            contacts: self.hit_list.len(),
            truncated,
            recovered,
        })
    }

    /// Cast every shape and collect its contacts into `hit_list`.
    /// Returns the number of contacts dropped for lack of buffer space.
    fn gather<Q>(
        &mut self,
        query: &Q,
        shapes: &[AttachedShape],
        position: Vec2,
        direction: Vec2,
        distance: f32,
    ) -> Result<usize, MoveError>
    where
        Q: ShapeQuery + ?Sized,
    {
        self.hit_list.clear();
        let capacity = self.hit_array.len();
        let range = distance + self.cfg.shell_radius;
        let mut truncated = 0usize;

        for shape in shapes {
            let filter = ResolutionFilter::for_shape(shape);
            let found = query.cast(shape, position, direction, &filter, range, &mut self.hit_array);
            if found > capacity {
                if self.cfg.overflow == OverflowPolicy::Error {
                    return Err(MoveError::ContactOverflow { shape: shape.handle, found, capacity });
                }
                log::trace!("{:?}: {found} contacts, keeping {capacity}", shape.handle);
                truncated += found - capacity;
            }
            self.hit_list.extend_from_slice(&self.hit_array[..found.min(capacity)]);
        }
        Ok(truncated)
    }
}
