//! Query filtering: per-cast filter values and the layer collision matrix.

use crate::api::LayerMatrix;
use crate::types::{AttachedShape, LAYER_COUNT, LayerMask};

/// Per-cast query configuration. Built fresh for each shape and passed by reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResolutionFilter {
    /// Skip trigger/sensor targets.
    pub exclude_triggers: bool,
    /// Mask of the shape being cast.
    pub mask: LayerMask,
}

impl ResolutionFilter {
    pub fn for_shape(shape: &AttachedShape) -> Self {
        Self { exclude_triggers: true, mask: shape.mask }
    }

    /// Whether a target with `target_layer` bits and trigger flag passes.
    pub fn accepts(&self, target_layer: u32, target_is_trigger: bool) -> bool {
        if self.exclude_triggers && target_is_trigger {
            return false;
        }
        self.mask.allows(LayerMask { layer: target_layer, collides_with: 0 })
    }
}

/// Symmetric 32x32 layer collision matrix. Every pair collides until disabled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollisionMatrix {
    rows: [u32; LAYER_COUNT as usize],
}

impl Default for CollisionMatrix {
    fn default() -> Self {
        Self { rows: [u32::MAX; LAYER_COUNT as usize] }
    }
}

impl CollisionMatrix {
    /// Matrix where nothing collides.
    pub fn empty() -> Self {
        Self { rows: [0; LAYER_COUNT as usize] }
    }

    /// Enable or disable collisions between layers `a` and `b` (both directions).
    /// Out-of-range layers are ignored.
    pub fn set_layer_collision(&mut self, a: u32, b: u32, enabled: bool) {
        if a >= LAYER_COUNT || b >= LAYER_COUNT {
            return;
        }
        let (ia, ib) = (a as usize, b as usize);
        if enabled {
            self.rows[ia] |= LayerMask::bit(b);
            self.rows[ib] |= LayerMask::bit(a);
        } else {
            self.rows[ia] &= !LayerMask::bit(b);
            self.rows[ib] &= !LayerMask::bit(a);
        }
    }

    pub fn layers_collide(&self, a: u32, b: u32) -> bool {
        self.collision_mask(a).is_some_and(|row| row & LayerMask::bit(b) != 0)
    }
}

impl LayerMatrix for CollisionMatrix {
    fn collision_mask(&self, layer: u32) -> Option<u32> {
        self.rows.get(layer as usize).copied()
    }
}
