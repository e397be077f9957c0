use glam::Vec2;

use crate::filter::ResolutionFilter;
use crate::types::*;

/// Host swept-query primitive.
pub trait ShapeQuery {
    /// Sweep `shape` along the unit vector `direction` for `max_distance`, with the
    /// owning body placed at `origin`.
    ///
    /// Contacts are written nearest-first into `results`, at most `results.len()`
    /// of them. Returns the number of contacts found, which may exceed the number
    /// written.
    fn cast(
        &self,
        shape: &AttachedShape,
        origin: Vec2,
        direction: Vec2,
        filter: &ResolutionFilter,
        max_distance: f32,
        results: &mut [ContactResult],
    ) -> usize;
}

/// Host scene enumeration consumed once at setup.
pub trait ShapeSource {
    /// Shapes owned directly by `node`, in host order.
    fn shapes_of(&self, node: NodeId) -> Vec<ShapeHandle>;
    /// Immediate children of `node`, in host order.
    fn children_of(&self, node: NodeId) -> Vec<NodeId>;
    fn is_trigger(&self, shape: ShapeHandle) -> bool;
    /// Layer index of a shape.
    fn shape_layer(&self, shape: ShapeHandle) -> u32;
    /// Layer index of a node.
    fn node_layer(&self, node: NodeId) -> u32;
}

/// Host layer collision matrix.
pub trait LayerMatrix {
    /// Layers that `layer` collides with, or `None` for an unknown layer.
    fn collision_mask(&self, layer: u32) -> Option<u32>;
}

/// Narrowphase primitive intersection signatures.
pub trait NarrowphaseApi {
    // Rays ------------------------------------------------------------------

    fn ray_aabb(origin: Vec2, dir: Vec2, aabb_min: Vec2, aabb_max: Vec2) -> Option<SweepHit>;
    fn ray_circle(origin: Vec2, dir: Vec2, center: Vec2, r: f32) -> Option<SweepHit>;

    // Overlaps (strict: touching shapes do not overlap) ----------------------

    fn overlap_aabb_aabb(c0: Vec2, h0: Vec2, c1: Vec2, h1: Vec2) -> Option<Overlap>;
    fn overlap_circle_circle(c0: Vec2, r0: f32, c1: Vec2, r1: f32) -> Option<Overlap>;
    fn overlap_circle_aabb(c: Vec2, r: f32, box_c: Vec2, box_h: Vec2) -> Option<Overlap>;

    // Sweeps (relative velocity) ---------------------------------------------

    fn sweep_aabb_aabb(
        c0: Vec2,
        h0: Vec2,
        v0: Vec2,
        c1: Vec2,
        h1: Vec2,
        v1: Vec2,
    ) -> Option<SweepHit>;

    fn sweep_circle_aabb(
        c: Vec2,
        r: f32,
        v: Vec2,
        box_c: Vec2,
        box_h: Vec2,
        box_v: Vec2,
    ) -> Option<SweepHit>;

    fn sweep_circle_circle(
        c0: Vec2,
        r0: f32,
        v0: Vec2,
        c1: Vec2,
        r1: f32,
        v1: Vec2,
    ) -> Option<SweepHit>;
}
