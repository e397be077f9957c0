//! Per-body collider registry: the shapes that move with a body.

use crate::api::{LayerMatrix, ShapeSource};
use crate::config::MaskSource;
use crate::types::*;

/// Shapes rigidly attached to one body, captured once and never re-scanned.
#[derive(Clone, Debug, Default)]
pub struct ColliderRegistry {
    body: Option<NodeId>,
    shapes: Vec<AttachedShape>,
}

impl ColliderRegistry {
    /// Scan `body`'s own shapes, then the shapes of each immediate child (not
    /// grandchildren). Triggers are dropped. Each survivor is tagged with the
    /// collision mask looked up for its own layer, or the body's layer when
    /// `mask_source` is `BodyLayer`.
    pub fn build<S, M>(host: &S, matrix: &M, body: NodeId, mask_source: MaskSource) -> Self
    where
        S: ShapeSource + ?Sized,
        M: LayerMatrix + ?Sized,
    {
        let mut candidates = host.shapes_of(body);
        for child in host.children_of(body) {
            candidates.extend(host.shapes_of(child));
        }

        let body_layer = host.node_layer(body);
        let mut shapes = Vec::with_capacity(candidates.len());
        let mut triggers = 0usize;
        for handle in candidates {
            if host.is_trigger(handle) {
                triggers += 1;
                continue;
            }
            let shape_layer = host.shape_layer(handle);
            let lookup_layer = match mask_source {
                MaskSource::PerShape => shape_layer,
                MaskSource::BodyLayer => body_layer,
            };
            let mask = match matrix.collision_mask(lookup_layer) {
                Some(collides_with) => {
                    LayerMask::simple(LayerMask::bit(shape_layer), collides_with)
                }
                None => {
                    log::debug!("no collision row for layer {lookup_layer}; {handle:?} detects nothing");
                    LayerMask::NONE
                }
            };
            shapes.push(AttachedShape { handle, body, mask });
        }

        log::debug!(
            "registry for {body:?}: {} shapes attached, {triggers} triggers skipped",
            shapes.len()
        );
        Self { body: Some(body), shapes }
    }

    pub fn body(&self) -> Option<NodeId> {
        self.body
    }

    pub fn shapes(&self) -> &[AttachedShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::CollisionMatrix;
    use crate::world::ShapeWorld;
    use glam::Vec2;

    fn boxed() -> ShapeKind {
        ShapeKind::Aabb { half_extents: Vec2::splat(0.5) }
    }

    #[test]
    fn test_collects_own_and_child_shapes_in_order() {
        let mut w = ShapeWorld::default();
        let body = w.add_node(None, Vec2::ZERO, 0);
        let child = w.add_node(Some(body), Vec2::new(1.0, 0.0), 0);
        let grandchild = w.add_node(Some(child), Vec2::new(1.0, 0.0), 0);
        let a = w.add_shape(body, boxed(), Vec2::ZERO, 0, false);
        let b = w.add_shape(child, boxed(), Vec2::ZERO, 0, false);
        w.add_shape(grandchild, boxed(), Vec2::ZERO, 0, false);
        let c = w.add_shape(body, ShapeKind::Circle { radius: 0.25 }, Vec2::ZERO, 0, false);

        let reg = ColliderRegistry::build(&w, &w, body, MaskSource::PerShape);
        let handles: Vec<_> = reg.shapes().iter().map(|s| s.handle).collect();
        assert_eq!(handles, vec![a, c, b]);
        assert!(reg.shapes().iter().all(|s| s.body == body));
        assert_eq!(reg.body(), Some(body));
    }

    #[test]
    fn test_triggers_excluded() {
        let mut w = ShapeWorld::default();
        let body = w.add_node(None, Vec2::ZERO, 0);
        let child = w.add_node(Some(body), Vec2::ZERO, 0);
        w.add_shape(body, boxed(), Vec2::ZERO, 0, true);
        w.add_shape(child, boxed(), Vec2::ZERO, 0, true);
        let solid = w.add_shape(child, boxed(), Vec2::ZERO, 0, false);

        let reg = ColliderRegistry::build(&w, &w, body, MaskSource::PerShape);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.shapes()[0].handle, solid);
    }

    #[test]
    fn test_per_shape_mask_uses_shape_layer() {
        let mut w = ShapeWorld::default();
        *w.matrix_mut() = CollisionMatrix::empty();
        w.matrix_mut().set_layer_collision(1, 4, true);
        w.matrix_mut().set_layer_collision(2, 5, true);
        let body = w.add_node(None, Vec2::ZERO, 1);
        let child = w.add_node(Some(body), Vec2::ZERO, 1);
        w.add_shape(body, boxed(), Vec2::ZERO, 1, false);
        w.add_shape(child, boxed(), Vec2::ZERO, 2, false);

        let reg = ColliderRegistry::build(&w, &w, body, MaskSource::PerShape);
        assert_eq!(reg.shapes()[0].mask, LayerMask::simple(1 << 1, 1 << 4));
        assert_eq!(reg.shapes()[1].mask, LayerMask::simple(1 << 2, 1 << 5));

        let shared = ColliderRegistry::build(&w, &w, body, MaskSource::BodyLayer);
        assert_eq!(shared.shapes()[1].mask.collides_with, 1 << 4);
    }

    #[test]
    fn test_unknown_layer_gets_empty_mask() {
        let mut w = ShapeWorld::default();
        let body = w.add_node(None, Vec2::ZERO, 0);
        w.add_shape(body, boxed(), Vec2::ZERO, 99, false);
        let reg = ColliderRegistry::build(&w, &w, body, MaskSource::PerShape);
        assert_eq!(reg.shapes()[0].mask, LayerMask::NONE);
    }

    #[test]
    fn test_body_without_shapes_is_empty() {
        let mut w = ShapeWorld::default();
        let body = w.add_node(None, Vec2::ZERO, 0);
        let reg = ColliderRegistry::build(&w, &w, body, MaskSource::PerShape);
        assert!(reg.is_empty());
    }
}
