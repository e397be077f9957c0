use glam::Vec2;

use std::collections::HashMap;

use crate::api::{LayerMatrix, NarrowphaseApi, ShapeQuery, ShapeSource};
use crate::filter::{CollisionMatrix, ResolutionFilter};
use crate::narrowphase::Narrowphase;
use crate::types::*;

/// Reference host: a node hierarchy of shapes over a uniform grid.
///
/// Supplies everything the mover consumes from an engine: shape enumeration,
/// the layer collision matrix, and the swept shape query.
pub struct ShapeWorld {
    pub cfg: WorldConfig,
    nodes: Vec<Node>,
    shapes: Vec<ShapeEntry>,
    matrix: CollisionMatrix,

    // Uniform grid: cell coord -> indices into `shapes`
    grid: HashMap<(i32, i32), Vec<usize>>,
}

struct Node {
    parent: Option<NodeId>,
    /// World position for roots, offset from the parent otherwise.
    local: Vec2,
    layer: u32,
    children: Vec<NodeId>,
    shapes: Vec<ShapeHandle>,
}

struct ShapeEntry {
    node: NodeId,
    kind: ShapeKind,
    offset: Vec2,
    layer: u32,
    is_trigger: bool,
    cells: CellRange,
}

#[derive(Copy, Clone, Debug, Default)]
struct CellRange {
    min: (i32, i32),
    max: (i32, i32),
}

impl Default for ShapeWorld {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl ShapeWorld {
    pub fn new(cfg: WorldConfig) -> Self {
        Self {
            cfg,
            nodes: Vec::new(),
            shapes: Vec::new(),
            matrix: CollisionMatrix::default(),
            grid: HashMap::new(),
        }
    }

    pub fn matrix(&self) -> &CollisionMatrix {
        &self.matrix
    }

    pub fn matrix_mut(&mut self) -> &mut CollisionMatrix {
        &mut self.matrix
    }

    /// Add a node. `local` is the world position for a root, the offset from `parent` otherwise.
    ///
    /// # Panics
    /// If `parent` was not created by this world.
    pub fn add_node(&mut self, parent: Option<NodeId>, local: Vec2, layer: u32) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        if let Some(p) = parent {
            self.nodes[p.0 as usize].children.push(id);
        }
        self.nodes.push(Node { parent, local, layer, children: Vec::new(), shapes: Vec::new() });
        id
    }

    /// Attach a shape centered at `offset` from `node`.
    ///
    /// # Panics
    /// If `node` was not created by this world.
    pub fn add_shape(
        &mut self,
        node: NodeId,
        kind: ShapeKind,
        offset: Vec2,
        layer: u32,
        is_trigger: bool,
    ) -> ShapeHandle {
        let handle = ShapeHandle(self.shapes.len() as u32);
        self.nodes[node.0 as usize].shapes.push(handle);
        self.shapes.push(ShapeEntry {
            node,
            kind,
            offset,
            layer,
            is_trigger,
            cells: CellRange::default(),
        });
        self.bin(handle.0 as usize);
        handle
    }

    pub fn node_position(&self, node: NodeId) -> Vec2 {
        let mut pos = Vec2::ZERO;
        let mut cur = Some(node);
        while let Some(id) = cur {
            let Some(n) = self.nodes.get(id.0 as usize) else { break };
            pos += n.local;
            cur = n.parent;
        }
        pos
    }

    /// Move `node` (and everything under it) so it sits at world position `pos`.
    pub fn set_node_position(&mut self, node: NodeId, pos: Vec2) {
        let parent_pos = match self.nodes.get(node.0 as usize) {
            Some(n) => n.parent.map(|p| self.node_position(p)).unwrap_or(Vec2::ZERO),
            None => return,
        };
        self.nodes[node.0 as usize].local = pos - parent_pos;

        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let n = &self.nodes[id.0 as usize];
            stack.extend(n.children.iter().copied());
            let handles = n.shapes.clone();
            for h in handles {
                self.unbin(h.0 as usize);
                self.bin(h.0 as usize);
            }
        }
    }

    pub fn shape_center(&self, shape: ShapeHandle) -> Option<Vec2> {
        let e = self.shapes.get(shape.0 as usize)?;
        Some(self.node_position(e.node) + e.offset)
    }

    /// True when `node` is `ancestor` or lies beneath it.
    fn is_under(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.nodes.get(id.0 as usize).and_then(|n| n.parent);
        }
        false
    }

    fn cell_size(&self) -> f32 {
        self.cfg.cell_size.max(1e-5)
    }

    fn world_to_cell(&self, p: Vec2) -> (i32, i32) {
        let cs = self.cell_size();
        ((p.x / cs).floor() as i32, (p.y / cs).floor() as i32)
    }

    fn bin(&mut self, idx: usize) {
        let e = &self.shapes[idx];
        let center = self.node_position(e.node) + e.offset;
        let half = e.kind.half_extents();
        let range = CellRange {
            min: self.world_to_cell(center - half),
            max: self.world_to_cell(center + half),
        };
        for iy in range.min.1..=range.max.1 {
            for ix in range.min.0..=range.max.0 {
                self.grid.entry((ix, iy)).or_default().push(idx);
            }
        }
        self.shapes[idx].cells = range;
    }

    fn unbin(&mut self, idx: usize) {
        let range = self.shapes[idx].cells;
        for iy in range.min.1..=range.max.1 {
            for ix in range.min.0..=range.max.0 {
                if let Some(list) = self.grid.get_mut(&(ix, iy)) {
                    list.retain(|&i| i != idx);
                    if list.is_empty() {
                        self.grid.remove(&(ix, iy));
                    }
                }
            }
        }
    }

    /// Sorted, deduplicated shape indices binned in cells overlapping `min..max`.
    fn candidates(&self, min: Vec2, max: Vec2) -> Vec<usize> {
        let (ix0, iy0) = self.world_to_cell(min);
        let (ix1, iy1) = self.world_to_cell(max);
        let mut out = Vec::new();
        for iy in iy0..=iy1 {
            for ix in ix0..=ix1 {
                if let Some(list) = self.grid.get(&(ix, iy)) {
                    out.extend_from_slice(list);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Contact of shape `a` moving by `motion` against static shape `b`.
    /// Returns (fraction of motion, contact point, normal from B into A).
    fn contact_pair(a: ShapeKind, a_c: Vec2, motion: Vec2, b: ShapeKind, b_c: Vec2) -> Option<(f32, Vec2, Vec2)> {
        let radius = |k: ShapeKind| match k {
            ShapeKind::Aabb { .. } => None,
            ShapeKind::Circle { radius } => Some(radius),
            ShapeKind::Point => Some(0.0),
        };
        let (ha, hb) = (a.half_extents(), b.half_extents());

        // Already interpenetrating: report at distance zero.
        let overlap = match (radius(a), radius(b)) {
            (None, None) => Narrowphase::overlap_aabb_aabb(a_c, ha, b_c, hb),
            (Some(ra), None) => Narrowphase::overlap_circle_aabb(a_c, ra, b_c, hb),
            (None, Some(rb)) => Narrowphase::overlap_circle_aabb(b_c, rb, a_c, ha)
                .map(|o| Overlap { normal: -o.normal, depth: o.depth, contact: b_c - o.normal * rb }),
            (Some(ra), Some(rb)) => Narrowphase::overlap_circle_circle(a_c, ra, b_c, rb),
        };
        if let Some(o) = overlap {
            return Some((0.0, o.contact, o.normal));
        }

        let hit = match (radius(a), radius(b)) {
            (None, None) => Narrowphase::sweep_aabb_aabb(a_c, ha, motion, b_c, hb, Vec2::ZERO),
            (Some(ra), None) => Narrowphase::sweep_circle_aabb(a_c, ra, motion, b_c, hb, Vec2::ZERO),
            (None, Some(rb)) => {
                // Swap and invert normal
                let hit = Narrowphase::sweep_circle_aabb(b_c, rb, Vec2::ZERO, a_c, ha, motion)?;
                Some(SweepHit { toi: hit.toi, normal: -hit.normal, contact: b_c - hit.normal * rb })
            }
            (Some(ra), Some(rb)) => Narrowphase::sweep_circle_circle(a_c, ra, motion, b_c, rb, Vec2::ZERO),
        }?;
        // Zero normal: started flush against a face without entering it.
        if hit.normal == Vec2::ZERO {
            return None;
        }
        Some((hit.toi, hit.contact, hit.normal))
    }

    /// Return debug stats for the current grid.
    pub fn stats(&self) -> WorldStats {
        WorldStats { nodes: self.nodes.len(), shapes: self.shapes.len(), cells: self.grid.len() }
    }
}

impl ShapeQuery for ShapeWorld {
    fn cast(
        &self,
        shape: &AttachedShape,
        origin: Vec2,
        direction: Vec2,
        filter: &ResolutionFilter,
        max_distance: f32,
        results: &mut [ContactResult],
    ) -> usize {
        let Some(entry) = self.shapes.get(shape.handle.0 as usize) else { return 0 };
        if direction.length_squared() == 0.0 || !(max_distance > 0.0) {
            return 0;
        }

        // Place the shape relative to where the caller says its body is.
        let start = origin + self.node_position(entry.node) - self.node_position(shape.body) + entry.offset;
        let motion = direction * max_distance;
        let end = start + motion;
        let half = entry.kind.half_extents();

        let mut hits = Vec::new();
        for idx in self.candidates(start.min(end) - half, start.max(end) + half) {
            let target = &self.shapes[idx];
            if self.is_under(target.node, shape.body) {
                continue;
            }
            if !filter.accepts(LayerMask::bit(target.layer), target.is_trigger) {
                continue;
            }
            let target_c = self.node_position(target.node) + target.offset;
            if let Some((toi, point, normal)) = Self::contact_pair(entry.kind, start, motion, target.kind, target_c) {
                hits.push(ContactResult { distance: toi * max_distance, point, normal });
            }
        }

        // Stable: equal distances keep shape order.
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        let n = hits.len().min(results.len());
        results[..n].copy_from_slice(&hits[..n]);
        hits.len()
    }
}

impl ShapeSource for ShapeWorld {
    fn shapes_of(&self, node: NodeId) -> Vec<ShapeHandle> {
        self.nodes.get(node.0 as usize).map(|n| n.shapes.clone()).unwrap_or_default()
    }

    fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.get(node.0 as usize).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn is_trigger(&self, shape: ShapeHandle) -> bool {
        self.shapes.get(shape.0 as usize).is_some_and(|s| s.is_trigger)
    }

    fn shape_layer(&self, shape: ShapeHandle) -> u32 {
        self.shapes.get(shape.0 as usize).map_or(0, |s| s.layer)
    }

    fn node_layer(&self, node: NodeId) -> u32 {
        self.nodes.get(node.0 as usize).map_or(0, |n| n.layer)
    }
}

impl LayerMatrix for ShapeWorld {
    fn collision_mask(&self, layer: u32) -> Option<u32> {
        self.matrix.collision_mask(layer)
    }
}
