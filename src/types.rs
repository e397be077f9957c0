use glam::Vec2;

/// Host-side handle of a collision shape. The mover references shapes, never owns them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeHandle(pub u32);

/// Host-side handle of a scene node (a body or one of its children).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

/// Number of collision layers addressable by a `u32` mask.
pub const LAYER_COUNT: u32 = 32;

/// Bitmask-based filtering.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LayerMask {
    /// Layer bit(s) this shape belongs to.
    pub layer: u32,
    /// Layers this shape wants to detect.
    pub collides_with: u32,
}

impl LayerMask {
    /// Mask that detects nothing.
    pub const NONE: LayerMask = LayerMask { layer: 0, collides_with: 0 };

    /// Convenience constructor.
    pub fn simple(layer: u32, collides_with: u32) -> Self {
        Self { layer, collides_with }
    }

    /// Bit for a layer index; out-of-range layers map to no bit.
    pub fn bit(layer: u32) -> u32 {
        1u32.checked_shl(layer).unwrap_or(0)
    }

    /// One-directional rule: `self` may detect `other` iff `(self.collides_with & other.layer) != 0`.
    pub fn allows(self, other: LayerMask) -> bool {
        (self.collides_with & other.layer) != 0
    }
}

/// Supported shape kinds of the reference host.
#[derive(Copy, Clone, Debug)]
pub enum ShapeKind {
    /// Centered axis-aligned box (half extents along X/Y).
    Aabb { half_extents: Vec2 },
    /// Centered circle.
    Circle { radius: f32 },
    /// Mathematical point.
    Point,
}

impl ShapeKind {
    /// Half extents of the shape's bounding box.
    pub fn half_extents(self) -> Vec2 {
        match self {
            ShapeKind::Aabb { half_extents } => half_extents,
            ShapeKind::Circle { radius } => Vec2::splat(radius),
            ShapeKind::Point => Vec2::ZERO,
        }
    }
}

/// A shape rigidly bound to a body, captured once when the mover is set up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AttachedShape {
    pub handle: ShapeHandle,
    /// The body node the shape moves with.
    pub body: NodeId,
    /// Resolved from the collision matrix; `LayerMask::NONE` when no row was found.
    pub mask: LayerMask,
}

/// One swept-query contact.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ContactResult {
    /// Distance traveled along the cast direction before contact (0 when starting overlapped).
    pub distance: f32,
    /// World-space contact point.
    pub point: Vec2,
    /// Surface normal, pointing away from the obstacle.
    pub normal: Vec2,
}

/// Overlap contact result (discrete).
#[derive(Copy, Clone, Debug)]
pub struct Overlap {
    /// Separating normal, from B into A (may be (0,0) for degenerate cases).
    pub normal: Vec2,
    /// Penetration depth (> 0).
    pub depth: f32,
    /// A representative contact point.
    pub contact: Vec2,
}

/// Sweep (time-of-impact) result.
#[derive(Copy, Clone, Debug)]
pub struct SweepHit {
    /// Fraction in [0,1] of the motion where first impact occurs.
    pub toi: f32,
    /// Normal at impact (points from B into A).
    pub normal: Vec2,
    /// Representative impact/contact point.
    pub contact: Vec2,
}

/// The kinematic entity being moved.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Body {
    pub position: Vec2,
    /// Velocity after the last tick's collision correction.
    pub velocity: Vec2,
    /// Written by an external controller; adopted at the start of each tick.
    pub target_velocity: Vec2,
}

impl Body {
    pub fn new(position: Vec2) -> Self {
        Self { position, ..Default::default() }
    }
}

/// Outcome of a single resolve call.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    /// Displacement the body may take.
    pub displacement: Vec2,
    /// Velocity after sliding / overlap recovery.
    pub velocity: Vec2,
    /// Contacts processed.
    pub contacts: usize,
    /// Contacts dropped because a shape's buffer was full.
    pub truncated: usize,
    /// True when an overlap-recovery push replaced the movement direction.
    pub recovered: bool,
}

/// Outcome of one fixed tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub displacement: Vec2,
    pub velocity: Vec2,
    pub contacts: usize,
    pub truncated: usize,
    pub recovered: bool,
}

impl TickReport {
    pub(crate) fn absorb(&mut self, r: &Resolution) {
        self.displacement += r.displacement;
        self.velocity = r.velocity;
        self.contacts += r.contacts;
        self.truncated += r.truncated;
        self.recovered |= r.recovered;
    }
}

/// Uniform-grid configuration of the reference host.
#[derive(Clone, Debug)]
pub struct WorldConfig {
    /// Grid cell size in world units.
    pub cell_size: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { cell_size: 4.0 }
    }
}

/// Debug statistics of the reference host.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub nodes: usize,
    pub shapes: usize,
    /// Occupied grid cells.
    pub cells: usize,
}
