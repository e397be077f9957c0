//! Fixed-tick driving of a body through the resolver.

use glam::Vec2;

use crate::api::{LayerMatrix, ShapeQuery, ShapeSource};
use crate::config::{IntegrationMode, MoverConfig};
use crate::error::MoveError;
use crate::registry::ColliderRegistry;
use crate::resolver::CollisionResolver;
use crate::types::*;

/// Per-tick driver. Stateless apart from its mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MotionIntegrator {
    pub mode: IntegrationMode,
}

impl MotionIntegrator {
    pub fn new(mode: IntegrationMode) -> Self {
        Self { mode }
    }

    /// Adopt the target velocity, resolve the tick's motion, and commit the
    /// result to `body`. Nothing is written to `body` if resolving fails.
    pub fn tick<Q>(
        &self,
        body: &mut Body,
        resolver: &mut CollisionResolver,
        shapes: &[AttachedShape],
        query: &Q,
        dt: f32,
    ) -> Result<TickReport, MoveError>
    where
        Q: ShapeQuery + ?Sized,
    {
        let mut position = body.position;
        let mut velocity = body.target_velocity;
        let mut report = TickReport { velocity, ..Default::default() };

        match self.mode {
            IntegrationMode::Combined => {
                let r = resolver.resolve(query, shapes, position, velocity * dt, velocity)?;
                position += r.displacement;
                report.absorb(&r);
                velocity = r.velocity;
            }
            IntegrationMode::AxisSeparated => {
                let r = resolver.resolve(query, shapes, position, Vec2::new(velocity.x * dt, 0.0), velocity)?;
                position += r.displacement;
                velocity = r.velocity;
                report.absorb(&r);

                let r = resolver.resolve(query, shapes, position, Vec2::new(0.0, velocity.y * dt), velocity)?;
                position += r.displacement;
                velocity = r.velocity;
                report.absorb(&r);
            }
        }

        body.position = position;
        body.velocity = velocity;
        Ok(report)
    }
}

/// A body with its attached shapes, resolver and integrator.
#[derive(Clone, Debug)]
pub struct CharacterMover {
    pub body: Body,
    registry: ColliderRegistry,
    resolver: CollisionResolver,
    integrator: MotionIntegrator,
}

impl CharacterMover {
    /// Capture the shapes under `node` and set the body at `position`.
    pub fn new<H>(host: &H, node: NodeId, position: Vec2, cfg: MoverConfig) -> Result<Self, MoveError>
    where
        H: ShapeSource + LayerMatrix + ?Sized,
    {
        let resolver = CollisionResolver::new(cfg.resolver)?;
        let registry = ColliderRegistry::build(host, host, node, cfg.mask_source);
        Ok(Self {
            body: Body::new(position),
            registry,
            resolver,
            integrator: MotionIntegrator::new(cfg.integration),
        })
    }

    pub fn registry(&self) -> &ColliderRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &CollisionResolver {
        &self.resolver
    }

    /// Last write before a tick wins.
    pub fn set_target_velocity(&mut self, v: Vec2) {
        self.body.target_velocity = v;
    }

    /// Run one fixed tick of length `dt`.
    pub fn fixed_update<Q>(&mut self, query: &Q, dt: f32) -> Result<TickReport, MoveError>
    where
        Q: ShapeQuery + ?Sized,
    {
        self.integrator.tick(&mut self.body, &mut self.resolver, self.registry.shapes(), query, dt)
    }

    /// Resolve an arbitrary displacement and commit it, bypassing the velocity read.
    pub fn move_position<Q>(&mut self, query: &Q, displacement: Vec2) -> Result<Resolution, MoveError>
    where
        Q: ShapeQuery + ?Sized,
    {
        let r = self.resolver.resolve(
            query,
            self.registry.shapes(),
            self.body.position,
            displacement,
            self.body.velocity,
        )?;
        self.body.position += r.displacement;
        self.body.velocity = r.velocity;
        Ok(r)
    }
}
