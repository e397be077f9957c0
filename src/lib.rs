//! shellcast: kinematic 2D character mover (swept casts, shell padding, sliding)

pub mod types;
pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod registry;
pub mod resolver;
pub mod integrator;
pub mod world;
pub mod narrowphase;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::config::*;
pub use crate::error::MoveError;
pub use crate::filter::{CollisionMatrix, ResolutionFilter};
pub use crate::registry::ColliderRegistry;
pub use crate::resolver::CollisionResolver;
pub use crate::integrator::{CharacterMover, MotionIntegrator};
pub use crate::world::ShapeWorld;
