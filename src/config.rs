//! Mover configuration: resolver tunables, integration mode, mask selection.

use serde::{Deserialize, Serialize};

/// Sweeps shorter than this skip collision work entirely.
pub const DEFAULT_MIN_MOVE_DISTANCE: f32 = 0.001;
/// Padding subtracted from every contact distance.
pub const DEFAULT_SHELL_RADIUS: f32 = 0.01;
/// Padded distances below this are treated as interpenetration.
pub const DEFAULT_OVERLAP_THRESHOLD: f32 = -0.008;
/// Per-shape contact buffer length.
pub const DEFAULT_CONTACT_CAPACITY: usize = 16;

/// What to do when a cast finds more contacts than the buffer holds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Keep the nearest `contact_capacity` contacts, drop the rest.
    #[default]
    Truncate,
    /// Fail the resolve call with `MoveError::ContactOverflow`.
    Error,
}

/// How the integrator splits a tick's motion.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrationMode {
    /// One sweep with the full 2D displacement.
    Combined,
    /// Horizontal sweep, then vertical sweep with the updated velocity.
    #[default]
    AxisSeparated,
}

/// Which layer keys the collision-matrix lookup for each attached shape.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskSource {
    /// Every shape uses the row of its own layer.
    #[default]
    PerShape,
    /// Every shape shares the row of the body's layer.
    BodyLayer,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub min_move_distance: f32,
    pub shell_radius: f32,
    pub overlap_threshold: f32,
    /// Remove inward velocity at contacts and push out of deep overlaps.
    pub slide_correction: bool,
    pub contact_capacity: usize,
    pub overflow: OverflowPolicy,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_move_distance: DEFAULT_MIN_MOVE_DISTANCE,
            shell_radius: DEFAULT_SHELL_RADIUS,
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
            slide_correction: true,
            contact_capacity: DEFAULT_CONTACT_CAPACITY,
            overflow: OverflowPolicy::Truncate,
        }
    }
}

impl ResolverConfig {
    /// Reject values the resolver cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("min_move_distance", self.min_move_distance),
            ("shell_radius", self.shell_radius),
            ("overlap_threshold", self.overlap_threshold),
        ];
        for (field, v) in finite {
            if !v.is_finite() {
                return Err(ConfigError::invalid(field, "must be finite"));
            }
        }
        if self.min_move_distance < 0.0 {
            return Err(ConfigError::invalid("min_move_distance", "must be >= 0"));
        }
        if self.shell_radius < 0.0 {
            return Err(ConfigError::invalid("shell_radius", "must be >= 0"));
        }
        if self.overlap_threshold > 0.0 {
            return Err(ConfigError::invalid("overlap_threshold", "must be <= 0"));
        }
        if self.contact_capacity == 0 {
            return Err(ConfigError::invalid("contact_capacity", "must be at least 1"));
        }
        Ok(())
    }
}

/// Full configuration of a `CharacterMover`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoverConfig {
    pub resolver: ResolverConfig,
    pub integration: IntegrationMode,
    pub mask_source: MaskSource,
}

impl MoverConfig {
    /// Distance clamping only: no sliding, no overlap recovery, one combined
    /// sweep, and a single mask taken from the body's layer.
    pub fn legacy() -> Self {
        Self {
            resolver: ResolverConfig { slide_correction: false, ..Default::default() },
            integration: IntegrationMode::Combined,
            mask_source: MaskSource::BodyLayer,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolver.validate()
    }

    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = ron::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.ron` or `.toml` file, picked by extension.
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        if path.ends_with(".toml") {
            Self::from_toml_str(&contents)
        } else if path.ends_with(".ron") {
            Self::from_ron_str(&contents)
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialize(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: &'static str) -> Self {
        ConfigError::Invalid { field, reason }
    }
}
