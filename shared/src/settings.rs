//! Tunable settings and their on-disk form.
//!
//! Every field has a `SettingRange` (min, max, default, UI step). Values coming from the
//! UI or from disk are clamped, never rejected. Stored records are resolved field by
//! field: a missing, NaN or zero value takes the default. A payload that does not parse
//! as a record at all is replaced wholesale by defaults.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use ron::extensions::Extensions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed range, default and UI step for one setting
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SettingRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub step: f32,
}

impl SettingRange {
    pub const fn new(min: f32, max: f32, default: f32, step: f32) -> Self {
        Self { min, max, default, step }
    }

    /// Clamp into range. NaN falls back to the (clamped) default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default.clamp(self.min, self.max);
        }
        value.clamp(self.min, self.max)
    }

    /// Resolve a stored value: missing, NaN and zero mean "use the default".
    pub fn resolve(&self, stored: Option<f32>) -> f32 {
        match stored {
            Some(v) if !v.is_nan() && v != 0.0 => self.clamp(v),
            _ => self.clamp(self.default),
        }
    }

    /// Move `value` by whole UI steps, clamped
    pub fn step_by(&self, value: f32, steps: i32) -> f32 {
        self.clamp(value + self.step * steps as f32)
    }
}

// Player speed is in UI units (world speed = value / 10).
pub const MOVE_SPEED: SettingRange = SettingRange::new(80.0, 200.0, 170.0, 1.0);
// Legacy default 600 sits above the range; it resolves to 400.
pub const SKILL_SPEED: SettingRange = SettingRange::new(80.0, 400.0, 600.0, 1.0);
pub const SKILL_RADIUS: SettingRange = SettingRange::new(1.0, 40.0, 40.0, 0.5);
// Legacy default 80 sits above the range; it resolves to 50.
pub const CAMERA_DISTANCE: SettingRange = SettingRange::new(10.0, 50.0, 80.0, 0.1);
/// Vertical field of view in degrees
pub const CAMERA_FOV: SettingRange = SettingRange::new(30.0, 120.0, 60.0, 1.0);
pub const CIRCLE_RADIUS: SettingRange = SettingRange::new(10.0, 100.0, 40.0, 1.0);
/// Camera far plane
pub const RENDER_DISTANCE: SettingRange = SettingRange::new(10.0, 500.0, 500.0, 1.0);

/// Identifies one field of `Settings` (used by the settings panel)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SettingField {
    MoveSpeed,
    SkillSpeed,
    SkillRadius,
    CameraDistance,
    CameraFov,
    CircleRadius,
    RenderDistance,
}

impl SettingField {
    pub const ALL: [SettingField; 7] = [
        SettingField::MoveSpeed,
        SettingField::SkillSpeed,
        SettingField::SkillRadius,
        SettingField::CameraDistance,
        SettingField::CameraFov,
        SettingField::CircleRadius,
        SettingField::RenderDistance,
    ];

    pub fn range(self) -> SettingRange {
        match self {
            SettingField::MoveSpeed => MOVE_SPEED,
            SettingField::SkillSpeed => SKILL_SPEED,
            SettingField::SkillRadius => SKILL_RADIUS,
            SettingField::CameraDistance => CAMERA_DISTANCE,
            SettingField::CameraFov => CAMERA_FOV,
            SettingField::CircleRadius => CIRCLE_RADIUS,
            SettingField::RenderDistance => RENDER_DISTANCE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SettingField::MoveSpeed => "Player Speed",
            SettingField::SkillSpeed => "Skill Speed",
            SettingField::SkillRadius => "Skill Circle Size",
            SettingField::CameraDistance => "Camera Distance",
            SettingField::CameraFov => "Camera FOV",
            SettingField::CircleRadius => "Circle Radius",
            SettingField::RenderDistance => "Render Distance",
        }
    }

    /// Decimal places shown next to the value
    pub fn decimals(self) -> usize {
        match self {
            SettingField::SkillRadius | SettingField::CameraDistance => 2,
            _ => 0,
        }
    }
}

/// Effective settings. Always in range once constructed through this module.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Settings {
    pub move_speed: f32,
    pub skill_speed: f32,
    pub skill_radius: f32,
    pub camera_distance: f32,
    pub camera_fov: f32,
    pub circle_radius: f32,
    pub render_distance: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_stored(StoredSettings::default())
    }
}

impl Settings {
    /// Resolve a stored record field by field
    pub fn from_stored(stored: StoredSettings) -> Self {
        Self {
            move_speed: MOVE_SPEED.resolve(stored.move_speed),
            skill_speed: SKILL_SPEED.resolve(stored.skill_speed),
            skill_radius: SKILL_RADIUS.resolve(stored.skill_radius),
            camera_distance: CAMERA_DISTANCE.resolve(stored.camera_distance),
            camera_fov: CAMERA_FOV.resolve(stored.camera_fov),
            circle_radius: CIRCLE_RADIUS.resolve(stored.circle_radius),
            render_distance: RENDER_DISTANCE.resolve(stored.render_distance),
        }
    }

    /// Re-clamp every field (e.g. after direct field writes)
    pub fn clamped(self) -> Self {
        let mut out = self;
        for field in SettingField::ALL {
            out.set(field, self.get(field));
        }
        out
    }

    pub fn get(&self, field: SettingField) -> f32 {
        match field {
            SettingField::MoveSpeed => self.move_speed,
            SettingField::SkillSpeed => self.skill_speed,
            SettingField::SkillRadius => self.skill_radius,
            SettingField::CameraDistance => self.camera_distance,
            SettingField::CameraFov => self.camera_fov,
            SettingField::CircleRadius => self.circle_radius,
            SettingField::RenderDistance => self.render_distance,
        }
    }

    /// Set a field, clamped to its range
    pub fn set(&mut self, field: SettingField, value: f32) {
        let value = field.range().clamp(value);
        match field {
            SettingField::MoveSpeed => self.move_speed = value,
            SettingField::SkillSpeed => self.skill_speed = value,
            SettingField::SkillRadius => self.skill_radius = value,
            SettingField::CameraDistance => self.camera_distance = value,
            SettingField::CameraFov => self.camera_fov = value,
            SettingField::CircleRadius => self.circle_radius = value,
            SettingField::RenderDistance => self.render_distance = value,
        }
    }

    /// Nudge a field by whole UI steps
    pub fn step(&mut self, field: SettingField, steps: i32) {
        let value = field.range().step_by(self.get(field), steps);
        self.set(field, value);
    }
}

/// Persisted record as read from disk. Every field is optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoredSettings {
    pub move_speed: Option<f32>,
    pub skill_speed: Option<f32>,
    pub skill_radius: Option<f32>,
    pub camera_distance: Option<f32>,
    pub camera_fov: Option<f32>,
    pub circle_radius: Option<f32>,
    pub render_distance: Option<f32>,
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
}

/// Parse a stored settings payload (RON record, fields optional)
pub fn parse_settings(text: &str) -> Result<Settings, SettingsError> {
    let stored: StoredSettings = ron::Options::default()
        .with_default_extension(Extensions::IMPLICIT_SOME)
        .from_str(text)?;
    Ok(Settings::from_stored(stored))
}

pub fn settings_to_ron(settings: &Settings) -> Result<String, SettingsError> {
    let text = ron::ser::to_string_pretty(settings, ron::ser::PrettyConfig::default())?;
    Ok(text)
}

/// Environment variable overriding the settings directory
pub const SETTINGS_DIR_ENV: &str = "ARENA_SETTINGS_DIR";
/// Default settings directory (relative to the working directory)
pub const DEFAULT_SETTINGS_DIR: &str = "saves";

/// File-backed settings persistence
#[derive(Resource, Clone, Debug)]
pub struct SettingsStore {
    /// Directory holding `settings.ron`
    pub storage_dir: PathBuf,
}

impl SettingsStore {
    pub const FILE_NAME: &'static str = "settings.ron";

    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
        }
    }

    /// Directory from `ARENA_SETTINGS_DIR`, falling back to `saves/`
    pub fn from_env() -> Self {
        let dir = std::env::var_os(SETTINGS_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_DIR));
        Self::new(dir)
    }

    pub fn path(&self) -> PathBuf {
        self.storage_dir.join(Self::FILE_NAME)
    }

    /// Read stored settings. `Ok(None)` when nothing has been saved yet.
    pub fn read(&self) -> Result<Option<Settings>, SettingsError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(&path)?;
        parse_settings(&text).map(Some)
    }

    /// Load settings, substituting defaults for a missing or malformed file
    pub fn load_or_default(&self) -> Settings {
        match self.read() {
            Ok(Some(settings)) => {
                info!("Loaded settings from {:?}", self.path());
                settings
            }
            Ok(None) => {
                info!("No saved settings at {:?}; using defaults", self.path());
                Settings::default()
            }
            Err(e) => {
                warn!("Ignoring settings at {:?}: {}; using defaults", self.path(), e);
                Settings::default()
            }
        }
    }

    /// Save settings (atomic write via temp file)
    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        std::fs::create_dir_all(&self.storage_dir)?;
        let text = settings_to_ron(settings)?;
        write_atomic(&self.storage_dir, &self.path(), text.as_bytes())?;
        info!("Saved settings to {:?}", self.path());
        Ok(())
    }
}

fn write_atomic(dir: &Path, final_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let temp_path = dir.join(format!("{}.tmp", SettingsStore::FILE_NAME));
    std::fs::write(&temp_path, bytes)?;
    std::fs::rename(&temp_path, final_path)
}
