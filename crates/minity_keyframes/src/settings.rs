// SPDX-License-Identifier: MIT OR Apache-2.0
//! Viewer settings.
//!
//! Everything the UI can adjust lives here and is passed into the frame
//! update explicitly:
//! - Shading (wireframe, light marker, shading model, bump mapping)
//! - Lighting (material colors, intensities, manual light offset)
//! - Optics (reflection / refraction)
//! - Animation (explosion, playback speed)
//! - Part visibility

use crate::explosion::Explosion;
use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings file name used when none is given
pub const SETTINGS_FILE_NAME: &str = "minity.ron";

/// Range of the explosion slider
pub const EXPLOSION_RANGE: std::ops::RangeInclusive<f32> = -1.0..=5.0;

/// Range of the playback step slider
pub const STEP_RANGE: std::ops::RangeInclusive<f32> = 0.0..=1.0;

/// Range of each manual light offset slider
pub const LIGHT_OFFSET_RANGE: std::ops::RangeInclusive<f32> = -15.0..=15.0;

/// Range of the manual refractive index sliders
pub const REFRACTIVE_INDEX_RANGE: std::ops::RangeInclusive<f32> = 0.1..=10.0;

/// Error loading or saving settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents are not valid settings
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Shading model used for the lit pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShadingModel {
    /// Blinn-Phong
    #[default]
    BlinnPhong,
    /// Quantized toon shading
    Toon,
}

impl ShadingModel {
    /// Get the display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::BlinnPhong => "Blinn Phong Shading",
            Self::Toon => "Toon Shading",
        }
    }
}

/// Surface shading settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingSettings {
    /// Draw wireframe overlay
    pub wireframe: bool,
    /// Wireframe line color (RGBA)
    pub wireframe_color: Vec4,
    /// Draw the light source marker
    pub light_source: bool,
    /// Shading model
    pub model: ShadingModel,
    /// Procedural bump mapping enabled
    pub bump_mapping: bool,
    /// Bump amplitude
    pub bump_amplitude: f32,
    /// Bump frequency
    pub bump_frequency: f32,
}

impl Default for ShadingSettings {
    fn default() -> Self {
        Self {
            wireframe: false,
            wireframe_color: Vec4::ONE,
            light_source: true,
            model: ShadingModel::BlinnPhong,
            bump_mapping: false,
            bump_amplitude: 0.001,
            bump_frequency: 100.0,
        }
    }
}

/// Light and material response settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingSettings {
    /// Ambient color (RGBA)
    pub ambient_color: Vec4,
    /// Diffuse color (RGBA)
    pub diffuse_color: Vec4,
    /// Specular color (RGBA)
    pub specular_color: Vec4,
    /// Ambient intensity
    pub ambient_intensity: f32,
    /// Diffuse intensity
    pub diffuse_intensity: f32,
    /// Specular intensity
    pub specular_intensity: f32,
    /// Specular exponent
    pub shininess: f32,
    /// Add `light_offset` to the light position
    pub manual_light: bool,
    /// Manual light offset
    pub light_offset: Vec3,
}

impl Default for LightingSettings {
    fn default() -> Self {
        Self {
            ambient_color: Vec4::new(0.2, 0.2, 0.2, 1.0),
            diffuse_color: Vec4::new(0.8, 0.8, 0.8, 1.0),
            specular_color: Vec4::ONE,
            ambient_intensity: 1.0,
            diffuse_intensity: 1.0,
            specular_intensity: 1.0,
            shininess: 1.0,
            manual_light: false,
            light_offset: Vec3::ZERO,
        }
    }
}

/// Environment response of the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SurfaceResponse {
    /// Plain shading
    #[default]
    None,
    /// Mirror the environment map
    Reflection,
    /// Refract the environment map
    Refraction,
}

/// How environment response combines with shading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ResponseBlend {
    /// Added on top of the lit color
    #[default]
    Shaded,
    /// Environment only
    Only,
    /// Modulated by the ambient term
    Ambient,
}

/// Medium with a known refractive index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Medium {
    /// Air
    #[default]
    Air,
    /// Water
    Water,
    /// Ice
    Ice,
    /// Glass
    Glass,
    /// Diamond
    Diamond,
}

impl Medium {
    /// Refractive index
    pub fn index(&self) -> f32 {
        match self {
            Self::Air => 1.0,
            Self::Water => 1.333,
            Self::Ice => 1.309,
            Self::Glass => 1.523,
            Self::Diamond => 2.422,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Air => "Air - 1.000",
            Self::Water => "Water - 1.333",
            Self::Ice => "Ice - 1.309",
            Self::Glass => "Glass - 1.523",
            Self::Diamond => "Diamond - 2.422",
        }
    }

    /// Get all media
    pub fn all() -> &'static [Medium] {
        &[
            Medium::Air,
            Medium::Water,
            Medium::Ice,
            Medium::Glass,
            Medium::Diamond,
        ]
    }
}

/// Reflection and refraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpticsSettings {
    /// Reflection, refraction or neither
    pub response: SurfaceResponse,
    /// Blend of the response with shading
    pub blend: ResponseBlend,
    /// Refractive index of the medium the ray leaves
    pub n1: f32,
    /// Refractive index of the medium the ray enters
    pub n2: f32,
}

impl OpticsSettings {
    /// Pick both media from the preset table
    pub fn set_media(&mut self, from: Medium, to: Medium) {
        self.n1 = from.index();
        self.n2 = to.index();
    }

    /// Ratio `n1 / n2` passed to the refraction shader
    pub fn refraction_ratio(&self) -> f32 {
        self.n1 / self.n2
    }
}

impl Default for OpticsSettings {
    fn default() -> Self {
        Self {
            response: SurfaceResponse::None,
            blend: ResponseBlend::Shaded,
            n1: 1.0,
            n2: 1.33,
        }
    }
}

/// Animation and explosion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Authored explosion amount
    pub explosion: f32,
    /// Add the camera-distance explosion term
    pub camera_explosion: bool,
    /// Cursor advance per frame, in segments
    pub step: f32,
}

impl AnimationSettings {
    /// Explosion parameters for this frame
    pub fn explosion(&self) -> Explosion {
        Explosion::new(self.explosion, self.camera_explosion)
    }

    /// Step clamped to be non-negative
    pub fn effective_step(&self) -> f32 {
        if self.step.is_nan() {
            0.0
        } else {
            self.step.max(0.0)
        }
    }
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            explosion: 0.0,
            camera_explosion: false,
            step: 0.1,
        }
    }
}

/// All user-adjustable viewer settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerSettings {
    /// Shading settings
    pub shading: ShadingSettings,
    /// Lighting settings
    pub lighting: LightingSettings,
    /// Reflection / refraction settings
    pub optics: OpticsSettings,
    /// Animation settings
    pub animation: AnimationSettings,
    /// Per-part visibility
    pub part_visible: Vec<bool>,
}

impl ViewerSettings {
    /// Resize the visibility list, showing any new parts
    pub fn sync_part_count(&mut self, count: usize) {
        self.part_visible.resize(count, true);
    }

    /// Whether a part is drawn
    pub fn is_part_visible(&self, index: usize) -> bool {
        self.part_visible.get(index).copied().unwrap_or(true)
    }

    /// Light position after the manual offset
    pub fn effective_light_position(&self, world_light: Vec3) -> Vec3 {
        if self.lighting.manual_light {
            world_light + self.lighting.light_offset
        } else {
            world_light
        }
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        let settings = Self::from_ron(&contents)?;
        tracing::debug!("Loaded viewer settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_ron()?)?;
        tracing::debug!("Saved viewer settings to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ViewerSettings::default();
        assert_eq!(settings.shading.model, ShadingModel::BlinnPhong);
        assert!(settings.shading.light_source);
        assert_eq!(settings.animation.step, 0.1);
        assert_eq!(settings.animation.explosion, 0.0);
        assert!(!settings.animation.camera_explosion);
        assert_eq!(settings.optics.response, SurfaceResponse::None);
    }

    #[test]
    fn test_serialization() {
        let mut settings = ViewerSettings::default();
        settings.shading.model = ShadingModel::Toon;
        settings.animation.explosion = 2.5;
        settings.sync_part_count(3);
        settings.part_visible[1] = false;

        let ron_str = settings.to_ron().unwrap();
        let loaded = ViewerSettings::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let loaded = ViewerSettings::from_ron("(animation: (step: 0.5))").unwrap();
        assert_eq!(loaded.animation.step, 0.5);
        assert_eq!(loaded.animation.explosion, 0.0);
        assert_eq!(loaded.lighting, LightingSettings::default());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        assert!(ViewerSettings::from_ron("(animation: 3)").is_err());
    }

    #[test]
    fn test_refraction_ratio() {
        let mut optics = OpticsSettings::default();
        optics.set_media(Medium::Air, Medium::Glass);
        assert!((optics.refraction_ratio() - 1.0 / 1.523).abs() < 1e-6);
        assert_eq!(Medium::all().len(), 5);
    }

    #[test]
    fn test_effective_step() {
        let mut animation = AnimationSettings::default();
        animation.step = -0.3;
        assert_eq!(animation.effective_step(), 0.0);
        animation.step = f32::NAN;
        assert_eq!(animation.effective_step(), 0.0);
        animation.step = 0.4;
        assert_eq!(animation.effective_step(), 0.4);
    }

    #[test]
    fn test_part_visibility() {
        let mut settings = ViewerSettings::default();
        settings.sync_part_count(2);
        settings.part_visible[0] = false;
        settings.sync_part_count(4);

        assert_eq!(settings.part_visible, vec![false, true, true, true]);
        assert!(settings.is_part_visible(10));
    }

    #[test]
    fn test_manual_light_offset() {
        let mut settings = ViewerSettings::default();
        let light = Vec3::new(1.0, 2.0, 3.0);
        settings.lighting.light_offset = Vec3::new(0.0, -2.0, 1.0);
        assert_eq!(settings.effective_light_position(light), light);

        settings.lighting.manual_light = true;
        assert_eq!(settings.effective_light_position(light), Vec3::new(1.0, 0.0, 4.0));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("minity-settings-{}.ron", uuid::Uuid::new_v4()));
        let mut settings = ViewerSettings::default();
        settings.lighting.shininess = 32.0;

        settings.save(&path).unwrap();
        let loaded = ViewerSettings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.lighting.shininess, 32.0);
    }
}
