use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::HudError;
use crate::surface::{DEFAULT_TESSELLATION_QUALITY, SurfaceConfig};

/// Canvas configuration as exposed to the surrounding game.
///
/// Deserialised from camelCase JSON; every field is optional and falls back
/// to [`CanvasSettings::default`]:
///
/// ```json
/// { "width": 1000, "height": 500, "angle": 90,
///   "interactable": true, "blocksRaycasts": true,
///   "raycastOwnLayerOnly": false, "layer": 5 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasSettings {
    pub width: f32,
    pub height: f32,
    /// Horizontal arc in degrees; 0 = flat, the sign selects the direction.
    pub angle: f32,
    /// Vertical arc in degrees. Always derived from `angle` and the aspect
    /// ratio; a mismatching value is reported and ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_angle: Option<f32>,
    pub interactable: bool,
    pub blocks_raycasts: bool,
    pub raycast_own_layer_only: bool,
    pub layer: u32,
    pub tessellation_quality: f32,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            angle: 90.0,
            vertical_angle: None,
            interactable: true,
            blocks_raycasts: true,
            raycast_own_layer_only: false,
            layer: 5,
            tessellation_quality: DEFAULT_TESSELLATION_QUALITY,
        }
    }
}

impl CanvasSettings {
    /// Parse settings from JSON.
    ///
    /// # Errors
    /// Returns [`HudError::Settings`] if the input is malformed or a field has
    /// the wrong type. Canvas size is not checked here; an invalid size is a
    /// per-frame [`HudError::Configuration`].
    pub fn from_json(json: &str) -> Result<Self, HudError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, HudError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the initial surface snapshot.
    pub fn to_surface(&self) -> SurfaceConfig {
        let surface = SurfaceConfig::new(Vec2::new(self.width, self.height), self.angle)
            .with_tessellation_quality(self.tessellation_quality)
            .with_interactable(self.interactable)
            .with_blocks_raycasts(self.blocks_raycasts)
            .with_raycast_own_layer_only(self.raycast_own_layer_only)
            .with_layer(self.layer);

        if let Some(requested) = self.vertical_angle {
            let derived = surface.vertical_angle();
            if (requested - derived).abs() > 1e-3 {
                log::warn!(
                    "verticalAngle {requested}° ignored: the vertical arc follows the aspect ratio ({derived}°)"
                );
            }
        }
        surface
    }
}
