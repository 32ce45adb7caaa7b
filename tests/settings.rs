use curved_hud::settings::CanvasSettings;
use curved_hud::{CurvedCanvas, HudError};
use glam::Vec2;

#[test]
fn test_settings_parse_camel_case() {
    let json = r#"{
        "width": 1000,
        "height": 500,
        "angle": -60,
        "interactable": false,
        "blocksRaycasts": true,
        "raycastOwnLayerOnly": true,
        "layer": 8,
        "tessellationQuality": 4
    }"#;
    let s = CanvasSettings::from_json(json).unwrap();
    assert_eq!(s.width, 1000.0);
    assert_eq!(s.angle, -60.0);
    assert!(!s.interactable);
    assert!(s.raycast_own_layer_only);

    let surface = s.to_surface();
    assert_eq!(surface.canvas_size(), Vec2::new(1000.0, 500.0));
    assert_eq!(surface.vertical_angle(), -30.0);
    assert_eq!(surface.layer_mask(), 1 << 8);
    assert_eq!(surface.tessellation_quality(), 4.0);
}

#[test]
fn test_missing_fields_use_defaults() {
    let s = CanvasSettings::from_json(r#"{ "angle": 45 }"#).unwrap();
    let defaults = CanvasSettings::default();
    assert_eq!(s.angle, 45.0);
    assert_eq!(s.width, defaults.width);
    assert_eq!(s.layer, 5);
    assert!(s.blocks_raycasts);
}

#[test]
fn test_malformed_settings_are_rejected() {
    assert!(matches!(CanvasSettings::from_json("{ \"angle\": \"wide\" }"), Err(HudError::Settings(_))));
    assert!(matches!(CanvasSettings::from_json("not json"), Err(HudError::Settings(_))));
}

#[test_log::test]
fn test_vertical_angle_is_derived_not_configured() {
    let s = CanvasSettings::from_json(r#"{ "width": 1000, "height": 500, "angle": 90, "verticalAngle": 70 }"#).unwrap();
    assert_eq!(s.vertical_angle, Some(70.0));
    assert_eq!(s.to_surface().vertical_angle(), 45.0);
}

#[test]
fn test_settings_survive_serialisation() {
    let s = CanvasSettings { angle: 120.0, layer: 3, ..CanvasSettings::default() };
    let json = s.to_json().unwrap();
    assert!(json.contains("\"blocksRaycasts\""));
    assert!(!json.contains("verticalAngle"));
    assert_eq!(CanvasSettings::from_json(&json).unwrap(), s);
}

#[test]
fn test_canvas_built_from_settings() {
    let s = CanvasSettings { width: 800.0, height: 400.0, angle: 0.0, ..CanvasSettings::default() };
    let canvas = CurvedCanvas::from_settings(&s);
    assert!(canvas.surface().is_flat());
    assert!(canvas.collider().is_some());
}
