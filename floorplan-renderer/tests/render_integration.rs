//! Integration tests for floor-plan rendering.
//!
//! Drives a full view from a capture document through gestures, layer
//! invalidation and every output backend.

use std::time::Duration;

use floorplan_core::{
    Gesture, GesturePhase, InputEvent, RoomScene, Vec2, ViewerConfig, ViewportState,
};
use floorplan_renderer::backend::svg::frame_to_svg;
use floorplan_renderer::{
    BackendType, FloorPlanView, LayerKind, Primitive, RendererConfig, Transform2D,
};
use proptest::prelude::*;

const CAPTURE: &str = r#"{
    "walls": [
        { "position": { "x": 0.0, "y": 1.2, "z": -2.0 }, "dimensions": { "x": 6.0, "y": 2.4, "z": 0.2 }, "rotation_yaw": 0.0 },
        { "position": { "x": 3.0, "y": 1.2, "z": 0.0 }, "dimensions": { "x": 4.0, "y": 2.4, "z": 0.2 }, "rotation_yaw": 1.5707964 },
        { "position": { "x": 0.0, "y": 1.2, "z": 2.0 }, "dimensions": { "x": 6.0, "y": 2.4, "z": 0.2 }, "rotation_yaw": 0.0 },
        { "position": { "x": -3.0, "y": 1.2, "z": 0.0 }, "dimensions": { "x": 4.0, "y": 2.4, "z": 0.2 }, "rotation_yaw": 1.5707964 }
    ],
    "doors": [
        { "position": { "x": 1.5, "y": 1.0, "z": 2.0 }, "dimensions": { "x": 0.9, "y": 2.0, "z": 0.2 } }
    ],
    "windows": [
        { "position": { "x": -1.0, "y": 1.5, "z": -2.0 }, "dimensions": { "x": 1.4, "y": 1.0, "z": 0.2 } }
    ]
}"#;

fn view(backend: BackendType, animate: bool) -> FloorPlanView {
    let (scene, report) = RoomScene::from_json(CAPTURE).expect("capture");
    assert!(report.is_clean());
    let mut config = ViewerConfig::default();
    config.viewport.animate = animate;
    FloorPlanView::new(
        scene,
        640.0,
        480.0,
        config,
        RendererConfig {
            preferred_backend: backend,
            ..RendererConfig::default()
        },
    )
    .expect("view")
}

// ==========================================================================
// Layer invalidation
// ==========================================================================

#[test]
fn test_gesture_stream_only_rebuilds_labels() {
    let mut view = view(BackendType::Canvas2D, false);
    view.redraw().expect("redraw");

    for step in 0..30 {
        let gesture = if step % 2 == 0 {
            Gesture::Pan {
                delta: Vec2::new(3.0, -2.0),
            }
        } else {
            Gesture::Rotate {
                center: Vec2::new(320.0, 240.0),
                angle_radians: 0.02,
            }
        };
        view.handle_event(&InputEvent::gesture(GesturePhase::Changed, gesture))
            .expect("event");
        let regenerated = view.redraw().expect("redraw");
        assert_eq!(regenerated, vec![LayerKind::Labels]);
    }
    assert_eq!(view.renderer().frame_count(), 31);
}

#[test]
fn test_animated_reset_redraws_every_tick() {
    let mut view = view(BackendType::Canvas2D, true);
    view.zoom_in();
    while view.tick(Duration::from_millis(16)) {
        view.redraw().expect("redraw");
    }

    view.reset_view();
    let mut frames = 0;
    while view.tick(Duration::from_millis(16)) {
        let regenerated = view.redraw().expect("redraw");
        assert!(regenerated.contains(&LayerKind::Labels));
        frames += 1;
    }
    assert!(frames > 1);

    let walls = view.drawable().layer(LayerKind::Walls).expect("walls");
    let fit = view.viewer().controller().fit();
    assert!((walls.transform.scale_factor() - fit.scale).abs() < 1e-3);
}

#[test]
fn test_resize_event_refits() {
    let mut view = view(BackendType::Svg, false);
    view.redraw().expect("redraw");
    let before = view.viewer().controller().fit().scale;

    view.handle_event(&InputEvent::Resize {
        width: 1280.0,
        height: 960.0,
    })
    .expect("resize");
    view.redraw().expect("redraw");
    let after = view.viewer().controller().fit().scale;
    assert!((after - before * 2.0).abs() < 1e-3);
    assert!((view.drawable().width - 1280.0).abs() < f32::EPSILON);
}

// ==========================================================================
// Output
// ==========================================================================

#[test]
fn test_svg_export_has_door_arc_and_labels() {
    let mut view = view(BackendType::Svg, false);
    view.redraw().expect("redraw");
    let svg = view.export_svg();
    assert!(svg.contains("<g id=\"doors\""));
    assert!(svg.contains("<path d=\"M"));
    assert!(svg.contains(">6.0m</text>"));
    assert!(svg.contains(">4.0m</text>"));

    let doors = view.drawable().layer(LayerKind::Doors).expect("doors");
    assert!(doors
        .primitives
        .iter()
        .any(|p| matches!(p, Primitive::Arc { .. })));
}

#[test]
fn test_zero_size_view_renders_background_only() {
    let (scene, _) = RoomScene::from_json(CAPTURE).expect("capture");
    let mut view = FloorPlanView::new(
        scene,
        0.0,
        0.0,
        ViewerConfig::default(),
        RendererConfig {
            preferred_backend: BackendType::Svg,
            ..RendererConfig::default()
        },
    )
    .expect("view");
    assert!(view.redraw().expect("redraw").is_empty());
    assert!(view.drawable().is_empty());
    assert!(!frame_to_svg(view.drawable(), 1.0).contains("<g"));
}

#[cfg(feature = "raster")]
#[test]
fn test_png_export() {
    let mut view = view(BackendType::Raster, false);
    let png = view.export_png().expect("png");
    assert_eq!(&png[1..4], b"PNG");

    let pixels = view.capture_pixels().expect("pixels");
    assert_eq!((pixels.width, pixels.height), (640, 480));
    // the room center is floor, not background
    let center = pixels.pixel(320, 240).expect("center");
    assert_ne!(center, [255, 255, 255, 255]);
}

// ==========================================================================
// Properties
// ==========================================================================

proptest! {
    #[test]
    fn prop_layer_transform_matches_projection(
        scale in 1.0f32..400.0f32,
        tx in -1000.0f32..1000.0f32,
        ty in -1000.0f32..1000.0f32,
        rotation in -10.0f32..10.0f32,
        x in -20.0f32..20.0f32,
        y in -20.0f32..20.0f32
    ) {
        let view = ViewportState {
            scale,
            translation: Vec2::new(tx, ty),
            rotation,
            initial_scale: scale,
        };
        let point = Vec2::new(x, y);
        let via_layer = Transform2D::from_view(&view).apply(point);
        let direct = view.to_screen(point);
        let tolerance = (x.abs() + y.abs()) * scale * 1e-5 + 1e-2;
        prop_assert!(via_layer.distance(direct) <= tolerance);
    }
}
