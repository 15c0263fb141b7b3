//! Draw-layer compositor.
//!
//! Turns a [`ViewerState`] into five ordered layers. Geometry layers are
//! built in plan coordinates and carry the live view transform, so panning
//! and rotating only swap the transform. Their primitives are rebuilt when
//! stroke widths change, i.e. on a zoom-ratio or fit-scale change. The
//! labels layer lives in screen space and is rebuilt whenever the viewport
//! revision or the display settings move.

use floorplan_core::{
    door_arc, opening_shape, wall_stroke_width, DisplaySettings, MeasurementLabel, RoomScene,
    StrokeConfig, Surface, ViewerState, ViewportState,
};
use serde::{Deserialize, Serialize};

use crate::primitive::{Color, LineCap, Primitive, Transform2D};
use crate::Palette;

/// The five layers, in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Room floor fill.
    Floor,
    /// Wall strokes.
    Walls,
    /// Door gaps, frames and swing arcs.
    Doors,
    /// Window gaps and frames.
    Windows,
    /// Measurement labels in screen space.
    Labels,
}

impl LayerKind {
    /// All layers in paint order.
    pub const ALL: [Self; 5] = [
        Self::Floor,
        Self::Walls,
        Self::Doors,
        Self::Windows,
        Self::Labels,
    ];

    /// Stable name, used as the SVG group id.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Walls => "walls",
            Self::Doors => "doors",
            Self::Windows => "windows",
            Self::Labels => "labels",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Floor => 0,
            Self::Walls => 1,
            Self::Doors => 2,
            Self::Windows => 3,
            Self::Labels => 4,
        }
    }
}

/// One layer of primitives with its coordinate transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Which layer this is.
    pub kind: LayerKind,
    /// Layer-to-screen transform.
    pub transform: Transform2D,
    /// Primitives in paint order.
    pub primitives: Vec<Primitive>,
}

impl Layer {
    fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            transform: Transform2D::IDENTITY,
            primitives: Vec::new(),
        }
    }

    /// Whether the layer draws nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

/// A complete composited frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayeredFrame {
    /// Frame width in pixels.
    pub width: f32,
    /// Frame height in pixels.
    pub height: f32,
    /// Clear color.
    pub background: Color,
    /// Layers in paint order.
    pub layers: Vec<Layer>,
}

impl LayeredFrame {
    /// A frame with all five layers empty.
    #[must_use]
    pub fn empty(width: f32, height: f32, background: Color) -> Self {
        Self {
            width,
            height,
            background,
            layers: LayerKind::ALL.into_iter().map(Layer::new).collect(),
        }
    }

    /// Look up a layer.
    #[must_use]
    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.kind == kind)
    }

    /// Total primitive count across layers.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.primitives.len()).sum()
    }

    /// Whether no layer draws anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Layer::is_empty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct StrokeKey {
    zoom_ratio: f32,
    initial_scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LabelKey {
    revision: u64,
    settings: DisplaySettings,
}

/// Stroke widths for one zoom level, in plan units.
#[derive(Debug, Clone, Copy)]
struct StrokeSet {
    wall: f32,
    frame: f32,
}

impl StrokeSet {
    fn new(config: &StrokeConfig, view: &ViewportState) -> Self {
        let fit_pixels = wall_stroke_width(config, view.zoom_ratio());
        let wall = fit_pixels / view.initial_scale;
        Self {
            wall,
            frame: wall * config.frame_width_fraction,
        }
    }
}

/// Builds and caches [`LayeredFrame`]s.
#[derive(Debug, Clone)]
pub struct Compositor {
    palette: Palette,
    frame: LayeredFrame,
    floor_built: bool,
    stroke_key: Option<StrokeKey>,
    label_key: Option<LabelKey>,
}

impl Compositor {
    /// Create a compositor painting with `palette`.
    #[must_use]
    pub fn new(palette: Palette) -> Self {
        Self {
            frame: LayeredFrame::empty(0.0, 0.0, palette.background),
            palette,
            floor_built: false,
            stroke_key: None,
            label_key: None,
        }
    }

    /// The last composited frame.
    #[must_use]
    pub fn frame(&self) -> &LayeredFrame {
        &self.frame
    }

    /// Colors in use.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Drop all cached layers so the next compose rebuilds everything.
    pub fn invalidate(&mut self) {
        self.floor_built = false;
        self.stroke_key = None;
        self.label_key = None;
    }

    /// Bring the frame up to date with `viewer`.
    ///
    /// Returns the frame and the layers whose primitives were rebuilt. A
    /// viewport without area yields an empty frame.
    pub fn compose(&mut self, viewer: &mut ViewerState) -> (&LayeredFrame, Vec<LayerKind>) {
        let size = viewer.controller().viewport_size();
        self.frame.width = size.x;
        self.frame.height = size.y;
        self.frame.background = self.palette.background;

        if !viewer.controller().has_area() {
            tracing::trace!("Viewport has no area, emitting empty frame");
            self.frame = LayeredFrame::empty(size.x, size.y, self.palette.background);
            self.invalidate();
            return (&self.frame, Vec::new());
        }

        let view = viewer.controller().presented();
        let plan_transform = Transform2D::from_view(&view);
        let mut regenerated = Vec::new();

        if !self.floor_built {
            let floor = floor_primitives(viewer.scene(), &self.palette);
            self.rebuild(LayerKind::Floor, floor);
            self.floor_built = true;
            regenerated.push(LayerKind::Floor);
        }

        let stroke_key = StrokeKey {
            zoom_ratio: view.zoom_ratio(),
            initial_scale: view.initial_scale,
        };
        if self.stroke_key != Some(stroke_key) {
            let strokes = StrokeSet::new(&viewer.config().strokes, &view);
            let scene = viewer.scene();
            let config = &viewer.config().strokes;
            let walls = wall_primitives(scene, strokes, &self.palette);
            let doors = door_primitives(scene, config, strokes, &self.palette);
            let windows = window_primitives(scene, config, strokes, &self.palette);
            self.rebuild(LayerKind::Walls, walls);
            self.rebuild(LayerKind::Doors, doors);
            self.rebuild(LayerKind::Windows, windows);
            self.stroke_key = Some(stroke_key);
            regenerated.extend([LayerKind::Walls, LayerKind::Doors, LayerKind::Windows]);
        }

        for kind in [
            LayerKind::Floor,
            LayerKind::Walls,
            LayerKind::Doors,
            LayerKind::Windows,
        ] {
            self.frame.layers[kind.index()].transform = plan_transform;
        }

        let label_key = LabelKey {
            revision: viewer.controller().revision(),
            settings: viewer.settings(),
        };
        if self.label_key != Some(label_key) {
            let halo = viewer.config().labels.halo_offset;
            let labels = label_primitives(viewer.labels(), halo, &self.palette);
            self.rebuild(LayerKind::Labels, labels);
            self.label_key = Some(label_key);
            regenerated.push(LayerKind::Labels);
        }

        (&self.frame, regenerated)
    }

    fn rebuild(&mut self, kind: LayerKind, primitives: Vec<Primitive>) {
        tracing::trace!("Rebuilt {} layer: {} primitives", kind.as_str(), primitives.len());
        self.frame.layers[kind.index()].primitives = primitives;
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

fn floor_primitives(scene: &RoomScene, palette: &Palette) -> Vec<Primitive> {
    vec![Primitive::Polygon {
        points: scene.bounds().corners().to_vec(),
        fill: palette.floor,
    }]
}

fn wall_primitives(scene: &RoomScene, strokes: StrokeSet, palette: &Palette) -> Vec<Primitive> {
    scene
        .walls()
        .map(|wall| {
            let (from, to) = wall.plan_endpoints();
            Primitive::Line {
                from,
                to,
                width: strokes.wall,
                color: palette.wall,
                cap: LineCap::Round,
            }
        })
        .collect()
}

/// Erase stroke then the two frame lines, common to doors and windows.
fn opening_primitives(
    surface: &Surface,
    config: &StrokeConfig,
    strokes: StrokeSet,
    palette: &Palette,
    out: &mut Vec<Primitive>,
) {
    let shape = opening_shape(surface, config, strokes.wall * 0.5);
    out.push(Primitive::Line {
        from: shape.gap.start,
        to: shape.gap.end,
        width: strokes.wall,
        color: palette.floor,
        cap: LineCap::Butt,
    });
    for frame in shape.frames {
        out.push(Primitive::Line {
            from: frame.start,
            to: frame.end,
            width: strokes.frame,
            color: palette.frame,
            cap: LineCap::Butt,
        });
    }
}

fn door_primitives(
    scene: &RoomScene,
    config: &StrokeConfig,
    strokes: StrokeSet,
    palette: &Palette,
) -> Vec<Primitive> {
    let mut out = Vec::new();
    for door in scene.doors() {
        opening_primitives(door, config, strokes, palette, &mut out);
        let arc = door_arc(door, config);
        out.push(Primitive::Arc {
            center: arc.center,
            radius: arc.radius,
            start_angle: arc.start_angle,
            sweep: arc.sweep,
            width: strokes.frame,
            color: palette.door,
        });
    }
    out
}

fn window_primitives(
    scene: &RoomScene,
    config: &StrokeConfig,
    strokes: StrokeSet,
    palette: &Palette,
) -> Vec<Primitive> {
    let mut out = Vec::new();
    for window in scene.windows() {
        opening_primitives(window, config, strokes, palette, &mut out);
        let (from, to) = window.plan_endpoints();
        out.push(Primitive::Line {
            from,
            to,
            width: strokes.frame,
            color: palette.window,
            cap: LineCap::Butt,
        });
    }
    out
}

fn label_primitives(labels: &[MeasurementLabel], halo: f32, palette: &Palette) -> Vec<Primitive> {
    let mut out = Vec::with_capacity(labels.len() * 5);
    for label in labels {
        let rotation = label.orientation.text_rotation();
        let text = |position, color| Primitive::Text {
            position,
            text: label.text.clone(),
            font_size: label.font_size,
            rotation,
            color,
        };
        for position in label.halo_positions(halo) {
            out.push(text(position, palette.background));
        }
        out.push(text(label.anchor, palette.label));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorplan_core::{
        Gesture, GesturePhase, InputEvent, SurfaceKind, Vec2, Vec3, ViewCommand, ViewerConfig,
    };

    fn viewer(width: f32, height: f32) -> ViewerState {
        use std::f32::consts::FRAC_PI_2;
        let surfaces = vec![
            Surface::wall(0.0, -2.0, 4.0, 0.0).expect("wall"),
            Surface::wall(2.0, 0.0, 4.0, FRAC_PI_2).expect("wall"),
            Surface::wall(0.0, 2.0, 4.0, 0.0).expect("wall"),
            Surface::wall(-2.0, 0.0, 4.0, FRAC_PI_2).expect("wall"),
            Surface::new(
                SurfaceKind::Door,
                Vec3::new(1.0, 1.0, 2.0),
                Vec3::new(0.9, 2.0, 0.2),
                0.0,
            )
            .expect("door"),
            Surface::new(
                SurfaceKind::Window,
                Vec3::new(-1.0, 1.5, -2.0),
                Vec3::new(1.2, 1.0, 0.2),
                0.0,
            )
            .expect("window"),
        ];
        let mut config = ViewerConfig::default();
        config.viewport.animate = false;
        ViewerState::new(RoomScene::new(surfaces), width, height, config)
    }

    #[test]
    fn test_first_compose_builds_every_layer() {
        let mut viewer = viewer(800.0, 600.0);
        let mut compositor = Compositor::default();
        let (frame, regenerated) = compositor.compose(&mut viewer);

        assert_eq!(regenerated, LayerKind::ALL.to_vec());
        assert_eq!(frame.layers.len(), 5);
        let walls = frame.layer(LayerKind::Walls).expect("walls");
        assert_eq!(walls.primitives.len(), 4);
        // erase + 2 frames + arc
        assert_eq!(frame.layer(LayerKind::Doors).expect("doors").primitives.len(), 4);
        // erase + 2 frames + glazing
        assert_eq!(frame.layer(LayerKind::Windows).expect("windows").primitives.len(), 4);
        // 4 walls + 1 door, each text with 4 halos
        assert_eq!(frame.layer(LayerKind::Labels).expect("labels").primitives.len(), 25);
    }

    #[test]
    fn test_pan_only_updates_transform() {
        let mut viewer = viewer(800.0, 600.0);
        let mut compositor = Compositor::default();
        compositor.compose(&mut viewer);
        let before = compositor.frame().layer(LayerKind::Walls).expect("walls").clone();

        viewer.process_event(&InputEvent::gesture(
            GesturePhase::Changed,
            Gesture::Pan {
                delta: Vec2::new(25.0, 10.0),
            },
        ));
        let (frame, regenerated) = compositor.compose(&mut viewer);
        assert_eq!(regenerated, vec![LayerKind::Labels]);

        let after = frame.layer(LayerKind::Walls).expect("walls");
        assert_eq!(after.primitives, before.primitives);
        assert!((after.transform.e - before.transform.e - 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_rebuilds_geometry() {
        let mut viewer = viewer(800.0, 600.0);
        let mut compositor = Compositor::default();
        compositor.compose(&mut viewer);

        viewer.execute(ViewCommand::ZoomIn);
        let (_, regenerated) = compositor.compose(&mut viewer);
        assert_eq!(
            regenerated,
            vec![
                LayerKind::Walls,
                LayerKind::Doors,
                LayerKind::Windows,
                LayerKind::Labels
            ]
        );
    }

    #[test]
    fn test_settings_toggle_rebuilds_labels_only() {
        let mut viewer = viewer(800.0, 600.0);
        let mut compositor = Compositor::default();
        compositor.compose(&mut viewer);

        viewer.execute(ViewCommand::ToggleMeasurements);
        let (frame, regenerated) = compositor.compose(&mut viewer);
        assert_eq!(regenerated, vec![LayerKind::Labels]);
        assert!(frame.layer(LayerKind::Labels).expect("labels").is_empty());

        let (_, regenerated) = compositor.compose(&mut viewer);
        assert!(regenerated.is_empty());
    }

    #[test]
    fn test_wall_width_is_constant_on_screen() {
        let mut viewer = viewer(800.0, 600.0);
        let mut compositor = Compositor::default();

        let on_screen = |compositor: &Compositor| {
            let layer = compositor.frame().layer(LayerKind::Walls).expect("walls");
            match &layer.primitives[0] {
                Primitive::Line { width, .. } => width * layer.transform.scale_factor(),
                other => panic!("unexpected {}", other.name()),
            }
        };

        compositor.compose(&mut viewer);
        let fit = on_screen(&compositor);
        assert!((fit - 8.0).abs() < 1e-3);

        viewer.execute(ViewCommand::ZoomIn);
        compositor.compose(&mut viewer);
        assert!((on_screen(&compositor) - 8.0).abs() < 1e-3);

        viewer.execute(ViewCommand::ZoomOut);
        viewer.execute(ViewCommand::ZoomOut);
        compositor.compose(&mut viewer);
        assert!((on_screen(&compositor) - 8.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_viewport_emits_empty_frame() {
        let mut viewer = viewer(0.0, 0.0);
        let mut compositor = Compositor::default();
        let (frame, regenerated) = compositor.compose(&mut viewer);
        assert!(frame.is_empty());
        assert!(regenerated.is_empty());

        viewer.process_event(&InputEvent::Resize {
            width: 400.0,
            height: 300.0,
        });
        let (frame, regenerated) = compositor.compose(&mut viewer);
        assert!(!frame.is_empty());
        assert_eq!(regenerated.len(), 5);
    }

    #[test]
    fn test_vertical_labels_are_rotated() {
        let mut viewer = viewer(800.0, 600.0);
        let mut compositor = Compositor::default();
        let (frame, _) = compositor.compose(&mut viewer);
        let labels = frame.layer(LayerKind::Labels).expect("labels");
        let rotations: Vec<f32> = labels
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Text { rotation, .. } => Some(*rotation),
                _ => None,
            })
            .collect();
        assert!(rotations.iter().any(|r| r.abs() < f32::EPSILON));
        assert!(rotations
            .iter()
            .any(|r| (r + std::f32::consts::FRAC_PI_2).abs() < 1e-6));
    }
}
