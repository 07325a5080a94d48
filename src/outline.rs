//! Outline post-process boundary.
//!
//! The outline effect is a two-stage image-space pipeline, fully decoupled
//! from movement: stage one renders a filtered object mask into an
//! intermediate texture, stage two composites that mask over the camera
//! color target through a blit material. This module defines the explicit
//! pass contract at that boundary. The mask pass *returns* its output
//! handle and the feature wires it directly into the composite pass as a
//! parameter; there is no keyed blackboard shared between passes.
//!
//! Stage two silently skips when the mask handle is invalid or no blit
//! material could be built (missing shader asset). That is a no-op, not an
//! error: the simulation and the rest of the frame stay live.

use bevy::prelude::*;

/// Opaque handle to a frame-graph texture. The zero handle is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureHandle(u32);

impl TextureHandle {
    /// The invalid handle.
    pub const INVALID: Self = Self(0);

    /// Whether this handle refers to an allocated texture.
    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

/// Where in the frame the outline passes are enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassEvent {
    /// After opaque geometry.
    AfterOpaques,
    /// After transparent geometry (the default for the outline).
    #[default]
    AfterTransparents,
}

/// One recorded step in the frame, kept for ordering inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedPass {
    /// Pass label.
    pub label: &'static str,
    /// Enqueue point.
    pub event: PassEvent,
}

/// Minimal frame-graph builder: allocates texture handles and records the
/// ordered list of passes that actually executed.
#[derive(Debug, Default)]
pub struct FrameGraph {
    next_texture: u32,
    recorded: Vec<RecordedPass>,
}

impl FrameGraph {
    /// Start an empty frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh intermediate texture.
    pub fn create_texture(&mut self, _label: &'static str) -> TextureHandle {
        self.next_texture += 1;
        TextureHandle(self.next_texture)
    }

    /// Record an executed pass.
    pub fn record(&mut self, label: &'static str, event: PassEvent) {
        self.recorded.push(RecordedPass { label, event });
    }

    /// Passes recorded so far, in execution order.
    pub fn recorded(&self) -> &[RecordedPass] {
        &self.recorded
    }
}

/// Per-frame resources the passes read and write.
#[derive(Debug, Clone, Copy)]
pub struct FrameResources {
    /// The camera's color target.
    pub camera_color: TextureHandle,
    /// The scene depth the mask pass depth-tests against.
    pub scene_depth: TextureHandle,
}

/// Static configuration for the outline feature.
#[derive(Debug, Clone, Copy)]
pub struct OutlineSettings {
    /// Enqueue point for both passes.
    pub pass_event: PassEvent,
    /// Object layer filter for the mask pass.
    pub layer_mask: u32,
    /// Render-layer filter for the mask pass.
    pub rendering_layer_mask: u32,
    /// Whether the mask pass clears depth before drawing.
    pub clear_depth: bool,
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            pass_event: PassEvent::AfterTransparents,
            layer_mask: u32::MAX,
            rendering_layer_mask: u32::MAX,
            clear_depth: false,
        }
    }
}

/// Externally configured outline appearance.
#[derive(Debug, Clone, Copy)]
pub struct OutlineStyle {
    /// Edge color, linear RGBA.
    pub outline_color: Vec4,
    /// Interior fill color, linear RGBA.
    pub fill_color: Vec4,
    /// Edge thickness in pixels.
    pub thickness: f32,
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self {
            outline_color: Vec4::ONE,
            fill_color: Vec4::ONE,
            thickness: 1.0,
        }
    }
}

/// The blit material for stage two, built from a shader asset and the
/// configured style. Construction fails quietly when the shader is
/// missing; stage two then never runs.
#[derive(Debug, Clone, Copy)]
pub struct BlitMaterial {
    /// Appearance parameters bound to the material.
    pub style: OutlineStyle,
}

impl BlitMaterial {
    /// Build the material, or `None` when no shader asset is configured.
    pub fn from_shader(shader: Option<TextureHandle>, style: OutlineStyle) -> Option<Self> {
        let shader = shader?;
        shader.is_valid().then_some(Self { style })
    }
}

/// A pass that can be recorded into the frame.
pub trait RecordPass {
    /// Record this pass's work for the current frame.
    fn record(&mut self, graph: &mut FrameGraph, resources: &mut FrameResources);
}

/// Stage one: renders the filtered object mask into an intermediate
/// RGBA8 texture, cleared to transparent black and depth-tested against
/// the existing scene depth.
#[derive(Debug)]
pub struct OutlineMaskPass {
    settings: OutlineSettings,
    output: TextureHandle,
}

impl OutlineMaskPass {
    /// Create the mask pass.
    pub fn new(settings: OutlineSettings) -> Self {
        Self {
            settings,
            output: TextureHandle::INVALID,
        }
    }

    /// The mask texture produced by the most recent frame.
    pub fn output(&self) -> TextureHandle {
        self.output
    }
}

impl RecordPass for OutlineMaskPass {
    fn record(&mut self, graph: &mut FrameGraph, resources: &mut FrameResources) {
        // The mask always renders, even when stage two will skip:
        // wasted but harmless work, never an error.
        self.output = graph.create_texture("outline_objects");
        let _ = resources.scene_depth;
        graph.record("outline_mask", self.settings.pass_event);
    }
}

/// Stage two: composites the mask over the camera color target through
/// the blit material.
#[derive(Debug)]
pub struct OutlineCompositePass {
    settings: OutlineSettings,
    material: Option<BlitMaterial>,
    input: TextureHandle,
}

impl OutlineCompositePass {
    /// Create the composite pass. `material` may be `None` when the blit
    /// shader asset is missing; the pass then no-ops every frame.
    pub fn new(settings: OutlineSettings, material: Option<BlitMaterial>) -> Self {
        Self {
            settings,
            material,
            input: TextureHandle::INVALID,
        }
    }

    /// Wire the mask texture produced by stage one into this pass.
    pub fn set_input(&mut self, input: TextureHandle) {
        self.input = input;
    }
}

impl RecordPass for OutlineCompositePass {
    fn record(&mut self, graph: &mut FrameGraph, resources: &mut FrameResources) {
        // Silent skip, not an error: missing mask or missing material
        // simply leaves the camera color untouched.
        if !self.input.is_valid() {
            return;
        }
        if self.material.is_none() {
            return;
        }
        let _ = resources.camera_color;
        graph.record("outline_composite", self.settings.pass_event);
    }
}

/// The outline feature: owns both passes and wires stage one's output
/// into stage two's input each frame.
#[derive(Debug)]
pub struct OutlineFeature {
    mask: OutlineMaskPass,
    composite: OutlineCompositePass,
}

impl OutlineFeature {
    /// Build the feature from settings, style, and an optional blit
    /// shader asset.
    pub fn new(settings: OutlineSettings, style: OutlineStyle, shader: Option<TextureHandle>) -> Self {
        let material = BlitMaterial::from_shader(shader, style);
        Self {
            mask: OutlineMaskPass::new(settings),
            composite: OutlineCompositePass::new(settings, material),
        }
    }

    /// Record both passes for the current frame, in order.
    pub fn record_passes(&mut self, graph: &mut FrameGraph, resources: &mut FrameResources) {
        self.mask.record(graph, resources);
        self.composite.set_input(self.mask.output());
        self.composite.record(graph, resources);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> (FrameGraph, FrameResources) {
        let mut graph = FrameGraph::new();
        let camera_color = graph.create_texture("camera_color");
        let scene_depth = graph.create_texture("scene_depth");
        (
            graph,
            FrameResources {
                camera_color,
                scene_depth,
            },
        )
    }

    fn shader() -> Option<TextureHandle> {
        // Any valid handle stands in for a loaded shader asset.
        Some(TextureHandle(99))
    }

    #[test]
    fn invalid_handle_is_default() {
        assert!(!TextureHandle::default().is_valid());
        assert!(!TextureHandle::INVALID.is_valid());
    }

    #[test]
    fn both_passes_record_when_configured() {
        let (mut graph, mut resources) = frame();
        let mut feature =
            OutlineFeature::new(OutlineSettings::default(), OutlineStyle::default(), shader());

        feature.record_passes(&mut graph, &mut resources);

        let labels: Vec<_> = graph.recorded().iter().map(|p| p.label).collect();
        assert_eq!(labels, vec!["outline_mask", "outline_composite"]);
    }

    #[test]
    fn composite_skips_without_material() {
        let (mut graph, mut resources) = frame();
        let mut feature =
            OutlineFeature::new(OutlineSettings::default(), OutlineStyle::default(), None);

        feature.record_passes(&mut graph, &mut resources);

        // The mask still renders; only the composite is skipped.
        let labels: Vec<_> = graph.recorded().iter().map(|p| p.label).collect();
        assert_eq!(labels, vec!["outline_mask"]);
    }

    #[test]
    fn composite_skips_on_invalid_input() {
        let (mut graph, mut resources) = frame();
        let material = BlitMaterial::from_shader(shader(), OutlineStyle::default());
        let mut composite = OutlineCompositePass::new(OutlineSettings::default(), material);

        composite.set_input(TextureHandle::INVALID);
        composite.record(&mut graph, &mut resources);

        assert!(graph.recorded().is_empty());
    }

    #[test]
    fn material_requires_shader() {
        assert!(BlitMaterial::from_shader(None, OutlineStyle::default()).is_none());
        assert!(
            BlitMaterial::from_shader(Some(TextureHandle::INVALID), OutlineStyle::default())
                .is_none()
        );
        assert!(BlitMaterial::from_shader(shader(), OutlineStyle::default()).is_some());
    }

    #[test]
    fn passes_tag_their_enqueue_point() {
        let (mut graph, mut resources) = frame();
        let settings = OutlineSettings {
            pass_event: PassEvent::AfterTransparents,
            ..Default::default()
        };
        let mut feature = OutlineFeature::new(settings, OutlineStyle::default(), shader());

        feature.record_passes(&mut graph, &mut resources);

        assert!(graph
            .recorded()
            .iter()
            .all(|p| p.event == PassEvent::AfterTransparents));
    }
}
