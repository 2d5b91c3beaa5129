//! Debug Draw
//!
//! Collects wireframe lines emitted by the solver's debug renderer and hands
//! them to a [`LineRenderer`] in one batch:
//! - Lines accumulate between flushes
//! - A flush issues a single draw with the camera's view-projection
//! - The buffer is empty after every flush, whether or not anything was drawn

use glam::{Mat4, Vec3};
use rapier3d::pipeline::{DebugColor, DebugRenderBackend, DebugRenderObject};
use rapier3d::prelude::{Point, Real};

use crate::convert;

/// A colored line segment in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub from: Vec3,
    pub to: Vec3,
    /// Linear RGB
    pub color: Vec3,
}

/// GPU-ready vertex: position followed by color
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// View and projection of the camera the overlay is drawn with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

impl CameraMatrices {
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        Self { view, projection }
    }

    /// Right-handed perspective camera looking from `eye` towards `target`
    pub fn look_at(eye: Vec3, target: Vec3, fov_y_degrees: f32, aspect: f32) -> Self {
        Self {
            view: Mat4::look_at_rh(eye, target, Vec3::Y),
            projection: Mat4::perspective_rh_gl(fov_y_degrees.to_radians(), aspect, 0.1, 1000.0),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

impl Default for CameraMatrices {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

/// Draws batches of line-list vertices
pub trait LineRenderer {
    /// Draw `vertices` as a line list (pairs of endpoints)
    fn draw_lines(&mut self, vertices: &[DebugVertex], view_projection: Mat4);
}

/// Accumulates debug lines until the next flush
#[derive(Debug)]
pub struct DebugDrawCollector {
    lines: Vec<DebugLine>,
    enabled: bool,
}

impl DebugDrawCollector {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            enabled: true,
        }
    }

    /// Append one line
    pub fn push_line(&mut self, from: Vec3, to: Vec3, color: Vec3) {
        if self.enabled {
            self.lines.push(DebugLine { from, to, color });
        }
    }

    /// Draw every collected line with one renderer call, then clear
    ///
    /// Returns the number of lines drawn.
    pub fn flush(&mut self, camera: &CameraMatrices, renderer: &mut dyn LineRenderer) -> usize {
        let count = self.lines.len();
        if count > 0 {
            let vertices: Vec<DebugVertex> = self
                .lines
                .iter()
                .flat_map(|line| {
                    let color = line.color.to_array();
                    [
                        DebugVertex {
                            position: line.from.to_array(),
                            color,
                        },
                        DebugVertex {
                            position: line.to.to_array(),
                            color,
                        },
                    ]
                })
                .collect();
            renderer.draw_lines(&vertices, camera.view_projection());
        }
        self.lines.clear();
        count
    }

    pub fn lines(&self) -> &[DebugLine] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Stop or resume collecting; disabling drops pending lines
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.lines.clear();
        }
    }
}

impl Default for DebugDrawCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugRenderBackend for DebugDrawCollector {
    fn draw_line(
        &mut self,
        _object: DebugRenderObject<'_>,
        a: Point<Real>,
        b: Point<Real>,
        color: DebugColor,
    ) {
        let rgb = hsl_to_rgb(color[0], color[1], color[2]);
        self.push_line(convert::from_point(&a), convert::from_point(&b), rgb);
    }
}

/// Convert hue (degrees), saturation and lightness to linear RGB
fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());

    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let m = lightness - chroma * 0.5;
    Vec3::new(r + m, g + m, b + m)
}
