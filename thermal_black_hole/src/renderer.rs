//! GPU rendering of recorded draw lists
//!
//! Circles and lines are tessellated on the CPU into a single vertex
//! buffer. Consecutive commands of the same primitive type share a batch,
//! so the frame is drawn in exactly the order it was recorded.

use std::f32::consts::TAU;
use std::ops::Range;

use common::{create_vertex_buffer, CameraUniform, GraphicsContext, ScreenCamera, Vertex};
use glam::Vec2;

use crate::attractor::Color;
use crate::canvas::{DrawCommand, DrawList};

/// Segments used to approximate a circle
pub const CIRCLE_SEGMENTS: usize = 64;

const INITIAL_VERTEX_CAPACITY: usize = 16 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Triangles,
    Lines,
}

impl BatchKind {
    /// Vertices per primitive
    pub fn stride(self) -> u32 {
        match self {
            BatchKind::Triangles => 3,
            BatchKind::Lines => 2,
        }
    }
}

/// A run of vertices drawn with one pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub kind: BatchKind,
    pub vertices: Range<u32>,
}

/// CPU-side geometry for one frame
#[derive(Debug, Default)]
pub struct Tessellation {
    pub vertices: Vec<Vertex>,
    pub batches: Vec<Batch>,
}

impl Tessellation {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.batches.clear();
    }

    /// Convert a recorded frame into triangle and line batches
    pub fn build(&mut self, commands: &[DrawCommand], srgb_surface: bool) {
        self.clear();

        for command in commands {
            let start = self.vertices.len() as u32;
            let kind = match *command {
                DrawCommand::FillCircle {
                    color,
                    center,
                    radius,
                } => {
                    let rgba = color.to_rgba(srgb_surface);
                    let rim = circle_points(center, radius);
                    for i in 0..CIRCLE_SEGMENTS {
                        self.push(center, rgba);
                        self.push(rim[i], rgba);
                        self.push(rim[i + 1], rgba);
                    }
                    BatchKind::Triangles
                }
                DrawCommand::StrokeCircle {
                    color,
                    center,
                    radius,
                } => {
                    let rgba = color.to_rgba(srgb_surface);
                    let rim = circle_points(center, radius);
                    for pair in rim.windows(2) {
                        self.push(pair[0], rgba);
                        self.push(pair[1], rgba);
                    }
                    BatchKind::Lines
                }
                DrawCommand::Line { color, from, to } => {
                    let rgba = color.to_rgba(srgb_surface);
                    self.push(from, rgba);
                    self.push(to, rgba);
                    BatchKind::Lines
                }
            };
            let end = self.vertices.len() as u32;

            match self.batches.last_mut() {
                Some(batch) if batch.kind == kind => batch.vertices.end = end,
                _ => self.batches.push(Batch {
                    kind,
                    vertices: start..end,
                }),
            }
        }
    }

    /// Drop everything past `max_vertices`, keeping whole primitives only.
    /// Returns the number of vertices removed.
    pub fn truncate(&mut self, max_vertices: usize) -> usize {
        let total = self.vertices.len();
        if total <= max_vertices {
            return 0;
        }

        let limit = max_vertices.min(u32::MAX as usize) as u32;
        self.batches.retain_mut(|batch| {
            if batch.vertices.start >= limit {
                return false;
            }
            let len = batch.vertices.end.min(limit) - batch.vertices.start;
            batch.vertices.end = batch.vertices.start + len - len % batch.kind.stride();
            !batch.vertices.is_empty()
        });

        let kept = self.batches.last().map_or(0, |batch| batch.vertices.end as usize);
        self.vertices.truncate(kept);
        total - kept
    }

    fn push(&mut self, position: Vec2, color: [f32; 4]) {
        self.vertices
            .push(Vertex::new([position.x, position.y, 0.0], color));
    }
}

/// `CIRCLE_SEGMENTS + 1` points around a circle, first point repeated at the end
fn circle_points(center: Vec2, radius: f32) -> Vec<Vec2> {
    (0..=CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = (i % CIRCLE_SEGMENTS) as f32 / CIRCLE_SEGMENTS as f32 * TAU;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Renderer for the simulation's draw lists
pub struct Renderer2D {
    triangle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    max_vertices: usize,
    truncating: bool,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    srgb_surface: bool,
    frame: Tessellation,
}

impl Renderer2D {
    pub fn new(ctx: &GraphicsContext) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Canvas Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/canvas.wgsl").into()),
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let create_pipeline = |label: &str, topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: "vs_main",
                    buffers: &[Vertex::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
        };

        let triangle_pipeline =
            create_pipeline("Triangle Pipeline", wgpu::PrimitiveTopology::TriangleList);
        let line_pipeline = create_pipeline("Line Pipeline", wgpu::PrimitiveTopology::LineList);

        let max_vertices =
            (device.limits().max_buffer_size / std::mem::size_of::<Vertex>() as u64) as usize;
        let vertex_capacity = INITIAL_VERTEX_CAPACITY.min(max_vertices);
        let vertex_buffer = create_vertex_buffer(device, vertex_capacity);

        Self {
            triangle_pipeline,
            line_pipeline,
            vertex_buffer,
            vertex_capacity,
            max_vertices,
            truncating: false,
            camera_buffer,
            camera_bind_group,
            srgb_surface: ctx.config.format.is_srgb(),
            frame: Tessellation::default(),
        }
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &ScreenCamera) {
        let uniform = CameraUniform::from_screen_camera(camera);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Tessellate a recorded frame and upload it, growing the buffer as needed.
    /// Geometry beyond the device's maximum buffer size is not drawn.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, draw_list: &DrawList) {
        self.frame.build(draw_list.commands(), self.srgb_surface);

        let dropped = self.frame.truncate(self.max_vertices);
        if dropped > 0 && !self.truncating {
            log::warn!(
                "Frame exceeds the {} vertex buffer limit, skipping {} vertices",
                self.max_vertices,
                dropped
            );
        }
        self.truncating = dropped > 0;

        let needed = self.frame.vertices.len();
        if needed > self.vertex_capacity {
            let capacity = needed.next_power_of_two().min(self.max_vertices);
            log::debug!(
                "Growing vertex buffer from {} to {} vertices",
                self.vertex_capacity,
                capacity
            );
            self.vertex_buffer = create_vertex_buffer(device, capacity);
            self.vertex_capacity = capacity;
        }

        if !self.frame.vertices.is_empty() {
            queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&self.frame.vertices),
            );
        }
    }

    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let [r, g, b, a] = Color::BLACK.to_rgba(self.srgb_surface);
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));

        for batch in &self.frame.batches {
            let pipeline = match batch.kind {
                BatchKind::Triangles => &self.triangle_pipeline,
                BatchKind::Lines => &self.line_pipeline,
            };
            render_pass.set_pipeline(pipeline);
            render_pass.draw(batch.vertices.clone(), 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;

    #[test]
    fn batches_follow_command_order() {
        let mut list = DrawList::new();
        list.fill_circle(Color::BLACK, Vec2::new(50.0, 50.0), 10.0);
        list.stroke_circle(Color::PHOTON_RING, Vec2::new(50.0, 50.0), 20.0);
        list.line(Color::WHITE, Vec2::ZERO, Vec2::ONE);
        list.fill_circle(Color::NAVY, Vec2::ZERO, 1.0);

        let mut tess = Tessellation::default();
        tess.build(list.commands(), false);

        let fill = (CIRCLE_SEGMENTS * 3) as u32;
        let ring = (CIRCLE_SEGMENTS * 2) as u32;
        assert_eq!(
            tess.batches,
            vec![
                Batch {
                    kind: BatchKind::Triangles,
                    vertices: 0..fill,
                },
                Batch {
                    kind: BatchKind::Lines,
                    vertices: fill..fill + ring + 2,
                },
                Batch {
                    kind: BatchKind::Triangles,
                    vertices: fill + ring + 2..2 * fill + ring + 2,
                },
            ]
        );
        assert_eq!(tess.vertices.len() as u32, 2 * fill + ring + 2);
    }

    #[test]
    fn line_vertices_share_the_segment_color() {
        let mut list = DrawList::new();
        list.line(Color::HOT_RED, Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));

        let mut tess = Tessellation::default();
        tess.build(list.commands(), false);

        assert_eq!(
            tess.vertices,
            vec![
                Vertex::new([1.0, 2.0, 0.0], [1.0, 0.0, 0.0, 1.0]),
                Vertex::new([3.0, 4.0, 0.0], [1.0, 0.0, 0.0, 1.0]),
            ]
        );
    }

    #[test]
    fn ring_points_lie_on_the_circle_and_close() {
        let center = Vec2::new(10.0, -5.0);
        let points = circle_points(center, 7.0);
        assert_eq!(points.len(), CIRCLE_SEGMENTS + 1);
        assert_eq!(points.first(), points.last());
        for p in points {
            assert!(((p - center).length() - 7.0).abs() < 1e-4);
        }
    }

    #[test]
    fn truncate_keeps_whole_primitives_within_the_limit() {
        let mut list = DrawList::new();
        list.fill_circle(Color::BLACK, Vec2::ZERO, 10.0);
        list.line(Color::WHITE, Vec2::ZERO, Vec2::ONE);
        list.line(Color::WHITE, Vec2::ONE, Vec2::ZERO);
        list.fill_circle(Color::NAVY, Vec2::ZERO, 1.0);

        let fill = (CIRCLE_SEGMENTS * 3) as u32;
        let mut tess = Tessellation::default();
        tess.build(list.commands(), false);
        let total = tess.vertices.len();

        assert_eq!(tess.truncate(total), 0);
        assert_eq!(tess.batches.len(), 3);

        // Cuts the second line in half, so only the first line survives
        let limit = fill as usize + 3;
        assert_eq!(tess.truncate(limit), total - limit + 1);
        assert_eq!(
            tess.batches,
            vec![
                Batch {
                    kind: BatchKind::Triangles,
                    vertices: 0..fill,
                },
                Batch {
                    kind: BatchKind::Lines,
                    vertices: fill..fill + 2,
                },
            ]
        );
        assert_eq!(tess.vertices.len() as u32, fill + 2);

        // Partial triangles are dropped as well
        assert_eq!(tess.truncate(4), fill as usize + 2 - 3);
        assert_eq!(
            tess.batches,
            vec![Batch {
                kind: BatchKind::Triangles,
                vertices: 0..3,
            }]
        );

        assert_eq!(tess.truncate(2), 3);
        assert!(tess.batches.is_empty());
        assert!(tess.vertices.is_empty());
    }

    #[test]
    fn empty_frame_has_no_batches() {
        let mut tess = Tessellation::default();
        tess.build(&[], true);
        assert!(tess.vertices.is_empty());
        assert!(tess.batches.is_empty());
    }
}
