//! Black Hole with Thermal Color Effects
//!
//! Particles dropped near a black hole orbit under a damped inverse-square
//! pull. Their trails are tinted by distance: white far away, red as they
//! approach the photon sphere, deep blue to navy near the core, where they
//! are absorbed.
//!
//! Controls:
//! - Click: Spawn a particle on a near-circular orbit
//! - R: Remove all particles
//! - H: Toggle equations sidebar and status bar
//! - Escape: Quit

use clap::Parser;
use common::{GraphicsContext, ScreenCamera};
use glam::Vec2;
use thermal_black_hole::{
    clock::FrameClock,
    config::SimConfig,
    equations_ui::{
        draw_equations_sidebar, draw_status_bar, HudStatus, THERMAL_ORBIT_EQUATIONS,
        THERMAL_ORBIT_VARIABLES,
    },
    renderer::Renderer2D,
    DrawList, FrameStats, InputEvent, Simulation,
};
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

const TITLE: &str = "Blackhole with Thermal Color Effects";

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

struct App {
    ctx: GraphicsContext,
    renderer: Renderer2D,
    camera: ScreenCamera,
    simulation: Simulation,
    clock: FrameClock,
    draw_list: DrawList,
    pending: Vec<InputEvent>,
    cursor: Vec2,
    hud: HudStatus,
    show_hud: bool,
    egui: EguiState,
}

impl App {
    fn new(ctx: GraphicsContext, config: &SimConfig) -> Self {
        let renderer = Renderer2D::new(&ctx);
        let camera = ScreenCamera::new(ctx.size.width, ctx.size.height);
        let simulation = Simulation::new(config.attractor(), config.time_scale);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        Self {
            ctx,
            renderer,
            camera,
            simulation,
            clock: FrameClock::new(config.target_fps),
            draw_list: DrawList::new(),
            pending: Vec::new(),
            cursor: Vec2::ZERO,
            hud: HudStatus {
                time_scale: config.time_scale,
                ..HudStatus::default()
            },
            show_hud: !config.no_hud,
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.camera.resize(self.ctx.size.width, self.ctx.size.height);
    }

    fn update(&mut self) -> FrameStats {
        let dt = self.clock.tick();

        self.draw_list.clear();
        let stats = self
            .simulation
            .frame(self.pending.drain(..), dt, &mut self.draw_list);

        self.hud.record(&stats);
        stats
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.update_camera(&self.ctx.queue, &self.camera);
        self.renderer
            .prepare(&self.ctx.device, &self.ctx.queue, &self.draw_list);

        // Build egui UI
        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        self.hud.particles = self.simulation.particles().len();
        self.hud.fps = self.clock.fps();
        let status = self.hud;
        let show_hud = self.show_hud;
        let attractor = self.simulation.attractor();
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            if show_hud {
                draw_equations_sidebar(
                    ctx,
                    "Thermal Orbits",
                    THERMAL_ORBIT_EQUATIONS,
                    THERMAL_ORBIT_VARIABLES,
                    attractor,
                );
                draw_status_bar(ctx, attractor, status);
            }
        });

        self.egui
            .state
            .handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self
            .egui
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui
                .renderer
                .update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view);

        let egui_commands = self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui
                .renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx
            .queue
            .submit(egui_commands.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        if state != ElementState::Pressed {
            return;
        }

        match key {
            KeyCode::Escape => self.pending.push(InputEvent::Quit),
            KeyCode::KeyR => {
                log::info!("Clearing {} particle(s)", self.simulation.particles().len());
                self.simulation.clear();
            }
            KeyCode::KeyH => self.show_hud = !self.show_hud,
            _ => {}
        }
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimConfig::parse();
    config.validate()?;

    let attractor = config.attractor();
    log::info!(
        "Window {}x{}, G = {}, damping = {}, time scale = {}, {} fps cap",
        config.width,
        config.height,
        config.gravity,
        config.damping,
        config.time_scale,
        config.target_fps
    );
    log::info!(
        "Core radius {}, photon sphere {}, influence radius {}",
        attractor.core_radius(),
        attractor.photon_radius(),
        attractor.influence_radius()
    );

    let (ctx, event_loop) =
        pollster::block_on(GraphicsContext::new(TITLE, config.width, config.height))?;
    if ctx.size.width != config.width || ctx.size.height != config.height {
        log::warn!(
            "Window opened at {}x{} instead of {}x{}",
            ctx.size.width,
            ctx.size.height,
            config.width,
            config.height
        );
    }

    let mut app = App::new(ctx, &config);

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                if let WindowEvent::CursorMoved { position, .. } = event {
                    app.cursor = Vec2::new(position.x as f32, position.y as f32);
                }

                let consumed = app.handle_window_event(event);

                match event {
                    WindowEvent::CloseRequested => app.pending.push(InputEvent::Quit),
                    WindowEvent::Resized(size) => app.resize(*size),
                    WindowEvent::RedrawRequested => {
                        let stats = app.update();

                        match app.render() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                                app.ctx.reconfigure()
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("GPU out of memory, exiting");
                                elwt.exit();
                            }
                            Err(e) => log::warn!("Render error: {:?}", e),
                        }

                        if stats.quit_requested {
                            log::info!(
                                "Quitting after {} frames, {} particle(s) spawned, {} absorbed",
                                app.clock.frame_count(),
                                app.hud.spawned,
                                app.hud.absorbed
                            );
                            elwt.exit();
                        }
                    }
                    _ if consumed => {}
                    WindowEvent::MouseInput {
                        state: ElementState::Pressed,
                        button: MouseButton::Left,
                        ..
                    } => app.pending.push(InputEvent::PointerDown(app.cursor)),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(key),
                                state,
                                ..
                            },
                        ..
                    } => app.handle_key(*key, *state),
                    _ => {}
                }
            }
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
