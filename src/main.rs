use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use glam::Vec2;

mod config;
mod error;
mod input;
mod renderer;
mod surface;
mod ui;

use config::ViewerConfig;
use error::{Result, ViewerError};
use input::{InteractionState, PointerState};
use renderer::{
    FrameInputs, GpuState, TextureLoader, TextureResult, TextureSource, Trackball, compose_frame,
};
use surface::{MeshCache, StripMesh};
use ui::{
    MeshStats, PanelStatus, TextureStatus, UiActions, UiState, apply_theme, draw_help_overlay,
    draw_side_panel,
};

#[derive(Debug, Clone, Copy)]
enum AppEvent {
    TextureReady,
}

/// Everything that exists only once a window is up.
struct RenderContext {
    window: Arc<Window>,
    gpu: GpuState,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct App {
    config: ViewerConfig,
    context: Option<RenderContext>,
    egui_ctx: egui::Context,
    texture_loader: TextureLoader,
    texture_status: TextureStatus,

    mesh_cache: MeshCache,
    current_mesh: Option<Arc<StripMesh>>,
    mesh_stats: MeshStats,
    mesh_error: Option<String>,

    interaction: InteractionState,
    pointer: PointerState,
    trackball: Trackball,
    ui_state: UiState,

    fatal: Option<ViewerError>,
}

impl App {
    fn new(config: ViewerConfig, proxy: EventLoopProxy<AppEvent>) -> Self {
        let texture_loader = TextureLoader::new(move || {
            let _ = proxy.send_event(AppEvent::TextureReady);
        });

        Self {
            ui_state: UiState::from_config(&config),
            config,
            context: None,
            egui_ctx: egui::Context::default(),
            texture_loader,
            texture_status: TextureStatus::Loading,

            mesh_cache: MeshCache::default(),
            current_mesh: None,
            mesh_stats: MeshStats::default(),
            mesh_error: None,

            interaction: InteractionState::default(),
            pointer: PointerState::default(),
            trackball: Trackball::default(),

            fatal: None,
        }
    }

    fn init_context(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = pollster::block_on(GpuState::new(window.clone()))?;

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            self.egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2048),
        );

        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.config.format, None, 1, false);

        apply_theme(&self.egui_ctx);

        window.request_redraw();
        self.context = Some(RenderContext {
            window,
            gpu,
            egui_state,
            egui_renderer,
        });

        self.request_texture();
        Ok(())
    }

    fn request_texture(&mut self) {
        let source = TextureSource::from_text(&self.ui_state.texture_path);
        log::info!("loading texture {source}");
        self.texture_status = match self.texture_loader.load(source) {
            Ok(()) => TextureStatus::Loading,
            Err(err) => {
                log::warn!("{err}");
                TextureStatus::Missing(err.to_string())
            }
        };
    }

    fn receive_textures(&mut self) {
        while let Some(result) = self.texture_loader.try_recv_result() {
            match result {
                TextureResult::Loaded { source, texture } => {
                    log::debug!("binding texture {source}");
                    if let Some(context) = self.context.as_mut() {
                        context.gpu.set_texture(&texture);
                    }
                    self.texture_status = TextureStatus::Ready {
                        width: texture.width,
                        height: texture.height,
                    };
                }
                TextureResult::Failed { source, message } => {
                    log::debug!("keeping previous texture after {source} failed");
                    self.texture_status = TextureStatus::Missing(message);
                }
            }
        }
        self.request_redraw();
    }

    fn rebuild_mesh(&mut self) {
        self.ui_state.mesh_needs_build = false;

        let params = match self.ui_state.shape_params() {
            Ok(params) => params,
            Err(err) => {
                log::warn!("keeping previous mesh: {err}");
                self.mesh_error = Some(err.to_string());
                return;
            }
        };
        let settings = self.ui_state.tessellation_settings();

        let started = Instant::now();
        match self.mesh_cache.get_or_build(params, &settings) {
            Ok(mesh) => {
                self.mesh_stats = MeshStats {
                    vertex_count: mesh.vertex_count(),
                    rows: mesh.rows,
                    columns: mesh.columns,
                    bytes: mesh.byte_size(),
                    build_ms: started.elapsed().as_secs_f32() * 1000.0,
                    cache: self.mesh_cache.stats(),
                    cached: self.mesh_cache.len(),
                };
                self.mesh_error = None;

                let unchanged = self
                    .current_mesh
                    .as_ref()
                    .is_some_and(|current| Arc::ptr_eq(current, &mesh));
                if !unchanged {
                    if let Some(context) = self.context.as_mut() {
                        context.gpu.upload_mesh(&mesh);
                    }
                    self.current_mesh = Some(mesh);
                }
            }
            Err(err) => {
                log::warn!("keeping previous mesh: {err}");
                self.mesh_error = Some(err.to_string());
            }
        }
    }

    fn handle_ui_actions(&mut self, actions: UiActions) {
        if actions.reset_view {
            self.trackball.reset();
        }

        if actions.reload_texture {
            self.request_texture();
        }

        if actions.rebuild_mesh {
            self.ui_state.mesh_needs_build = true;
        }
    }

    fn request_redraw(&self) {
        if let Some(context) = &self.context {
            context.window.request_redraw();
        }
    }

    fn render(&mut self) -> Result<()> {
        let (full_output, actions) = {
            let Some(context) = self.context.as_mut() else {
                return Ok(());
            };
            let raw_input = context.egui_state.take_egui_input(&context.window);

            let status = PanelStatus {
                mesh: self.mesh_stats,
                mesh_error: self.mesh_error.as_deref(),
                texture: &self.texture_status,
                interaction: self.interaction,
            };
            let ui_state = &mut self.ui_state;

            let mut actions = UiActions::default();
            let full_output = self.egui_ctx.run(raw_input, |ctx| {
                actions = draw_side_panel(ctx, ui_state, &status);
                if ui_state.show_help {
                    draw_help_overlay(ctx);
                }
            });
            (full_output, actions)
        };

        self.handle_ui_actions(actions);
        if self.ui_state.mesh_needs_build {
            self.rebuild_mesh();
        }

        let Some(context) = self.context.as_mut() else {
            return Ok(());
        };
        let RenderContext {
            window,
            gpu,
            egui_state,
            egui_renderer,
        } = context;

        egui_state.handle_platform_output(window, full_output.platform_output);

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.resize(gpu.size);
                window.request_redraw();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                return Ok(());
            }
            Err(err) => {
                return Err(ViewerError::GraphicsContext(err.to_string()));
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let uniforms = compose_frame(
            &self.ui_state.scene,
            &FrameInputs {
                view: self.trackball.view_matrix(),
                aspect: gpu.aspect(),
                light_angle: self.interaction.light_angle,
                point: self.interaction.point,
                has_texture: gpu.has_texture(),
            },
        );
        gpu.update_frame(&uniforms);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, id, &delta);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        gpu.render_surface(&view, &mut encoder, self.ui_state.scene.render_mode);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
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

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in full_output.textures_delta.free {
            egui_renderer.free_texture(&id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        let animating = full_output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .is_some_and(|viewport| viewport.repaint_delay.is_zero());
        if animating {
            window.request_redraw();
        }

        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ViewerError) {
        log::error!("{err}");
        self.fatal = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.context.is_some() {
            return;
        }
        if let Err(err) = self.init_context(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::TextureReady => self.receive_textures(),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(context) = &mut self.context {
            let response = context.egui_state.on_window_event(&context.window, &event);
            if response.repaint {
                context.window.request_redraw();
            }
            // a release over the panel still ends a drag
            let ends_drag = matches!(
                event,
                WindowEvent::MouseInput {
                    button: MouseButton::Left,
                    state: ElementState::Released,
                    ..
                }
            );
            if response.consumed && !ends_drag {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(context) = &mut self.context {
                    context.gpu.resize(size);
                    context.window.request_redraw();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    if self
                        .interaction
                        .handle_key(key, self.ui_state.legacy_a_key_fallthrough)
                    {
                        self.request_redraw();
                    }
                }
            }

            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.pointer.dragging = state == ElementState::Pressed;
            }

            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                if let Some(delta) = self.pointer.moved_to(position) {
                    self.trackball.process_mouse_movement(delta);
                    self.request_redraw();
                }
            }

            WindowEvent::CursorLeft { .. } => {
                self.pointer.dragging = false;
                self.pointer.last_position = None;
            }

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.render() {
                    self.fail(event_loop, err);
                }
            }

            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::from_env();
    log::info!(
        "starting with step {} and texture {:?}",
        config.step,
        config.texture_path
    );

    let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, event_loop.create_proxy());
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
