use std::error::Error;
use std::time::{Duration, Instant};

use pixels::{PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::graphics::ViewportRenderer;
use crate::pixels_renderer::PixelsPresenter;
use crate::surface::SurfaceSize;

pub struct AppConfig {
    pub title: String,
    pub desired_size: PhysicalSize<u32>,
    pub clamp_to_monitor: bool,
    pub vsync: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: VirtualKeyCode,
    pub pressed: bool,
}

/// A frame-driven game hosted by `run_game` or `headless::HeadlessRunner`.
///
/// Per redraw the loop calls `update_state` once and then `render` once, so anything the update
/// changes is visible in the same frame.
pub trait GameApp {
    type State;

    fn init_state(&mut self, size: SurfaceSize) -> Self::State;

    fn handle_key(&mut self, _state: &mut Self::State, _event: KeyEvent) {}

    fn resized(&mut self, _state: &mut Self::State, _size: SurfaceSize) {}

    fn update_state(&mut self, state: &mut Self::State, dt: Duration);

    fn render(&mut self, state: &Self::State, renderer: &mut dyn ViewportRenderer);

    /// Called once when the window is closing.
    fn shutdown(&mut self, _state: &mut Self::State) {}
}

pub fn run_game<G>(config: AppConfig, mut game: G) -> Result<(), Box<dyn Error>>
where
    G: GameApp + 'static,
    G::State: 'static,
{
    let event_loop = EventLoop::new();
    let monitor_size = if config.clamp_to_monitor {
        event_loop.primary_monitor().map(|m| m.size())
    } else {
        None
    };
    let initial_size = if let Some(monitor) = monitor_size {
        PhysicalSize::new(
            config.desired_size.width.min(monitor.width),
            config.desired_size.height.min(monitor.height),
        )
    } else {
        config.desired_size
    };
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(initial_size)
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_size = SurfaceSize::new(window_size.width, window_size.height);

    let pixels = {
        let surface_texture = SurfaceTexture::new(surface_size.width, surface_size.height, &window);
        PixelsBuilder::new(surface_size.width, surface_size.height, surface_texture)
            .enable_vsync(config.vsync)
            .build()?
    };
    let mut presenter = PixelsPresenter::new(pixels, surface_size)?;

    let mut state = game.init_state(surface_size);
    let mut last_frame = Instant::now();
    log::info!("window ready at {}x{}", surface_size.width, surface_size.height);

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    game.shutdown(&mut state);
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    let size = SurfaceSize::new(size.width, size.height);
                    if let Err(err) = presenter.resize(size) {
                        log::warn!("resize failed: {err}");
                    }
                    if !size.is_empty() {
                        game.resized(&mut state, size);
                    }
                    window.request_redraw();
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: key_state,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => {
                    if *key == VirtualKeyCode::Escape && *key_state == ElementState::Pressed {
                        game.shutdown(&mut state);
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                    game.handle_key(
                        &mut state,
                        KeyEvent {
                            key: *key,
                            pressed: *key_state == ElementState::Pressed,
                        },
                    );
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                game.update_state(&mut state, dt);
                presenter.draw_frame(|gfx| game.render(&state, gfx));
                if let Err(err) = presenter.present() {
                    log::warn!("present failed: {err}");
                }
            }
            Event::MainEventsCleared => {
                window.request_redraw();
            }
            _ => {}
        }
    });
}
