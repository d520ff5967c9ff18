use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant},
};

use clap::Parser;
use engine::{
    assets::AssetLoader,
    audio::Music,
    input::InputState,
    renderer::{Frame, Renderer},
    scene::Scene,
    window::{inner_position, outer_position, overlay_window_attributes},
};
use game::{
    driver::PlaybackDriver, motion::scale_for_monitor_height, pet::Pet, scenes::pet::PetScene,
    sprite_renderer::SpriteRenderer,
};
use tracing::{debug, error, info, warn};

mod engine;
mod game;

#[derive(clap::Parser)]
#[command(about = "An animated sprite that lives on your desktop.")]
struct Opts {
    /// Path to the animation file.
    #[arg(default_value = "animation.json")]
    config: PathBuf,

    /// Directory sprite sheets and music are loaded from. Defaults to the directory containing
    /// the animation file.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Background music, relative to the assets directory.
    #[arg(long, default_value = "theme.mp3")]
    music: PathBuf,

    /// Run without background music.
    #[arg(long)]
    no_music: bool,

    /// Target frame rate.
    #[arg(long, default_value_t = 144)]
    fps: u32,

    /// Log debug messages.
    #[arg(short, long)]
    verbose: bool,
}

/// Everything loaded before the event loop starts.
struct Startup {
    pet: Pet,
    music: Music,
    frame_interval: Duration,
}

enum App {
    Uninitialized(Option<Startup>),
    Initialized {
        window: Arc<winit::window::Window>,

        /// The renderer.
        renderer: Renderer,

        input: InputState,

        /// The scene we are currently rendering to the screen.
        scene: Box<dyn Scene>,

        music: Music,

        // The instant that the last frame started to render.
        last_frame_time: Instant,

        /// When the next frame should be drawn.
        next_frame: Instant,

        frame_interval: Duration,
    },
}

impl winit::application::ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let startup = match self {
            App::Uninitialized(startup) => startup.take(),
            App::Initialized { .. } => {
                warn!("Application already initialized!");
                return;
            }
        };

        let Some(Startup {
            pet,
            music,
            frame_interval,
        }) = startup
        else {
            return;
        };

        let scale = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .map(|monitor| scale_for_monitor_height(monitor.size().height))
            .unwrap_or_else(|| {
                warn!("No monitor reported, using a scale of 1.0");
                1.0
            });
        info!("Scale: {scale}");

        let size = (pet.frame_size().as_vec2() * scale).round().as_uvec2();

        let window = Arc::new(
            event_loop
                .create_window(overlay_window_attributes(&pet.name, size))
                .expect("create main window"),
        );
        info!("Created window {}x{}", size.x, size.y);

        let renderer = Renderer::new(Arc::clone(&window));

        let sprites = SpriteRenderer::new(&renderer, &pet.sheets);

        let origin = outer_position(&window).unwrap_or_default().as_vec2();

        let mut input = InputState::default();
        if let Some(position) = inner_position(&window) {
            input.set_window_position(position.as_vec2());
        }

        let driver = PlaybackDriver::new(pet.playlist, origin, scale);
        let scene: Box<dyn Scene> = Box::new(PetScene::new(driver, sprites));

        info!("Application initialized!");

        let now = Instant::now();
        *self = App::Initialized {
            window,
            renderer,
            input,
            scene,
            music,
            last_frame_time: now,
            next_frame: now,
            frame_interval,
        };
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        use winit::event::WindowEvent;

        let App::Initialized {
            window,
            renderer,
            input,
            scene,
            music,
            last_frame_time,
            ..
        } = self
        else {
            warn!("Can't process events for uninitialized application.");
            return;
        };

        if window_id != window.id() {
            return;
        }

        input.handle_window_event(&event);

        match event {
            WindowEvent::Resized(winit::dpi::PhysicalSize { width, height }) => {
                renderer.resize(width, height);
                scene.resize(width, height);
            }

            WindowEvent::Moved(_) => {
                // Cursor positions are relative to the client area, not the outer frame.
                if let Some(position) = inner_position(window) {
                    input.set_window_position(position.as_vec2());
                }
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = (now - *last_frame_time).as_secs_f64();
                *last_frame_time = now;

                scene.update(delta_time, input, window);

                let output = match renderer.surface.get_texture() {
                    Ok(output) => output,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        debug!("Surface lost, reconfiguring.");
                        let size = window.inner_size();
                        renderer.resize(size.width, size.height);
                        return;
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("Out of memory while acquiring the surface texture.");
                        event_loop.exit();
                        return;
                    }
                    Err(err) => {
                        warn!("Skipping frame: {err}");
                        return;
                    }
                };

                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                let encoder =
                    renderer
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("main command encoder"),
                        });

                let mut frame = Frame {
                    queue: renderer.queue.clone(),
                    encoder,
                    surface: view,
                };

                scene.render(&mut frame);

                renderer.queue.submit(std::iter::once(frame.encoder.finish()));

                window.pre_present_notify();
                output.present();

                music.update();
            }

            _ => {}
        }

        if input.should_close() {
            info!("Closing.");
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let App::Initialized {
            window,
            next_frame,
            frame_interval,
            ..
        } = self
        else {
            return;
        };

        let now = Instant::now();
        if now >= *next_frame {
            window.request_redraw();

            *next_frame += *frame_interval;
            // Don't try to catch up after a stall.
            if *next_frame < now {
                *next_frame = now + *frame_interval;
            }
        }

        event_loop.set_control_flow(winit::event_loop::ControlFlow::WaitUntil(*next_frame));
    }
}

fn load(opts: &Opts) -> Result<Startup, game::pet::StartupError> {
    let assets_root = match opts.assets {
        Some(ref assets) => assets.clone(),
        None => opts
            .config
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    debug!("Assets directory: {}", assets_root.display());

    let assets = AssetLoader::new(&assets_root);
    let pet = Pet::load(&AssetLoader::new(""), &opts.config, &assets)?;

    let music = if opts.no_music {
        Music::silent()
    } else {
        Music::load(&assets, &opts.music).unwrap_or_else(|err| {
            warn!("Could not play music, continuing without it. ({err})");
            Music::silent()
        })
    };

    let frame_interval = Duration::from_secs_f64(1.0 / f64::from(opts.fps.max(1)));

    Ok(Startup {
        pet,
        music,
        frame_interval,
    })
}

fn main() {
    let opts = Opts::parse();

    tracing_subscriber::fmt()
        .with_max_level(if opts.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let startup = match load(&opts) {
        Ok(startup) => startup,
        Err(err) => {
            error!("Could not load {}: {err}", opts.config.display());
            std::process::exit(1);
        }
    };

    let event_loop = match winit::event_loop::EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            error!("Could not create event loop: {err}");
            std::process::exit(1);
        }
    };

    let mut app = App::Uninitialized(Some(startup));
    event_loop
        .run_app(&mut app)
        .expect("run application event loop");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = Opts::try_parse_from(["desk-pet"]).unwrap();
        assert_eq!(opts.config, PathBuf::from("animation.json"));
        assert_eq!(opts.assets, None);
        assert_eq!(opts.music, PathBuf::from("theme.mp3"));
        assert!(!opts.no_music);
        assert_eq!(opts.fps, 144);
        assert!(!opts.verbose);
    }

    #[test]
    fn parse_options() {
        let opts = Opts::try_parse_from([
            "desk-pet",
            "pets/cat.json",
            "--assets",
            "sheets",
            "--no-music",
            "--fps",
            "60",
            "-v",
        ])
        .unwrap();
        assert_eq!(opts.config, PathBuf::from("pets/cat.json"));
        assert_eq!(opts.assets, Some(PathBuf::from("sheets")));
        assert!(opts.no_music);
        assert_eq!(opts.fps, 60);
        assert!(opts.verbose);
    }
}
