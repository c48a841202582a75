use std::path::PathBuf;

use clap::{Parser, Subcommand};
use glam::Vec3;
use tracing_subscriber::EnvFilter;
use trailwalk_anim::AnimationState;
use trailwalk_common::Aabb;
use trailwalk_input::{InputEvent, Key};
use trailwalk_kernel::{ColliderSetBuilder, GroundPlane};
use trailwalk_quality::QualityController;
use trailwalk_render::{DebugTextRenderer, Renderer};
use trailwalk_runtime::{Session, SimConfig};

#[derive(Parser)]
#[command(name = "trailwalk-cli", about = "CLI tool for trailwalk sessions")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Session config file (.json, .yaml or .yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Walk the character forward over flat ground with scripted input
    Walk {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "120")]
        frames: u32,
        /// Simulated frame rate
        #[arg(long, default_value = "60")]
        fps: f32,
        /// Hold the run key
        #[arg(long)]
        sprint: bool,
        /// Horizontal pointer drag in pixels applied before walking
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        yaw_drag: f32,
        /// Print the frame every N frames
        #[arg(long, default_value = "30")]
        print_every: u32,
    },
    /// Feed frame rates through the quality controller
    Quality {
        /// Comma-separated frame rates, each held for --seconds
        #[arg(long, value_delimiter = ',', default_value = "20,20,50,60")]
        fps: Vec<f32>,
        /// Seconds each frame rate is held
        #[arg(long, default_value = "3")]
        seconds: f32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("trailwalk-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", trailwalk_render::crate_info());
            println!("runtime: {}", trailwalk_runtime::crate_info());
            let c = &config.character;
            println!(
                "character: speed={} sprint=x{} eye={} bounds=[{}, {}]",
                c.base_speed, c.sprint_multiplier, c.eye_offset, c.bounds_min, c.bounds_max
            );
            let q = &config.quality;
            println!(
                "quality: initial={} window={} interval={}s down<{} lock=[{}, {}] up>{}",
                q.initial_tier,
                q.window_capacity,
                q.evaluation_interval,
                q.downgrade_below,
                q.lock_min,
                q.lock_max,
                q.upgrade_above
            );
        }
        Commands::Walk {
            frames,
            fps,
            sprint,
            yaw_drag,
            print_every,
        } => {
            anyhow::ensure!(fps.is_finite() && fps > 0.0, "--fps must be positive");
            walk(config, frames, fps, sprint, yaw_drag, print_every.max(1))?;
        }
        Commands::Quality { fps, seconds } => {
            anyhow::ensure!(seconds.is_finite() && seconds > 0.0, "--seconds must be positive");
            quality(config, &fps, seconds);
        }
    }

    Ok(())
}

fn walk(
    config: SimConfig,
    frames: u32,
    fps: f32,
    sprint: bool,
    yaw_drag: f32,
    print_every: u32,
) -> anyhow::Result<()> {
    let dt = 1.0 / fps;
    let mut session = Session::new(config)?;
    for state in AnimationState::ALL {
        session.clips_mut().register(state.clip_name());
    }
    session.enable_terrain().register(GroundPlane::infinite(0.0));

    // A crate in the walking path, ten metres ahead of the spawn point.
    let mut colliders = ColliderSetBuilder::new();
    colliders.register(
        "crate",
        Aabb::from_center_half_extents(Vec3::new(0.0, 1.0, -10.0), Vec3::new(1.5, 1.0, 0.5)),
    )?;
    session.attach_colliders(colliders.build());

    if yaw_drag != 0.0 {
        session.handle_input(InputEvent::PointerDown);
        session.handle_input(InputEvent::PointerMove {
            dx: yaw_drag,
            dy: 0.0,
        });
        session.handle_input(InputEvent::PointerUp);
    }
    session.handle_input(InputEvent::KeyDown(Key::Forward));
    if sprint {
        session.handle_input(InputEvent::KeyDown(Key::Run));
    }

    let mut renderer = DebugTextRenderer::new();
    let mut blocked_frames = 0u32;
    println!("Walking {frames} frames at {fps} fps (sprint={sprint}, yaw_drag={yaw_drag}px)");
    for i in 1..=frames {
        let out = session.frame(dt);
        if let Some(change) = out.quality {
            tracing::info!(frame = i, from = %change.from, to = %change.to, "quality tier changed");
            renderer.apply_quality(&change.settings);
        }
        if out.blocked {
            if blocked_frames == 0 {
                tracing::info!(frame = i, pos = ?out.pose.position, "walk blocked by collider");
            }
            blocked_frames += 1;
        }
        if i % print_every == 0 || i == frames {
            println!("--- frame {i} ---");
            print!("{}", renderer.render(&out.frame_view()));
        }
    }
    println!(
        "Done: state={:?} blocked_frames={blocked_frames}",
        session.animation_state()
    );
    Ok(())
}

fn quality(config: SimConfig, rates: &[f32], seconds: f32) {
    let mut controller = QualityController::new(config.quality);
    let mut clock = 0.0_f32;
    println!("Initial tier: {}", controller.tier());
    for &rate in rates {
        if !(rate.is_finite() && rate > 0.0) {
            println!("skipping invalid frame rate {rate}");
            continue;
        }
        let dt = 1.0 / rate;
        let frames = (seconds * rate).round() as u32;
        for _ in 0..frames {
            clock += dt;
            if let Some(change) = controller.record_frame(dt) {
                let s = change.settings;
                println!(
                    "t={clock:6.2}s fps={rate:5.1} {} -> {} (pixel_ratio<={:.1} shadows={} decor={:.2})",
                    change.from, change.to, s.pixel_ratio_cap, s.shadows, s.decorative_density
                );
            }
        }
    }
    let locked = if controller.is_locked() { " (locked)" } else { "" };
    println!("Final tier: {}{locked}", controller.tier());
}
