use std::path::PathBuf;

use clap::Parser;
use log::{debug, info};

use raycast_dungeon::events::GameEvent;
use raycast_dungeon::{logging, Framebuffer, GameConfig, GameState, PlayerIntent, Renderer};

const FRAME_DT: f32 = 1.0 / 60.0;

/// Generate a dungeon, play a scripted run through it and save the last frame.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level seed; overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frames to simulate at 60 fps
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Where to write the final frame
    #[arg(long, default_value = "frame.png")]
    output: PathBuf,

    /// Use the hand-authored manor instead of a random layout
    #[arg(long)]
    authored: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Turn slowly and fire every half second
fn scripted_intent(frame: u32) -> PlayerIntent {
    PlayerIntent {
        forward: if (frame / 120) % 2 == 0 { 0.5 } else { 0.0 },
        strafe: 0.0,
        turn: 0.01,
        fire: frame % 30 == 0,
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::EnemyDied { kind, position, .. } => {
            info!("{} killed at ({:.1}, {:.1})", kind.name(), position.x, position.y)
        }
        GameEvent::PlayerDamaged { amount, .. } => info!("Player took {} damage", amount),
        GameEvent::WeaponEmpty => info!("Out of ammo"),
        GameEvent::LevelComplete => info!("Level complete"),
        GameEvent::PlayerDied => info!("Player died"),
        other => debug!("{:?}", other),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if args.seed.is_some() {
        config.level.seed = args.seed;
    }
    config.level.authored |= args.authored;
    config.validate()?;

    let renderer = Renderer::new(config.render);
    let mut state = GameState::new(config);

    for frame in 0..args.frames {
        let outcome = state.step(&scripted_intent(frame), FRAME_DT);
        for event in state.events.drain() {
            log_event(&event);
        }
        if let Some(outcome) = outcome {
            info!("Stopped after {} frames: {:?}", frame + 1, outcome);
            break;
        }
    }

    info!(
        "Level {} at t={:.2}s: health {}, ammo {}, {} enemies left",
        state.level,
        state.now(),
        state.player.health.current,
        state.player.ammo,
        state.live_enemy_count()
    );

    let frame = renderer.render(&state);
    let mut framebuffer = Framebuffer::new(frame.width, frame.height, state.seed);
    framebuffer.rasterize(&frame);
    framebuffer.save_png(&args.output)?;
    info!("Wrote {}", args.output.display());

    Ok(())
}
