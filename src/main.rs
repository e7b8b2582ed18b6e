#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::collapsible_if)]

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use phototaxis_rust::simulation::{
    agent::Robot,
    controller::{ControllerConfig, GoalPolicy, VelocityCommand},
    environment::{Arena, ScenePreset},
    params::TIME_STEP,
};
use phototaxis_rust::ui::{
    DashboardState,
    field::{LIGHT_CHAR, compute_field_grid},
    render::{draw_ui, world_to_grid_coords},
};

/// Watch a light-seeking robot find its way around obstacles.
///
/// Set `PHOTOTAXIS_LOG=<file>` to capture controller logs (filtered by `RUST_LOG`,
/// default `debug`). Press `q` to quit.
#[derive(Parser)]
#[command(name = "phototaxis_rust")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Scene: 1 wall, 2 two blocks, 3 corner, 0 random arena
    #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(0..=3))]
    scene: u32,

    /// Controller configuration as JSON; missing fields take defaults
    config: Option<PathBuf>,

    /// Seed for the random arena (scene 0); drawn at random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing()?;

    let seed = cli.seed.unwrap_or_else(rand::random);
    let arena = match ScenePreset::from_index(cli.scene) {
        Some(preset) => Arena::preset(preset),
        None => Arena::scattered(seed),
    };
    let config = match &cli.config {
        Some(path) => ControllerConfig::from_json(&std::fs::read_to_string(path)?)?,
        // The arena knows where the light is, so the demo uses the position oracle
        None => {
            ControllerConfig::default().with_goal(GoalPolicy::at(arena.light.x, 0.0, arena.light.z))
        }
    };
    let mut robot = Robot::spawn(&arena, config)?;
    if cli.scene == 0 {
        info!(seed, start = ?arena.start, "starting simulation in random arena");
    } else {
        info!(scene = cli.scene, start = ?arena.start, "starting simulation");
    }

    // Setup Terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(20);
    let res = run_app(&mut terminal, &arena, &mut robot, tick_rate);

    // Restore Terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }
    if cli.scene == 0 {
        println!("random arena seed: {seed}");
    }

    Ok(())
}

fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let Ok(path) = std::env::var("PHOTOTAXIS_LOG") else {
        return Ok(());
    };
    let file = std::fs::File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| e as Box<dyn std::error::Error>)?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    arena: &Arena,
    robot: &mut Robot,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        // 1. Update
        if last_tick.elapsed() >= tick_rate {
            if let Err(err) = robot.update_state(arena, TIME_STEP) {
                warn!(%err, "controller tick failed, stopping for this tick");
                robot.apply(arena, VelocityCommand::stop(), TIME_STEP);
            }
            last_tick = Instant::now();
        }

        // 2. Render
        terminal.draw(|f| {
            let area = f.area();
            let rows = (area.height as usize).saturating_sub(1); // -1 for HUD
            let cols = area.width as usize;

            let mut grid = compute_field_grid(arena, rows, cols);

            if rows > 0 && cols > 0 {
                let mut plot = |x: f64, z: f64, glyph: &str| {
                    let (r, c) = world_to_grid_coords(x, z, arena.half_extent, rows, cols);
                    if let Some(line) = grid.get_mut(r) {
                        if c < line.len() {
                            line.replace_range(c..=c, glyph);
                        }
                    }
                };

                plot(arena.light.x, arena.light.z, &LIGHT_CHAR.to_string());
                // Heading marker one body length ahead
                plot(
                    robot.x + 2.0 * robot.radius * robot.heading.cos(),
                    robot.z + 2.0 * robot.radius * robot.heading.sin(),
                    ".",
                );
                plot(robot.x, robot.z, "O");
            }

            let light = robot.sense(arena).light;
            let hud = DashboardState::capture(robot, light, (arena.light.x, arena.light.z));
            draw_ui(f, grid, &hud);
        })?;

        // 3. Input
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('q') {
                    return Ok(());
                }
            }
        }
    }
}
