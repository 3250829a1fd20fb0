mod trace;

use clap::{Args, Parser, Subcommand};
use particlebox_core::diagnostics::{format_config_error, format_runtime_error};
use particlebox_core::{
    FrameTimer, Preset, Simulation, SimulationConfig, SimulationError, SimulationResult,
    SystemClock,
};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use trace::CsvRenderer;

#[derive(Parser)]
#[command(name = "particlebox")]
#[command(about = "particlebox - point masses bouncing around a box", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ScenarioArgs {
    /// Named preset (drop, fountain, ring)
    #[arg(short, long, default_value = "drop", conflicts_with = "config")]
    preset: String,

    /// YAML scenario file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the placement seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the particle count
    #[arg(long)]
    particles: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario headless with a fixed frame time
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Number of frames to simulate
        #[arg(long, default_value_t = 500)]
        frames: u64,

        /// Frame time in milliseconds
        #[arg(long, default_value_t = 16.0)]
        frame_ms: f64,

        /// Write particle positions as CSV to stdout
        #[arg(long)]
        trace: bool,

        /// Only trace every n-th frame
        #[arg(long, default_value_t = 1)]
        trace_every: u64,
    },
    /// Run a scenario against the wall clock
    Realtime {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Wall-clock seconds to run for
        #[arg(long, default_value_t = 5.0)]
        seconds: f64,

        /// Target frames per second
        #[arg(long, default_value_t = 60)]
        fps: u32,
    },
    /// List the built-in presets
    Presets,
    /// Print a preset as YAML, ready to edit and pass back with --config
    Dump {
        /// Preset name
        preset: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Run {
            scenario,
            frames,
            frame_ms,
            trace,
            trace_every,
        } => run_headless(&scenario, frames, frame_ms, trace.then_some(trace_every)),
        Commands::Realtime {
            scenario,
            seconds,
            fps,
        } => run_realtime(&scenario, seconds, fps),
        Commands::Presets => {
            for preset in Preset::ALL {
                println!("{:<10} {}", preset.name(), preset.description());
            }
            Ok(())
        }
        Commands::Dump { preset } => dump_preset(&preset),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(args: &ScenarioArgs) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => {
            let source = fs::read_to_string(path)?;
            SimulationConfig::from_yaml_str(&source)
                .map_err(|e| format_config_error(&e, &source))?
        }
        None => args.preset.parse::<Preset>()?.config(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(count) = args.particles {
        config.particle_count = count;
    }
    Ok(config)
}

fn build_simulation(args: &ScenarioArgs) -> Result<Simulation, Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    Simulation::new(config).map_err(|e: SimulationError| format_runtime_error(&e).into())
}

fn run_headless(
    args: &ScenarioArgs,
    frames: u64,
    frame_ms: f64,
    trace_every: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let frame_delta = Duration::try_from_secs_f64(frame_ms / 1000.0)
        .map_err(|e| format!("invalid frame time {}ms: {}", frame_ms, e))?;
    let mut simulation = build_simulation(args)?;

    match trace_every {
        Some(every) => {
            let stdout = std::io::stdout();
            let mut renderer = CsvRenderer::new(stdout.lock(), every);
            renderer.write_header()?;
            for frame in 0..frames {
                simulation.advance(frame_delta);
                renderer.begin_frame(frame);
                simulation.render(&mut renderer);
            }
            renderer.finish()?;
        }
        None => {
            for _ in 0..frames {
                simulation.advance(frame_delta);
            }
            print_summary(&simulation.result());
        }
    }

    Ok(())
}

fn run_realtime(
    args: &ScenarioArgs,
    seconds: f64,
    fps: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let run_time = Duration::try_from_secs_f64(seconds)
        .map_err(|e| format!("invalid run time {}s: {}", seconds, e))?;
    let mut simulation = build_simulation(args)?;
    let clock = SystemClock::with_time_scale(simulation.config().time_scale);
    let mut timer = FrameTimer::new(clock);
    let frame_budget = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
    let deadline = Instant::now()
        .checked_add(run_time)
        .ok_or_else(|| format!("run time {}s is too long", seconds))?;

    // No window here; drawing is a no-op and only the physics is timed
    let mut renderer = NullRenderer;
    while Instant::now() < deadline {
        let frame_start = Instant::now();
        simulation.frame(&mut timer, &mut renderer);
        if let Some(rest) = frame_budget.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    log::info!(
        "ran {} frames, {:?} of real time dropped by the step cap",
        simulation.frames(),
        simulation.scheduler().dropped()
    );
    print_summary(&simulation.result());
    Ok(())
}

fn dump_preset(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let preset: Preset = name.parse()?;
    print!("{}", preset.config().to_yaml_string()?);
    Ok(())
}

fn print_summary(result: &SimulationResult) {
    println!(
        "frames = {}, steps = {}, simulated time = {:.3}s",
        result.frames, result.ticks, result.simulated_time
    );
    for particle in result.particles.iter().take(10) {
        println!(
            "particle {} pos = ({:.4}, {:.4}, {:.4}) vel = ({:.4}, {:.4}, {:.4})",
            particle.index,
            particle.position.x,
            particle.position.y,
            particle.position.z,
            particle.velocity.x,
            particle.velocity.y,
            particle.velocity.z
        );
    }
    if result.particles.len() > 10 {
        println!("... {} more", result.particles.len() - 10);
    }
}

struct NullRenderer;

impl particlebox_core::Renderer for NullRenderer {
    fn draw(&mut self, _position: glam::Vec3, _orientation: glam::Quat, _scale: glam::Vec3) {}
}
