//! Bubble Pop entry point
//!
//! Headless runner: plays an autoplay session to its end and reports the
//! outcome. Rendering front ends drive `bubble_pop::sim::tick` themselves.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::process::ExitCode;

    use bubble_pop::GameConfig;
    use bubble_pop::sim::{GameState, Snapshot, TickInput, tick};
    use clap::Parser;

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Run a headless bubble shooter session", long_about = None)]
    struct Args {
        /// JSON config file (missing fields use defaults)
        #[arg(long)]
        config: Option<PathBuf>,
        /// RNG seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many ticks even if the session is still running
        #[arg(long, default_value_t = 100_000)]
        max_ticks: u64,
        /// Print the final snapshot as JSON instead of a summary
        #[arg(long)]
        json: bool,
    }

    fn time_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    pub fn run() -> ExitCode {
        env_logger::init();
        let args = Args::parse();

        let config = match &args.config {
            Some(path) => match GameConfig::load(path) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("{}", e);
                    return ExitCode::FAILURE;
                }
            },
            None => GameConfig::default(),
        };

        let seed = args.seed.unwrap_or_else(time_seed);
        let mut state = GameState::new(config, seed);
        let input = TickInput {
            autoplay: true,
            ..Default::default()
        };

        while !state.phase.is_over() && state.time_ticks < args.max_ticks {
            tick(&mut state, &input);
            for event in state.drain_events() {
                log::debug!("[tick {}] {:?}", state.time_ticks, event);
            }
        }

        if args.json {
            match serde_json::to_string_pretty(&Snapshot::capture(&state)) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    log::error!("Failed to serialize snapshot: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!(
                "seed {} | {:?} after {} ticks | score {} | {} bubbles left",
                seed,
                state.phase,
                state.time_ticks,
                state.score,
                state.grid.len()
            );
        }
        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser front ends link the library directly
}
