//! Color Ring entry point
//!
//! The browser build is driven from JavaScript through `platform::web`. The
//! native binary runs the simulation headless with an autopilot steering the
//! ball, which is handy for balance work on tuning files.
//!
//! Example:
//!   cargo run -- --seed 7 --frames 7200 --tuning tuning.json --skill 0.85

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use color_ring::consts::HIT_BAND_NEAR_Z;
    use color_ring::persistence::FileStore;
    use color_ring::platform::{self, GameHost};
    use color_ring::sim::{Command, GameEvent, GamePhase, GameState, Viewport};
    use color_ring::{QualityPreset, Settings, Tuning, angle_delta, normalize_angle};

    /// Largest rotation the autopilot applies in one frame (radians)
    const MAX_TURN: f32 = 0.15;

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Run Color Ring headless with an autopilot", long_about = None)]
    struct Args {
        /// RNG seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,
        /// Frames to simulate (60 per second)
        #[arg(long, default_value_t = 3600)]
        frames: u64,
        /// JSON file overriding balance values
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Where best score and settings are kept
        #[arg(long, default_value = "color_ring_save.json")]
        store: PathBuf,
        /// Quality preset to save before running (low, medium, high)
        #[arg(long)]
        quality: Option<String>,
        /// Chance the autopilot aims for the matching segment of each ring
        #[arg(long, default_value_t = 0.9)]
        skill: f32,
        #[arg(long, default_value_t = 800.0)]
        width: f32,
        #[arg(long, default_value_t = 600.0)]
        height: f32,
        /// Print the final render snapshot as JSON
        #[arg(long)]
        snapshot: bool,
    }

    /// Steers toward a segment of the next ring to resolve
    struct Autopilot {
        rng: Pcg32,
        skill: f32,
        ring: Option<u32>,
        fumble: bool,
    }

    impl Autopilot {
        fn new(seed: u64, skill: f32) -> Self {
            Self {
                rng: Pcg32::seed_from_u64(seed.rotate_left(17)),
                skill: skill.clamp(0.0, 1.0),
                ring: None,
                fumble: false,
            }
        }

        fn steer(&mut self, state: &GameState) -> f32 {
            if state.phase != GamePhase::Playing {
                return 0.0;
            }
            let Some(ring) = state
                .rings
                .iter()
                .filter(|r| r.z > HIT_BAND_NEAR_Z)
                .min_by(|a, b| a.z.total_cmp(&b.z))
            else {
                return 0.0;
            };

            if self.ring != Some(ring.id) {
                self.ring = Some(ring.id);
                self.fumble = self.rng.random::<f32>() >= self.skill;
            }

            let target = ring
                .segments
                .iter()
                .find(|s| (s.color == state.ball.color) != self.fumble)
                .map(|s| s.mid_angle());
            match target {
                Some(target) => angle_delta(normalize_angle(state.ball.angle), target)
                    .clamp(-MAX_TURN, MAX_TURN),
                None => 0.0,
            }
        }
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();
        platform::init_logging();
        log::info!("Color Ring (native) starting...");

        let tuning = match &args.tuning {
            Some(path) => Tuning::load_from_file(path)?,
            None => Tuning::default(),
        };

        let mut store = FileStore::open(&args.store);
        if let Some(name) = &args.quality {
            let quality = QualityPreset::parse(name)
                .with_context(|| format!("unknown quality preset {name:?}"))?;
            let mut settings = Settings::load(&store);
            settings.quality = quality;
            settings.save(&mut store);
        }
        log::info!("Using store {}", store.path().display());

        let seed = args.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });

        let viewport = Viewport::new(args.width, args.height);
        let mut host = GameHost::new(seed, tuning, viewport, store);
        let mut pilot = Autopilot::new(seed, args.skill);

        if host.should_show_tutorial() {
            log::info!("First run: drag or use the arrow keys to match the ball to the ring");
            host.acknowledge_tutorial();
        }

        let mut sessions = 0u32;
        let mut matches = 0u64;
        let mut best_run = 0u64;
        host.command(Command::Start);

        for _ in 0..args.frames {
            host.rotate(pilot.steer(&host.state));
            for event in host.frame() {
                match event {
                    GameEvent::SessionStarted => sessions += 1,
                    GameEvent::RingMatched { .. } => matches += 1,
                    GameEvent::GameOver { score, .. } => {
                        best_run = best_run.max(score);
                        host.command(Command::Restart);
                    }
                    _ => {}
                }
            }
        }

        log::info!(
            "Simulated {} frames: {} sessions, {} matches, best run {}, all-time best {}",
            args.frames,
            sessions,
            matches,
            best_run,
            host.records.best_score
        );
        if args.snapshot {
            let json = serde_json::to_string_pretty(&host.snapshot()).context("encode snapshot")?;
            println!("{json}");
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `platform::web::WebGame`, this is just to satisfy the compiler
}
