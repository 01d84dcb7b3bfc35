//! Gap Runner entry point
//!
//! Headless native driver: registers the player, plays a few runs with a
//! simple autopilot on a fixed-step clock, appends each finished session to
//! the session log and prints the leaderboard.
//!
//! Usage: `gap-runner [seed] [player] [tuning.json] [data-dir]`

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use gap_runner::HighScores;
use gap_runner::Tuning;
use gap_runner::platform::{AudioSink, FixedClock, Renderer, dispatch};
use gap_runner::records::{PlayerRegistry, SessionLog, SessionStore};
use gap_runner::sim::{
    FrustrationRating, GameEvent, GamePhase, InputEvent, PcgSource, RunController, Snapshot,
};

/// Runs to play before exiting
const DEMO_RUNS: u32 = 3;
/// Give up on a run that somehow never ends (10 minutes of frames)
const MAX_TICKS_PER_RUN: u32 = 70 * 600;

/// Tracks the last snapshot so the autopilot can see the field
#[derive(Default)]
struct HeadlessRenderer {
    last: Option<Snapshot>,
    frames: u64,
}

impl Renderer for HeadlessRenderer {
    fn present(&mut self, snapshot: &Snapshot) {
        self.frames += 1;
        self.last = Some(snapshot.clone());
    }
}

struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, event: GameEvent) {
        log::debug!("Sound cue: {:?}", event);
    }
}

/// Jump when the actor sinks below the middle of the next gap
fn autopilot(snapshot: &Snapshot, aim_offset: f32) -> bool {
    let actor = &snapshot.actor;
    let target = snapshot
        .obstacles
        .iter()
        .find(|o| o.top.right() >= actor.bounds.left())
        .map(|o| (o.top.bottom() + o.bottom.top()) / 2.0)
        .unwrap_or(200.0);
    actor.vel_y > 0.0 && actor.pos.y > target + aim_offset
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5eed_u64);
    let player = args.next().unwrap_or_else(|| "demo".to_string());
    let tuning = match args.next() {
        Some(path) if !path.is_empty() => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        _ => Tuning::default(),
    };
    let data_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));
    std::fs::create_dir_all(&data_dir)?;
    let players_path = data_dir.join("players.json");
    let sessions_path = data_dir.join("sessions.jsonl");
    let scores_path = data_dir.join("highscores.json");

    // IDs come from wall-clock entropy so they do not repeat across seeds
    let id_seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(seed);
    let mut registry = PlayerRegistry::load(&players_path)?;
    let player = registry.get_or_create(&player, &mut PcgSource::new(id_seed));
    registry.save(&players_path)?;
    log::info!("Welcome, {} (player ID {})", player.name, player.id);

    log::info!("Gap Runner (headless) starting, seed {}", seed);

    let clock_fps = tuning.nominal_fps;
    let mut controller = RunController::new(tuning, PcgSource::new(seed))?;
    let mut clock = FixedClock::at_fps(clock_fps);
    let mut renderer = HeadlessRenderer::default();
    let mut audio = LogAudio;
    let mut recorder = SessionStore::new(
        player,
        SessionLog::open(&sessions_path)?,
        HighScores::load(&scores_path),
    )
    .with_scores_file(&scores_path);

    let mut inputs = vec![InputEvent::Start];
    let mut ticks_this_run = 0;
    let mut run = 0;
    loop {
        let output = controller.tick(&mut clock, &inputs);
        dispatch(&output, &mut renderer, &mut audio, &mut recorder);
        inputs.clear();

        if output.quit {
            break;
        }

        match output.snapshot.phase {
            GamePhase::Active => {
                ticks_this_run += 1;
                // Later runs aim a little lower so scores differ
                let aim = run as f32 * 10.0;
                if ticks_this_run > MAX_TICKS_PER_RUN {
                    inputs.push(InputEvent::Quit);
                } else if autopilot(&output.snapshot, aim) {
                    inputs.push(InputEvent::Jump);
                }
            }
            GamePhase::AwaitingRating => {
                // Rate higher the shorter the run was
                let rating = match output.snapshot.score {
                    0..=2 => 3,
                    3..=9 => 2,
                    _ => 1,
                };
                inputs.push(InputEvent::Rate(FrustrationRating::try_from(rating)?));
            }
            GamePhase::Ended => {
                run += 1;
                ticks_this_run = 0;
                if run >= DEMO_RUNS {
                    inputs.push(InputEvent::Quit);
                } else {
                    inputs.push(InputEvent::Restart);
                }
            }
            GamePhase::Idle => inputs.push(InputEvent::Start),
        }
    }

    log::info!(
        "Played {} runs over {} frames",
        controller.completed_runs(),
        renderer.frames
    );
    if let Some(last) = &renderer.last {
        log::debug!("Final speed multiplier x{:.2}", last.speed_multiplier);
    }
    log::info!("Sessions appended to {}", sessions_path.display());
    println!("{}", recorder.scores.to_json()?);
    Ok(())
}
