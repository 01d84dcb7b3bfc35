//! Run controller and per-tick update
//!
//! Owns every entity, the score and the run phase. Each tick consumes the
//! inputs delivered since the last one, then (while Active) advances actor,
//! obstacles and distractor in that order and resolves collisions.

use std::time::Duration;

use super::actor::Actor;
use super::distractor::Distractor;
use super::obstacle::ObstacleField;
use super::rng::RandomSource;
use super::state::{
    ActorPose, DistractorView, FrustrationRating, GameEvent, GamePhase, InputEvent, ObstacleView,
    SessionResult, Snapshot, TickOutput,
};
use crate::error::SimError;
use crate::platform::Clock;
use crate::tuning::Tuning;

/// Drives runs from start to rated result
#[derive(Debug, Clone)]
pub struct RunController<R: RandomSource> {
    tuning: Tuning,
    rng: R,
    pub phase: GamePhase,
    pub score: u32,
    pub actor: Actor,
    pub field: ObstacleField,
    pub distractor: Distractor,
    pub started_at: Option<Duration>,
    pub ended_at: Option<Duration>,
    pub frustration_rating: Option<FrustrationRating>,
    /// Completed runs since construction
    runs: u32,
}

impl<R: RandomSource> RunController<R> {
    pub fn new(tuning: Tuning, rng: R) -> Result<Self, SimError> {
        tuning.validate()?;
        Ok(Self {
            actor: Actor::new(&tuning),
            field: ObstacleField::new(),
            distractor: Distractor::new(),
            tuning,
            rng,
            phase: GamePhase::Idle,
            score: 0,
            started_at: None,
            ended_at: None,
            frustration_rating: None,
            runs: 0,
        })
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Number of runs whose result has been produced
    pub fn completed_runs(&self) -> u32 {
        self.runs
    }

    /// Pull timing from `clock` and run one tick
    pub fn tick(&mut self, clock: &mut impl Clock, inputs: &[InputEvent]) -> TickOutput {
        let dt = clock.tick();
        let now = clock.elapsed_since_start();
        self.update(inputs, now, dt)
    }

    /// One tick at clock time `now`, `dt` after the previous one
    pub fn update(&mut self, inputs: &[InputEvent], now: Duration, dt: Duration) -> TickOutput {
        let mut events = Vec::new();
        let mut session = None;
        let mut quit = false;

        for &input in inputs {
            match (self.phase, input) {
                (_, InputEvent::Quit) => {
                    quit = true;
                    if self.phase == GamePhase::AwaitingRating {
                        // Keep the run even though it was never rated
                        session = Some(self.finish(None));
                    }
                    log::info!("Quit requested");
                    break;
                }
                (GamePhase::Idle, InputEvent::Start)
                | (GamePhase::Ended, InputEvent::Start | InputEvent::Restart) => {
                    self.start_run(now);
                }
                (GamePhase::Active, InputEvent::Jump) => {
                    self.actor.apply_impulse();
                    events.push(GameEvent::Jump);
                }
                (GamePhase::AwaitingRating, InputEvent::Rate(rating)) => {
                    session = Some(self.finish(Some(rating)));
                }
                // Anything else is meaningless in this phase
                _ => {}
            }
        }

        if !quit && self.phase == GamePhase::Active {
            self.step(now, dt, &mut events);
        }

        TickOutput {
            snapshot: self.snapshot(),
            events,
            session,
            quit,
        }
    }

    /// Advance the running simulation
    fn step(&mut self, now: Duration, dt: Duration, events: &mut Vec<GameEvent>) {
        let frames = self.tuning.frames(dt);
        let run_elapsed = now.saturating_sub(self.started_at.unwrap_or(now));

        self.actor.update(frames);

        let hitbox = self.actor.hitbox();
        let mut gained = 0;
        let field_tick = self.field.tick(
            frames,
            run_elapsed,
            self.actor.scoring_line(),
            &hitbox,
            &self.tuning,
            &mut self.rng,
            |_| gained += 1,
        );
        self.score += gained;

        if self
            .distractor
            .tick(frames, run_elapsed, &self.tuning, &mut self.rng)
        {
            events.push(GameEvent::DistractorAppear);
        }

        let out_of_field = self.actor.out_of_field(self.tuning.field_height);
        if field_tick.collided || out_of_field {
            self.phase = GamePhase::AwaitingRating;
            self.ended_at = Some(now);
            // Only shown while a run is in progress
            self.distractor.visible = false;
            events.push(GameEvent::Collision);
            log::info!(
                "Run ended after {:.1}s with score {} ({})",
                run_elapsed.as_secs_f32(),
                self.score,
                if out_of_field { "left field" } else { "hit obstacle" }
            );
        }
    }

    fn start_run(&mut self, now: Duration) {
        self.actor = Actor::new(&self.tuning);
        self.field.reset(&self.tuning, &mut self.rng);
        self.distractor.reset();
        self.score = 0;
        self.started_at = Some(now);
        self.ended_at = None;
        self.frustration_rating = None;
        self.phase = GamePhase::Active;
        log::info!("Run {} started at {:.2}s", self.runs + 1, now.as_secs_f32());
    }

    /// Close out the run awaiting a rating
    fn finish(&mut self, rating: Option<FrustrationRating>) -> SessionResult {
        let ended_at = self.ended_at.unwrap_or_default();
        let started_at = self.started_at.unwrap_or(ended_at);
        self.frustration_rating = rating;
        self.phase = GamePhase::Ended;
        self.runs += 1;
        SessionResult {
            score: self.score,
            started_at,
            ended_at,
            duration: ended_at.saturating_sub(started_at),
            frustration_rating: rating,
        }
    }

    /// Renderable view of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            speed_multiplier: self.field.speed_multiplier,
            actor: ActorPose {
                pos: self.actor.pos,
                vel_y: self.actor.vel_y,
                bounds: self.actor.bounds(),
                hitbox: self.actor.hitbox(),
            },
            obstacles: self
                .field
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    top: o.top_barrier(),
                    bottom: o.bottom_barrier(),
                    scored: o.scored,
                })
                .collect(),
            distractor: DistractorView {
                visible: self.distractor.visible,
                pos: self.distractor.pos,
                scale: self.distractor.size_factor,
                bounds: self.distractor.bounds(&self.tuning),
            },
        }
    }
}
