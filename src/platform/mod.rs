//! Platform abstraction layer
//!
//! The simulation only produces values. These traits are the seams where a
//! host plugs in:
//! - Time/ticks (`Clock`)
//! - Drawing (`Renderer`)
//! - Sound (`AudioSink`)
//! - Storage of finished runs (`SessionRecorder`)

pub mod time;

pub use time::{Clock, FixedClock, SystemClock};

use crate::error::RecordError;
use crate::sim::{GameEvent, SessionResult, Snapshot, TickOutput};

/// Consumes one snapshot per tick
pub trait Renderer {
    fn present(&mut self, snapshot: &Snapshot);
}

/// Consumes discrete sound cues
pub trait AudioSink {
    fn play(&mut self, event: GameEvent);
}

/// Stores completed runs in whatever format it likes
pub trait SessionRecorder {
    fn record(&mut self, result: &SessionResult) -> Result<(), RecordError>;
}

/// Fan a tick's output out to the collaborators.
///
/// A failing recorder is logged and otherwise ignored; the output is only
/// borrowed, so nothing here can reach back into simulation state.
pub fn dispatch(
    output: &TickOutput,
    renderer: &mut impl Renderer,
    audio: &mut impl AudioSink,
    recorder: &mut impl SessionRecorder,
) {
    renderer.present(&output.snapshot);
    for &event in &output.events {
        audio.play(event);
    }
    if let Some(result) = &output.session {
        if let Err(e) = recorder.record(result) {
            log::warn!("Failed to record session (score {}): {}", result.score, e);
        }
    }
}
