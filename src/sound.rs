use anyhow::Context;
use flappy_term::GameEvent;
use fundsp::prelude::*;
use rodio::{OutputStream, OutputStreamBuilder, Sink, buffer::SamplesBuffer};

const SAMPLE_RATE: u32 = 44_100;

// ── Sounds ──────────────────────────────────────────────────────────────────

fn render(mut unit: impl AudioUnit, secs: f64) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    let samples = (secs * SAMPLE_RATE as f64) as usize;
    (0..samples).map(|_| unit.get_mono()).collect()
}

/// Quick rising chirp.
fn jump_cue() -> Vec<f32> {
    let freq = lfo(|t: f64| lerp(300.0, 900.0, (t / 0.12).min(1.0)));
    let gain = lfo(|t: f64| lerp(0.2, 0.0, (t / 0.15).min(1.0)));
    render((freq >> sine::<f32>()) * gain, 0.15)
}

/// Two-note ding.
fn score_cue() -> Vec<f32> {
    let freq = lfo(|t: f64| lerp(880.0, 1320.0, (t / 0.08).floor().min(1.0)));
    let gain = lfo(|t: f64| lerp(0.12, 0.0, (t / 0.25).min(1.0)));
    render((freq >> square()) * gain, 0.25)
}

/// Sawtooth sliding from 400Hz down to 80Hz.
fn death_cue() -> Vec<f32> {
    let freq = lfo(|t: f64| lerp(400.0, 80.0, (t / 0.4).min(1.0)));
    let gain = lfo(|t: f64| lerp(0.15, 0.0, (t / 0.5).min(1.0)));
    render((freq >> saw()) * gain, 0.5)
}

/// Pre-rendered cues for the session events, played on the default output.
pub struct Sounds {
    stream: OutputStream,
    jump: Vec<f32>,
    score: Vec<f32>,
    death: Vec<f32>,
}

impl Sounds {
    pub fn open() -> anyhow::Result<Self> {
        let mut stream =
            OutputStreamBuilder::open_default_stream().context("opening audio output")?;
        // the notice would land on the restored terminal at exit
        stream.log_on_drop(false);
        Ok(Self {
            stream,
            jump: jump_cue(),
            score: score_cue(),
            death: death_cue(),
        })
    }

    pub fn play(&self, event: GameEvent) {
        let samples = match event {
            GameEvent::Jumped => &self.jump,
            GameEvent::Scored => &self.score,
            GameEvent::Died => &self.death,
            GameEvent::Landed => return,
        };
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.clone()));
        sink.detach(); // Play in background
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_are_audible_and_bounded() {
        for (cue, secs) in [(jump_cue(), 0.15), (score_cue(), 0.25), (death_cue(), 0.5)] {
            assert_eq!(cue.len(), (secs * SAMPLE_RATE as f64) as usize);
            assert!(cue.iter().any(|s| s.abs() > 0.01));
            assert!(cue.iter().all(|s| s.abs() <= 1.0));
        }
    }
}
