/// Audio cues and the sinks that play them.

use std::io::Write;

use tracing::trace;

use crate::entities::FrameEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCue {
    Shoot,
    Impact,
    Music,
}

impl AudioCue {
    pub fn volume(self) -> f32 {
        match self {
            AudioCue::Shoot => 0.2,
            AudioCue::Impact => 1.0,
            AudioCue::Music => 0.5,
        }
    }

    /// The cue a tick event asks for, if any.
    pub fn for_event(event: &FrameEvent) -> Option<AudioCue> {
        match event {
            FrameEvent::Shot => Some(AudioCue::Shoot),
            FrameEvent::Impact => Some(AudioCue::Impact),
            _ => None,
        }
    }
}

pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Drops every cue.
#[derive(Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, cue: AudioCue) {
        trace!(?cue, "audio_cue_dropped");
    }
}

/// Rings the terminal bell on impacts. Shots are too frequent for a bell.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play(&mut self, cue: AudioCue) {
        trace!(?cue, volume = cue.volume(), "audio_cue");
        if cue == AudioCue::Impact {
            let _ = self.out.write_all(b"\x07");
            let _ = self.out.flush();
        }
    }
}

/// Forward the audible events of one tick to `sink`.
pub fn play_events(sink: &mut dyn AudioSink, events: &[FrameEvent]) {
    for cue in events.iter().filter_map(AudioCue::for_event) {
        sink.play(cue);
    }
}
