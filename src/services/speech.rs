//! Read-aloud playback control.
//!
//! The synthesis engine itself is an opaque boundary: [`SpeechSynthesizer`]
//! takes plain text and produces audio somewhere. This module owns what the
//! engine cannot know — the sentence queue, the playback position, and the
//! difference between an utterance that ended because the user paused and
//! one that ended on its own. That difference is carried in the state value
//! (`Pausing` vs `Playing` at finish time), not in a side-channel flag.

use tracing::{debug, info};

use crate::services::extractor;
use crate::types::errors::SpeechError;

/// Opaque synthesis engine boundary. `speak` starts one utterance; the
/// embedding code calls [`SpeechController::finish_utterance`] when the
/// engine reports that the utterance ended (naturally or via `stop`).
pub trait SpeechSynthesizer {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError>;
    fn stop(&mut self);
}

/// Synthesizer that produces log lines instead of audio. Default engine
/// for headless builds and tests.
pub struct NullSynthesizer {
    utterances: usize,
}

impl NullSynthesizer {
    pub fn new() -> Self {
        Self { utterances: 0 }
    }

    /// Number of utterances spoken so far.
    pub fn utterance_count(&self) -> usize {
        self.utterances
    }
}

impl Default for NullSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechSynthesizer for NullSynthesizer {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        self.utterances += 1;
        debug!(chars = text.len(), "null synthesizer speaking");
        Ok(())
    }

    fn stop(&mut self) {
        debug!("null synthesizer stopped");
    }
}

/// Playback states. Every control operation is a transition between these;
/// `Pausing` exists so that an utterance ending under a pause request is
/// never mistaken for natural completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing queued.
    Idle,
    /// An utterance is in flight.
    Playing,
    /// Pause requested; waiting for the engine to wind down the current
    /// utterance.
    Pausing,
    /// Paused mid-queue; `resume` re-speaks the current sentence.
    Paused,
    /// Stopped by the user; the queue position is discarded.
    Stopped,
    /// The queue ran out naturally.
    Completed,
}

/// Drives a [`SpeechSynthesizer`] through a sentence queue.
pub struct SpeechController<S: SpeechSynthesizer> {
    synthesizer: S,
    sentences: Vec<String>,
    position: usize,
    state: PlaybackState,
}

impl<S: SpeechSynthesizer> SpeechController<S> {
    pub fn new(synthesizer: S) -> Self {
        Self {
            synthesizer,
            sentences: Vec::new(),
            position: 0,
            state: PlaybackState::Idle,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current position and queue length.
    pub fn progress(&self) -> (usize, usize) {
        (self.position, self.sentences.len())
    }

    /// Sentence at the playback position, if the queue is non-empty.
    pub fn current_sentence(&self) -> Option<&str> {
        self.sentences.get(self.position).map(String::as_str)
    }

    /// Queues `text` and starts speaking from the first sentence. Replaces
    /// any prior queue. Text with no sentences leaves the controller idle.
    pub fn play(&mut self, text: &str) -> Result<(), SpeechError> {
        self.synthesizer.stop();
        self.sentences = split_sentences(text);
        self.position = 0;
        if self.sentences.is_empty() {
            self.state = PlaybackState::Idle;
            return Ok(());
        }
        info!(sentences = self.sentences.len(), "speech playback started");
        self.state = PlaybackState::Playing;
        self.speak_current()
    }

    /// Requests a pause. The state moves to `Pausing` until the engine
    /// confirms the utterance ended; `finish_utterance` then settles it to
    /// `Paused` instead of advancing.
    pub fn pause(&mut self) -> Result<(), SpeechError> {
        if self.state != PlaybackState::Playing {
            return Err(SpeechError::NothingPlaying);
        }
        self.state = PlaybackState::Pausing;
        self.synthesizer.stop();
        Ok(())
    }

    /// Resumes from a pause, re-speaking the sentence that was interrupted.
    pub fn resume(&mut self) -> Result<(), SpeechError> {
        if self.state != PlaybackState::Paused {
            return Err(SpeechError::NothingPlaying);
        }
        self.state = PlaybackState::Playing;
        self.speak_current()
    }

    /// Stops playback outright from any state and rewinds the position.
    pub fn stop(&mut self) {
        self.synthesizer.stop();
        self.position = 0;
        self.state = PlaybackState::Stopped;
    }

    /// Jumps to the given sentence (clamped to the queue). When playing,
    /// the new sentence is spoken immediately.
    pub fn seek(&mut self, index: usize) -> Result<(), SpeechError> {
        if self.sentences.is_empty() {
            return Err(SpeechError::NothingPlaying);
        }
        self.position = index.min(self.sentences.len() - 1);
        if self.state == PlaybackState::Playing {
            self.synthesizer.stop();
            return self.speak_current();
        }
        Ok(())
    }

    /// Called when the engine reports that the current utterance ended.
    ///
    /// Under a pause request the position stays put and the state settles
    /// to `Paused`. During normal play the queue advances; running off the
    /// end is `Completed`. In any other state the signal is stale (a
    /// stopped engine winding down) and is ignored.
    pub fn finish_utterance(&mut self) -> Result<(), SpeechError> {
        match self.state {
            PlaybackState::Pausing => {
                self.state = PlaybackState::Paused;
                Ok(())
            }
            PlaybackState::Playing => {
                self.position += 1;
                if self.position >= self.sentences.len() {
                    info!("speech playback completed");
                    self.state = PlaybackState::Completed;
                    Ok(())
                } else {
                    self.speak_current()
                }
            }
            _ => Ok(()),
        }
    }

    fn speak_current(&mut self) -> Result<(), SpeechError> {
        match self.sentences.get(self.position) {
            Some(sentence) => {
                let sentence = sentence.clone();
                self.synthesizer.speak(&sentence)
            }
            None => Err(SpeechError::NothingPlaying),
        }
    }
}

/// Plain text fed to the synthesizer for an article body: tags stripped,
/// entities decoded, whitespace collapsed. Highlight spans contribute their
/// text like any other inline markup.
pub fn speech_text(html: &str) -> String {
    let stripped = extractor::strip_tags(html);
    let decoded = extractor::decode_entities(&stripped);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits text into sentences on terminal punctuation. A trailing fragment
/// without punctuation still counts as a sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }
    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}
