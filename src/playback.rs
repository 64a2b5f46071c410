//! 播放模块：AudioBuffer 的播放接口与单一活动音源控制。
//!
//! Playback seam.
//!
//! Real audio output lives outside this crate; it plugs in through
//! [`PlaybackSink`]. A [`Player`] is the explicit handle to that output and
//! keeps at most one [`PlaybackSource`] alive: starting a new one stops and
//! releases the previous one first.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`PlaybackSink`] | Trait for audio output destinations |
//! | [`NoopPlaybackSink`] | Sink that accepts buffers and plays nothing |
//! | [`InMemoryPlaybackSink`] | Records start/stop events, for testing |
//! | [`Player`] | Single-source playback handle |

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::codec::AudioBuffer;
use crate::Result;

/// An audio output that can start playing a buffer.
pub trait PlaybackSink: Send + Sync {
    fn start(&self, buffer: Arc<AudioBuffer>) -> Result<Box<dyn PlaybackSource>>;
}

/// A playing (or finished) buffer. Dropping a source must release its resources.
pub trait PlaybackSource: Send {
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
}

/// Sink that accepts every buffer and produces silent, already-finished sources.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPlaybackSink;

struct FinishedSource;

impl PlaybackSource for FinishedSource {
    fn stop(&mut self) {}
    fn is_playing(&self) -> bool {
        false
    }
}

impl PlaybackSink for NoopPlaybackSink {
    fn start(&self, _buffer: Arc<AudioBuffer>) -> Result<Box<dyn PlaybackSource>> {
        Ok(Box::new(FinishedSource))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Started {
        id: u64,
        sample_rate: u32,
        channel_count: u16,
        frame_count: usize,
    },
    Stopped {
        id: u64,
    },
}

/// In-memory sink for testing.
#[derive(Default)]
pub struct InMemoryPlaybackSink {
    events: Arc<RwLock<Vec<PlaybackEvent>>>,
    next_id: AtomicU64,
}

impl InMemoryPlaybackSink {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn events(&self) -> Vec<PlaybackEvent> {
        self.events.read().unwrap().clone()
    }
    pub fn started_count(&self) -> usize {
        self.events
            .read()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, PlaybackEvent::Started { .. }))
            .count()
    }
}

struct RecordingSource {
    id: u64,
    playing: bool,
    events: Arc<RwLock<Vec<PlaybackEvent>>>,
}

impl PlaybackSource for RecordingSource {
    fn stop(&mut self) {
        if self.playing {
            self.playing = false;
            self.events
                .write()
                .unwrap()
                .push(PlaybackEvent::Stopped { id: self.id });
        }
    }
    fn is_playing(&self) -> bool {
        self.playing
    }
}

impl Drop for RecordingSource {
    fn drop(&mut self) {
        self.stop();
    }
}

impl PlaybackSink for InMemoryPlaybackSink {
    fn start(&self, buffer: Arc<AudioBuffer>) -> Result<Box<dyn PlaybackSource>> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.events.write().unwrap().push(PlaybackEvent::Started {
            id,
            sample_rate: buffer.sample_rate(),
            channel_count: buffer.channel_count(),
            frame_count: buffer.frame_count(),
        });
        Ok(Box::new(RecordingSource {
            id,
            playing: true,
            events: self.events.clone(),
        }))
    }
}

/// Explicit playback handle holding at most one live source.
pub struct Player {
    sink: Arc<dyn PlaybackSink>,
    current: Mutex<Option<Box<dyn PlaybackSource>>>,
}

impl Player {
    pub fn new(sink: Arc<dyn PlaybackSink>) -> Self {
        Self {
            sink,
            current: Mutex::new(None),
        }
    }

    /// Stops and releases the current source, if any.
    pub fn stop(&self) {
        let previous = self.current.lock().unwrap().take();
        if let Some(mut source) = previous {
            source.stop();
            tracing::debug!("released previous playback source");
        }
    }

    /// Plays `buffer`, stopping whatever was playing before.
    pub fn play(&self, buffer: Arc<AudioBuffer>) -> Result<()> {
        let mut current = self.current.lock().unwrap();
        if let Some(mut source) = current.take() {
            source.stop();
        }
        *current = Some(self.sink.start(buffer)?);
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        self.current
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.is_playing())
            .unwrap_or(false)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Arc::new(NoopPlaybackSink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(frames: usize) -> Arc<AudioBuffer> {
        Arc::new(AudioBuffer::from_channels(24_000, vec![vec![0.0; frames]]).unwrap())
    }

    #[test]
    fn test_play_stops_previous_source() {
        let sink = Arc::new(InMemoryPlaybackSink::new());
        let player = Player::new(sink.clone());

        player.play(buffer(10)).unwrap();
        player.play(buffer(20)).unwrap();
        assert!(player.is_playing());

        assert_eq!(
            sink.events(),
            vec![
                PlaybackEvent::Started {
                    id: 0,
                    sample_rate: 24_000,
                    channel_count: 1,
                    frame_count: 10
                },
                PlaybackEvent::Stopped { id: 0 },
                PlaybackEvent::Started {
                    id: 1,
                    sample_rate: 24_000,
                    channel_count: 1,
                    frame_count: 20
                },
            ]
        );
    }

    #[test]
    fn test_stop_releases_source() {
        let sink = Arc::new(InMemoryPlaybackSink::new());
        let player = Player::new(sink.clone());
        player.play(buffer(5)).unwrap();
        player.stop();
        assert!(!player.is_playing());
        assert_eq!(sink.events().last(), Some(&PlaybackEvent::Stopped { id: 0 }));

        // stopping twice is harmless
        player.stop();
        assert_eq!(sink.events().len(), 2);
    }

    #[test]
    fn test_stopped_source_records_one_stop_on_drop() {
        let sink = InMemoryPlaybackSink::new();
        let mut source = sink.start(buffer(3)).unwrap();
        assert!(source.is_playing());
        source.stop();
        assert!(!source.is_playing());
        drop(source);
        assert_eq!(
            sink.events().iter().filter(|e| matches!(e, PlaybackEvent::Stopped { .. })).count(),
            1
        );
    }

    #[test]
    fn test_noop_sink() {
        let player = Player::default();
        player.play(buffer(1)).unwrap();
        assert!(!player.is_playing());
    }
}
