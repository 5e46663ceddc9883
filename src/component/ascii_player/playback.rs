use crate::component::gif_converter::AsciiSequence;
use crate::signal::CancellationToken;
use log::debug;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

/// 游標回到左上並清除捲動緩衝
pub const CURSOR_HOME: &str = "\x1b[H\x1b[3J";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Rendering,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackReport {
    pub state: PlaybackState,
    pub frames_rendered: u64,
}

/// 無限循環播放，直到取消
///
/// 每個影格開始前檢查一次取消旗標，停止延遲最多一個影格間隔
pub struct Playback<'a> {
    sequence: &'a AsciiSequence,
    interval: Duration,
    prompt: String,
    state: PlaybackState,
}

impl<'a> Playback<'a> {
    #[must_use]
    pub fn new(sequence: &'a AsciiSequence, fps: u32, prompt: impl Into<String>) -> Self {
        Self {
            sequence,
            interval: frame_interval(fps),
            prompt: prompt.into(),
            state: PlaybackState::Idle,
        }
    }

    pub fn run<W: Write>(&mut self, out: &mut W, cancel: &CancellationToken) -> io::Result<PlaybackReport> {
        let mut frames_rendered = 0;

        if self.sequence.is_empty() {
            debug!("Nothing to play");
            return Ok(PlaybackReport {
                state: self.state,
                frames_rendered,
            });
        }

        self.state = PlaybackState::Rendering;
        for frame in self.sequence.frames().iter().cycle() {
            if cancel.is_cancelled() {
                break;
            }

            write!(out, "{CURSOR_HOME}{frame}\n{}", self.prompt)?;
            out.flush()?;
            frames_rendered += 1;

            thread::sleep(self.interval);
        }
        self.state = PlaybackState::Stopped;

        debug!("Playback stopped after {frames_rendered} frame(s)");
        Ok(PlaybackReport {
            state: self.state,
            frames_rendered,
        })
    }
}

#[must_use]
pub fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    /// 可在執行緒間共享的輸出緩衝
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_frame_interval() {
        assert_eq!(frame_interval(10), Duration::from_millis(100));
        assert_eq!(frame_interval(1), Duration::from_secs(1));
        assert_eq!(frame_interval(0), Duration::from_secs(1));
    }

    #[test]
    fn test_empty_sequence_is_noop() {
        let sequence = AsciiSequence::default();
        let mut playback = Playback::new(&sequence, 30, "prompt");
        let mut out = Vec::new();

        let report = playback.run(&mut out, &CancellationToken::new()).unwrap();

        assert_eq!(report.state, PlaybackState::Idle);
        assert_eq!(report.frames_rendered, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_cancelled_before_start_renders_nothing() {
        let sequence = AsciiSequence::new(vec!["ab".to_string()]);
        let mut playback = Playback::new(&sequence, 30, "prompt");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut out = Vec::new();

        let report = playback.run(&mut out, &cancel).unwrap();

        assert_eq!(report.state, PlaybackState::Stopped);
        assert_eq!(report.frames_rendered, 0);
    }

    #[test]
    fn test_loops_and_stops_within_one_interval() {
        let sequence = AsciiSequence::new(vec!["A".to_string(), "B".to_string()]);
        let cancel = CancellationToken::new();
        let buffer = SharedBuffer::default();

        let handle = {
            let cancel = cancel.clone();
            let mut out = buffer.clone();
            thread::spawn(move || {
                let mut playback = Playback::new(&sequence, 50, "<Enter>");
                playback.run(&mut out, &cancel).unwrap()
            })
        };

        thread::sleep(Duration::from_millis(200));
        let cancelled_at = Instant::now();
        cancel.cancel();
        let report = handle.join().unwrap();
        let stop_latency = cancelled_at.elapsed();

        assert_eq!(report.state, PlaybackState::Stopped);
        assert!(report.frames_rendered >= 3, "should wrap past the last frame");
        assert!(stop_latency < Duration::from_millis(120));

        let output = buffer.contents();
        let expected_start = format!("{CURSOR_HOME}A\n<Enter>{CURSOR_HOME}B\n<Enter>{CURSOR_HOME}A");
        assert!(output.starts_with(&expected_start));
    }
}
