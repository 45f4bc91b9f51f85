//! Spinner for the loading state.
//!
//! A bar that slides across a dotted track and back, pausing at each end.

use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Spinner {
    /// Width of the track in characters.
    track_width: u16,
    /// Length of the bar.
    snake_len: u16,
    /// Pause frames at right end.
    right_pause: usize,
    /// Pause frames at left end.
    left_pause: usize,
    /// Frame duration in milliseconds.
    frame_ms: u64,
    frames: Vec<String>,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new(8, 4)
    }
}

impl Spinner {
    pub fn new(track_width: u16, snake_len: u16) -> Self {
        let mut spinner = Self {
            track_width,
            snake_len: snake_len.clamp(1, track_width.max(1)),
            right_pause: 1,
            left_pause: 6,
            frame_ms: 80,
            frames: Vec::new(),
        };
        spinner.frames = spinner.generate_frames();
        spinner
    }

    /// How often the frame should advance.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    /// The frame to show at `tick`.
    pub fn frame(&self, tick: usize) -> &str {
        if self.frames.is_empty() {
            return "";
        }
        &self.frames[tick % self.frames.len()]
    }

    fn generate_frames(&self) -> Vec<String> {
        let mut frames = Vec::new();
        let track_width = self.track_width as i32;
        let snake_len = self.snake_len as i32;

        for head_pos in 0..=(track_width + snake_len - 2) {
            frames.push(self.make_frame(head_pos));
        }
        for _ in 0..self.right_pause {
            frames.push(self.make_frame(-1));
        }
        for head_pos in (0..=(track_width + snake_len - 2)).rev() {
            frames.push(self.make_frame(head_pos));
        }
        for _ in 0..self.left_pause {
            frames.push(self.make_frame(-1));
        }

        frames
    }

    fn make_frame(&self, head_pos: i32) -> String {
        let snake_start = head_pos - self.snake_len as i32 + 1;
        (0..self.track_width as i32)
            .map(|i| {
                if head_pos >= 0 && i >= snake_start && i <= head_pos {
                    '■'
                } else {
                    '·'
                }
            })
            .collect()
    }
}
