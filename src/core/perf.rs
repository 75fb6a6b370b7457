//! Frame rate sampling for the viewer and the headless summary

use std::collections::VecDeque;

pub const FPS_WINDOW_SECONDS: f32 = 1.0;
pub const FPS_HISTORY_LEN: usize = 60;

/// Counts frames over fixed windows and keeps the most recent FPS samples
#[derive(Debug, Clone)]
pub struct FrameStats {
    window: f32,
    history_len: usize,
    frames_in_window: u32,
    elapsed_in_window: f32,
    total_frames: u64,
    total_time: f32,
    history: VecDeque<f32>,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(FPS_WINDOW_SECONDS, FPS_HISTORY_LEN)
    }
}

impl FrameStats {
    pub fn new(window: f32, history_len: usize) -> Self {
        Self {
            window,
            history_len: history_len.max(1),
            frames_in_window: 0,
            elapsed_in_window: 0.0,
            total_frames: 0,
            total_time: 0.0,
            history: VecDeque::with_capacity(history_len),
        }
    }

    /// Record one frame. Returns the new sample when a window closes.
    pub fn record(&mut self, delta: f32) -> Option<f32> {
        self.frames_in_window += 1;
        self.elapsed_in_window += delta;
        self.total_frames += 1;
        self.total_time += delta;

        if self.elapsed_in_window < self.window {
            return None;
        }

        let fps = self.frames_in_window as f32 / self.elapsed_in_window;
        if self.history.len() == self.history_len {
            self.history.pop_front();
        }
        self.history.push_back(fps);
        self.frames_in_window = 0;
        self.elapsed_in_window = 0.0;
        Some(fps)
    }

    /// Latest completed sample
    pub fn current(&self) -> Option<f32> {
        self.history.back().copied()
    }

    pub fn average(&self) -> Option<f32> {
        if self.history.is_empty() {
            return None;
        }
        Some(self.history.iter().sum::<f32>() / self.history.len() as f32)
    }

    pub fn minimum(&self) -> Option<f32> {
        self.history.iter().copied().reduce(f32::min)
    }

    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.history.iter().copied()
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn total_time(&self) -> f32 {
        self.total_time
    }
}
