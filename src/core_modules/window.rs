// THEORY:
// The `window` module gives the narration a short memory without any hidden state.
// A `FrameWindow` is a bounded ring buffer of the last few frames' features, owned
// by the caller and passed explicitly to whoever needs to look back, such as the
// command handler answering "describe" a moment after the frame was processed.
// When the window is full, pushing a new frame evicts the oldest one.

use crate::config::DescriberConfig;
use crate::core_modules::feature::ObjectFeature;
use std::collections::VecDeque;

/// The features extracted from one processed frame, in observation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneFrame {
    pub features: Vec<ObjectFeature>,
}

impl SceneFrame {
    pub fn new(features: Vec<ObjectFeature>) -> Self {
        Self { features }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// A caller-owned sliding window of recent frames.
#[derive(Debug, Clone)]
pub struct FrameWindow {
    frames: VecDeque<SceneFrame>,
    capacity: usize,
}

impl FrameWindow {
    /// A window holding at most `capacity` frames. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn from_config(config: &DescriberConfig) -> Self {
        Self::new(config.window_size)
    }

    /// Append a frame, evicting and returning the oldest one if the window was full.
    pub fn push(&mut self, frame: SceneFrame) -> Option<SceneFrame> {
        self.frames.push_back(frame);
        if self.frames.len() > self.capacity {
            self.frames.pop_front()
        } else {
            None
        }
    }

    pub fn latest(&self) -> Option<&SceneFrame> {
        self.frames.back()
    }

    /// Frames from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &SceneFrame> {
        self.frames.iter()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
