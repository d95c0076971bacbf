//! Scene timeline of a finished render.

use serde::{Deserialize, Serialize};

/// Position of one rendered scene in the concatenated video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTiming {
    /// Index in the manifest, counting skipped scenes
    pub index: usize,
    pub id: String,
    /// Start offset in seconds, before any project speed change
    pub start: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub scenes: Vec<SceneTiming>,
    pub total_duration: f64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scene after the previous ones.
    pub fn push(&mut self, index: usize, id: impl Into<String>, duration: f64) {
        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        self.scenes.push(SceneTiming {
            index,
            id: id.into(),
            start: self.total_duration,
            duration,
        });
        self.total_duration += duration;
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Timeline as played back at `speed`.
    pub fn at_speed(&self, speed: f64) -> Self {
        if !speed.is_finite() || speed <= 0.0 || speed == 1.0 {
            return self.clone();
        }
        Self {
            scenes: self
                .scenes
                .iter()
                .map(|s| SceneTiming {
                    start: s.start / speed,
                    duration: s.duration / speed,
                    ..s.clone()
                })
                .collect(),
            total_duration: self.total_duration / speed,
        }
    }
}
