// SPDX-License-Identifier: MIT OR Apache-2.0
//! Duplication-padded pose timeline.
//!
//! Poses are stored in authoring order. The first authored pose is always
//! stored twice so that a four-pose window starting at index 0 has a
//! predecessor for its first segment, and once more than four poses exist the
//! last authored pose is stored twice as well.

use crate::pose::Pose;
use serde::{Deserialize, Serialize};

/// Number of poses in one interpolation window
pub const WINDOW_SIZE: usize = 4;

/// Stored length from which playback is allowed (four authored poses)
pub const MIN_PLAYABLE_LEN: usize = 6;

/// Error raised by timeline access
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    /// Removal requested on an empty timeline
    #[error("Nothing to remove: the timeline is empty")]
    EmptyTimeline,

    /// Window lookup past the end of the timeline
    #[error("Window at {index} is out of range for {len} stored poses")]
    OutOfRange {
        /// Requested window start
        index: usize,
        /// Stored pose count
        len: usize,
    },
}

/// Four consecutive poses used as control points for one segment
#[derive(Debug, Clone, Copy)]
pub struct PoseWindow<'a> {
    poses: [&'a Pose; WINDOW_SIZE],
}

impl<'a> PoseWindow<'a> {
    /// Build a window from four poses
    pub fn new(poses: [&'a Pose; WINDOW_SIZE]) -> Self {
        Self { poses }
    }

    /// The four poses, outer-inner-inner-outer
    pub fn poses(&self) -> [&'a Pose; WINDOW_SIZE] {
        self.poses
    }

    /// Project one channel out of every pose in the window
    pub fn channel<T>(&self, f: impl Fn(&Pose) -> T) -> [T; WINDOW_SIZE] {
        self.poses.map(f)
    }
}

/// Read access the scheduler needs from a pose store
pub trait PoseSequence {
    /// Stored pose count
    fn len(&self) -> usize;

    /// Window starting at `index`
    fn window_at(&self, index: usize) -> Result<PoseWindow<'_>, TimelineError>;

    /// Whether enough poses exist to play
    fn can_play(&self) -> bool {
        self.len() >= MIN_PLAYABLE_LEN
    }

    /// True when nothing is stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of valid window start positions
    fn segment_count(&self) -> usize {
        self.len().saturating_sub(WINDOW_SIZE - 1)
    }
}

/// Ordered sequence of poses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timeline {
    poses: Vec<Pose>,
}

impl Timeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an authored pose.
    ///
    /// An empty timeline, or one holding exactly four poses, receives the pose
    /// twice. A longer timeline drops its trailing duplicate first and then
    /// receives the pose twice. Lengths 1 to 3 receive it once.
    pub fn add_pose(&mut self, pose: Pose) {
        match self.poses.len() {
            0 | 4 => {
                self.poses.push(pose.clone());
                self.poses.push(pose);
            }
            len if len > 4 => {
                self.poses.pop();
                self.poses.push(pose.clone());
                self.poses.push(pose);
            }
            _ => self.poses.push(pose),
        }
    }

    /// Remove the most recently authored pose.
    ///
    /// From six stored poses upwards the trailing pair is removed and the new
    /// last pose is duplicated again; below that a single pose is removed.
    pub fn remove_pose(&mut self) -> Result<(), TimelineError> {
        let len = self.poses.len();
        if len >= MIN_PLAYABLE_LEN {
            self.poses.truncate(len - 2);
            if let Some(last) = self.poses.last().cloned() {
                self.poses.push(last);
            }
        } else if self.poses.pop().is_none() {
            return Err(TimelineError::EmptyTimeline);
        }
        Ok(())
    }

    /// Remove every pose
    pub fn clear(&mut self) {
        self.poses.clear();
    }

    /// All stored poses, duplicates included
    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    /// Stored pose at index
    pub fn pose(&self, index: usize) -> Option<&Pose> {
        self.poses.get(index)
    }
}

impl PoseSequence for Timeline {
    fn len(&self) -> usize {
        self.poses.len()
    }

    fn window_at(&self, index: usize) -> Result<PoseWindow<'_>, TimelineError> {
        match self.poses.get(index..index.saturating_add(WINDOW_SIZE)) {
            Some([p0, p1, p2, p3]) => Ok(PoseWindow::new([p0, p1, p2, p3])),
            _ => Err(TimelineError::OutOfRange {
                index,
                len: self.poses.len(),
            }),
        }
    }
}
