//! Typed input commands.
//!
//! Input systems enqueue commands as events arrive; the frame loop drains the queue once
//! per frame before advancing movement, so ordering is deterministic.

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::movement::MoveKey;
use crate::settings::Settings;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlCommand {
    /// Click-to-seek on a floor point already checked against the arena
    Seek(Vec3),
    /// Movement key pressed (`true`) or released (`false`)
    Key(MoveKey, bool),
    /// Arm/disarm the skill
    ToggleSkillAim,
    /// Scroll zoom; positive moves the camera away
    Zoom(f32),
    /// Replace the effective settings (panel edit, load, reset)
    ApplySettings(Settings),
}

/// Pending commands for the next frame
#[derive(Resource, Default, Debug)]
pub struct ControlQueue {
    pending: VecDeque<ControlCommand>,
}

impl ControlQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: ControlCommand) {
        self.pending.push_back(command);
    }

    /// Take every pending command in arrival order
    pub fn drain(&mut self) -> impl Iterator<Item = ControlCommand> + '_ {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
