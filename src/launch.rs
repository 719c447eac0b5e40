use bevy::prelude::*;

use crate::config::LaunchTuning;

/// Where a launch currently is. Only `Launching` moves the spike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchPhase {
    #[default]
    Idle,
    Launching,
    Landed,
}

/// Something that may move the session to another phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTrigger {
    Launch,
    Touchdown,
    Reset,
}

impl LaunchPhase {
    pub fn on(self, trigger: PhaseTrigger) -> Self {
        match (self, trigger) {
            (_, PhaseTrigger::Reset) => LaunchPhase::Idle,
            (LaunchPhase::Idle, PhaseTrigger::Launch) => LaunchPhase::Launching,
            (LaunchPhase::Launching, PhaseTrigger::Touchdown) => LaunchPhase::Landed,
            (phase, _) => phase,
        }
    }

    pub fn is_launching(self) -> bool {
        self != LaunchPhase::Idle
    }

    pub fn has_landed(self) -> bool {
        self == LaunchPhase::Landed
    }
}

/// Rounds to two decimals, ties going up.
pub fn round2(value: f32) -> f32 {
    ((f64::from(value) * 100.0 + 0.5).floor() / 100.0) as f32
}

/// Everything that changes while the spike is in the air, plus the
/// distance record that survives resets.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct LaunchSession {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Rendered size. Height shrinks during flight, width never does.
    pub size: Vec2,
    pub original_size: Vec2,
    pub cannon: Vec2,
    pub phase: LaunchPhase,
    pub total_distance: f32,
    pub max_distance: f32,
    spawn_offset: Vec2,
}

impl LaunchSession {
    pub fn new(cannon: Vec2, size: Vec2, spawn_offset: Vec2) -> Self {
        Self {
            position: cannon + spawn_offset,
            velocity: Vec2::ZERO,
            size,
            original_size: size,
            cannon,
            phase: LaunchPhase::Idle,
            total_distance: 0.0,
            max_distance: 0.0,
            spawn_offset,
        }
    }

    pub fn from_tuning(tuning: &LaunchTuning) -> Self {
        Self::new(
            tuning.cannon_position(),
            tuning.spike_size(),
            tuning.spawn_offset(),
        )
    }

    pub fn spawn_point(&self) -> Vec2 {
        self.cannon + self.spawn_offset
    }

    /// Starts a launch. Returns `true` only when this call armed the
    /// launch, which is when the launch sound should play.
    pub fn on_launch_input(&mut self) -> bool {
        let next = self.phase.on(PhaseTrigger::Launch);
        let armed = next != self.phase;
        self.phase = next;
        armed
    }

    /// Puts the spike back on the cannon. The best distance is kept.
    pub fn on_reset_input(&mut self) {
        self.phase = self.phase.on(PhaseTrigger::Reset);
        self.velocity = Vec2::ZERO;
        self.position = self.spawn_point();
        self.total_distance = 0.0;
        self.size = self.original_size;
    }

    /// One simulation tick. Returns `true` on the tick the spike lands.
    pub fn advance(&mut self, tuning: &LaunchTuning) -> bool {
        if self.phase != LaunchPhase::Launching {
            return false;
        }

        self.integrate(tuning);
        self.size.y *= tuning.shrink;
        self.total_distance =
            round2(self.total_distance + self.position.x / tuning.distance_scale);

        if self.position.y <= 0.0 {
            self.phase = self.phase.on(PhaseTrigger::Touchdown);
            self.max_distance = self.max_distance.max(self.total_distance);
            return true;
        }
        false
    }

    fn integrate(&mut self, tuning: &LaunchTuning) {
        // A zeroed vertical speed only happens before the first tick.
        if self.velocity.y == 0.0 {
            self.velocity = tuning.launch_impulse();
        }

        self.position += self.velocity;
        self.velocity *= tuning.damping;

        if self.position.y > 0.0 {
            self.velocity.y -= tuning.gravity;
        }
    }

    /// Point the camera should center on for the current spike.
    pub fn camera_center(&self, offset: Vec2) -> Vec2 {
        self.position + self.size + offset
    }
}
