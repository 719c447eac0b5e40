use bevy::prelude::*;

use crate::config::LaunchTuning;
use crate::input::{keyboard_input, LaunchAction};
use crate::launch::{LaunchPhase, LaunchSession};

/// Owns the launch session and steps it on the fixed schedule.
pub struct LaunchPlugin {
    pub tuning: LaunchTuning,
}

impl Plugin for LaunchPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(self.tuning.tick_hz))
            .insert_resource(LaunchSession::from_tuning(&self.tuning))
            .insert_resource(self.tuning.clone())
            .add_event::<LaunchAction>()
            .add_event::<SpikeFired>()
            .add_event::<SpikeLanded>()
            .add_systems(
                Update,
                (keyboard_input, apply_launch_actions, report_landings).chain(),
            )
            .add_systems(FixedUpdate, advance_spike);
    }
}

// Sent when a launch is armed. Drives the cannon sound.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpikeFired;

// Sent on the tick the spike touches the ground.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SpikeLanded {
    pub distance: f32,
    pub best: f32,
}

pub fn apply_launch_actions(
    mut actions: EventReader<LaunchAction>,
    mut session: ResMut<LaunchSession>,
    mut fired: EventWriter<SpikeFired>,
) {
    for action in actions.read() {
        match action {
            LaunchAction::Launch => {
                if session.on_launch_input() {
                    info!("spike launched");
                    fired.send(SpikeFired);
                }
            }
            LaunchAction::Reset => {
                let interrupted = session.phase.is_launching();
                session.on_reset_input();
                debug!(interrupted, best = session.max_distance, "launch reset");
            }
        }
    }
}

pub fn advance_spike(
    tuning: Res<LaunchTuning>,
    mut session: ResMut<LaunchSession>,
    mut landed: EventWriter<SpikeLanded>,
) {
    // Idle and landed sessions are left untouched so change detection stays quiet.
    if session.phase != LaunchPhase::Launching {
        return;
    }

    if session.advance(&tuning) {
        landed.send(SpikeLanded {
            distance: session.total_distance,
            best: session.max_distance,
        });
    }
}

fn report_landings(mut landed: EventReader<SpikeLanded>) {
    for SpikeLanded { distance, best } in landed.read() {
        info!(distance, best, "spike landed");
    }
}
