use bevy::prelude::*;

pub const LAUNCH_KEY: KeyCode = KeyCode::Space;
pub const RESET_KEY: KeyCode = KeyCode::KeyR;

// An event sent for a launch input action.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchAction {
    Launch,
    Reset,
}

// Sends [`LaunchAction`] events for keys pressed this frame. Held keys
// do not repeat.
pub fn keyboard_input(
    mut action_writer: EventWriter<LaunchAction>,
    keyboard_input: Res<ButtonInput<KeyCode>>,
) {
    if keyboard_input.just_pressed(LAUNCH_KEY) {
        action_writer.send(LaunchAction::Launch);
    }

    if keyboard_input.just_pressed(RESET_KEY) {
        action_writer.send(LaunchAction::Reset);
    }
}
