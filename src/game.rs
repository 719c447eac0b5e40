use bevy::{
    asset::AssetLoadFailedEvent, audio::Volume, prelude::*, sprite::Anchor, window::PrimaryWindow,
};

use crate::config::LaunchTuning;
use crate::launch::LaunchSession;
use crate::plugin::{apply_launch_actions, SpikeFired};

const BACKGROUND_Z: f32 = 0.0;
const SPIKE_Z: f32 = 1.0;
const CANNON_Z: f32 = 2.0;
const HUD_Z: f32 = 10.0;

/// Sprites, camera, sound and HUD around the launch session.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup)
            .add_systems(
                Update,
                (
                    play_launch_sound,
                    sync_spike_sprite.run_if(resource_changed::<LaunchSession>),
                    follow_spike,
                    update_hud,
                )
                    .chain()
                    .after(apply_launch_actions),
            )
            .add_systems(
                Update,
                (
                    exit_on_load_failure::<Image>,
                    exit_on_load_failure::<AudioSource>,
                    exit_on_load_failure::<Font>,
                ),
            );
    }
}

#[derive(Component)]
pub struct Spike;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudLabel {
    Distance,
    Best,
}

impl HudLabel {
    pub fn text(self, session: &LaunchSession) -> String {
        match self {
            HudLabel::Distance => format!("Distance= {}", session.total_distance),
            HudLabel::Best => format!("Max distance= {}", session.max_distance),
        }
    }

    fn column(self) -> f32 {
        match self {
            HudLabel::Distance => 0.0,
            HudLabel::Best => 1.0,
        }
    }
}

#[derive(Resource)]
pub struct GameAudio {
    pub launch: Handle<AudioSource>,
}

pub fn setup(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    tuning: Res<LaunchTuning>,
    session: Res<LaunchSession>,
) {
    let window = tuning.window_size();

    // Camera
    commands.spawn((
        Camera2d,
        Transform::from_translation(session.camera_center(tuning.camera_offset()).extend(0.0)),
    ));

    commands.spawn((
        Sprite {
            image: asset_server.load(&tuning.background_image),
            custom_size: Some(window * 4.0),
            anchor: Anchor::BottomLeft,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, BACKGROUND_Z),
    ));

    commands.spawn((
        Sprite {
            image: asset_server.load(&tuning.cannon_image),
            custom_size: Some(window / 4.0),
            anchor: Anchor::BottomLeft,
            ..default()
        },
        Transform::from_translation(session.cannon.extend(CANNON_Z)),
    ));

    commands.spawn((
        Sprite {
            image: asset_server.load(&tuning.spike_image),
            custom_size: Some(session.size),
            anchor: Anchor::BottomLeft,
            ..default()
        },
        Transform::from_translation(session.position.extend(SPIKE_Z)),
        Spike,
    ));

    let font = TextFont {
        font: tuning
            .hud_font
            .as_ref()
            .map(|path| asset_server.load(path))
            .unwrap_or_default(),
        font_size: tuning.hud_font_size,
        ..default()
    };
    for label in [HudLabel::Distance, HudLabel::Best] {
        commands.spawn((
            Text2d::new(label.text(&session)),
            font.clone(),
            TextColor(Color::WHITE),
            Anchor::TopLeft,
            Transform::from_xyz(0.0, 0.0, HUD_Z),
            label,
        ));
    }

    commands.spawn((
        AudioPlayer::new(asset_server.load(&tuning.music)),
        PlaybackSettings::LOOP.with_volume(Volume::new(tuning.music_volume)),
    ));
    commands.insert_resource(GameAudio {
        launch: asset_server.load(&tuning.launch_sound),
    });

    info!(
        window = ?window,
        tick_hz = tuning.tick_hz,
        spawn = ?session.spawn_point(),
        "spike ready"
    );
}

// A missing image, sound or font ends the game instead of leaving it
// blank or silent.
fn exit_on_load_failure<A: Asset>(
    mut failures: EventReader<AssetLoadFailedEvent<A>>,
    mut exit: EventWriter<AppExit>,
) {
    for failure in failures.read() {
        error!(path = %failure.path, error = %failure.error, "asset failed to load");
        exit.send(AppExit::error());
    }
}

// Fire and forget; the entity despawns once the sound finishes.
fn play_launch_sound(
    mut commands: Commands,
    mut fired: EventReader<SpikeFired>,
    audio: Res<GameAudio>,
    tuning: Res<LaunchTuning>,
) {
    for _ in fired.read() {
        commands.spawn((
            AudioPlayer::new(audio.launch.clone()),
            PlaybackSettings::DESPAWN.with_volume(Volume::new(tuning.launch_volume)),
        ));
    }
}

fn sync_spike_sprite(
    session: Res<LaunchSession>,
    mut spikes: Query<(&mut Transform, &mut Sprite), With<Spike>>,
) {
    for (mut transform, mut sprite) in &mut spikes {
        transform.translation.x = session.position.x;
        transform.translation.y = session.position.y;
        sprite.custom_size = Some(session.size);
    }
}

fn follow_spike(
    session: Res<LaunchSession>,
    tuning: Res<LaunchTuning>,
    mut cameras: Query<&mut Transform, With<Camera2d>>,
) {
    let center = session.camera_center(tuning.camera_offset());
    for mut transform in &mut cameras {
        transform.translation.x = center.x;
        transform.translation.y = center.y;
    }
}

/// Top-left corner of the HUD for a camera centered on `center`.
pub fn hud_origin(center: Vec2, viewport: Vec2, inset: Vec2) -> Vec2 {
    Vec2::new(
        center.x - viewport.x / 2.0 + inset.x,
        center.y + viewport.y / 2.0 - inset.y,
    )
}

fn update_hud(
    session: Res<LaunchSession>,
    tuning: Res<LaunchTuning>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<&Transform, With<Camera2d>>,
    mut labels: Query<(&mut Transform, &mut Text2d, &HudLabel), Without<Camera2d>>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok(camera) = cameras.get_single() else {
        return;
    };

    let origin = hud_origin(camera.translation.truncate(), window.size(), tuning.hud_inset());
    for (mut transform, mut text, label) in &mut labels {
        transform.translation.x = origin.x + label.column() * tuning.hud_spacing;
        transform.translation.y = origin.y;
        if session.is_changed() {
            text.0 = label.text(&session);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hud_sits_inside_top_left_corner() {
        let origin = hud_origin(
            Vec2::new(300.0, 200.0),
            Vec2::new(640.0, 480.0),
            Vec2::new(10.0, 10.0),
        );
        assert_eq!(origin, Vec2::new(-10.0, 430.0));
    }

    #[test]
    fn hud_labels_show_plain_numbers() {
        let tuning = LaunchTuning::default();
        let mut session = LaunchSession::from_tuning(&tuning);
        assert_eq!(HudLabel::Distance.text(&session), "Distance= 0");

        session.total_distance = 12.34;
        session.max_distance = 56.7;
        assert_eq!(HudLabel::Distance.text(&session), "Distance= 12.34");
        assert_eq!(HudLabel::Best.text(&session), "Max distance= 56.7");
    }

    #[test]
    fn missing_image_exits_with_error() {
        use bevy::asset::{io::AssetReaderError, AssetLoadError};
        use std::path::PathBuf;

        let mut app = App::new();
        app.add_event::<AssetLoadFailedEvent<Image>>()
            .add_systems(Update, exit_on_load_failure::<Image>);

        app.update();
        assert_eq!(app.should_exit(), None);

        app.world_mut().send_event(AssetLoadFailedEvent::<Image> {
            id: AssetId::default(),
            path: "sprites/spike.png".into(),
            error: AssetLoadError::AssetReaderError(AssetReaderError::NotFound(PathBuf::from(
                "sprites/spike.png",
            ))),
        });
        app.update();
        assert_eq!(app.should_exit(), Some(AppExit::error()));
    }

    #[test]
    fn spike_sprite_follows_session() {
        let tuning = LaunchTuning::default();
        let mut app = App::new();
        app.insert_resource(LaunchSession::from_tuning(&tuning))
            .insert_resource(tuning.clone())
            .add_systems(Update, (sync_spike_sprite, follow_spike));

        let spike = app
            .world_mut()
            .spawn((Sprite::default(), Transform::from_xyz(0.0, 0.0, SPIKE_Z), Spike))
            .id();
        let camera = app.world_mut().spawn((Camera2d, Transform::default())).id();

        {
            let mut session = app.world_mut().resource_mut::<LaunchSession>();
            session.position = Vec2::new(120.0, 80.0);
            session.size = Vec2::new(48.0, 40.0);
        }
        app.update();

        let world = app.world();
        let transform = world.get::<Transform>(spike).unwrap();
        assert_eq!(transform.translation, Vec3::new(120.0, 80.0, SPIKE_Z));
        assert_eq!(
            world.get::<Sprite>(spike).unwrap().custom_size,
            Some(Vec2::new(48.0, 40.0))
        );
        let camera = world.get::<Transform>(camera).unwrap();
        assert_eq!(camera.translation.truncate(), Vec2::new(218.0, 170.0));
    }
}
