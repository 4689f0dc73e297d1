//! Camera, lighting and pointer interaction

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy_picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings};
use partlens_core::{ClickOutcome, Hit};

use crate::app::{Session, ViewerSettings};

/// Pointer travel (in pixels) beyond which a press becomes a drag
const DRAG_THRESHOLD: f32 = 5.0;

/// Keep the camera off the poles so `look_at` stays well defined
const MAX_PITCH: f32 = 1.5;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ClickState>()
            .add_systems(Startup, setup_scene)
            .add_systems(Update, (handle_part_click, apply_focus, update_camera).chain());
    }
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Orbit controls state
#[derive(Resource)]
pub struct OrbitCamera {
    /// Point the camera orbits around
    pub target: Vec3,
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

fn setup_scene(mut commands: Commands, settings: Res<ViewerSettings>) {
    let camera = &settings.camera;
    let lighting = &settings.lighting;

    let [r, g, b] = lighting.ambient_color;
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: camera.fov_degrees.to_radians(),
            near: camera.near,
            far: camera.far,
            ..default()
        }),
        Transform::from_translation(Vec3::from_array(camera.position))
            .looking_at(Vec3::ZERO, Vec3::Y),
        AmbientLight {
            color: Color::srgb(r, g, b),
            brightness: lighting.ambient_brightness,
            ..default()
        },
        MainCamera,
    ));

    // Sun
    commands.spawn((
        DirectionalLight {
            illuminance: lighting.sun_illuminance,
            shadows_enabled: lighting.shadows,
            ..default()
        },
        Transform::from_translation(Vec3::from_array(lighting.sun_position))
            .looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Hemisphere fill: sky tint from above, ground tint from below
    for (color, from) in [(lighting.sky_color, Vec3::Y), (lighting.ground_color, Vec3::NEG_Y)] {
        let [r, g, b] = color;
        commands.spawn((
            DirectionalLight {
                color: Color::srgb(r, g, b),
                illuminance: lighting.hemisphere_illuminance,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_translation(from).looking_at(Vec3::ZERO, Vec3::Z),
        ));
    }

    commands.insert_resource(OrbitCamera {
        target: Vec3::ZERO,
        sensitivity: camera.sensitivity,
        zoom_speed: camera.zoom_speed,
        min_distance: camera.near * 10.0,
        max_distance: camera.far * 0.9,
    });
}

/// Tracks a left-button press so releases can be told apart from drags
#[derive(Resource, Default)]
pub struct ClickState {
    /// Cursor position where the press started
    start_position: Option<Vec2>,
    /// Whether the pointer moved far enough to count as an orbit drag
    is_dragging: bool,
}

impl ClickState {
    /// Feed one frame of left-button input.
    ///
    /// Returns the press position when a click completes this frame. A press
    /// and release inside the same frame is still a click.
    fn update(
        &mut self,
        buttons: &ButtonInput<MouseButton>,
        cursor: Option<Vec2>,
        pointer_free: impl FnOnce() -> bool,
    ) -> Option<Vec2> {
        if buttons.just_pressed(MouseButton::Left) {
            self.start_position = if pointer_free() { cursor } else { None };
            self.is_dragging = false;
        }

        let start = self.start_position?;

        if buttons.pressed(MouseButton::Left) {
            if cursor.is_some_and(|pos| pos.distance(start) > DRAG_THRESHOLD) {
                self.is_dragging = true;
            }
            return None;
        }

        let was_drag = self.is_dragging;
        self.start_position = None;
        self.is_dragging = false;
        (!was_drag && buttons.just_released(MouseButton::Left)).then_some(start)
    }
}

/// Select the part under the cursor on a left click (press and release without dragging)
fn handle_part_click(
    mut session: ResMut<Session>,
    mut orbit: ResMut<OrbitCamera>,
    mut click_state: ResMut<ClickState>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    transforms: Query<&GlobalTransform>,
    mut ray_cast: MeshRayCast,
    mut contexts: bevy_egui::EguiContexts,
    time: Res<Time>,
) {
    let Ok(window) = windows.single() else { return };
    let pointer_free = || {
        !contexts
            .ctx_mut()
            .map(|ctx| ctx.wants_pointer_input())
            .unwrap_or(false)
    };
    let Some(start) = click_state.update(&mouse_button, window.cursor_position(), pointer_free) else {
        return;
    };

    let Ok((camera, camera_transform)) = camera_query.single() else { return };
    let Ok(ray) = camera.viewport_to_world(camera_transform, start) else { return };

    let hit = ray_cast
        .cast_ray(ray, &MeshRayCastSettings::default())
        .first()
        .map(|(entity, _)| Hit {
            node: *entity,
            world_position: transforms
                .get(*entity)
                .map(|t| t.translation())
                .unwrap_or_default(),
        });

    let outcome = session.on_click(hit, camera_transform.translation(), time.elapsed());
    if let ClickOutcome::Focused { focus, .. } = outcome {
        orbit.target = focus.pivot;
    }
}

/// Drive the camera along an active focus transition
fn apply_focus(
    mut session: ResMut<Session>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    time: Res<Time>,
) {
    let Some(pose) = session.tick(time.delta(), time.elapsed()) else { return };
    let Ok(mut transform) = camera_query.single_mut() else { return };

    transform.translation = pose.position;
    transform.look_at(pose.look_at, Vec3::Y);
}

/// Orbit with left drag and zoom with the wheel, around the current pivot
fn update_camera(
    session: Res<Session>,
    orbit: Res<OrbitCamera>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut contexts: bevy_egui::EguiContexts,
) {
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);

    let mut total_motion = Vec2::ZERO;
    for motion in mouse_motion.read() {
        total_motion += motion.delta;
    }
    let mut scroll = 0.0;
    for wheel in mouse_wheel.read() {
        scroll += wheel.y;
    }

    // The focus transition owns the camera until it lands
    if egui_wants_pointer || session.focus().is_active() {
        return;
    }

    let Ok(mut transform) = camera_query.single_mut() else { return };
    let offset = transform.translation - orbit.target;
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return;
    }

    let mut yaw = offset.x.atan2(offset.z);
    let mut pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
    let mut new_distance = distance;
    let mut changed = false;

    if mouse_button.pressed(MouseButton::Left) && total_motion != Vec2::ZERO {
        yaw -= total_motion.x * orbit.sensitivity;
        pitch = (pitch + total_motion.y * orbit.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
        changed = true;
    }

    if scroll != 0.0 {
        let zoom_factor = 1.0 - scroll * orbit.zoom_speed;
        new_distance = (distance * zoom_factor).clamp(orbit.min_distance, orbit.max_distance);
        changed = true;
    }

    if !changed {
        return;
    }

    let direction = Vec3::new(
        pitch.cos() * yaw.sin(),
        pitch.sin(),
        pitch.cos() * yaw.cos(),
    );
    transform.translation = orbit.target + direction * new_distance;
    transform.look_at(orbit.target, Vec3::Y);

    let forward = transform.forward();
    tracing::debug!(
        "Camera position: x={:.2}, y={:.2}, z={:.2}",
        transform.translation.x,
        transform.translation.y,
        transform.translation.z
    );
    tracing::debug!(
        "Camera direction: x={:.2}, y={:.2}, z={:.2}",
        forward.x,
        forward.y,
        forward.z
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release_in_one_frame() {
        let mut state = ClickState::default();
        let mut buttons = ButtonInput::<MouseButton>::default();
        let pos = Vec2::new(120.0, 80.0);

        buttons.press(MouseButton::Left);
        buttons.release(MouseButton::Left);

        assert_eq!(state.update(&buttons, Some(pos), || true), Some(pos));
        assert!(state.start_position.is_none());
    }

    #[test]
    fn test_click_across_frames() {
        let mut state = ClickState::default();
        let mut buttons = ButtonInput::<MouseButton>::default();
        let pos = Vec2::new(10.0, 10.0);

        buttons.press(MouseButton::Left);
        assert_eq!(state.update(&buttons, Some(pos), || true), None);

        buttons.clear();
        assert_eq!(state.update(&buttons, Some(pos + Vec2::X), || true), None);

        buttons.clear();
        buttons.release(MouseButton::Left);
        assert_eq!(state.update(&buttons, Some(pos + Vec2::X), || true), Some(pos));
    }

    #[test]
    fn test_drag_is_not_a_click() {
        let mut state = ClickState::default();
        let mut buttons = ButtonInput::<MouseButton>::default();
        let pos = Vec2::new(10.0, 10.0);

        buttons.press(MouseButton::Left);
        state.update(&buttons, Some(pos), || true);

        buttons.clear();
        state.update(&buttons, Some(pos + Vec2::new(40.0, 0.0)), || true);

        buttons.clear();
        buttons.release(MouseButton::Left);
        assert_eq!(state.update(&buttons, Some(pos), || true), None);
        assert!(!state.is_dragging);
    }

    #[test]
    fn test_press_over_ui_is_ignored() {
        let mut state = ClickState::default();
        let mut buttons = ButtonInput::<MouseButton>::default();

        buttons.press(MouseButton::Left);
        buttons.release(MouseButton::Left);
        assert_eq!(state.update(&buttons, Some(Vec2::ONE), || false), None);
    }
}
