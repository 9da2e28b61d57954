use crate::core::camera::components::{FlySettings, MainCamera};
use crate::core::camera::logic::{CameraInput, calculate_camera_transform};
use bevy::input::ButtonInput;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::light::DirectionalLight;
use bevy::log::info;
use bevy::math::{EulerRot, Quat, Vec2, Vec3};
use bevy::prelude::*;
use bevy_egui::EguiContexts;
use std::f32::consts::PI;

pub fn spawn_camera(mut commands: Commands) {
    let mesh_size = terraingen::get_config().mesh.mesh_size;
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, mesh_size * 1.2, mesh_size * 2.2).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
        FlySettings::for_terrain(mesh_size),
    ));

    commands.spawn((
        Transform::from_rotation(Quat::from_euler(EulerRot::ZYX, 0.0, 1.0, -PI / 4.)),
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
    ));

    info!("Camera spawned");
}

pub fn camera_control(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mouse_input: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mut contexts: EguiContexts,
    time: Res<Time>,
    mut camera_q: Query<(&mut Transform, &FlySettings), With<MainCamera>>,
) {
    let Ok((mut transform, settings)) = camera_q.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|ev| ev.delta).sum();
    let wheel: f32 = mouse_wheel.read().map(|ev| ev.y).sum();
    // scrolling the settings panel must not fly the camera
    let pointer_over_ui = contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false);

    let input = CameraInput {
        move_forward: keyboard_input.pressed(KeyCode::KeyW),
        move_backward: keyboard_input.pressed(KeyCode::KeyS),
        move_left: keyboard_input.pressed(KeyCode::KeyA),
        move_right: keyboard_input.pressed(KeyCode::KeyD),
        move_up: keyboard_input.pressed(KeyCode::KeyE),
        move_down: keyboard_input.pressed(KeyCode::KeyQ),
        sprint: keyboard_input.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
        mouse_right_pressed: mouse_input.pressed(MouseButton::Right) && !pointer_over_ui,
        mouse_delta,
        mouse_wheel_delta: if pointer_over_ui { 0.0 } else { wheel },
    };

    let update = calculate_camera_transform(
        transform.translation,
        transform.rotation,
        &input,
        settings,
        time.delta_secs(),
    );
    transform.translation = update.translation;
    transform.rotation = update.rotation;
}
