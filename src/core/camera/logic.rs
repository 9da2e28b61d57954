use crate::core::camera::components::FlySettings;
use bevy::math::{Quat, Vec2, Vec3};

pub struct CameraInput {
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub sprint: bool,
    pub mouse_right_pressed: bool,
    pub mouse_delta: Vec2,
    pub mouse_wheel_delta: f32,
}

pub struct CameraTransformUpdate {
    pub translation: Vec3,
    pub rotation: Quat,
}

/// New camera transform after one frame of fly input.
///
/// Up and down move along world `Y` so the horizon stays put while hovering
/// over the terrain.
pub fn calculate_camera_transform(
    current_translation: Vec3,
    current_rotation: Quat,
    input: &CameraInput,
    settings: &FlySettings,
    delta_time: f32,
) -> CameraTransformUpdate {
    let mut translation = current_translation;
    let mut rotation = current_rotation;

    let mut speed = settings.speed;
    if input.sprint {
        speed *= settings.sprint_multiplier;
    }

    let forward = rotation.mul_vec3(Vec3::NEG_Z);
    let right = rotation.mul_vec3(Vec3::X);
    let mut dir = Vec3::ZERO;

    if input.move_forward {
        dir += forward;
    }
    if input.move_backward {
        dir -= forward;
    }
    if input.move_left {
        dir -= right;
    }
    if input.move_right {
        dir += right;
    }
    if input.move_up {
        dir += Vec3::Y;
    }
    if input.move_down {
        dir -= Vec3::Y;
    }
    if dir.length_squared() > 0.0 {
        translation += dir.normalize() * speed * delta_time;
    }

    if input.mouse_right_pressed && input.mouse_delta.length_squared() > 0.0 {
        let yaw = Quat::from_rotation_y(-input.mouse_delta.x * settings.look_sensitivity);
        let pitch = Quat::from_rotation_x(-input.mouse_delta.y * settings.look_sensitivity);
        rotation = yaw * rotation * pitch;
    }

    if input.mouse_wheel_delta.abs() > 0.0 {
        translation += forward * input.mouse_wheel_delta * settings.zoom_step;
    }

    CameraTransformUpdate {
        translation,
        rotation,
    }
}
