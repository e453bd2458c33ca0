use bevy::{color::palettes::css, prelude::*};

use crate::{
    button::{ButtonPhase, ButtonState, ButtonSwitch},
    field::Field,
    knob::{KnobState, KnobSwitch},
    pointer::{PointerActive, PointerGrab, PointerRay},
};

/// Gizmo overlay for pointers, fields, and switch state.
pub struct SwitchDebugGizmosPlugin;

impl Plugin for SwitchDebugGizmosPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (draw_pointer_gizmos, draw_field_gizmos, draw_switch_gizmos),
        );
    }
}

fn draw_pointer_gizmos(
    pointers: Query<(&PointerRay, &PointerActive, &PointerGrab)>,
    mut gizmos: Gizmos,
) {
    for (ray, active, grab) in &pointers {
        let color = match (active.0, grab.captured.is_some()) {
            (true, true) => css::LIME,
            (true, false) => css::BLUE,
            (false, _) => css::LIGHT_GRAY,
        };
        gizmos.line(ray.0.origin, ray.0.origin + (*ray.0.direction * 0.2), color);
    }
}

fn draw_field_gizmos(field_query: Query<(&GlobalTransform, &Field)>, mut gizmos: Gizmos) {
    for (transform, field) in &field_query {
        match field {
            Field::Sphere(r) => {
                gizmos.sphere(transform.to_isometry(), *r, css::LIME);
            }
            Field::Cuboid(cuboid) => gizmos.cuboid(
                transform.mul_transform(Transform::from_scale(cuboid.half_size * 2.0)),
                css::LIME,
            ),
            Field::Cylinder(cylinder) => {
                gizmos.primitive_3d(cylinder, transform.to_isometry(), css::LIME);
            }
        }
    }
}

fn draw_switch_gizmos(
    buttons: Query<(&GlobalTransform, &ButtonState), With<ButtonSwitch>>,
    knobs: Query<&GlobalTransform, (With<KnobSwitch>, With<KnobState>)>,
    mut gizmos: Gizmos,
) {
    for (transform, state) in &buttons {
        let color = match state.phase() {
            ButtonPhase::Up => css::LIGHT_GRAY,
            ButtonPhase::Down => css::LIME,
            ButtonPhase::Locked => css::GOLD,
        };
        let t = transform.compute_transform();
        gizmos.line(t.translation, t.translation + t.forward() * 0.2, color);
    }
    for transform in &knobs {
        let t = transform.compute_transform();
        gizmos.circle(transform.to_isometry(), 0.1, css::BLUE);
        gizmos.line(t.translation, t.translation + t.up() * 0.1, css::BLUE);
    }
}
