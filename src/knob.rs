use bevy::prelude::*;

use crate::pointer::{PointerAction, PointerActionKind};

/// Mouse axis feeding a knob while it is dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseAxis {
    #[default]
    X,
    Y,
}

/// Rotary knob switch: accumulates pointer motion into a rotation around its
/// local forward axis, with optional range clamping and snap targets.
#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct KnobSwitch {
    /// Gates all input response.
    pub is_enable: bool,
    pub mouse_input: MouseAxis,
    /// Degrees per second at one unit of axis input.
    pub rotate_speed: f32,
    /// Clamp the angle into `min_angle..=max_angle`.
    pub range_limit: bool,
    pub min_angle: f32,
    pub max_angle: f32,
    /// Snap to the nearest of `adsorbent_angles` on release.
    pub adsorbent: bool,
    /// Snap targets in degrees. On equal distance the first entry wins.
    pub adsorbent_angles: Vec<f32>,
}

impl Default for KnobSwitch {
    fn default() -> Self {
        KnobSwitch {
            is_enable: true,
            mouse_input: MouseAxis::X,
            rotate_speed: 250.0,
            range_limit: false,
            min_angle: -60.0,
            max_angle: 60.0,
            adsorbent: false,
            adsorbent_angles: Vec::new(),
        }
    }
}

impl KnobSwitch {
    /// Projection of `angle` into the configured range. Zero when the range
    /// limit is off, and a zero-width range divides by one instead of zero.
    pub fn percent(&self, angle: f32) -> f32 {
        if !self.range_limit {
            return 0.0;
        }
        let range = self.max_angle - self.min_angle;
        (angle - self.min_angle) / if range == 0.0 { 1.0 } else { range }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KnobPhase {
    #[default]
    Idle,
    Dragging,
    /// Resting on an adsorbent target after the last release.
    Snapped,
}

/// Observable knob state, written only by [`drive_knobs`].
#[derive(Component, Debug, Default)]
pub struct KnobState {
    start_rotation: Quat,
    angle: f32,
    phase: KnobPhase,
}

impl KnobState {
    /// Accumulated rotation in degrees.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Local rotation captured when the component was added, never updated
    /// afterwards.
    pub fn start_rotation(&self) -> Quat {
        self.start_rotation
    }

    pub fn phase(&self) -> KnobPhase {
        self.phase
    }
}

/// Knob switch drag event, fired every frame the knob is held.
#[derive(Event, Debug, Clone, Copy)]
pub struct SwitchDrag;

/// Knob switch release event.
#[derive(Event, Debug, Clone, Copy)]
pub struct SwitchRelease;

/// Knob switch snap event, fired after the angle adsorbs to a target.
#[derive(Event, Debug, Clone, Copy)]
pub struct SwitchAdsorbed;

pub(crate) fn init_knob_state(
    t: Trigger<OnAdd, KnobSwitch>,
    mut cmds: Commands,
    transforms: Query<&Transform, With<KnobSwitch>>,
) {
    let Ok(transform) = transforms.get(t.entity()) else {
        return;
    };
    cmds.entity(t.entity()).insert(KnobState {
        start_rotation: transform.rotation,
        ..Default::default()
    });
}

pub(crate) fn drive_knobs(
    mut actions: EventReader<PointerAction>,
    mut knobs: Query<(&KnobSwitch, &mut KnobState, &mut Transform)>,
    time: Res<Time>,
    mut cmds: Commands,
) {
    for action in actions.read() {
        let Ok((knob, mut state, mut transform)) = knobs.get_mut(action.target) else {
            continue;
        };
        if !knob.is_enable {
            continue;
        }
        match action.kind {
            PointerActionKind::Dragged { motion } => {
                let input = match knob.mouse_input {
                    MouseAxis::X => motion.x,
                    MouseAxis::Y => motion.y,
                };
                state.angle += input * knob.rotate_speed * time.delta_secs();
                if knob.range_limit {
                    // min/max chain instead of clamp, an inverted range must
                    // not panic
                    state.angle = state.angle.max(knob.min_angle).min(knob.max_angle);
                }
                state.phase = KnobPhase::Dragging;
                apply_rotation(&mut transform, &state);
                cmds.trigger_targets(SwitchDrag, action.target);
            }
            PointerActionKind::Released => {
                state.phase = KnobPhase::Idle;
                cmds.trigger_targets(SwitchRelease, action.target);
                if !knob.adsorbent {
                    continue;
                }
                let Some(nearest) = nearest_adsorbent(state.angle, &knob.adsorbent_angles) else {
                    continue;
                };
                state.angle = nearest;
                state.phase = KnobPhase::Snapped;
                apply_rotation(&mut transform, &state);
                cmds.trigger_targets(SwitchAdsorbed, action.target);
            }
            PointerActionKind::Pressed => {}
        }
    }
}

/// Positive angles rotate toward local back (clockwise seen head-on).
fn apply_rotation(transform: &mut Transform, state: &KnobState) {
    transform.rotation = state.start_rotation * Quat::from_rotation_z(-state.angle.to_radians());
}

/// Linear scan keeping the earliest minimum, so ties go to the first entry.
fn nearest_adsorbent(angle: f32, targets: &[f32]) -> Option<f32> {
    let mut nearest = None;
    let mut best = f32::INFINITY;
    for &target in targets {
        let delta = (angle - target).abs();
        if delta < best {
            best = delta;
            nearest = Some(target);
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SwitchCorePlugin;
    use std::time::Duration;

    #[derive(Resource, Default)]
    struct Fired {
        drag: u32,
        release: u32,
        adsorbed: u32,
    }

    fn knob_app() -> App {
        let mut app = App::new();
        app.add_plugins(SwitchCorePlugin);
        app.init_resource::<Time>();
        app.init_resource::<Fired>();
        app.add_observer(|_: Trigger<SwitchDrag>, mut fired: ResMut<Fired>| fired.drag += 1);
        app.add_observer(|_: Trigger<SwitchRelease>, mut fired: ResMut<Fired>| {
            fired.release += 1;
        });
        app.add_observer(|_: Trigger<SwitchAdsorbed>, mut fired: ResMut<Fired>| {
            fired.adsorbed += 1;
        });
        app
    }

    /// Advance time by one whole second so angle deltas come out exact.
    fn send(app: &mut App, target: Entity, kind: PointerActionKind) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs(1));
        app.world_mut().send_event(PointerAction {
            pointer: Entity::PLACEHOLDER,
            target,
            kind,
        });
        app.update();
    }

    fn drag_x(app: &mut App, target: Entity, amount: f32) {
        send(
            app,
            target,
            PointerActionKind::Dragged {
                motion: Vec2::new(amount, 0.0),
            },
        );
    }

    fn state(app: &App, knob: Entity) -> &KnobState {
        app.world().entity(knob).get::<KnobState>().unwrap()
    }

    #[test]
    fn drag_accumulates_angle_and_rotates() {
        let mut app = knob_app();
        let knob = app
            .world_mut()
            .spawn((
                KnobSwitch {
                    rotate_speed: 15.0,
                    ..Default::default()
                },
                Transform::default(),
            ))
            .id();

        drag_x(&mut app, knob, 1.0);
        assert_eq!(state(&app, knob).angle(), 15.0);
        drag_x(&mut app, knob, 1.0);
        assert_eq!(state(&app, knob).angle(), 30.0);

        let rotation = app.world().entity(knob).get::<Transform>().unwrap().rotation;
        let expected = Quat::from_rotation_z(-30_f32.to_radians());
        assert!(rotation.angle_between(expected) < 1e-5);
        assert_eq!(app.world().resource::<Fired>().drag, 2);
    }

    #[test]
    fn y_axis_knob_reads_vertical_motion() {
        let mut app = knob_app();
        let knob = app
            .world_mut()
            .spawn((
                KnobSwitch {
                    mouse_input: MouseAxis::Y,
                    rotate_speed: 10.0,
                    ..Default::default()
                },
                Transform::default(),
            ))
            .id();

        send(
            &mut app,
            knob,
            PointerActionKind::Dragged {
                motion: Vec2::new(5.0, 1.0),
            },
        );
        assert_eq!(state(&app, knob).angle(), 10.0);
    }

    #[test]
    fn range_limit_clamps_the_angle() {
        let mut app = knob_app();
        let knob = app
            .world_mut()
            .spawn((
                KnobSwitch {
                    rotate_speed: 50.0,
                    range_limit: true,
                    min_angle: -60.0,
                    max_angle: 60.0,
                    ..Default::default()
                },
                Transform::default(),
            ))
            .id();

        for _ in 0..5 {
            drag_x(&mut app, knob, 1.0);
            assert!(state(&app, knob).angle() <= 60.0);
        }
        assert_eq!(state(&app, knob).angle(), 60.0);

        for _ in 0..10 {
            drag_x(&mut app, knob, -1.0);
            assert!(state(&app, knob).angle() >= -60.0);
        }
        assert_eq!(state(&app, knob).angle(), -60.0);
    }

    #[test]
    fn percent_projects_the_range() {
        let knob = KnobSwitch {
            range_limit: true,
            min_angle: -60.0,
            max_angle: 60.0,
            ..Default::default()
        };
        assert_eq!(knob.percent(-60.0), 0.0);
        assert_eq!(knob.percent(0.0), 0.5);
        assert_eq!(knob.percent(60.0), 1.0);
    }

    #[test]
    fn percent_without_range_limit_is_zero() {
        let knob = KnobSwitch::default();
        assert_eq!(knob.percent(45.0), 0.0);
    }

    #[test]
    fn percent_survives_a_zero_width_range() {
        let knob = KnobSwitch {
            range_limit: true,
            min_angle: 30.0,
            max_angle: 30.0,
            ..Default::default()
        };
        assert_eq!(knob.percent(30.0), 0.0);
    }

    #[test]
    fn release_snaps_to_nearest_target() {
        let mut app = knob_app();
        let knob = app
            .world_mut()
            .spawn((
                KnobSwitch {
                    rotate_speed: 10.0,
                    adsorbent: true,
                    adsorbent_angles: vec![-30.0, 0.0, 30.0],
                    ..Default::default()
                },
                Transform::default(),
            ))
            .id();

        drag_x(&mut app, knob, 1.0);
        assert_eq!(state(&app, knob).angle(), 10.0);
        assert_eq!(state(&app, knob).phase(), KnobPhase::Dragging);
        send(&mut app, knob, PointerActionKind::Released);

        assert_eq!(state(&app, knob).angle(), 0.0);
        assert_eq!(state(&app, knob).phase(), KnobPhase::Snapped);
        let fired = app.world().resource::<Fired>();
        assert_eq!(fired.release, 1);
        assert_eq!(fired.adsorbed, 1);
    }

    #[test]
    fn equidistant_snap_keeps_the_first_target() {
        let mut app = knob_app();
        let knob = app
            .world_mut()
            .spawn((
                KnobSwitch {
                    rotate_speed: 15.0,
                    adsorbent: true,
                    adsorbent_angles: vec![0.0, 30.0],
                    ..Default::default()
                },
                Transform::default(),
            ))
            .id();

        // exactly between the two targets
        drag_x(&mut app, knob, 1.0);
        assert_eq!(state(&app, knob).angle(), 15.0);
        send(&mut app, knob, PointerActionKind::Released);

        assert_eq!(state(&app, knob).angle(), 0.0);
    }

    #[test]
    fn release_without_targets_leaves_the_angle() {
        let mut app = knob_app();
        let knob = app
            .world_mut()
            .spawn((
                KnobSwitch {
                    rotate_speed: 10.0,
                    adsorbent: true,
                    ..Default::default()
                },
                Transform::default(),
            ))
            .id();

        drag_x(&mut app, knob, 1.0);
        send(&mut app, knob, PointerActionKind::Released);

        assert_eq!(state(&app, knob).angle(), 10.0);
        assert_eq!(state(&app, knob).phase(), KnobPhase::Idle);
        let fired = app.world().resource::<Fired>();
        assert_eq!(fired.release, 1);
        assert_eq!(fired.adsorbed, 0);
    }

    #[test]
    fn zero_motion_drag_still_fires_drag() {
        let mut app = knob_app();
        let knob = app
            .world_mut()
            .spawn((KnobSwitch::default(), Transform::default()))
            .id();

        drag_x(&mut app, knob, 0.0);
        drag_x(&mut app, knob, 0.0);

        assert_eq!(state(&app, knob).angle(), 0.0);
        assert_eq!(app.world().resource::<Fired>().drag, 2);
    }

    #[test]
    fn disabled_knob_ignores_everything() {
        let mut app = knob_app();
        let knob = app
            .world_mut()
            .spawn((
                KnobSwitch {
                    is_enable: false,
                    adsorbent: true,
                    adsorbent_angles: vec![0.0],
                    ..Default::default()
                },
                Transform::default(),
            ))
            .id();

        drag_x(&mut app, knob, 1.0);
        send(&mut app, knob, PointerActionKind::Released);

        assert_eq!(state(&app, knob).angle(), 0.0);
        let fired = app.world().resource::<Fired>();
        assert_eq!((fired.drag, fired.release, fired.adsorbed), (0, 0, 0));
    }

    #[test]
    fn rotation_composes_with_the_start_rotation() {
        let mut app = knob_app();
        let start = Quat::from_rotation_x(std::f32::consts::FRAC_PI_2);
        let knob = app
            .world_mut()
            .spawn((
                KnobSwitch {
                    rotate_speed: 30.0,
                    ..Default::default()
                },
                Transform::from_rotation(start),
            ))
            .id();
        assert_eq!(state(&app, knob).start_rotation(), start);

        drag_x(&mut app, knob, 1.0);

        let rotation = app.world().entity(knob).get::<Transform>().unwrap().rotation;
        let expected = start * Quat::from_rotation_z(-30_f32.to_radians());
        assert!(rotation.angle_between(expected) < 1e-5);
    }

    #[test]
    fn nearest_adsorbent_scan() {
        assert_eq!(nearest_adsorbent(10.0, &[-30.0, 0.0, 30.0]), Some(0.0));
        assert_eq!(nearest_adsorbent(15.0, &[0.0, 30.0]), Some(0.0));
        assert_eq!(nearest_adsorbent(-40.0, &[-30.0, 0.0, 30.0]), Some(-30.0));
        assert_eq!(nearest_adsorbent(5.0, &[]), None);
    }
}
