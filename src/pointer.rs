use bevy::{
    input::mouse::MouseMotion,
    prelude::*,
    render::camera::RenderTarget,
    window::{PrimaryWindow, WindowRef},
};

use crate::{button::ButtonSwitch, field::Field, knob::KnobSwitch, SwitchPreUpdateSets};

/// Drives switches from OS window cursors: one pointer entity per window,
/// cursor ray via the window's camera, left-button press/capture lifecycle.
pub struct SwitchWindowPointerPlugin;

impl Plugin for SwitchWindowPointerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SwitchPointerConfig>();
        app.add_event::<PointerAction>();
        app.add_systems(
            PreUpdate,
            (update_pointer_rays, accumulate_pointer_motion)
                .in_set(SwitchPreUpdateSets::UpdatePointers),
        );
        app.add_systems(
            PreUpdate,
            resolve_pointer_targets.in_set(SwitchPreUpdateSets::ResolveTargets),
        );
        app.add_systems(
            PreUpdate,
            dispatch_pointer_actions.in_set(SwitchPreUpdateSets::DispatchActions),
        );
        app.add_systems(PreStartup, spawn_pointers_for_existing_windows);
        app.add_observer(spawn_pointer_on_window_add);
        app.add_observer(despawn_pointer_on_window_remove);
    }
}

/// What a pointer did to a switch this frame. The switch systems are the
/// in-crate consumers; tests and custom input sources may send these
/// directly.
#[derive(Event, Debug, Clone, Copy)]
pub struct PointerAction {
    pub pointer: Entity,
    pub target: Entity,
    pub kind: PointerActionKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerActionKind {
    Pressed,
    /// Sent every frame the button is held on a captured switch, motion may
    /// be zero.
    Dragged { motion: Vec2 },
    Released,
}

#[derive(Resource)]
pub struct SwitchPointerConfig {
    /// Scale applied to raw mouse motion before it reaches the knobs.
    pub motion_scale: f32,
    /// Ray hits farther away than this are ignored.
    pub max_pick_distance: f32,
}
impl Default for SwitchPointerConfig {
    fn default() -> Self {
        SwitchPointerConfig {
            motion_scale: 0.1,
            max_pick_distance: 250.0,
        }
    }
}

#[derive(Component, Debug)]
pub struct WindowPointer {
    pub window: Entity,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct PointerRay(pub Ray3d);

#[derive(Deref, DerefMut, Debug, Clone, Copy, Component)]
pub struct PointerActive(pub bool);

/// This frame's scaled mouse motion, y up-positive.
#[derive(Deref, DerefMut, Debug, Clone, Copy, Component, Default)]
pub struct PointerMotion(pub Vec2);

#[derive(Component, Debug, Default)]
pub struct PointerGrab {
    /// Nearest switch under the cursor this frame.
    pub hovered: Option<Entity>,
    /// Switch holding the pointer since the last press, kept until release
    /// even when the cursor leaves its volume.
    pub captured: Option<Entity>,
}

#[derive(Clone, Copy, Component, Debug)]
struct WindowSwitchPointer(Entity);

fn spawn_pointers_for_existing_windows(
    query: Query<Entity, (With<Window>, Without<WindowSwitchPointer>)>,
    mut cmds: Commands,
) {
    for e in &query {
        spawn_pointer_for_window(&mut cmds, e);
    }
}

fn spawn_pointer_for_window(cmds: &mut Commands, window: Entity) {
    let pointer = cmds
        .spawn((
            WindowPointer { window },
            PointerRay(Ray3d::new(Vec3::ZERO, Dir3::NEG_Z)),
            PointerActive(false),
            PointerMotion(Vec2::ZERO),
            PointerGrab::default(),
        ))
        .id();
    cmds.entity(window).insert(WindowSwitchPointer(pointer));
}

fn spawn_pointer_on_window_add(
    t: Trigger<OnAdd, Window>,
    mut cmds: Commands,
    has: Query<Has<WindowSwitchPointer>>,
) {
    if t.entity() == Entity::PLACEHOLDER {
        warn_once!("OnAdd called with placeholder entity?!");
        return;
    }
    if has.get(t.entity()).unwrap_or(false) {
        return;
    }
    spawn_pointer_for_window(&mut cmds, t.entity());
}

fn despawn_pointer_on_window_remove(
    t: Trigger<OnRemove, Window>,
    mut cmds: Commands,
    refs: Query<&WindowSwitchPointer>,
) {
    if t.entity() == Entity::PLACEHOLDER {
        warn_once!("OnRemove called with placeholder entity?!");
        return;
    }
    let Ok(pointer) = refs.get(t.entity()) else {
        warn!("removing window without a switch pointer?");
        return;
    };
    cmds.entity(pointer.0).despawn();
    cmds.entity(t.entity()).remove::<WindowSwitchPointer>();
}

fn update_pointer_rays(
    primary_window: Query<Entity, With<PrimaryWindow>>,
    cams: Query<(&Camera, &GlobalTransform)>,
    windows: Query<(&Window, &WindowSwitchPointer)>,
    mut pointers: Query<(&mut PointerRay, &mut PointerActive)>,
) {
    let primary = primary_window.get_single().ok();

    for ((camera, cam_transform), window) in cams.iter().filter_map(|v| match v.0.target {
        RenderTarget::Window(w) => Some((v, w)),
        _ => None,
    }) {
        let window = match window {
            WindowRef::Primary => {
                let Some(primary) = primary else {
                    warn_once!("camera targets the primary window, but there is none");
                    continue;
                };
                primary
            }
            WindowRef::Entity(e) => e,
        };
        let Ok((window, pointer_ref)) = windows.get(window) else {
            error_once!("camera target window has no switch pointer");
            continue;
        };
        let Ok((mut ray, mut active)) = pointers.get_mut(pointer_ref.0) else {
            error!("unable to get switch pointer for window");
            continue;
        };
        if let Some(pos) = window.cursor_position() {
            active.0 = true;
            if let Some(pos) = viewport_position(pos, camera) {
                if let Ok(world_ray) = camera.viewport_to_world(cam_transform, pos) {
                    ray.0 = world_ray;
                }
            }
        } else {
            active.0 = false;
        }
    }
}

fn accumulate_pointer_motion(
    mut pointers: Query<&mut PointerMotion, With<WindowPointer>>,
    mut motion: EventReader<MouseMotion>,
    config: Res<SwitchPointerConfig>,
) {
    let mut delta = Vec2::ZERO;
    for e in motion.read() {
        // screen-space y grows downward, switch input is up-positive
        delta += Vec2::new(e.delta.x, -e.delta.y);
    }
    delta *= config.motion_scale;
    for mut pointer_motion in pointers.iter_mut() {
        pointer_motion.0 = delta;
    }
}

fn resolve_pointer_targets(
    mut pointers: Query<(&PointerRay, &PointerActive, &mut PointerGrab)>,
    switches: Query<
        (Entity, &Field, &GlobalTransform),
        Or<(With<ButtonSwitch>, With<KnobSwitch>)>,
    >,
    config: Res<SwitchPointerConfig>,
) {
    for (ray, active, mut grab) in pointers.iter_mut() {
        grab.hovered = None;
        if !active.0 {
            continue;
        }
        let mut nearest = f32::MAX;
        for (switch, field, field_transform) in &switches {
            let Some(hit) = field.raymarch(field_transform, ray.0).hit else {
                continue;
            };
            if hit > config.max_pick_distance {
                continue;
            }
            if hit < nearest {
                nearest = hit;
                grab.hovered = Some(switch);
            }
        }
    }
}

fn dispatch_pointer_actions(
    mut pointers: Query<(Entity, &PointerMotion, &mut PointerGrab), With<WindowPointer>>,
    buttons: Res<ButtonInput<MouseButton>>,
    mut actions: EventWriter<PointerAction>,
) {
    for (pointer, motion, mut grab) in pointers.iter_mut() {
        if buttons.just_pressed(MouseButton::Left) {
            if let Some(target) = grab.hovered {
                grab.captured = Some(target);
                actions.send(PointerAction {
                    pointer,
                    target,
                    kind: PointerActionKind::Pressed,
                });
            }
        }
        let Some(target) = grab.captured else {
            continue;
        };
        if buttons.pressed(MouseButton::Left) {
            actions.send(PointerAction {
                pointer,
                target,
                kind: PointerActionKind::Dragged { motion: motion.0 },
            });
        }
        if buttons.just_released(MouseButton::Left) {
            actions.send(PointerAction {
                pointer,
                target,
                kind: PointerActionKind::Released,
            });
            grab.captured = None;
        }
    }
}

fn viewport_position(logical_pos: Vec2, cam: &Camera) -> Option<Vec2> {
    if let Some(viewport_rect) = cam.logical_viewport_rect() {
        if !viewport_rect.contains(logical_pos) {
            return None;
        }
        Some(logical_pos - viewport_rect.min)
    } else {
        Some(logical_pos)
    }
}
