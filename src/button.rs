use bevy::prelude::*;

use crate::pointer::{PointerAction, PointerActionKind};

/// Push-button switch: travels along its local forward axis while pressed,
/// optionally latching partway down on release.
#[derive(Component, Debug, Clone)]
#[require(Transform)]
pub struct ButtonSwitch {
    /// Gates all input response.
    pub is_enable: bool,
    /// Travel distance along local forward when pressed, any sign.
    pub down_offset: f32,
    /// Latch the button partway down on every other release.
    pub self_lock: bool,
    /// Fraction of `down_offset` held while latched, intended range 0..=1.
    pub lock_percent: f32,
    /// Swap the light target's material while the button is down.
    pub high_light: bool,
    /// Entity whose material slot gets swapped, the switch itself if `None`.
    pub light_target: Option<Entity>,
    pub light_material: Handle<StandardMaterial>,
}

impl Default for ButtonSwitch {
    fn default() -> Self {
        ButtonSwitch {
            is_enable: true,
            down_offset: 1.0,
            self_lock: false,
            lock_percent: 0.5,
            high_light: false,
            light_target: None,
            light_material: Handle::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonPhase {
    #[default]
    Up,
    Down,
    /// Latched partway down after releasing a self-locking button.
    Locked,
}

/// Observable button state, written only by [`drive_buttons`].
#[derive(Component, Debug, Default)]
pub struct ButtonState {
    start_position: Vec3,
    phase: ButtonPhase,
    latched: bool,
    current_offset: f32,
    default_material: Option<Handle<StandardMaterial>>,
}

impl ButtonState {
    pub fn phase(&self) -> ButtonPhase {
        self.phase
    }

    /// True from press until the release that returns the button to `Up`, so
    /// a latched button still reads as down.
    pub fn is_down(&self) -> bool {
        self.phase != ButtonPhase::Up
    }

    /// Offset from the start position, always one of `0`, `down_offset`, or
    /// `down_offset * lock_percent`.
    pub fn current_offset(&self) -> f32 {
        self.current_offset
    }

    /// Local position captured when the component was added, never updated
    /// afterwards.
    pub fn start_position(&self) -> Vec3 {
        self.start_position
    }
}

/// Button switch down event.
#[derive(Event, Debug, Clone, Copy)]
pub struct SwitchDown;

/// Button switch up event.
#[derive(Event, Debug, Clone, Copy)]
pub struct SwitchUp;

/// Button switch latch event.
#[derive(Event, Debug, Clone, Copy)]
pub struct SwitchLock;

pub(crate) fn init_button_state(
    t: Trigger<OnAdd, ButtonSwitch>,
    mut cmds: Commands,
    transforms: Query<&Transform, With<ButtonSwitch>>,
) {
    let Ok(transform) = transforms.get(t.entity()) else {
        return;
    };
    cmds.entity(t.entity()).insert(ButtonState {
        start_position: transform.translation,
        ..Default::default()
    });
}

pub(crate) fn drive_buttons(
    mut actions: EventReader<PointerAction>,
    mut buttons: Query<(&ButtonSwitch, &mut ButtonState, &mut Transform)>,
    mut materials: Query<&mut MeshMaterial3d<StandardMaterial>>,
    mut cmds: Commands,
) {
    for action in actions.read() {
        let Ok((button, mut state, mut transform)) = buttons.get_mut(action.target) else {
            continue;
        };
        if !button.is_enable {
            continue;
        }
        match action.kind {
            PointerActionKind::Pressed => {
                state.phase = ButtonPhase::Down;
                state.current_offset = button.down_offset;
                apply_travel(&mut transform, &state);
                if button.high_light {
                    swap_to_highlight(button, &mut state, &mut materials, action.target);
                }
                cmds.trigger_targets(SwitchDown, action.target);
            }
            PointerActionKind::Released => {
                if button.self_lock {
                    state.latched = !state.latched;
                }
                if state.latched {
                    state.phase = ButtonPhase::Locked;
                    state.current_offset = button.down_offset * button.lock_percent;
                    cmds.trigger_targets(SwitchLock, action.target);
                } else {
                    state.phase = ButtonPhase::Up;
                    state.current_offset = 0.0;
                    cmds.trigger_targets(SwitchUp, action.target);
                }
                apply_travel(&mut transform, &state);
                if button.high_light && !state.latched {
                    restore_default_material(button, &state, &mut materials, action.target);
                }
            }
            PointerActionKind::Dragged { .. } => {}
        }
    }
}

fn apply_travel(transform: &mut Transform, state: &ButtonState) {
    let axis = transform.forward();
    transform.translation = state.start_position + axis * state.current_offset;
}

fn swap_to_highlight(
    button: &ButtonSwitch,
    state: &mut ButtonState,
    materials: &mut Query<&mut MeshMaterial3d<StandardMaterial>>,
    switch: Entity,
) {
    let target = button.light_target.unwrap_or(switch);
    let Ok(mut slot) = materials.get_mut(target) else {
        warn_once!("highlight enabled on {switch}, but {target} has no material slot");
        return;
    };
    if state.default_material.is_none() {
        state.default_material = Some(slot.0.clone());
    }
    slot.0 = button.light_material.clone();
}

fn restore_default_material(
    button: &ButtonSwitch,
    state: &ButtonState,
    materials: &mut Query<&mut MeshMaterial3d<StandardMaterial>>,
    switch: Entity,
) {
    let Some(default_material) = state.default_material.clone() else {
        return;
    };
    let target = button.light_target.unwrap_or(switch);
    let Ok(mut slot) = materials.get_mut(target) else {
        return;
    };
    slot.0 = default_material;
}
