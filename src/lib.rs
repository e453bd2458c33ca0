use bevy::prelude::*;

pub mod button;
pub mod debug;
pub mod field;
pub mod knob;
pub mod pointer;

pub use button::{ButtonPhase, ButtonState, ButtonSwitch, SwitchDown, SwitchLock, SwitchUp};
pub use field::Field;
pub use knob::{KnobPhase, KnobState, KnobSwitch, MouseAxis, SwitchAdsorbed, SwitchDrag, SwitchRelease};
pub use pointer::{
    PointerAction, PointerActionKind, SwitchPointerConfig, SwitchWindowPointerPlugin,
};

/// Core switch logic: the button/knob state machines and the `PointerAction`
/// event they consume. Pair with [`SwitchWindowPointerPlugin`] to drive the
/// switches from window cursors, or feed `PointerAction`s from elsewhere.
pub struct SwitchCorePlugin;
impl Plugin for SwitchCorePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            PreUpdate,
            (
                SwitchPreUpdateSets::UpdatePointers,
                SwitchPreUpdateSets::ResolveTargets,
                SwitchPreUpdateSets::DispatchActions,
                SwitchPreUpdateSets::DriveSwitches,
            )
                .chain(),
        );
        app.add_event::<PointerAction>();
        app.add_observer(button::init_button_state);
        app.add_observer(knob::init_knob_state);
        app.add_systems(
            PreUpdate,
            (button::drive_buttons, knob::drive_knobs).in_set(SwitchPreUpdateSets::DriveSwitches),
        );
    }
}

#[derive(SystemSet, Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub enum SwitchPreUpdateSets {
    UpdatePointers,
    ResolveTargets,
    DispatchActions,
    DriveSwitches,
}
