use bevy::{color::palettes::css, prelude::*};
use bevy_switches::{
    debug::SwitchDebugGizmosPlugin, ButtonSwitch, Field, KnobState, KnobSwitch, MouseAxis,
    SwitchAdsorbed, SwitchCorePlugin, SwitchDown, SwitchLock, SwitchUp, SwitchWindowPointerPlugin,
};

fn main() -> AppExit {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins((
            SwitchCorePlugin,
            SwitchWindowPointerPlugin,
            SwitchDebugGizmosPlugin,
        ))
        .add_systems(Startup, setup)
        .run()
}

fn setup(
    mut cmds: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    cmds.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.15, 0.9).looking_at(Vec3::ZERO, Dir3::Y),
    ));
    cmds.spawn((
        DirectionalLight::default(),
        Transform::from_xyz(1.0, 2.0, 2.0).looking_at(Vec3::ZERO, Dir3::Y),
    ));

    // panel plate
    cmds.spawn((
        Mesh3d(meshes.add(Cuboid::new(0.7, 0.35, 0.02))),
        MeshMaterial3d(materials.add(StandardMaterial::from(Color::from(css::DIM_GRAY)))),
        Transform::default(),
    ));

    let highlight = materials.add(StandardMaterial {
        base_color: css::ORANGE_RED.into(),
        emissive: LinearRgba::from(css::ORANGE_RED) * 4.0,
        ..Default::default()
    });

    // self-locking push button, lights up while down
    cmds.spawn((
        ButtonSwitch {
            down_offset: 0.02,
            self_lock: true,
            lock_percent: 0.5,
            high_light: true,
            light_material: highlight,
            ..Default::default()
        },
        Field::Cuboid(Cuboid::new(0.12, 0.12, 0.05)),
        Mesh3d(meshes.add(Cuboid::new(0.12, 0.12, 0.05))),
        MeshMaterial3d(materials.add(StandardMaterial::from(Color::from(css::DARK_RED)))),
        Transform::from_xyz(-0.2, 0.0, 0.04),
    ))
    .observe(|t: Trigger<SwitchDown>| info!("button {} down", t.entity()))
    .observe(|t: Trigger<SwitchUp>| info!("button {} up", t.entity()))
    .observe(|t: Trigger<SwitchLock>| info!("button {} locked", t.entity()));

    // range-limited knob snapping to three detents, face toward the camera
    let knob_face = meshes.add(
        Mesh::from(Cylinder::new(0.08, 0.05))
            .rotated_by(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
    );
    let mark_mesh = meshes.add(Cuboid::new(0.01, 0.05, 0.01));
    let mark_material = materials.add(StandardMaterial::from(Color::from(css::WHITE)));
    cmds.spawn((
        KnobSwitch {
            mouse_input: MouseAxis::X,
            rotate_speed: 250.0,
            range_limit: true,
            min_angle: -60.0,
            max_angle: 60.0,
            adsorbent: true,
            adsorbent_angles: vec![-60.0, 0.0, 60.0],
            ..Default::default()
        },
        Field::Sphere(0.1),
        Mesh3d(knob_face),
        MeshMaterial3d(materials.add(StandardMaterial::from(Color::from(css::SLATE_GRAY)))),
        Transform::from_xyz(0.2, 0.0, 0.04),
    ))
    .observe(
        |t: Trigger<SwitchAdsorbed>, knobs: Query<(&KnobSwitch, &KnobState)>| {
            if let Ok((knob, state)) = knobs.get(t.entity()) {
                info!(
                    "knob {} snapped to {}° ({:.0}%)",
                    t.entity(),
                    state.angle(),
                    knob.percent(state.angle()) * 100.0
                );
            }
        },
    )
    .with_children(|parent| {
        // pointer mark so the rotation is visible
        parent.spawn((
            Mesh3d(mark_mesh),
            MeshMaterial3d(mark_material),
            Transform::from_xyz(0.0, 0.05, 0.03),
        ));
    });
}
