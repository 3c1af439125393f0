//! Scene setup system
//!
//! This module builds the hero scene: offscreen camera, floating planet,
//! orbital rings, rocket with its trail, star field, particle shell and
//! lights. Every animated entity starts at its pose for `t = 0`.

use bevy::{
    asset::Assets,
    camera::RenderTarget,
    core_pipeline::tonemapping::Tonemapping,
    image::Image,
    math::{
        primitives::{Annulus, Cone, Sphere},
        Quat, Vec3,
    },
    pbr::{MeshMaterial3d, StandardMaterial},
    prelude::*,
    render::{
        render_resource::{Extent3d, TextureFormat, TextureUsages},
        renderer::RenderDevice,
    },
};
use std::f32::consts::FRAC_PI_2;
use tracing::info;

use crate::bevy::components::{
    FloatingGroup, OffscreenCamera, Planet, PrimaryRing, Rocket, SecondaryRing, TrailBead,
};
use crate::bevy::plugins::image_copy::ImageCopier;
use crate::bevy::point_cloud::{point_mesh, sphere_lattice, star_shell};
use crate::config::{backdrop, camera, lighting, trail, RENDER_HEIGHT, RENDER_WIDTH};
use crate::orbit;

/// Hero palette
mod palette {
    use bevy::color::Color;

    const fn hex(r: u8, g: u8, b: u8) -> Color {
        Color::srgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub const NAVY: Color = hex(0x1e, 0x1b, 0x4b);
    pub const BLUE: Color = hex(0x3b, 0x82, 0xf6);
    pub const SKY: Color = hex(0x0e, 0xa5, 0xe9);
    pub const PURPLE: Color = hex(0xa8, 0x55, 0xf7);
}

/// Emissive colour scaled by an intensity factor
fn glow(color: Color, intensity: f32) -> LinearRgba {
    color.to_linear() * intensity
}

/// Setup the hero scene
pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    render_device: Res<RenderDevice>,
) {
    info!("setting up orbit scene");

    let size = Extent3d {
        width: RENDER_WIDTH,
        height: RENDER_HEIGHT,
        depth_or_array_layers: 1,
    };

    // Create render target texture
    let mut render_target_image =
        Image::new_target_texture(size.width, size.height, TextureFormat::bevy_default());
    render_target_image.texture_descriptor.usage |= TextureUsages::COPY_SRC;
    let render_target_image_handle = images.add(render_target_image);

    // Spawn image copier for GPU-to-CPU transfer
    commands.spawn(ImageCopier::new(
        render_target_image_handle.clone(),
        size,
        &render_device,
    ));

    let [r, g, b] = camera::CLEAR_COLOR;
    commands.spawn((
        Camera3d::default(),
        Camera {
            target: RenderTarget::Image(render_target_image_handle.into()),
            clear_color: ClearColorConfig::Custom(Color::srgb(r, g, b)),
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: camera::FOV_DEGREES.to_radians(),
            ..default()
        }),
        Tonemapping::None,
        AmbientLight {
            color: Color::WHITE,
            brightness: lighting::AMBIENT_BRIGHTNESS,
            ..default()
        },
        Transform::from_translation(Vec3::from_array(camera::POSITION))
            .looking_at(Vec3::ZERO, Vec3::Y),
        OffscreenCamera,
    ));

    spawn_planet(&mut commands, &mut meshes, &mut materials);
    spawn_rings(&mut commands, &mut meshes, &mut materials);
    spawn_rocket(&mut commands, &mut meshes, &mut materials);
    spawn_backdrop(&mut commands, &mut meshes, &mut materials);
    spawn_lights(&mut commands);

    info!("orbit scene ready");
}

fn spawn_planet(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let float = orbit::float_offset(0.0);
    let planet_mesh = meshes.add(Sphere::new(1.2).mesh().uv(64, 64));
    let planet_material = materials.add(StandardMaterial {
        base_color: palette::NAVY,
        emissive: glow(palette::BLUE, 0.2),
        metallic: 1.0,
        perceptual_roughness: 0.1,
        ..default()
    });

    commands
        .spawn((
            Transform::from_xyz(0.0, float.lift as f32, 0.0).with_rotation(float.rotation()),
            Visibility::default(),
            FloatingGroup,
        ))
        .with_children(|group| {
            group.spawn((
                Mesh3d(planet_mesh),
                MeshMaterial3d(planet_material),
                Transform::default(),
                Planet,
            ));
        });
}

/// Translucent glowing material visible from both sides of a ring
fn ring_material(color: Color, emissive_intensity: f32, opacity: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: color.with_alpha(opacity),
        emissive: glow(color, emissive_intensity),
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        ..default()
    }
}

fn spawn_rings(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Annulus::new(3.4, 3.45).mesh().resolution(128))),
        MeshMaterial3d(materials.add(ring_material(palette::SKY, 2.0, 0.8))),
        Transform::from_rotation(orbit::primary_ring(0.0).rotation()),
        PrimaryRing,
    ));

    commands.spawn((
        Mesh3d(meshes.add(Annulus::new(2.8, 2.82).mesh().resolution(128))),
        MeshMaterial3d(materials.add(ring_material(palette::PURPLE, 1.0, 0.4))),
        Transform::from_rotation(orbit::secondary_ring().rotation()),
        SecondaryRing,
    ));
}

fn spawn_rocket(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let pose = orbit::rocket(0.0);
    let start = pose.position.as_vec3();

    commands
        .spawn((
            Transform::from_translation(start).looking_at(pose.look_target.as_vec3(), Vec3::Y),
            Visibility::default(),
            Rocket,
        ))
        .with_children(|rocket| {
            // Cone tip points along +Y; turn it to face forward (-Z)
            rocket.spawn((
                Mesh3d(meshes.add(Cone::new(0.1, 0.4).mesh().resolution(8))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: Color::WHITE,
                    emissive: glow(Color::WHITE, 0.5),
                    ..default()
                })),
                Transform::from_rotation(Quat::from_rotation_x(-FRAC_PI_2)),
            ));
            rocket.spawn((
                PointLight {
                    color: palette::SKY,
                    intensity: lighting::ENGINE_GLOW_INTENSITY * lighting::LUMENS_PER_UNIT,
                    range: lighting::ENGINE_GLOW_RANGE,
                    ..default()
                },
                Transform::default(),
            ));
        });

    // Beads never change age, so their fade is baked into the material
    let bead_mesh = meshes.add(Sphere::new(trail::BEAD_RADIUS).mesh().uv(8, 6));
    for index in 0..trail::BEADS {
        let fade = orbit::trail_attenuation(index);
        commands.spawn((
            Mesh3d(bead_mesh.clone()),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: palette::SKY.with_alpha(fade),
                emissive: glow(palette::SKY, fade),
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                ..default()
            })),
            Transform::from_translation(start).with_scale(Vec3::splat(fade)),
            TrailBead(index),
        ));
    }
}

fn spawn_backdrop(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let stars = star_shell(
        backdrop::STAR_COUNT,
        backdrop::STAR_RADIUS,
        backdrop::STAR_DEPTH,
        backdrop::STAR_SEED,
    );
    commands.spawn((
        Mesh3d(meshes.add(point_mesh(stars))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            ..default()
        })),
        Transform::default(),
    ));

    let shell = sphere_lattice(
        backdrop::PARTICLE_SHELL_RADIUS,
        backdrop::PARTICLE_SHELL_SECTORS,
        backdrop::PARTICLE_SHELL_STACKS,
    );
    commands.spawn((
        Mesh3d(meshes.add(point_mesh(shell))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: palette::SKY.with_alpha(0.4),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })),
        Transform::default(),
    ));
}

fn spawn_lights(commands: &mut Commands) {
    commands.spawn((
        PointLight {
            intensity: lighting::KEY_LIGHT_INTENSITY * lighting::LUMENS_PER_UNIT,
            color: palette::BLUE,
            range: 40.0,
            ..default()
        },
        Transform::from_translation(Vec3::from_array(lighting::KEY_LIGHT_POSITION)),
    ));

    commands.spawn((
        PointLight {
            intensity: lighting::FILL_LIGHT_INTENSITY * lighting::LUMENS_PER_UNIT,
            color: palette::PURPLE,
            range: 40.0,
            ..default()
        },
        Transform::from_translation(Vec3::from_array(lighting::FILL_LIGHT_POSITION)),
    ));
}
