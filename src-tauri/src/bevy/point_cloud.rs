//! Point-list meshes for the star field and the particle shell

use bevy::{
    asset::RenderAssetUsages, math::Vec3, prelude::*,
    render::render_resource::PrimitiveTopology,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::{PI, TAU};

/// `count` points spread over a spherical shell between `radius` and
/// `radius + depth`. The same seed always yields the same sky.
pub fn star_shell(count: usize, radius: f32, depth: f32, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            // Uniform direction: uniform z and azimuth
            let z: f32 = rng.gen_range(-1.0..=1.0);
            let azimuth: f32 = rng.gen_range(0.0..TAU);
            let ring = (1.0 - z * z).sqrt();
            let distance = radius + depth * rng.gen::<f32>();
            Vec3::new(ring * azimuth.cos(), z, ring * azimuth.sin()) * distance
        })
        .collect()
}

/// Vertices of a UV sphere lattice, both seams and poles included
pub fn sphere_lattice(radius: f32, sectors: u32, stacks: u32) -> Vec<Vec3> {
    let mut points = Vec::with_capacity(((sectors + 1) * (stacks + 1)) as usize);
    for i in 0..=stacks {
        let polar = PI * i as f32 / stacks as f32;
        for j in 0..=sectors {
            let azimuth = TAU * j as f32 / sectors as f32;
            points.push(Vec3::new(
                radius * polar.sin() * azimuth.cos(),
                radius * polar.cos(),
                radius * polar.sin() * azimuth.sin(),
            ));
        }
    }
    points
}

pub fn point_mesh(points: Vec<Vec3>) -> Mesh {
    Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::RENDER_WORLD)
        .with_inserted_attribute(
            Mesh::ATTRIBUTE_POSITION,
            points.into_iter().map(|p| p.to_array()).collect::<Vec<_>>(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_stay_inside_the_shell() {
        let stars = star_shell(2000, 100.0, 50.0, 7);
        assert_eq!(stars.len(), 2000);
        for star in &stars {
            let d = star.length();
            assert!((99.99..=150.01).contains(&d), "distance {d}");
        }
    }

    #[test]
    fn stars_are_reproducible_per_seed() {
        assert_eq!(star_shell(64, 100.0, 50.0, 1), star_shell(64, 100.0, 50.0, 1));
        assert_ne!(star_shell(64, 100.0, 50.0, 1), star_shell(64, 100.0, 50.0, 2));
    }

    #[test]
    fn lattice_points_sit_on_the_sphere() {
        let points = sphere_lattice(6.0, 32, 32);
        assert_eq!(points.len(), 33 * 33);
        for p in &points {
            assert!((p.length() - 6.0).abs() < 1e-4);
        }
        assert!(points[0].distance(Vec3::new(0.0, 6.0, 0.0)) < 1e-5);
    }

    #[test]
    fn point_mesh_keeps_every_vertex() {
        let mesh = point_mesh(sphere_lattice(1.0, 4, 4));
        assert_eq!(mesh.count_vertices(), 25);
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::PointList);
    }
}
