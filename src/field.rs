use bevy::{
    math::{vec2, vec3a, Vec3A},
    prelude::*,
};

pub const RAYMARCH_MAX_STEPS: u32 = 256;
pub const RAYMARCH_MIN_STEP_SIZE: f32 = 0.001;
pub const RAYMARCH_MAX_DISTANCE: f32 = 1_000.0;
/// Distances at or below this count as a surface hit.
pub const RAYMARCH_HIT_DISTANCE: f32 = 0.000_5;

pub struct RayMarchResult {
    pub closest_distance: f32,
    pub closest_ray_length: f32,
    /// Ray length at the first surface crossing, if the ray hit.
    pub hit: Option<f32>,
}

/// Analytic collision volume of a switch, evaluated in the entity's frame.
#[derive(Component, Debug, Clone, Copy)]
pub enum Field {
    Sphere(f32),
    Cuboid(Cuboid),
    Cylinder(Cylinder),
}

impl Field {
    pub fn closest_point(
        &self,
        field_transform: &GlobalTransform,
        point: impl Into<Vec3A>,
    ) -> Vec3A {
        let point = point.into();
        point - self.normal(field_transform, point) * self.distance(field_transform, point)
    }

    /// point should be in world-space
    pub fn normal(&self, field_transform: &GlobalTransform, point: impl Into<Vec3A>) -> Vec3A {
        let point = point.into();
        let distance_vec = Vec3A::splat(self.distance(field_transform, point));
        const R: f32 = 0.0001;
        let r_vec = Vec3A::new(
            self.distance(field_transform, point + vec3a(R, 0.0, 0.0)),
            self.distance(field_transform, point + vec3a(0.0, R, 0.0)),
            self.distance(field_transform, point + vec3a(0.0, 0.0, R)),
        );
        let local_normal = distance_vec - r_vec;
        -field_transform
            .affine()
            .transform_vector3a(local_normal)
            .normalize()
    }

    /// point should be in world-space
    pub fn distance(&self, field_transform: &GlobalTransform, point: impl Into<Vec3A>) -> f32 {
        let point = point.into();
        let world_to_local_matrix = field_transform.compute_matrix().inverse();
        let p = world_to_local_matrix.transform_point3a(point);
        match self {
            Field::Sphere(radius) => p.length() - radius,
            Field::Cuboid(cuboid) => {
                let q = Vec3::new(
                    p.x.abs() - cuboid.half_size.x,
                    p.y.abs() - cuboid.half_size.y,
                    p.z.abs() - cuboid.half_size.z,
                );
                let v = Vec3::new(q.x.max(0_f32), q.y.max(0_f32), q.z.max(0_f32));
                v.length() + q.x.max(q.y.max(q.z)).min(0_f32)
            }
            Field::Cylinder(cylinder) => {
                let d = vec2(
                    p.xz().length().abs() - cylinder.radius,
                    p.y.abs() - cylinder.half_height,
                );
                d.x.max(d.y).min(0.0) + d.max(vec2(0.0, 0.0)).length()
            }
        }
    }

    /// Sphere-trace the field along `ray`, stopping at the first surface
    /// crossing. A ray starting inside the volume hits at length zero.
    pub fn raymarch(&self, field_transform: &GlobalTransform, ray: Ray3d) -> RayMarchResult {
        let mut result = RayMarchResult {
            closest_distance: f32::MAX,
            closest_ray_length: 0.0,
            hit: None,
        };

        let mut ray_length = 0.0;
        let mut steps = 0;
        while steps < RAYMARCH_MAX_STEPS && ray_length < RAYMARCH_MAX_DISTANCE {
            let point = ray.origin + (ray.direction.as_vec3() * ray_length);
            let distance = self.distance(field_transform, point);
            if distance < result.closest_distance {
                result.closest_distance = distance;
                result.closest_ray_length = ray_length;
            }
            if distance <= RAYMARCH_HIT_DISTANCE {
                result.hit = Some(ray_length);
                break;
            }
            ray_length += distance.max(RAYMARCH_MIN_STEP_SIZE);
            steps += 1;
        }

        result
    }
}
