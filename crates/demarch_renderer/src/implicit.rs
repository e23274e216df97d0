//! Implicit shapes: a distance estimator placed in the world and intersected by
//! sphere marching.

use crate::config::MarchConfig;
use crate::estimator::DistanceEstimator;
use crate::interaction::SurfaceInteraction;
use crate::march::{sphere_march, MarchHit};
use crate::normal::estimate_normal;
use crate::shape::Shape;
use demarch_math::sampling::{coordinate_system, uniform_cone_pdf};
use demarch_math::{offset_ray_origin, Aabb, Ray, Transform, Vec2, Vec3};
use std::f32::consts::PI;

/// A [`DistanceEstimator`] with its marching parameters and object/world
/// placement.
pub struct ImplicitShape<D> {
    estimator: D,
    config: MarchConfig,
    object_to_world: Transform,
    world_to_object: Transform,
    reverse_orientation: bool,
    transform_swaps_handedness: bool,
}

impl<D: DistanceEstimator> ImplicitShape<D> {
    pub fn new(
        estimator: D,
        config: MarchConfig,
        object_to_world: Transform,
        reverse_orientation: bool,
    ) -> Self {
        Self {
            estimator,
            config,
            world_to_object: object_to_world.inverse(),
            transform_swaps_handedness: object_to_world.swaps_handedness(),
            object_to_world,
            reverse_orientation,
        }
    }

    pub fn estimator(&self) -> &D {
        &self.estimator
    }

    pub fn config(&self) -> &MarchConfig {
        &self.config
    }

    pub fn object_to_world(&self) -> &Transform {
        &self.object_to_world
    }

    pub fn reverse_orientation(&self) -> bool {
        self.reverse_orientation
    }

    /// Solid angle subtended by the shape's bounding sphere as seen from `p`.
    pub fn solid_angle(&self, p: Vec3) -> f32 {
        let center = self.object_to_world.apply_point(Vec3::ZERO);
        let radius = self.estimator.bounding_radius();
        let distance_squared = p.distance_squared(center);

        if distance_squared <= radius * radius {
            return 4.0 * PI;
        }

        let sin2_theta_max = radius * radius / distance_squared;
        let cos_theta_max = (1.0 - sin2_theta_max).max(0.0).sqrt();
        2.0 * PI * (1.0 - cos_theta_max)
    }

    /// Solid-angle density of direction `wi` leaving `reference` towards the shape.
    ///
    /// Outside the bounding sphere directions are taken as uniform over the
    /// cone the sphere subtends. From inside it, the density is the surface
    /// area density seen along `wi`, which is zero on a miss or for a shape
    /// of unbounded area.
    pub fn pdf(&self, reference: &SurfaceInteraction, wi: Vec3) -> f32 {
        let origin = offset_ray_origin(reference.p, reference.p_error, reference.n, wi);
        let center = self.object_to_world.apply_point(Vec3::ZERO);
        let radius = self.estimator.bounding_radius();
        let distance_squared = origin.distance_squared(center);

        if distance_squared <= radius * radius {
            return self.area_pdf(reference, origin, wi);
        }

        let sin2_theta_max = radius * radius / distance_squared;
        let cos_theta_max = (1.0 - sin2_theta_max).max(0.0).sqrt();
        uniform_cone_pdf(cos_theta_max)
    }

    fn area_pdf(&self, reference: &SurfaceInteraction, origin: Vec3, wi: Vec3) -> f32 {
        let Some(hit) = self.intersect(&Ray::new(origin, wi)) else {
            return 0.0;
        };
        let cosine = hit.n.dot(-wi).abs();
        let pdf = reference.p.distance_squared(hit.p) / (cosine * self.area());
        if pdf.is_finite() {
            pdf
        } else {
            0.0
        }
    }

    fn march(&self, ray: &Ray) -> Option<(Ray, MarchHit)> {
        let (object_ray, _, _) = self.world_to_object.apply_ray_with_error(ray);
        let hit = sphere_march(&self.estimator, &object_ray, &self.config)?;
        Some((object_ray, hit))
    }
}

impl<D: DistanceEstimator> Shape for ImplicitShape<D> {
    fn object_bound(&self) -> Aabb {
        self.estimator.object_bound()
    }

    fn world_bound(&self) -> Aabb {
        self.object_to_world.apply_aabb(&self.estimator.object_bound())
    }

    fn area(&self) -> f32 {
        self.estimator.area()
    }

    fn intersect(&self, ray: &Ray) -> Option<SurfaceInteraction> {
        let (object_ray, hit) = self.march(ray)?;

        // The march rejects zero-length directions, so this is finite.
        let back = -object_ray.direction / object_ray.direction.length();
        let n = estimate_normal(&self.estimator, hit.p, self.config.normal_epsilon(), back);
        let (dpdu, dpdv) = coordinate_system(n);

        let mut interaction = SurfaceInteraction {
            p: hit.p,
            p_error: Vec3::splat(self.config.error_bound()),
            uv: Vec2::ZERO,
            wo: back,
            n,
            dpdu,
            dpdv,
            dndu: n,
            dndv: n,
            t: hit.t,
        };
        if self.reverse_orientation ^ self.transform_swaps_handedness {
            interaction.flip_normal();
        }

        Some(interaction.transformed(&self.object_to_world))
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        self.march(ray).is_some()
    }
}
