//! Lightfield camera: one perspective camera replicated over a grid of film tiles.

use crate::camera::{Camera, CameraSample};
use crate::config::{positive_param, require_finite, require_positive, ConfigError};
use demarch_core::ParamSet;
use demarch_math::sampling::concentric_sample_disk;
use demarch_math::{lerp, Bounds2, Ray, Transform, UVec2, Vec2, Vec3};

const NEAR: f32 = 1e-2;
const FAR: f32 = 1000.0;

/// Lightfield camera settings, as read from a scene description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightfieldParams {
    /// Number of tiles along x and y.
    pub cameras_per_dim: UVec2,
    /// Logical extent of the camera grid, kept for downstream consumers.
    pub grid_bounds: Bounds2,
    pub shutter_open: f32,
    pub shutter_close: f32,
    pub lens_radius: f32,
    pub focal_distance: f32,
    /// Full field of view in degrees, across the shorter screen axis.
    pub fov: f32,
    pub screen_window: Bounds2,
}

impl LightfieldParams {
    /// Defaults for a film of `full_resolution`: a single tile, 90 degree
    /// field of view, pinhole lens and a screen window matching the film aspect.
    pub fn for_film(full_resolution: UVec2) -> Self {
        let aspect = full_resolution.x as f32 / full_resolution.y.max(1) as f32;
        Self {
            cameras_per_dim: UVec2::ONE,
            grid_bounds: Bounds2::from_extents([-1.0, 1.0, -1.0, 1.0]),
            shutter_open: 0.0,
            shutter_close: 1.0,
            lens_radius: 0.0,
            focal_distance: 1e6,
            fov: 90.0,
            screen_window: aspect_screen_window(aspect),
        }
    }

    /// Read `camerasperdim`, `cameragridbounds` and the usual projective camera
    /// parameters. Malformed or out-of-range values are logged and the
    /// defaults kept, so the result always passes [`LightfieldCamera::new`]
    /// except for a grid larger than the film.
    pub fn from_params(params: &ParamSet, full_resolution: UVec2) -> Self {
        let mut settings = Self::for_film(full_resolution);

        if let Some(cpd) = params.find_ints("camerasperdim") {
            match cpd[..] {
                [x, y] if x >= 1 && y >= 1 => {
                    settings.cameras_per_dim = UVec2::new(x as u32, y as u32)
                }
                [_, _] => log::error!(
                    "\"camerasperdim\" values must be positive, got {:?}",
                    cpd
                ),
                _ => log::error!(
                    "{} values supplied for \"camerasperdim\". Expected 2.",
                    cpd.len()
                ),
            }
        }

        if let Some(cgb) = params.find_floats("cameragridbounds") {
            match <[f32; 4]>::try_from(cgb.as_slice()) {
                Ok(extents) => settings.grid_bounds = Bounds2::from_extents(extents),
                Err(_) => log::error!(
                    "{} values supplied for \"cameragridbounds\". Expected 4.",
                    cgb.len()
                ),
            }
        }

        let mut open = params.find_one_float("shutteropen", settings.shutter_open);
        let mut close = params.find_one_float("shutterclose", settings.shutter_close);
        if close < open {
            log::warn!(
                "Shutter close time [{}] < shutter open [{}]. Swapping them.",
                close,
                open
            );
            std::mem::swap(&mut open, &mut close);
        }
        settings.shutter_open = open;
        settings.shutter_close = close;

        settings.lens_radius = params.find_one_float("lensradius", settings.lens_radius);
        settings.focal_distance = positive_param(params, "focaldistance", settings.focal_distance);

        let frame = params.find_one_float(
            "frameaspectratio",
            full_resolution.x as f32 / full_resolution.y.max(1) as f32,
        );
        settings.screen_window = aspect_screen_window(frame);
        if let Some(sw) = params.find_floats("screenwindow") {
            match <[f32; 4]>::try_from(sw.as_slice()) {
                Ok(extents) => {
                    let window = Bounds2::from_extents(extents);
                    if window.width() != 0.0 && window.height() != 0.0 {
                        settings.screen_window = window;
                    } else {
                        log::error!("\"screenwindow\" {:?} has no area; ignoring it", extents);
                    }
                }
                Err(_) => log::error!("\"screenwindow\" should have four values"),
            }
        }

        let mut fov = params.find_one_float("fov", settings.fov);
        let half_fov = params.find_one_float("halffov", -1.0);
        if half_fov > 0.0 {
            fov = 2.0 * half_fov;
        }
        if fov > 0.0 && fov < 180.0 {
            settings.fov = fov;
        } else {
            log::error!("{}; using {}", ConfigError::FieldOfView(fov), settings.fov);
        }

        settings
    }
}

fn aspect_screen_window(frame: f32) -> Bounds2 {
    if frame > 1.0 {
        Bounds2::from_extents([-frame, frame, -1.0, 1.0])
    } else {
        Bounds2::from_extents([-1.0, 1.0, -1.0 / frame, 1.0 / frame])
    }
}

/// A perspective camera whose film is split into `cameras_per_dim` equal tiles.
///
/// Every tile sees the same frustum: a film sample is folded into its tile
/// before projection, so a lenslet array is simulated without distinct
/// camera positions. Rays always have weight 1 and no differentials.
#[derive(Debug, Clone)]
pub struct LightfieldCamera {
    camera_to_world: Transform,
    full_resolution: UVec2,
    cameras_per_dim: UVec2,
    grid_bounds: Bounds2,
    /// Tile resolution in pixels.
    res: Vec2,
    shutter_open: f32,
    shutter_close: f32,
    lens_radius: f32,
    focal_distance: f32,
    raster_to_camera: Transform,
    dx_camera: Vec3,
    dy_camera: Vec3,
    image_plane_area: f32,
}

impl LightfieldCamera {
    pub fn new(
        camera_to_world: Transform,
        full_resolution: UVec2,
        settings: &LightfieldParams,
    ) -> Result<Self, ConfigError> {
        let cpd = settings.cameras_per_dim;
        if cpd.x == 0 || cpd.y == 0 || cpd.x > full_resolution.x || cpd.y > full_resolution.y {
            return Err(ConfigError::CameraGrid {
                grid_x: cpd.x,
                grid_y: cpd.y,
                width: full_resolution.x,
                height: full_resolution.y,
            });
        }
        if !(settings.fov > 0.0 && settings.fov < 180.0) {
            return Err(ConfigError::FieldOfView(settings.fov));
        }
        require_finite("shutteropen", settings.shutter_open)?;
        require_finite("shutterclose", settings.shutter_close)?;
        require_finite("lensradius", settings.lens_radius)?;
        require_positive("focaldistance", settings.focal_distance)?;

        let window = settings.screen_window;
        require_positive("screenwindow", window.width().abs())?;
        require_positive("screenwindow", window.height().abs())?;

        // Integer division: leftover pixels past the last full tile wrap around.
        let res = (full_resolution / cpd).as_vec2();

        let camera_to_screen = Transform::perspective(settings.fov, NEAR, FAR);
        let screen_to_raster = Transform::from_scale(Vec3::new(res.x, res.y, 1.0))
            * Transform::from_scale(Vec3::new(
                1.0 / (window.max.x - window.min.x),
                1.0 / (window.min.y - window.max.y),
                1.0,
            ))
            * Transform::from_translation(Vec3::new(-window.min.x, -window.max.y, 0.0));
        let raster_to_camera = camera_to_screen.inverse() * screen_to_raster.inverse();

        let origin = raster_to_camera.apply_point(Vec3::ZERO);
        let dx_camera = raster_to_camera.apply_point(Vec3::X) - origin;
        let dy_camera = raster_to_camera.apply_point(Vec3::Y) - origin;

        let p_min = origin / origin.z;
        let p_max = raster_to_camera.apply_point(Vec3::new(res.x, res.y, 0.0));
        let p_max = p_max / p_max.z;
        let image_plane_area = ((p_max.x - p_min.x) * (p_max.y - p_min.y)).abs();

        log::debug!(
            "Lightfield camera: {}x{} tiles of {}x{} pixels, fov {}",
            cpd.x,
            cpd.y,
            res.x,
            res.y,
            settings.fov
        );

        Ok(Self {
            camera_to_world,
            full_resolution,
            cameras_per_dim: cpd,
            grid_bounds: settings.grid_bounds,
            res,
            shutter_open: settings.shutter_open,
            shutter_close: settings.shutter_close,
            lens_radius: settings.lens_radius.max(0.0),
            focal_distance: settings.focal_distance,
            raster_to_camera,
            dx_camera,
            dy_camera,
            image_plane_area,
        })
    }

    /// Tile resolution: the full film resolution divided by the grid size.
    pub fn res(&self) -> Vec2 {
        self.res
    }

    pub fn cameras_per_dim(&self) -> UVec2 {
        self.cameras_per_dim
    }

    pub fn grid_bounds(&self) -> Bounds2 {
        self.grid_bounds
    }

    pub fn shutter(&self) -> (f32, f32) {
        (self.shutter_open, self.shutter_close)
    }

    /// Camera-space offset of a one-pixel step along raster x.
    pub fn dx_camera(&self) -> Vec3 {
        self.dx_camera
    }

    pub fn dy_camera(&self) -> Vec3 {
        self.dy_camera
    }

    /// Area of one tile's image on the `z = 1` plane.
    pub fn image_plane_area(&self) -> f32 {
        self.image_plane_area
    }

    /// Which grid tile a full-film raster position falls in.
    pub fn tile_index(&self, p_film: Vec2) -> UVec2 {
        let tile = (p_film / self.res).floor().max(Vec2::ZERO).as_uvec2();
        tile.min(self.cameras_per_dim - UVec2::ONE)
    }

    /// `p_film` folded into raster coordinates local to its tile.
    pub fn local_film_position(&self, p_film: Vec2) -> Vec2 {
        Vec2::new(p_film.x % self.res.x, p_film.y % self.res.y)
    }
}

impl Camera for LightfieldCamera {
    fn film_resolution(&self) -> UVec2 {
        self.full_resolution
    }

    fn generate_ray(&self, sample: &CameraSample) -> (Ray, f32) {
        let p_film = self.local_film_position(sample.p_film);
        let p_camera = self.raster_to_camera.apply_point(p_film.extend(0.0));

        let mut origin = Vec3::ZERO;
        let mut direction = p_camera.normalize();

        if self.lens_radius > 0.0 {
            let p_lens = self.lens_radius * concentric_sample_disk(sample.p_lens);
            let ft = self.focal_distance / direction.z;
            let p_focus = direction * ft;

            origin = p_lens.extend(0.0);
            direction = (p_focus - origin).normalize();
        }

        let time = lerp(sample.time, self.shutter_open, self.shutter_close);
        let ray = Ray::new(origin, direction).with_time(time);
        (self.camera_to_world.apply_ray(&ray), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_camera(resolution: UVec2, cpd: UVec2) -> LightfieldCamera {
        let mut settings = LightfieldParams::for_film(resolution);
        settings.cameras_per_dim = cpd;
        settings.screen_window = Bounds2::from_extents([-1.0, 1.0, -1.0, 1.0]);
        LightfieldCamera::new(Transform::IDENTITY, resolution, &settings).unwrap()
    }

    fn sample_at(x: f32, y: f32) -> CameraSample {
        CameraSample {
            p_film: Vec2::new(x, y),
            p_lens: Vec2::splat(0.5),
            time: 0.0,
        }
    }

    #[test]
    fn test_tile_resolution() {
        let camera = square_camera(UVec2::new(800, 400), UVec2::new(4, 2));
        assert_eq!(camera.res(), Vec2::new(200.0, 200.0));

        // Integer division drops the remainder.
        let camera = square_camera(UVec2::new(801, 401), UVec2::new(2, 2));
        assert_eq!(camera.res(), Vec2::new(400.0, 200.0));
    }

    #[test]
    fn test_tile_boundary_wraps_to_origin() {
        let camera = square_camera(UVec2::new(400, 400), UVec2::new(2, 2));
        let res = camera.res();

        assert_eq!(camera.local_film_position(res), Vec2::ZERO);
        let (at_boundary, _) = camera.generate_ray(&sample_at(res.x, res.y));
        let (at_origin, _) = camera.generate_ray(&sample_at(0.0, 0.0));
        assert_eq!(at_boundary, at_origin);

        let (a, _) = camera.generate_ray(&sample_at(res.x + 37.5, 12.25));
        let (b, _) = camera.generate_ray(&sample_at(37.5, 12.25));
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_tile_sees_the_same_frustum() {
        let camera = square_camera(UVec2::new(300, 200), UVec2::new(3, 2));

        let (first, _) = camera.generate_ray(&sample_at(50.0, 50.0));
        let (last, _) = camera.generate_ray(&sample_at(250.0, 150.0));
        assert_eq!(first, last);
        assert!((first.direction - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_corner_ray_matches_field_of_view() {
        let camera = square_camera(UVec2::new(100, 100), UVec2::ONE);
        let (ray, weight) = camera.generate_ray(&sample_at(0.0, 0.0));

        // Raster y points down, camera y up.
        let expected = Vec3::new(-1.0, 1.0, 1.0).normalize();
        assert!((ray.direction - expected).length() < 1e-3);
        assert_eq!(weight, 1.0);
        assert!(ray.origin.length() < 1e-4);
        assert_eq!(ray.t_max, f32::INFINITY);
    }

    #[test]
    fn test_image_plane_area_and_pixel_steps() {
        let camera = square_camera(UVec2::new(100, 100), UVec2::ONE);

        assert!((camera.image_plane_area() - 4.0).abs() < 1e-3);
        // One pixel is 2/100 of the z = 1 image plane, scaled down to the near plane.
        let dx = camera.dx_camera() / NEAR;
        let dy = camera.dy_camera() / NEAR;
        assert!((dx - Vec3::new(0.02, 0.0, 0.0)).length() < 1e-4);
        assert!((dy - Vec3::new(0.0, -0.02, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_camera_to_world_is_applied() {
        let resolution = UVec2::new(64, 64);
        let settings = LightfieldParams::for_film(resolution);
        let placement = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let camera = LightfieldCamera::new(placement, resolution, &settings).unwrap();

        let (ray, _) = camera.generate_ray(&sample_at(32.0, 32.0));
        assert!((ray.origin - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-4);
        assert!((ray.direction - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_no_differentials() {
        let camera = square_camera(UVec2::new(64, 64), UVec2::new(2, 2));
        let sample = sample_at(10.0, 20.0);

        let (differential, weight) = camera.generate_ray_differential(&sample);
        let (ray, _) = camera.generate_ray(&sample);
        assert!(!differential.has_differentials);
        assert_eq!(differential.ray, ray);
        assert_eq!(weight, 1.0);
    }

    #[test]
    fn test_thin_lens_focuses_on_plane() {
        let resolution = UVec2::new(64, 64);
        let mut settings = LightfieldParams::for_film(resolution);
        settings.lens_radius = 0.5;
        settings.focal_distance = 5.0;
        let camera = LightfieldCamera::new(Transform::IDENTITY, resolution, &settings).unwrap();

        for p_lens in [Vec2::new(0.1, 0.9), Vec2::new(0.8, 0.3), Vec2::new(1.0, 0.5)] {
            let sample = CameraSample {
                p_film: Vec2::new(32.0, 32.0),
                p_lens,
                time: 0.0,
            };
            let (ray, _) = camera.generate_ray(&sample);

            assert!(ray.origin.truncate().length() <= 0.5 + 1e-4);
            assert!(ray.origin.z.abs() < 1e-4);
            let t = (5.0 - ray.origin.z) / ray.direction.z;
            assert!(ray.at(t).truncate().length() < 1e-3);
        }
    }

    #[test]
    fn test_time_spans_shutter() {
        let params = ParamSet::new()
            .with_float("shutteropen", 1.0)
            .with_float("shutterclose", 0.5);
        let resolution = UVec2::new(32, 32);
        let settings = LightfieldParams::from_params(&params, resolution);
        assert_eq!((settings.shutter_open, settings.shutter_close), (0.5, 1.0));

        let camera = LightfieldCamera::new(Transform::IDENTITY, resolution, &settings).unwrap();
        let mut sample = sample_at(1.0, 1.0);
        sample.time = 0.5;
        let (ray, _) = camera.generate_ray(&sample);
        assert!((ray.time - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_from_params_reads_everything() {
        let params = ParamSet::new()
            .with_ints("camerasperdim", &[4, 2])
            .with_floats("cameragridbounds", &[-2.0, 2.0, -1.0, 1.0])
            .with_float("lensradius", 0.1)
            .with_float("focaldistance", 7.0)
            .with_floats("screenwindow", &[-0.5, 0.5, -0.25, 0.25])
            .with_float("halffov", 30.0);
        let settings = LightfieldParams::from_params(&params, UVec2::new(800, 400));

        assert_eq!(settings.cameras_per_dim, UVec2::new(4, 2));
        assert_eq!(settings.grid_bounds, Bounds2::from_extents([-2.0, 2.0, -1.0, 1.0]));
        assert_eq!(settings.lens_radius, 0.1);
        assert_eq!(settings.focal_distance, 7.0);
        assert_eq!(settings.screen_window, Bounds2::from_extents([-0.5, 0.5, -0.25, 0.25]));
        assert_eq!(settings.fov, 60.0);
        assert!(params.report_unused().is_empty());
    }

    #[test]
    fn test_from_params_keeps_defaults_on_malformed_values() {
        let _ = env_logger::builder().is_test(true).try_init();
        let params = ParamSet::new()
            .with_ints("camerasperdim", &[2, 2, 2])
            .with_floats("cameragridbounds", &[0.0, 1.0, 2.0])
            .with_floats("screenwindow", &[0.0, 1.0]);
        let settings = LightfieldParams::from_params(&params, UVec2::new(400, 200));

        assert_eq!(settings.cameras_per_dim, UVec2::ONE);
        assert_eq!(settings.grid_bounds, Bounds2::from_extents([-1.0, 1.0, -1.0, 1.0]));
        // Aspect 2 film.
        assert_eq!(settings.screen_window, Bounds2::from_extents([-2.0, 2.0, -1.0, 1.0]));

        let zero = ParamSet::new().with_ints("camerasperdim", &[0, 3]);
        assert_eq!(
            LightfieldParams::from_params(&zero, UVec2::new(400, 200)).cameras_per_dim,
            UVec2::ONE
        );
    }

    #[test]
    fn test_from_params_replaces_out_of_range_values() {
        let _ = env_logger::builder().is_test(true).try_init();
        let params = ParamSet::new()
            .with_float("fov", 200.0)
            .with_float("focaldistance", -1.0)
            .with_floats("screenwindow", &[0.5, 0.5, -1.0, 1.0]);
        let resolution = UVec2::new(64, 64);
        let settings = LightfieldParams::from_params(&params, resolution);

        assert_eq!(settings.fov, 90.0);
        assert_eq!(settings.focal_distance, 1e6);
        assert_eq!(settings.screen_window, Bounds2::from_extents([-1.0, 1.0, -1.0, 1.0]));
        assert!(LightfieldCamera::new(Transform::IDENTITY, resolution, &settings).is_ok());

        let zero_half = ParamSet::new().with_float("fov", 0.0).with_float("halffov", 0.0);
        assert_eq!(LightfieldParams::from_params(&zero_half, resolution).fov, 90.0);
    }

    #[test]
    fn test_tall_film_screen_window() {
        let settings = LightfieldParams::for_film(UVec2::new(100, 200));
        assert_eq!(settings.screen_window, Bounds2::from_extents([-1.0, 1.0, -2.0, 2.0]));
    }

    #[test]
    fn test_new_rejects_bad_settings() {
        let resolution = UVec2::new(16, 16);

        let mut settings = LightfieldParams::for_film(resolution);
        settings.cameras_per_dim = UVec2::new(32, 1);
        assert!(matches!(
            LightfieldCamera::new(Transform::IDENTITY, resolution, &settings),
            Err(ConfigError::CameraGrid { grid_x: 32, .. })
        ));

        let mut settings = LightfieldParams::for_film(resolution);
        settings.fov = 180.0;
        assert!(matches!(
            LightfieldCamera::new(Transform::IDENTITY, resolution, &settings),
            Err(ConfigError::FieldOfView(_))
        ));

        let mut settings = LightfieldParams::for_film(resolution);
        settings.focal_distance = 0.0;
        assert!(LightfieldCamera::new(Transform::IDENTITY, resolution, &settings).is_err());
    }

    #[test]
    fn test_tile_index() {
        let camera = square_camera(UVec2::new(800, 400), UVec2::new(4, 2));

        assert_eq!(camera.tile_index(Vec2::new(10.0, 10.0)), UVec2::ZERO);
        assert_eq!(camera.tile_index(Vec2::new(250.0, 10.0)), UVec2::new(1, 0));
        assert_eq!(camera.tile_index(Vec2::new(799.0, 399.0)), UVec2::new(3, 1));
        assert_eq!(camera.tile_index(Vec2::new(800.0, 400.0)), UVec2::new(3, 1));
    }
}
