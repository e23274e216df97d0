//! Render a Mandelbulb through a 2x2 lightfield camera and save it as a PNG.
//!
//! ```sh
//! cargo run --release -p demarch_renderer --example lightfield_mandelbulb -- bulb.png
//! ```

use anyhow::{Context, Result};
use demarch_core::ParamSet;
use demarch_renderer::{
    create_lightfield_camera, create_mandelbulb_shape, render_preview, PreviewConfig, Transform,
    UVec2, Vec3,
};

const SHAPE_PARAMS: &str = r#"{
    "mandelbulbPower": 8,
    "maxiters": 200,
    "hitEpsilon": 0.001,
    "normalEpsilon": 0.001
}"#;

const CAMERA_PARAMS: &str = r#"{
    "camerasperdim": [2, 2],
    "cameragridbounds": [-1, 1, -1, 1],
    "fov": 50
}"#;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "lightfield_mandelbulb.png".to_string());

    let shape_params = ParamSet::from_json(SHAPE_PARAMS).context("parsing shape parameters")?;
    let bulb = create_mandelbulb_shape(
        Transform::from_translation(Vec3::new(0.0, 0.0, 3.0)),
        false,
        &shape_params,
    )?;

    let camera_params = ParamSet::from_json(CAMERA_PARAMS).context("parsing camera parameters")?;
    let camera = create_lightfield_camera(Transform::IDENTITY, UVec2::new(512, 512), &camera_params)?;
    log::info!(
        "{}x{} tiles of {} pixels",
        camera.cameras_per_dim().x,
        camera.cameras_per_dim().y,
        camera.res()
    );

    let config = PreviewConfig {
        samples_per_pixel: 2,
        max_distance: 10.0,
        ..Default::default()
    };
    let image = render_preview(&camera, &bulb, &config);
    image
        .save_png(&output)
        .with_context(|| format!("writing {}", output))?;
    log::info!("Saved {}", output);

    Ok(())
}
