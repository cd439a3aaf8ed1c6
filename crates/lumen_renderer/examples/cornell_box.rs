//! Cornell box demo.
//!
//! Renders the classic enclosed box: colored side walls, a bright area
//! light in the ceiling, a rotated white block and a blue glass sphere.
//! Saves the result as PNG.

use std::sync::Arc;

use anyhow::Result;
use lumen_renderer::{
    render, Camera, Complex, Diffuse, Emissive, Ior, Primitive, Refractive, RenderConfig, Scene,
    Vec3,
};

fn main() -> Result<()> {
    env_logger::init();

    println!("Lumen - Cornell box");
    println!("===================");

    let scene = build_scene();

    let mut camera = Camera::new(Vec3::new(278.0, 278.0, 800.0), Vec3::new(278.0, 278.0, 0.0))
        .with_resolution(400, 400)
        .with_fov(40.0);
    camera.initialize();

    let config = RenderConfig::default().with_samples(16).with_seed(7);

    println!(
        "Rendering {}x{} @ {} spp...",
        camera.screen_width, camera.screen_height, config.samples_per_pixel
    );

    let start = std::time::Instant::now();
    let image = render(&scene, &camera, &config);
    println!("Rendered in {:?}", start.elapsed());

    let filename = "cornell_box.png";
    image::save_buffer(
        filename,
        &image.to_rgba(),
        image.width,
        image.height,
        image::ColorType::Rgba8,
    )?;
    println!("Saved to {filename}");

    Ok(())
}

fn build_scene() -> Scene {
    let green_diffuse = Arc::new(Diffuse::new(Vec3::new(0.12, 0.45, 0.15)));
    let red_diffuse = Arc::new(Diffuse::new(Vec3::new(0.65, 0.05, 0.05)));
    let white_diffuse = Arc::new(Diffuse::new(Vec3::new(0.73, 0.73, 0.73)));
    let emissive_white = Arc::new(Emissive::new(Vec3::new(15.0, 15.0, 15.0)));
    let blue_glass = Arc::new(Refractive::new(Ior::new(
        Complex::new(1.5, 0.05e-8),
        Complex::new(1.5, 0.02e-8),
        Complex::new(1.5, 0.0),
    )));

    let mut scene = Scene::new();

    // Ceiling light
    scene.add(Primitive::plane(
        Vec3::new(213.0 + 130.0 / 2.0, 554.0, -227.0 - 105.0 / 2.0),
        130.0,
        105.0,
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        emissive_white,
    ));

    // Back wall
    scene.add(Primitive::plane(
        Vec3::new(555.0 / 2.0, 555.0 / 2.0, -555.0),
        555.0,
        555.0,
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        white_diffuse.clone(),
    ));

    // Left wall (green)
    scene.add(Primitive::plane(
        Vec3::new(0.0, 555.0 / 2.0, -555.0 / 2.0),
        555.0,
        555.0,
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, -1.0),
        green_diffuse,
    ));

    // Right wall (red)
    scene.add(Primitive::plane(
        Vec3::new(555.0, 555.0 / 2.0, -555.0 / 2.0),
        555.0,
        555.0,
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, -1.0),
        red_diffuse,
    ));

    // Ceiling
    scene.add(Primitive::plane(
        Vec3::new(555.0 / 2.0, 555.0, -555.0 / 2.0),
        555.0,
        555.0,
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -1.0),
        white_diffuse.clone(),
    ));

    // Floor
    scene.add(Primitive::plane(
        Vec3::new(555.0 / 2.0, 0.0, -555.0 / 2.0),
        555.0,
        555.0,
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -1.0),
        white_diffuse.clone(),
    ));

    // Tall white block
    scene.add(
        Primitive::cuboid(
            Vec3::new(182.5, 165.0, -285.0 - 160.0 / 2.0),
            165.0,
            165.0 * 2.0,
            165.0,
            white_diffuse,
        )
        .without_shadow()
        .rotated(15.0, Vec3::Y),
    );

    // Glass sphere
    scene.add(
        Primitive::sphere(
            Vec3::new(370.5, 165.0 / 2.0, -65.0 - 185.0 / 2.0),
            165.0 / 2.0,
            blue_glass,
        )
        .without_shadow()
        .with_max_depth(3),
    );

    scene
}
