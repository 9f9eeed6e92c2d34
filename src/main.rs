//! Render a mesh to an image file.
//!
//! ```text
//! polyfill [model.obj|-] [out.png] [texture.png]
//! ```
//!
//! Without a model (or with `-`) the built-in two-box model is drawn.

use std::env;
use std::error::Error;

use polyfill::colors;
use polyfill::prelude::*;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

/// Rotate the model for a three-quarter view and fit it into the middle of
/// the screen. Screen y grows downward and larger z is closer.
fn fit_to_screen(mesh: &mut Mesh, width: u32, height: u32) {
    let vertices = mesh.vertices_mut();
    for v in vertices.iter_mut() {
        *v = v.rotate_y(0.6).rotate_x(0.4);
    }

    let mut min = Vec3::new(f32::MAX, f32::MAX, 0.0);
    let mut max = Vec3::new(f32::MIN, f32::MIN, 0.0);
    for v in vertices.iter() {
        min = Vec3::new(min.x.min(v.x), min.y.min(v.y), 0.0);
        max = Vec3::new(max.x.max(v.x), max.y.max(v.y), 0.0);
    }
    let extent = (max.x - min.x).max(max.y - min.y).max(f32::EPSILON);
    let scale = 0.8 * width.min(height) as f32 / extent;
    let center = (min + max) * 0.5;

    for v in vertices.iter_mut() {
        *v = Vec3::new(
            width as f32 / 2.0 + (v.x - center.x) * scale,
            height as f32 / 2.0 - (v.y - center.y) * scale,
            v.z * scale,
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let model = args.first().map(String::as_str).filter(|p| *p != "-");
    let output = args.get(1).map(String::as_str).unwrap_or("polyfill.png");
    let texture = args.get(2).map(Texture::from_file).transpose()?;

    let mut mesh = match model {
        Some(path) => Mesh::load_all_from_obj(path)?.swap_remove(0),
        None => Mesh::two_boxes(1.0),
    };
    fit_to_screen(&mut mesh, WIDTH, HEIGHT);

    let light = DirectionalLight::new(Vec3::new(0.4, 0.6, -1.0));
    let mut shader = GouraudShader::lit(&mesh, &light);

    let mut renderer = Renderer::new(WIDTH, HEIGHT);
    renderer.clear(colors::BACKGROUND);
    let mut rasterizer = Rasterizer::new();
    let stats = rasterizer.render_mesh(
        &mesh,
        RenderMode::FilledWireframe,
        &mut shader,
        texture.as_ref(),
        &mut renderer.as_framebuffer(),
    );

    println!(
        "{}: {} polygons filled, {} skipped, {} pixels -> {}",
        mesh.name(),
        stats.polygons_filled,
        stats.polygons_skipped,
        stats.pixels_filled,
        output
    );
    renderer.save(output)?;
    Ok(())
}
