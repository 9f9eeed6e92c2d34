use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use polyfill::prelude::*;

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

fn small_polygon() -> Vec<Vec3> {
    vec![
        Vec3::new(100.0, 100.0, 0.0),
        Vec3::new(120.0, 100.0, 0.0),
        Vec3::new(110.0, 120.0, 0.0),
    ]
}

fn medium_polygon() -> Vec<Vec3> {
    vec![
        Vec3::new(100.0, 100.0, 0.0),
        Vec3::new(300.0, 120.0, 1.0),
        Vec3::new(260.0, 300.0, 2.0),
        Vec3::new(140.0, 280.0, 1.0),
    ]
}

fn large_polygon() -> Vec<Vec3> {
    vec![
        Vec3::new(50.0, 50.0, 0.0),
        Vec3::new(750.0, 100.0, 0.0),
        Vec3::new(600.0, 560.0, 0.0),
        Vec3::new(400.0, 300.0, 0.0),
        Vec3::new(120.0, 520.0, 0.0),
    ]
}

fn benchmark_single_polygon(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_polygon");
    let color = Color::new(0xFFFF0000);

    for (name, vertices) in [
        ("small", small_polygon()),
        ("medium", medium_polygon()),
        ("large", large_polygon()),
    ] {
        let indices: Vec<usize> = (0..vertices.len()).collect();
        let polygon = PolygonRef::new(&vertices, &indices, color);

        group.bench_with_input(BenchmarkId::new("fill", name), &polygon, |b, polygon| {
            let mut renderer = Renderer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            let mut rasterizer = Rasterizer::new();
            b.iter(|| {
                renderer.clear_depth();
                let mut fb = renderer.as_framebuffer();
                rasterizer
                    .fill_polygon(black_box(polygon), &mut FlatShader, None, &mut fb)
                    .ok()
            });
        });

        group.bench_with_input(BenchmarkId::new("stroke", name), &polygon, |b, polygon| {
            let mut renderer = Renderer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            let mut rasterizer = Rasterizer::new();
            b.iter(|| {
                let mut fb = renderer.as_framebuffer();
                rasterizer.stroke_polygon(black_box(polygon), &mut fb);
            });
        });
    }

    group.finish();
}

fn benchmark_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh");

    // A grid of small quads, plus the two-box model scaled up.
    let mut vertices = Vec::new();
    let mut polygons = Vec::new();
    for row in 0..20 {
        for col in 0..20 {
            let x = col as f32 * 40.0;
            let y = row as f32 * 30.0;
            let base = vertices.len();
            vertices.extend([
                Vec3::new(x, y, 0.0),
                Vec3::new(x + 35.0, y + 3.0, 0.0),
                Vec3::new(x + 30.0, y + 25.0, 0.0),
                Vec3::new(x + 4.0, y + 22.0, 0.0),
            ]);
            polygons.push(vec![base, base + 1, base + 2, base + 3]);
        }
    }
    let grid = Mesh::new("grid", vertices, polygons, Vec::new());

    let mut boxes = Mesh::two_boxes(600.0);
    for v in boxes.vertices_mut() {
        *v = v.rotate_y(0.6).rotate_x(0.4) + Vec3::new(400.0, 300.0, 0.0);
    }
    let mut shader = GouraudShader::lit(&boxes, &DirectionalLight::new(Vec3::new(0.0, 0.0, -1.0)));

    group.bench_function("flat_400_quads", |b| {
        let mut renderer = Renderer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        let mut rasterizer = Rasterizer::new();
        b.iter(|| {
            renderer.clear_depth();
            rasterizer.render_mesh(
                black_box(&grid),
                RenderMode::Filled,
                &mut FlatShader,
                None,
                &mut renderer.as_framebuffer(),
            )
        });
    });

    group.bench_function("gouraud_two_boxes", |b| {
        let mut renderer = Renderer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
        let mut rasterizer = Rasterizer::new();
        b.iter(|| {
            renderer.clear_depth();
            rasterizer.render_mesh(
                black_box(&boxes),
                RenderMode::FilledWireframe,
                &mut shader,
                None,
                &mut renderer.as_framebuffer(),
            )
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_polygon, benchmark_mesh);
criterion_main!(benches);
