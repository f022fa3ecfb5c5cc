use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use meshwarp_deform::{apply_affine_into, Deformer, ExecutionStrategy, Falloff, TransformParams};
use meshwarp_mesh::{GridMesh, SurfaceSize, Vec2};

fn bench_affine(c: &mut Criterion) {
    let mut group = c.benchmark_group("Affine");

    let surface = SurfaceSize {
        width: 1024,
        height: 768,
    };
    let params = TransformParams {
        rotation: 45.0,
        scale_x: 1.2,
        scale_y: 0.8,
        translate_x: 30.0,
        translate_y: -10.0,
    };

    for resolution in [20u32, 64, 256].iter() {
        let mesh = GridMesh::new(*resolution).unwrap();
        group.throughput(criterion::Throughput::Elements(mesh.num_vertices() as u64));

        let parameter_string = format!("{}x{}", resolution, resolution);

        for (name, strategy) in [
            ("serial", ExecutionStrategy::Serial),
            ("par_elements", ExecutionStrategy::ParallelElements),
        ] {
            let mut dst = vec![Vec2::ZERO; mesh.num_vertices()];
            group.bench_with_input(
                BenchmarkId::new(name, &parameter_string),
                &mesh,
                |b, mesh| {
                    b.iter(|| {
                        apply_affine_into(
                            black_box(mesh.rest_positions()),
                            black_box(&mut dst),
                            black_box(&params),
                            black_box(surface),
                            strategy,
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Pipeline");

    let surface = SurfaceSize {
        width: 1024,
        height: 768,
    };
    let params = TransformParams {
        rotation: 15.0,
        scale_x: 1.5,
        translate_x: 80.0,
        ..Default::default()
    };

    for (resolution, num_anchors) in [(20u32, 1usize), (20, 8), (64, 8), (128, 16)].iter() {
        let mesh = GridMesh::new(*resolution).unwrap();
        group.throughput(criterion::Throughput::Elements(mesh.num_vertices() as u64));

        let parameter_string = format!("{}x{}_{}anchors", resolution, resolution, num_anchors);

        // anchors spread along the surface diagonal
        let anchors = (0..*num_anchors)
            .map(|i| {
                let t = (i as f32 + 0.5) / *num_anchors as f32;
                Vec2::new(t * surface.width as f32, t * surface.height as f32)
            })
            .collect::<Vec<_>>();

        for (name, strategy) in [
            ("serial", ExecutionStrategy::Serial),
            ("par_elements", ExecutionStrategy::ParallelElements),
        ] {
            let mut deformer = Deformer::new(Falloff::default(), strategy).unwrap();
            group.bench_with_input(
                BenchmarkId::new(name, &parameter_string),
                &(&mesh, &anchors),
                |b, i| {
                    let (mesh, anchors) = *i;
                    b.iter(|| {
                        deformer
                            .run(
                                black_box(mesh),
                                black_box(&params),
                                anchors.iter().copied(),
                                black_box(surface),
                            )
                            .map(|p| p.len())
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_affine, bench_pipeline);
criterion_main!(benches);
