use approx::assert_relative_eq;
use meshwarp_deform::{
    apply_affine, apply_constraints, deform, nearest_vertex, DeformError, Deformer,
    ExecutionStrategy, Falloff, TransformParams,
};
use meshwarp_mesh::{GridMesh, SurfaceSize, Vec2};

fn square_surface() -> SurfaceSize {
    SurfaceSize {
        width: 100,
        height: 100,
    }
}

#[test]
fn test_center_anchor_on_small_mesh() -> Result<(), DeformError> {
    let mesh = GridMesh::new(2)?;
    assert_eq!(mesh.num_vertices(), 9);
    assert_eq!(mesh.num_triangles(), 8);

    let positions = deform(
        &mesh,
        &TransformParams::IDENTITY,
        &[Vec2::new(50.0, 50.0)],
        square_surface(),
    )?;

    assert_eq!(positions[4], Vec2::ZERO);
    // identity leaves no displacement to pull back
    for corner in [0, 2, 6, 8] {
        assert_eq!(positions[corner], mesh.rest_positions()[corner]);
    }
    Ok(())
}

#[test]
fn test_anchor_holds_under_global_transform() -> Result<(), DeformError> {
    let mesh = GridMesh::new(10)?;
    let surface = SurfaceSize {
        width: 640,
        height: 480,
    };
    let params = TransformParams {
        rotation: 45.0,
        scale_x: 1.8,
        scale_y: 0.6,
        translate_x: 120.0,
        translate_y: 80.0,
    };
    let anchor_px = Vec2::new(128.0, 96.0);
    let anchor = surface.pixel_to_normalized(anchor_px);

    let positions = deform(&mesh, &params, &[anchor_px], surface)?;
    let owned = nearest_vertex(mesh.rest_positions(), anchor).unwrap();
    assert_eq!(positions[owned], anchor);
    Ok(())
}

#[test]
fn test_opposite_corner_anchors_compound() -> Result<(), DeformError> {
    let mesh = GridMesh::new(4)?;
    let surface = square_surface();
    let params = TransformParams {
        translate_x: 10.0,
        translate_y: -20.0,
        ..Default::default()
    };
    // bottom-left and top-right corners of the normalized domain
    let anchors_px = [Vec2::new(0.0, 100.0), Vec2::new(100.0, 0.0)];
    let anchors = anchors_px.map(|p| surface.pixel_to_normalized(p));
    assert_eq!(anchors[0], Vec2::new(-1.0, -1.0));
    assert_eq!(anchors[1], Vec2::new(1.0, 1.0));

    let positions = deform(&mesh, &params, &anchors_px, surface)?;
    let last = mesh.num_vertices() - 1;
    assert_eq!(positions[0], anchors[0]);
    assert_eq!(positions[last], anchors[1]);

    let offset = Vec2::new(0.2, 0.4);
    let falloff = Falloff::default();
    for i in 1..last {
        let rest = mesh.rest_positions()[i];
        let w0 = falloff.weight(rest.distance(anchors[0]));
        let w1 = falloff.weight(rest.distance(anchors[1]));

        let compounded = rest + offset * (1.0 - w0) * (1.0 - w1);
        assert_relative_eq!(positions[i].x, compounded.x, epsilon = 1e-5);
        assert_relative_eq!(positions[i].y, compounded.y, epsilon = 1e-5);
    }

    // the center is sqrt(2) from both corners: a product of two pulls, not an average
    let center = mesh.index_of(2, 2).unwrap();
    let w = falloff.weight(2f32.sqrt());
    let averaged = mesh.rest_positions()[center] + offset * (1.0 - w);
    assert!((positions[center] - averaged).length() > 1e-3);
    Ok(())
}

#[test]
fn test_pins_hold_for_every_anchor() -> Result<(), DeformError> {
    let mesh = GridMesh::new(20)?;
    let surface = SurfaceSize {
        width: 500,
        height: 300,
    };
    let params = TransformParams {
        rotation: -70.0,
        scale_x: 0.5,
        scale_y: 1.5,
        translate_x: -33.0,
        translate_y: 41.0,
    };
    let anchors_px = [
        Vec2::new(13.0, 17.0),
        Vec2::new(250.0, 150.0),
        Vec2::new(251.0, 152.0),
        Vec2::new(480.0, 290.0),
        Vec2::new(77.7, 222.2),
    ];

    let positions = deform(&mesh, &params, &anchors_px, surface)?;
    for px in anchors_px {
        let anchor = surface.pixel_to_normalized(px);
        let owned = nearest_vertex(mesh.rest_positions(), anchor).unwrap();
        // anchors 2 and 3 share a vertex, the later one wins
        if px == Vec2::new(250.0, 150.0) {
            continue;
        }
        assert_eq!(positions[owned], anchor);
    }
    Ok(())
}

#[test]
fn test_anchor_order_decides_shared_pins() -> Result<(), DeformError> {
    let mesh = GridMesh::new(8)?;
    let surface = square_surface();
    let params = TransformParams {
        rotation: 30.0,
        scale_x: 1.4,
        ..Default::default()
    };
    // both anchors are nearest to the same vertex
    let a = Vec2::new(49.0, 51.0);
    let b = Vec2::new(52.0, 48.0);
    let na = surface.pixel_to_normalized(a);
    let nb = surface.pixel_to_normalized(b);
    let shared = nearest_vertex(mesh.rest_positions(), na).unwrap();
    assert_eq!(nearest_vertex(mesh.rest_positions(), nb), Some(shared));

    let ab = deform(&mesh, &params, &[a, b], surface)?;
    let ba = deform(&mesh, &params, &[b, a], surface)?;
    assert_eq!(ab[shared], nb);
    assert_eq!(ba[shared], na);

    // the relaxation of the other vertices compounds the same way in both orders
    for i in (0..mesh.num_vertices()).filter(|&i| i != shared) {
        assert_relative_eq!(ab[i].x, ba[i].x, epsilon = 1e-5);
        assert_relative_eq!(ab[i].y, ba[i].y, epsilon = 1e-5);
    }
    Ok(())
}

#[test]
fn test_pull_back_shrinks_with_distance() -> Result<(), DeformError> {
    let mesh = GridMesh::new(16)?;
    let surface = square_surface();
    let params = TransformParams {
        translate_x: 15.0,
        translate_y: 5.0,
        ..Default::default()
    };
    let transformed = apply_affine(mesh.rest_positions(), &params, surface)?;

    let anchor = Vec2::new(0.3, -0.2);
    let mut constrained = transformed.clone();
    let owned = apply_constraints(
        &mut constrained,
        mesh.rest_positions(),
        &[anchor],
        &Falloff::default(),
        ExecutionStrategy::Serial,
    )?;

    let mut samples = mesh
        .rest_positions()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != owned[0])
        .map(|(i, rest)| {
            let distance = rest.distance(anchor);
            let pull_back = (transformed[i] - constrained[i]).length();
            (distance, pull_back)
        })
        .collect::<Vec<_>>();
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));

    for pair in samples.windows(2) {
        assert!(
            pair[1].1 <= pair[0].1 + 1e-6,
            "pull back grew from {:?} to {:?}",
            pair[0],
            pair[1]
        );
    }
    Ok(())
}

#[test]
fn test_invalid_configuration_fails_fast() {
    assert!(GridMesh::new(0).is_err());

    let mesh = GridMesh::new(2).unwrap();
    let params = TransformParams {
        rotation: f32::NAN,
        ..Default::default()
    };
    let err = deform(&mesh, &params, &[], square_surface()).unwrap_err();
    assert!(matches!(
        err,
        DeformError::NonFiniteParameter {
            name: "rotation",
            ..
        }
    ));
}

#[test]
fn test_non_finite_anchor_is_rejected() -> Result<(), DeformError> {
    let mesh = GridMesh::new(2)?;
    let params = TransformParams {
        translate_x: 10.0,
        ..Default::default()
    };

    let err = deform(&mesh, &params, &[Vec2::new(f32::NAN, 50.0)], square_surface()).unwrap_err();
    assert!(matches!(err, DeformError::NonFiniteAnchor { index: 0, .. }));

    // finite in pixels, infinite in normalized units
    let tiny = SurfaceSize {
        width: 1,
        height: 1,
    };
    let mut deformer = Deformer::default();
    let err = deformer
        .run(
            &mesh,
            &params,
            [Vec2::new(0.5, 0.5), Vec2::new(3.0e38, 0.5)],
            tiny,
        )
        .unwrap_err();
    assert!(matches!(err, DeformError::NonFiniteAnchor { index: 1, .. }));
    Ok(())
}

#[test]
fn test_overflowing_transform_is_rejected() -> Result<(), DeformError> {
    let mesh = GridMesh::new(2)?;
    let anchors = [Vec2::new(0.5, 0.5)];
    let tiny = SurfaceSize {
        width: 1,
        height: 1,
    };

    let params = TransformParams {
        translate_x: 3.0e38,
        ..Default::default()
    };
    let err = deform(&mesh, &params, &anchors, tiny).unwrap_err();
    assert!(matches!(err, DeformError::NonFiniteTranslation(_)));

    let params = TransformParams {
        rotation: 45.0,
        scale_x: 3.0e38,
        ..Default::default()
    };
    let err = deform(&mesh, &params, &anchors, tiny).unwrap_err();
    assert!(matches!(err, DeformError::NonFinitePosition { .. }));

    // the same magnitudes are fine when they do not overflow
    let params = TransformParams {
        translate_x: 3.0e38,
        ..Default::default()
    };
    let positions = deform(&mesh, &params, &anchors, square_surface())?;
    assert!(positions.iter().all(|p| p.is_finite()));
    Ok(())
}
