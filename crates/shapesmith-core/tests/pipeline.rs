//! Integration tests for the descriptor to shape to mesh pipeline

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use glam::DVec3;
use serde_json::{Value, json};
use shapesmith_core::config::MAX_MESH_RESOLUTION;
use shapesmith_core::kernel::trace::TraceKernel;
use shapesmith_core::prelude::*;

fn kernel() -> SdfKernel {
    SdfKernel::new(KernelConfig::default().with_mesh_resolution(24))
}

fn desc(value: Value) -> Descriptor {
    Descriptor::from_json(value).expect("descriptor should parse")
}

fn cube(size: f64) -> Value {
    json!({"type": "cuboid", "width": size, "height": size, "depth": size})
}

fn with(mut base: Value, key: &str, value: Value) -> Value {
    base[key] = value;
    base
}

fn bounds_of(kernel: &SdfKernel, shape: &SdfShape) -> Bounds {
    kernel.bounds(shape).expect("shape should not be empty")
}

fn assert_bounds_eq(a: Bounds, b: Bounds) {
    assert_relative_eq!(a.min.x, b.min.x, epsilon = 1e-5);
    assert_relative_eq!(a.min.y, b.min.y, epsilon = 1e-5);
    assert_relative_eq!(a.min.z, b.min.z, epsilon = 1e-5);
    assert_relative_eq!(a.max.x, b.max.x, epsilon = 1e-5);
    assert_relative_eq!(a.max.y, b.max.y, epsilon = 1e-5);
    assert_relative_eq!(a.max.z, b.max.z, epsilon = 1e-5);
}

#[test]
fn every_primitive_kind_builds() {
    let k = kernel();
    let descriptors = [
        cube(2.0),
        json!({"type": "sphere", "radius": 1.5}),
        json!({"type": "cylinder", "radius": 1, "height": 3}),
        json!({"type": "cone", "radius1": 2, "radius2": 0.5, "height": 3}),
        json!({"type": "wedge", "width": 2, "height": 1, "depth": 2, "ltx": 0.5}),
        json!({"type": "torus", "radius1": 3, "radius2": 0.5}),
    ];

    for value in descriptors {
        let d = desc(value);
        let built = dispatch(&k, &d, &[]).unwrap();
        assert_eq!(built.dimension(), Dimension::Solid, "{}", d.kind());
        let mesh = built.mesh().expect("solids are tessellated");
        assert!(mesh.triangle_count() > 0, "{} produced no triangles", d.kind());
        assert!(k.volume(built.shape()) > 0.0);
    }
}

#[test]
fn thin_solids_are_still_meshed() {
    let k = SdfKernel::default();
    let descriptors = [
        json!({"type": "cuboid", "width": 100, "height": 0.5, "depth": 100}),
        json!({"type": "cylinder", "radius": 20, "height": 0.2}),
        json!({"type": "cylinder", "radius": 0.05, "height": 50}),
    ];

    for value in descriptors {
        let d = desc(value);
        let built = build(&k, &d).unwrap();
        let mesh = built.mesh().unwrap();
        assert!(mesh.triangle_count() > 0, "{:?} produced no triangles", d);
    }
}

#[test]
fn very_large_and_very_small_solids_are_meshed() {
    let k = kernel();
    for radius in [1e12_f64, 1e-6] {
        let built = build(&k, &desc(json!({"type": "sphere", "radius": radius}))).unwrap();
        assert!(built.mesh().unwrap().triangle_count() > 0, "radius {radius}");
        let expected = 4.0 / 3.0 * std::f64::consts::PI * radius.powi(3);
        assert_relative_eq!(k.volume(built.shape()), expected, max_relative = 0.05);
    }
}

#[test]
fn lengths_beyond_kernel_precision_are_kernel_failures() {
    let k = kernel();
    let err = build(&k, &desc(json!({"type": "sphere", "radius": 1e39}))).unwrap_err();
    assert!(matches!(err, BuildError::Kernel(_)), "{err}");

    let far = with(
        cube(1.0),
        "transforms",
        json!([{"kind": "translate", "offset": [1e39, 0, 0]}]),
    );
    assert!(matches!(build(&k, &desc(far)), Err(BuildError::Kernel(_))));
}

#[test]
fn mesh_resolution_is_bounded() {
    let config: KernelConfig = serde_json::from_str(r#"{"mesh_resolution": 1700}"#).unwrap();
    let k = SdfKernel::new(config);
    assert_eq!(k.config().mesh_resolution, MAX_MESH_RESOLUTION);

    // Resolving a sheet this thin would need more samples than allowed
    let sheet = json!({"type": "cuboid", "width": 1000, "height": 0.0001, "depth": 1000});
    let err = build(&kernel(), &desc(sheet)).unwrap_err();
    assert!(matches!(err, BuildError::Kernel(_)), "{err}");
}

#[test]
fn ellipse_is_a_curve_and_is_not_meshed() {
    let k = kernel();
    let d = desc(json!({"type": "ellipse", "radiusMajor": 4, "radiusMinor": 2}));
    let built = build(&k, &d).unwrap();
    assert_eq!(built.dimension(), Dimension::Curve);
    assert!(built.mesh().is_none());
    assert_eq!(built.shape().topology(), Topology::Curve);

    let trace = TraceKernel::new();
    build(&trace, &d).unwrap();
    assert!(trace.calls().iter().all(|c| !c.starts_with("tessellate")));
}

#[test]
fn parameters_may_be_nested() {
    let k = kernel();
    let d = desc(json!({"type": "sphere", "parameters": {"radius": 2}}));
    let built = build(&k, &d).unwrap();
    let b = bounds_of(&k, built.shape());
    assert_relative_eq!(b.max.x, 2.0, epsilon = 1e-5);
}

#[test]
fn unknown_kind_is_rejected() {
    let err = Descriptor::from_json(json!({"type": "pyramid", "height": 3})).unwrap_err();
    assert_eq!(err, BuildError::UnknownShapeKind("pyramid".to_string()));
}

#[test]
fn missing_parameter_names_the_field() {
    let k = kernel();
    let d = desc(json!({"type": "cuboid", "width": 2, "height": 2}));
    let err = build(&k, &d).unwrap_err();
    assert_eq!(err, BuildError::MissingParameter("depth".to_string()));
}

#[test]
fn torus_tube_must_fit_inside_ring() {
    let k = kernel();
    let d = desc(json!({"type": "torus", "radius1": 1, "radius2": 2}));
    let err = build(&k, &d).unwrap_err();
    assert!(matches!(err, BuildError::InvalidParameter { ref name, .. } if name == "radius2"));
}

#[test]
fn cuboid_volume_is_product_of_sides() {
    let k = kernel();
    let built = build(&k, &desc(cube(2.0))).unwrap();
    assert_relative_eq!(k.volume(built.shape()), 8.0, max_relative = 1e-9);
}

#[test]
fn transform_order_matters() {
    let k = kernel();
    let translate = json!({"kind": "translate", "offset": [10, 0, 0]});
    let rotate = json!({"kind": "rotate", "axis": [0, 0, 1], "angle": 90});

    let a = build(
        &k,
        &desc(with(cube(2.0), "transforms", json!([translate.clone(), rotate.clone()]))),
    )
    .unwrap();
    let b = build(
        &k,
        &desc(with(cube(2.0), "transforms", json!([rotate, translate]))),
    )
    .unwrap();

    // Translate then rotate swings the cube around to +Y
    assert_bounds_eq(
        bounds_of(&k, a.shape()),
        Bounds::new(DVec3::new(-2.0, 10.0, 0.0), DVec3::new(0.0, 12.0, 2.0)),
    );
    // Rotate then translate only shifts it along X
    assert_bounds_eq(
        bounds_of(&k, b.shape()),
        Bounds::new(DVec3::new(8.0, 0.0, 0.0), DVec3::new(10.0, 2.0, 2.0)),
    );
}

#[test]
fn origin_applies_before_transforms() {
    let trace = TraceKernel::new();
    let d = desc(with(
        with(cube(2.0), "origin", json!([1, 0, 0])),
        "transforms",
        json!([{"kind": "rotate", "axis": [0, 0, 1], "angle": 90}]),
    ));
    let built = build(&trace, &d).unwrap();
    assert_eq!(
        built.shape(),
        "rotate[0, 0, 1]@[0, 0, 0]:90(translate[1, 0, 0](cuboid(2, 2, 2)))"
    );
    assert_eq!(
        trace.calls(),
        vec![
            "make cuboid(2, 2, 2)".to_string(),
            "translate cuboid(2, 2, 2)".to_string(),
            "rotate translate[1, 0, 0](cuboid(2, 2, 2))".to_string(),
            format!("tessellate {}", built.shape()),
        ]
    );
}

#[test]
fn origin_is_a_leading_translation() {
    let k = kernel();
    let via_origin = build(&k, &desc(with(cube(2.0), "origin", json!({"x": 1, "y": 2, "z": 3}))))
        .unwrap();
    let via_transform = build(
        &k,
        &desc(with(
            cube(2.0),
            "transform",
            json!({"kind": "translate", "offset": [1, 2, 3]}),
        )),
    )
    .unwrap();
    assert_bounds_eq(
        bounds_of(&k, via_origin.shape()),
        bounds_of(&k, via_transform.shape()),
    );
}

#[test]
fn malformed_transform_is_rejected() {
    let k = kernel();
    let d = desc(with(
        cube(1.0),
        "transforms",
        json!([{"kind": "scale", "factor": -1}]),
    ));
    let err = build(&k, &d).unwrap_err();
    assert_eq!(err.field(), Some("factor"));
    assert!(matches!(err, BuildError::InvalidTransformSpec { .. }));
}

#[test]
fn subtract_folds_left() {
    let trace = TraceKernel::new();
    let operands: Vec<String> = ["a", "b", "c"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    let built = build_boolean(&trace, BooleanOp::Subtract, &operands).unwrap();
    assert_eq!(built.shape(), "subtract(subtract(a, b), c)");
}

#[test]
fn subtract_is_not_associative() {
    let k = kernel();
    let a = build(&k, &desc(cube(4.0))).unwrap().into_shape();
    let b = build(&k, &desc(with(cube(2.0), "origin", json!([1, 1, 1]))))
        .unwrap()
        .into_shape();
    let c = build(&k, &desc(json!({"type": "sphere", "radius": 0.5, "origin": [2, 2, 2]})))
        .unwrap()
        .into_shape();

    let folded = build_boolean(&k, BooleanOp::Subtract, &[a.clone(), b.clone(), c.clone()])
        .unwrap()
        .into_shape();
    let b_minus_c = build_boolean(&k, BooleanOp::Subtract, &[b, c])
        .unwrap()
        .into_shape();
    let right_nested = build_boolean(&k, BooleanOp::Subtract, &[a, b_minus_c])
        .unwrap()
        .into_shape();

    // Inside all three: removed by B in the left fold, kept by A - (B - C)
    let p = DVec3::splat(2.0);
    assert!(!folded.contains(p));
    assert!(right_nested.contains(p));

    // Inside A only: kept by both
    let q = DVec3::splat(0.5);
    assert!(folded.contains(q));
    assert!(right_nested.contains(q));
}

#[test]
fn single_operand_comes_back_unchanged() {
    let k = kernel();
    let shape = build(&k, &desc(cube(1.0))).unwrap().into_shape();
    for op in BooleanOp::ALL {
        let built = build_boolean(&k, op, std::slice::from_ref(&shape)).unwrap();
        assert!(built.shape().node().ptr_eq(shape.node()), "{op}");
        assert!(built.mesh().is_some());
    }
}

#[test]
fn empty_operand_list_is_an_error() {
    let k = kernel();
    for op in BooleanOp::ALL {
        let err = build_boolean(&k, op, &[]).unwrap_err();
        assert_eq!(err, BuildError::EmptyOperandList);
    }
}

#[test]
fn boolean_descriptor_positions_the_result() {
    let k = kernel();
    let a = build(&k, &desc(cube(1.0))).unwrap().into_shape();
    let b = build(&k, &desc(with(cube(1.0), "origin", json!([2, 0, 0]))))
        .unwrap()
        .into_shape();
    let d = desc(json!({"type": "union", "origin": [0, 0, 5]}));
    let built = dispatch(&k, &d, &[a, b]).unwrap();
    assert_bounds_eq(
        bounds_of(&k, built.shape()),
        Bounds::new(DVec3::new(0.0, 0.0, 5.0), DVec3::new(3.0, 1.0, 6.0)),
    );
    assert_relative_eq!(k.volume(built.shape()), 2.0, max_relative = 0.05);
}

#[test]
fn primitive_rejects_operands() {
    let k = kernel();
    let a = build(&k, &desc(cube(1.0))).unwrap().into_shape();
    let err = dispatch(&k, &desc(cube(1.0)), &[a]).unwrap_err();
    assert_eq!(err.field(), Some("shapes"));
}

#[test]
fn boolean_with_a_curve_is_a_kernel_failure() {
    let k = kernel();
    let solid = build(&k, &desc(cube(1.0))).unwrap().into_shape();
    let curve = build(&k, &desc(json!({"type": "ellipse", "radiusMajor": 2, "radiusMinor": 1})))
        .unwrap()
        .into_shape();
    let err = build_boolean(&k, BooleanOp::Union, &[solid, curve]).unwrap_err();
    assert!(matches!(err, BuildError::Kernel(_)));
}

#[test]
fn kernel_failure_aborts_the_build() {
    let trace = TraceKernel::new().failing_on("translate");
    let d = desc(with(
        with(cube(1.0), "origin", json!([1, 0, 0])),
        "transforms",
        json!([{"kind": "scale", "factor": 2}]),
    ));
    let err = build(&trace, &d).unwrap_err();
    assert!(matches!(err, BuildError::Kernel(_)));
    // The scale saw the translated shape and refused; nothing was tessellated
    assert!(trace.calls().iter().all(|c| !c.starts_with("tessellate")));
}

#[test]
fn independent_builds_run_concurrently() {
    let k = kernel();
    let descriptors: Vec<Descriptor> = (1..=4)
        .map(|i| desc(json!({"type": "sphere", "radius": f64::from(i) * 0.5})))
        .collect();

    let volumes: Vec<f64> = std::thread::scope(|scope| {
        let handles: Vec<_> = descriptors
            .iter()
            .map(|d| {
                let k = &k;
                scope.spawn(move || {
                    let built = build(k, d).unwrap();
                    k.volume(built.shape())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for pair in volumes.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn built_mesh_exports() {
    let k = kernel();
    let built = build(&k, &desc(json!({"type": "cylinder", "radius": 1, "height": 2}))).unwrap();
    let path = std::env::temp_dir().join("shapesmith_test_cylinder.obj");
    let format = built.mesh().unwrap().export(&path).unwrap();
    assert_eq!(format, ExportFormat::Obj);
    assert!(path.exists());
    std::fs::remove_file(&path).ok();
}
