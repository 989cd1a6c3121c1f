use std::path::PathBuf;

use meshprobe_cli::{create_manifold_from_json, process_inputs, write_mesh, ProbeConfig};
use meshprobe_ir::{load_mesh_description, JsonKeyType};
use meshprobe_kernel::NativeEngine;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("meshprobe-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Unit cube written the way a JS exporter writes typed arrays: as objects
/// keyed by index.
fn cube_json() -> String {
    cube_json_with(r#""faceID": null, "runOriginalID": [7]"#)
}

/// The cube plus extra top-level fields.
fn cube_json_with(extra: &str) -> String {
    let verts = [
        0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, //
        0, 0, 1, 1, 0, 1, 1, 1, 1, 0, 1, 1,
    ];
    let tris = [
        0, 2, 1, 0, 3, 2, 4, 5, 6, 4, 6, 7, 0, 1, 5, 0, 5, 4, //
        2, 3, 7, 2, 7, 6, 0, 4, 7, 0, 7, 3, 1, 2, 6, 1, 6, 5,
    ];
    let keyed = |values: &[i32]| {
        let entries: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("\"{i}\": {v}"))
            .collect();
        format!("{{{}}}", entries.join(", "))
    };
    format!(
        r#"{{"numProp": 3, "triVerts": {}, "vertProperties": {}, {extra}}}"#,
        keyed(&tris),
        keyed(&verts)
    )
}

#[test]
fn cube_file_end_to_end() {
    let dir = scratch_dir("cube");
    let input = dir.join("cutter.json");
    std::fs::write(&input, cube_json()).unwrap();

    let report = create_manifold_from_json(&NativeEngine::default(), &input).unwrap();

    let types: std::collections::HashMap<_, _> = report.key_types.iter().cloned().collect();
    assert_eq!(types["numProp"], JsonKeyType::Number);
    assert_eq!(types["triVerts"], JsonKeyType::Object);
    assert_eq!(types["faceID"], JsonKeyType::Object);
    assert_eq!(
        report.keys,
        vec!["numProp", "triVerts", "vertProperties", "runOriginalID"]
    );

    assert!((report.properties.volume - 1.0).abs() < 1e-9);
    assert!((report.properties.surface_area - 6.0).abs() < 1e-9);
    assert!(report.extract_ms() >= 0.0);
    assert_eq!(report.mesh.num_tri(), 12);
    assert_eq!(report.mesh.run_original_id, Some(vec![7]));

    let summary = report.summary();
    assert_eq!(summary["numTri"], 12);
    assert_eq!(summary["properties"]["volume"], 1.0);

    let out = write_mesh(&dir.join("out"), &input, &report.mesh).unwrap();
    assert!(out.ends_with("cutter.mesh.json"));
    let written = load_mesh_description(&out).unwrap();
    assert_eq!(written, report.mesh);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn malformed_json_fails_without_output() {
    let dir = scratch_dir("malformed");
    let input = dir.join("broken.json");
    std::fs::write(&input, r#"{"numProp": 3, "triVerts": [0, 1, 2"#).unwrap();

    let err = create_manifold_from_json(&NativeEngine::default(), &input).unwrap_err();
    assert!(err.to_string().contains("malformed JSON"));
    assert!(!dir.join("out").exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn open_mesh_is_reported_as_engine_failure() {
    let dir = scratch_dir("open");
    let input = dir.join("open.json");
    std::fs::write(
        &input,
        r#"{"numProp": 3, "triVerts": [0, 1, 2], "vertProperties": [0,0,0, 1,0,0, 0,1,0]}"#,
    )
    .unwrap();

    let err = create_manifold_from_json(&NativeEngine::default(), &input).unwrap_err();
    assert!(format!("{err:#}").contains("not manifold"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_file_fails() {
    let err = create_manifold_from_json(
        &NativeEngine::default(),
        std::path::Path::new("/nonexistent/meshprobe/cutter.json"),
    )
    .unwrap_err();
    assert!(err.to_string().contains("failed to read"));
}

#[test]
fn config_engine_merges_split_corners() {
    let dir = scratch_dir("merge");
    let input = dir.join("split.json");
    // Tetrahedron with its corners repeated per face.
    let corners = [[0, 0, 0], [1, 0, 0], [0, 1, 0], [0, 0, 1]];
    let faces = [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
    let verts: Vec<String> = faces
        .iter()
        .flatten()
        .flat_map(|&c: &usize| corners[c].iter().map(|x| x.to_string()))
        .collect();
    std::fs::write(
        &input,
        format!(
            r#"{{"numProp": 3, "triVerts": [{}], "vertProperties": [{}]}}"#,
            (0..12).map(|i| i.to_string()).collect::<Vec<_>>().join(","),
            verts.join(",")
        ),
    )
    .unwrap();

    let config = ProbeConfig::from_toml("auto_merge = true").unwrap();
    let report = create_manifold_from_json(&config.engine(), &input).unwrap();
    assert!((report.properties.volume - 1.0 / 6.0).abs() < 1e-6);
    assert!(create_manifold_from_json(&NativeEngine::default(), &input).is_err());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn empty_typed_arrays_are_treated_as_absent() {
    let dir = scratch_dir("empty-typed");
    let input = dir.join("cutter.json");
    std::fs::write(
        &input,
        cube_json_with(
            r#""faceID": {}, "halfedgeTangent": {}, "runIndex": {}, "runOriginalID": {}, "runTransform": {}"#,
        ),
    )
    .unwrap();

    let report = create_manifold_from_json(&NativeEngine::default(), &input).unwrap();
    assert!(report.keys.contains(&"faceID"));
    assert!((report.properties.volume - 1.0).abs() < 1e-9);
    assert_eq!(report.mesh.face_id, None);
    assert_eq!(report.mesh.halfedge_tangent, None);
    assert_eq!(report.mesh.run_index, Some(vec![0, 36]));
    assert_eq!(report.mesh.run_original_id.as_ref().map(Vec::len), Some(1));
    assert_eq!(report.mesh.run_transform.as_ref().map(Vec::len), Some(12));

    // The extracted mesh is valid input again.
    let out = write_mesh(&dir.join("out"), &input, &report.mesh).unwrap();
    assert!(create_manifold_from_json(&NativeEngine::default(), &out).is_ok());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn failed_input_does_not_stop_the_rest() {
    let dir = scratch_dir("batch");
    let broken = dir.join("broken.json");
    let cube = dir.join("cube.json");
    std::fs::write(&broken, r#"{"numProp": 3, "triVerts": ["#).unwrap();
    std::fs::write(&cube, cube_json()).unwrap();

    let config = ProbeConfig {
        inputs: vec![broken, cube],
        output_dir: Some(dir.join("out")),
        ..ProbeConfig::default()
    };
    assert_eq!(process_inputs(&config, false), 1);
    assert!(dir.join("out").join("cube.mesh.json").exists());
    assert!(!dir.join("out").join("broken.mesh.json").exists());

    std::fs::remove_dir_all(&dir).ok();
}
