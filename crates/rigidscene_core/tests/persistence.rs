//! Persistence integration tests
//!
//! Exercise the binary object format through the public `SceneObject` API,
//! including files on disk and manifests that reference object files.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rigidscene_core::{
    codec, CorruptKind, GeometrySource, Marker, Mesh, ObjectTemplate, PersistError, Quat,
    SceneManifest, SceneObject, Vec3, Vertex,
};
use rigidscene_math::mat4;

const EPSILON: f32 = 1e-6;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("rigidscene_{}_{}", std::process::id(), name))
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_f32s(out: &mut Vec<u8>, vs: &[f32]) {
    for v in vs {
        out.extend_from_slice(&v.to_le_bytes());
    }
}

#[test]
fn test_load_small_triangle_scenario() {
    let mut bytes = Vec::new();
    push_u32(&mut bytes, Marker::Translation.as_u32());
    push_f32s(&mut bytes, &[0.0, 30.0, 0.0]);
    push_u32(&mut bytes, Marker::Rotation.as_u32());
    push_f32s(&mut bytes, &[0.0, 0.0, 0.0, 1.0]);
    push_u32(&mut bytes, Marker::Scale.as_u32());
    push_f32s(&mut bytes, &[0.2, 0.2, 0.2]);
    push_u32(&mut bytes, Marker::Vertices.as_u32());
    push_u32(&mut bytes, 3);
    for v in Mesh::triangle().vertices() {
        push_f32s(&mut bytes, &v.to_floats());
    }
    push_u32(&mut bytes, Marker::Indices.as_u32());
    push_u32(&mut bytes, 3);
    for i in [0u32, 1, 2] {
        push_u32(&mut bytes, i);
    }
    push_u32(&mut bytes, Marker::End.as_u32());

    let object = SceneObject::load(&bytes).unwrap();
    let mesh = object.mesh().expect("triangle geometry");
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.index_count(), 3);

    let expected = mat4::mul(
        mat4::scaling(Vec3::splat(0.2)),
        mat4::translation(Vec3::new(0.0, 30.0, 0.0)),
    );
    assert!(mat4::abs_diff_eq(object.transform(), expected, EPSILON));
    assert_eq!(object.transform()[0], [0.2, 0.0, 0.0, 0.0]);
    assert_eq!(object.transform()[3], [0.0, 30.0, 0.0, 1.0]);
}

#[test]
fn test_round_trip_with_geometry() {
    let mesh = Arc::new(Mesh::cuboid(Vec3::new(0.5, 1.0, 1.5)));
    let original = SceneObject::new()
        .with_mesh(mesh.clone())
        .with_translation(Vec3::new(-3.0, 2.5, 8.0))
        .with_rotation(Quat::from_axis_angle(Vec3::new(0.0, 1.0, 1.0), 1.1))
        .with_scale(Vec3::new(2.0, 0.5, 1.0));

    let mut bytes = Vec::new();
    original.save(&mut bytes).unwrap();
    let loaded = SceneObject::load(&bytes).unwrap();

    assert_eq!(loaded.translation(), original.translation());
    assert_eq!(loaded.rotation(), original.rotation());
    assert_eq!(loaded.scale(), original.scale());
    let loaded_mesh = loaded.mesh().unwrap();
    assert_eq!(loaded_mesh.vertices(), mesh.vertices());
    assert_eq!(loaded_mesh.indices(), mesh.indices());
}

#[test]
fn test_round_trip_without_geometry() {
    let original = SceneObject::new().with_translation(Vec3::new(1.0, 1.0, 1.0));
    let loaded = SceneObject::load(&codec::encode_object(&original).unwrap()).unwrap();
    assert!(!loaded.has_mesh());
    assert_eq!(loaded.translation(), Vec3::ONE);
}

#[test]
fn test_file_round_trip() {
    let path = temp_path("file_round_trip.rso");
    let original = SceneObject::new()
        .with_mesh(Arc::new(Mesh::plane(4.0)))
        .with_translation(Vec3::new(0.0, -1.0, 0.0));
    original.save_to_file(&path).unwrap();

    let loaded = SceneObject::load_from_file(&path).unwrap();
    assert_eq!(loaded.mesh().unwrap().as_ref(), original.mesh().unwrap().as_ref());
    assert_eq!(loaded.transform()[3], [0.0, -1.0, 0.0, 1.0]);
    let _ = fs::remove_file(&path);
}

#[test]
fn test_truncated_file_is_corrupt() {
    let path = temp_path("truncated.rso");
    let object = SceneObject::new().with_mesh(Arc::new(Mesh::triangle()));
    let bytes = codec::encode_object(&object).unwrap();
    // Cut inside the vertex payload
    fs::write(&path, &bytes[..bytes.len() - 40]).unwrap();

    let err = SceneObject::load_from_file(&path).unwrap_err();
    assert!(
        matches!(
            err,
            PersistError::Corrupt(CorruptKind::CountExceedsStream { .. })
                | PersistError::Corrupt(CorruptKind::Truncated { .. })
        ),
        "got {:?}",
        err
    );
    let _ = fs::remove_file(&path);
}

#[test]
fn test_vertex_record_size() {
    let object = SceneObject::new().with_mesh(Arc::new(Mesh::triangle()));
    let with_mesh = codec::encode_object(&object).unwrap().len();
    let without_mesh = codec::encode_object(&SceneObject::new()).unwrap().len();
    assert_eq!(with_mesh - without_mesh, 4 + 4 + 3 * Vertex::SIZE + 4 + 4 + 3 * 4);
}

#[test]
fn test_manifest_references_object_file() {
    let dir = temp_path("manifest_dir");
    fs::create_dir_all(&dir).unwrap();

    let stored = SceneObject::new()
        .with_mesh(Arc::new(Mesh::triangle()))
        .with_translation(Vec3::new(0.0, 30.0, 0.0))
        .with_scale(Vec3::splat(0.2));
    stored.save_to_file(dir.join("tri.rso")).unwrap();

    let mut manifest = SceneManifest::new("files");
    manifest.add_object(ObjectTemplate::new(
        "from_file",
        GeometrySource::File { path: "tri.rso".to_string() },
    ));
    manifest.add_object(
        ObjectTemplate::new("moved", GeometrySource::File { path: "tri.rso".to_string() })
            .with_translation(Vec3::new(5.0, 0.0, 0.0)),
    );
    let manifest_path = dir.join("scene.ron");
    manifest.save(&manifest_path).unwrap();

    let loaded = SceneManifest::load(&manifest_path).unwrap();
    assert_eq!(loaded, manifest);

    let from_file = loaded.objects[0].instantiate(&dir).unwrap();
    assert_eq!(from_file.translation(), Vec3::new(0.0, 30.0, 0.0));
    assert_eq!(from_file.scale(), Vec3::splat(0.2));

    let moved = loaded.objects[1].instantiate(&dir).unwrap();
    assert_eq!(moved.translation(), Vec3::new(5.0, 0.0, 0.0));
    assert_eq!(moved.transform()[3], [5.0, 0.0, 0.0, 1.0]);

    let _ = fs::remove_dir_all(&dir);
}
