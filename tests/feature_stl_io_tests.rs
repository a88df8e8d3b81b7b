#![cfg(feature = "stl-io")]

mod support;

use std::io::Cursor;
use support::{unit_domain, unit_lattice};
use tpms_mesh::io::IoError;
use tpms_mesh::io::stl::{StlFormat, read_stl, write_stl};
use tpms_mesh::float_types::Real;
use tpms_mesh::{Mesh, MeshRequest, TpmsFamily, generate};

fn small_lattice() -> Mesh {
    generate(&MeshRequest::new(unit_lattice(TpmsFamily::Gyroid, 0.5), unit_domain()).with_step(0.1))
        .unwrap()
}

/// STL stores f32 coordinates, so vertices only survive to single precision.
fn assert_same_positions(read: &Mesh, written: &Mesh, eps: Real) {
    for (a, b) in read.iter().zip(written) {
        for (p, q) in a.vertices.iter().zip(&b.vertices) {
            assert!((p - q).amax() < eps, "{p:?} vs {q:?}");
        }
    }
}

#[test]
fn mesh_to_stl_ascii() {
    let mesh = small_lattice();
    let stl = mesh.to_stl_ascii("gyroid");
    assert!(stl.starts_with("solid gyroid\n"));
    assert!(stl.trim_end().ends_with("endsolid gyroid"));
    assert_eq!(stl.matches("facet normal").count(), mesh.len());
    assert_eq!(stl.matches("vertex").count(), 3 * mesh.len());
}

#[test]
fn binary_stl_round_trip() {
    let mesh = small_lattice();
    let bytes = mesh.to_stl_binary("gyroid").unwrap();
    assert_eq!(bytes.len(), 84 + 50 * mesh.len());

    let back = Mesh::from_stl(&bytes).unwrap();
    assert_eq!(back.len(), mesh.len());
    assert_same_positions(&back, &mesh, 1e-6);
    assert!((back.signed_volume() - mesh.signed_volume()).abs() < 1e-4);
}

#[test]
fn binary_header_carries_the_name() {
    let mesh = small_lattice();
    let bytes = mesh.to_stl_binary("gyroid p=0.5").unwrap();
    let header = &bytes[..80];
    assert!(header.starts_with(b"tpms-mesh gyroid p=0.5"));
    assert!(header[22..].iter().all(|b| *b == 0));

    // a name that starts like an ASCII file still reads back as binary
    let bytes = mesh.to_stl_binary("solid").unwrap();
    assert_eq!(Mesh::from_stl(&bytes).unwrap().len(), mesh.len());

    let long = "x".repeat(200);
    let bytes = mesh.to_stl_binary(&long).unwrap();
    assert_eq!(bytes.len(), 84 + 50 * mesh.len());
    assert_eq!(&bytes[10..80], long[..70].as_bytes());
}

#[test]
fn single_precision_export_stays_closed() {
    // samples that hit the isovalue once produced edges far below f32 resolution
    let mesh =
        generate(&MeshRequest::new(unit_lattice(TpmsFamily::Gyroid, 0.5), unit_domain()).with_step(0.05))
            .unwrap();
    let shortest = mesh.shortest_edge().unwrap();
    assert!(shortest > 1e-7, "shortest edge {shortest}");

    let back = Mesh::from_stl(&mesh.to_stl_binary("gyroid").unwrap()).unwrap();
    let report = back.analyze_manifold();
    assert!(report.is_closed(), "{report:?}");
    assert_eq!(report.degenerate_faces, 0);
    assert_eq!(back.len(), mesh.len());
}

#[test]
fn ascii_stl_round_trip() {
    let mesh = small_lattice();
    let text = mesh.to_stl_ascii("gyroid");
    let back = read_stl(&mut Cursor::new(text.into_bytes())).unwrap();
    assert_eq!(back.len(), mesh.len());
    // six decimals in the text
    assert_same_positions(&back, &mesh, 1e-5);
}

#[test]
fn stored_normals_follow_winding() {
    let mesh = small_lattice();
    let bytes = mesh.to_stl_binary("gyroid").unwrap();
    let stl = stl_io::read_stl(&mut Cursor::new(bytes)).unwrap();

    for (face, tri) in stl.faces.iter().zip(&mesh) {
        let Some(n) = tri.unit_normal() else { continue };
        let stored = face.normal;
        let dot = n.x * stored[0] as Real + n.y * stored[1] as Real + n.z * stored[2] as Real;
        assert!(dot > 0.99, "normal {stored:?} disagrees with winding {n:?}");
    }
}

#[test]
fn write_stl_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let mesh = small_lattice();
    let dir = std::env::temp_dir().join(format!("tpms-mesh-stl-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;

    for (format, file) in [(StlFormat::Binary, "binary.stl"), (StlFormat::Ascii, "ascii.stl")] {
        let path = dir.join(file);
        write_stl(&mesh, &path, "gyroid", format)?;
        let back = Mesh::from_stl(&std::fs::read(&path)?)?;
        assert_eq!(back.len(), mesh.len());
        assert!((back.signed_volume() - mesh.signed_volume()).abs() < 1e-4);
    }

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn write_stl_rejects_an_empty_path() {
    let err = write_stl(&small_lattice(), "", "gyroid", StlFormat::Binary).unwrap_err();
    assert!(matches!(err, IoError::MalformedPath(_)));
}
