use crate::float_types::Real;
use crate::io::IoError;
use crate::mesh::{Mesh, Triangle};
use nalgebra::{Point3, Vector3};
use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;

/// STL flavour to write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

#[inline]
fn facet_normal(tri: &Triangle) -> Vector3<Real> {
    tri.unit_normal().unwrap_or_else(Vector3::zeros)
}

/// Export to ASCII STL
/// Convert `mesh` to an **ASCII STL** string with the given solid `name`.
/// Facet normals follow the triangle winding.
pub fn to_stl_ascii(mesh: &Mesh, name: &str) -> String {
    let mut out = String::with_capacity(mesh.len() * 256);
    out.push_str(&format!("solid {name}\n"));

    for tri in mesh {
        let n = facet_normal(tri);
        out.push_str(&format!(
            "  facet normal {:.6} {:.6} {:.6}\n",
            n.x, n.y, n.z
        ));
        out.push_str("    outer loop\n");
        for p in &tri.vertices {
            out.push_str(&format!(
                "      vertex {:.6} {:.6} {:.6}\n",
                p.x, p.y, p.z
            ));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    out.push_str(&format!("endsolid {name}\n"));
    out
}

const HEADER_LEN: usize = 80;

/// 80-byte binary header naming the solid, zero padded.
///
/// Starts with the crate name so the header never begins with `solid`,
/// which readers take as the mark of an ASCII file.
fn binary_header(name: &str) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    let text = format!("tpms-mesh {name}");
    let len = text.len().min(HEADER_LEN);
    header[..len].copy_from_slice(&text.as_bytes()[..len]);
    header
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// `name` goes into the 80-byte header, cut to fit. Binary STL stores a
/// `u32` facet count and `f32` coordinates.
///
/// ```rust
/// # use tpms_mesh::mesh::Mesh;
/// let bytes = tpms_mesh::io::stl::to_stl_binary(&Mesh::new(), "empty").unwrap();
/// assert_eq!(bytes.len(), 84);
/// assert!(bytes.starts_with(b"tpms-mesh empty"));
/// ```
pub fn to_stl_binary(mesh: &Mesh, name: &str) -> Result<Vec<u8>, IoError> {
    use stl_io::{Normal, Vertex, write_stl};

    if u32::try_from(mesh.len()).is_err() {
        return Err(IoError::MalformedInput(format!(
            "{} triangles exceed the binary STL facet count",
            mesh.len()
        )));
    }

    #[allow(clippy::unnecessary_cast)]
    let triangles: Vec<stl_io::Triangle> = mesh
        .iter()
        .map(|tri| {
            let n = facet_normal(tri);
            stl_io::Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: tri
                    .vertices
                    .map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
            }
        })
        .collect();

    let mut cursor = Cursor::new(Vec::with_capacity(84 + 50 * triangles.len()));
    write_stl(&mut cursor, triangles.iter())?;
    let mut bytes = cursor.into_inner();
    bytes[..HEADER_LEN].copy_from_slice(&binary_header(name));
    Ok(bytes)
}

/// Write `mesh` to `path`, creating or truncating the file.
pub fn write_stl(
    mesh: &Mesh,
    path: impl AsRef<Path>,
    name: &str,
    format: StlFormat,
) -> Result<(), IoError> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() || path.file_name().is_none() {
        return Err(IoError::MalformedPath(path.display().to_string()));
    }

    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        StlFormat::Binary => writer.write_all(&to_stl_binary(mesh, name)?)?,
        StlFormat::Ascii => writer.write_all(to_stl_ascii(mesh, name).as_bytes())?,
    }
    writer.flush()?;
    Ok(())
}

/// Read an ASCII or binary STL back into a triangle list.
#[allow(clippy::unnecessary_cast)]
pub fn read_stl<R: Read + Seek>(reader: &mut R) -> Result<Mesh, IoError> {
    let indexed = stl_io::read_stl(reader)?;
    let point = |i: usize| {
        let v = indexed.vertices[i];
        Point3::new(v[0] as Real, v[1] as Real, v[2] as Real)
    };
    let triangles = indexed
        .faces
        .iter()
        .map(|face| {
            let [a, b, c] = face.vertices;
            Triangle::new(point(a), point(b), point(c))
        })
        .collect();
    Ok(Mesh::from_triangles(triangles))
}

impl Mesh {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }

    pub fn to_stl_binary(&self, name: &str) -> Result<Vec<u8>, IoError> {
        self::to_stl_binary(self, name)
    }

    /// Parse STL bytes (ASCII or binary).
    pub fn from_stl(bytes: &[u8]) -> Result<Mesh, IoError> {
        read_stl(&mut Cursor::new(bytes))
    }
}
