//! Per-cell marching cubes shared by the serial and parallel extractors

use crate::extract::tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};
use crate::float_types::Real;
use crate::grid::SampleGrid;
use crate::mesh::Triangle;
use nalgebra::Point3;

/// Triangulate every cell whose lowest corner has z-index `z`.
pub(crate) fn extract_slab(grid: &SampleGrid, isovalue: Real, z: usize, out: &mut Vec<Triangle>) {
    let [cx, cy, _] = grid.shape().cells();
    let offset = grid.iso_offset();
    for y in 0..cy {
        for x in 0..cx {
            process_cell(grid, isovalue, offset, [x, y, z], out);
        }
    }
}

/// Samples within `offset` of the isovalue are moved to `isovalue + offset`,
/// so no crossing lands within a small fraction of an edge of a node.
#[inline]
pub(crate) fn nudged(value: Real, isovalue: Real, offset: Real) -> Real {
    if (value - isovalue).abs() < offset {
        isovalue + offset
    } else {
        value
    }
}

#[inline]
fn process_cell(
    grid: &SampleGrid,
    isovalue: Real,
    offset: Real,
    [x, y, z]: [usize; 3],
    out: &mut Vec<Triangle>,
) {
    let mut nodes = [[0usize; 3]; 8];
    let mut values = [0.0; 8];
    let mut case = 0usize;

    for (c, [dx, dy, dz]) in CORNER_OFFSETS.iter().enumerate() {
        let node = [x + dx, y + dy, z + dz];
        let value = nudged(grid.value(node[0], node[1], node[2]), isovalue, offset);
        if value < isovalue {
            case |= 1 << c;
        }
        nodes[c] = node;
        values[c] = value;
    }

    let crossed = EDGE_TABLE[case];
    if crossed == 0 {
        return;
    }

    let mut crossings = [Point3::origin(); 12];
    for (e, &[a, b]) in EDGE_CORNERS.iter().enumerate() {
        if crossed & (1 << e) != 0 {
            let [ax, ay, az] = nodes[a];
            let [bx, by, bz] = nodes[b];
            crossings[e] = interpolate(
                grid.point(ax, ay, az),
                grid.point(bx, by, bz),
                values[a],
                values[b],
                isovalue,
            );
        }
    }

    for tri in TRI_TABLE[case]
        .chunks_exact(3)
        .take_while(|tri| tri[0] >= 0)
    {
        out.push(Triangle::new(
            crossings[tri[0] as usize],
            crossings[tri[1] as usize],
            crossings[tri[2] as usize],
        ));
    }
}

/// Crossing on the edge `p0 -> p1`; `p0` is always the lower grid node.
#[inline]
fn interpolate(p0: Point3<Real>, p1: Point3<Real>, v0: Real, v1: Real, isovalue: Real) -> Point3<Real> {
    let t = ((isovalue - v0) / (v1 - v0)).clamp(0.0, 1.0);
    p0 + (p1 - p0) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn near_hits_move_to_the_solid_side() {
        let offset = 1e-4;
        assert_eq!(nudged(0.25, 0.25, offset), 0.25 + offset);
        assert_eq!(nudged(0.25 - offset / 2.0, 0.25, offset), 0.25 + offset);
        assert_eq!(nudged(0.25 + offset / 2.0, 0.25, offset), 0.25 + offset);
        assert_eq!(nudged(0.3, 0.25, offset), 0.3);
        assert_eq!(nudged(0.2, 0.25, offset), 0.2);
    }

    #[test]
    fn interpolation_hits_the_isovalue() {
        let p = interpolate(Point3::origin(), Point3::new(0.0, 0.0, 2.0), -1.0, 3.0, 0.0);
        assert_relative_eq!(p, Point3::new(0.0, 0.0, 0.5));
    }
}
