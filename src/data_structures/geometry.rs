//! CPU-side triangle geometry and the primitive shapes the cart is built from.
//!
//! All primitives follow the vertex layout of the common scene-graph box,
//! cylinder and icosahedron generators so that exported files line up with
//! what other tools produce for the same parameters.

use std::f32::consts::TAU;

use cgmath::{InnerSpace, Vector3, Zero};

/// An indexed triangle list.
///
/// Positions and normals are stored as plain arrays so they can be handed
/// to GPU buffers and glTF accessors without conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// Axis-aligned box centred on the origin with one segment per side.
    ///
    /// Faces are emitted in the order +X, -X, +Y, -Y, +Z, -Z with four
    /// vertices each, 24 vertices and 36 indices in total.
    pub fn cuboid(name: &str, width: f32, height: f32, depth: f32) -> Self {
        let mut geometry = Self::empty(name);
        // (u, v, w, udir, vdir, plane width, plane height, plane depth)
        let planes: [(usize, usize, usize, f32, f32, f32, f32, f32); 6] = [
            (2, 1, 0, -1.0, -1.0, depth, height, width),
            (2, 1, 0, 1.0, -1.0, depth, height, -width),
            (0, 2, 1, 1.0, 1.0, width, depth, height),
            (0, 2, 1, 1.0, -1.0, width, depth, -height),
            (0, 1, 2, 1.0, -1.0, width, height, depth),
            (0, 1, 2, -1.0, -1.0, width, height, -depth),
        ];
        for (u, v, w, udir, vdir, plane_w, plane_h, plane_d) in planes {
            geometry.push_plane(u, v, w, udir, vdir, plane_w, plane_h, plane_d);
        }
        geometry
    }

    fn push_plane(
        &mut self,
        u: usize,
        v: usize,
        w: usize,
        udir: f32,
        vdir: f32,
        width: f32,
        height: f32,
        depth: f32,
    ) {
        let offset = self.positions.len() as u32;
        for iy in 0..2 {
            let y = iy as f32 * height - height / 2.0;
            for ix in 0..2 {
                let x = ix as f32 * width - width / 2.0;
                let mut position = [0.0; 3];
                position[u] = x * udir;
                position[v] = y * vdir;
                position[w] = depth / 2.0;
                let mut normal = [0.0; 3];
                normal[w] = if depth > 0.0 { 1.0 } else { -1.0 };
                self.positions.push(position);
                self.normals.push(normal);
            }
        }
        let (a, b, c, d) = (offset, offset + 2, offset + 3, offset + 1);
        self.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    /// Closed cylinder along the Y axis with a single height segment.
    pub fn cylinder(
        name: &str,
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    ) -> Self {
        let mut geometry = Self::empty(name);
        let half_height = height / 2.0;
        let slope = (radius_bottom - radius_top) / height;

        let mut rows = Vec::with_capacity(2);
        for y in 0..2 {
            let v = y as f32;
            let radius = v * (radius_bottom - radius_top) + radius_top;
            let mut row = Vec::with_capacity(radial_segments as usize + 1);
            for x in 0..=radial_segments {
                let theta = x as f32 / radial_segments as f32 * TAU;
                let (sin, cos) = theta.sin_cos();
                row.push(geometry.positions.len() as u32);
                geometry
                    .positions
                    .push([radius * sin, -v * height + half_height, radius * cos]);
                geometry
                    .normals
                    .push(Vector3::new(sin, slope, cos).normalize().into());
            }
            rows.push(row);
        }
        for x in 0..radial_segments as usize {
            let a = rows[0][x];
            let b = rows[1][x];
            let c = rows[1][x + 1];
            let d = rows[0][x + 1];
            if radius_top > 0.0 {
                geometry.indices.extend_from_slice(&[a, b, d]);
            }
            if radius_bottom > 0.0 {
                geometry.indices.extend_from_slice(&[b, c, d]);
            }
        }

        if radius_top > 0.0 {
            geometry.push_cap(true, radius_top, half_height, radial_segments);
        }
        if radius_bottom > 0.0 {
            geometry.push_cap(false, radius_bottom, half_height, radial_segments);
        }
        geometry
    }

    fn push_cap(&mut self, top: bool, radius: f32, half_height: f32, radial_segments: u32) {
        let sign = if top { 1.0 } else { -1.0 };
        let centre_start = self.positions.len() as u32;
        for _ in 1..=radial_segments {
            self.positions.push([0.0, half_height * sign, 0.0]);
            self.normals.push([0.0, sign, 0.0]);
        }
        let rim_start = self.positions.len() as u32;
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            self.positions
                .push([radius * sin, half_height * sign, radius * cos]);
            self.normals.push([0.0, sign, 0.0]);
        }
        for x in 0..radial_segments {
            let c = centre_start + x;
            let i = rim_start + x;
            if top {
                self.indices.extend_from_slice(&[i, i + 1, c]);
            } else {
                self.indices.extend_from_slice(&[i + 1, i, c]);
            }
        }
    }

    /// Regular icosahedron without subdivision.
    ///
    /// Every face gets its own three vertices so the normals are per face:
    /// 20 faces, 60 vertices.
    pub fn icosahedron(name: &str, radius: f32) -> Self {
        let t = (1.0 + 5f32.sqrt()) / 2.0;
        let corners: [[f32; 3]; 12] = [
            [-1.0, t, 0.0],
            [1.0, t, 0.0],
            [-1.0, -t, 0.0],
            [1.0, -t, 0.0],
            [0.0, -1.0, t],
            [0.0, 1.0, t],
            [0.0, -1.0, -t],
            [0.0, 1.0, -t],
            [t, 0.0, -1.0],
            [t, 0.0, 1.0],
            [-t, 0.0, -1.0],
            [-t, 0.0, 1.0],
        ];
        const FACES: [[usize; 3]; 20] = [
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];
        let mut geometry = Self::empty(name);
        for face in FACES {
            for corner in face {
                let p: Vector3<f32> = corners[corner].into();
                geometry.positions.push((p.normalize() * radius).into());
                geometry.indices.push(geometry.indices.len() as u32);
            }
        }
        geometry.normals = vec![[0.0; 3]; geometry.positions.len()];
        geometry.compute_vertex_normals();
        geometry
    }

    /// Scale X and Z of every vertex below the local origin by `factor`.
    ///
    /// Turns a box into a truncated pyramid; the normals are stale until
    /// [`compute_vertex_normals`](Self::compute_vertex_normals) runs.
    pub fn taper_bottom(&mut self, factor: f32) {
        for position in self.positions.iter_mut().filter(|p| p[1] < 0.0) {
            position[0] *= factor;
            position[2] *= factor;
        }
    }

    /// Recompute normals by accumulating the face normal of every triangle
    /// into its corners and normalising the sums.
    pub fn compute_vertex_normals(&mut self) {
        let mut sums = vec![Vector3::<f32>::zero(); self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let pa: Vector3<f32> = self.positions[a].into();
            let pb: Vector3<f32> = self.positions[b].into();
            let pc: Vector3<f32> = self.positions[c].into();
            let face = (pc - pb).cross(pa - pb);
            sums[a] += face;
            sums[b] += face;
            sums[c] += face;
        }
        self.normals = sums
            .into_iter()
            .map(|n| {
                if n.magnitude2() > 0.0 {
                    n.normalize().into()
                } else {
                    [0.0; 3]
                }
            })
            .collect();
    }

    /// Component-wise bounds of all positions, `None` for empty geometry.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(mut min, mut max), p| {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
            (min, max)
        }))
    }

    fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }
}
