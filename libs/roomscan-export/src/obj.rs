//! # OBJ Writer
//!
//! Writes meshes and planes as Wavefront OBJ text.
//!
//! ```text
//! o mesh_0           # one object per surface, named <kind>_<buffer position>
//! v x y z            # world-space vertex positions
//! vn nx ny nz        # world-space normals (optional)
//! f 1//1 2//2 3//3   # 1-based, globally unique indices
//! ```
//!
//! Planes become a thin box centred on their polygon bounds. Hit points have
//! no geometry and are left out.

use std::fmt::Write;

use config::constants::OBJ_FLOAT_PRECISION;
use glam::{DMat4, DVec3};
use roomscan_mesh::{create_box, plane_bounds, DetectedSurface, Mesh, SurfaceKind};

use crate::error::{ExportError, ExportResult};
use crate::ExportOptions;

/// Writes surfaces as OBJ text.
pub fn write_obj(surfaces: &[DetectedSurface], options: &ExportOptions) -> ExportResult<String> {
    let meshes = world_meshes(surfaces, options.plane_thickness)?;

    let vertex_total: usize = meshes.iter().map(|(_, _, m)| m.vertex_count()).sum();
    let triangle_total: usize = meshes.iter().map(|(_, _, m)| m.triangle_count()).sum();

    let mut out = String::new();
    writeln!(
        out,
        "# room scan: {} objects, {} vertices, {} triangles",
        meshes.len(),
        vertex_total,
        triangle_total
    )?;

    // OBJ indices are 1-based
    let mut offset = 1usize;

    for (index, kind, mesh) in &meshes {
        writeln!(out, "o {}_{}", kind, index)?;

        for v in mesh.vertices() {
            writeln!(out, "v {}", format_vec(*v))?;
        }

        let normals = mesh.normals().filter(|_| options.include_normals);
        if let Some(normals) = normals {
            for n in normals {
                writeln!(out, "vn {}", format_vec(*n))?;
            }
        }

        for tri in mesh.triangles() {
            let [a, b, c] = tri.map(|i| i as usize + offset);
            if normals.is_some() {
                writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
            } else {
                writeln!(out, "f {a} {b} {c}")?;
            }
        }

        offset += mesh.vertex_count();
    }

    Ok(out)
}

/// Resolves every surface with geometry into a world-space mesh, keeping its
/// buffer position and kind.
fn world_meshes(
    surfaces: &[DetectedSurface],
    plane_thickness: f64,
) -> ExportResult<Vec<(usize, SurfaceKind, Mesh)>> {
    let mut meshes = Vec::with_capacity(surfaces.len());

    for (index, surface) in surfaces.iter().enumerate() {
        match surface {
            DetectedSurface::Mesh { geometry, pose, .. } => {
                meshes.push((index, SurfaceKind::Mesh, geometry.transformed(&pose.to_matrix())));
            }
            DetectedSurface::Plane {
                polygon,
                pose,
                dimensions,
                ..
            } => {
                let size = DVec3::new(dimensions.width, plane_thickness, dimensions.height);
                let slab = create_box(size, true).map_err(|source| ExportError::Geometry {
                    kind: SurfaceKind::Plane,
                    index,
                    source,
                })?;

                let center = plane_bounds(polygon)
                    .map(|(min, max)| (min + max) / 2.0)
                    .unwrap_or_default();
                let matrix = pose.to_matrix()
                    * DMat4::from_translation(DVec3::new(center.x, 0.0, center.y));

                meshes.push((index, SurfaceKind::Plane, slab.transformed(&matrix)));
            }
            DetectedSurface::HitPoint { .. } => {}
        }
    }

    Ok(meshes)
}

fn format_vec(v: DVec3) -> String {
    format!(
        "{} {} {}",
        format_float(v.x),
        format_float(v.y),
        format_float(v.z)
    )
}

/// Fixed-precision float; values that round to zero are written unsigned.
fn format_float(value: f64) -> String {
    let text = format!("{:.*}", OBJ_FLOAT_PRECISION, value);
    match text.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => text,
    }
}
