use std::f64::consts::{PI, TAU};
use std::time::Instant;

use glam::DVec2;
use thiserror::Error;

use crate::surface::function::ParametricSurface;
use crate::surface::mesh::StripMesh;
use crate::surface::normal::{NormalDeltas, NormalMode, surface_normal};

pub const U_RANGE: f64 = PI;
pub const V_RANGE: f64 = TAU;
pub const DEFAULT_STEP: f64 = 0.01;
pub const MAX_STRIP_VERTICES: usize = 1_000_000;

// Absorbs rounding when the step divides the range exactly.
const COUNT_TOLERANCE: f64 = 1e-9;

const UV_OFFSET_U: f64 = 5.0;
const UV_SCALE_U: f64 = 3.0;
const UV_SCALE_V: f64 = 2.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TessellationError {
    #[error("{axis} step must be finite and in (0, {range:.4}], got {step}")]
    InvalidStep {
        axis: &'static str,
        step: f64,
        range: f64,
    },

    #[error("mesh would have {requested} vertices, limit is {max}")]
    VertexBudget { requested: usize, max: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessellationSettings {
    pub step_u: f64,
    pub step_v: f64,
    pub deltas: NormalDeltas,
    pub normal_mode: NormalMode,
}

impl Default for TessellationSettings {
    fn default() -> Self {
        Self {
            step_u: DEFAULT_STEP,
            step_v: DEFAULT_STEP,
            deltas: NormalDeltas::default(),
            normal_mode: NormalMode::default(),
        }
    }
}

impl TessellationSettings {
    pub fn with_steps(step_u: f64, step_v: f64) -> Self {
        Self {
            step_u,
            step_v,
            ..Self::default()
        }
    }

    /// Strip rows along u and columns along v.
    pub fn grid(&self) -> Result<(usize, usize), TessellationError> {
        let rows = step_count("u", U_RANGE, self.step_u)?;
        let columns = step_count("v", V_RANGE, self.step_v)?;

        let requested = rows
            .checked_mul(columns)
            .and_then(|cells| cells.checked_mul(2))
            .unwrap_or(usize::MAX);
        if requested > MAX_STRIP_VERTICES {
            return Err(TessellationError::VertexBudget {
                requested,
                max: MAX_STRIP_VERTICES,
            });
        }

        Ok((rows, columns))
    }

    pub fn vertex_count(&self) -> Result<usize, TessellationError> {
        self.grid().map(|(rows, columns)| rows * columns * 2)
    }
}

fn step_count(axis: &'static str, range: f64, step: f64) -> Result<usize, TessellationError> {
    if !step.is_finite() || step <= 0.0 || step > range {
        return Err(TessellationError::InvalidStep { axis, step, range });
    }
    Ok(((range / step - COUNT_TOLERANCE).ceil() as usize).max(1))
}

pub fn texture_coord(u: f64, v: f64) -> DVec2 {
    DVec2::new((u + UV_OFFSET_U) / UV_SCALE_U, v / UV_SCALE_V)
}

/// Walks the domain row by row and emits a (u, v) / (u + step_u, v) vertex
/// pair per cell. Parameters come from integer indices, so the vertex count
/// is exactly `rows * columns * 2`.
pub fn build_mesh<S: ParametricSurface + ?Sized>(
    surface: &S,
    settings: &TessellationSettings,
) -> Result<StripMesh, TessellationError> {
    let started = Instant::now();
    let (rows, columns) = settings.grid()?;
    let TessellationSettings {
        step_u,
        step_v,
        deltas,
        normal_mode,
    } = *settings;

    let mut mesh = StripMesh::with_capacity(rows * columns * 2);
    mesh.rows = rows;
    mesh.columns = columns;

    for i in 0..rows {
        let u = i as f64 * step_u;
        let u_next = u + step_u;

        for j in 0..columns {
            let v = j as f64 * step_v;

            mesh.push(
                surface.scaled_position(u, v),
                surface_normal(surface, u, v, deltas, normal_mode),
                texture_coord(u, v),
            );
            mesh.push(
                surface.scaled_position(u_next, v),
                surface_normal(surface, u_next, v, deltas, normal_mode),
                texture_coord(u_next, v + step_v),
            );
        }
    }

    log::debug!(
        "tessellated {}x{} grid into {} vertices in {:.1} ms",
        rows,
        columns,
        mesh.vertex_count(),
        started.elapsed().as_secs_f64() * 1000.0
    );
    debug_assert!(mesh.is_consistent());

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::function::{ShapeParams, TwistedTorus};
    use proptest::prelude::*;

    fn torus() -> TwistedTorus {
        TwistedTorus::new(ShapeParams::reference())
    }

    #[test]
    fn test_reference_step_grid() {
        let settings = TessellationSettings::default();
        assert_eq!(settings.grid(), Ok((315, 629)));
        assert_eq!(settings.vertex_count(), Ok(315 * 629 * 2));
    }

    #[test]
    fn test_exact_division_counts() {
        let settings = TessellationSettings::with_steps(PI / 40.0, TAU / 80.0);
        let mesh = build_mesh(&torus(), &settings).unwrap();
        assert_eq!(mesh.vertex_count(), 40 * 80 * 2);
        assert_eq!((mesh.rows, mesh.columns), (40, 80));
        assert!(mesh.is_consistent());
    }

    #[test]
    fn test_first_pair_straddles_row() {
        let settings = TessellationSettings::with_steps(PI / 8.0, TAU / 16.0);
        let surface = torus();
        let mesh = build_mesh(&surface, &settings).unwrap();

        let low = surface.scaled_position(0.0, 0.0).as_vec3().to_array();
        let high = surface.scaled_position(PI / 8.0, 0.0).as_vec3().to_array();
        assert_eq!(mesh.position(0), low);
        assert_eq!(mesh.position(1), high);
        assert!((mesh.position(0)[0] - 5.0 / 3.0).abs() < 1e-6);

        let uv_low = mesh.uv(0);
        let uv_high = mesh.uv(1);
        assert!((uv_low[0] - 5.0 / 3.0).abs() < 1e-6);
        assert_eq!(uv_low[1], 0.0);
        assert!((uv_high[0] - (PI / 8.0 + 5.0) as f32 / 3.0).abs() < 1e-6);
        assert!((uv_high[1] - (TAU / 16.0) as f32 / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_next_row_starts_on_previous_high_row() {
        let settings = TessellationSettings::with_steps(PI / 4.0, TAU / 6.0);
        let mesh = build_mesh(&torus(), &settings).unwrap();
        let per_row = mesh.columns * 2;
        // high-u vertex of row 0 at v=0 equals low-u vertex of row 1 at v=0
        let a = mesh.position(1);
        let b = mesh.position(per_row);
        for k in 0..3 {
            assert!((a[k] - b[k]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_unit_normals_except_at_pole() {
        let settings = TessellationSettings::with_steps(PI / 10.0, TAU / 12.0);
        let mesh = build_mesh(&torus(), &settings).unwrap();
        for index in 0..mesh.vertex_count() {
            let [x, y, z] = mesh.normal(index);
            let len = (x * x + y * y + z * z).sqrt();
            assert!(len < 1e-6 || (len - 1.0).abs() < 1e-4, "len {len} at {index}");
        }
    }

    #[test]
    fn test_rejects_bad_steps() {
        let settings = TessellationSettings::with_steps(0.0, 0.1);
        assert!(matches!(
            settings.grid(),
            Err(TessellationError::InvalidStep { axis: "u", .. })
        ));

        let settings = TessellationSettings::with_steps(0.1, f64::NAN);
        assert!(matches!(
            settings.grid(),
            Err(TessellationError::InvalidStep { axis: "v", .. })
        ));

        let settings = TessellationSettings::with_steps(4.0, 0.1);
        assert!(settings.grid().is_err());
    }

    #[test]
    fn test_rejects_oversized_mesh() {
        let settings = TessellationSettings::with_steps(0.001, 0.001);
        assert!(matches!(
            build_mesh(&torus(), &settings),
            Err(TessellationError::VertexBudget { .. })
        ));
    }

    #[test]
    fn test_texture_coord_is_affine() {
        let base = texture_coord(0.3, 1.1);
        let du = texture_coord(0.3 + 0.6, 1.1) - base;
        let dv = texture_coord(0.3, 1.1 + 0.8) - base;
        assert!((du.x - 0.2).abs() < 1e-12 && du.y.abs() < 1e-12);
        assert!(dv.x.abs() < 1e-12 && (dv.y - 0.4).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_count_matches_divisions(n in 1usize..60, m in 1usize..60) {
            let settings = TessellationSettings::with_steps(PI / n as f64, TAU / m as f64);
            let mesh = build_mesh(&torus(), &settings).unwrap();
            prop_assert_eq!(mesh.vertex_count(), n * m * 2);
            prop_assert!(mesh.is_consistent());
        }

        #[test]
        fn prop_texture_coord_monotonic(
            u in 0.0f64..PI,
            v in 0.0f64..TAU,
            du in 1e-4f64..1.0,
            dv in 1e-4f64..1.0,
        ) {
            let base = texture_coord(u, v);
            let moved = texture_coord(u + du, v + dv);
            prop_assert!(((moved.x - base.x) - du / 3.0).abs() < 1e-12);
            prop_assert!(((moved.y - base.y) - dv / 2.0).abs() < 1e-12);
        }
    }
}
