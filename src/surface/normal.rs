use glam::DVec3;

use crate::surface::function::ParametricSurface;

pub const DEFAULT_NORMAL_DELTA: f64 = 0.003;

/// Cross products shorter than this are treated as parallel tangents.
pub const DEGENERATE_LENGTH: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum NormalMode {
    /// Unit length, not scaled by zoom.
    #[default]
    Unit,
    /// Raw cross product divided by zoom. Lighting intensity then depends on
    /// tangent length and zoom.
    Reference,
}

impl NormalMode {
    pub const ALL: [NormalMode; 2] = [NormalMode::Unit, NormalMode::Reference];

    pub fn label(self) -> &'static str {
        match self {
            NormalMode::Unit => "Unit",
            NormalMode::Reference => "Reference",
        }
    }
}

/// Step sizes for the finite differences, decoupled from the mesh step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalDeltas {
    pub du: f64,
    pub dv: f64,
}

impl Default for NormalDeltas {
    fn default() -> Self {
        Self {
            du: DEFAULT_NORMAL_DELTA,
            dv: DEFAULT_NORMAL_DELTA,
        }
    }
}

pub fn tangent_u<S: ParametricSurface + ?Sized>(surface: &S, u: f64, v: f64, du: f64) -> DVec3 {
    (surface.position(u + du, v) - surface.position(u, v)) / du
}

pub fn tangent_v<S: ParametricSurface + ?Sized>(surface: &S, u: f64, v: f64, dv: f64) -> DVec3 {
    (surface.position(u, v + dv) - surface.position(u, v)) / dv
}

/// Cross product of the forward-difference tangents. Not normalized; zero
/// where the tangents are parallel.
pub fn estimate_normal<S: ParametricSurface + ?Sized>(
    surface: &S,
    u: f64,
    v: f64,
    deltas: NormalDeltas,
) -> DVec3 {
    tangent_u(surface, u, v, deltas.du).cross(tangent_v(surface, u, v, deltas.dv))
}

pub fn surface_normal<S: ParametricSurface + ?Sized>(
    surface: &S,
    u: f64,
    v: f64,
    deltas: NormalDeltas,
    mode: NormalMode,
) -> DVec3 {
    let raw = estimate_normal(surface, u, v, deltas);
    match mode {
        NormalMode::Unit if raw.length() < DEGENERATE_LENGTH => DVec3::ZERO,
        NormalMode::Unit => raw.normalize(),
        NormalMode::Reference => raw * surface.scale(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::function::{ShapeParams, TwistedTorus};
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    fn torus() -> TwistedTorus {
        TwistedTorus::new(ShapeParams::reference())
    }

    #[test]
    fn test_v_tangent_has_no_z_component() {
        let surface = torus();
        for k in 0..32 {
            let u = PI * f64::from(k) / 32.0;
            let t = tangent_v(&surface, u, 1.3, DEFAULT_NORMAL_DELTA);
            assert_eq!(t.z, 0.0);
        }
    }

    #[test]
    fn test_normal_nonzero_on_seams() {
        let surface = torus();
        let deltas = NormalDeltas::default();
        for k in 0..32 {
            let v = TAU * f64::from(k) / 32.0;
            for u in [0.0, PI] {
                let tu = tangent_u(&surface, u, v, deltas.du);
                let tv = tangent_v(&surface, u, v, deltas.dv);
                let n = estimate_normal(&surface, u, v, deltas);
                assert!(tu.cross(tv).length() > 1e-6);
                assert!(n.length() > 1e-6, "zero normal at u={u}, v={v}");
            }
        }
    }

    #[test]
    fn test_normal_vanishes_at_pole() {
        let surface = torus();
        let deltas = NormalDeltas::default();
        for k in 0..16 {
            let v = TAU * f64::from(k) / 16.0;
            let tv = tangent_v(&surface, FRAC_PI_2, v, deltas.dv);
            assert!(tv.length() < 1e-9);

            let n = estimate_normal(&surface, FRAC_PI_2, v, deltas);
            assert!(n.length() < 1e-9);
            assert_eq!(
                surface_normal(&surface, FRAC_PI_2, v, deltas, NormalMode::Unit),
                DVec3::ZERO
            );
        }
    }

    #[test]
    fn test_unit_mode_normalizes() {
        let surface = torus();
        let n = surface_normal(&surface, 0.4, 2.0, NormalDeltas::default(), NormalMode::Unit);
        assert!((n.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reference_mode_divides_by_zoom() {
        let surface = torus();
        let deltas = NormalDeltas::default();
        let raw = estimate_normal(&surface, 0.4, 2.0, deltas);
        let n = surface_normal(&surface, 0.4, 2.0, deltas, NormalMode::Reference);
        assert!((n - raw / 3.0).length() < 1e-12);
    }

    #[test]
    fn test_normal_matches_analytic_direction() {
        let surface = torus();
        let deltas = NormalDeltas { du: 1e-6, dv: 1e-6 };
        let (u, v): (f64, f64) = (0.7, 0.9);
        let analytic = {
            let p = ShapeParams::reference();
            let n = f64::from(p.lobes);
            let radial = p.major_radius * u.cos() + p.amplitude * (1.0 - u.sin()) * (n * v).cos();
            let dr_du = -p.major_radius * u.sin() - p.amplitude * u.cos() * (n * v).cos();
            let dr_dv = -p.amplitude * (1.0 - u.sin()) * n * (n * v).sin();
            let pu = DVec3::new(dr_du * v.cos(), dr_du * v.sin(), p.major_radius * u.cos());
            let pv = DVec3::new(
                dr_dv * v.cos() - radial * v.sin(),
                dr_dv * v.sin() + radial * v.cos(),
                0.0,
            );
            pu.cross(pv).normalize()
        };
        let estimated = surface_normal(&surface, u, v, deltas, NormalMode::Unit);
        assert!(estimated.dot(analytic) > 0.9999);
    }
}
