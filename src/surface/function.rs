use glam::DVec3;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("{name} must be a finite value greater than zero, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("lobe count must be at least 1")]
    NoLobes,
}

/// A surface defined as the image of a 2-D (u, v) domain.
///
/// Positions are returned unscaled; `scale` is the uniform factor applied
/// when the surface is turned into vertex data.
pub trait ParametricSurface {
    fn position(&self, u: f64, v: f64) -> DVec3;

    fn scale(&self) -> f64 {
        1.0
    }

    fn scaled_position(&self, u: f64, v: f64) -> DVec3 {
        self.position(u, v) * self.scale()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeParams {
    pub major_radius: f64,
    pub amplitude: f64,
    pub lobes: u32,
    pub zoom: f64,
}

impl ShapeParams {
    pub fn new(major_radius: f64, amplitude: f64, lobes: u32, zoom: f64) -> Result<Self, SurfaceError> {
        check_positive("major radius", major_radius)?;
        check_positive("amplitude", amplitude)?;
        check_positive("zoom", zoom)?;
        if lobes == 0 {
            return Err(SurfaceError::NoLobes);
        }

        Ok(Self {
            major_radius,
            amplitude,
            lobes,
            zoom,
        })
    }

    /// R=2, a=3, n=7, zoom=3
    pub fn reference() -> Self {
        Self {
            major_radius: 2.0,
            amplitude: 3.0,
            lobes: 7,
            zoom: 3.0,
        }
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), SurfaceError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SurfaceError::NonPositive { name, value })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwistedTorus {
    pub params: ShapeParams,
}

impl TwistedTorus {
    pub fn new(params: ShapeParams) -> Self {
        Self { params }
    }
}

impl ParametricSurface for TwistedTorus {
    fn position(&self, u: f64, v: f64) -> DVec3 {
        let ShapeParams {
            major_radius: r,
            amplitude: a,
            lobes,
            ..
        } = self.params;
        let n = f64::from(lobes);

        let radial = r * u.cos() + a * (1.0 - u.sin()) * (n * v).cos();
        DVec3::new(radial * v.cos(), radial * v.sin(), r * u.sin())
    }

    fn scale(&self) -> f64 {
        1.0 / self.params.zoom
    }
}
