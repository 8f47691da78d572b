//! Light sources.

use cellray_math::Vec3;

use crate::Colour;

/// A light at infinity shining along a fixed direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Direction from the surface towards the light (not necessarily unit length)
    pub direction: Vec3,
    /// Colour; alpha is used as intensity
    pub colour: Colour,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, colour: Colour) -> Self {
        Self { direction, colour }
    }

    /// Unit direction towards the light.
    pub fn to_light(&self) -> Vec3 {
        self.direction.normalize_or_zero()
    }
}

/// Constant, linear and quadratic falloff coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    /// No falloff.
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
        }
    }
}

impl Attenuation {
    pub fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    /// Divisor applied to the light at `distance`: `c0 + c1·d + c2·d²`.
    #[inline]
    pub fn factor(&self, distance: f32) -> f32 {
        self.constant + self.linear * distance + self.quadratic * distance * distance
    }
}

/// A point light with distance falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub attenuation: Attenuation,
    /// Colour; alpha is used as intensity
    pub colour: Colour,
}

impl PointLight {
    pub fn new(position: Vec3, attenuation: Attenuation, colour: Colour) -> Self {
        Self {
            position,
            attenuation,
            colour,
        }
    }
}
