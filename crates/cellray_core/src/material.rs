//! Blinn-Phong surface material.

use cellray_math::Vec4;

/// RGBA colour, unit range per channel. Alpha on a light colour is used as
/// its intensity.
pub type Colour = Vec4;

/// Build an opaque colour from RGB components.
#[inline]
pub fn rgb(r: f32, g: f32, b: f32) -> Colour {
    Colour::new(r, g, b, 1.0)
}

/// Blinn-Phong material carried by each primitive.
///
/// Copied by value; hits borrow it from the primitive that owns it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Colour,
    pub diffuse: Colour,
    pub specular: Colour,
    pub emission: Colour,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: rgb(0.1, 0.1, 0.1),
            diffuse: rgb(0.0, 0.0, 0.0),
            specular: rgb(0.0, 0.0, 0.0),
            emission: rgb(0.0, 0.0, 0.0),
            shininess: 1.0,
        }
    }
}

impl Material {
    /// A plain diffuse material with the default ambient term.
    pub fn diffuse(colour: Colour) -> Self {
        Self {
            diffuse: colour,
            ..Default::default()
        }
    }

    /// Set the specular colour and exponent.
    pub fn with_specular(mut self, specular: Colour, shininess: f32) -> Self {
        self.specular = specular;
        self.shininess = shininess;
        self
    }

    /// Set the ambient colour.
    pub fn with_ambient(mut self, ambient: Colour) -> Self {
        self.ambient = ambient;
        self
    }

    /// Set the emitted colour.
    pub fn with_emission(mut self, emission: Colour) -> Self {
        self.emission = emission;
        self
    }

    /// True if the material reflects anything along mirror directions.
    pub fn is_reflective(&self) -> bool {
        self.specular.truncate() != cellray_math::Vec3::ZERO
    }
}
