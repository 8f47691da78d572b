//! Scene description loader.
//!
//! Reads the line-oriented scene format: one command per line, whitespace
//! separated arguments, `#` starts a comment line.
//!
//! ```text
//! size 640 480
//! camera 0 0 -5  0 0 0  0 1 0  45
//! maxdepth 3
//! directional 0 1 -1  1 1 1
//! diffuse 0.8 0.2 0.2
//! sphere 0 0 0 1
//! ```
//!
//! Material, attenuation and transform state is sticky: every primitive
//! captures the values current when its command is read.

use std::path::Path;

use cellray_math::{Mat4, Vec3};
use thiserror::Error;

use crate::{
    Attenuation, Camera, Colour, DirectionalLight, Material, Plane, PointLight, Scene, Sphere,
    Triangle,
};

/// Errors that can occur while loading a scene file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Everything a scene file describes: the scene itself plus render parameters.
#[derive(Clone, Debug)]
pub struct RenderData {
    pub width: u32,
    pub height: u32,
    /// Maximum reflection depth
    pub max_depth: u32,
    /// Output file name from the `output` command, if any
    pub output_name: Option<String>,
    pub camera: Camera,
    pub scene: Scene,
}

impl Default for RenderData {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            max_depth: 5,
            output_name: None,
            camera: Camera::default(),
            scene: Scene::new(),
        }
    }
}

/// Load a scene file from disk.
pub fn load_scene(path: impl AsRef<Path>) -> LoadResult<RenderData> {
    let path = path.as_ref();
    log::info!("Loading scene: {}", path.display());
    let source = std::fs::read_to_string(path)?;
    load_scene_from_str(&source)
}

/// Parse a scene description held in memory.
pub fn load_scene_from_str(source: &str) -> LoadResult<RenderData> {
    let mut state = LoaderState::new();

    for (i, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        state.line = i + 1;

        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            continue;
        };
        let args: Vec<&str> = tokens.collect();
        state.apply(command, &args)?;
    }

    let data = state.data;
    log::info!(
        "Loaded {} primitives, {} lights ({}x{}, max depth {})",
        data.scene.primitive_count(),
        data.scene.light_count(),
        data.width,
        data.height,
        data.max_depth
    );
    Ok(data)
}

struct LoaderState {
    data: RenderData,
    line: usize,
    vertices: Vec<Vec3>,
    transforms: Vec<Mat4>,
    material: Material,
    attenuation: Attenuation,
}

impl LoaderState {
    fn new() -> Self {
        Self {
            data: RenderData::default(),
            line: 0,
            vertices: Vec::new(),
            transforms: vec![Mat4::IDENTITY],
            material: Material::default(),
            attenuation: Attenuation::default(),
        }
    }

    fn error(&self, message: impl Into<String>) -> LoadError {
        LoadError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    /// Current top of the transform stack.
    fn top(&self) -> Mat4 {
        self.transforms.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    /// Right-multiply `m` onto the top of the transform stack.
    fn concat(&mut self, m: Mat4) {
        if let Some(top) = self.transforms.last_mut() {
            *top *= m;
        }
    }

    fn apply(&mut self, command: &str, args: &[&str]) -> LoadResult<()> {
        match command {
            "size" => {
                let [w, h] = self.uints(args)?;
                self.data.width = w;
                self.data.height = h;
            }
            "camera" => {
                let v: [f32; 10] = self.floats(args)?;
                self.data.camera = Camera::new(
                    Vec3::new(v[0], v[1], v[2]),
                    Vec3::new(v[3], v[4], v[5]),
                    Vec3::new(v[6], v[7], v[8]),
                    v[9],
                );
            }
            "output" => {
                let name = args.first().ok_or_else(|| self.error("output needs a file name"))?;
                self.data.output_name = Some((*name).to_string());
            }
            "maxdepth" => {
                let [depth] = self.uints(args)?;
                self.data.max_depth = depth;
            }
            "maxverts" => {
                let [n] = self.uints(args)?;
                self.vertices.reserve(n as usize);
            }
            "vertex" => {
                let v = self.vec3(args)?;
                self.vertices.push(v);
            }
            "tri" => {
                let [a, b, c] = self.uints(args)?;
                let [v0, v1, v2] = [a, b, c].map(|i| self.vertices.get(i as usize).copied());
                let (Some(v0), Some(v1), Some(v2)) = (v0, v1, v2) else {
                    return Err(self.error(format!(
                        "vertex index out of range ({} vertices defined)",
                        self.vertices.len()
                    )));
                };
                let tri = Triangle::new(v0, v1, v2)
                    .with_transform(self.top())
                    .with_material(self.material);
                self.data.scene.add(tri);
            }
            "sphere" => {
                let [x, y, z, r] = self.floats(args)?;
                let sphere = Sphere::new(Vec3::new(x, y, z), r)
                    .with_transform(self.top())
                    .with_material(self.material);
                self.data.scene.add(sphere);
            }
            "plane" => {
                let [nx, ny, nz, px, py, pz] = self.floats(args)?;
                let plane = Plane::new(Vec3::new(nx, ny, nz), Vec3::new(px, py, pz))
                    .with_transform(self.top())
                    .with_material(self.material);
                self.data.scene.add(plane);
            }
            "directional" => {
                let (direction, colour) = self.vec3_and_colour(args)?;
                self.data
                    .scene
                    .add_directional_light(DirectionalLight::new(direction, colour));
            }
            "point" => {
                let (position, colour) = self.vec3_and_colour(args)?;
                self.data
                    .scene
                    .add_point_light(PointLight::new(position, self.attenuation, colour));
            }
            "attenuation" => {
                let [c, l, q] = self.floats(args)?;
                self.attenuation = Attenuation::new(c, l, q);
            }
            "ambient" => self.material.ambient = self.colour(args)?,
            "diffuse" => self.material.diffuse = self.colour(args)?,
            "specular" => self.material.specular = self.colour(args)?,
            "emission" => self.material.emission = self.colour(args)?,
            "shininess" => {
                let [s] = self.floats(args)?;
                self.material.shininess = s;
            }
            "pushTransform" => {
                let top = self.top();
                self.transforms.push(top);
            }
            "popTransform" => {
                if self.transforms.len() <= 1 {
                    return Err(self.error("popTransform without matching pushTransform"));
                }
                self.transforms.pop();
            }
            "translate" => {
                let t = self.vec3(args)?;
                self.concat(Mat4::from_translation(t));
            }
            "scale" => {
                let s = self.vec3(args)?;
                self.concat(Mat4::from_scale(s));
            }
            "rotate" => {
                let [x, y, z, degrees] = self.floats(args)?;
                let axis = Vec3::new(x, y, z);
                if axis.length_squared() == 0.0 {
                    return Err(self.error("rotate axis must be non-zero"));
                }
                self.concat(Mat4::from_axis_angle(axis.normalize(), degrees.to_radians()));
            }
            other => {
                log::warn!("line {}: unknown command '{}' skipped", self.line, other);
            }
        }
        Ok(())
    }

    fn floats<const N: usize>(&self, args: &[&str]) -> LoadResult<[f32; N]> {
        if args.len() < N {
            return Err(self.error(format!("expected {} numbers, found {}", N, args.len())));
        }
        let mut out = [0.0; N];
        for (slot, arg) in out.iter_mut().zip(args) {
            *slot = arg
                .parse()
                .map_err(|_| self.error(format!("'{}' is not a number", arg)))?;
        }
        Ok(out)
    }

    fn uints<const N: usize>(&self, args: &[&str]) -> LoadResult<[u32; N]> {
        if args.len() < N {
            return Err(self.error(format!("expected {} integers, found {}", N, args.len())));
        }
        let mut out = [0; N];
        for (slot, arg) in out.iter_mut().zip(args) {
            *slot = arg
                .parse()
                .map_err(|_| self.error(format!("'{}' is not a non-negative integer", arg)))?;
        }
        Ok(out)
    }

    fn vec3(&self, args: &[&str]) -> LoadResult<Vec3> {
        let [x, y, z] = self.floats(args)?;
        Ok(Vec3::new(x, y, z))
    }

    /// `r g b [a]`; alpha defaults to 1.
    fn colour(&self, args: &[&str]) -> LoadResult<Colour> {
        if args.len() >= 4 {
            let [r, g, b, a] = self.floats(args)?;
            Ok(Colour::new(r, g, b, a))
        } else {
            let [r, g, b] = self.floats(args)?;
            Ok(Colour::new(r, g, b, 1.0))
        }
    }

    /// `x y z r g b [a]` as used by the light commands.
    fn vec3_and_colour(&self, args: &[&str]) -> LoadResult<(Vec3, Colour)> {
        let v = self.vec3(args)?;
        let colour = self.colour(args.get(3..).unwrap_or_default())?;
        Ok((v, colour))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rgb, Primitive};

    #[test]
    fn test_load_basic_scene() {
        let data = load_scene_from_str(
            "# test scene\n\
             size 320 200\n\
             output out.png\n\
             maxdepth 2\n\
             camera 0 0 -5 0 0 0 0 1 0 45\n\
             \n\
             directional 0 1 0 1 1 1\n\
             attenuation 1 0.5 0\n\
             point 0 5 0 1 0 0 0.5\n\
             diffuse 0.5 0.5 0.5\n\
             sphere 0 0 0 1\n\
             plane 0 1 0 0 -1 0\n",
        )
        .expect("scene should parse");

        assert_eq!((data.width, data.height), (320, 200));
        assert_eq!(data.max_depth, 2);
        assert_eq!(data.output_name.as_deref(), Some("out.png"));
        assert_eq!(data.camera.look_from(), Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(data.camera.fovy(), 45.0);

        assert_eq!(data.scene.primitive_count(), 2);
        assert_eq!(data.scene.directional_lights.len(), 1);
        let point = data.scene.point_lights[0];
        assert_eq!(point.attenuation, Attenuation::new(1.0, 0.5, 0.0));
        assert_eq!(point.colour, Colour::new(1.0, 0.0, 0.0, 0.5));

        let sphere = data.scene.spheres().next().expect("sphere");
        assert_eq!(sphere.radius(), 1.0);
    }

    #[test]
    fn test_defaults() {
        let data = load_scene_from_str("sphere 0 0 0 1\n").expect("scene should parse");
        assert_eq!(data.max_depth, 5);
        assert!(data.output_name.is_none());

        let (_, prim) = data.scene.primitives().next().expect("sphere");
        let material = prim.material().expect("material");
        assert_eq!(material.ambient, rgb(0.1, 0.1, 0.1));
    }

    #[test]
    fn test_material_is_sticky() {
        let data = load_scene_from_str(
            "diffuse 1 0 0\n\
             sphere 0 0 0 1\n\
             sphere 3 0 0 1\n\
             diffuse 0 1 0\n\
             sphere 6 0 0 1\n",
        )
        .expect("scene should parse");

        let diffuse: Vec<Colour> = data
            .scene
            .primitives()
            .filter_map(|(_, p)| p.material().map(|m| m.diffuse))
            .collect();
        assert_eq!(diffuse, vec![rgb(1.0, 0.0, 0.0), rgb(1.0, 0.0, 0.0), rgb(0.0, 1.0, 0.0)]);
    }

    #[test]
    fn test_transform_stack() {
        let data = load_scene_from_str(
            "pushTransform\n\
             translate 0 0 10\n\
             scale 2 2 2\n\
             sphere 0 0 0 1\n\
             popTransform\n\
             sphere 0 0 0 1\n",
        )
        .expect("scene should parse");

        let prims: Vec<&Primitive> = data.scene.primitives().map(|(_, p)| p).collect();
        let moved = prims[0].bounds().expect("bounded");
        assert!((moved.min() - Vec3::new(-2.0, -2.0, 8.0)).length() < 1e-5);
        assert!((moved.max() - Vec3::new(2.0, 2.0, 12.0)).length() < 1e-5);

        assert_eq!(prims[1].world_transform(), Mat4::IDENTITY);
    }

    #[test]
    fn test_triangles_use_vertex_indices() {
        let data = load_scene_from_str(
            "maxverts 3\n\
             vertex -1 -1 0\n\
             vertex 1 -1 0\n\
             vertex 0 1 0\n\
             tri 0 1 2\n",
        )
        .expect("scene should parse");

        let tri = data.scene.triangles().next().expect("triangle");
        assert_eq!(tri.vertices()[2], Vec3::new(0.0, 1.0, 0.0));

        let err = load_scene_from_str("vertex 0 0 0\ntri 0 1 2\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_errors_report_line() {
        let err = load_scene_from_str("size 10 10\nsphere 0 0 nope 1\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 2, .. }));

        let err = load_scene_from_str("sphere 0 0\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 1, .. }));

        let err = load_scene_from_str("popTransform\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 1, .. }));

        let err = load_scene_from_str("rotate 0 0 0 45\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_unknown_commands_are_skipped() {
        let data = load_scene_from_str("frobnicate 1 2 3\nsphere 0 0 0 1\n").expect("should parse");
        assert_eq!(data.scene.primitive_count(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_scene("/definitely/not/a/scene.test").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_bundled_sample_scene() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenes/spheres.test");
        let data = load_scene(&path).expect("sample scene should load");

        assert_eq!((data.width, data.height), (640, 480));
        assert_eq!(data.scene.planes().count(), 1);
        assert_eq!(data.scene.spheres().count(), 3);
        assert_eq!(data.scene.light_count(), 2);
    }
}
