//! JSON descriptions of shapes, patterns and rays.
//!
//! These are the only way to build the core's types from outside Rust code.
//! Every conversion goes through `TryFrom` and validates what the core
//! itself takes on trust, most importantly that transforms are invertible.
//!
//! A probe description looks like this:
//!
//! ```json
//! {
//!   "shape": {
//!     "ty": "sphere",
//!     "transforms": [ { "op": "scaling", "x": 2.0, "y": 2.0, "z": 2.0 } ],
//!     "material": {
//!       "pattern": { "ty": "stripe", "a": [1, 1, 1], "b": [0, 0, 0] }
//!     }
//!   },
//!   "rays": [ { "origin": [0, 0, -5], "direction": [0, 0, 1] } ]
//! }
//! ```

use std::convert::TryFrom;
use std::str::FromStr;

use serde::{ Serialize, Deserialize };
use tracing::debug;

use crate::error::{ Error, Result };
use crate::tuple::Tuple4D;
use crate::matrix::Matrix4D;
use crate::color::Color;
use crate::material::Material;
use crate::pattern::Pattern;
use crate::ray::Ray4D;
use crate::shape::{ Shape, ShapeType, ShapeRef, normal_at };
use crate::intersect::intersect;

#[cfg(test)]
use pretty_assertions::assert_eq;

/// One step of a transform chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TransformJson {
    Translation { x: f64, y: f64, z: f64 },
    Scaling { x: f64, y: f64, z: f64 },
    RotationX { radians: f64 },
    RotationY { radians: f64 },
    RotationZ { radians: f64 },
    Shearing { xy: f64, xz: f64, yx: f64, yz: f64, zx: f64, zy: f64 },

    /// A raw matrix, 16 elements in row-major order.
    Matrix { data: Vec<f64> },
}

impl TryFrom<&TransformJson> for Matrix4D {
    type Error = Error;

    fn try_from(t: &TransformJson) -> Result<Matrix4D> {
        use TransformJson::*;
        Ok(match *t {
            Translation { x, y, z } => Matrix4D::translation(x, y, z),
            Scaling { x, y, z } => Matrix4D::scaling(x, y, z),
            RotationX { radians } => Matrix4D::rotation_x(radians),
            RotationY { radians } => Matrix4D::rotation_y(radians),
            RotationZ { radians } => Matrix4D::rotation_z(radians),
            Shearing { xy, xz, yx, yz, zx, zy }
                => Matrix4D::shearing(xy, xz, yx, yz, zx, zy),
            Matrix { ref data } => {
                let data = <[f64; 16]>::try_from(data.as_slice())
                    .map_err(|_| Error::MalformedMatrix(data.len()))?;
                Matrix4D::from(data)
            },
        })
    }
}

/// Folds a transform chain into one matrix.
///
/// Steps apply in list order: the first step acts on a point first, so
/// `[scaling, translation]` produces `translation * scaling`.
pub fn compose(transforms: &[TransformJson]) -> Result<Matrix4D> {
    transforms.iter().try_fold(Matrix4D::identity(), |acc, t| {
        Ok(Matrix4D::try_from(t)? * acc)
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternJson {
    pub ty: String,
    pub a: [f64; 3],
    pub b: [f64; 3],

    #[serde(default)]
    pub transforms: Vec<TransformJson>,
}

impl TryFrom<&PatternJson> for Pattern {
    type Error = Error;

    fn try_from(pattern_json: &PatternJson) -> Result<Pattern> {
        let a = Color::from(pattern_json.a);
        let b = Color::from(pattern_json.b);

        let mut pattern = match pattern_json.ty.as_str() {
            "stripe" => Pattern::stripe(a, b),
            other => return Err(Error::UnknownPattern(other.to_string())),
        };

        pattern.try_set_transform(compose(&pattern_json.transforms)?)?;
        Ok(pattern)
    }
}

/// Material overrides; anything left out keeps the `Material` default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialJson {
    pub color: Option<[f64; 3]>,
    pub pattern: Option<PatternJson>,

    pub ambient: Option<f64>,
    pub diffuse: Option<f64>,
    pub specular: Option<f64>,
    pub shininess: Option<f64>,

    pub reflective: Option<f64>,
    pub transparency: Option<f64>,
    pub refractive_index: Option<f64>,
}

impl TryFrom<&MaterialJson> for Material {
    type Error = Error;

    fn try_from(material_json: &MaterialJson) -> Result<Material> {
        let mut m = Material::default();

        if let Some(color) = material_json.color {
            m.color = Color::from(color);
        }
        if let Some(ref pattern) = material_json.pattern {
            m.pattern = Some(Pattern::try_from(pattern)?);
        }

        let scalars = [
            (&mut m.ambient, material_json.ambient),
            (&mut m.diffuse, material_json.diffuse),
            (&mut m.specular, material_json.specular),
            (&mut m.shininess, material_json.shininess),
            (&mut m.reflective, material_json.reflective),
            (&mut m.transparency, material_json.transparency),
            (&mut m.refractive_index, material_json.refractive_index),
        ];
        for (field, value) in scalars {
            if let Some(value) = value {
                *field = value;
            }
        }

        Ok(m)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeJson {
    pub ty: String,

    #[serde(default)]
    pub transforms: Vec<TransformJson>,

    #[serde(default)]
    pub material: Option<MaterialJson>,
}

impl TryFrom<&ShapeJson> for ShapeRef {
    type Error = Error;

    fn try_from(shape_json: &ShapeJson) -> Result<ShapeRef> {
        let ty = match shape_json.ty.as_str() {
            "sphere" => ShapeType::Sphere,
            "plane" => ShapeType::Plane,
            other => return Err(Error::UnknownShape(other.to_string())),
        };

        let shape = Shape::with_type(ty);
        shape.try_set_transform(compose(&shape_json.transforms)?)?;
        if let Some(ref material) = shape_json.material {
            shape.set_material(Material::try_from(material)?);
        }

        debug!(shape = ty.name(), transforms = shape_json.transforms.len(),
            "built shape from description");
        Ok(shape)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RayJson {
    pub origin: [f64; 3],
    pub direction: [f64; 3],
}

impl From<&RayJson> for Ray4D {
    fn from(ray_json: &RayJson) -> Ray4D {
        let [ox, oy, oz] = ray_json.origin;
        let [dx, dy, dz] = ray_json.direction;

        Ray4D::new(Tuple4D::point(ox, oy, oz), Tuple4D::vector(dx, dy, dz))
    }
}

/// Input of the `probe` binary: one shape and the rays to fire at it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProbeJson {
    pub shape: ShapeJson,
    pub rays: Vec<RayJson>,
}

impl FromStr for ProbeJson {
    type Err = Error;

    fn from_str(s: &str) -> Result<ProbeJson> {
        Ok(serde_json::from_str(s)?)
    }
}

/// A validated probe: the shape is built and every ray converted.
#[derive(Clone, Debug)]
pub struct Probe {
    pub shape: ShapeRef,
    pub rays: Vec<Ray4D>,
}

impl TryFrom<&ProbeJson> for Probe {
    type Error = Error;

    fn try_from(probe_json: &ProbeJson) -> Result<Probe> {
        Ok(Probe {
            shape: ShapeRef::try_from(&probe_json.shape)?,
            rays: probe_json.rays.iter().map(Ray4D::from).collect(),
        })
    }
}

/// What a single ray found.
///
/// Everything but `ts` is absent when the ray has no hit. `color` is only
/// present when the shape's material carries a pattern.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProbeReport {
    pub ts: Vec<f64>,
    pub hit: Option<f64>,
    pub point: Option<[f64; 3]>,
    pub normal: Option<[f64; 3]>,
    pub color: Option<Color>,
}

impl Probe {
    /// Fires one ray at the shape and reports the hit, the surface normal
    /// there and, if the material is patterned, the pattern color.
    pub fn fire(&self, ray: Ray4D) -> ProbeReport {
        let xs = intersect(&self.shape, ray);
        let ts = xs.iter().map(|i| i.t).collect();

        let hit = match xs.hit() {
            Some(hit) => hit,
            None => return ProbeReport { ts, ..Default::default() },
        };

        let point = ray.position(hit.t);
        let normal = normal_at(&hit.object, point);
        let color = hit.object.material().pattern
            .map(|pattern| pattern.pattern_at_object(&hit.object, point));

        ProbeReport {
            ts,
            hit: Some(hit.t),
            point: Some([point.x, point.y, point.z]),
            normal: Some([normal.x, normal.y, normal.z]),
            color,
        }
    }

    pub fn run(&self) -> Vec<ProbeReport> {
        self.rays.iter().map(|ray| self.fire(*ray)).collect()
    }
}

#[cfg(test)]
fn probe(json: &str) -> Result<Probe> {
    Probe::try_from(&json.parse::<ProbeJson>()?)
}

#[test]
fn transforms_apply_in_list_order() {
    let chain = vec![
        TransformJson::RotationX { radians: std::f64::consts::PI / 2.0 },
        TransformJson::Scaling { x: 5.0, y: 5.0, z: 5.0 },
        TransformJson::Translation { x: 10.0, y: 5.0, z: 7.0 },
    ];
    let m = compose(&chain).unwrap();

    assert_eq!(m * Tuple4D::point(1.0, 0.0, 1.0), Tuple4D::point(15.0, 0.0, 7.0));
    assert_eq!(compose(&[]).unwrap(), Matrix4D::identity());
}

#[test]
fn transform_ops_parse_by_tag() {
    let json = r#"[
        { "op": "rotation_y", "radians": 1.5 },
        { "op": "shearing", "xy": 1, "xz": 0, "yx": 0, "yz": 0, "zx": 0, "zy": 0 }
    ]"#;
    let chain: Vec<TransformJson> = serde_json::from_str(json).unwrap();

    assert_eq!(chain[0], TransformJson::RotationY { radians: 1.5 });
    assert_eq!(Matrix4D::try_from(&chain[1]).unwrap(),
        Matrix4D::shearing(1.0, 0.0, 0.0, 0.0, 0.0, 0.0));
}

#[test]
fn raw_matrix_needs_sixteen_elements() {
    let short = TransformJson::Matrix { data: vec![1.0; 9] };
    let full = TransformJson::Matrix { data: vec![
        2.0, 0.0, 0.0, 0.0,
        0.0, 2.0, 0.0, 0.0,
        0.0, 0.0, 2.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ] };

    assert!(matches!(Matrix4D::try_from(&short), Err(Error::MalformedMatrix(9))));
    assert_eq!(Matrix4D::try_from(&full).unwrap(),
        Matrix4D::scaling(2.0, 2.0, 2.0));
}

#[test]
fn shape_from_description() {
    let json = r#"{
        "ty": "plane",
        "transforms": [ { "op": "translation", "x": 0, "y": 1, "z": 0 } ],
        "material": { "ambient": 0.5, "color": [1, 0, 0] }
    }"#;
    let shape_json: ShapeJson = serde_json::from_str(json).unwrap();
    let shape = ShapeRef::try_from(&shape_json).unwrap();

    let mut material = Material::default();
    material.ambient = 0.5;
    material.color = Color::rgb(1.0, 0.0, 0.0);

    assert_eq!(shape.ty(), ShapeType::Plane);
    assert_eq!(shape.transform(), Matrix4D::translation(0.0, 1.0, 0.0));
    assert_eq!(shape.material(), material);
}

#[test]
fn unknown_kinds_are_rejected() {
    let cube = r#"{ "shape": { "ty": "cube" }, "rays": [] }"#;
    let rings = r#"{
        "shape": { "ty": "sphere", "material": {
            "pattern": { "ty": "ring", "a": [1, 1, 1], "b": [0, 0, 0] }
        } },
        "rays": []
    }"#;

    assert!(matches!(probe(cube), Err(Error::UnknownShape(ref s)) if s == "cube"));
    assert!(matches!(probe(rings), Err(Error::UnknownPattern(ref s)) if s == "ring"));
}

#[test]
fn singular_transforms_are_rejected() {
    let flat = r#"{
        "shape": {
            "ty": "sphere",
            "transforms": [ { "op": "scaling", "x": 1, "y": 0, "z": 1 } ]
        },
        "rays": []
    }"#;

    assert!(matches!(probe(flat), Err(Error::NonInvertible)));
}

#[test]
fn malformed_json_is_reported() {
    assert!(matches!(probe("{ \"shape\": "), Err(Error::Json(_))));
}

#[test]
fn probing_a_striped_sphere() {
    let json = r#"{
        "shape": {
            "ty": "sphere",
            "transforms": [ { "op": "scaling", "x": 2, "y": 2, "z": 2 } ],
            "material": {
                "pattern": { "ty": "stripe", "a": [1, 1, 1], "b": [0, 0, 0] }
            }
        },
        "rays": [
            { "origin": [0, 0, -5], "direction": [0, 0, 1] },
            { "origin": [0, 5, -5], "direction": [0, 0, 1] }
        ]
    }"#;
    let reports = probe(json).unwrap().run();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0], ProbeReport {
        ts: vec![3.0, 7.0],
        hit: Some(3.0),
        point: Some([0.0, 0.0, -2.0]),
        normal: Some([0.0, 0.0, -1.0]),
        color: Some(Color::white()),
    });
    assert_eq!(reports[1], ProbeReport::default());
}

#[test]
fn probing_a_plane_from_below() {
    let json = r#"{
        "shape": { "ty": "plane" },
        "rays": [ { "origin": [1.5, -2, 0], "direction": [0, 1, 0] } ]
    }"#;
    let reports = probe(json).unwrap().run();

    assert_eq!(reports[0].ts, vec![2.0]);
    assert_eq!(reports[0].hit, Some(2.0));
    assert_eq!(reports[0].normal, Some([0.0, 1.0, 0.0]));
    assert_eq!(reports[0].color, None);
}
