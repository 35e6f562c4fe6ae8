use crate::color::Color;
use crate::pattern::Pattern;

/// A material record.
///
/// Attributes follow the Phong reflection model. The intersection and normal
/// code never reads them; a shape only carries its material around and
/// compares it when two shapes are compared structurally.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    pub pattern: Option<Pattern>,

    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,

    pub reflective: f64,
    pub transparency: f64,
    pub refractive_index: f64,
}

impl Default for Material {
    fn default() -> Material {
        Material {
            color: Color::white(),
            pattern: None,

            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.0,

            reflective: 0.0,
            transparency: 0.0,
            refractive_index: 1.0,
        }
    }
}

#[test]
fn default_material() {
    let m = Material::default();

    assert_eq!(m.color, Color::white());
    assert_eq!(m.pattern, None);
    assert_eq!(m.ambient, 0.1);
    assert_eq!(m.diffuse, 0.9);
    assert_eq!(m.specular, 0.9);
    assert_eq!(m.shininess, 200.0);
}

#[test]
fn materials_compare_by_value() {
    let mut m = Material::default();
    assert_eq!(m, Material::default());

    m.pattern = Some(Pattern::stripe(Color::white(), Color::black()));
    assert_ne!(m, Material::default());
}
