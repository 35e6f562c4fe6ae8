use std::cell::Cell;
use std::rc::Rc;

use tracing::trace;

use crate::consts::EPSILON;
use crate::error::{ Error, Result };
use crate::tuple::Tuple4D;
use crate::ray::Ray4D;
use crate::material::Material;
use crate::matrix::{ Matrix4D, Transform };
use crate::intersect::{ Intersection, Intersections };

/// A shared handle to a `Shape`.
///
/// Intersections and the scene hold clones of the same handle. Two handles
/// refer to the same shape exactly when `Shape::same` says so; `==` on the
/// shapes themselves compares their contents instead.
pub type ShapeRef = Rc<Shape>;

/// The kinds of geometry a `Shape` can have.
///
/// Each kind describes its surface in object space: untransformed, centered
/// on the origin. Adding a kind means adding a variant here plus an arm in
/// `Shape::local_intersect` and `Shape::local_normal_at`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShapeType {
    /// A sphere of radius 1 centered at the object-space origin.
    Sphere,

    /// The infinite X/Z plane through the origin, facing up along Y.
    Plane,
}

impl ShapeType {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeType::Sphere => "sphere",
            ShapeType::Plane => "plane",
        }
    }
}

/// Some geometry placed in the world.
///
/// A shape is created through `Shape::sphere` or `Shape::plane` and handed
/// out as a `ShapeRef`. Its transform and material sit in `Cell`s so they can
/// be replaced through any handle; nothing here locks, so a shape must not be
/// modified while it is being queried.
#[derive(Debug)]
pub struct Shape {
    ty: ShapeType,
    transform: Cell<Transform>,
    material: Cell<Material>,
}

/// Structural equality.
///
/// Two shapes are equal if their transforms and materials are equal, even if
/// they are separate instances. Use `Shape::same` to ask whether two handles
/// are the same instance.
impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.transform() == other.transform()
            && self.material() == other.material()
    }
}

impl Shape {
    /// Creates a shape of kind `ty` with identity transform and default
    /// material.
    pub fn with_type(ty: ShapeType) -> ShapeRef {
        Rc::new(Shape {
            ty,
            transform: Cell::new(Transform::default()),
            material: Cell::new(Material::default()),
        })
    }

    /// Creates a unit sphere with identity transform and default material.
    pub fn sphere() -> ShapeRef {
        Self::with_type(ShapeType::Sphere)
    }

    /// Creates a plane with a normal pointing up along the Y axis.
    pub fn plane() -> ShapeRef {
        Self::with_type(ShapeType::Plane)
    }

    /// Whether two handles point at the same shape instance.
    pub fn same(left: &ShapeRef, right: &ShapeRef) -> bool {
        Rc::ptr_eq(left, right)
    }

    pub fn ty(&self) -> ShapeType {
        self.ty
    }

    pub fn transform(&self) -> Matrix4D {
        self.transform.get().matrix()
    }

    /// The inverse of `transform`, cached when the transform was assigned.
    pub fn transform_inverse(&self) -> Matrix4D {
        self.transform.get().inverse()
    }

    /// Replaces the shape's transform.
    ///
    /// The transform must be invertible; a singular matrix is a caller bug
    /// and panics. Use `try_set_transform` to check instead.
    pub fn set_transform(&self, transform: Matrix4D) {
        self.try_set_transform(transform).expect(
            "Transformation matrix on shape should be invertible."
        );
    }

    /// Replaces the shape's transform, rejecting singular matrices.
    ///
    /// On error the previous transform is kept.
    pub fn try_set_transform(&self, transform: Matrix4D) -> Result<()> {
        let transform = Transform::new(transform).ok_or(Error::NonInvertible)?;
        self.transform.set(transform);
        Ok(())
    }

    pub fn material(&self) -> Material {
        self.material.get()
    }

    pub fn set_material(&self, material: Material) {
        self.material.set(material);
    }

    /// Converts a point from world to object space.
    pub fn world_to_object(&self, point: Tuple4D) -> Tuple4D {
        self.transform_inverse() * point
    }

    /// Converts a normal from object to world space.
    ///
    /// Normals are multiplied by the transpose of the inverse transform so
    /// they stay perpendicular to the surface under non-uniform scaling. That
    /// product can leave a stray `w` (from the translation column), which is
    /// zeroed before normalizing.
    pub fn normal_to_world(&self, normal: Tuple4D) -> Tuple4D {
        let mut world_normal = self.transform_inverse().transposition() * normal;
        world_normal.w = 0.0;

        world_normal.normalize()
    }

    /// Intersects an object-space ray with this shape.
    ///
    /// The returned intersections hold clones of the handle this is called
    /// through. For a sphere, both roots are returned in ascending order
    /// (equal when the ray is tangent); a plane yields at most one.
    pub fn local_intersect(self: &Rc<Self>, ray: &Ray4D) -> Intersections {
        let ts = match self.ty {
            ShapeType::Sphere => Self::intersect_sphere(ray),
            ShapeType::Plane => Self::intersect_plane(ray),
        };

        Intersections {
            intersections: ts.into_iter()
                .map(|t| Intersection::new(t, Rc::clone(self)))
                .collect()
        }
    }

    /// The object-space normal at an object-space point on the surface.
    pub fn local_normal_at(&self, at: &Tuple4D) -> Tuple4D {
        match self.ty {
            ShapeType::Sphere => *at - Tuple4D::origin(),
            ShapeType::Plane => Tuple4D::vector(0.0, 1.0, 0.0),
        }
    }

    /// Roots of `|origin + t * direction|^2 = 1`.
    ///
    /// Either none (the ray misses) or two, smaller first.
    fn intersect_sphere(ray: &Ray4D) -> Vec<f64> {
        // Subtracting a point leaves a vector, dropping the origin's `w`.
        let sphere_to_ray = ray.origin - Tuple4D::origin();

        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * ray.direction.dot(&sphere_to_ray);
        let c = sphere_to_ray.dot(&sphere_to_ray) - 1.0;

        let discriminant = b.powi(2) - (4.0 * a * c);

        if discriminant < 0.0 {
            return Vec::new();
        }

        let t1 = (-b - discriminant.sqrt()) / (2.0 * a);
        let t2 = (-b + discriminant.sqrt()) / (2.0 * a);

        vec![t1, t2]
    }

    /// Where the ray crosses `y = 0`, unless it runs parallel to the plane.
    fn intersect_plane(ray: &Ray4D) -> Vec<f64> {
        // Also covers rays lying in the plane, which would divide 0 by 0.
        if ray.direction.y.abs() < EPSILON {
            return Vec::new();
        }

        vec![-ray.origin.y / ray.direction.y]
    }
}

/// Finds the world-space normal of a shape at a world-space point.
///
/// The point is assumed to lie on the surface. The result is always a unit
/// vector with `w == 0`.
pub fn normal_at(s: &Shape, world_point: Tuple4D) -> Tuple4D {
    let local_point = s.world_to_object(world_point);
    let local_normal = s.local_normal_at(&local_point);
    let normal = s.normal_to_world(local_normal);

    trace!(shape = s.ty().name(), ?world_point, ?normal, "normal_at");
    normal
}

#[test]
fn default_shape_state() {
    let s = Shape::sphere();

    assert_eq!(s.ty(), ShapeType::Sphere);
    assert_eq!(s.transform(), Matrix4D::identity());
    assert_eq!(s.material(), Material::default());
}

#[test]
fn assigning_a_transform() {
    let s = Shape::sphere();
    s.set_transform(Matrix4D::translation(2.0, 3.0, 4.0));

    assert_eq!(s.transform(), Matrix4D::translation(2.0, 3.0, 4.0));
}

#[test]
fn transform_is_visible_through_every_handle() {
    let s = Shape::plane();
    let other = Rc::clone(&s);
    other.set_transform(Matrix4D::scaling(1.0, 2.0, 1.0));

    assert_eq!(s.transform(), Matrix4D::scaling(1.0, 2.0, 1.0));
}

#[test]
fn singular_transform_is_rejected() {
    let s = Shape::sphere();
    s.set_transform(Matrix4D::translation(1.0, 0.0, 0.0));

    let result = s.try_set_transform(Matrix4D::scaling(0.0, 1.0, 1.0));

    assert!(matches!(result, Err(Error::NonInvertible)));
    assert_eq!(s.transform(), Matrix4D::translation(1.0, 0.0, 0.0));
}

#[test]
#[should_panic]
fn singular_transform_panics_when_unchecked() {
    Shape::sphere().set_transform(Matrix4D::new());
}

#[test]
fn assigning_a_material() {
    let s = Shape::sphere();
    let mut m = Material::default();
    m.ambient = 1.0;
    s.set_material(m);

    assert_eq!(s.material(), m);
}

#[test]
fn identity_and_structural_equality_differ() {
    let s1 = Shape::sphere();
    let s2 = Shape::sphere();
    let s3 = Rc::clone(&s1);

    assert!(Shape::same(&s1, &s3));
    assert!(!Shape::same(&s1, &s2));
    assert_eq!(*s1, *s2);

    s2.set_transform(Matrix4D::translation(0.0, 1.0, 0.0));
    assert_ne!(*s1, *s2);

    s1.set_transform(Matrix4D::translation(0.0, 1.0, 0.0));
    assert_eq!(*s1, *s2);

    let mut m = Material::default();
    m.shininess = 10.0;
    s1.set_material(m);
    assert_ne!(*s1, *s2);
}

#[test]
fn ray_pierces_sphere() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Shape::sphere();
    let xs = s.local_intersect(&r);

    assert_eq!(xs.len(), 2);
    assert_eq!(xs[0].t, 4.0);
    assert_eq!(xs[1].t, 6.0);
}

#[test]
fn ray_is_tangent_to_sphere() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 1.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Shape::sphere();
    let xs = s.local_intersect(&r);

    assert_eq!(xs.len(), 2);
    assert_eq!(xs[0].t, 5.0);
    assert_eq!(xs[1].t, 5.0);
}

#[test]
fn ray_misses_sphere() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 2.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Shape::sphere();

    assert!(s.local_intersect(&r).is_empty());
}

#[test]
fn ray_is_inside_sphere() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Shape::sphere();
    let xs = s.local_intersect(&r);

    assert_eq!(xs.len(), 2);
    assert_eq!(xs[0].t, -1.0);
    assert_eq!(xs[1].t, 1.0);
}

#[test]
fn sphere_is_behind_ray() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Shape::sphere();
    let xs = s.local_intersect(&r);

    assert_eq!(xs.len(), 2);
    assert_eq!(xs[0].t, -6.0);
    assert_eq!(xs[1].t, -4.0);
}

#[test]
fn sphere_roots_ascend_for_oblique_rays() {
    let r = Ray4D::new(
        Tuple4D::point(-3.0, 0.5, 4.0),
        Tuple4D::vector(1.0, 0.0, -1.0)
    );
    let s = Shape::sphere();
    let xs = s.local_intersect(&r);

    assert_eq!(xs.len(), 2);
    assert!(xs[0].t < xs[1].t);
    for i in xs.iter() {
        let on_surface = r.position(i.t) - Tuple4D::origin();
        assert!((on_surface.magnitude() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn local_intersections_reference_the_shape() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Shape::sphere();
    let xs = s.local_intersect(&r);

    assert!(xs.iter().all(|i| Shape::same(&i.object, &s)));
}

#[test]
fn ray_parallel_to_plane() {
    let p = Shape::plane();

    for height in &[10.0, 0.0, -3.0] {
        let r = Ray4D::new(
            Tuple4D::point(0.0, *height, 0.0),
            Tuple4D::vector(0.0, 0.0, 1.0)
        );
        assert!(p.local_intersect(&r).is_empty());
    }
}

#[test]
fn ray_nearly_parallel_to_plane() {
    let p = Shape::plane();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::vector(1.0, 0.000001, 0.0)
    );

    assert!(p.local_intersect(&r).is_empty());
}

#[test]
fn ray_intersecting_plane_from_above() {
    let p = Shape::plane();
    let r = Ray4D::new(
        Tuple4D::point(0.0, 1.0, 0.0),
        Tuple4D::vector(0.0, -1.0, 0.0)
    );

    let xs = p.local_intersect(&r);

    assert_eq!(xs.len(), 1);
    assert_eq!(xs[0].t, 1.0);
    assert!(Shape::same(&xs[0].object, &p));
}

#[test]
fn ray_intersecting_plane_from_below() {
    let p = Shape::plane();
    let r = Ray4D::new(
        Tuple4D::point(0.0, -1.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0)
    );

    let xs = p.local_intersect(&r);

    assert_eq!(xs.len(), 1);
    assert_eq!(xs[0].t, 1.0);
}

#[test]
fn ray_intersecting_plane_obliquely() {
    let p = Shape::plane();
    let r = Ray4D::new(
        Tuple4D::point(2.0, 4.0, -1.0),
        Tuple4D::vector(1.0, -2.0, 0.5)
    );

    let xs = p.local_intersect(&r);

    assert_eq!(xs.len(), 1);
    assert_eq!(xs[0].t, 2.0);
    assert_eq!(r.position(xs[0].t), Tuple4D::point(4.0, 0.0, 0.0));
}

#[test]
fn normal_on_plane() {
    let p = Shape::plane();

    let n1 = p.local_normal_at(&Tuple4D::point(0.0, 0.0, 0.0));
    let n2 = p.local_normal_at(&Tuple4D::point(10.0, 0.0, -10.0));
    let n3 = p.local_normal_at(&Tuple4D::point(-5.0, 0.0, 150.0));

    assert_eq!(n1, Tuple4D::vector(0.0, 1.0, 0.0));
    assert_eq!(n2, Tuple4D::vector(0.0, 1.0, 0.0));
    assert_eq!(n3, Tuple4D::vector(0.0, 1.0, 0.0));
}

#[test]
fn normal_on_sphere_axes() {
    let s = Shape::sphere();

    assert_eq!(normal_at(&s, Tuple4D::point(1.0, 0.0, 0.0)),
        Tuple4D::vector(1.0, 0.0, 0.0));
    assert_eq!(normal_at(&s, Tuple4D::point(0.0, 1.0, 0.0)),
        Tuple4D::vector(0.0, 1.0, 0.0));
    assert_eq!(normal_at(&s, Tuple4D::point(0.0, 0.0, 1.0)),
        Tuple4D::vector(0.0, 0.0, 1.0));
}

#[test]
fn normal_on_sphere_nonaxial() {
    let s = Shape::sphere();
    let k = 3.0f64.sqrt() / 3.0;
    let n = normal_at(&s, Tuple4D::point(k, k, k));

    assert_eq!(n, Tuple4D::vector(k, k, k));
    assert_eq!(n, n.normalize());
}

#[test]
fn normal_on_sphere_translated() {
    let s = Shape::sphere();
    s.set_transform(Matrix4D::translation(0.0, 1.0, 0.0));
    let n = normal_at(&s, Tuple4D::point(0.0, 1.70711, -0.70711));

    assert_eq!(n, Tuple4D::vector(0.0, 0.70711, -0.70711));
}

#[test]
fn normal_on_sphere_transformed() {
    let s = Shape::sphere();
    s.set_transform(Matrix4D::scaling(1.0, 0.5, 1.0)
        * Matrix4D::rotation_z(std::f64::consts::PI / 5.0));
    let n = normal_at(
        &s, Tuple4D::point(0.0, 2.0f64.sqrt() / 2.0, -(2.0f64.sqrt() / 2.0))
    );

    assert_eq!(n, Tuple4D::vector(0.0, 0.97014, -0.24254));
    assert!(n.is_vector());
    assert!((n.magnitude() - 1.0).abs() < 1e-9);
}

#[test]
fn normal_on_rotated_plane() {
    let p = Shape::plane();
    p.set_transform(Matrix4D::translation(0.0, 2.0, 0.0)
        * Matrix4D::rotation_x(std::f64::consts::PI / 2.0));
    let n = normal_at(&p, Tuple4D::point(3.0, 2.0, 0.0));

    assert_eq!(n, Tuple4D::vector(0.0, 0.0, 1.0));
}
