use std::cmp::Ordering;
use std::ops::Index;

use tracing::trace;

use crate::ray::Ray4D;
use crate::shape::{ Shape, ShapeRef };

#[cfg(test)]
use std::rc::Rc;
#[cfg(test)]
use crate::{ tuple::Tuple4D, matrix::Matrix4D };

/// An intersection.
///
/// Parameter `t` is the distance along the ray that produced this
/// intersection, and `object` is the shape that was struck.
#[derive(Clone, Debug)]
pub struct Intersection {
    pub t: f64,
    pub object: ShapeRef,
}

/// Two intersections are equal if their offsets `t` are equal and they refer
/// to the *same* shape instance, not merely an equal one.
impl PartialEq for Intersection {
    fn eq(&self, other: &Intersection) -> bool {
        self.t == other.t && Shape::same(&self.object, &other.object)
    }
}

impl Intersection {
    pub fn new(t: f64, object: ShapeRef) -> Intersection {
        Intersection { t, object }
    }
}

/// A collection of intersections.
///
/// Mostly a wrapper for a vector of `Intersection` objects, kept in the order
/// they were produced. Nothing here sorts them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Intersections {
    pub intersections: Vec<Intersection>,
}

impl Intersections {
    pub fn new() -> Intersections {
        Intersections { intersections: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.intersections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Intersection> {
        self.intersections.iter()
    }

    /// Finds the intersection which determines what the ray actually touches.
    ///
    /// That is the intersection with the smallest non-negative `t`; anything
    /// behind the ray origin is ignored. Returns `None` if every `t` is
    /// negative (or the collection is empty).
    ///
    /// The order of the collection does not matter. When two intersections
    /// tie for the smallest `t`, either one may be returned.
    pub fn hit(&self) -> Option<&Intersection> {
        self.intersections.iter()
            .filter(|i| i.t >= 0.0)
            .min_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(Ordering::Equal))
    }
}

impl From<Vec<Intersection>> for Intersections {
    fn from(intersections: Vec<Intersection>) -> Intersections {
        Intersections { intersections }
    }
}

impl Index<usize> for Intersections {
    type Output = Intersection;

    fn index(&self, index: usize) -> &Intersection {
        &self.intersections[index]
    }
}

impl IntoIterator for Intersections {
    type Item = Intersection;
    type IntoIter = std::vec::IntoIter<Intersection>;

    fn into_iter(self) -> Self::IntoIter {
        self.intersections.into_iter()
    }
}

/// Intersects a world-space ray with a `Shape`.
///
/// The ray is moved into the shape's object space with the inverse of the
/// shape's transform, and the shape's `local_intersect` does the rest. The
/// `t` values that come back are valid along the original ray too, since
/// origin and direction are transformed together.
pub fn intersect(s: &ShapeRef, r: Ray4D) -> Intersections {
    let local_ray = r.transform(&s.transform_inverse());
    let xs = s.local_intersect(&local_ray);

    trace!(shape = s.ty().name(), count = xs.len(), "intersect");
    xs
}

#[test]
fn intersection_encapsulates_t_and_object() {
    let s = Shape::sphere();
    let i = Intersection::new(3.5, Rc::clone(&s));

    assert_eq!(i.t, 3.5);
    assert!(Shape::same(&i.object, &s));
}

#[test]
fn intersections_compare_by_identity() {
    let s1 = Shape::sphere();
    let s2 = Shape::sphere();

    assert_eq!(Intersection::new(1.0, Rc::clone(&s1)),
        Intersection::new(1.0, Rc::clone(&s1)));
    assert_ne!(Intersection::new(1.0, Rc::clone(&s1)),
        Intersection::new(1.0, Rc::clone(&s2)));
}

#[test]
fn aggregating_intersections() {
    let s = Shape::sphere();
    let xs = Intersections::from(vec![
        Intersection::new(2.0, Rc::clone(&s)),
        Intersection::new(1.0, Rc::clone(&s)),
    ]);

    assert_eq!(xs.len(), 2);
    assert_eq!(xs[0].t, 2.0);
    assert_eq!(xs[1].t, 1.0);
}

#[test]
fn intersect_sets_the_object() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Shape::sphere();
    let xs = intersect(&s, r);

    assert_eq!(xs.len(), 2);
    assert!(Shape::same(&xs[0].object, &s));
    assert!(Shape::same(&xs[1].object, &s));
}

#[test]
fn hit_with_all_positive() {
    let s  = Shape::sphere();
    let i1 = Intersection::new(1.0, Rc::clone(&s));
    let i2 = Intersection::new(2.0, Rc::clone(&s));
    let is = Intersections::from(vec![i2, i1.clone()]);

    assert_eq!(is.hit(), Some(&i1));
}

#[test]
fn hit_with_some_negative() {
    let s  = Shape::sphere();
    let i1 = Intersection::new(-1.0, Rc::clone(&s));
    let i2 = Intersection::new( 1.0, Rc::clone(&s));
    let is = Intersections::from(vec![i1, i2.clone()]);

    assert_eq!(is.hit(), Some(&i2));
}

#[test]
fn hit_with_all_negative() {
    let s  = Shape::sphere();
    let i1 = Intersection::new(-2.0, Rc::clone(&s));
    let i2 = Intersection::new(-1.0, Rc::clone(&s));
    let is = Intersections::from(vec![i2, i1]);

    assert_eq!(is.hit(), None);
    assert_eq!(Intersections::new().hit(), None);
}

#[test]
fn hit_multiple() {
    let s  = Shape::sphere();
    let i1 = Intersection::new(5.0,  Rc::clone(&s));
    let i2 = Intersection::new(7.0,  Rc::clone(&s));
    let i3 = Intersection::new(-3.0, Rc::clone(&s));
    let i4 = Intersection::new(2.0,  Rc::clone(&s));
    let is = Intersections::from(vec![i1, i2, i3, i4.clone()]);

    assert_eq!(is.hit(), Some(&i4));
}

#[test]
fn hit_ignores_input_order() {
    let s = Shape::sphere();
    let ts = [5.0, 7.0, -3.0, 2.0, 0.5, -0.1];

    for rotation in 0..ts.len() {
        let is: Intersections = ts.iter().cycle().skip(rotation).take(ts.len())
            .map(|t| Intersection::new(*t, Rc::clone(&s)))
            .collect::<Vec<_>>()
            .into();

        assert_eq!(is.hit().map(|i| i.t), Some(0.5));
    }
}

#[test]
fn hit_includes_zero() {
    let s = Shape::plane();
    let is = Intersections::from(vec![
        Intersection::new(0.0, Rc::clone(&s)),
        Intersection::new(-0.5, Rc::clone(&s)),
    ]);

    assert_eq!(is.hit().map(|i| i.t), Some(0.0));
}

#[test]
fn hit_on_tangent_sphere() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 1.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Shape::sphere();
    let xs = intersect(&s, r);

    assert_eq!(xs.hit().map(|i| i.t), Some(5.0));
}

#[test]
fn hit_from_inside_sphere() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Shape::sphere();
    let xs = intersect(&s, r);

    assert_eq!(xs.hit(), Some(&xs[1]));
}

#[test]
fn ray_hits_scaled_sphere() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Shape::sphere();
    s.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0));

    let xs = intersect(&s, r);

    assert_eq!(xs.len(), 2);
    assert_eq!(xs[0].t, 3.0);
    assert_eq!(xs[1].t, 7.0);
}

#[test]
fn ray_misses_translated_sphere() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::vector(0.0, 0.0, 1.0)
    );
    let s = Shape::sphere();
    s.set_transform(Matrix4D::translation(5.0, 0.0, 0.0));

    assert!(intersect(&s, r).is_empty());
}

#[test]
fn ray_hits_translated_plane() {
    let r = Ray4D::new(
        Tuple4D::point(0.0, 3.0, 0.0),
        Tuple4D::vector(0.0, -1.0, 0.0)
    );
    let p = Shape::plane();
    p.set_transform(Matrix4D::translation(0.0, 1.0, 0.0));

    let xs = intersect(&p, r);

    assert_eq!(xs.len(), 1);
    assert_eq!(xs[0].t, 2.0);
}
