use crate::error::{ Error, Result };
use crate::tuple::Tuple4D;
use crate::color::Color;
use crate::matrix::{ Matrix4D, Transform };
use crate::shape::Shape;

/// The kinds of pattern a `Pattern` can sample.
///
/// Every kind alternates or blends between the pattern's two colors `a` and
/// `b`, and every kind shares the same world-to-pattern transform pipeline
/// (see `Pattern::pattern_at_object`). New kinds only need an arm in
/// `Pattern::pattern_at`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PatternType {
    /// Bands one unit wide across the X axis.
    Stripe,
}

impl PatternType {
    pub fn name(&self) -> &'static str {
        match self {
            PatternType::Stripe => "stripe",
        }
    }
}

/// A surface pattern with its own transform.
///
/// The pattern transform places the pattern relative to the *shape* it is
/// painted on, so a pattern can be scaled, rotated or offset independently of
/// (and in addition to) the shape's own transform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pattern {
    pub ty: PatternType,
    pub a: Color,
    pub b: Color,

    transform: Transform,
}

impl Pattern {
    /// An alternating stripe pattern applied across the X axis.
    ///
    /// For a point `(x, y, z)`, if `floor(x) % 2 == 0`, color `a` is applied to
    /// that point; otherwise, color `b` is used.
    pub fn stripe(a: Color, b: Color) -> Pattern {
        Pattern {
            ty: PatternType::Stripe,
            a, b,
            transform: Transform::default(),
        }
    }

    pub fn transform(&self) -> Matrix4D {
        self.transform.matrix()
    }

    /// Replaces the pattern's transform.
    ///
    /// Panics on a singular matrix; see `try_set_transform`.
    pub fn set_transform(&mut self, transform: Matrix4D) {
        self.try_set_transform(transform).expect(
            "Transformation matrix on pattern should be invertible."
        );
    }

    /// Replaces the pattern's transform, rejecting singular matrices.
    pub fn try_set_transform(&mut self, transform: Matrix4D) -> Result<()> {
        self.transform = Transform::new(transform).ok_or(Error::NonInvertible)?;
        Ok(())
    }

    /// Samples the stripe banding at a pattern-space point.
    ///
    /// Only `x` matters. Flooring before the euclidean remainder keeps the
    /// bands one unit wide on both sides of zero: `-0.1` floors to `-1`
    /// (odd, so `b`) and `-1.1` floors to `-2` (even, so `a`).
    pub fn stripe_at(&self, p: Tuple4D) -> Color {
        if p.x.floor().rem_euclid(2.0) == 0.0 {
            self.a
        } else {
            self.b
        }
    }

    /// Samples this pattern at a pattern-space point.
    pub fn pattern_at(&self, p: Tuple4D) -> Color {
        match self.ty {
            PatternType::Stripe => self.stripe_at(p),
        }
    }

    /// Samples this pattern at a world-space point on `obj`.
    ///
    /// The point is taken into the shape's object space, then into pattern
    /// space, before sampling.
    ///
    /// ```
    /// # use ray_tracer_core::color::Color;
    /// # use ray_tracer_core::matrix::Matrix4D;
    /// # use ray_tracer_core::pattern::Pattern;
    /// # use ray_tracer_core::shape::Shape;
    /// # use ray_tracer_core::tuple::Tuple4D;
    /// let sphere = Shape::sphere();
    /// sphere.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0));
    ///
    /// let mut stripes = Pattern::stripe(Color::white(), Color::black());
    /// stripes.set_transform(Matrix4D::translation(0.5, 0.0, 0.0));
    ///
    /// let c = stripes.pattern_at_object(&sphere, Tuple4D::point(2.5, 0.0, 0.0));
    /// assert_eq!(c, Color::white());
    /// ```
    pub fn pattern_at_object(&self, obj: &Shape, world_point: Tuple4D)
        -> Color {
        let object_point = obj.world_to_object(world_point);
        let pattern_point = self.transform.inverse() * object_point;

        self.pattern_at(pattern_point)
    }
}

#[cfg(test)]
fn white_black() -> Pattern {
    Pattern::stripe(Color::white(), Color::black())
}

#[test]
fn creating_a_stripe_pattern() {
    let pattern = white_black();

    assert_eq!(pattern.ty, PatternType::Stripe);
    assert_eq!(pattern.a, Color::white());
    assert_eq!(pattern.b, Color::black());
    assert_eq!(pattern.transform(), Matrix4D::identity());
}

#[test]
fn stripe_pattern_is_constant_along_y() {
    let pattern = white_black();

    assert_eq!(pattern.stripe_at(Tuple4D::point(0.0, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.stripe_at(Tuple4D::point(0.0, 1.0, 0.0)),
        Color::white());
    assert_eq!(pattern.stripe_at(Tuple4D::point(0.0, 2.0, 0.0)),
        Color::white());
}

#[test]
fn stripe_pattern_is_constant_along_z() {
    let pattern = white_black();

    assert_eq!(pattern.stripe_at(Tuple4D::point(0.0, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.stripe_at(Tuple4D::point(0.0, 0.0, 1.0)),
        Color::white());
    assert_eq!(pattern.stripe_at(Tuple4D::point(0.0, 0.0, 2.0)),
        Color::white());
}

#[test]
fn stripe_pattern_alternates_along_x() {
    let pattern = white_black();

    assert_eq!(pattern.stripe_at(Tuple4D::point( 0.0, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.stripe_at(Tuple4D::point( 0.9, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.stripe_at(Tuple4D::point( 1.0, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.stripe_at(Tuple4D::point(-0.1, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.stripe_at(Tuple4D::point(-1.0, 0.0, 0.0)),
        Color::black());
    assert_eq!(pattern.stripe_at(Tuple4D::point(-1.1, 0.0, 0.0)),
        Color::white());
}

#[test]
fn stripe_pattern_repeats_every_two_units() {
    let pattern = Pattern::stripe(Color::rgb(1.0, 0.0, 0.0),
        Color::rgb(0.0, 0.0, 1.0));

    for i in -4..4 {
        let x = i as f64 + 0.25;
        assert_eq!(pattern.pattern_at(Tuple4D::point(x, 3.0, -7.0)),
            pattern.pattern_at(Tuple4D::point(x + 2.0, -1.0, 5.0)));
        assert_ne!(pattern.pattern_at(Tuple4D::point(x, 0.0, 0.0)),
            pattern.pattern_at(Tuple4D::point(x + 1.0, 0.0, 0.0)));
    }
}

#[test]
fn pattern_transform_can_be_assigned() {
    let mut pattern = white_black();
    pattern.set_transform(Matrix4D::translation(1.0, 2.0, 3.0));

    assert_eq!(pattern.transform(), Matrix4D::translation(1.0, 2.0, 3.0));
    assert!(pattern.try_set_transform(Matrix4D::scaling(1.0, 1.0, 0.0)).is_err());
    assert_eq!(pattern.transform(), Matrix4D::translation(1.0, 2.0, 3.0));
}

#[test]
fn stripes_with_an_object_transformation() {
    let object = Shape::sphere();
    object.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0));
    let pattern = white_black();

    let c = pattern.pattern_at_object(&object, Tuple4D::point(1.5, 0.0, 0.0));
    assert_eq!(c, Color::white());
}

#[test]
fn stripes_with_a_pattern_transformation() {
    let object = Shape::sphere();
    let mut pattern = white_black();
    pattern.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0));

    let c = pattern.pattern_at_object(&object, Tuple4D::point(1.5, 0.0, 0.0));
    assert_eq!(c, Color::white());
}

#[test]
fn stripes_with_both_transformations() {
    let object = Shape::sphere();
    object.set_transform(Matrix4D::scaling(2.0, 2.0, 2.0));
    let mut pattern = white_black();
    pattern.set_transform(Matrix4D::translation(0.5, 0.0, 0.0));

    let c = pattern.pattern_at_object(&object, Tuple4D::point(2.5, 0.0, 0.0));
    assert_eq!(c, Color::white());
}

#[test]
fn object_transformation_shifts_the_bands() {
    let object = Shape::plane();
    object.set_transform(Matrix4D::translation(1.0, 0.0, 0.0));
    let pattern = white_black();

    // World x = 1.5 sits at object x = 0.5, and world x = 0.5 at -0.5.
    assert_eq!(pattern.pattern_at_object(&object, Tuple4D::point(1.5, 0.0, 0.0)),
        Color::white());
    assert_eq!(pattern.pattern_at_object(&object, Tuple4D::point(0.5, 0.0, 0.0)),
        Color::black());
}
