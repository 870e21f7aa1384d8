//! Primitive shapes and their parameter schemas
//!
//! Each kind has one pure factory that validates the descriptor and returns
//! a [`Primitive`]. Factories never touch the kernel; the builder hands the
//! validated primitive to
//! [`GeometryKernel::make_primitive`](crate::kernel::GeometryKernel::make_primitive).

use crate::descriptor::{Descriptor, ShapeKind};
use crate::error::{BuildError, Result};

/// Dimensionality of a built shape, which decides its post-processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Closed planar or space curve; never tessellated
    Curve,
    /// Volume-bounding solid; tessellated after positioning
    Solid,
}

/// A validated primitive, ready for the kernel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Cuboid {
        width: f64,
        height: f64,
        depth: f64,
    },
    Sphere {
        radius: f64,
    },
    Cylinder {
        radius: f64,
        height: f64,
    },
    Cone {
        radius1: f64,
        radius2: f64,
        height: f64,
    },
    Wedge {
        width: f64,
        height: f64,
        depth: f64,
        /// Width of the top face; zero gives a triangular profile
        ltx: f64,
    },
    Torus {
        /// Major (ring) radius
        radius1: f64,
        /// Minor (tube) radius
        radius2: f64,
    },
    Ellipse {
        radius_major: f64,
        radius_minor: f64,
    },
}

impl Primitive {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Cuboid { .. } => ShapeKind::Cuboid,
            Self::Sphere { .. } => ShapeKind::Sphere,
            Self::Cylinder { .. } => ShapeKind::Cylinder,
            Self::Cone { .. } => ShapeKind::Cone,
            Self::Wedge { .. } => ShapeKind::Wedge,
            Self::Torus { .. } => ShapeKind::Torus,
            Self::Ellipse { .. } => ShapeKind::Ellipse,
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            Self::Ellipse { .. } => Dimension::Curve,
            _ => Dimension::Solid,
        }
    }
}

/// Schema factory signature shared by every primitive kind
pub type PrimitiveFactory = fn(&Descriptor) -> Result<Primitive>;

/// Kind to factory lookup for every non-boolean kind
const FACTORIES: [(ShapeKind, PrimitiveFactory); 7] = [
    (ShapeKind::Cuboid, cuboid),
    (ShapeKind::Sphere, sphere),
    (ShapeKind::Cylinder, cylinder),
    (ShapeKind::Cone, cone),
    (ShapeKind::Wedge, wedge),
    (ShapeKind::Torus, torus),
    (ShapeKind::Ellipse, ellipse),
];

/// The schema factory for a primitive kind, `None` for boolean kinds
pub fn factory_for(kind: ShapeKind) -> Option<PrimitiveFactory> {
    FACTORIES
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, factory)| *factory)
}

/// Validate a descriptor against its kind's schema
pub fn from_descriptor(descriptor: &Descriptor) -> Result<Primitive> {
    let factory = factory_for(descriptor.kind()).ok_or_else(|| {
        BuildError::invalid(
            "type",
            format!("'{}' is a boolean operation, not a primitive", descriptor.kind()),
        )
    })?;
    factory(descriptor)
}

/// Required parameter names per primitive kind, in schema order
pub fn required_parameters(kind: ShapeKind) -> &'static [&'static str] {
    match kind {
        ShapeKind::Cuboid | ShapeKind::Wedge => &["width", "height", "depth"],
        ShapeKind::Sphere => &["radius"],
        ShapeKind::Cylinder => &["radius", "height"],
        ShapeKind::Cone => &["radius1", "radius2", "height"],
        ShapeKind::Torus => &["radius1", "radius2"],
        ShapeKind::Ellipse => &["radiusMajor", "radiusMinor"],
        ShapeKind::Union | ShapeKind::Subtract | ShapeKind::Intersect => &[],
    }
}

fn positive(descriptor: &Descriptor, name: &str) -> Result<f64> {
    let value = descriptor.number(name)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(BuildError::invalid(name, format!("must be positive, got {value}")))
    }
}

fn non_negative(descriptor: &Descriptor, name: &str) -> Result<f64> {
    let value = descriptor.number(name)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(BuildError::invalid(
            name,
            format!("must not be negative, got {value}"),
        ))
    }
}

fn cuboid(d: &Descriptor) -> Result<Primitive> {
    Ok(Primitive::Cuboid {
        width: positive(d, "width")?,
        height: positive(d, "height")?,
        depth: positive(d, "depth")?,
    })
}

fn sphere(d: &Descriptor) -> Result<Primitive> {
    Ok(Primitive::Sphere {
        radius: positive(d, "radius")?,
    })
}

fn cylinder(d: &Descriptor) -> Result<Primitive> {
    Ok(Primitive::Cylinder {
        radius: positive(d, "radius")?,
        height: positive(d, "height")?,
    })
}

fn cone(d: &Descriptor) -> Result<Primitive> {
    Ok(Primitive::Cone {
        radius1: positive(d, "radius1")?,
        radius2: non_negative(d, "radius2")?,
        height: positive(d, "height")?,
    })
}

fn wedge(d: &Descriptor) -> Result<Primitive> {
    let width = positive(d, "width")?;
    let height = positive(d, "height")?;
    let depth = positive(d, "depth")?;
    let ltx = d.optional_number("ltx")?.unwrap_or(0.0);
    if ltx < 0.0 {
        return Err(BuildError::invalid(
            "ltx",
            format!("must not be negative, got {ltx}"),
        ));
    }
    Ok(Primitive::Wedge {
        width,
        height,
        depth,
        ltx,
    })
}

fn torus(d: &Descriptor) -> Result<Primitive> {
    let radius1 = positive(d, "radius1")?;
    let radius2 = positive(d, "radius2")?;
    if radius2 >= radius1 {
        return Err(BuildError::invalid(
            "radius2",
            format!("minor radius {radius2} must be smaller than major radius {radius1}"),
        ));
    }
    Ok(Primitive::Torus { radius1, radius2 })
}

fn ellipse(d: &Descriptor) -> Result<Primitive> {
    let radius_major = positive(d, "radiusMajor")?;
    let radius_minor = positive(d, "radiusMinor")?;
    if radius_minor > radius_major {
        return Err(BuildError::invalid(
            "radiusMinor",
            format!("minor radius {radius_minor} exceeds major radius {radius_major}"),
        ));
    }
    Ok(Primitive::Ellipse {
        radius_major,
        radius_minor,
    })
}
