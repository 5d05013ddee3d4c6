//! The three drawable primitives and their SVG fragments.

use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which primitive to build, as chosen by a shape code (`c`, `s` or `r`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
    Square,
    Rectangle,
}

impl ShapeKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Rectangle => "rectangle",
        }
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    /// Only the first letter counts, so `c`, `Circle` and `circ` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('c') => Ok(ShapeKind::Circle),
            Some('s') => Ok(ShapeKind::Square),
            Some('r') => Ok(ShapeKind::Rectangle),
            _ => Err(format!("unknown shape `{}`", s.trim())),
        }
    }
}

/// Geometry of a shape. All values are non-negative integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    Circle { x: u32, y: u32, r: u32 },
    Square { len: u32, x: u32, y: u32 },
    Rectangle { w: u32, h: u32, x: u32, y: u32 },
}

/// An immutable shape together with its precomputed SVG fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    geometry: Geometry,
    fragment: String,
}

impl Shape {
    #[must_use]
    pub fn circle(x: u32, y: u32, r: u32) -> Self {
        Self::from_geometry(Geometry::Circle { x, y, r })
    }

    #[must_use]
    pub fn square(len: u32, x: u32, y: u32) -> Self {
        Self::from_geometry(Geometry::Square { len, x, y })
    }

    #[must_use]
    pub fn rectangle(w: u32, h: u32, x: u32, y: u32) -> Self {
        Self::from_geometry(Geometry::Rectangle { w, h, x, y })
    }

    #[must_use]
    pub fn from_geometry(geometry: Geometry) -> Self {
        let fragment = render_fragment(&geometry);
        Self { geometry, fragment }
    }

    /// Builds a shape of `kind` whose parameters are drawn uniformly from
    /// `1..max`.
    ///
    /// # Panics
    ///
    /// Panics if `max < 2`, since the range would be empty.
    pub fn random<R: Rng>(kind: ShapeKind, rng: &mut R, max: u32) -> Self {
        let mut next = || rng.gen_range(1..max);
        match kind {
            ShapeKind::Circle => Self::circle(next(), next(), next()),
            ShapeKind::Square => Self::square(next(), next(), next()),
            ShapeKind::Rectangle => Self::rectangle(next(), next(), next(), next()),
        }
    }

    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self.geometry {
            Geometry::Circle { .. } => ShapeKind::Circle,
            Geometry::Square { .. } => ShapeKind::Square,
            Geometry::Rectangle { .. } => ShapeKind::Rectangle,
        }
    }

    /// The SVG element drawing this shape.
    #[must_use]
    pub fn svg(&self) -> &str {
        &self.fragment
    }
}

fn render_fragment(geometry: &Geometry) -> String {
    match *geometry {
        Geometry::Circle { x, y, r } => format!(
            r#"<circle cx="{x}" cy="{y}" r="{r}" stroke="black" stroke-width="2" fill="purple" />"#
        ),
        Geometry::Square { len, x, y } => rect_fragment(len, len, x, y),
        Geometry::Rectangle { w, h, x, y } => rect_fragment(w, h, x, y),
    }
}

fn rect_fragment(w: u32, h: u32, x: u32, y: u32) -> String {
    format!(
        r#"<rect width="{w}" height="{h}" x="{x}" y="{y}" stroke="purple" stroke-width="20" fill="cyan" />"#
    )
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.geometry {
            Geometry::Circle { x, y, r } => write!(f, "Circle [x: {x}, y: {y}, r: {r}]"),
            Geometry::Square { len, x, y } => {
                write!(f, "Square [x: {x}, y: {y}, length: {len}]")
            }
            Geometry::Rectangle { w, h, x, y } => {
                write!(f, "Rectangle [Width: {w}, Height: {h}, X: {x}, Y: {y}]")
            }
        }
    }
}
