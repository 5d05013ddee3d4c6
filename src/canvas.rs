//! A stack of shapes and its SVG serialisation.

use std::{
    fmt,
    io::{self, Write},
    iter::Rev,
    slice,
};

use tracing::{debug, info, trace};

use crate::{
    error::{Error, Result},
    shape::Shape,
};

pub const DEFAULT_WIDTH: u32 = 1450;
pub const DEFAULT_HEIGHT: u32 = 850;

/// What an export did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The document was written and the canvas drained.
    Written { shapes: usize },
    /// The canvas was empty; nothing was written.
    NothingToExport,
}

/// An ordered stack of shapes. The last shape added is the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    shapes: Vec<Shape>,
    width: u32,
    height: u32,
}

impl Canvas {
    #[must_use]
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    #[must_use]
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            shapes: Vec::new(),
            width,
            height,
        }
    }

    pub fn add(&mut self, shape: Shape) {
        trace!(%shape, "added shape to canvas");
        self.shapes.push(shape);
    }

    /// Pops the top shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCanvas`] and leaves the canvas untouched when
    /// there is nothing to remove.
    pub fn remove(&mut self) -> Result<Shape> {
        let shape = self.shapes.pop().ok_or(Error::EmptyCanvas)?;
        trace!(%shape, "removed shape from canvas");
        Ok(shape)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    #[must_use]
    pub fn top(&self) -> Option<&Shape> {
        self.shapes.last()
    }

    /// Shapes from the top of the stack down.
    #[must_use]
    pub fn iter(&self) -> Rev<slice::Iter<'_, Shape>> {
        self.shapes.iter().rev()
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Writes the canvas as an SVG document and empties it.
    ///
    /// Shapes are emitted in pop order, so the most recently added one comes
    /// first. The canvas is only drained once the whole document has been
    /// written and flushed; if writing fails the shapes stay where they were.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the writer fails.
    pub fn export<W: Write>(&mut self, mut out: W) -> Result<ExportOutcome> {
        if self.is_empty() {
            debug!("nothing to export");
            return Ok(ExportOutcome::NothingToExport);
        }

        self.write_svg(&mut out)?;
        out.flush()?;

        let mut shapes = 0;
        while self.remove().is_ok() {
            shapes += 1;
        }

        info!(shapes, "canvas exported");
        Ok(ExportOutcome::Written { shapes })
    }

    fn write_svg<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            r#"<svg height="{}" width="{}" xmlns="http://www.w3.org/2000/svg">"#,
            self.height, self.width
        )?;
        for shape in self.iter() {
            writeln!(out, "{}", shape.svg())?;
        }
        writeln!(out, "</svg>")
    }
}

impl<'a> IntoIterator for &'a Canvas {
    type Item = &'a Shape;
    type IntoIter = Rev<slice::Iter<'a, Shape>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Canvas {
    /// Lists the shapes top-first without touching the stack.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Canvas ({} elements):", self.len())?;
        writeln!(f)?;
        for shape in self {
            writeln!(f, "   > {shape}")?;
        }
        Ok(())
    }
}
