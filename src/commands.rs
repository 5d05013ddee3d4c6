use std::borrow::Cow;

use tracing::debug;

use crate::{
    canvas::Canvas,
    error::{Error, Result},
    shape::Shape,
    traits::command::Command,
};

/// The reversible actions a user can take on a [`Canvas`].
///
/// `DeleteShape` and `ClearAll` hold the shapes they took off the canvas only
/// while they are in the done state; undoing hands those shapes back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasCommand {
    AddShape { shape: Shape },
    DeleteShape { removed: Option<Shape> },
    ClearAll { saved: Vec<Shape> },
}

impl CanvasCommand {
    #[must_use]
    pub fn add(shape: Shape) -> Self {
        CanvasCommand::AddShape { shape }
    }

    #[must_use]
    pub fn delete() -> Self {
        CanvasCommand::DeleteShape { removed: None }
    }

    #[must_use]
    pub fn clear_all() -> Self {
        CanvasCommand::ClearAll { saved: Vec::new() }
    }

    /// Short label for logs and user messages.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            CanvasCommand::AddShape { .. } => "Add new Shape",
            CanvasCommand::DeleteShape { .. } => "Delete last Shape",
            CanvasCommand::ClearAll { .. } => "Clear Canvas",
        }
    }
}

impl Command for CanvasCommand {
    type Context = Canvas;

    fn execute(&mut self, canvas: &mut Canvas) -> Result<()> {
        match self {
            CanvasCommand::AddShape { shape } => canvas.add(shape.clone()),
            CanvasCommand::DeleteShape { removed } => *removed = Some(canvas.remove()?),
            CanvasCommand::ClearAll { saved } => {
                saved.clear();
                while let Ok(shape) = canvas.remove() {
                    saved.push(shape);
                }
                debug!(count = saved.len(), "canvas cleared");
            }
        }
        Ok(())
    }

    fn undo(&mut self, canvas: &mut Canvas) -> Result<()> {
        match self {
            // Whatever sits on top is by construction the shape this command added.
            CanvasCommand::AddShape { shape } => *shape = canvas.remove()?,
            CanvasCommand::DeleteShape { removed } => {
                let shape = removed.take().ok_or(Error::NotApplied {
                    command: "Delete last Shape",
                })?;
                canvas.add(shape);
            }
            CanvasCommand::ClearAll { saved } => {
                while let Some(shape) = saved.pop() {
                    canvas.add(shape);
                }
            }
        }
        Ok(())
    }

    fn description(&self) -> Cow<'_, str> {
        match self {
            CanvasCommand::AddShape { shape } => Cow::Owned(format!("Add {shape}")),
            other => Cow::Borrowed(other.label()),
        }
    }
}
