//! Scripted walkthrough of add, delete, undo and redo, printed step by step.

use std::io::{self, Write};

use crate::{commands::CanvasCommand, repl::Session, shape::ShapeKind};

/// Runs the walkthrough against `session`, printing the canvas after each step.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn run<W: Write>(session: &mut Session, out: &mut W) -> io::Result<()> {
    writeln!(out, "==== DEMO START ====")?;
    writeln!(out, "{}", session.canvas())?;

    step(session, out, "TEST: ADDING (ADD TWO CIRCLES AND ONE RECTANGLE)", |s| {
        for kind in [ShapeKind::Circle, ShapeKind::Circle, ShapeKind::Rectangle] {
            let shape = s.random_shape(kind);
            s.execute(CanvasCommand::add(shape))?;
        }
        Ok(())
    })?;

    step(session, out, "TEST: DELETE TWO SHAPES", |s| {
        s.execute(CanvasCommand::delete())?;
        s.execute(CanvasCommand::delete())
    })?;

    step(session, out, "UNDOING: RESTORE THE TWO DELETED SHAPES", |s| {
        s.undo()?;
        s.undo()?;
        Ok(())
    })?;

    step(session, out, "UNDOING: REMOVE THE LAST ADDED SHAPE", |s| {
        s.undo()?;
        Ok(())
    })?;

    step(session, out, "TEST: ADDING (ADD TWO CIRCLES)", |s| {
        for _ in 0..2 {
            let shape = s.random_shape(ShapeKind::Circle);
            s.execute(CanvasCommand::add(shape))?;
        }
        Ok(())
    })?;

    step(session, out, "UNDOING: TWICE", |s| {
        s.undo()?;
        s.undo()?;
        Ok(())
    })?;

    step(session, out, "REDOING: ONCE", |s| {
        s.redo()?;
        Ok(())
    })?;

    writeln!(out, "==== DEMO END ====")
}

fn step<W, F>(session: &mut Session, out: &mut W, title: &str, action: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce(&mut Session) -> crate::error::Result<()>,
{
    writeln!(out, "{title}")?;
    writeln!(out)?;
    if let Err(err) = action(session) {
        writeln!(out, "Error: {err}")?;
    }
    writeln!(out, "{}", session.canvas())
}
