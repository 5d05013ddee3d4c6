#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::style)]
#![warn(clippy::correctness)]
#![warn(clippy::complexity)]
#![warn(clippy::suspicious)]
#![warn(clippy::cargo)]

pub mod canvas;
pub mod commands;
pub mod config;
pub mod demo;
pub mod error;
pub mod export;
pub mod history;
pub mod repl;
pub mod shape;
pub mod traits;

pub mod prelude {
	pub use crate::canvas::{Canvas, ExportOutcome};
	pub use crate::commands::CanvasCommand;
	pub use crate::config::Config;
	pub use crate::error::{DestinationProblem, Error, Result};
	pub use crate::history::History;
	pub use crate::repl::{Flow, Input, Session};
	pub use crate::shape::{Geometry, Shape, ShapeKind};
	pub use crate::traits::command::Command;
	pub use crate::traits::command_history::CommandHistory;
}
