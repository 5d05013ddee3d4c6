//! The interactive command loop.
//!
//! A [`Session`] owns the canvas and its history and turns single-letter
//! input lines into history operations. Every library error is reported to
//! the user and the loop carries on.

use std::{
    fmt,
    io::{self, BufRead, Write},
    str::FromStr,
};

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, warn};

use crate::{
    canvas::{Canvas, ExportOutcome},
    commands::CanvasCommand,
    config::Config,
    error::{DestinationProblem, Error},
    export,
    history::History,
    shape::{Shape, ShapeKind},
    traits::command_history::CommandHistory,
};

pub const HELP: &str = "\
*********************************************************
\tCommands:

\tH \t\t Help - displays this message
\tA <shape>\t Add <shape> to canvas
\tD \t\t Delete the top shape
\tU \t\t Undo last operation
\tR \t\t Redo last operation
\tP \t\t Print canvas
\tC \t\t Clear canvas
\tG <filename> \t Generate output file
\tQ \t\t Quit application

\tShapes => [C = Circle, S = Square, R = Rectangle]
*********************************************************";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Help,
    Add(ShapeKind),
    Delete,
    Undo,
    Redo,
    Print,
    Clear,
    Generate(String),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseInputError(String);

impl fmt::Display for ParseInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (type H for help)", self.0)
    }
}

impl std::error::Error for ParseInputError {}

impl FromStr for Input {
    type Err = ParseInputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        let Some(letter) = word.chars().next().map(|c| c.to_ascii_lowercase()) else {
            return Err(ParseInputError("empty input".into()));
        };

        match letter {
            'h' => Ok(Input::Help),
            'a' => {
                if rest.is_empty() {
                    return Err(ParseInputError("add needs a shape: A <C|S|R>".into()));
                }
                rest.parse().map(Input::Add).map_err(ParseInputError)
            }
            'd' => Ok(Input::Delete),
            'u' => Ok(Input::Undo),
            'r' => Ok(Input::Redo),
            'p' => Ok(Input::Print),
            'c' => Ok(Input::Clear),
            'g' => {
                if rest.is_empty() {
                    return Err(ParseInputError("generate needs a file name: G <filename>".into()));
                }
                Ok(Input::Generate(rest.to_owned()))
            }
            'q' => Ok(Input::Quit),
            _ => Err(ParseInputError(format!("unknown command `{word}`"))),
        }
    }
}

/// Whether the loop should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    canvas: Canvas,
    history: History<CanvasCommand>,
    config: Config,
    rng: StdRng,
}

impl Session {
    #[must_use]
    pub fn new(config: Config, rng: StdRng) -> Self {
        Self {
            canvas: Canvas::with_size(config.canvas_width, config.canvas_height),
            history: History::with_limit(config.history_limit),
            config,
            rng,
        }
    }

    #[must_use]
    pub fn from_seed(config: Config, seed: u64) -> Self {
        Self::new(config, StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    #[must_use]
    pub fn history(&self) -> &History<CanvasCommand> {
        &self.history
    }

    /// Routes `command` through the history.
    ///
    /// # Errors
    ///
    /// Propagates the command's failure.
    pub fn execute(&mut self, command: CanvasCommand) -> crate::error::Result<()> {
        self.history.execute_command(command, &mut self.canvas)
    }

    /// # Errors
    ///
    /// Propagates the command's failure.
    pub fn undo(&mut self) -> crate::error::Result<Option<String>> {
        self.history.undo(&mut self.canvas)
    }

    /// # Errors
    ///
    /// Propagates the command's failure.
    pub fn redo(&mut self) -> crate::error::Result<Option<String>> {
        self.history.redo(&mut self.canvas)
    }

    /// Starts over: forgets the history, keeps whatever is on the canvas.
    pub fn reset(&mut self) {
        self.history.reset();
    }

    pub fn random_shape(&mut self, kind: ShapeKind) -> Shape {
        Shape::random(kind, &mut self.rng, self.config.max_dimension)
    }

    /// Performs one user action and writes the user-facing result to `out`.
    ///
    /// Only failures to write to `out` are returned; everything else is
    /// reported and the session continues.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn handle<W: Write>(&mut self, input: Input, out: &mut W) -> io::Result<Flow> {
        debug!(?input, "handling input");
        match input {
            Input::Help => writeln!(out, "{HELP}")?,
            Input::Add(kind) => {
                let shape = self.random_shape(kind);
                let command = CanvasCommand::add(shape);
                writeln!(out, "Command received: {}", command.label())?;
                let result = self.execute(command);
                let canvas = &self.canvas;
                report(result, out, |out, ()| match canvas.top() {
                    Some(shape) => writeln!(out, "Added shape to canvas: {shape}"),
                    None => Ok(()),
                })?;
            }
            Input::Delete => {
                let command = CanvasCommand::delete();
                writeln!(out, "Command received: {}", command.label())?;
                let result = self.execute(command);
                report(result, out, |out, ()| writeln!(out, "Removed top shape."))?;
            }
            Input::Clear => {
                let command = CanvasCommand::clear_all();
                writeln!(out, "Command received: {}", command.label())?;
                let result = self.execute(command);
                report(result, out, |out, ()| writeln!(out, "Canvas cleared!"))?;
            }
            Input::Undo => {
                let result = self.undo();
                report(result, out, |out, done| match done {
                    Some(what) => writeln!(out, "Undid: {what}"),
                    None => writeln!(out, "Nothing to undo."),
                })?;
            }
            Input::Redo => {
                let result = self.redo();
                report(result, out, |out, done| match done {
                    Some(what) => writeln!(out, "Redid: {what}"),
                    None => writeln!(out, "Nothing to redo."),
                })?;
            }
            Input::Print => writeln!(out, "{}", self.canvas)?,
            Input::Generate(name) => self.generate(&name, out)?,
            Input::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn generate<W: Write>(&mut self, name: &str, out: &mut W) -> io::Result<()> {
        let result = export::export_to_file(
            &mut self.canvas,
            &self.config.output_dir,
            name,
            self.config.extension(),
        );

        match result {
            Ok((path, ExportOutcome::Written { shapes })) => writeln!(
                out,
                "FILE CREATED: {} ({shapes} shapes, canvas is now empty)",
                path.display()
            ),
            Ok((_, ExportOutcome::NothingToExport)) => {
                writeln!(out, "Nothing to export, the canvas is empty.")
            }
            Err(Error::InvalidDestination { path, problem }) => match problem {
                DestinationProblem::AlreadyExists => {
                    writeln!(out, "FILE ALREADY EXISTS IN PATH: {}", path.display())
                }
                DestinationProblem::WrongExtension { expected } => {
                    writeln!(out, "EXTENSION IS EITHER NOT INCLUDED OR NOT {expected}")
                }
                DestinationProblem::MissingFileName => writeln!(out, "No file name given."),
                DestinationProblem::NotAFileName => writeln!(
                    out,
                    "`{}` is not a plain file name, exports always go into {}",
                    path.display(),
                    self.config.output_dir.display()
                ),
            },
            Err(err) => {
                warn!(error = %err, "export failed");
                writeln!(out, "Error: {err}")
            }
        }
    }

    /// Reads lines from `input` until `Q` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        writeln!(out, "{HELP}")?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Input>() {
                Ok(input) => {
                    if self.handle(input, out)? == Flow::Quit {
                        break;
                    }
                }
                Err(err) => writeln!(out, "{err}")?,
            }
        }

        writeln!(out)?;
        writeln!(
            out,
            "Don't forget to check out any output files you may have created in '{}'",
            self.config.output_dir.display()
        )?;
        writeln!(out, "GoodBye!")
    }
}

fn report<T, W, F>(result: crate::error::Result<T>, out: &mut W, on_ok: F) -> io::Result<()>
where
    W: Write,
    F: FnOnce(&mut W, T) -> io::Result<()>,
{
    match result {
        Ok(value) => on_ok(out, value),
        Err(err) => {
            if err.is_user_error() {
                debug!(error = %err, "user action rejected");
            } else {
                warn!(error = %err, "action failed");
            }
            writeln!(out, "Error: {err}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn session() -> Session {
        Session::from_seed(Config::default(), 1)
    }

    fn run_lines(session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        session.run(Cursor::new(script.to_owned()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_inputs() {
        assert_eq!("h".parse::<Input>(), Ok(Input::Help));
        assert_eq!("A c".parse::<Input>(), Ok(Input::Add(ShapeKind::Circle)));
        assert_eq!("add Rectangle".parse::<Input>(), Ok(Input::Add(ShapeKind::Rectangle)));
        assert_eq!("a  s ".parse::<Input>(), Ok(Input::Add(ShapeKind::Square)));
        assert_eq!("D".parse::<Input>(), Ok(Input::Delete));
        assert_eq!("u".parse::<Input>(), Ok(Input::Undo));
        assert_eq!("redo".parse::<Input>(), Ok(Input::Redo));
        assert_eq!("P".parse::<Input>(), Ok(Input::Print));
        assert_eq!("c".parse::<Input>(), Ok(Input::Clear));
        assert_eq!(
            "g My Drawing".parse::<Input>(),
            Ok(Input::Generate("My Drawing".into()))
        );
        assert_eq!("quit".parse::<Input>(), Ok(Input::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<Input>().is_err());
        assert!("a".parse::<Input>().is_err());
        assert!("a triangle".parse::<Input>().is_err());
        assert!("g".parse::<Input>().is_err());
        assert!("x".parse::<Input>().is_err());
    }

    #[test]
    fn test_add_undo_redo() {
        let mut session = session();
        let mut out = Vec::new();

        session.handle(Input::Add(ShapeKind::Circle), &mut out).unwrap();
        session.handle(Input::Add(ShapeKind::Square), &mut out).unwrap();
        assert_eq!(session.canvas().len(), 2);
        assert_eq!(session.canvas().top().unwrap().kind(), ShapeKind::Square);

        session.handle(Input::Undo, &mut out).unwrap();
        assert_eq!(session.canvas().len(), 1);

        session.handle(Input::Redo, &mut out).unwrap();
        assert_eq!(session.canvas().len(), 2);
        assert_eq!(session.canvas().top().unwrap().kind(), ShapeKind::Square);
    }

    #[test]
    fn test_delete_on_empty_canvas_is_reported() {
        let mut session = session();
        let mut out = Vec::new();

        let flow = session.handle(Input::Delete, &mut out).unwrap();

        assert_eq!(flow, Flow::Continue);
        assert!(!session.history().can_undo());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Error: the canvas is empty"));
    }

    #[test]
    fn test_undo_with_nothing_to_undo() {
        let mut session = session();
        let mut out = Vec::new();

        session.handle(Input::Undo, &mut out).unwrap();
        session.handle(Input::Redo, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Nothing to undo."));
        assert!(text.contains("Nothing to redo."));
    }

    #[test]
    fn test_clear_and_undo() {
        let mut session = session();
        let mut out = Vec::new();

        for kind in [ShapeKind::Circle, ShapeKind::Rectangle, ShapeKind::Square] {
            session.handle(Input::Add(kind), &mut out).unwrap();
        }
        let before: Vec<_> = session.canvas().iter().cloned().collect();

        session.handle(Input::Clear, &mut out).unwrap();
        assert!(session.canvas().is_empty());

        session.handle(Input::Undo, &mut out).unwrap();
        let after: Vec<_> = session.canvas().iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_reset_keeps_canvas() {
        let mut session = session();
        let mut out = Vec::new();

        session.handle(Input::Add(ShapeKind::Circle), &mut out).unwrap();
        session.reset();

        assert_eq!(session.canvas().len(), 1);
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_run_stops_at_quit_and_survives_bad_lines() {
        let mut session = session();

        let text = run_lines(&mut session, "a c\nbogus\n\nd\nd\nq\na c\n");

        assert!(text.contains("unknown command `bogus`"));
        assert!(text.contains("Error: the canvas is empty"));
        assert!(text.trim_end().ends_with("GoodBye!"));
        // The add after `q` is never read.
        assert!(session.canvas().is_empty());
        assert_eq!(session.history().undo_count(), 2);
    }

    #[test]
    fn test_run_until_end_of_input() {
        let mut session = session();

        let text = run_lines(&mut session, "a r\np\n");

        assert!(text.contains("Canvas (1 elements):"));
        assert!(text.contains("> Rectangle [Width: "));
        assert_eq!(session.canvas().len(), 1);
    }

    #[test]
    fn test_generate_reports_invalid_extension() {
        let mut session = session();
        let mut out = Vec::new();

        session.handle(Input::Add(ShapeKind::Circle), &mut out).unwrap();
        session
            .handle(Input::Generate("picture.png".into()), &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("EXTENSION IS EITHER NOT INCLUDED OR NOT xml"));
        assert_eq!(session.canvas().len(), 1);
    }

    #[test]
    fn test_generate_empty_canvas() {
        let mut session = session();
        let mut out = Vec::new();

        session
            .handle(Input::Generate("picture".into()), &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Nothing to export"));
    }
}
