//! Writing a canvas to a file in the output directory.

use std::{
    fs::{self, OpenOptions},
    io::{BufWriter, ErrorKind, Write},
    path::{Component, Path, PathBuf},
};

use tracing::{info, warn};

use crate::{
    canvas::{Canvas, ExportOutcome},
    error::{DestinationProblem, Error, Result},
};

/// Resolves `name` inside `dir`, appending `.{extension}` when `name` has no
/// extension of its own.
///
/// `name` must be a plain file name: absolute paths, separators and `..` are
/// refused so the result always lands directly in `dir`.
///
/// # Errors
///
/// Returns [`Error::InvalidDestination`] for an empty name, a name that is
/// not a single file name, or an extension other than `extension` (compared
/// case-insensitively).
pub fn destination(dir: &Path, name: &str, extension: &str) -> Result<PathBuf> {
    let extension = extension.trim_start_matches('.');
    let name = name.trim();

    // `.xml` on its own is an extension with no file name in front of it.
    let bare_extension = name
        .strip_prefix('.')
        .is_some_and(|rest| rest.eq_ignore_ascii_case(extension));
    if name.is_empty() || bare_extension {
        return Err(Error::InvalidDestination {
            path: dir.join(name),
            problem: DestinationProblem::MissingFileName,
        });
    }

    let mut components = Path::new(name).components();
    let file_name = match (components.next(), components.next()) {
        (Some(Component::Normal(file_name)), None) => file_name,
        _ => {
            return Err(Error::InvalidDestination {
                path: PathBuf::from(name),
                problem: DestinationProblem::NotAFileName,
            })
        }
    };

    let path = dir.join(file_name);

    match path.extension().and_then(|ext| ext.to_str()) {
        None => Ok(path.with_extension(extension)),
        Some(ext) if ext.eq_ignore_ascii_case(extension) => Ok(path),
        Some(_) => Err(Error::InvalidDestination {
            path,
            problem: DestinationProblem::WrongExtension {
                expected: extension.to_owned(),
            },
        }),
    }
}

/// Exports `canvas` into a new file `name` under `dir`, draining the canvas.
///
/// The destination is validated first, then an empty canvas is reported as
/// [`ExportOutcome::NothingToExport`] without creating anything. Existing
/// files are never overwritten. Returns the path written along with the
/// outcome.
///
/// # Errors
///
/// Returns [`Error::InvalidDestination`] for a bad name or an existing file,
/// and [`Error::Io`] if the directory or file cannot be written.
pub fn export_to_file(
    canvas: &mut Canvas,
    dir: &Path,
    name: &str,
    extension: &str,
) -> Result<(PathBuf, ExportOutcome)> {
    let path = destination(dir, name, extension)?;

    if canvas.is_empty() {
        return Ok((path, ExportOutcome::NothingToExport));
    }

    fs::create_dir_all(dir)?;

    let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            warn!(path = %path.display(), "refusing to overwrite export");
            return Err(Error::InvalidDestination {
                path,
                problem: DestinationProblem::AlreadyExists,
            });
        }
        Err(err) => return Err(err.into()),
    };

    let outcome = write_or_discard(canvas, &path, BufWriter::new(file))?;
    info!(path = %path.display(), ?outcome, "export file created");
    Ok((path, outcome))
}

/// Exports into `out`, a writer over the freshly created `path`. On failure
/// the partial file is removed so the same name can be used again.
fn write_or_discard<W: Write>(canvas: &mut Canvas, path: &Path, out: W) -> Result<ExportOutcome> {
    // `export` consumes the writer, so the file is closed before any removal.
    let err = match canvas.export(out) {
        Ok(outcome) => return Ok(outcome),
        Err(err) => err,
    };

    warn!(path = %path.display(), error = %err, "export failed, removing partial file");
    if let Err(remove_err) = fs::remove_file(path) {
        if remove_err.kind() != ErrorKind::NotFound {
            warn!(path = %path.display(), error = %remove_err, "could not remove partial file");
        }
    }
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;
    use std::io;
    use tempfile::tempdir;

    /// Accepts a fixed number of bytes, then fails.
    struct ShortWriter<W> {
        inner: W,
        remaining: usize,
    }

    impl<W: Write> Write for ShortWriter<W> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.remaining < buf.len() {
                return Err(io::Error::other("file too large"));
            }
            self.remaining -= buf.len();
            self.inner.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }

    fn assert_problem(result: Result<PathBuf>, expected: &DestinationProblem) {
        match result {
            Err(Error::InvalidDestination { problem, .. }) => assert_eq!(&problem, expected),
            other => panic!("expected {expected:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_destination_rejects_paths() {
        let dir = Path::new("out");
        for name in ["/abs/x.xml", "../x.xml", "sub/x.xml", "./x.xml", ".."] {
            assert_problem(
                destination(dir, name, "xml"),
                &DestinationProblem::NotAFileName,
            );
        }
    }

    #[test]
    fn test_destination_bare_extension() {
        for name in [".xml", ".XML"] {
            assert_problem(
                destination(Path::new("out"), name, "xml"),
                &DestinationProblem::MissingFileName,
            );
        }
    }

    #[test]
    fn test_failed_write_removes_partial_file() {
        let dir = tempdir().unwrap();
        let mut canvas = Canvas::new();
        for i in 0..50 {
            canvas.add(Shape::rectangle(i, i, i, i));
        }
        let path = dir.path().join("big.xml");
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .unwrap();

        let result = write_or_discard(
            &mut canvas,
            &path,
            ShortWriter {
                inner: file,
                remaining: 200,
            },
        );

        assert!(matches!(result, Err(Error::Io(_))));
        assert!(!path.exists());
        assert_eq!(canvas.len(), 50);

        // The same name is free for a retry.
        let (written, outcome) = export_to_file(&mut canvas, dir.path(), "big", "xml").unwrap();
        assert_eq!(written, path);
        assert_eq!(outcome, ExportOutcome::Written { shapes: 50 });
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_destination_appends_extension() {
        let path = destination(Path::new("out"), "drawing", "xml").unwrap();
        assert_eq!(path, Path::new("out").join("drawing.xml"));
    }

    #[test]
    fn test_destination_extension_case_insensitive() {
        let path = destination(Path::new("out"), "drawing.XML", ".xml").unwrap();
        assert_eq!(path, Path::new("out").join("drawing.XML"));
    }

    #[test]
    fn test_destination_wrong_extension() {
        let err = destination(Path::new("out"), "drawing.png", "xml").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidDestination {
                problem: DestinationProblem::WrongExtension { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_destination_missing_name() {
        let err = destination(Path::new("out"), "  ", "xml").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidDestination {
                problem: DestinationProblem::MissingFileName,
                ..
            }
        ));
    }
}
