use std::borrow::Cow;

use crate::error::Result;

/// A reversible action against some context.
///
/// A command may buffer whatever it needs to revert itself while it is in the
/// "done" state, which is why both `execute` and `undo` take `&mut self`.
/// Implementations must guarantee that `undo` after a successful `execute`
/// restores the exact prior state of the context, and that `execute` after a
/// successful `undo` restores the exact state the first `execute` produced.
///
/// # Associated Types
///
/// * `Context`: The type of the context in which the command operates.
///
/// # Required Methods
///
/// * `execute(&mut self, ctx: &mut Self::Context)`: Executes the command with the given context.
/// * `undo(&mut self, ctx: &mut Self::Context)`: Undoes the command with the given context.
///
/// # Provided Methods
///
/// * `redo(&mut self, ctx: &mut Self::Context)`: Redoes the command by calling `execute`.
/// * `description(&self) -> Cow<str>`: Returns a description of the command.
///
/// # Example
///
/// ```
/// use command_canvas::prelude::Command;
/// use command_canvas::error::Result;
///
/// struct Increment;
///
/// impl Command for Increment {
///     type Context = i32;
///
///     fn execute(&mut self, ctx: &mut i32) -> Result<()> {
///         *ctx += 1;
///         Ok(())
///     }
///
///     fn undo(&mut self, ctx: &mut i32) -> Result<()> {
///         *ctx -= 1;
///         Ok(())
///     }
/// }
///
/// let mut value = 0;
/// let mut cmd = Increment;
/// cmd.execute(&mut value).unwrap();
/// cmd.undo(&mut value).unwrap();
/// assert_eq!(value, 0);
/// assert_eq!(cmd.description(), "Unknown command");
/// ```
pub trait Command {
    type Context;

    /// Executes the command with the given context.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot support the action. The context
    /// must be left untouched in that case.
    fn execute(&mut self, ctx: &mut Self::Context) -> Result<()>;

    /// Undoes the command with the given context.
    ///
    /// # Errors
    ///
    /// Returns an error if the command was never executed or the context no
    /// longer matches what `execute` left behind.
    fn undo(&mut self, ctx: &mut Self::Context) -> Result<()>;

    /// Redoes the command by calling `execute`. This method can be overridden if needed.
    ///
    /// # Errors
    ///
    /// Same as [`Command::execute`].
    fn redo(&mut self, ctx: &mut Self::Context) -> Result<()> {
        self.execute(ctx)
    }

    /// Returns a description of the command. The default implementation returns "Unknown command".
    fn description(&self) -> Cow<'_, str> {
        Cow::Borrowed("Unknown command")
    }
}
