use std::num::NonZeroUsize;

use super::command::Command;
use crate::error::Result;

/// An invoker that routes every mutation of a context through commands and
/// keeps them around for undo and redo.
pub trait CommandHistory<C: Command> {
    /// Executes `command` and records it as the most recent undoable action.
    ///
    /// # Errors
    ///
    /// Propagates the command's failure; nothing is recorded in that case.
    fn execute_command(&mut self, command: C, ctx: &mut C::Context) -> Result<()>;

    /// Reverts the most recent command. `Ok(None)` means there was nothing to undo.
    ///
    /// # Errors
    ///
    /// Propagates the command's failure.
    fn undo(&mut self, ctx: &mut C::Context) -> Result<Option<String>>;

    /// Re-applies the most recently undone command. `Ok(None)` means there was
    /// nothing to redo.
    ///
    /// # Errors
    ///
    /// Propagates the command's failure.
    fn redo(&mut self, ctx: &mut C::Context) -> Result<Option<String>>;

    /// Forgets every recorded command without touching the context.
    fn reset(&mut self);

    fn set_history_limit(&mut self, limit: Option<NonZeroUsize>);

    /// Executes the commands in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first failure; commands before it stay executed.
    fn batch_execute(&mut self, commands: Vec<C>, ctx: &mut C::Context) -> Result<()> {
        for command in commands {
            self.execute_command(command, ctx)?;
        }
        Ok(())
    }
}
