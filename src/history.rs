use std::{collections::VecDeque, num::NonZeroUsize};

use tracing::{debug, warn};

use crate::{
    error::Result,
    traits::{command::Command, command_history::CommandHistory},
};

/// Linear undo/redo history over two command stacks.
///
/// The front of each deque is the top of the stack. Executing a new command
/// always empties the redo side, so there is never more than one branch.
pub struct History<C: Command> {
    undo: VecDeque<C>,
    redo: VecDeque<C>,
    history_limit: Option<NonZeroUsize>,
}

impl<C: Command> History<C> {
    /// A history without a size limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(None)
    }

    #[must_use]
    pub fn with_limit(history_limit: Option<NonZeroUsize>) -> Self {
        let capacity = history_limit.map_or(0, NonZeroUsize::get);
        Self {
            undo: VecDeque::with_capacity(capacity),
            redo: VecDeque::with_capacity(capacity),
            history_limit,
        }
    }

    #[must_use]
    pub fn undo_history(&self) -> Option<Vec<&C>> {
        if self.undo.is_empty() {
            None
        } else {
            Some(self.undo.iter().collect())
        }
    }

    #[must_use]
    pub fn redo_history(&self) -> Option<Vec<&C>> {
        if self.redo.is_empty() {
            None
        } else {
            Some(self.redo.iter().collect())
        }
    }

    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn redo_count(&self) -> usize {
        self.redo.len()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    fn push_undo(&mut self, command: C) {
        if let Some(limit) = self.history_limit {
            while self.undo.len() >= limit.get() {
                self.undo.pop_back();
            }
        }

        self.undo.push_front(command);
    }

    fn push_redo(&mut self, command: C) {
        if let Some(limit) = self.history_limit {
            while self.redo.len() >= limit.get() {
                self.redo.pop_back();
            }
        }

        self.redo.push_front(command);
    }
}

impl<C: Command> Default for History<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Command> CommandHistory<C> for History<C> {
    fn execute_command(&mut self, mut command: C, ctx: &mut C::Context) -> Result<()> {
        debug!(command = %command.description(), "executing");
        command.execute(ctx)?;

        self.push_undo(command);
        self.redo.clear();
        Ok(())
    }

    fn undo(&mut self, ctx: &mut C::Context) -> Result<Option<String>> {
        let Some(mut command) = self.undo.pop_front() else {
            debug!("nothing to undo");
            return Ok(None);
        };

        let description = command.description().into_owned();
        if let Err(err) = command.undo(ctx) {
            warn!(command = %description, error = %err, "undo failed, command dropped");
            return Err(err);
        }

        debug!(command = %description, "undone");
        self.push_redo(command);
        Ok(Some(description))
    }

    fn redo(&mut self, ctx: &mut C::Context) -> Result<Option<String>> {
        let Some(mut command) = self.redo.pop_front() else {
            debug!("nothing to redo");
            return Ok(None);
        };

        let description = command.description().into_owned();
        if let Err(err) = command.redo(ctx) {
            warn!(command = %description, error = %err, "redo failed, command dropped");
            return Err(err);
        }

        debug!(command = %description, "redone");
        self.push_undo(command);
        Ok(Some(description))
    }

    fn reset(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn set_history_limit(&mut self, limit: Option<NonZeroUsize>) {
        self.history_limit = limit;

        if let Some(limit) = limit {
            self.undo.truncate(limit.get());
            self.redo.truncate(limit.get());
        }
    }
}
