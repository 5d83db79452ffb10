//! Commit history view for the command line

use std::io::{self, Write};
use std::path::Path;

use crate::git::GitExecutor;
use crate::git::constants::{commands, flags};
use crate::workflow::HistoryView;

/// Prints the most recent commits after history changes
pub struct LogPrinter<W: Write> {
    executor: GitExecutor,
    count: usize,
    out: W,
}

impl<W: Write> LogPrinter<W> {
    pub fn new(executor: GitExecutor, count: usize, out: W) -> Self {
        Self {
            executor,
            count,
            out,
        }
    }

    /// Consume the printer, returning the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> HistoryView for LogPrinter<W> {
    fn refresh(&mut self, root: &Path) -> io::Result<()> {
        let count = format!("-n{}", self.count);
        let log = self
            .executor
            .run(
                root,
                &[commands::LOG, flags::ONELINE, flags::NO_COLOR, &count],
            )
            .and_then(|output| output.into_result())
            .map_err(|e| io::Error::other(e.to_string()))?;
        self.out.write_all(log.as_bytes())?;
        self.out.flush()
    }
}
