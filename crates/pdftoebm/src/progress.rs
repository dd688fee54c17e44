use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

use crate::prelude::{println, *};

/// Per-page progress, as a bar on a terminal and as plain lines otherwise.
pub struct Progress {
    bar: Option<ProgressBar>,
    total: usize,
    quiet: bool,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        let bar = (total > 1 && std::io::stderr().is_terminal()).then(|| {
            let bar = ProgressBar::new(total as u64);
            if let Ok(style) =
                ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            {
                bar.set_style(style.progress_chars("=> "));
            }
            bar
        });

        Self {
            bar,
            total,
            quiet: false,
        }
    }

    /// A reporter that prints nothing.
    pub fn hidden(total: usize) -> Self {
        Self {
            bar: None,
            total,
            quiet: true,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_bar(bar: ProgressBar, total: usize) -> Self {
        Self {
            bar: Some(bar),
            total,
            quiet: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.bar.as_ref().map_or(true, |bar| bar.is_finished())
    }

    /// A status line outside the per-page count.
    pub fn message(&self, msg: impl Into<String>) {
        let msg = msg.into();
        match &self.bar {
            Some(bar) => bar.set_message(msg),
            None if !self.quiet => println!("{}", msg),
            None => {}
        }
    }

    /// Report that the page at 1-based `position` of the run has started.
    pub fn page(&self, position: usize) {
        match &self.bar {
            Some(bar) => {
                bar.set_position(position.saturating_sub(1) as u64);
                bar.set_message(f!("page {}", position));
            }
            None if !self.quiet => println!("Processing page {}/{}...", position, self.total),
            None => {}
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
