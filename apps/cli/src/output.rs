//! Colored terminal reporter with a page progress bar.

use std::sync::{Arc, Mutex};

use console::{Style, Term};
use indicatif::{ProgressBar, ProgressStyle};

use laradocs_core::{Level, Reporter, TaskProgress};

/// Slot holding the bar currently on screen, if any.
type ActiveBar = Arc<Mutex<Option<ProgressBar>>>;

/// Writes run messages to stderr, one colored line each.
///
/// While a progress bar is shown, lines go through [`ProgressBar::println`]
/// so they appear above the bar instead of tearing it.
pub(crate) struct ConsoleReporter {
    term: Term,
    info: Style,
    success: Style,
    warning: Style,
    error: Style,
    active: ActiveBar,
}

impl ConsoleReporter {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            info: Style::new().cyan(),
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            active: Arc::new(Mutex::new(None)),
        }
    }

    fn style(&self, level: Level) -> &Style {
        match level {
            Level::Info => &self.info,
            Level::Success => &self.success,
            Level::Warning => &self.warning,
            Level::Error => &self.error,
        }
    }

    fn active_bar(&self) -> Option<ProgressBar> {
        self.active.lock().ok().and_then(|slot| slot.clone())
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, level: Level, message: &str) {
        let line = self.style(level).apply_to(message).to_string();

        match self.active_bar() {
            Some(bar) => bar.println(line),
            None => {
                let _ = self.term.write_line(&line);
            }
        }
    }

    fn task(&self, label: &str, total: usize) -> Box<dyn TaskProgress> {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(
            "{msg} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed_precise}, eta {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
        bar.set_style(style);
        bar.set_message(label.to_string());

        if let Ok(mut slot) = self.active.lock() {
            *slot = Some(bar.clone());
        }

        Box::new(BarTask {
            bar,
            active: Arc::clone(&self.active),
        })
    }
}

struct BarTask {
    bar: ProgressBar,
    active: ActiveBar,
}

impl TaskProgress for BarTask {
    fn advance(&self) {
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish();
        if let Ok(mut slot) = self.active.lock() {
            slot.take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_is_active_until_finished() {
        let reporter = ConsoleReporter::new();
        assert!(reporter.active_bar().is_none());

        let task = reporter.task("Scraping v11.x", 2);
        let bar = reporter.active_bar().expect("bar registered");
        assert_eq!(bar.length(), Some(2));
        assert_eq!(bar.message(), "Scraping v11.x");

        task.advance();
        assert_eq!(bar.position(), 1);

        task.finish();
        assert!(reporter.active_bar().is_none());
        assert!(bar.is_finished());
    }

    #[test]
    fn every_level_has_its_own_style() {
        let reporter = ConsoleReporter::new();
        let styled = |level| {
            reporter
                .style(level)
                .clone()
                .force_styling(true)
                .apply_to("msg")
                .to_string()
        };

        assert_ne!(styled(Level::Success), styled(Level::Warning));
        assert_ne!(styled(Level::Warning), styled(Level::Error));
        assert_ne!(styled(Level::Info), styled(Level::Success));
    }
}
