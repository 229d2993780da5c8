//! Styled end-of-run output
//!
//! Logging goes to stderr through `tracing`; this is the short summary printed
//! to stdout once a run finishes.

use console::style;

use crate::sync::{ModuleKind, SyncReport};

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
}

impl Output {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✔").green(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn list_item(&self, item: &str) {
        println!("  • {}", item);
    }

    /// Print a dimmed detail line (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            println!("    {}", style(message).dim());
        }
    }

    /// Summarize a finished sync
    pub fn report(&self, report: &SyncReport, destination: &str) {
        let count = report.synced.len();
        let noun = if count == 1 { "module" } else { "modules" };
        self.success(&format!(
            "Synced {} {} into {}",
            style(count).bold(),
            noun,
            style(destination).underlined()
        ));
        if let Some(revision) = &report.revision {
            self.list_item(&format!("upstream at {}", style(short_revision(revision)).dim()));
        }

        for module in &report.synced {
            let kind = match module.kind {
                ModuleKind::Package => "package",
                ModuleKind::File => "file",
            };
            self.list_item(&format!("{} {}", module.module, style(format!("({kind})")).dim()));
            self.verbose(&module.dest.display().to_string());
        }

        for warning in &report.skipped {
            self.warning(&warning.to_string());
        }
    }
}

fn short_revision(revision: &str) -> &str {
    revision.get(..12).unwrap_or(revision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_revision() {
        assert_eq!(
            short_revision("0123456789abcdef0123456789abcdef01234567"),
            "0123456789ab"
        );
        assert_eq!(short_revision("abc"), "abc");
    }
}
