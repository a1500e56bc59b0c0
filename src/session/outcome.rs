use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

use super::SessionError;

/// Counts for one written session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Session identifier
    pub session_id: i64,
    /// Rows in the units table
    pub units: usize,
    /// Spikes across all units
    pub spikes: usize,
    /// Rows in the stimulus table
    pub stimuli: usize,
    /// Rows in the running table
    pub running_rows: usize,
    /// Rows in the eye-tracking table, if one was written
    pub eyetracking_rows: Option<usize>,
    /// Units whose waveform time axis was replaced by the first unit's
    pub repaired_units: usize,
    /// Null sentinels replaced in the stimulus table
    pub nulls_replaced: usize,
    /// Whether the cached raw bundle was removed
    pub cache_cleared: bool,
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "session {}: {} units, {} spikes, {} stimuli, {} running samples",
            self.session_id, self.units, self.spikes, self.stimuli, self.running_rows
        )?;
        if let Some(rows) = self.eyetracking_rows {
            write!(f, ", {} eye-tracking samples", rows)?;
        }
        Ok(())
    }
}

/// What happened to one requested session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Tables were written
    Written(SessionStats),
    /// Output already existed and overwrite was off
    Skipped(i64),
}

/// Result of processing a list of sessions
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Sessions that were written
    pub written: Vec<SessionStats>,
    /// Sessions skipped because their output existed
    pub skipped: Vec<i64>,
    /// Sessions that failed, with the reason
    pub failed: Vec<(i64, SessionError)>,
}

impl BatchReport {
    /// Record one session's result
    pub fn record(&mut self, session_id: i64, result: Result<SessionOutcome, SessionError>) {
        match result {
            Ok(SessionOutcome::Written(stats)) => self.written.push(stats),
            Ok(SessionOutcome::Skipped(id)) => self.skipped.push(id),
            Err(e) => self.failed.push((session_id, e)),
        }
    }

    /// Number of sessions attempted
    pub fn total(&self) -> usize {
        self.written.len() + self.skipped.len() + self.failed.len()
    }

    /// True when no session failed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Per-session listing with colors (plain text without the console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
            static SKIP: Emoji<'_, '_> = Emoji("→", "[SKIP]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

            let mut output = String::new();
            for stats in &self.written {
                output.push_str(&format!("[{}] {}\n", OK, style(stats).green()));
            }
            for id in &self.skipped {
                output.push_str(&format!(
                    "[{}] {}\n",
                    SKIP,
                    style(format!("session {}: output exists", id)).yellow()
                ));
            }
            for (id, err) in &self.failed {
                output.push_str(&format!(
                    "[{}] {} - {}: {}\n",
                    FAIL,
                    style(format!("session {}", id)).red(),
                    style(format!("{:?}", err.kind())).red().bold(),
                    err
                ));
            }
            output.push('\n');
            output.push_str(&format!("{}: {}\n", style("Summary").bold(), self));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            let mut output = String::new();
            for stats in &self.written {
                output.push_str(&format!("[OK] {}\n", stats));
            }
            for id in &self.skipped {
                output.push_str(&format!("[SKIP] session {}: output exists\n", id));
            }
            for (id, err) in &self.failed {
                output.push_str(&format!("[FAIL] session {} - {:?}: {}\n", id, err.kind(), err));
            }
            output.push_str(&format!("\nSummary: {}\n", self));
            output
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sessions: {} written, {} skipped, {} failed",
            self.total(),
            self.written.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}
