//! Console output: one status line per suite, failure details, and a
//! summary block.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::test::{RunResult, Status, SuiteResult, Tally};

pub struct Printer<W: WriteColor> {
    out: W,
}

impl Printer<StandardStream> {
    /// Stdout printer; `colored: None` colours only when stdout is a tty.
    pub fn stdout(colored: Option<bool>) -> Self {
        let use_color = colored.unwrap_or_else(|| atty::is(atty::Stream::Stdout));
        let choice = if use_color {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        Self::new(StandardStream::stdout(choice))
    }
}

impl<W: WriteColor> Printer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn colored(&mut self, text: &str, color: Color, bold: bool) -> io::Result<()> {
        self.out
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold))?;
        write!(self.out, "{text}")?;
        self.out.reset()
    }

    fn badge(&mut self, status: Status) -> io::Result<()> {
        match status {
            Status::Passed => self.colored(" PASS ", Color::Green, true),
            Status::Failed => self.colored(" FAIL ", Color::Red, true),
            Status::Skipped => self.colored(" SKIP ", Color::Yellow, true),
            Status::NotRun => self.colored(" STOP ", Color::Yellow, false),
        }
    }

    fn print_suite(&mut self, suite: &SuiteResult) -> io::Result<()> {
        self.badge(suite.status)?;
        write!(self.out, " {}\t", suite.name)?;
        self.colored(&suite.display_path, Color::White, false)?;
        writeln!(self.out)?;

        if let Some(error) = &suite.error {
            self.colored("\t- ", Color::Red, false)?;
            writeln!(self.out, "{error}")?;
        }
        for job in suite.jobs.iter().filter(|j| j.status.is_failed()) {
            self.colored(&format!("\t- {}", job.name), Color::Red, true)?;
            writeln!(self.out)?;
            writeln!(self.out)?;
            for assertion in job.failed_assertions() {
                writeln!(self.out, "\t\t- asserts[{}] `{}` fail", assertion.index, assertion.label())?;
                for line in &assertion.diagnostics {
                    self.diagnostic_line(line)?;
                }
                writeln!(self.out)?;
            }
        }
        Ok(())
    }

    /// Diff lines are coloured; everything else is indented verbatim.
    fn diagnostic_line(&mut self, line: &str) -> io::Result<()> {
        write!(self.out, "\t\t\t")?;
        if let Some(rest) = line.strip_prefix("\t- ") {
            self.colored(&format!("\t- {rest}"), Color::Red, false)?;
        } else if let Some(rest) = line.strip_prefix("\t+ ") {
            self.colored(&format!("\t+ {rest}"), Color::Green, false)?;
        } else {
            write!(self.out, "{line}")?;
        }
        writeln!(self.out)
    }

    fn summary_line(&mut self, label: &str, tally: Tally) -> io::Result<()> {
        write!(self.out, "{label:<10}")?;
        if tally.failed > 0 {
            self.colored(&format!("{} failed", tally.failed), Color::Red, true)?;
            write!(self.out, ", ")?;
        }
        if tally.skipped + tally.not_run > 0 {
            self.colored(
                &format!("{} skipped", tally.skipped + tally.not_run),
                Color::Yellow,
                false,
            )?;
            write!(self.out, ", ")?;
        }
        self.colored(&format!("{} passed", tally.passed), Color::Green, false)?;
        writeln!(self.out, ", {} total", tally.total())
    }

    pub fn print(&mut self, result: &RunResult) -> io::Result<()> {
        for chart in &result.charts {
            writeln!(self.out)?;
            self.colored("### Chart ", Color::Cyan, true)?;
            writeln!(self.out, "[ {} ] {}", chart.name, chart.path.display())?;
            writeln!(self.out)?;
            for error in &chart.errors {
                self.colored(" ERROR ", Color::Red, true)?;
                writeln!(self.out, " {error}")?;
            }
            for suite in &chart.suites {
                self.print_suite(suite)?;
            }
        }

        writeln!(self.out)?;
        self.summary_line("Charts:", result.chart_tally())?;
        self.summary_line("Suites:", result.suite_tally())?;
        self.summary_line("Tests:", result.job_tally())?;

        let snapshot = result.snapshot();
        write!(self.out, "{:<10}", "Snapshot:")?;
        if snapshot.failed > 0 {
            self.colored(&format!("{} failed", snapshot.failed), Color::Red, true)?;
            write!(self.out, ", ")?;
        }
        writeln!(
            self.out,
            "{} created, {} updated, {} passed, {} obsolete",
            snapshot.created, snapshot.updated, snapshot.matched, snapshot.obsolete
        )?;
        writeln!(self.out, "{:<10}{:.3}s", "Time:", result.duration.as_secs_f64())?;
        writeln!(self.out)?;
        self.out.flush()
    }
}
