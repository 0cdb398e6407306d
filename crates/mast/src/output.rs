//! Colored terminal output utilities.

use console::{Style, Term};
use mast_config::Violation;

/// Terminal output formatter.
///
/// Messages go to stderr; [`Output::data`] writes machine-readable output to
/// stdout.
pub(crate) struct Output {
    stderr: Term,
    stdout: Term,
    ok: Style,
    warn: Style,
    fail: Style,
    heading: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            stderr: Term::stderr(),
            stdout: Term::stdout(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red(),
            heading: Style::new().cyan().bold(),
        }
    }

    fn line(&self, msg: &str) {
        let _ = self.stderr.write_line(msg);
    }

    pub(crate) fn info(&self, msg: &str) {
        self.line(msg);
    }

    /// Green status line.
    pub(crate) fn success(&self, msg: &str) {
        self.line(&self.ok.apply_to(msg).to_string());
    }

    /// Red status line.
    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.fail.apply_to(msg).to_string());
    }

    /// Section title in the site outline.
    pub(crate) fn heading(&self, msg: &str) {
        self.line(&self.heading.apply_to(msg).to_string());
    }

    /// One indented line per problem, field path in yellow.
    pub(crate) fn problems(&self, problems: &[Violation]) {
        for problem in problems {
            self.line(&format_problem(problem, &self.warn));
        }
    }

    /// Write uncolored data to stdout.
    pub(crate) fn data(&self, text: &str) {
        let _ = self.stdout.write_line(text);
    }
}

fn format_problem(problem: &Violation, path_style: &Style) -> String {
    format!(
        "  {}: {}",
        path_style.apply_to(&problem.field_path),
        problem.reason
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_format_problem_plain() {
        let problem = Violation::new("theme.nav[0].link", "does not resolve to a content page");
        let style = Style::new().yellow().force_styling(false);
        assert_eq!(
            format_problem(&problem, &style),
            "  theme.nav[0].link: does not resolve to a content page"
        );
    }
}
