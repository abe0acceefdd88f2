//! Styled messages on stderr.

use console::{Style, Term};

pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.styled(&self.green, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.styled(&self.yellow, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.styled(&self.red, msg);
    }

    fn styled(&self, style: &Style, msg: &str) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }
}
