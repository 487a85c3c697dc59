use std::fmt;

/// A range of bytes in the expression source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A label pointing at a span of the expression text.
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }
}

/// Computes 1-based line and column from a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Renders diagnostics against a path expression in Rust-like style.
pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    source_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, source_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            source_name,
            use_color,
        }
    }

    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();

        let severity_str = match diagnostic.severity {
            Severity::Error => self.style_red_bold("error"),
            Severity::Warning => self.style_yellow_bold("warning"),
        };
        output.push_str(&format!(
            "{}: {}\n",
            severity_str,
            self.style_bold(&diagnostic.message)
        ));

        for label in &diagnostic.labels {
            let (line, col) = line_col(self.source, label.span.start);
            output.push_str(&format!(
                "  {} {}:{}:{}\n",
                self.style_blue("-->"),
                self.source_name,
                line,
                col
            ));

            let line_text = self.source.lines().nth(line - 1).unwrap_or("");
            output.push_str(&format!("   {}\n", self.style_blue("|")));
            output.push_str(&format!("   {} {}\n", self.style_blue("|"), line_text));

            let width = label.span.end.saturating_sub(label.span.start).max(1);
            let underline = format!("{}{}", " ".repeat(col.saturating_sub(1)), "^".repeat(width));
            if label.message.is_empty() {
                output.push_str(&format!(
                    "   {} {}\n",
                    self.style_blue("|"),
                    self.style_red(&underline)
                ));
            } else {
                output.push_str(&format!(
                    "   {} {} {}\n",
                    self.style_blue("|"),
                    self.style_red(&underline),
                    self.style_red(&label.message)
                ));
            }
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("  {} {}\n", self.style_blue("="), note));
        }

        output
    }

    fn style_red(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[31m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_red_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1;31m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_yellow_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1;33m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_blue(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[34m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }

    fn style_bold(&self, s: &str) -> String {
        if self.use_color {
            format!("\x1b[1m{}\x1b[0m", s)
        } else {
            s.to_string()
        }
    }
}

pub fn render_diagnostics(
    source: &str,
    source_name: &str,
    diagnostics: &[Diagnostic],
    use_color: bool,
) -> String {
    let renderer = DiagnosticRenderer::new(source, source_name, use_color);
    let mut output = String::new();
    for diagnostic in diagnostics {
        output.push_str(&renderer.render(diagnostic));
    }
    output
}
