//! Indented text builder for generated Rust code.

/// Indentation style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Indent {
    /// Four spaces, as rustfmt writes it.
    #[default]
    Spaces,
    /// Tab character.
    Tab,
}

impl Indent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spaces => "    ",
            Self::Tab => "\t",
        }
    }
}

/// Line-oriented builder that tracks the current indentation.
///
/// # Example
///
/// ```
/// use resolvgen_codegen::CodeBuilder;
///
/// let mut builder = CodeBuilder::default();
/// builder.block("impl Resolver {", "}", |b| {
///     b.line("pub fn query(&self) {}");
/// });
///
/// assert_eq!(builder.build(), "impl Resolver {\n    pub fn query(&self) {}\n}\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: Indent,
    buffer: String,
}

impl CodeBuilder {
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
        }
    }

    /// Add a line of code with current indentation.
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add a blank line.
    pub fn blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add `header`, the lines written by `f` one level deeper, then `close`.
    pub fn block<F>(&mut self, header: &str, close: &str, f: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        self.line(header).indent();
        f(self);
        self.dedent().line(close)
    }

    /// Add a `///` comment, one comment line per line of `text`.
    ///
    /// Empty lines become a bare `///`.
    pub fn rust_doc(&mut self, text: &str) -> &mut Self {
        for line in text.lines() {
            if line.is_empty() {
                self.line("///");
            } else {
                self.line(&format!("/// {line}"));
            }
        }
        self
    }

    /// Add preserved text, indenting only its first line.
    ///
    /// Later lines carry their own indentation from the source they were
    /// taken from.
    pub fn verbatim(&mut self, text: &str) -> &mut Self {
        let text = text.trim();
        if !text.is_empty() {
            self.line(text);
        }
        self
    }

    /// Run `f` only if `condition` holds.
    pub fn when<F>(&mut self, condition: bool, f: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        if condition {
            f(self);
        }
        self
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent.as_str());
        }
    }
}
