/// Line-oriented builder for the generated source. Tracks the indent
/// level so nested blocks stay aligned without callers formatting
/// whitespace themselves.
#[derive(Debug, Default)]
pub struct CodeWriter {
    lines: Vec<String>,
    indent: usize,
}

const INDENT: &str = "    ";

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", INDENT.repeat(self.indent), text));
        }
    }

    pub fn push_all<I>(&mut self, lines: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for line in lines {
            self.push(line);
        }
    }

    pub fn blank(&mut self) {
        if !matches!(self.lines.last(), Some(last) if last.is_empty()) {
            self.lines.push(String::new());
        }
    }

    pub fn open(&mut self, text: impl AsRef<str>) {
        self.push(text);
        self.indent += 1;
    }

    pub fn close(&mut self, text: impl AsRef<str>) {
        self.indent = self.indent.saturating_sub(1);
        self.push(text);
    }

    /// Dedent for one line and indent again, for `} else {` style joints.
    pub fn close_open(&mut self, text: impl AsRef<str>) {
        self.indent = self.indent.saturating_sub(1);
        self.push(text);
        self.indent += 1;
    }

    pub fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}
