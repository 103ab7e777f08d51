//! Helpers for emitting JavaScript source.

/// Collects statements for a function body.
///
/// Lines are stored as given and normalized when the function is built:
/// each one is trimmed and indented one level, blank lines stay empty.
#[derive(Debug, Default)]
pub struct JsBuilder {
    lines: Vec<String>,
}

impl JsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append a multi-line chunk of source, one entry per line.
    pub fn lines(&mut self, text: &str) {
        self.lines.extend(text.lines().map(str::to_string));
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn build_function(self, name: &str, indent: &str) -> String {
        let mut out = format!("export function {name}() {{\n");
        for line in &self.lines {
            let line = line.trim();
            if !line.is_empty() {
                out.push_str(indent);
                out.push_str(line);
            }
            out.push('\n');
        }
        out.push('}');
        out
    }
}

/// Double-quoted JavaScript string literal.
pub fn string_lit(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Whether `s` can be used after a `.` in a member expression.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Words that cannot name a `const` in module code.
const RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Whether `s` can be declared with `const s = ...` inside a module.
pub fn is_binding_name(s: &str) -> bool {
    is_identifier(s) && !RESERVED_WORDS.contains(&s)
}
