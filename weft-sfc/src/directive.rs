use serde::Serialize;

/// Handle name used by `#ref` when no name is given.
pub const DEFAULT_REF: &str = "el";

/// Semantic reading of one raw attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Directive {
    /// `{x}` or `attr={x}`: live binding of `name` to `variable`.
    Variable { name: String, variable: String },
    /// `#ref` / `#ref="name"`: capture the element under a handle.
    Ref { name: String },
    /// `on:event.mod1.mod2={handler}`.
    Event {
        event_name: String,
        modifiers: Vec<String>,
        variable_name: String,
    },
    /// Any other attribute, verbatim.
    Attribute { name: String, value: String },
}

/// Classify one attribute. The checks run in a fixed order and the first
/// match wins; `None` means the attribute is dropped.
pub fn classify(name: &str, value: &str) -> Option<Directive> {
    // `=name` marks a compound assignment, reserved for later use
    if name.starts_with('=') {
        return None;
    }

    if name == "#ref" {
        let handle = value.trim();
        let handle = if handle.is_empty() { DEFAULT_REF } else { handle };
        return Some(Directive::Ref {
            name: handle.to_string(),
        });
    }

    if name.starts_with('{') {
        let ident = strip_braces(name);
        return Some(Directive::Variable {
            name: ident.to_string(),
            variable: ident.to_string(),
        });
    }

    if value.starts_with('{') {
        let expr = strip_braces(value);
        if let Some(("on", event)) = name.split_once(':') {
            if !event.is_empty() {
                let mut segments = event.split(['.', '|']);
                let event_name = segments.next().unwrap_or_default().to_string();
                let modifiers = segments
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect();
                return Some(Directive::Event {
                    event_name,
                    modifiers,
                    variable_name: expr.to_string(),
                });
            }
        }
        return Some(Directive::Variable {
            name: name.to_string(),
            variable: expr.to_string(),
        });
    }

    Some(Directive::Attribute {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// `{ x }` -> `x`. Only one brace is removed from each end.
fn strip_braces(s: &str) -> &str {
    let s = s.trim();
    let s = s.strip_prefix('{').unwrap_or(s);
    let s = s.strip_suffix('}').unwrap_or(s);
    s.trim()
}
