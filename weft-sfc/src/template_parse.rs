use serde_json::Value;

use crate::error::{CompileError, Result};
use crate::template_ast::{Document, NodeId, RawKind, RawNode, Span, TemplateAttr};
use crate::tokenizer::{Token, tokenize};

/// Elements that never have content; their open tag also closes them.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Parse markup into a [`Document`].
///
/// Malformed markup is accepted: unmatched close tags are ignored and
/// elements still open at the end of input are closed implicitly.
pub fn parse_template(input: &str) -> Result<Document> {
    let mut builder = TreeBuilder::new();
    for token in tokenize(input)? {
        match token {
            Token::OpenTag {
                name,
                attributes,
                self_closing,
                span,
            } => {
                builder.open_tag(name, attributes, span);
                if self_closing {
                    builder.close_current(span.end);
                }
            }
            Token::CloseTag { name, span } => builder.close_tag(&name, span.end),
            Token::Text { text, span } => builder.text(&text, span),
            Token::Comment { .. } => {}
        }
    }
    let doc = builder.finish(input.len());
    tracing::debug!(nodes = doc.len(), roots = doc.roots().len(), "parsed template");
    Ok(doc)
}

struct PendingText {
    text: String,
    span: Span,
}

/// Accumulates markup events into a [`Document`].
///
/// All per-parse state (the id counter, the open-element stack and the
/// pending text run) lives here, so separate parses never share anything.
#[derive(Default)]
pub struct TreeBuilder {
    nodes: Vec<RawNode>,
    roots: Vec<NodeId>,
    stack: Vec<NodeId>,
    pending: Option<PendingText>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an element from markup. Void elements are closed immediately.
    pub fn open_tag(&mut self, tag: String, attributes: Vec<TemplateAttr>, span: Span) -> NodeId {
        let void = VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str());
        self.open(tag, attributes, span, !void)
    }

    /// Open an element that stays open until closed explicitly, whatever
    /// its tag. Used for pre-parsed input where children are given outright.
    pub fn open_element(
        &mut self,
        tag: String,
        attributes: Vec<TemplateAttr>,
        span: Span,
    ) -> NodeId {
        self.open(tag, attributes, span, true)
    }

    fn open(
        &mut self,
        tag: String,
        attributes: Vec<TemplateAttr>,
        span: Span,
        keep_open: bool,
    ) -> NodeId {
        self.flush_text();
        let attributes = attributes
            .into_iter()
            .map(|a| TemplateAttr {
                name: a.name,
                value: collapse_ws(&a.value),
            })
            .collect();
        let id = self.push_node(RawKind::Tag { tag, attributes }, span);
        if keep_open {
            self.stack.push(id);
        }
        id
    }

    /// Close the innermost open element with this name, along with anything
    /// still open inside it.
    pub fn close_tag(&mut self, tag: &str, end: usize) {
        self.flush_text();
        let Some(pos) = self.stack.iter().rposition(|id| {
            self.nodes[id.0]
                .tag()
                .is_some_and(|t| t.eq_ignore_ascii_case(tag))
        }) else {
            tracing::debug!(tag, "ignoring unmatched close tag");
            return;
        };
        for id in self.stack.drain(pos..) {
            self.nodes[id.0].span.end = end;
        }
    }

    /// Close whatever element was opened last, used for `/>`.
    pub fn close_current(&mut self, end: usize) {
        self.flush_text();
        let Some(&top) = self.stack.last() else {
            return;
        };
        // void elements were never pushed; only close the element `/>` belongs to
        if self.nodes.last().map(|n| n.id) == Some(top) {
            self.stack.pop();
            self.nodes[top.0].span.end = end;
        }
    }

    /// Append a raw text run. Consecutive runs under the same parent merge.
    pub fn text(&mut self, text: &str, span: Span) {
        match &mut self.pending {
            Some(pending) => {
                pending.text.push_str(text);
                pending.span.end = span.end;
            }
            None => {
                self.pending = Some(PendingText {
                    text: text.to_string(),
                    span,
                })
            }
        }
    }

    pub fn finish(mut self, end: usize) -> Document {
        self.flush_text();
        for id in self.stack.drain(..) {
            let node = &mut self.nodes[id.0];
            node.span.end = node.span.end.max(end);
        }
        Document {
            nodes: self.nodes,
            roots: self.roots,
        }
    }

    fn flush_text(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let normalized = pending.text.replace("\r\n", "\n").replace('\r', "\n");
        let text = normalized.trim();
        if text.is_empty() || text.starts_with("<!--") {
            return;
        }
        self.push_node(
            RawKind::Text {
                text: text.to_string(),
            },
            pending.span,
        );
    }

    fn push_node(&mut self, kind: RawKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.stack.last().copied();
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        tracing::trace!(%id, ?parent, "node");
        self.nodes.push(RawNode {
            id,
            parent,
            span,
            kind,
            children: Vec::new(),
        });
        id
    }
}

fn collapse_ws(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Document {
    /// Build a document from an already-parsed node sequence.
    ///
    /// Accepted shapes: `{"text": "..."}` for text and
    /// `{"tag": "div", "attributes": ..., "children": [...]}` for elements,
    /// where `attributes` is either an object of name → value or a list of
    /// `{"name", "value"}` pairs. Nodes go through the same normalization
    /// as parsed markup.
    pub fn from_json(value: &Value) -> Result<Document> {
        let Value::Array(items) = value else {
            return Err(CompileError::InvalidInput(
                "expected an array of root nodes".to_string(),
            ));
        };
        let mut builder = TreeBuilder::new();
        for item in items {
            json_node(&mut builder, item, "the document root")?;
        }
        Ok(builder.finish(0))
    }
}

fn json_node(builder: &mut TreeBuilder, value: &Value, context: &str) -> Result<()> {
    let obj = match value {
        Value::Object(obj) => obj,
        Value::Array(_) => {
            return Err(CompileError::NestedContent(format!(
                "found an array inside the children of {context}; flatten nested fragments into a single node list"
            )));
        }
        Value::String(text) => {
            builder.text(text, Span::default());
            return Ok(());
        }
        other => {
            return Err(CompileError::InvalidInput(format!(
                "unexpected {other} in the children of {context}"
            )));
        }
    };

    if let Some(text) = obj.get("text") {
        let text = text.as_str().ok_or_else(|| {
            CompileError::InvalidInput(format!("text node in {context} is not a string"))
        })?;
        builder.text(text, Span::default());
        return Ok(());
    }

    let tag = obj
        .get("tag")
        .and_then(Value::as_str)
        .ok_or_else(|| CompileError::InvalidInput(format!("node in {context} has no tag or text")))?;
    let attributes = json_attributes(obj.get("attributes"), tag)?;
    let id = builder.open_element(tag.to_string(), attributes, Span::default());
    let context = format!("<{tag}> ({id})");

    match obj.get("children") {
        None | Some(Value::Null) => {}
        Some(Value::Array(children)) => {
            for child in children {
                json_node(builder, child, &context)?;
            }
        }
        Some(_) => {
            return Err(CompileError::InvalidInput(format!(
                "children of {context} must be an array"
            )));
        }
    }
    builder.close_tag(tag, 0);
    Ok(())
}

fn json_attributes(value: Option<&Value>, tag: &str) -> Result<Vec<TemplateAttr>> {
    let to_string = |v: &Value| match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Object(map)) => Ok(map
            .iter()
            .map(|(name, value)| TemplateAttr {
                name: name.clone(),
                value: to_string(value),
            })
            .collect()),
        Some(Value::Array(list)) => list
            .iter()
            .map(|entry| -> Result<TemplateAttr> {
                let name = entry.get("name").and_then(Value::as_str).ok_or_else(|| {
                    CompileError::InvalidInput(format!("attribute of <{tag}> has no name"))
                })?;
                Ok(TemplateAttr {
                    name: name.to_string(),
                    value: entry.get("value").map(to_string).unwrap_or_default(),
                })
            })
            .collect(),
        Some(_) => Err(CompileError::InvalidInput(format!(
            "attributes of <{tag}> must be an object or a list"
        ))),
    }
}
