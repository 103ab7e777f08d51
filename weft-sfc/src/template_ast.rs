use std::fmt;

use serde::Serialize;

/// Index of a node in its tree's arena.
///
/// Ids are handed out in document order, so the arena order is the
/// pre-order of the tree. The ref id (`index + 1`) is what generated
/// handle names are derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }

    pub fn ref_id(self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.ref_id())
    }
}

/// Byte range of a node or token in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateAttr {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawKind {
    Text { text: String },
    Tag { tag: String, attributes: Vec<TemplateAttr> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub span: Span,
    #[serde(flatten)]
    pub kind: RawKind,
    pub children: Vec<NodeId>,
}

impl RawNode {
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            RawKind::Tag { tag, .. } => Some(tag),
            RawKind::Text { .. } => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            RawKind::Text { text } => Some(text),
            RawKind::Tag { .. } => None,
        }
    }

    pub fn attributes(&self) -> &[TemplateAttr] {
        match &self.kind {
            RawKind::Tag { attributes, .. } => attributes,
            RawKind::Text { .. } => &[],
        }
    }
}

/// Parse result: an append-only arena of raw nodes plus the root ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    pub(crate) nodes: Vec<RawNode>,
    pub(crate) roots: Vec<NodeId>,
}

impl Document {
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn nodes(&self) -> &[RawNode] {
        &self.nodes
    }

    pub fn get(&self, id: NodeId) -> Option<&RawNode> {
        self.nodes.get(id.0)
    }

    pub fn node(&self, id: NodeId) -> &RawNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
