use serde::Serialize;

use crate::declare::DeclaredTree;
use crate::template_ast::NodeId;

/// Top-level blocks of a template document.
///
/// Only root nodes are sorted into blocks; a `<script>` nested inside an
/// element is an ordinary element.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Sfc {
    /// Emission roots in document order. A root `<template>` contributes its
    /// children here in its own position.
    pub body: Vec<NodeId>,
    pub templates: Vec<NodeId>,
    pub scripts: Vec<NodeId>,
    pub styles: Vec<NodeId>,
}

impl Sfc {
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Text of the first top-level script's first text child, trimmed.
    pub fn script_source<'a>(&self, tree: &'a DeclaredTree) -> Option<&'a str> {
        let script = tree.node(*self.scripts.first()?);
        script
            .children
            .iter()
            .map(|id| tree.node(*id))
            .find(|n| n.is_text())
            .and_then(|n| n.text.as_deref())
            .map(str::trim)
    }
}

pub fn segregate(tree: &DeclaredTree) -> Sfc {
    let mut sfc = Sfc::default();

    for &id in tree.roots() {
        let node = tree.node(id);
        debug_assert!(node.parent.is_none());
        match node.tag.as_deref() {
            Some("template") => {
                sfc.templates.push(id);
                sfc.body.extend_from_slice(&node.children);
            }
            Some("script") => sfc.scripts.push(id),
            Some("style") => sfc.styles.push(id),
            _ => sfc.body.push(id),
        }
    }

    tracing::debug!(
        body = sfc.body.len(),
        templates = sfc.templates.len(),
        scripts = sfc.scripts.len(),
        styles = sfc.styles.len(),
        "segregated top-level blocks"
    );
    sfc
}
