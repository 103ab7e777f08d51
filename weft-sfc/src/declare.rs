use serde::Serialize;

use crate::directive::{Directive, classify};
use crate::entities;
use crate::error::{CompileError, Result};
use crate::template_ast::{Document, NodeId, RawKind, TemplateAttr};
use crate::tree::{Tree, find_parent_matching, reduce_tree};

/// Elements whose text content is taken literally.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Text,
    Svg,
    Element,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventBinding {
    pub event_name: String,
    pub modifiers: Vec<String>,
    pub handler: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableBinding {
    pub name: String,
    pub variable: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclaredNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub events: Vec<EventBinding>,
    pub variables: Vec<VariableBinding>,
    pub attributes: Vec<TemplateAttr>,
}

impl DeclaredNode {
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    pub fn is_svg(&self) -> bool {
        self.node_type == NodeType::Svg
    }

    fn text(id: NodeId, parent: Option<NodeId>, text: String) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            node_type: NodeType::Text,
            tag: None,
            ref_name: None,
            text: Some(text),
            events: Vec::new(),
            variables: Vec::new(),
            attributes: Vec::new(),
        }
    }
}

/// The enriched tree; shares node ids with the [`Document`] it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclaredTree {
    nodes: Vec<DeclaredNode>,
    roots: Vec<NodeId>,
}

impl DeclaredTree {
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn nodes(&self) -> &[DeclaredNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &DeclaredNode {
        &self.nodes[id.0]
    }
}

impl Tree for DeclaredTree {
    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }
}

/// Build the declared tree for a whole document.
pub fn declare(doc: &Document) -> Result<DeclaredTree> {
    let reduced = reduce_tree(doc, doc.roots(), |id, parent| declare_node(doc, id, parent))?;
    let nodes = reduced.into_dense()?;
    tracing::debug!(nodes = nodes.len(), "declared tree");
    Ok(DeclaredTree {
        nodes,
        roots: doc.roots().to_vec(),
    })
}

/// Declare one raw node, given its already declared parent.
pub fn declare_node(
    doc: &Document,
    id: NodeId,
    parent: Option<&DeclaredNode>,
) -> Result<DeclaredNode> {
    let raw = doc
        .get(id)
        .ok_or_else(|| CompileError::Internal(format!("{id} is not in the document")))?;
    if raw.parent != parent.map(|p| p.id) {
        return Err(CompileError::Internal(format!(
            "{id} declared under {:?} but its parent is {:?}",
            parent.map(|p| p.id),
            raw.parent
        )));
    }

    let (tag, attributes) = match &raw.kind {
        RawKind::Text { text } => {
            let in_raw_text = parent
                .and_then(|p| p.tag.as_deref())
                .is_some_and(|t| RAW_TEXT_ELEMENTS.contains(&t));
            let content = if in_raw_text {
                text.clone()
            } else {
                entities::decode(text).into_owned()
            };
            return Ok(DeclaredNode::text(id, raw.parent, content));
        }
        RawKind::Tag { tag, attributes } => (tag, attributes),
    };

    let inherits_svg = parent.is_some_and(DeclaredNode::is_svg);
    let raw_chain_svg = find_parent_matching(doc, id, |p| doc.node(p).tag() == Some("svg")).is_some();
    if inherits_svg != raw_chain_svg {
        return Err(CompileError::Internal(format!(
            "svg context of {id} disagrees between declared and raw ancestors"
        )));
    }
    let node_type = if tag == "svg" || inherits_svg {
        NodeType::Svg
    } else {
        NodeType::Element
    };

    let mut node = DeclaredNode {
        id,
        parent: raw.parent,
        children: raw.children.clone(),
        node_type,
        tag: Some(tag.clone()),
        ref_name: None,
        text: None,
        events: Vec::new(),
        variables: Vec::new(),
        attributes: Vec::new(),
    };

    for attr in attributes {
        match classify(&attr.name, &attr.value) {
            Some(Directive::Ref { name }) => {
                if node.ref_name.is_none() {
                    node.ref_name = Some(name);
                }
            }
            Some(Directive::Event {
                event_name,
                modifiers,
                variable_name,
            }) => node.events.push(EventBinding {
                event_name,
                modifiers,
                handler: variable_name,
            }),
            Some(Directive::Variable { name, variable }) => {
                node.variables.push(VariableBinding { name, variable })
            }
            Some(Directive::Attribute { name, value }) => {
                node.attributes.push(TemplateAttr { name, value })
            }
            None => {}
        }
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template_parse::parse_template;

    fn declared(src: &str) -> DeclaredTree {
        declare(&parse_template(src).unwrap()).unwrap()
    }

    fn by_tag<'a>(tree: &'a DeclaredTree, tag: &str) -> &'a DeclaredNode {
        tree.nodes()
            .iter()
            .find(|n| n.tag.as_deref() == Some(tag))
            .unwrap()
    }

    #[test]
    fn partitions_attributes() {
        let tree = declared(
            r#"<input #ref="field" class="a" {value} on:input.once={onInput} =x placeholder="p">"#,
        );
        let input = by_tag(&tree, "input");
        assert_eq!(input.node_type, NodeType::Element);
        assert_eq!(input.ref_name.as_deref(), Some("field"));
        assert_eq!(
            input.variables,
            [VariableBinding {
                name: "value".into(),
                variable: "value".into()
            }]
        );
        assert_eq!(
            input.events,
            [EventBinding {
                event_name: "input".into(),
                modifiers: vec!["once".into()],
                handler: "onInput".into(),
            }]
        );
        let plain: Vec<&str> = input.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(plain, ["class", "placeholder"]);
    }

    #[test]
    fn first_ref_on_a_node_wins() {
        let tree = declared(r#"<div #ref="a" #ref="b"></div>"#);
        assert_eq!(tree.node(tree.roots()[0]).ref_name.as_deref(), Some("a"));
    }

    #[test]
    fn svg_context_is_inherited() {
        let tree = declared("<svg><g><rect/></g><text>hi</text></svg><rect/>");
        let types: Vec<NodeType> = tree.nodes().iter().map(|n| n.node_type).collect();
        assert_eq!(
            types,
            [
                NodeType::Svg,
                NodeType::Svg,
                NodeType::Svg,
                NodeType::Svg,
                NodeType::Text,
                NodeType::Element,
            ]
        );
    }

    #[test]
    fn svg_context_survives_foreign_object() {
        let tree = declared("<svg><foreignObject><div></div></foreignObject></svg>");
        assert!(by_tag(&tree, "div").is_svg());
    }

    #[test]
    fn text_is_decoded_except_in_raw_text_elements() {
        let tree = declared("<p>a &amp; b</p><script>x &amp;&amp; y</script>");
        let texts: Vec<&str> = tree.nodes().iter().filter_map(|n| n.text.as_deref()).collect();
        assert_eq!(texts, ["a & b", "x &amp;&amp; y"]);
    }

    #[test]
    fn declared_tree_mirrors_raw_links() {
        let doc = parse_template("<a><b></b>t<c></c></a>").unwrap();
        let tree = declare(&doc).unwrap();
        for raw in doc.nodes() {
            let d = tree.node(raw.id);
            assert_eq!(d.parent, raw.parent);
            assert_eq!(d.children, raw.children);
        }
        assert_eq!(tree.roots(), doc.roots());
    }
}
