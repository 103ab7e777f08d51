use std::collections::HashSet;

use crate::compiler::CompileOptions;
use crate::declare::{DeclaredTree, EventBinding, NodeType, VariableBinding};
use crate::error::{CompileError, Result};
use crate::js::{JsBuilder, is_binding_name, is_identifier, string_lit};
use crate::sfc::Sfc;
use crate::template_ast::NodeId;
use crate::tree::flat;

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// Parameter name used by generated binding setters.
const SETTER_PARAM: &str = "__value";

/// Emit the exported function for a declared tree.
///
/// Returns an empty string when there is nothing to build, e.g. a document
/// holding only a `<style>` block.
pub fn generate(tree: &DeclaredTree, sfc: &Sfc, options: &CompileOptions) -> Result<String> {
    if sfc.is_empty() {
        tracing::debug!("no emission roots, nothing to compile");
        return Ok(String::new());
    }

    let mut cg = Codegen::new(tree);
    for id in flat(tree, &sfc.body) {
        cg.emit_node(id)?;
    }
    if let Some(script) = sfc.script_source(tree) {
        cg.js.lines(script);
    }
    cg.emit_bindings();
    cg.emit_events();
    cg.emit_return(&sfc.body)?;

    tracing::debug!(lines = cg.js.len(), "generated function body");
    Ok(cg.js.build_function(&options.function_name, &options.indent))
}

struct Codegen<'a> {
    tree: &'a DeclaredTree,
    js: JsBuilder,
    handles: Vec<Option<String>>,
    taken: HashSet<String>,
    refs: Vec<String>,
    events: Vec<(NodeId, &'a EventBinding)>,
    bindings: Vec<(NodeId, &'a VariableBinding)>,
}

impl<'a> Codegen<'a> {
    fn new(tree: &'a DeclaredTree) -> Self {
        Self {
            tree,
            js: JsBuilder::new(),
            handles: vec![None; tree.nodes().len()],
            taken: HashSet::new(),
            refs: Vec::new(),
            events: Vec::new(),
            bindings: Vec::new(),
        }
    }

    fn handle(&self, id: NodeId) -> Result<&str> {
        self.handles[id.index()]
            .as_deref()
            .ok_or_else(|| CompileError::Internal(format!("{id} used before it was created")))
    }

    /// Pick the variable name for a node. A ref name is used when it is a
    /// valid JS binding that no earlier node claimed.
    fn assign_handle(&mut self, id: NodeId) -> String {
        let node = self.tree.node(id);
        if let Some(name) = &node.ref_name {
            if !is_binding_name(name) {
                tracing::debug!(%id, name = name.as_str(), "ref name is not a valid binding, using generated handle");
            } else if self.taken.insert(name.clone()) {
                self.refs.push(name.clone());
                return name.clone();
            } else {
                tracing::debug!(%id, name = name.as_str(), "ref name already taken, using generated handle");
            }
        }
        let base = format!("el{}", id.ref_id());
        let mut handle = base.clone();
        let mut n = 1;
        while !self.taken.insert(handle.clone()) {
            handle = format!("{base}_{n}");
            n += 1;
        }
        handle
    }

    fn emit_node(&mut self, id: NodeId) -> Result<()> {
        let tree = self.tree;
        let node = tree.node(id);
        let handle = self.assign_handle(id);

        match node.node_type {
            NodeType::Text => {
                let text = node.text.as_deref().unwrap_or_default();
                self.js.line(format!(
                    "const {handle} = document.createTextNode({});",
                    string_lit(text)
                ));
            }
            NodeType::Svg | NodeType::Element => {
                let tag = node
                    .tag
                    .as_deref()
                    .ok_or_else(|| CompileError::Internal(format!("element {id} has no tag")))?;
                if node.is_svg() {
                    self.js.line(format!(
                        "const {handle} = document.createElementNS({}, {});",
                        string_lit(SVG_NAMESPACE),
                        string_lit(tag)
                    ));
                } else {
                    self.js.line(format!(
                        "const {handle} = document.createElement({});",
                        string_lit(tag)
                    ));
                }
                for attr in &node.attributes {
                    self.js.line(attribute_statement(
                        &handle,
                        node.is_svg(),
                        &attr.name,
                        &attr.value,
                    ));
                }
            }
        }

        if let Some(parent) = node.parent {
            match &self.handles[parent.index()] {
                Some(parent_handle) => {
                    self.js.line(format!("{parent_handle}.appendChild({handle});"));
                }
                // children of a root <template> become roots themselves
                None if tree.node(parent).tag.as_deref() == Some("template")
                    && tree.node(parent).parent.is_none() => {}
                None => {
                    return Err(CompileError::Internal(format!(
                        "parent {parent} of {id} was not emitted first"
                    )));
                }
            }
        }

        self.events.extend(node.events.iter().map(|e| (id, e)));
        self.bindings.extend(node.variables.iter().map(|v| (id, v)));
        self.handles[id.index()] = Some(handle);
        Ok(())
    }

    fn emit_bindings(&mut self) {
        for (id, binding) in &self.bindings {
            let handle = self.handles[id.index()].as_deref().unwrap_or_default();
            let svg = self.tree.node(*id).is_svg();
            self.js.line(binding_statement(
                handle,
                svg,
                &binding.name,
                &binding.variable,
            ));
        }
    }

    fn emit_events(&mut self) {
        for (id, event) in &self.events {
            let handle = self.handles[id.index()].as_deref().unwrap_or_default();
            self.js.line(event_statement(handle, event));
        }
    }

    fn emit_return(&mut self, body: &[NodeId]) -> Result<()> {
        let roots = body
            .iter()
            .map(|id| self.handle(*id))
            .collect::<Result<Vec<_>>>()?
            .join(", ");
        let refs = if self.refs.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", self.refs.join(", "))
        };
        let records = self
            .bindings
            .iter()
            .map(|(id, binding)| {
                let handle = self.handle(*id)?;
                let svg = self.tree.node(*id).is_svg();
                Ok(format!(
                    "{{ node: {handle}, name: {}, get: () => {var}, set: ({SETTER_PARAM}) => {{ {var} = {SETTER_PARAM}; {} }} }}",
                    string_lit(&binding.name),
                    binding_statement(handle, svg, &binding.name, SETTER_PARAM),
                    var = binding.variable,
                ))
            })
            .collect::<Result<Vec<_>>>()?
            .join(", ");
        self.js.line(format!(
            "return {{ roots: [{roots}], refs: {refs}, bindings: [{records}] }};"
        ));
        Ok(())
    }
}

/// Statement applying a literal attribute.
fn attribute_statement(handle: &str, svg: bool, name: &str, value: &str) -> String {
    if svg {
        // SVG exposes class/width/height as read-only animated values
        return match name {
            "style" => format!("{handle}.style.cssText = {};", string_lit(value)),
            n if n.starts_with("xlink:") => format!(
                "{handle}.setAttributeNS({}, {}, {});",
                string_lit(XLINK_NAMESPACE),
                string_lit(n),
                string_lit(value)
            ),
            n => format!(
                "{handle}.setAttribute({}, {});",
                string_lit(n),
                string_lit(value)
            ),
        };
    }
    match name {
        "width" | "height" => format!("{handle}.{name} = {};", numeric_or_string(value)),
        "class" => format!("{handle}.className = {};", string_lit(value)),
        "style" => format!("{handle}.style.cssText = {};", string_lit(value)),
        n => format!(
            "{handle}.setAttribute({}, {});",
            string_lit(n),
            string_lit(value)
        ),
    }
}

/// Statement copying `expr` onto the element for a bound attribute.
fn binding_statement(handle: &str, svg: bool, name: &str, expr: &str) -> String {
    match name {
        "style" => format!("{handle}.style.cssText = {expr};"),
        "class" if !svg => format!("{handle}.className = {expr};"),
        n if !svg && is_identifier(n) => format!("{handle}.{n} = {expr};"),
        n => format!("{handle}.setAttribute({}, {expr});", string_lit(n)),
    }
}

fn event_statement(handle: &str, event: &EventBinding) -> String {
    let mut options = Vec::new();
    let mut guards = Vec::new();
    for modifier in &event.modifiers {
        match modifier.as_str() {
            "once" | "passive" | "capture" => options.push(format!("{modifier}: true")),
            "preventDefault" | "stopPropagation" | "stopImmediatePropagation" => {
                guards.push(format!("event.{modifier}();"))
            }
            "self" => guards.push(format!("if (event.target !== {handle}) return;")),
            other => tracing::warn!(
                event = event.event_name.as_str(),
                modifier = other,
                "ignoring unknown event modifier"
            ),
        }
    }

    let listener = if guards.is_empty() {
        event.handler.clone()
    } else {
        format!("(event) => {{ {} {}(event); }}", guards.join(" "), event.handler)
    };
    let options = if options.is_empty() {
        String::new()
    } else {
        format!(", {{ {} }}", options.join(", "))
    };
    format!(
        "{handle}.addEventListener({}, {listener}{options});",
        string_lit(&event.event_name)
    )
}

/// `100` stays a number literal, `50%` becomes a string. Only canonical
/// spellings are emitted as numbers; `08` is a syntax error in module code.
fn numeric_or_string(value: &str) -> String {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n.to_string() == value => value.to_string(),
        _ => string_lit(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_attribute_targets() {
        assert_eq!(attribute_statement("e", false, "class", "a b"), r#"e.className = "a b";"#);
        assert_eq!(
            attribute_statement("e", false, "style", "color: red"),
            r#"e.style.cssText = "color: red";"#
        );
        assert_eq!(attribute_statement("e", false, "width", "100"), "e.width = 100;");
        assert_eq!(attribute_statement("e", false, "height", "50%"), r#"e.height = "50%";"#);
        assert_eq!(
            attribute_statement("e", false, "data-id", "7"),
            r#"e.setAttribute("data-id", "7");"#
        );
    }

    #[test]
    fn svg_attribute_targets() {
        assert_eq!(
            attribute_statement("e", true, "class", "c"),
            r#"e.setAttribute("class", "c");"#
        );
        assert_eq!(
            attribute_statement("e", true, "width", "10"),
            r#"e.setAttribute("width", "10");"#
        );
        assert_eq!(
            attribute_statement("e", true, "xlink:href", "#a"),
            r##"e.setAttributeNS("http://www.w3.org/1999/xlink", "xlink:href", "#a");"##
        );
    }

    #[test]
    fn binding_targets() {
        assert_eq!(binding_statement("e", false, "value", "text"), "e.value = text;");
        assert_eq!(binding_statement("e", false, "class", "cls"), "e.className = cls;");
        assert_eq!(
            binding_statement("e", false, "aria-label", "label"),
            r#"e.setAttribute("aria-label", label);"#
        );
        assert_eq!(
            binding_statement("e", true, "r", "radius"),
            r#"e.setAttribute("r", radius);"#
        );
    }

    #[test]
    fn event_modifiers() {
        let event = |modifiers: &[&str]| EventBinding {
            event_name: "click".into(),
            modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
            handler: "go".into(),
        };
        assert_eq!(
            event_statement("b", &event(&[])),
            r#"b.addEventListener("click", go);"#
        );
        assert_eq!(
            event_statement("b", &event(&["once", "passive"])),
            r#"b.addEventListener("click", go, { once: true, passive: true });"#
        );
        assert_eq!(
            event_statement("b", &event(&["preventDefault", "self", "capture"])),
            r#"b.addEventListener("click", (event) => { event.preventDefault(); if (event.target !== b) return; go(event); }, { capture: true });"#
        );
        assert_eq!(
            event_statement("b", &event(&["sometimes"])),
            r#"b.addEventListener("click", go);"#
        );
    }

    #[test]
    fn numeric_values() {
        assert_eq!(numeric_or_string("1.5"), "1.5");
        assert_eq!(numeric_or_string("NaN"), r#""NaN""#);
        assert_eq!(numeric_or_string(""), r#""""#);
        assert_eq!(numeric_or_string("-2"), "-2");
        assert_eq!(numeric_or_string("08"), r#""08""#);
        assert_eq!(numeric_or_string("1e3"), r#""1e3""#);
        assert_eq!(numeric_or_string(".5"), r#"".5""#);
    }
}
