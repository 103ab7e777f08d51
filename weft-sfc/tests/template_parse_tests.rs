use pretty_assertions::assert_eq;
use weft_sfc::{Directive, NodeType, classify, declare, parse_template, walk};

#[test]
fn parse_basic_template() {
    let src = r#"<div class="foo">Hello <span {name}></span></div>"#;
    let doc = parse_template(src).expect("parse");
    assert_eq!(doc.roots().len(), 1);

    let div = doc.node(doc.roots()[0]);
    assert_eq!(div.tag(), Some("div"));
    assert_eq!(div.attributes()[0].name, "class");
    assert_eq!(div.attributes()[0].value, "foo");
    assert_eq!(div.children.len(), 2);
    assert_eq!(doc.node(div.children[0]).text(), Some("Hello"));
    assert_eq!(doc.node(div.children[1]).attributes()[0].name, "{name}");
}

#[test]
fn parse_handles_every_attribute_form() {
    let doc = parse_template(
        r#"<a href='x' target=_blank on:click.prevent={go} {title} #ref data-n="1 2" disabled></a>"#,
    )
    .unwrap();
    let attrs: Vec<(&str, &str)> = doc
        .node(doc.roots()[0])
        .attributes()
        .iter()
        .map(|a| (a.name.as_str(), a.value.as_str()))
        .collect();
    assert_eq!(
        attrs,
        [
            ("href", "x"),
            ("target", "_blank"),
            ("on:click.prevent", "{go}"),
            ("{title}", ""),
            ("#ref", ""),
            ("data-n", "1 2"),
            ("disabled", ""),
        ]
    );
}

#[test]
fn walk_visits_in_ref_id_order() {
    let doc = parse_template("<a><b>1</b><c><d/></c></a><e>2</e>").unwrap();
    let mut ids = Vec::new();
    walk(&doc, doc.roots(), |id| ids.push(id.ref_id()));
    assert_eq!(ids, [1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn declared_nodes_carry_directives() {
    let doc = parse_template(
        r#"<svg><text {label} on:click|once={pick}>t &amp; u</text></svg><p #ref="para" =x="1" lang="en"></p>"#,
    )
    .unwrap();
    let tree = declare(&doc).unwrap();

    let text = &tree.nodes()[1];
    assert_eq!(text.node_type, NodeType::Svg);
    assert_eq!(text.variables[0].name, "label");
    assert_eq!(text.events[0].event_name, "click");
    assert_eq!(text.events[0].modifiers, ["once"]);
    assert_eq!(tree.nodes()[2].text.as_deref(), Some("t & u"));

    let p = &tree.nodes()[3];
    assert_eq!(p.node_type, NodeType::Element);
    assert_eq!(p.ref_name.as_deref(), Some("para"));
    assert_eq!(p.attributes.len(), 1);
    assert_eq!(p.attributes[0].name, "lang");
}

#[test]
fn classify_follows_rule_order() {
    assert_eq!(classify("=count", "{x}"), None);
    assert_eq!(
        classify("#ref", "{x}"),
        Some(Directive::Ref { name: "{x}".into() })
    );
    assert_eq!(
        classify("{on:click}", ""),
        Some(Directive::Variable {
            name: "on:click".into(),
            variable: "on:click".into()
        })
    );
    assert_eq!(
        classify("on:", "{h}"),
        Some(Directive::Variable {
            name: "on:".into(),
            variable: "h".into()
        })
    );
}
