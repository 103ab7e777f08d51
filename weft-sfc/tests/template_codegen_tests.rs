use pretty_assertions::assert_eq;
use weft_sfc::{CompileOptions, compile, compile_with};

#[test]
fn codegen_div_with_text() {
    let js = compile(r#"<div class="c"><span>hi</span></div>"#).unwrap();
    assert_eq!(
        js,
        r#"export function compile() {
  const el1 = document.createElement("div");
  el1.className = "c";
  const el2 = document.createElement("span");
  el1.appendChild(el2);
  const el3 = document.createTextNode("hi");
  el2.appendChild(el3);
  return { roots: [el1], refs: {}, bindings: [] };
}"#
    );
    assert!(!js.contains(r#"setAttribute("class""#));
}

#[test]
fn codegen_event_and_shorthand_binding() {
    let js = compile("<div on:click={onClick}><img {src}></div>").unwrap();
    assert_eq!(
        js,
        r#"export function compile() {
  const el1 = document.createElement("div");
  const el2 = document.createElement("img");
  el1.appendChild(el2);
  el2.src = src;
  el1.addEventListener("click", onClick);
  return { roots: [el1], refs: {}, bindings: [{ node: el2, name: "src", get: () => src, set: (__value) => { src = __value; el2.src = __value; } }] };
}"#
    );
}

#[test]
fn codegen_splices_script_before_events() {
    let src = r#"
<script>
  let count = 0;
  function inc() { count += 1; }
</script>
<button #ref="button" on:click={inc}>+</button>
"#;
    let js = compile(src).unwrap();
    assert_eq!(
        js,
        r#"export function compile() {
  const button = document.createElement("button");
  const el4 = document.createTextNode("+");
  button.appendChild(el4);
  let count = 0;
  function inc() { count += 1; }
  button.addEventListener("click", inc);
  return { roots: [button], refs: { button }, bindings: [] };
}"#
    );
}

#[test]
fn codegen_svg_namespace() {
    let js = compile(r#"<svg width="10"><rect/></svg><rect/>"#).unwrap();
    assert_eq!(
        js,
        r#"export function compile() {
  const el1 = document.createElementNS("http://www.w3.org/2000/svg", "svg");
  el1.setAttribute("width", "10");
  const el2 = document.createElementNS("http://www.w3.org/2000/svg", "rect");
  el1.appendChild(el2);
  const el3 = document.createElement("rect");
  return { roots: [el1, el3], refs: {}, bindings: [] };
}"#
    );
}

#[test]
fn codegen_template_children_are_roots() {
    let js = compile("<template><p>a</p></template><div></div>").unwrap();
    assert_eq!(
        js,
        r#"export function compile() {
  const el2 = document.createElement("p");
  const el3 = document.createTextNode("a");
  el2.appendChild(el3);
  const el4 = document.createElement("div");
  return { roots: [el2, el4], refs: {}, bindings: [] };
}"#
    );
}

#[test]
fn codegen_attribute_targets_in_order() {
    let js = compile(
        r#"<canvas width="300" height="50%" style="border: 1px  solid" data-x="1" class="a"></canvas>"#,
    )
    .unwrap();
    let body: Vec<&str> = js.lines().skip(1).take(6).map(str::trim).collect();
    assert_eq!(
        body,
        [
            r#"const el1 = document.createElement("canvas");"#,
            "el1.width = 300;",
            r#"el1.height = "50%";"#,
            r#"el1.style.cssText = "border: 1px solid";"#,
            r#"el1.setAttribute("data-x", "1");"#,
            r#"el1.className = "a";"#,
        ]
    );
}

#[test]
fn codegen_non_canonical_numbers_stay_strings() {
    let js = compile(r#"<img width="08" height="010">"#).unwrap();
    assert_eq!(
        js,
        r#"export function compile() {
  const el1 = document.createElement("img");
  el1.width = "08";
  el1.height = "010";
  return { roots: [el1], refs: {}, bindings: [] };
}"#
    );
}

#[test]
fn codegen_decodes_text_entities_only() {
    let js = compile(r#"<p title="a &amp; b">x &lt; y</p>"#).unwrap();
    assert!(js.contains(r#"el1.setAttribute("title", "a &amp; b");"#));
    assert!(js.contains(r#"document.createTextNode("x < y");"#));
}

#[test]
fn codegen_escapes_text() {
    let js = compile("<p>say \"hi\"\nback\\slash</p>").unwrap();
    assert!(js.contains(r#"document.createTextNode("say \"hi\"\nback\\slash");"#));
}

#[test]
fn style_only_document_compiles_to_nothing() {
    assert_eq!(compile("<style>body{}</style>").unwrap(), "");
    assert_eq!(compile("").unwrap(), "");
    assert_eq!(compile("  <!-- nothing -->  ").unwrap(), "");
    assert_eq!(compile("<script>let a = 1;</script>").unwrap(), "");
}

#[test]
fn custom_function_name_and_indent() {
    let options = CompileOptions {
        function_name: "mount".to_string(),
        indent: "\t".to_string(),
    };
    let js = compile_with("<br>", &options).unwrap();
    assert_eq!(
        js,
        "export function mount() {\n\tconst el1 = document.createElement(\"br\");\n\treturn { roots: [el1], refs: {}, bindings: [] };\n}"
    );
}

#[test]
fn output_is_deterministic() {
    let src = r#"<ul #ref="list"><li {a} on:click.once={pick}>1</li><li b={c}>2</li></ul>"#;
    assert_eq!(compile(src).unwrap(), compile(src).unwrap());
}
