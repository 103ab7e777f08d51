//! Template compiler: markup with `{binding}`, `on:event={handler}` and
//! `#ref` directives in, a JavaScript function that builds the DOM out.

pub mod compiler;
pub mod declare;
pub mod directive;
pub mod entities;
pub mod error;
pub mod js;
pub mod sfc;
pub mod template_ast;
pub mod template_codegen;
pub mod template_parse;
pub mod tokenizer;
pub mod tree;

pub use compiler::{CompileOptions, compile, compile_document, compile_with};
pub use declare::{DeclaredNode, DeclaredTree, NodeType, declare};
pub use directive::{Directive, classify};
pub use error::{CompileError, Result};
pub use sfc::{Sfc, segregate};
pub use template_ast::{Document, NodeId, RawKind, RawNode, Span, TemplateAttr};
pub use template_codegen::generate;
pub use template_parse::{TreeBuilder, parse_template};
pub use tokenizer::{Token, tokenize};
pub use tree::{Tree, find_parent_matching, flat, reduce_tree, walk};
