use pest::Parser;
use pest::iterators::Pair;

use crate::error::{CompileError, Result};
use crate::template_ast::{Span, TemplateAttr};

#[derive(pest_derive::Parser)]
#[grammar = "markup.pest"]
struct MarkupParser;

/// One markup event, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    OpenTag {
        name: String,
        attributes: Vec<TemplateAttr>,
        self_closing: bool,
        span: Span,
    },
    CloseTag {
        name: String,
        span: Span,
    },
    /// Raw text, whitespace and entities untouched.
    Text {
        text: String,
        span: Span,
    },
    /// Comments, doctypes and processing instructions.
    Comment {
        span: Span,
    },
}

pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut pairs = MarkupParser::parse(Rule::document, source)
        .map_err(|e| CompileError::Tokenize(e.to_string()))?;
    let document = pairs
        .next()
        .ok_or_else(|| CompileError::Tokenize("empty token stream".to_string()))?;

    let mut tokens = Vec::new();
    for node in document.into_inner() {
        match node.as_rule() {
            Rule::open_tag => tokens.push(open_tag(node)),
            Rule::close_tag => {
                let span = span_of(&node);
                let name = node
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::tag_name)
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tokens.push(Token::CloseTag { name, span });
            }
            Rule::raw_element => raw_element(node, &mut tokens),
            Rule::text | Rule::stray => tokens.push(Token::Text {
                text: node.as_str().to_string(),
                span: span_of(&node),
            }),
            Rule::comment | Rule::declaration => tokens.push(Token::Comment {
                span: span_of(&node),
            }),
            _ => {}
        }
    }
    tracing::trace!(count = tokens.len(), "tokenized markup");
    Ok(tokens)
}

fn span_of(pair: &Pair<Rule>) -> Span {
    let span = pair.as_span();
    Span::new(span.start(), span.end())
}

fn open_tag(tag: Pair<Rule>) -> Token {
    let span = span_of(&tag);
    let mut name = String::new();
    let mut attributes = Vec::new();
    let mut self_closing = false;

    for part in tag.into_inner() {
        match part.as_rule() {
            Rule::tag_name => name = part.as_str().to_string(),
            Rule::attribute => attributes.push(parse_attr(part)),
            Rule::tag_end => self_closing = part.as_str() == "/>",
            _ => {}
        }
    }
    Token::OpenTag {
        name,
        attributes,
        self_closing,
        span,
    }
}

fn raw_element(element: Pair<Rule>, tokens: &mut Vec<Token>) {
    let mut name = String::new();
    for part in element.into_inner() {
        match part.as_rule() {
            Rule::script_open | Rule::style_open => {
                let span = span_of(&part);
                let mut attributes = Vec::new();
                for p in part.into_inner() {
                    match p.as_rule() {
                        Rule::script_tag | Rule::style_tag => {
                            name = p.as_str().to_ascii_lowercase()
                        }
                        Rule::attribute => attributes.push(parse_attr(p)),
                        _ => {}
                    }
                }
                tokens.push(Token::OpenTag {
                    name: name.clone(),
                    attributes,
                    self_closing: false,
                    span,
                });
            }
            Rule::script_text | Rule::style_text => {
                if !part.as_str().is_empty() {
                    tokens.push(Token::Text {
                        text: part.as_str().to_string(),
                        span: span_of(&part),
                    });
                }
            }
            Rule::script_close | Rule::style_close => tokens.push(Token::CloseTag {
                name: name.clone(),
                span: span_of(&part),
            }),
            _ => {}
        }
    }
}

fn parse_attr(attr: Pair<Rule>) -> TemplateAttr {
    // attribute = attr_name ( "=" value )?
    let mut name = String::new();
    let mut value = String::new();

    for part in attr.into_inner() {
        match part.as_rule() {
            Rule::attr_name => name = part.as_str().to_string(),
            Rule::dq_text | Rule::sq_text | Rule::brace_value | Rule::bare_value => {
                value = part.as_str().to_string()
            }
            _ => {}
        }
    }
    TemplateAttr { name, value }
}
