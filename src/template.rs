//! Minimal page templates.
//!
//! `{{ Location.City }}` prints an HTML-escaped field of the view model and
//! `{{#if Weather}} .. {{else}} .. {{/if}}` branches on a field's truthiness.
//! Fields are addressed by their serialized (PascalCase) names.

use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::error::RenderError;
use crate::formatters::escape_html;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

static NULL: Value = Value::Null;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Field(Vec<String>),
    If {
        path: Vec<String>,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
}

/// An open `{{#if}}` block during parsing
struct Frame {
    path: Vec<String>,
    then: Vec<Node>,
    otherwise: Option<Vec<Node>>,
    line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Reads and parses a template file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let source = tokio::fs::read_to_string(path).await?;
        Self::parse(&source)
    }

    pub fn parse(source: &str) -> Result<Self, RenderError> {
        let mut root = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find(OPEN) {
            if start > 0 {
                push(&mut root, &mut stack, Node::Text(rest[..start].to_string()));
            }
            let line = line_at(source, offset + start);
            let after_open = &rest[start + OPEN.len()..];
            let end = after_open
                .find(CLOSE)
                .ok_or_else(|| parse_error(line, "unterminated tag"))?;
            let tag = after_open[..end].trim();

            let if_path = tag
                .strip_prefix("#if")
                .filter(|path| path.starts_with(char::is_whitespace));

            if let Some(path) = if_path {
                stack.push(Frame {
                    path: parse_path(path, line)?,
                    then: Vec::new(),
                    otherwise: None,
                    line,
                });
            } else if tag == "else" {
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| parse_error(line, "{{else}} outside of {{#if}}"))?;
                if frame.otherwise.is_some() {
                    return Err(parse_error(line, "duplicate {{else}}"));
                }
                frame.otherwise = Some(Vec::new());
            } else if tag == "/if" {
                let frame = stack
                    .pop()
                    .ok_or_else(|| parse_error(line, "{{/if}} without matching {{#if}}"))?;
                let node = Node::If {
                    path: frame.path,
                    then: frame.then,
                    otherwise: frame.otherwise.unwrap_or_default(),
                };
                push(&mut root, &mut stack, node);
            } else {
                push(&mut root, &mut stack, Node::Field(parse_path(tag, line)?));
            }

            let consumed = start + OPEN.len() + end + CLOSE.len();
            offset += consumed;
            rest = &rest[consumed..];
        }

        if let Some(frame) = stack.last() {
            return Err(parse_error(frame.line, "unclosed {{#if}}"));
        }
        if !rest.is_empty() {
            root.push(Node::Text(rest.to_string()));
        }

        Ok(Self { nodes: root })
    }

    /// Renders the template against any serializable value
    pub fn render<T: Serialize>(&self, data: &T) -> Result<String, RenderError> {
        let value = serde_json::to_value(data)
            .map_err(|e| RenderError::NotPrintable(e.to_string()))?;
        let mut output = String::new();
        render_nodes(&self.nodes, &value, &mut output)?;
        Ok(output)
    }
}

fn push(root: &mut Vec<Node>, stack: &mut [Frame], node: Node) {
    match stack.last_mut() {
        Some(frame) => match frame.otherwise.as_mut() {
            Some(otherwise) => otherwise.push(node),
            None => frame.then.push(node),
        },
        None => root.push(node),
    }
}

fn parse_path(raw: &str, line: usize) -> Result<Vec<String>, RenderError> {
    let raw = raw.trim();
    let valid_segment =
        |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if raw.is_empty() || !raw.split('.').all(valid_segment) {
        return Err(parse_error(line, &format!("invalid field path {:?}", raw)));
    }
    Ok(raw.split('.').map(str::to_string).collect())
}

fn parse_error(line: usize, message: &str) -> RenderError {
    RenderError::Parse {
        line,
        message: message.to_string(),
    }
}

fn line_at(source: &str, offset: usize) -> usize {
    source[..offset].matches('\n').count() + 1
}

fn render_nodes(nodes: &[Node], data: &Value, output: &mut String) -> Result<(), RenderError> {
    for node in nodes {
        match node {
            Node::Text(text) => output.push_str(text),
            Node::Field(path) => {
                let text = printable(resolve(data, path)?, path)?;
                output.push_str(&escape_html(&text));
            }
            Node::If {
                path,
                then,
                otherwise,
            } => {
                let branch = if is_truthy(resolve(data, path)?) {
                    then
                } else {
                    otherwise
                };
                render_nodes(branch, data, output)?;
            }
        }
    }
    Ok(())
}

/// Walks `path`. A `null` along the way resolves to `null`; a missing key is an error.
fn resolve<'a>(data: &'a Value, path: &[String]) -> Result<&'a Value, RenderError> {
    let mut current = data;
    for segment in path {
        current = match current {
            Value::Null => return Ok(&NULL),
            Value::Object(map) => map
                .get(segment)
                .ok_or_else(|| RenderError::UnknownField(path.join(".")))?,
            _ => return Err(RenderError::UnknownField(path.join("."))),
        };
    }
    Ok(current)
}

fn printable(value: &Value, path: &[String]) -> Result<String, RenderError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Array(_) | Value::Object(_) => Err(RenderError::NotPrintable(path.join("."))),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        // Present numbers count, zero included
        Value::Number(_) => true,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}
