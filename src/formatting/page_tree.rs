// src/formatting/page_tree.rs
//! Page-builder documents: parsing into the widget tree and flattening it
//! into one markup string.
//!
//! The page builder stores a document as nested elements:
//!
//! ```json
//! [{"elType": "section", "elements": [
//!     {"elType": "widget", "widgetType": "heading",
//!      "settings": {"title": "Hi", "header_size": "h3"}, "elements": []}
//! ]}]
//! ```
//!
//! Flattening is a pre-order walk: a node's own markup, then its children
//! in order. Only widget nodes produce output.

use crate::constants::{BUTTON_CLASS, CHARS_PER_NODE_ESTIMATE, DEFAULT_HEADING_LEVEL};
use crate::error::AppError;
use crate::model::{PageNode, PageTree, Widget};
use serde_json::{Map, Value};
use std::fmt::Write;

// --- Parsing ---

/// Parses the JSON text of a page-builder document.
pub fn parse_page_tree(text: &str) -> Result<PageTree, AppError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| AppError::InvalidPageTree(e.to_string()))?;
    page_tree_from_value(&value)
}

/// Builds the widget tree from an already-decoded payload.
///
/// Accepts an array of elements, a single element object, or a string
/// holding either (the CMS double-encodes the payload in post meta).
/// Entries that are not objects are skipped.
pub fn page_tree_from_value(value: &Value) -> Result<PageTree, AppError> {
    match value {
        Value::Array(elements) => Ok(nodes_from_elements(elements)),
        Value::Object(element) => Ok(vec![node_from_element(element)]),
        Value::String(text) => parse_page_tree(text),
        other => Err(AppError::InvalidPageTree(format!(
            "expected an array of elements, found {}",
            json_type_name(other)
        ))),
    }
}

fn nodes_from_elements(elements: &[Value]) -> Vec<PageNode> {
    elements
        .iter()
        .filter_map(|element| match element {
            Value::Object(element) => Some(node_from_element(element)),
            other => {
                log::debug!("Skipping non-object page element: {}", json_type_name(other));
                None
            }
        })
        .collect()
}

fn node_from_element(element: &Map<String, Value>) -> PageNode {
    let children = match element.get("elements") {
        Some(Value::Array(children)) => nodes_from_elements(children),
        _ => Vec::new(),
    };
    PageNode::new(widget_from_element(element)).with_children(children)
}

fn widget_from_element(element: &Map<String, Value>) -> Widget {
    let element_type = str_at(element, "elType");
    let widget_type = str_at(element, "widgetType");

    if element_type != "widget" && widget_type.is_empty() {
        return Widget::Layout {
            element_type: element_type.to_string(),
        };
    }

    let empty = Map::new();
    let settings = match element.get("settings") {
        Some(Value::Object(settings)) => settings,
        _ => &empty,
    };

    match widget_type {
        "text-editor" => Widget::TextEditor {
            editor: str_at(settings, "editor").to_string(),
        },
        "heading" => Widget::Heading {
            title: str_at(settings, "title").to_string(),
            level: heading_level(str_at(settings, "header_size")),
        },
        "image" => {
            let image = object_at(settings, "image");
            Widget::Image {
                url: image.map_or("", |image| str_at(image, "url")).to_string(),
                alt: image.map_or("", |image| str_at(image, "alt")).to_string(),
            }
        }
        "button" => {
            let url = object_at(settings, "link")
                .map(|link| str_at(link, "url"))
                .filter(|url| !url.is_empty())
                .map(str::to_string);
            Widget::Button {
                text: str_at(settings, "text").to_string(),
                url,
            }
        }
        "html" => Widget::Html {
            html: str_at(settings, "html").to_string(),
        },
        other => Widget::Unsupported {
            widget_type: other.to_string(),
        },
    }
}

/// `"h3"` or `"3"` → 3, clamped to 1..=6. Anything else is the default.
fn heading_level(header_size: &str) -> u8 {
    let digits = header_size
        .trim()
        .strip_prefix(['h', 'H'])
        .unwrap_or(header_size.trim());
    match digits.parse::<u8>() {
        Ok(level) => level.clamp(1, 6),
        Err(_) => DEFAULT_HEADING_LEVEL,
    }
}

fn str_at<'a>(map: &'a Map<String, Value>, key: &str) -> &'a str {
    map.get(key).and_then(Value::as_str).unwrap_or("")
}

fn object_at<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    map.get(key).and_then(Value::as_object)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// --- Rendering ---

/// Renders a widget tree into markup, pre-order.
///
/// The walk uses an explicit stack so document depth never touches the
/// call stack.
pub fn render_tree(tree: &[PageNode]) -> String {
    let node_count: usize = tree.iter().map(PageNode::node_count).sum();
    let mut output = String::with_capacity(node_count * CHARS_PER_NODE_ESTIMATE);

    let mut stack: Vec<&PageNode> = tree.iter().rev().collect();
    while let Some(node) = stack.pop() {
        render_widget(&node.widget, &mut output);
        stack.extend(node.children.iter().rev());
    }

    output
}

fn render_widget(widget: &Widget, out: &mut String) {
    match widget {
        Widget::TextEditor { editor } => out.push_str(editor),
        Widget::Heading { title, level } if !title.is_empty() => {
            let _ = write!(out, "<h{level}>{title}</h{level}>");
        }
        Widget::Image { url, alt } if !url.is_empty() => {
            let _ = write!(
                out,
                r#"<img src="{}" alt="{}" />"#,
                html_escape::encode_double_quoted_attribute(url),
                html_escape::encode_double_quoted_attribute(alt)
            );
        }
        Widget::Button { text, url } if !text.is_empty() => {
            let href = url.as_deref().unwrap_or("#");
            let _ = write!(
                out,
                r#"<a href="{}" class="{}">{}</a>"#,
                html_escape::encode_double_quoted_attribute(href),
                BUTTON_CLASS,
                text
            );
        }
        Widget::Html { html } => out.push_str(html),
        _ => {}
    }
}

/// Parses and renders a payload in one step.
///
/// `None` means the payload is unavailable: it could not be parsed, or it
/// rendered to nothing but whitespace. Callers fall back to the CMS's
/// server-rendered body.
pub fn flatten(payload_text: &str) -> Option<String> {
    match parse_page_tree(payload_text) {
        Ok(tree) => non_blank(render_tree(&tree)),
        Err(e) => {
            log::debug!("Page-builder payload unavailable: {}", e);
            None
        }
    }
}

pub(crate) fn non_blank(markup: String) -> Option<String> {
    if markup.trim().is_empty() {
        None
    } else {
        Some(markup)
    }
}
