// src/model/page_tree.rs
use serde::{Deserialize, Serialize};

/// A page-builder document: its top-level sections in order.
pub type PageTree = Vec<PageNode>;

/// One element of a page-builder document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageNode {
    pub widget: Widget,
    #[serde(default)]
    pub children: Vec<PageNode>,
}

/// The closed set of element kinds the flattener knows how to render.
///
/// Required settings that were missing in the payload are kept as empty
/// strings; such widgets render nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    TextEditor { editor: String },
    Heading { title: String, level: u8 },
    Image { url: String, alt: String },
    Button { text: String, url: Option<String> },
    Html { html: String },
    /// Structural elements (section, column, container) with no widget.
    Layout { element_type: String },
    /// A widget type this client does not render.
    Unsupported { widget_type: String },
}

impl Widget {
    /// The page builder's own name for this element kind.
    pub fn widget_type(&self) -> &str {
        match self {
            Widget::TextEditor { .. } => "text-editor",
            Widget::Heading { .. } => "heading",
            Widget::Image { .. } => "image",
            Widget::Button { .. } => "button",
            Widget::Html { .. } => "html",
            Widget::Layout { element_type } => element_type,
            Widget::Unsupported { widget_type } => widget_type,
        }
    }
}

impl PageNode {
    pub fn new(widget: Widget) -> Self {
        Self {
            widget,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<PageNode>) -> Self {
        self.children = children;
        self
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}
