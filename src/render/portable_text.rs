//! Structured rich-text bodies as stored by the content store, and their HTML.
//!
//! Each block kind is a variant of [`Block`]; rendering is a fixed `match`
//! over the variant, never a lookup by type name at runtime.

use crate::blog::{null_as_default, ImageRef};
use maud::{html, Markup};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "_type", rename_all = "camelCase")]
pub enum Block {
    Block(TextBlock),
    Image(ImageRef),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextBlock {
    #[serde(default, deserialize_with = "null_as_default")]
    pub style: Style,
    #[serde(default, rename = "listItem")]
    pub list_item: Option<ListKind>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<Span>,
    #[serde(default, rename = "markDefs", deserialize_with = "null_as_default")]
    pub mark_defs: Vec<MarkDef>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    H1,
    H2,
    H3,
    H4,
    Blockquote,
    #[default]
    Normal,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Bullet,
    Number,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Span {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Decorator names (`strong`, `em`, ...) or keys into `markDefs`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub marks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "_type", rename_all = "camelCase")]
pub enum MarkDef {
    Link {
        #[serde(rename = "_key")]
        key: String,
        #[serde(default, deserialize_with = "null_as_default")]
        href: String,
    },
    #[serde(other)]
    Other,
}

pub fn render(blocks: &[Block]) -> Markup {
    html! {
        @for group in group(blocks) {
            @match group {
                Group::List(kind, items) => { (list(kind, &items)) }
                Group::Text(text) => { (text_block(text)) }
            }
        }
    }
}

enum Group<'a> {
    List(ListKind, Vec<&'a TextBlock>),
    Text(&'a TextBlock),
}

// consecutive list items of the same kind end up in one list
fn group(blocks: &[Block]) -> Vec<Group<'_>> {
    let mut groups = Vec::new();

    for block in blocks {
        let text = match block {
            Block::Block(text) => text,
            Block::Image(_) | Block::Unknown => continue,
        };

        if let (Some(kind), Some(Group::List(current, items))) = (text.list_item, groups.last_mut())
        {
            if *current == kind {
                items.push(text);
                continue;
            }
        }

        groups.push(match text.list_item {
            Some(kind) => Group::List(kind, vec![text]),
            None => Group::Text(text),
        });
    }

    groups
}

fn list(kind: ListKind, items: &[&TextBlock]) -> Markup {
    let items = html! {
        @for item in items {
            li class="ml-4 list-disc" { (spans(item)) }
        }
    };

    match kind {
        ListKind::Number => html! { ol { (items) } },
        ListKind::Bullet | ListKind::Other => html! { ul { (items) } },
    }
}

fn text_block(block: &TextBlock) -> Markup {
    let content = spans(block);

    match block.style {
        Style::H1 => html! { h1 class="text-2xl font-bold my-5" { (content) } },
        Style::H2 => html! { h2 class="text-xl font-bold my-5" { (content) } },
        Style::H3 => html! { h3 { (content) } },
        Style::H4 => html! { h4 { (content) } },
        Style::Blockquote => html! { blockquote { (content) } },
        Style::Normal | Style::Other => html! { p { (content) } },
    }
}

fn spans(block: &TextBlock) -> Markup {
    html! {
        @for span in &block.children {
            (marked_span(span, &block.mark_defs))
        }
    }
}

fn marked_span(span: &Span, mark_defs: &[MarkDef]) -> Markup {
    let mut out = html! { (span.text) };

    for mark in &span.marks {
        out = match mark.as_str() {
            "strong" => html! { strong { (out) } },
            "em" => html! { em { (out) } },
            "code" => html! { code { (out) } },
            "underline" => html! { u { (out) } },
            "strike-through" => html! { s { (out) } },
            key => match link_href(mark_defs, key) {
                Some(href) => html! { a href=(href) class="text-blue-500" { (out) } },
                None => out,
            },
        };
    }

    out
}

/// Links render only for web and mail schemes or relative targets; anything
/// else keeps its text without an anchor.
fn link_href<'a>(mark_defs: &'a [MarkDef], mark: &str) -> Option<&'a str> {
    mark_defs.iter().find_map(|def| match def {
        MarkDef::Link { key, href } if key == mark && is_safe_href(href) => Some(href.as_str()),
        _ => None,
    })
}

fn is_safe_href(href: &str) -> bool {
    let href = href.trim();
    let target_end = href.find(['/', '?', '#']).unwrap_or(href.len());
    match href[..target_end].split_once(':') {
        None => !href.is_empty(),
        Some((scheme, _)) => ["http", "https", "mailto"]
            .iter()
            .any(|allowed| scheme.eq_ignore_ascii_case(allowed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(value: serde_json::Value) -> Vec<Block> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn headings_and_paragraphs() {
        let body = blocks(serde_json::json!([
            { "_type": "block", "style": "h1", "children": [{ "_type": "span", "text": "Title" }] },
            { "_type": "block", "style": "h2", "children": [{ "_type": "span", "text": "Sub" }] },
            { "_type": "block", "style": "normal", "children": [{ "_type": "span", "text": "Body <b>" }] }
        ]));

        assert_eq!(
            render(&body).into_string(),
            "<h1 class=\"text-2xl font-bold my-5\">Title</h1>\
             <h2 class=\"text-xl font-bold my-5\">Sub</h2>\
             <p>Body &lt;b&gt;</p>"
        );
    }

    #[test]
    fn marks_and_links() {
        let body = blocks(serde_json::json!([{
            "_type": "block",
            "children": [
                { "_type": "span", "text": "bold", "marks": ["strong"] },
                { "_type": "span", "text": " and " },
                { "_type": "span", "text": "here", "marks": ["k1"] }
            ],
            "markDefs": [{ "_type": "link", "_key": "k1", "href": "https://example.com" }]
        }]));

        assert_eq!(
            render(&body).into_string(),
            "<p><strong>bold</strong> and <a href=\"https://example.com\" class=\"text-blue-500\">here</a></p>"
        );
    }

    #[test]
    fn script_links_render_as_plain_text() {
        let body = blocks(serde_json::json!([{
            "_type": "block",
            "children": [
                { "_type": "span", "text": "bad", "marks": ["k1"] },
                { "_type": "span", "text": " ", "marks": [] },
                { "_type": "span", "text": "mail", "marks": ["k2"] },
                { "_type": "span", "text": " ", "marks": [] },
                { "_type": "span", "text": "local", "marks": ["k3"] }
            ],
            "markDefs": [
                { "_type": "link", "_key": "k1", "href": " JavaScript:alert(1)" },
                { "_type": "link", "_key": "k2", "href": "mailto:ada@example.com" },
                { "_type": "link", "_key": "k3", "href": "/post/other?at=10:30" }
            ]
        }]));

        assert_eq!(
            render(&body).into_string(),
            "<p>bad <a href=\"mailto:ada@example.com\" class=\"text-blue-500\">mail</a> \
             <a href=\"/post/other?at=10:30\" class=\"text-blue-500\">local</a></p>"
        );
    }

    #[test]
    fn consecutive_list_items_share_a_list() {
        let body = blocks(serde_json::json!([
            { "_type": "block", "listItem": "bullet", "children": [{ "_type": "span", "text": "a" }] },
            { "_type": "block", "listItem": "bullet", "children": [{ "_type": "span", "text": "b" }] },
            { "_type": "block", "listItem": "number", "children": [{ "_type": "span", "text": "c" }] },
            { "_type": "block", "children": [{ "_type": "span", "text": "after" }] }
        ]));

        assert_eq!(
            render(&body).into_string(),
            "<ul><li class=\"ml-4 list-disc\">a</li><li class=\"ml-4 list-disc\">b</li></ul>\
             <ol><li class=\"ml-4 list-disc\">c</li></ol>\
             <p>after</p>"
        );
    }

    #[test]
    fn images_and_unknown_blocks_render_nothing() {
        let body = blocks(serde_json::json!([
            { "_type": "image", "asset": { "_ref": "image-abc-10x10-png" } },
            { "_type": "youtube", "url": "https://example.com/v" }
        ]));

        assert!(matches!(body[0], Block::Image(_)));
        assert_eq!(body[1], Block::Unknown);
        assert_eq!(render(&body).into_string(), "");
    }

    #[test]
    fn unknown_styles_fall_back_to_paragraphs() {
        let body = blocks(serde_json::json!([
            { "_type": "block", "style": "h6", "children": [{ "_type": "span", "text": "x" }] }
        ]));

        assert_eq!(render(&body).into_string(), "<p>x</p>");
    }
}
