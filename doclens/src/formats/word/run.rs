//! Paragraph content, run and run content lenses
//!
//! Runs become spans whose `style` carries the CSS view of `w:rPr`. Text nodes have no `id`,
//! so the text of a run is matched to its `w:t` elements by position instead.

use super::context::WordContext;
use super::properties::{apply_run_style, move_to_front, run_style};
use crate::bdt::container_get;
use crate::dom::names::*;
use crate::dom::NodeId;
use crate::html::{class_of, TAB_CLASS};
use crate::lens::Lens;
use crate::normalize::InlineStyle;

/// Dispatcher over the children of `w:p`.
pub struct ParagraphContentLens;

fn anchor_of_href(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|anchor| !anchor.is_empty())
}

impl Lens<WordContext> for ParagraphContentLens {
    fn is_visible(&self, ctx: &mut WordContext, concrete: NodeId) -> bool {
        match ctx.concrete_doc.tag(concrete) {
            WORD_R => true,
            WORD_HYPERLINK => ctx.concrete_doc.has_attribute(concrete, WORD_ANCHOR),
            _ => false,
        }
    }

    fn get(&self, ctx: &mut WordContext, concrete: NodeId) -> Option<NodeId> {
        match ctx.concrete_doc.tag(concrete) {
            WORD_R => RunLens.get(ctx, concrete),
            WORD_HYPERLINK => {
                let anchor = ctx.concrete_doc.get_attribute(concrete, WORD_ANCHOR)?.to_string();
                let link = ctx.abstract_doc.create_element(HTML_A);
                ctx.abstract_doc
                    .set_attribute(link, HTML_HREF, format!("#{anchor}"));
                ctx.assign_id(link, concrete);
                container_get(ctx, &RunLens, link, concrete);
                Some(link)
            }
            _ => None,
        }
    }

    fn create(&self, ctx: &mut WordContext, abstract_node: NodeId) -> Option<NodeId> {
        let doc = &ctx.abstract_doc;
        match doc.tag(abstract_node) {
            HTML_SPAN => RunLens.create(ctx, abstract_node),
            HTML_A => {
                let anchor = doc
                    .get_attribute(abstract_node, HTML_HREF)
                    .and_then(anchor_of_href)?
                    .to_string();
                let link = ctx.concrete_doc.create_element(WORD_HYPERLINK);
                ctx.concrete_doc.set_attribute(link, WORD_ANCHOR, anchor);
                self.put(ctx, abstract_node, link);
                Some(link)
            }
            _ => None,
        }
    }

    fn put(&self, ctx: &mut WordContext, abstract_node: NodeId, concrete: NodeId) {
        match ctx.concrete_doc.tag(concrete) {
            WORD_R => RunLens.put(ctx, abstract_node, concrete),
            WORD_HYPERLINK => {
                let anchor = ctx
                    .abstract_doc
                    .get_attribute(abstract_node, HTML_HREF)
                    .and_then(anchor_of_href)
                    .map(str::to_string);
                if let Some(anchor) = anchor {
                    if ctx.concrete_doc.get_attribute(concrete, WORD_ANCHOR) != Some(anchor.as_str()) {
                        ctx.concrete_doc.set_attribute(concrete, WORD_ANCHOR, anchor);
                    }
                }
                ctx.put_children(&RunLens, abstract_node, concrete);
            }
            _ => {}
        }
    }
}

/// `w:r` ↔ `span`.
pub struct RunLens;

impl Lens<WordContext> for RunLens {
    fn is_visible(&self, ctx: &mut WordContext, concrete: NodeId) -> bool {
        ctx.concrete_doc.tag(concrete) == WORD_R
    }

    fn get(&self, ctx: &mut WordContext, concrete: NodeId) -> Option<NodeId> {
        let span = ctx.abstract_doc.create_element(HTML_SPAN);
        let style = run_style(&ctx.concrete_doc, concrete);
        if !style.is_empty() {
            ctx.abstract_doc
                .set_attribute(span, HTML_STYLE, style.to_string());
        }
        ctx.assign_id(span, concrete);
        container_get(ctx, &RunContentLens, span, concrete);
        Some(span)
    }

    fn create(&self, ctx: &mut WordContext, abstract_node: NodeId) -> Option<NodeId> {
        if ctx.abstract_doc.tag(abstract_node) != HTML_SPAN {
            return None;
        }
        let run = ctx.concrete_doc.create_element(WORD_R);
        self.put(ctx, abstract_node, run);
        Some(run)
    }

    fn put(&self, ctx: &mut WordContext, abstract_node: NodeId, concrete: NodeId) {
        let style = InlineStyle::parse(
            ctx.abstract_doc
                .get_attribute(abstract_node, HTML_STYLE)
                .unwrap_or_default(),
        );
        apply_run_style(&mut ctx.concrete_doc, concrete, &style);

        let texts: Vec<NodeId> = ctx
            .concrete_doc
            .children(concrete)
            .iter()
            .copied()
            .filter(|c| ctx.concrete_doc.tag(*c) == WORD_T)
            .collect();
        let mut next_text = texts.iter().copied();
        ctx.put_children_with(&RunContentLens, abstract_node, concrete, |ctx, node| {
            if ctx.abstract_doc.is_text(node) {
                next_text.next()
            } else {
                ctx.lookup(node)
            }
        });
        move_to_front(&mut ctx.concrete_doc, concrete, WORD_RPR);
    }
}

/// Children of `w:r`: text, untyped breaks and tabs.
pub struct RunContentLens;

impl Lens<WordContext> for RunContentLens {
    fn is_visible(&self, ctx: &mut WordContext, concrete: NodeId) -> bool {
        let doc = &ctx.concrete_doc;
        match doc.tag(concrete) {
            WORD_T | WORD_TAB => true,
            WORD_BR => !matches!(
                doc.get_attribute(concrete, WORD_TYPE),
                Some(kind) if kind != "textWrapping"
            ),
            _ => false,
        }
    }

    fn get(&self, ctx: &mut WordContext, concrete: NodeId) -> Option<NodeId> {
        match ctx.concrete_doc.tag(concrete) {
            WORD_T => {
                let text = ctx.concrete_doc.text_content(concrete);
                Some(ctx.abstract_doc.create_text(text))
            }
            WORD_BR => {
                let br = ctx.abstract_doc.create_element(HTML_BR);
                ctx.assign_id(br, concrete);
                Some(br)
            }
            WORD_TAB => {
                let tab = ctx.abstract_doc.create_element(HTML_SPAN);
                ctx.abstract_doc.set_attribute(tab, HTML_CLASS, TAB_CLASS);
                ctx.assign_id(tab, concrete);
                Some(tab)
            }
            _ => None,
        }
    }

    fn create(&self, ctx: &mut WordContext, abstract_node: NodeId) -> Option<NodeId> {
        let doc = &ctx.abstract_doc;
        let concrete = match doc.tag(abstract_node) {
            TEXT => ctx.concrete_doc.create_element(WORD_T),
            HTML_BR => ctx.concrete_doc.create_element(WORD_BR),
            HTML_SPAN if class_of(doc, abstract_node) == Some(TAB_CLASS) => {
                ctx.concrete_doc.create_element(WORD_TAB)
            }
            _ => return None,
        };
        self.put(ctx, abstract_node, concrete);
        Some(concrete)
    }

    fn put(&self, ctx: &mut WordContext, abstract_node: NodeId, concrete: NodeId) {
        if ctx.concrete_doc.tag(concrete) != WORD_T {
            return;
        }
        let Some(text) = ctx.abstract_doc.value(abstract_node).map(str::to_string) else {
            return;
        };
        if ctx.concrete_doc.text_content(concrete) != text {
            ctx.concrete_doc.set_text_content(concrete, &text);
        }
        let needs_preserve = text.trim() != text;
        if needs_preserve && !ctx.concrete_doc.has_attribute(concrete, XML_SPACE) {
            ctx.concrete_doc
                .set_attribute(concrete, XML_SPACE, "preserve");
        }
    }
}
