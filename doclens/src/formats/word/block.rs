//! Body and paragraph lenses
//!
//! `w:body` holds paragraphs, tables and section properties. Only paragraphs have an abstract
//! counterpart; tables, `w:sectPr` and bookmarks stay invisible, which pins them in place
//! relative to the paragraphs around them.

use super::context::WordContext;
use super::properties::{heading_level_of_style, move_to_front, paragraph_style, set_paragraph_style};
use super::run::ParagraphContentLens;
use crate::bdt::container_get;
use crate::dom::names::*;
use crate::dom::NodeId;
use crate::html::{class_of, heading_level, heading_tag, is_paragraph_tag, SPECIAL_CLASS_PREFIX};
use crate::lens::Lens;

/// `w:body` ↔ `body`.
pub struct BodyLens;

impl Lens<WordContext> for BodyLens {
    fn is_visible(&self, ctx: &mut WordContext, concrete: NodeId) -> bool {
        ctx.concrete_doc.tag(concrete) == WORD_BODY
    }

    fn get(&self, ctx: &mut WordContext, concrete: NodeId) -> Option<NodeId> {
        let body = ctx.abstract_doc.create_element(HTML_BODY);
        ctx.assign_id(body, concrete);
        container_get(ctx, &BlockLens, body, concrete);
        Some(body)
    }

    fn create(&self, ctx: &mut WordContext, abstract_node: NodeId) -> Option<NodeId> {
        if ctx.abstract_doc.tag(abstract_node) != HTML_BODY {
            return None;
        }
        let body = ctx.concrete_doc.create_element(WORD_BODY);
        self.put(ctx, abstract_node, body);
        Some(body)
    }

    fn put(&self, ctx: &mut WordContext, abstract_node: NodeId, concrete: NodeId) {
        ctx.put_children(&BlockLens, abstract_node, concrete);
    }
}

/// Dispatcher over the children of `w:body`.
pub struct BlockLens;

impl Lens<WordContext> for BlockLens {
    fn is_visible(&self, ctx: &mut WordContext, concrete: NodeId) -> bool {
        ctx.concrete_doc.tag(concrete) == WORD_P
    }

    fn get(&self, ctx: &mut WordContext, concrete: NodeId) -> Option<NodeId> {
        match ctx.concrete_doc.tag(concrete) {
            WORD_P => ParagraphLens.get(ctx, concrete),
            _ => None,
        }
    }

    fn create(&self, ctx: &mut WordContext, abstract_node: NodeId) -> Option<NodeId> {
        if is_paragraph_tag(ctx.abstract_doc.tag(abstract_node)) {
            ParagraphLens.create(ctx, abstract_node)
        } else {
            None
        }
    }

    fn put(&self, ctx: &mut WordContext, abstract_node: NodeId, concrete: NodeId) {
        if ctx.concrete_doc.tag(concrete) == WORD_P {
            ParagraphLens.put(ctx, abstract_node, concrete);
        }
    }
}

/// `w:p` ↔ `p` or `h1`..`h6`.
pub struct ParagraphLens;

impl ParagraphLens {
    /// The `w:pStyle` value an abstract paragraph asks for.
    fn desired_style(ctx: &WordContext, abstract_node: NodeId, concrete: NodeId) -> Option<String> {
        let current = paragraph_style(&ctx.concrete_doc, concrete);
        match heading_level(ctx.abstract_doc.tag(abstract_node)) {
            Some(level) if current.and_then(heading_level_of_style) == Some(level) => {
                current.map(str::to_string)
            }
            Some(level) => Some(format!("Heading{level}")),
            None => class_of(&ctx.abstract_doc, abstract_node)
                .filter(|c| !c.starts_with(SPECIAL_CLASS_PREFIX))
                .map(str::to_string),
        }
    }
}

impl Lens<WordContext> for ParagraphLens {
    fn is_visible(&self, ctx: &mut WordContext, concrete: NodeId) -> bool {
        ctx.concrete_doc.tag(concrete) == WORD_P
    }

    fn get(&self, ctx: &mut WordContext, concrete: NodeId) -> Option<NodeId> {
        let style = paragraph_style(&ctx.concrete_doc, concrete).map(str::to_string);
        let heading = style
            .as_deref()
            .and_then(heading_level_of_style)
            .and_then(heading_tag);

        let paragraph = ctx.abstract_doc.create_element(heading.unwrap_or(HTML_P));
        if let (None, Some(class)) = (heading, style) {
            ctx.abstract_doc.set_attribute(paragraph, HTML_CLASS, class);
        }
        ctx.assign_id(paragraph, concrete);

        container_get(ctx, &ParagraphContentLens, paragraph, concrete);
        if ctx.abstract_doc.children(paragraph).is_empty() {
            ctx.abstract_doc.append_element(paragraph, HTML_BR);
        }
        Some(paragraph)
    }

    fn create(&self, ctx: &mut WordContext, abstract_node: NodeId) -> Option<NodeId> {
        let paragraph = ctx.concrete_doc.create_element(WORD_P);
        self.put(ctx, abstract_node, paragraph);
        Some(paragraph)
    }

    fn put(&self, ctx: &mut WordContext, abstract_node: NodeId, concrete: NodeId) {
        let style = Self::desired_style(ctx, abstract_node, concrete);
        set_paragraph_style(&mut ctx.concrete_doc, concrete, style.as_deref());
        ctx.put_children(&ParagraphContentLens, abstract_node, concrete);
        move_to_front(&mut ctx.concrete_doc, concrete, WORD_PPR);
    }
}
