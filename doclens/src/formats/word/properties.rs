//! Paragraph and run properties (`w:pPr`, `w:rPr`)
//!
//! Only the properties with a CSS counterpart are read or written. Anything else found in a
//! properties element (fonts, spacing, language, revision marks) is left exactly where it is,
//! and a property is only rewritten when its CSS value actually changed, so a round trip
//! through the abstract tree does not disturb the source markup.

use crate::dom::names::*;
use crate::dom::{Document, NodeId, Tag};
use crate::normalize::style::{COLOR, FONT_SIZE, VERTICAL_ALIGN};
use crate::normalize::InlineStyle;
use tracing::debug;

/// Schema order of the run properties this module writes.
const RUN_PROPERTY_ORDER: &[Tag] = &[WORD_B, WORD_I, WORD_STRIKE, WORD_COLOR, WORD_SZ, WORD_U, WORD_VERTALIGN];

/// Move the `tag` child of `parent` (a `w:pPr` or `w:rPr`) back to the front. Content the
/// engine places before a trailing hidden node can end up ahead of it.
pub fn move_to_front(doc: &mut Document, parent: NodeId, tag: Tag) {
    let Some(properties) = doc.child_with_tag(parent, tag) else {
        return;
    };
    let first = doc.first_child(parent);
    if first != Some(properties) {
        doc.insert_before(parent, properties, first);
    }
}

pub fn paragraph_style(doc: &Document, paragraph: NodeId) -> Option<&str> {
    let ppr = doc.child_with_tag(paragraph, WORD_PPR)?;
    let pstyle = doc.child_with_tag(ppr, WORD_PSTYLE)?;
    doc.get_attribute(pstyle, WORD_VAL)
}

/// `Heading2`, `heading 2` → 2.
pub fn heading_level_of_style(style: &str) -> Option<u8> {
    let lower = style.to_ascii_lowercase();
    let level: u8 = lower.strip_prefix("heading")?.trim().parse().ok()?;
    (1..=6).contains(&level).then_some(level)
}

/// Set or clear `w:pPr/w:pStyle`. A `w:pPr` emptied by clearing the style is removed.
pub fn set_paragraph_style(doc: &mut Document, paragraph: NodeId, style: Option<&str>) {
    if paragraph_style(doc, paragraph) == style {
        return;
    }
    let ppr = doc.child_with_tag(paragraph, WORD_PPR);
    match style {
        Some(value) => {
            let ppr = match ppr {
                Some(ppr) => ppr,
                None => {
                    let ppr = doc.create_element(WORD_PPR);
                    let first = doc.first_child(paragraph);
                    doc.insert_before(paragraph, ppr, first);
                    ppr
                }
            };
            let pstyle = match doc.child_with_tag(ppr, WORD_PSTYLE) {
                Some(pstyle) => pstyle,
                None => {
                    let pstyle = doc.create_element(WORD_PSTYLE);
                    let first = doc.first_child(ppr);
                    doc.insert_before(ppr, pstyle, first);
                    pstyle
                }
            };
            doc.set_attribute(pstyle, WORD_VAL, value);
        }
        None => {
            let Some(ppr) = ppr else {
                return;
            };
            if let Some(pstyle) = doc.child_with_tag(ppr, WORD_PSTYLE) {
                doc.remove_node(pstyle);
            }
            remove_if_empty(doc, ppr);
        }
    }
}

fn remove_if_empty(doc: &mut Document, node: NodeId) {
    if doc.children(node).is_empty() && doc.attributes(node).is_empty() {
        doc.remove_node(node);
    }
}

/// `w:b`, `w:i` and `w:strike` are on unless `w:val` turns them off.
fn toggle_is_on(doc: &Document, node: NodeId) -> bool {
    match doc.get_attribute(node, WORD_VAL) {
        None => true,
        Some(value) => !matches!(value.to_ascii_lowercase().as_str(), "0" | "false" | "off"),
    }
}

pub fn half_points_to_css(half_points: u32) -> String {
    if half_points % 2 == 0 {
        format!("{}pt", half_points / 2)
    } else {
        format!("{}.5pt", half_points / 2)
    }
}

pub fn css_to_half_points(value: &str) -> Option<u32> {
    let points: f64 = value.trim().strip_suffix("pt")?.trim().parse().ok()?;
    let half_points = (points * 2.0).round();
    (half_points.is_finite() && half_points >= 1.0 && half_points <= f64::from(u32::MAX))
        .then_some(half_points as u32)
}

fn vertical_align_to_css(value: &str) -> Option<&'static str> {
    match value {
        "superscript" => Some("super"),
        "subscript" => Some("sub"),
        _ => None,
    }
}

fn css_to_vertical_align(value: &str) -> Option<&'static str> {
    match value.trim().to_ascii_lowercase().as_str() {
        "super" => Some("superscript"),
        "sub" => Some("subscript"),
        _ => None,
    }
}

/// CSS view of a run's `w:rPr`.
pub fn run_style(doc: &Document, run: NodeId) -> InlineStyle {
    let mut style = InlineStyle::new();
    let Some(rpr) = doc.child_with_tag(run, WORD_RPR) else {
        return style;
    };
    for prop in doc.children(rpr).iter().copied() {
        let val = doc.get_attribute(prop, WORD_VAL);
        match doc.tag(prop) {
            WORD_B if toggle_is_on(doc, prop) => style.set_bold(true),
            WORD_I if toggle_is_on(doc, prop) => style.set_italic(true),
            WORD_STRIKE if toggle_is_on(doc, prop) => style.set_decoration("line-through", true),
            WORD_U if val != Some("none") => style.set_decoration("underline", true),
            WORD_COLOR => {
                if let Some(color) = val.filter(|v| !v.eq_ignore_ascii_case("auto")) {
                    style.set(COLOR, format!("#{color}"));
                }
            }
            WORD_SZ => {
                if let Some(size) = val.and_then(|v| v.parse::<u32>().ok()) {
                    style.set(FONT_SIZE, half_points_to_css(size));
                }
            }
            WORD_VERTALIGN => {
                if let Some(align) = val.and_then(vertical_align_to_css) {
                    style.set(VERTICAL_ALIGN, align);
                }
            }
            _ => {}
        }
    }
    style
}

fn same_value(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.trim().eq_ignore_ascii_case(b.trim()),
        (None, None) => true,
        _ => false,
    }
}

struct RunProperties {
    run: NodeId,
    rpr: Option<NodeId>,
    touched: bool,
}

impl RunProperties {
    fn new(doc: &Document, run: NodeId) -> Self {
        RunProperties {
            run,
            rpr: doc.child_with_tag(run, WORD_RPR),
            touched: false,
        }
    }

    fn rpr(&mut self, doc: &mut Document) -> NodeId {
        if let Some(rpr) = self.rpr {
            return rpr;
        }
        let rpr = doc.create_element(WORD_RPR);
        let first = doc.first_child(self.run);
        doc.insert_before(self.run, rpr, first);
        self.rpr = Some(rpr);
        rpr
    }

    /// The property element for `tag`, created at its schema position if missing.
    fn property(&mut self, doc: &mut Document, tag: Tag) -> NodeId {
        self.touched = true;
        let rpr = self.rpr(doc);
        if let Some(existing) = doc.child_with_tag(rpr, tag) {
            return existing;
        }
        let rank = RUN_PROPERTY_ORDER.iter().position(|t| *t == tag);
        let before = doc.children(rpr).iter().copied().find(|child| {
            let child_rank = RUN_PROPERTY_ORDER.iter().position(|t| *t == doc.tag(*child));
            matches!((rank, child_rank), (Some(r), Some(c)) if c > r)
        });
        let prop = doc.create_element(tag);
        doc.insert_before(rpr, prop, before);
        prop
    }

    fn remove(&mut self, doc: &mut Document, tag: Tag) {
        let Some(rpr) = self.rpr else {
            return;
        };
        self.touched = true;
        let matching: Vec<NodeId> = doc
            .children(rpr)
            .iter()
            .copied()
            .filter(|c| doc.tag(*c) == tag)
            .collect();
        for node in matching {
            doc.remove_node(node);
        }
    }

    fn set_toggle(&mut self, doc: &mut Document, tag: Tag, on: bool) {
        if on {
            let prop = self.property(doc, tag);
            doc.remove_attribute(prop, WORD_VAL);
        } else {
            self.remove(doc, tag);
        }
    }

    fn set_value(&mut self, doc: &mut Document, tag: Tag, value: Option<&str>) {
        match value {
            Some(value) => {
                let prop = self.property(doc, tag);
                doc.set_attribute(prop, WORD_VAL, value);
            }
            None => self.remove(doc, tag),
        }
    }

    fn finish(self, doc: &mut Document) {
        if let (true, Some(rpr)) = (self.touched, self.rpr) {
            remove_if_empty(doc, rpr);
        }
    }
}

/// Rewrite the properties of `run` whose CSS value differs from `desired`.
pub fn apply_run_style(doc: &mut Document, run: NodeId, desired: &InlineStyle) {
    let current = run_style(doc, run);
    let mut props = RunProperties::new(doc, run);

    let toggles = [
        (WORD_B, current.is_bold(), desired.is_bold()),
        (WORD_I, current.is_italic(), desired.is_italic()),
        (
            WORD_STRIKE,
            current.has_decoration("line-through"),
            desired.has_decoration("line-through"),
        ),
    ];
    for (tag, now, wanted) in toggles {
        if now != wanted {
            props.set_toggle(doc, tag, wanted);
        }
    }

    let underline = desired.has_decoration("underline");
    if current.has_decoration("underline") != underline {
        props.set_value(doc, WORD_U, underline.then_some("single"));
    }

    let color = desired.get(COLOR).map(|c| c.trim().trim_start_matches('#').to_ascii_uppercase());
    if !same_value(current.get(COLOR).map(|c| c.trim_start_matches('#')), color.as_deref()) {
        props.set_value(doc, WORD_COLOR, color.as_deref());
    }

    let size = match desired.get(FONT_SIZE) {
        Some(css) => match css_to_half_points(css) {
            Some(half_points) => Some(half_points.to_string()),
            None => {
                debug!(value = css, "font-size not expressible in half points, left alone");
                current.get(FONT_SIZE).and_then(css_to_half_points).map(|h| h.to_string())
            }
        },
        None => None,
    };
    let current_size = current.get(FONT_SIZE).and_then(css_to_half_points).map(|h| h.to_string());
    if current_size != size {
        props.set_value(doc, WORD_SZ, size.as_deref());
    }

    let align = desired.get(VERTICAL_ALIGN).and_then(css_to_vertical_align);
    let current_align = current.get(VERTICAL_ALIGN).and_then(css_to_vertical_align);
    if current_align != align {
        props.set_value(doc, WORD_VERTALIGN, align);
    }

    props.finish(doc);
}
