//! Tagged definition-list entries of a documentation block.
//!
//! A block's `<dl>` lists block tags as `<dt>` markers followed by one or more
//! `<dd>` details. One classification pass turns them into a flat sequence
//! that the extractors walk without re-inspecting markup.

use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

static SPAN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span").unwrap());

/// What a `<dt>` marker announces, or `Description` for a `<dd>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Param,
    Return,
    Throws,
    Since,
    See,
    Description,
    Other,
}

#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub kind: EntryKind,
    pub element: ElementRef<'a>,
}

/// A marker together with the description entries that follow it.
#[derive(Debug, Clone, Copy)]
pub struct Group<'e, 'a> {
    pub kind: EntryKind,
    pub details: &'e [Entry<'a>],
}

/// Classify the `<dt>`/`<dd>` children of every `<dl>` directly under `block`.
pub fn classify(block: ElementRef<'_>) -> Vec<Entry<'_>> {
    block
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "dl")
        .flat_map(|dl| dl.children().filter_map(ElementRef::wrap))
        .filter_map(|el| {
            let kind = match el.value().name() {
                "dd" => EntryKind::Description,
                "dt" => marker_kind(el),
                _ => return None,
            };
            Some(Entry { kind, element: el })
        })
        .collect()
}

/// Split entries into marker groups. Descriptions with no marker in front of
/// them form an `Other` group.
pub fn group<'e, 'a>(entries: &'e [Entry<'a>]) -> Vec<Group<'e, 'a>> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < entries.len() {
        let (kind, start) = match entries[i].kind {
            EntryKind::Description => (EntryKind::Other, i),
            kind => (kind, i + 1),
        };
        let mut end = start;
        while end < entries.len() && entries[end].kind == EntryKind::Description {
            end += 1;
        }
        groups.push(Group {
            kind,
            details: &entries[start..end],
        });
        i = end.max(i + 1);
    }
    groups
}

fn marker_kind(dt: ElementRef<'_>) -> EntryKind {
    for span in dt.select(&SPAN) {
        for class in span.value().classes() {
            match class {
                "paramLabel" => return EntryKind::Param,
                "returnLabel" => return EntryKind::Return,
                "throwsLabel" => return EntryKind::Throws,
                "simpleTagLabel" => return EntryKind::Since,
                "seeLabel" => return EntryKind::See,
                _ => {}
            }
        }
    }
    EntryKind::Other
}
