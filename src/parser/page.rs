//! Extraction of comments from one Javadoc 8 class page.

use super::entries::{self, EntryKind, Group};
use crate::markup::{format_links, format_reference, text_of};
use crate::model::{Comment, ParamEntry, ThrowsEntry};
use crate::signature::Signature;
use scraper::{ElementRef, Html, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

static CLASS_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.contentContainer div.description ul li").unwrap());

static MEMBER_BLOCK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.contentContainer div.details ul li ul li ul li.blockList").unwrap()
});

static PRE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("pre").unwrap());
static DIV: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div").unwrap());
static CODE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("code").unwrap());
static DEPRECATED_LABEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.deprecatedLabel").unwrap());
static DEPRECATION_COMMENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.deprecationComment").unwrap());
static LINKED_CODE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href] code").unwrap());
static CODE_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("code a[href]").unwrap());

/// Which block tags a documentation block may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Class,
    Member,
}

/// Undo generator quirks before parsing.
pub fn prepare(class_name: &str, html: &str) -> String {
    let mut text = html
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\t', " ")
        .replace('\u{301c}', "\u{ff5e}");
    if matches!(class_name, "java.lang.StringBuffer" | "java.lang.StringBuilder") {
        text = text.replace("%20", "");
    }
    text
}

/// Parse a prepared page and add one comment per documented declaration.
///
/// Declarations whose signatures collide on the page (overloads whose
/// parameter types differ only by package) are left out, since neither
/// comment can be told apart from the other in source.
pub fn extract(class_name: &str, html: &str, comments: &mut HashMap<Signature, Comment>) {
    let document = Html::parse_document(html);

    let class_comment = document
        .select(&CLASS_BLOCK)
        .next()
        .and_then(|block| block_comment(class_name, block, Scope::Class));
    let member_comments = document
        .select(&MEMBER_BLOCK)
        .filter_map(|block| block_comment(class_name, block, Scope::Member));

    let mut page: HashMap<Signature, Comment> = HashMap::new();
    let mut ambiguous: HashSet<Signature> = HashSet::new();
    for comment in class_comment.into_iter().chain(member_comments) {
        let signature = comment.signature.clone();
        if ambiguous.contains(&signature) {
            continue;
        }
        if page.insert(signature.clone(), comment).is_some() {
            debug!(%signature, "ambiguous overloads, skipping");
            page.remove(&signature);
            ambiguous.insert(signature);
        }
    }
    comments.extend(page);
}

fn block_comment(class_name: &str, block: ElementRef<'_>, scope: Scope) -> Option<Comment> {
    let Some(pre) = block.select(&PRE).next() else {
        debug!(class = class_name, ?scope, "block without declaration header");
        return None;
    };
    let signature = Signature::new(class_name, &pre.inner_html());
    let mut comment = Comment::new(signature);

    describe(class_name, block, &mut comment);

    let entries = entries::classify(block);
    for group in entries::group(&entries) {
        apply(class_name, group, scope, &mut comment);
    }
    debug!(signature = %comment.signature, "parsed");
    Some(comment)
}

/// Deprecation note if the block is deprecated, else the main description.
fn describe(class_name: &str, block: ElementRef<'_>, comment: &mut Comment) {
    let divs: Vec<ElementRef<'_>> = block.select(&DIV).collect();

    if let Some(div) = divs
        .iter()
        .find(|div| div.select(&DEPRECATED_LABEL).next().is_some())
    {
        let note = div
            .select(&DEPRECATION_COMMENT)
            .next()
            .map(|span| format_links(&span.inner_html(), class_name))
            .unwrap_or_default();
        comment.deprecated = Some(note);
        return;
    }

    if let Some(div) = divs.last() {
        let body = format_links(&div.inner_html(), class_name);
        if !body.is_empty() {
            comment.body = Some(body);
        }
    }
}

fn apply(class_name: &str, group: Group<'_, '_>, scope: Scope, comment: &mut Comment) {
    let first = group.details.first().map(|entry| entry.element);
    match (group.kind, scope) {
        (EntryKind::Since, _) => {
            if let Some(dd) = first {
                comment.since.push(text_of(dd));
            }
        }
        (EntryKind::See, _) => {
            if let Some(dd) = first {
                comment.see.extend(see_entries(class_name, dd));
            }
        }
        (EntryKind::Param, Scope::Member) => {
            comment
                .params
                .extend(group.details.iter().filter_map(|e| param_entry(class_name, e.element)));
        }
        (EntryKind::Return, Scope::Member) => {
            if let Some(dd) = first {
                comment.returns.push(format_links(&dd.inner_html(), class_name));
            }
        }
        (EntryKind::Throws, Scope::Member) => {
            comment
                .throws
                .extend(group.details.iter().filter_map(|e| throws_entry(class_name, e.element)));
        }
        _ => {}
    }
}

/// `<code>name</code> - description`
fn param_entry(class_name: &str, dd: ElementRef<'_>) -> Option<ParamEntry> {
    let name = text_of(dd.select(&CODE).next()?);
    if name.is_empty() {
        return None;
    }
    Some(ParamEntry {
        name,
        description: after_separator(class_name, dd),
    })
}

/// `<code><a href="...">Exception</a></code> - description`
fn throws_entry(class_name: &str, dd: ElementRef<'_>) -> Option<ThrowsEntry> {
    let href = dd.select(&CODE_LINK).next()?.value().attr("href")?;
    Some(ThrowsEntry {
        reference: format_reference(class_name, href),
        description: after_separator(class_name, dd),
    })
}

fn after_separator(class_name: &str, dd: ElementRef<'_>) -> String {
    let html = dd.inner_html();
    match html.split_once(" - ") {
        Some((_, description)) => format_links(description, class_name),
        None => String::new(),
    }
}

/// Every code-styled link under a "See Also" entry: a resolved reference for
/// a plain-text run, the link's markup otherwise.
fn see_entries(class_name: &str, dd: ElementRef<'_>) -> Vec<String> {
    let mut see = Vec::new();
    for code in dd.select(&LINKED_CODE) {
        let Some(link) = code.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        if link.value().name() != "a" {
            continue;
        }
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let mut children = code.children();
        let plain = matches!(
            (children.next(), children.next()),
            (Some(only), None) if only.value().is_text()
        );
        if plain {
            see.push(format_reference(class_name, href));
        } else {
            see.push(link.html());
        }
    }
    see
}
