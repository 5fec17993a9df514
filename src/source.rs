//! Doc-comment slots of a Java compilation unit.
//!
//! A slot is an existing `/** ... */` comment that documents a type or a
//! member of a type. Comments inside method bodies, initializers and
//! anonymous classes are not slots. Each slot carries the signature of the
//! declaration that follows it, built from the code text up to the first
//! `{`, `;` or `=` outside parentheses.

use crate::lexer::{self, Segment, SegmentKind};
use crate::model::Comment;
use crate::render::JavadocRenderer;
use crate::signature::{find_type_declaration, Signature};
use tracing::trace;

#[derive(Debug)]
struct Slot {
    start: usize,
    end: usize,
    indent: String,
    signature: Option<Signature>,
}

#[derive(Debug)]
enum Frame {
    /// Body of a type declaration. `constants` is set while inside the
    /// constant list of an enum, `annotation` for `@interface` bodies.
    Type {
        path: String,
        constants: bool,
        annotation: bool,
    },
    Block,
}

/// Source text being rewritten slot by slot.
///
/// ```text
/// let mut buf = SourceBuffer::new("com.example", source);
/// while buf.next_comment() {
///     let comment = buf.signature().and_then(|s| doc.get(s));
///     buf.set_comment(comment);
/// }
/// let merged = buf.finish();
/// ```
#[derive(Debug)]
pub struct SourceBuffer<'a> {
    source: &'a str,
    slots: Vec<Slot>,
    current: Option<usize>,
    out: String,
    copied: usize,
    renderer: JavadocRenderer,
}

impl<'a> SourceBuffer<'a> {
    pub fn new(package: &str, source: &'a str) -> Self {
        SourceBuffer {
            source,
            slots: find_slots(package, source),
            current: None,
            out: String::with_capacity(source.len()),
            copied: 0,
            renderer: JavadocRenderer::default(),
        }
    }

    pub fn with_renderer(mut self, renderer: JavadocRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Advance to the next slot. Returns false once every slot was visited.
    pub fn next_comment(&mut self) -> bool {
        let next = self.current.map_or(0, |i| i + 1);
        if next < self.slots.len() {
            self.current = Some(next);
            true
        } else {
            self.current = Some(self.slots.len());
            false
        }
    }

    /// Signature of the declaration after the current slot, when the code
    /// after the comment declares something.
    pub fn signature(&self) -> Option<&Signature> {
        self.slot()?.signature.as_ref()
    }

    /// Original text of the current slot.
    pub fn comment_text(&self) -> Option<&'a str> {
        let slot = self.slot()?;
        Some(&self.source[slot.start..slot.end])
    }

    /// Replace the current slot with `comment`. `None` or a blank comment
    /// leaves the slot as it is.
    pub fn set_comment(&mut self, comment: Option<&Comment>) {
        let Some(comment) = comment.filter(|c| !c.is_blank()) else {
            return;
        };
        let Some(slot) = self.current.and_then(|i| self.slots.get(i)) else {
            return;
        };
        if slot.start < self.copied {
            return;
        }
        let original = &self.source[slot.start..slot.end];
        let rendered = self.renderer.render(comment, original, &slot.indent);
        trace!(signature = %comment.signature, "replacing comment");

        self.out.push_str(&self.source[self.copied..slot.start]);
        self.out.push_str(&rendered);
        self.copied = slot.end;
    }

    /// Number of slots found in the source.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// The merged text: replaced slots plus everything else verbatim.
    pub fn finish(mut self) -> String {
        self.out.push_str(&self.source[self.copied..]);
        self.out
    }

    fn slot(&self) -> Option<&Slot> {
        self.slots.get(self.current?)
    }
}

fn find_slots(package: &str, src: &str) -> Vec<Slot> {
    let segments = lexer::scan(src);
    let mut frames: Vec<Frame> = Vec::new();
    let mut statement = String::new();
    let mut slots = Vec::new();

    for (i, seg) in segments.iter().enumerate() {
        match seg.kind {
            SegmentKind::DocComment => {
                let enclosing = match frames.last() {
                    None => Some((package, false, false)),
                    Some(Frame::Type {
                        path,
                        constants,
                        annotation,
                    }) => Some((path.as_str(), *constants, *annotation)),
                    Some(Frame::Block) => None,
                };
                if let Some((enclosing, constants, annotation)) = enclosing {
                    let header = header_after(src, &segments[i + 1..], constants);
                    slots.push(Slot {
                        start: seg.start,
                        end: seg.end,
                        indent: indent_of(src, seg.start),
                        signature: slot_signature(enclosing, &header, annotation),
                    });
                }
                statement.push(' ');
            }
            SegmentKind::LineComment | SegmentKind::BlockComment => statement.push(' '),
            SegmentKind::Literal => statement.push_str("\"\""),
            SegmentKind::Code => {
                for c in seg.text(src).chars() {
                    match c {
                        '{' => {
                            let frame = open_frame(&frames, package, &statement);
                            frames.push(frame);
                            statement.clear();
                        }
                        '}' => {
                            frames.pop();
                            statement.clear();
                        }
                        ';' => {
                            if let Some(Frame::Type { constants, .. }) = frames.last_mut() {
                                *constants = false;
                            }
                            statement.clear();
                        }
                        c => statement.push(c),
                    }
                }
            }
        }
    }
    slots
}

fn open_frame(frames: &[Frame], package: &str, statement: &str) -> Frame {
    let enclosing = match frames.last() {
        None => package,
        Some(Frame::Type {
            path,
            constants: false,
            ..
        }) => path.as_str(),
        // constant bodies and everything inside code blocks
        Some(_) => return Frame::Block,
    };
    match find_type_declaration(statement) {
        Some((kind, name)) => Frame::Type {
            path: qualify(enclosing, name),
            constants: kind == "enum",
            annotation: kind == "@interface",
        },
        None => Frame::Block,
    }
}

/// Code text of the declaration following a doc comment, with comments
/// blanked out.
fn header_after(src: &str, rest: &[Segment], constants: bool) -> String {
    let mut header = String::new();
    let mut depth = 0usize;

    for seg in rest {
        match seg.kind {
            SegmentKind::DocComment => break,
            SegmentKind::LineComment | SegmentKind::BlockComment => header.push(' '),
            SegmentKind::Literal => header.push_str(seg.text(src)),
            SegmentKind::Code => {
                for c in seg.text(src).chars() {
                    match c {
                        '(' if depth == 0 && constants && !ends_in_annotation(&header) => {
                            return header;
                        }
                        '(' => depth += 1,
                        ')' => depth = depth.saturating_sub(1),
                        ',' if depth == 0 && constants => return header,
                        '{' | ';' | '}' if depth == 0 => return header,
                        '=' if depth == 0 && !constants => return header,
                        _ => {}
                    }
                    header.push(c);
                }
            }
        }
    }
    header
}

fn ends_in_annotation(header: &str) -> bool {
    header
        .split_whitespace()
        .last()
        .is_some_and(|token| token.starts_with('@'))
}

/// Signature of the declaration `header` inside `enclosing`. Elements of an
/// annotation type are keyed without their empty parameter list, the way
/// reference pages declare them.
fn slot_signature(enclosing: &str, header: &str, annotation: bool) -> Option<Signature> {
    let signature = Signature::new(enclosing, header);
    if signature.header().is_empty() {
        return None;
    }
    match signature.declared_type() {
        Some(name) => Some(Signature::new(qualify(enclosing, name), header)),
        None if annotation => Some(signature.without_empty_params()),
        None => Some(signature),
    }
}

fn qualify(enclosing: &str, name: &str) -> String {
    if enclosing.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", enclosing, name)
    }
}

/// Leading whitespace of the line `pos` is on.
fn indent_of(src: &str, pos: usize) -> String {
    let line_start = src[..pos].rfind('\n').map_or(0, |i| i + 1);
    src[line_start..pos]
        .chars()
        .take_while(|c| c.is_whitespace())
        .collect()
}
