//! Comment-aware segmentation of Java source text.
//!
//! Splits source into code, literal and comment segments with a small state
//! machine. Both the class-header locator and the slot scanner work on these
//! segments, so a `{` or `;` inside a string or comment never counts as code.

/// Kind of a contiguous run of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Code,
    /// String, character or text-block literal, quotes included.
    Literal,
    LineComment,
    BlockComment,
    /// `/** ... */`
    DocComment,
}

/// A byte range of the source with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.start..self.end]
    }
}

#[derive(Clone, Copy)]
enum State {
    Code,
    LineComment,
    BlockComment { doc: bool },
    Literal { quote: u8 },
    TextBlock,
}

impl State {
    fn kind(self) -> SegmentKind {
        match self {
            State::Code => SegmentKind::Code,
            State::LineComment => SegmentKind::LineComment,
            State::BlockComment { doc: true } => SegmentKind::DocComment,
            State::BlockComment { doc: false } => SegmentKind::BlockComment,
            State::Literal { .. } | State::TextBlock => SegmentKind::Literal,
        }
    }
}

/// Split `src` into segments covering the whole input in order.
pub fn scan(src: &str) -> Vec<Segment> {
    let bytes = src.as_bytes();
    let len = bytes.len();
    let mut segments = Vec::new();
    let mut state = State::Code;
    let mut start = 0;
    let mut i = 0;

    let mut push = |kind: SegmentKind, start: usize, end: usize| {
        let end = end.min(len);
        if start < end {
            segments.push(Segment { kind, start, end });
        }
    };

    while i < len {
        let next = bytes.get(i + 1).copied();
        match state {
            State::Code => match (bytes[i], next) {
                (b'/', Some(b'/')) => {
                    push(SegmentKind::Code, start, i);
                    start = i;
                    state = State::LineComment;
                    i += 2;
                }
                (b'/', Some(b'*')) => {
                    push(SegmentKind::Code, start, i);
                    start = i;
                    // `/**/` is an empty block comment, not a doc comment
                    let doc = bytes.get(i + 2) == Some(&b'*') && bytes.get(i + 3) != Some(&b'/');
                    state = State::BlockComment { doc };
                    i += if doc { 3 } else { 2 };
                }
                (b'"', _) if bytes[i..].starts_with(b"\"\"\"") => {
                    push(SegmentKind::Code, start, i);
                    start = i;
                    state = State::TextBlock;
                    i += 3;
                }
                (quote @ (b'"' | b'\''), _) => {
                    push(SegmentKind::Code, start, i);
                    start = i;
                    state = State::Literal { quote };
                    i += 1;
                }
                _ => i += 1,
            },
            State::LineComment => {
                // The newline itself stays with the following code.
                if bytes[i] == b'\n' {
                    push(SegmentKind::LineComment, start, i);
                    start = i;
                    state = State::Code;
                }
                i += 1;
            }
            State::BlockComment { .. } => {
                if bytes[i] == b'*' && next == Some(b'/') {
                    push(state.kind(), start, i + 2);
                    i += 2;
                    start = i;
                    state = State::Code;
                } else {
                    i += 1;
                }
            }
            State::Literal { quote } => match bytes[i] {
                b'\\' => i += 2,
                b'\n' => {
                    // Unterminated literal: give up at end of line.
                    push(SegmentKind::Literal, start, i);
                    start = i;
                    state = State::Code;
                }
                b if b == quote => {
                    push(SegmentKind::Literal, start, i + 1);
                    i += 1;
                    start = i;
                    state = State::Code;
                }
                _ => i += 1,
            },
            State::TextBlock => {
                if bytes[i] == b'\\' {
                    i += 2;
                } else if bytes[i..].starts_with(b"\"\"\"") {
                    push(SegmentKind::Literal, start, i + 3);
                    i += 3;
                    start = i;
                    state = State::Code;
                } else {
                    i += 1;
                }
            }
        }
    }
    push(state.kind(), start, len);

    segments
}

/// Remove line and block comments (doc comments included) from `src`.
///
/// Block comments become a single space so tokens on either side stay apart.
pub fn strip_comments(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    for seg in scan(src) {
        match seg.kind {
            SegmentKind::Code | SegmentKind::Literal => out.push_str(seg.text(src)),
            SegmentKind::BlockComment | SegmentKind::DocComment => out.push(' '),
            SegmentKind::LineComment => {}
        }
    }
    out
}
