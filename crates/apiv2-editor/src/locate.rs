//! Source spans of JSON values and object keys
//!
//! [`locate`] scans JSON text once and records, for every value and every
//! object key, its byte range keyed by [`JsonPath`]. Diagnostics use it to
//! anchor validation errors in the text.

use ahash::AHashMap;
use apiv2_schema::{JsonPath, PathSegment};

/// Byte range in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanMap {
    /// Path -> span of the value
    pub value: AHashMap<JsonPath, Span>,
    /// Path of a member -> span of its key, quotes included
    pub key: AHashMap<JsonPath, Span>,
}

impl SpanMap {
    pub fn record_value(&mut self, path: JsonPath, span: Span) {
        self.value.insert(path, span);
    }

    pub fn record_key(&mut self, path: JsonPath, span: Span) {
        self.key.insert(path, span);
    }

    pub fn value_span(&self, path: &JsonPath) -> Option<Span> {
        self.value.get(path).copied()
    }

    pub fn key_span(&self, path: &JsonPath) -> Option<Span> {
        self.key.get(path).copied()
    }

    /// Span of the value at `path`, or of its closest located ancestor.
    pub fn nearest_value_span(&self, path: &JsonPath) -> Option<Span> {
        let segments = path.segments();
        (0..=segments.len())
            .rev()
            .find_map(|len| self.value_span(&JsonPath::from(segments[..len].to_vec())))
    }
}

/// Record the spans of every value and key in `text`.
///
/// Scanning stops at the first byte that cannot continue a JSON document;
/// everything located before it is kept.
pub fn locate(text: &str) -> SpanMap {
    let mut locator = Locator {
        text,
        bytes: text.as_bytes(),
        pos: 0,
        path: Vec::new(),
        spans: SpanMap::default(),
    };
    let _ = locator.scan_value();
    locator.spans
}

/// Marker for text that is not JSON.
struct Malformed;

struct Locator<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    path: Vec<PathSegment>,
    spans: SpanMap,
}

impl Locator<'_> {
    fn scan_value(&mut self) -> Result<(), Malformed> {
        self.skip_whitespace();
        let start = self.pos;
        match self.peek().ok_or(Malformed)? {
            b'{' => self.scan_object()?,
            b'[' => self.scan_array()?,
            b'"' => self.scan_string()?,
            _ => self.scan_scalar()?,
        }
        self.spans
            .record_value(JsonPath::from(self.path.clone()), Span::new(start, self.pos));
        Ok(())
    }

    fn scan_object(&mut self) -> Result<(), Malformed> {
        self.pos += 1;
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(());
        }
        loop {
            self.skip_whitespace();
            let key_start = self.pos;
            self.scan_string()?;
            let key_span = Span::new(key_start, self.pos);
            let key: String =
                serde_json::from_str(&self.text[key_start..self.pos]).map_err(|_| Malformed)?;

            self.skip_whitespace();
            self.expect(b':')?;

            self.path.push(PathSegment::Key(key));
            self.spans
                .record_key(JsonPath::from(self.path.clone()), key_span);
            self.scan_value()?;
            self.path.pop();

            self.skip_whitespace();
            match self.bump().ok_or(Malformed)? {
                b',' => continue,
                b'}' => return Ok(()),
                _ => return Err(Malformed),
            }
        }
    }

    fn scan_array(&mut self) -> Result<(), Malformed> {
        self.pos += 1;
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(());
        }
        let mut index = 0;
        loop {
            self.path.push(PathSegment::Index(index));
            self.scan_value()?;
            self.path.pop();
            index += 1;

            self.skip_whitespace();
            match self.bump().ok_or(Malformed)? {
                b',' => continue,
                b']' => return Ok(()),
                _ => return Err(Malformed),
            }
        }
    }

    fn scan_string(&mut self) -> Result<(), Malformed> {
        self.expect(b'"')?;
        loop {
            match self.bump().ok_or(Malformed)? {
                b'\\' => {
                    self.bump().ok_or(Malformed)?;
                }
                b'"' => return Ok(()),
                _ => {}
            }
        }
    }

    /// Numbers, `true`, `false` and `null`
    fn scan_scalar(&mut self) -> Result<(), Malformed> {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if matches!(byte, b',' | b']' | b'}' | b':') || byte.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(Malformed);
        }
        Ok(())
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|byte| byte.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: u8) -> Result<(), Malformed> {
        match self.bump() {
            Some(byte) if byte == expected => Ok(()),
            _ => Err(Malformed),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }
}
