//! Length-prefixed tag stream underlying the metadata sidecar.
//!
//! An entry is a single ASCII tag, the payload length in bytes as decimal
//! digits, a `:` and the payload. Payloads may themselves be streams.
//! Readers skip tags they do not know.

use crate::CodecError;

#[derive(Default)]
pub(crate) struct Writer {
    out: String,
}

impl Writer {
    pub(crate) fn entry(&mut self, tag: char, payload: &str) {
        self.out.push(tag);
        self.out.push_str(&payload.len().to_string());
        self.out.push(':');
        self.out.push_str(payload);
    }

    pub(crate) fn nested(&mut self, tag: char, build: impl FnOnce(&mut Writer)) {
        let mut inner = Writer::default();
        build(&mut inner);
        self.entry(tag, &inner.out);
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

pub(crate) struct Reader<'s> {
    text: &'s str,
    pos: usize,
    /// Offset of `text` within the outermost stream, for error positions.
    base: usize,
}

impl<'s> Reader<'s> {
    pub(crate) fn new(text: &'s str) -> Self {
        Reader {
            text,
            pos: 0,
            base: 0,
        }
    }

    /// Next `(tag, payload, payload offset)`, or `None` at the end.
    pub(crate) fn next_entry(&mut self) -> Result<Option<(char, &'s str, usize)>, CodecError> {
        let rest = &self.text[self.pos..];
        let Some(tag) = rest.chars().next() else {
            return Ok(None);
        };
        if !tag.is_ascii_alphabetic() {
            return Err(self.malformed(self.pos, format!("expected a tag, found `{tag}`")));
        }
        let digits_start = self.pos + 1;
        let colon = self.text[digits_start..]
            .find(':')
            .map(|i| digits_start + i)
            .ok_or_else(|| self.malformed(digits_start, "missing `:` after length"))?;
        let len: usize = self.text[digits_start..colon]
            .parse()
            .map_err(|_| self.malformed(digits_start, "invalid length"))?;
        let start = colon + 1;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= self.text.len() && self.text.is_char_boundary(end))
            .ok_or_else(|| self.malformed(start, format!("payload of {len} bytes overruns input")))?;
        self.pos = end;
        Ok(Some((tag, &self.text[start..end], start)))
    }

    /// Reader over a nested payload returned by [`Reader::next_entry`].
    pub(crate) fn nested(&self, payload: &'s str, offset: usize) -> Reader<'s> {
        Reader {
            text: payload,
            pos: 0,
            base: self.base + offset,
        }
    }

    pub(crate) fn malformed(&self, offset: usize, reason: impl Into<String>) -> CodecError {
        CodecError::MalformedSidecar {
            offset: self.base + offset,
            reason: reason.into(),
        }
    }
}
