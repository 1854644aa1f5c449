use std::mem;

use bytes::{BufMut, BytesMut};

use crate::error::ImapError;

/// One untagged reply, kept verbatim alongside its decoded literal segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    origin: BytesMut,
    type_tag: BytesMut,
    content: BytesMut,
    literal_len: Option<usize>,
}

impl Reply {
    /// Reply text as received, without the leading `"* "` marker and the
    /// terminating CRLF. Literal bytes are included.
    pub fn origin(&self) -> &[u8] {
        &self.origin
    }

    /// Keyword of the parenthesized literal segment, if the reply had one.
    pub fn type_tag(&self) -> Option<&[u8]> {
        (!self.type_tag.is_empty()).then_some(&self.type_tag[..])
    }

    pub fn literal_len(&self) -> Option<usize> {
        self.literal_len
    }

    /// Raw literal bytes. `Some` exactly when a literal length was parsed,
    /// so a `{0}` literal yields `Some` of an empty slice.
    pub fn content(&self) -> Option<&[u8]> {
        self.literal_len.map(|_| &self.content[..])
    }
}

/// A completed server response: the ordered untagged replies plus the
/// terminating status line, split into tag and status text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    tag: String,
    status: String,
    error: Option<String>,
    replies: Vec<Reply>,
}

impl Response {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Full status text when the status line did not report success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn replies(&self) -> &[Reply] {
        &self.replies
    }

    /// Turns a non-OK status into `ImapError::Status`.
    pub fn into_result(mut self) -> Result<Self, ImapError> {
        if let Some(text) = self.error.take() {
            return Err(ImapError::Status(text));
        }
        Ok(self)
    }

    fn complete(&mut self, line: &[u8]) {
        let line = String::from_utf8_lossy(line);
        let (tag, status) = line.split_once(' ').unwrap_or((line.as_ref(), ""));
        let ok = status
            .split(' ')
            .next()
            .is_some_and(|word| word.eq_ignore_ascii_case("OK"));
        if !ok {
            self.error = Some(status.to_string());
        }
        self.tag = tag.to_string();
        self.status = status.to_string();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Init,
    Marker,
    Reply,
    LiteralType,
    LiteralLength,
    LiteralContent,
    ReplyCr,
    StatusLine,
    StatusCr,
    Done,
}

/// Incremental response parser. Bytes go in through [`feed`] in chunks of
/// any size, split anywhere, including inside a literal or a CRLF pair; the
/// accumulated [`Response`] comes out of [`into_response`] once the
/// terminating status line has been consumed.
///
/// [`feed`]: ResponseParser::feed
/// [`into_response`]: ResponseParser::into_response
#[derive(Debug, Default)]
pub struct ResponseParser {
    state: State,
    line: BytesMut,
    digits: BytesMut,
    current: Reply,
    response: Response,
}

impl ResponseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the automaton over one chunk. Returns whether the terminating
    /// status line has now been fully consumed.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<bool, ImapError> {
        for &byte in chunk {
            self.step(byte)?;
        }
        Ok(self.state == State::Done)
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    pub fn into_response(self) -> Result<Response, ImapError> {
        if self.state != State::Done {
            return Err(ImapError::Framing("response incomplete".into()));
        }
        Ok(self.response)
    }

    fn step(&mut self, byte: u8) -> Result<(), ImapError> {
        match self.state {
            State::Init => match byte {
                b'*' => self.state = State::Marker,
                b'\r' => self.state = State::StatusCr,
                _ => {
                    self.line.put_u8(byte);
                    self.state = State::StatusLine;
                }
            },
            // The space after the marker is consumed here; the first
            // non-space byte opens a new record.
            State::Marker => {
                if byte != b' ' {
                    self.current = Reply::default();
                    self.digits.clear();
                    self.current.origin.put_u8(byte);
                    self.state = State::Reply;
                }
            }
            State::Reply => match byte {
                b'\r' => self.state = State::ReplyCr,
                b'(' => {
                    self.current.origin.put_u8(byte);
                    self.state = State::LiteralType;
                }
                _ => self.current.origin.put_u8(byte),
            },
            State::LiteralType => {
                match byte {
                    b')' => self.state = State::Reply,
                    b' ' => self.state = State::LiteralLength,
                    _ => self.current.type_tag.put_u8(byte),
                }
                self.current.origin.put_u8(byte);
            }
            State::LiteralLength => {
                self.current.origin.put_u8(byte);
                if byte == b'\n' {
                    let len = parse_literal_len(&self.digits)?;
                    self.current.literal_len = Some(len);
                    // A zero-length literal has no content bytes to wait for.
                    self.state = if len == 0 {
                        State::Reply
                    } else {
                        State::LiteralContent
                    };
                } else if byte.is_ascii_digit() {
                    self.digits.put_u8(byte);
                }
            }
            // Literal bytes are opaque. Embedded CR or LF terminate nothing
            // until the declared count is reached.
            State::LiteralContent => {
                self.current.origin.put_u8(byte);
                self.current.content.put_u8(byte);
                if Some(self.current.content.len()) == self.current.literal_len {
                    self.state = State::Reply;
                }
            }
            State::ReplyCr => {
                if byte == b'\n' {
                    self.response.replies.push(mem::take(&mut self.current));
                    self.state = State::Init;
                } else {
                    // Not a terminator after all.
                    self.current.origin.put_u8(b'\r');
                    self.current.origin.put_u8(byte);
                    self.state = State::Reply;
                }
            }
            State::StatusLine => {
                if byte == b'\r' {
                    self.state = State::StatusCr;
                } else {
                    self.line.put_u8(byte);
                }
            }
            State::StatusCr => {
                if byte == b'\n' {
                    self.response.complete(&self.line);
                    self.state = State::Done;
                } else {
                    self.line.put_u8(b'\r');
                    self.line.put_u8(byte);
                    self.state = State::StatusLine;
                }
            }
            State::Done => {
                return Err(ImapError::Framing("fed past completion".into()));
            }
        }
        Ok(())
    }
}

fn parse_literal_len(digits: &[u8]) -> Result<usize, ImapError> {
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ImapError::Framing("invalid literal length".into()))
}
