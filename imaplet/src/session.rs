use std::io::{Read, Write};

use crate::error::ImapError;
use crate::parser::{Response, ResponseParser};

const READ_BUFFER_SIZE: usize = 1024;

/// A connected, greeted session over a blocking byte stream. One command is
/// in flight at a time; `&mut self` on every operation enforces it.
#[derive(Debug)]
pub struct Session<S> {
    stream: S,
    count: u32,
    buf: Vec<u8>,
}

impl<S: Read + Write> Session<S> {
    /// Wraps an already-connected, already-secured stream and consumes the
    /// server greeting.
    pub fn new(stream: S) -> Result<Self, ImapError> {
        let mut session = Self {
            stream,
            count: 0,
            buf: vec![0; READ_BUFFER_SIZE],
        };
        session.discard_greeting()?;
        Ok(session)
    }

    /// The underlying stream, e.g. to shut the transport down from another
    /// handle while a read is blocked.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    // The greeting is one line, dropped uninterpreted. The server says
    // nothing further until we issue a command, so overreading past the
    // newline is not a concern.
    fn discard_greeting(&mut self) -> Result<(), ImapError> {
        loop {
            let n = self.stream.read(&mut self.buf)?;
            if n == 0 {
                return Err(ImapError::Connection(
                    "connection closed before greeting".to_string(),
                ));
            }
            if self.buf[..n].contains(&b'\n') {
                return Ok(());
            }
        }
    }

    /// Sends one command line and blocks until its response completes.
    ///
    /// The returned response may still carry a server error status; use
    /// [`Response::into_result`] or [`Response::error`] to check.
    pub fn issue(&mut self, command: &str) -> Result<Response, ImapError> {
        self.count += 1;
        let tag = format!("a{:03}", self.count);
        tracing::debug!(
            tag = %tag,
            verb = command.split(' ').next().unwrap_or(""),
            "sending command"
        );

        self.stream
            .write_all(format!("{} {}\r\n", tag, command).as_bytes())?;
        self.stream.flush()?;

        let mut parser = ResponseParser::new();
        loop {
            let n = self.stream.read(&mut self.buf)?;
            if n == 0 {
                return Err(ImapError::Connection(
                    "connection closed mid-response".to_string(),
                ));
            }
            if parser.feed(&self.buf[..n])? {
                break;
            }
        }

        let response = parser.into_response()?;
        if response.tag() != tag {
            return Err(ImapError::Framing(format!(
                "response tag {:?} does not match command tag {:?}",
                response.tag(),
                tag
            )));
        }
        Ok(response)
    }
}
