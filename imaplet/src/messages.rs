use crate::error::ImapError;

/// One retrieved message: the decoded header block plus the raw body text.
#[derive(Debug, Clone)]
pub struct Message {
    headers: Vec<(String, String)>,
    body: String,
}

impl Message {
    pub(crate) fn parse(raw_header: &[u8], raw_body: &[u8]) -> Result<Self, ImapError> {
        let (parsed, _) = mailparse::parse_headers(raw_header)?;
        let headers = parsed
            .iter()
            .map(|header| (header.get_key(), header.get_value()))
            .collect();
        Ok(Self {
            headers,
            body: String::from_utf8_lossy(raw_body).into_owned(),
        })
    }

    /// First header with the given name, compared ASCII case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// All headers in message order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn subject(&self) -> Option<&str> {
        self.header("Subject")
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_lookup() {
        let message =
            Message::parse(b"Subject: Hi\r\nX-Priority: 1\r\n\r\n", b"body line\n").unwrap();
        assert_eq!(message.subject(), Some("Hi"));
        assert_eq!(message.header("x-priority"), Some("1"));
        assert_eq!(message.header("absent"), None);
        assert_eq!(message.headers().len(), 2);
        assert_eq!(message.body(), "body line\n");
    }

    #[test]
    fn test_folded_header_is_unfolded() {
        let message = Message::parse(b"Subject: Hello\r\n world\r\n\r\n", b"").unwrap();
        assert_eq!(message.subject(), Some("Hello world"));
    }
}
