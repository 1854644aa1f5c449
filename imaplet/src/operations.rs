use std::io::{Read, Write};

use crate::commands::{Command, FetchItem, Flag, SearchKey};
use crate::error::ImapError;
use crate::extract;
use crate::messages::Message;
use crate::parser::Response;
use crate::session::Session;

impl<S: Read + Write> Session<S> {
    #[tracing::instrument(skip(self, password))]
    pub fn login(&mut self, user: &str, password: &str) -> Result<(), ImapError> {
        let command = Command::Login { user, password };
        self.issue(&command.to_string())?.into_result()?;
        tracing::info!("logged in");
        Ok(())
    }

    pub fn select(&mut self, mailbox: &str) -> Result<Response, ImapError> {
        self.issue(&Command::Select { mailbox }.to_string())?
            .into_result()
    }

    /// Ids of the messages matching the criteria, in server order. An empty
    /// result is a successful search with no hits.
    pub fn search(&mut self, key: &SearchKey) -> Result<Vec<String>, ImapError> {
        let response = self
            .issue(&Command::Search { key }.to_string())?
            .into_result()?;
        for reply in response.replies() {
            if let Some(ids) = extract::search_ids(reply.origin()) {
                return Ok(ids);
            }
        }
        Err(ImapError::InvalidResponse(
            "no SEARCH reply in response".to_string(),
        ))
    }

    /// Text of one data item of one message, with the first line of the
    /// literal stripped.
    pub fn fetch(&mut self, id: &str, item: FetchItem) -> Result<String, ImapError> {
        let content = self.fetch_content(id, item)?;
        Ok(extract::text_after_first_line(&content))
    }

    pub fn store_flags(&mut self, id: &str, flags: &[Flag]) -> Result<(), ImapError> {
        self.issue(&Command::Store { id, flags }.to_string())?
            .into_result()?;
        Ok(())
    }

    pub fn logout(&mut self) -> Result<(), ImapError> {
        self.issue(&Command::Logout.to_string())?.into_result()?;
        Ok(())
    }

    /// Fetches header and body of one message and decodes the header block.
    pub fn get_message(&mut self, id: &str) -> Result<Message, ImapError> {
        let header = self.fetch_content(id, FetchItem::Rfc822Header)?;
        let body = self.fetch_content(id, FetchItem::Rfc822Text)?;
        Message::parse(&header, &body)
    }

    // Raw literal bytes of the FETCH reply matching the message id.
    fn fetch_content(&mut self, id: &str, item: FetchItem) -> Result<Vec<u8>, ImapError> {
        let response = self
            .issue(&Command::Fetch { id, item }.to_string())?
            .into_result()?;
        for reply in response.replies() {
            if extract::is_fetch_reply(reply.origin(), id) {
                return Ok(reply.content().unwrap_or_default().to_vec());
            }
        }
        Err(ImapError::InvalidResponse(format!(
            "no FETCH reply for message {}",
            id
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::MockStream;

    const GREETING: &[u8] = b"* OK ready\r\n";

    fn session_with(chunks: &[&[u8]]) -> Session<MockStream> {
        let mut script = vec![GREETING];
        script.extend_from_slice(chunks);
        Session::new(MockStream::new(&script)).unwrap()
    }

    #[test]
    fn test_login_success() {
        let mut session = session_with(&[b"a001 OK done\r\n"]);
        session.login("u", "p").unwrap();
        assert_eq!(session.get_ref().written, b"a001 LOGIN u p\r\n");
    }

    #[test]
    fn test_login_rejected() {
        let mut session = session_with(&[b"a001 NO authentication failed\r\n"]);
        match session.login("u", "wrong").unwrap_err() {
            ImapError::Status(text) => assert_eq!(text, "NO authentication failed"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_search_returns_ids() {
        let mut session = session_with(&[b"* SEARCH 1 2 3\r\na001 OK done\r\n"]);
        let ids = session.search(&SearchKey::All).unwrap();
        assert_eq!(ids, ["1", "2", "3"]);
        assert_eq!(session.get_ref().written, b"a001 SEARCH ALL\r\n");
    }

    #[test]
    fn test_search_with_no_hits() {
        let mut session = session_with(&[b"* SEARCH\r\na001 OK done\r\n"]);
        let ids = session.search(&SearchKey::Unseen).unwrap();
        assert_eq!(ids, Vec::<String>::new());
    }

    #[test]
    fn test_search_without_search_reply() {
        let mut session = session_with(&[b"a001 OK done\r\n"]);
        let err = session.search(&SearchKey::All).unwrap_err();
        assert!(matches!(err, ImapError::InvalidResponse(_)));
    }

    #[test]
    fn test_fetch_returns_literal_text() {
        let mut session =
            session_with(&[b"* 4 FETCH (RFC822.TEXT {5}\r\nhello)\r\na001 OK done\r\n"]);
        let text = session.fetch("4", FetchItem::Rfc822Text).unwrap();
        assert_eq!(text, "hello");
        assert_eq!(session.get_ref().written, b"a001 FETCH 4 RFC822.TEXT\r\n");
    }

    #[test]
    fn test_fetch_strips_first_literal_line() {
        let mut session =
            session_with(&[b"* 4 FETCH (RFC822.TEXT {9}\r\nhead\nbody)\r\na001 OK done\r\n"]);
        assert_eq!(session.fetch("4", FetchItem::Rfc822Text).unwrap(), "body");
    }

    #[test]
    fn test_fetch_picks_the_matching_reply() {
        let mut session = session_with(&[
            b"* 3 FETCH (RFC822.TEXT {2}\r\nxx)\r\n* 4 FETCH (RFC822.TEXT {5}\r\nhello)\r\na001 OK done\r\n",
        ]);
        assert_eq!(session.fetch("4", FetchItem::Rfc822Text).unwrap(), "hello");
    }

    #[test]
    fn test_fetch_without_matching_reply() {
        let mut session = session_with(&[b"a001 OK done\r\n"]);
        let err = session.fetch("4", FetchItem::Rfc822Text).unwrap_err();
        assert!(matches!(err, ImapError::InvalidResponse(_)));
    }

    #[test]
    fn test_select_error_carries_status_text() {
        let mut session = session_with(&[b"a001 NO mailbox not found\r\n"]);
        match session.select("missing").unwrap_err() {
            ImapError::Status(text) => assert_eq!(text, "NO mailbox not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_store_flags_and_logout() {
        let mut session = session_with(&[b"a001 OK done\r\n", b"a002 OK done\r\n"]);
        session
            .store_flags("4", &[Flag::Seen, Flag::Deleted])
            .unwrap();
        session.logout().unwrap();
        assert_eq!(
            session.get_ref().written,
            b"a001 STORE 4 FLAGS (\\Seen \\Deleted)\r\na002 LOGOUT\r\n"
        );
    }

    #[test]
    fn test_get_message() {
        let header =
            b"* 4 FETCH (RFC822.HEADER {45}\r\nSubject: Greetings\r\nFrom: ada@example.com\r\n\r\n)\r\na001 OK done\r\n";
        let body = b"* 4 FETCH (RFC822.TEXT {12}\r\nHello, Ada.\n)\r\na002 OK done\r\n";
        let mut session = session_with(&[header, body]);
        let message = session.get_message("4").unwrap();
        assert_eq!(message.subject(), Some("Greetings"));
        assert_eq!(message.header("from"), Some("ada@example.com"));
        assert_eq!(message.body(), "Hello, Ada.\n");
    }

    #[test]
    fn test_get_message_without_fetch_reply() {
        let mut session = session_with(&[b"a001 OK done\r\n"]);
        let err = session.get_message("4").unwrap_err();
        assert!(matches!(err, ImapError::InvalidResponse(_)));
    }

    #[test]
    fn test_command_sequence_on_one_connection() {
        let mut session = session_with(&[
            b"a001 OK done\r\n",
            b"* SEARCH 1 2 3\r\na002 OK done\r\n",
            b"* 4 FETCH (RFC822.TEXT {5}\r\nhello)\r\na003 OK done\r\n",
            b"a004 NO mailbox not found\r\n",
        ]);
        session.login("u", "p").unwrap();
        assert_eq!(session.search(&SearchKey::All).unwrap(), ["1", "2", "3"]);
        assert_eq!(session.fetch("4", FetchItem::Rfc822Text).unwrap(), "hello");
        match session.select("missing").unwrap_err() {
            ImapError::Status(text) => assert_eq!(text, "NO mailbox not found"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            session.get_ref().written,
            b"a001 LOGIN u p\r\na002 SEARCH ALL\r\na003 FETCH 4 RFC822.TEXT\r\na004 SELECT missing\r\n"
        );
    }
}
