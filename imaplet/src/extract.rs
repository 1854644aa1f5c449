use nom::{
    IResult, Parser,
    bytes::complete::{tag, tag_no_case},
    combinator::rest,
    sequence::preceded,
};

/// Identifier list from a `SEARCH` reply. `None` when the reply is not a
/// SEARCH reply at all, `Some` of an empty vec when it is one with no hits.
pub(crate) fn search_ids(origin: &[u8]) -> Option<Vec<String>> {
    let (_, ids) = search_reply(origin).ok()?;
    Some(
        String::from_utf8_lossy(ids)
            .split_whitespace()
            .map(str::to_string)
            .collect(),
    )
}

fn search_reply(i: &[u8]) -> IResult<&[u8], &[u8]> {
    preceded(tag_no_case("SEARCH"), rest).parse(i)
}

/// Whether a reply carries `FETCH` data for the given message id.
pub(crate) fn is_fetch_reply(origin: &[u8], id: &str) -> bool {
    fetch_reply(origin, id).is_ok()
}

fn fetch_reply<'a>(i: &'a [u8], id: &str) -> IResult<&'a [u8], &'a [u8]> {
    preceded((tag(id.as_bytes()), tag(" "), tag_no_case("FETCH")), rest).parse(i)
}

/// Message text of a fetched literal: everything after the first line
/// break, or the whole content when there is none.
pub(crate) fn text_after_first_line(content: &[u8]) -> String {
    let text = match content.iter().position(|&b| b == b'\n') {
        Some(i) => &content[i + 1..],
        None => content,
    };
    String::from_utf8_lossy(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_ids() {
        assert_eq!(
            search_ids(b"SEARCH 1 2 3"),
            Some(vec!["1".to_string(), "2".to_string(), "3".to_string()])
        );
        assert_eq!(search_ids(b"search 7"), Some(vec!["7".to_string()]));
        assert_eq!(search_ids(b"SEARCH"), Some(vec![]));
        assert_eq!(search_ids(b"SEARCH   "), Some(vec![]));
        assert_eq!(search_ids(b"5 EXISTS"), None);
    }

    #[test]
    fn test_fetch_reply_matching() {
        assert!(is_fetch_reply(b"4 FETCH (RFC822.TEXT {5}\r\nhello)", "4"));
        assert!(is_fetch_reply(b"4 fetch (RFC822.TEXT {5}\r\nhello)", "4"));
        assert!(!is_fetch_reply(b"42 FETCH (RFC822.TEXT {5}\r\nhello)", "4"));
        assert!(!is_fetch_reply(b"4 EXISTS", "4"));
    }

    #[test]
    fn test_text_after_first_line() {
        assert_eq!(text_after_first_line(b"X-Info: 1\nbody text"), "body text");
        assert_eq!(text_after_first_line(b"hello"), "hello");
        assert_eq!(text_after_first_line(b"line\n"), "");
    }
}
