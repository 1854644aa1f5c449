use std::fmt::{self, Display};

/// A complete client command, rendered to its wire text by `Display`. The
/// tag and the CRLF framing are added by the session at write time.
#[derive(Debug, Clone)]
pub enum Command<'a> {
    Login { user: &'a str, password: &'a str },
    Select { mailbox: &'a str },
    Search { key: &'a SearchKey },
    Fetch { id: &'a str, item: FetchItem },
    Store { id: &'a str, flags: &'a [Flag] },
    Logout,
}

impl Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Login { user, password } => write!(f, "LOGIN {} {}", user, password),
            Command::Select { mailbox } => write!(f, "SELECT {}", mailbox),
            Command::Search { key } => write!(f, "SEARCH {}", key),
            Command::Fetch { id, item } => write!(f, "FETCH {} {}", id, item),
            Command::Store { id, flags } => {
                write!(f, "STORE {} FLAGS (", id)?;
                let mut first = true;
                for flag in *flags {
                    if !first {
                        f.write_str(" ")?;
                    } else {
                        first = false;
                    }
                    write!(f, "{}", flag)?;
                }
                f.write_str(")")
            }
            Command::Logout => f.write_str("LOGOUT"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Flag {
    Seen,
    Answered,
    Flagged,
    Deleted,
    Draft,
    Recent,
    Keyword(String),
}

impl Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Seen => f.write_str("\\Seen"),
            Flag::Answered => f.write_str("\\Answered"),
            Flag::Flagged => f.write_str("\\Flagged"),
            Flag::Deleted => f.write_str("\\Deleted"),
            Flag::Draft => f.write_str("\\Draft"),
            Flag::Recent => f.write_str("\\Recent"),
            Flag::Keyword(k) => f.write_str(k),
        }
    }
}

/// Data item for `FETCH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchItem {
    Rfc822Header,
    Rfc822Text,
}

impl Display for FetchItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchItem::Rfc822Header => f.write_str("RFC822.HEADER"),
            FetchItem::Rfc822Text => f.write_str("RFC822.TEXT"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum SearchKey {
    All,
    Answered,
    Bcc(String),
    Before(String),
    Body(String),
    Cc(String),
    Deleted,
    Draft,
    Flagged,
    From(String),
    Header { name: String, value: String },
    Keyword(String),
    Larger(u32),
    New,
    Not(Box<SearchKey>),
    Old,
    On(String),
    Or(Box<SearchKey>, Box<SearchKey>),
    Recent,
    Seen,
    Since(String),
    Smaller(u32),
    Subject(String),
    Text(String),
    To(String),
    Unanswered,
    Undeleted,
    Unflagged,
    Unkeyword(String),
    Unseen,
}

impl Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SearchKey as K;
        match self {
            K::All => f.write_str("ALL"),
            K::Answered => f.write_str("ANSWERED"),
            K::Bcc(s) => write!(f, "BCC {}", quote_astring(s)),
            K::Before(s) => write!(f, "BEFORE {}", s),
            K::Body(s) => write!(f, "BODY {}", quote_astring(s)),
            K::Cc(s) => write!(f, "CC {}", quote_astring(s)),
            K::Deleted => f.write_str("DELETED"),
            K::Draft => f.write_str("DRAFT"),
            K::Flagged => f.write_str("FLAGGED"),
            K::From(s) => write!(f, "FROM {}", quote_astring(s)),
            K::Header { name, value } => {
                write!(f, "HEADER {} {}", quote_astring(name), quote_astring(value))
            }
            K::Keyword(s) => write!(f, "KEYWORD {}", s),
            K::Larger(n) => write!(f, "LARGER {}", n),
            K::New => f.write_str("NEW"),
            K::Not(k) => write!(f, "NOT ({})", k),
            K::Old => f.write_str("OLD"),
            K::On(s) => write!(f, "ON {}", s),
            K::Or(a, b) => write!(f, "OR ({}) ({})", a, b),
            K::Recent => f.write_str("RECENT"),
            K::Seen => f.write_str("SEEN"),
            K::Since(s) => write!(f, "SINCE {}", s),
            K::Smaller(n) => write!(f, "SMALLER {}", n),
            K::Subject(s) => write!(f, "SUBJECT {}", quote_astring(s)),
            K::Text(s) => write!(f, "TEXT {}", quote_astring(s)),
            K::To(s) => write!(f, "TO {}", quote_astring(s)),
            K::Unanswered => f.write_str("UNANSWERED"),
            K::Undeleted => f.write_str("UNDELETED"),
            K::Unflagged => f.write_str("UNFLAGGED"),
            K::Unkeyword(s) => write!(f, "UNKEYWORD {}", s),
            K::Unseen => f.write_str("UNSEEN"),
        }
    }
}

pub(crate) fn quote_astring(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    out.push('"');
    for ch in input.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}
