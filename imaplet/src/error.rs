use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImapError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Invalid address format: {0}")]
    InvalidAddress(String),
    #[error("DNS name error: {0}")]
    DnsName(#[from] rustls::pki_types::InvalidDnsNameError),
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Framing error: {0}")]
    Framing(String),
    #[error("Server error: {0}")]
    Status(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Header decode error: {0}")]
    HeaderDecode(#[from] mailparse::MailParseError),
}
