use std::net::TcpStream;
use std::sync::Arc;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};

use crate::error::ImapError;
use crate::session::Session;

pub type TlsStream = StreamOwned<ClientConnection, TcpStream>;

pub struct Builder {
    addr: String,
    conn_type: ConnectionType,
}

pub struct Connector {
    addr: String,
    conn_type: ConnectionType,
}

#[derive(Debug)]
enum ConnectionType {
    Tls,
    StartTls,
    Plain,
}

impl Builder {
    pub fn new(addr: &str) -> Self {
        Self {
            addr: addr.to_string(),
            conn_type: ConnectionType::Tls,
        }
    }

    pub fn tls(mut self) -> Self {
        self.conn_type = ConnectionType::Tls;
        self
    }

    pub fn starttls(mut self) -> Self {
        self.conn_type = ConnectionType::StartTls;
        self
    }

    pub fn plain(mut self) -> Self {
        self.conn_type = ConnectionType::Plain;
        self
    }

    pub fn build(self) -> Connector {
        Connector {
            addr: self.addr,
            conn_type: self.conn_type,
        }
    }

    pub fn connect(self) -> Result<Session<TlsStream>, ImapError> {
        self.build().connect()
    }
}

impl Connector {
    #[tracing::instrument(skip(self), fields(addr = %self.addr, conn_type = ?self.conn_type))]
    pub fn connect(self) -> Result<Session<TlsStream>, ImapError> {
        tracing::info!("Connecting to IMAP server");

        match self.conn_type {
            ConnectionType::Tls => {
                let config = create_tls_config();
                let server_name = parse_server_name(&self.addr)?;

                let conn = ClientConnection::new(config, server_name)?;
                let sock = TcpStream::connect(&self.addr)?;
                let stream = StreamOwned::new(conn, sock);

                // Session::new reads the greeting, so the first read drives
                // the TLS handshake implicitly.
                let session = Session::new(stream)?;

                tracing::info!("TLS connection established");

                Ok(session)
            }
            _ => Err(ImapError::Connection(
                "Connection type not implemented".to_string(),
            )),
        }
    }
}

pub fn connect_tls(addr: &str) -> Result<Session<TlsStream>, ImapError> {
    Builder::new(addr).tls().build().connect()
}

fn create_tls_config() -> Arc<ClientConfig> {
    let root_store = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.into(),
    };

    let mut config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    if cfg!(debug_assertions) {
        config.key_log = Arc::new(rustls::KeyLogFile::new());
    }

    Arc::new(config)
}

fn parse_server_name(addr: &str) -> Result<ServerName<'static>, ImapError> {
    let (host, _) = addr
        .rsplit_once(':')
        .ok_or_else(|| ImapError::InvalidAddress(addr.into()))?;

    Ok(ServerName::try_from(host.to_string())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_server_name() {
        assert!(parse_server_name("imap.example.com:993").is_ok());
        assert!(parse_server_name("127.0.0.1:993").is_ok());
        let err = parse_server_name("no-port").unwrap_err();
        assert!(matches!(err, ImapError::InvalidAddress(_)));
    }
}
