use std::env;

use imaplet::{INBOX, SearchKey, connect_tls};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let server = env::var("IMAP_SERVER")?;
    let email = env::var("IMAP_EMAIL")?;
    let password = env::var("IMAP_PASSWORD")?;

    let mut session = connect_tls(&server)?;
    session.login(&email, &password)?;
    session.select(INBOX)?;

    let ids = session.search(&SearchKey::Unseen)?;
    tracing::info!(unseen = ids.len(), "search complete");

    for id in ids.iter().take(5) {
        let message = session.get_message(id)?;
        println!("{}: {}", id, message.subject().unwrap_or("(no subject)"));
    }

    session.logout()?;

    Ok(())
}
