use tabled::Table;

use crate::{config::Settings, session::Session, success, utils, warning};

/// Runs the authorization flow once and shows the resulting token.
///
/// Nothing is stored; the token is gone when the process exits.
pub async fn auth(settings: Settings) {
    let mut session = Session::new(settings);

    match session.authorize().await {
        Ok(tokens) => {
            let table = Table::new(vec![utils::token_table_row(tokens)]);
            success!("Authentication successful!");
            println!("{}", table);
        }
        Err(e) => warning!("Authentication failed: {}", e),
    }
}
