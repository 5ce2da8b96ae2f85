//! Prints an argon2 PHC string suitable for `AUTH_PASSWORD_HASH`.
//!
//! Usage: `hash-password <password>` or pipe the password on stdin.

use savebite_server::handlers::password::hash_password;
use std::io::{self, BufRead};

fn main() -> anyhow::Result<()> {
    let password = match std::env::args().nth(1) {
        Some(password) => password,
        None => {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        anyhow::bail!("usage: hash-password <password> (or pipe it on stdin)");
    }

    let hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("failed to hash password: {}", e))?;
    println!("{}", hash);
    Ok(())
}
