//! Generates an access token for the staff or admin role.
//!
//! Prints the token to hand out and the Argon2 hash to put into
//! `STAFF_TOKEN_HASH` or `ADMIN_TOKEN_HASH`. An existing token can be hashed
//! by passing it as the first argument.

use color_eyre::eyre::Result;
use washbay_api::middleware::auth::{generate_token, hash_token};

fn main() -> Result<()> {
    color_eyre::install()?;

    let token = std::env::args().nth(1).unwrap_or_else(generate_token);
    let hash = hash_token(&token)?;

    println!("token: {}", token);
    println!("hash:  {}", hash);

    Ok(())
}
