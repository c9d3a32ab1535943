//! Opaque token generation for public, unauthenticated flows.

use rand::distr::Alphanumeric;
use rand::Rng;

/// Length of quotation and invitation tokens.
pub const TOKEN_LEN: usize = 32;

/// Generate a random alphanumeric token.
///
/// Tokens address public resources (quotation forms, invitation responses)
/// without a session, so they must be unguessable; 32 alphanumeric chars
/// give just under 191 bits of entropy.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}
