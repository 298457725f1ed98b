//! Rendering of the issued token on stdout.

use keymint::TokenId;
use serde::Serialize;

#[derive(Serialize)]
struct TokenOutput<'a> {
    token: &'a TokenId,
}

/// Render the token id bare, or as `{"token": "<id>"}`.
pub fn render(id: &TokenId, json: bool) -> serde_json::Result<String> {
    if json {
        serde_json::to_string(&TokenOutput { token: id })
    } else {
        Ok(id.to_string())
    }
}
