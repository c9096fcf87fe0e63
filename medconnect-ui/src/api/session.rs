//! Persisted Session
//!
//! The bearer token and role live in `window.localStorage` under `token` and
//! `role`. They are written together on login and removed together on logout.
//! Requests read the token from storage each time.

use crate::state::models::Role;

pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "role";

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Stored bearer token, if any
pub fn token() -> Option<String> {
    storage()?
        .get_item(TOKEN_KEY)
        .ok()?
        .filter(|t| !t.is_empty())
}

/// Stored role. An unparseable value reads as signed out.
pub fn role() -> Option<Role> {
    storage()?.get_item(ROLE_KEY).ok()??.parse().ok()
}

pub fn set_token(token: &str) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(TOKEN_KEY, token);
    }
}

pub fn set_role(role: Role) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(ROLE_KEY, role.as_str());
    }
}

/// Remove both keys
pub fn clear() {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(TOKEN_KEY);
        let _ = storage.remove_item(ROLE_KEY);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_keys_are_cleared_together() {
        set_token("abc123");
        set_role(Role::Doctor);
        assert_eq!(token().as_deref(), Some("abc123"));
        assert_eq!(role(), Some(Role::Doctor));

        clear();
        assert_eq!(token(), None);
        assert_eq!(role(), None);
    }
}
