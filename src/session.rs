//! Session Gate
//!
//! A login marker in client storage means the user is signed in. Without it
//! the dashboard sends the user back to the entry page.

use serde::Deserialize;

use crate::store::{ClientStore, StoreResult};

/// Storage key of the login marker
pub const DEFAULT_USER_KEY: &str = "airhealthUser";

/// Storage key of the JSON-encoded profile
pub const DEFAULT_PROFILE_KEY: &str = "airhealthProfile";

/// Page to return to when signed out
pub const DEFAULT_ENTRY_PAGE: &str = "index.html";

/// Storage keys and navigation target of the session
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionKeys {
    #[serde(default = "default_user_key")]
    pub user_key: String,

    #[serde(default = "default_profile_key")]
    pub profile_key: String,

    #[serde(default = "default_entry_page")]
    pub entry_page: String,
}

fn default_user_key() -> String {
    DEFAULT_USER_KEY.to_string()
}

fn default_profile_key() -> String {
    DEFAULT_PROFILE_KEY.to_string()
}

fn default_entry_page() -> String {
    DEFAULT_ENTRY_PAGE.to_string()
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self {
            user_key: default_user_key(),
            profile_key: default_profile_key(),
            entry_page: default_entry_page(),
        }
    }
}

/// Page navigation
pub trait Navigator {
    fn navigate(&self, page: &str);
}

impl<T: Navigator + ?Sized> Navigator for &T {
    fn navigate(&self, page: &str) {
        (**self).navigate(page)
    }
}

/// Whether a non-empty login marker is present
pub fn is_logged_in<S: ClientStore + ?Sized>(store: &S, keys: &SessionKeys) -> StoreResult<bool> {
    Ok(store
        .get_item(&keys.user_key)?
        .is_some_and(|marker| !marker.is_empty()))
}
