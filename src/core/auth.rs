//! Local, trust-everything login. No credentials are checked or kept.

use crate::core::clock::Clock;
use crate::store::KeyValueStore;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl User {
    /// Up to two upper-case initials of the name, `U` when there is none.
    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect();
        if initials.is_empty() {
            "U".to_string()
        } else {
            initials
        }
    }
}

pub struct Session {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Accepts any email/password pair and records the user.
    pub fn login(&self, email: &str, _password: &str) -> Result<User> {
        let name = email.split('@').next().unwrap_or_default().to_string();
        let user = User {
            id: self.clock.now().timestamp_millis().to_string(),
            name,
            email: email.to_string(),
        };
        self.store
            .set(USER_KEY, serde_json::to_value(&user)?)
            .context("Failed to save user")?;
        info!(email = %user.email, "Logged in");
        Ok(user)
    }

    /// The logged in user, if any. Unreadable entries count as logged out.
    pub fn current_user(&self) -> Option<User> {
        let value = match self.store.get(USER_KEY) {
            Ok(value) => value?,
            Err(e) => {
                debug!(error = %e, "Failed to read user");
                return None;
            }
        };
        serde_json::from_value::<User>(value)
            .ok()
            .filter(|user| !user.id.is_empty())
    }

    pub fn logout(&self) -> Result<()> {
        self.store
            .set(USER_KEY, serde_json::to_value(User::default())?)
            .context("Failed to clear user")?;
        info!("Logged out");
        Ok(())
    }
}
