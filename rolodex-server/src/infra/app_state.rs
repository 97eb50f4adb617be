use std::{fmt, sync::Arc};

use rolodex_config::Config;
use rolodex_core::ContactService;

#[derive(Clone)]
pub struct AppState {
    contacts: Arc<ContactService>,
    config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("contacts", &self.contacts)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(contacts: ContactService, config: Config) -> Self {
        Self {
            contacts: Arc::new(contacts),
            config: Arc::new(config),
        }
    }

    pub fn contacts(&self) -> &ContactService {
        &self.contacts
    }

    pub fn config_handle(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }
}
