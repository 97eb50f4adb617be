use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum_test::TestServer;
use rolodex_config::Config;
use rolodex_core::{ContactService, InMemoryContactRepository, PhotoStore};
use rolodex_server::{AppState, create_app};
use tempfile::TempDir;

// Code is used by test modules, but not in this scope
#[allow(unused)]
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub tempdir: TempDir,
}

#[allow(unused)]
impl TestApp {
    pub fn photo_dir(&self) -> std::path::PathBuf {
        self.state.contacts().photos().directory().to_path_buf()
    }
}

pub fn build_test_app() -> Result<TestApp> {
    build_test_app_with(|_| {})
}

pub fn build_test_app_with(
    customize: impl FnOnce(&mut Config),
) -> Result<TestApp> {
    let tempdir = tempfile::tempdir()?;

    let mut config = Config::defaults();
    config.photos.directory = tempdir.path().join("photos");
    customize(&mut config);

    let photos = PhotoStore::new(config.photos.directory.clone())
        .with_url_prefix(config.photos.url_prefix.clone())
        .with_public_base_url(config.photos.public_base_url.clone());
    let service = ContactService::new(
        Arc::new(InMemoryContactRepository::new()),
        Arc::new(photos),
    )
    .with_photo_cleanup(config.photos.remove_on_delete);

    let state = AppState::new(service, config);
    let server = TestServer::new(create_app(state.clone()))
        .map_err(|err| anyhow!(err.to_string()))?;

    Ok(TestApp {
        server,
        state,
        tempdir,
    })
}
