//! Persistent CLI session: identity, cookies and the gateway over them.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;

use celebconnect_core::{AccountService, GatewayConfig, SessionGateway, SessionStore};
use celebconnect_http::CookieJar;
use celebconnect_store::FileSessionStore;

use crate::cli::GlobalArgs;
use crate::config;
use crate::navigator::TerminalNavigator;

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "celebconnect").context("Could not determine home directory")
}

/// Data directory holding `session.json` and `cookies.json`.
fn data_dir() -> Result<PathBuf> {
    let dirs = project_dirs()?;
    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;
    Ok(data_dir.to_path_buf())
}

/// Everything a command needs to talk to the API.
pub struct Runtime {
    pub config: GatewayConfig,
    pub gateway: SessionGateway,
    pub accounts: AccountService,
    pub store: Arc<FileSessionStore>,
    pub navigator: Arc<TerminalNavigator>,
}

impl Runtime {
    /// Open the persisted session and build a gateway over it.
    ///
    /// `location` is the page the call is made from; it decides which login
    /// page a terminal failure lands on. Without one, the home page of the
    /// cached role is used.
    pub fn open(global: &GlobalArgs, location: Option<&str>) -> Result<Self> {
        let config = config::load(global)?;
        let dir = data_dir()?;

        let store = Arc::new(FileSessionStore::open(dir.join("session.json")));
        let jar = Arc::new(
            CookieJar::load(dir.join("cookies.json")).context("Failed to load cookie jar")?,
        );

        let location = match location {
            Some(location) => location.to_string(),
            None => {
                let role = store
                    .get()
                    .context("Failed to read session")?
                    .map(|record| record.role)
                    .unwrap_or_default();
                config.routes.for_role(role).home_path.clone()
            }
        };
        debug!(%location, "opening session");
        let navigator = Arc::new(TerminalNavigator::at(location));

        let gateway = celebconnect_http::connect(&config, jar, store.clone(), navigator.clone())
            .context("Failed to set up API client")?;
        let accounts = AccountService::new(gateway.clone(), &config);

        Ok(Self {
            config,
            gateway,
            accounts,
            store,
            navigator,
        })
    }

    /// Read the cached identity without touching the network.
    pub fn open_store_only() -> Result<FileSessionStore> {
        Ok(FileSessionStore::open(data_dir()?.join("session.json")))
    }
}
