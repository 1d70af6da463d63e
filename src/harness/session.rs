//! Session factories and the per-scenario session guard

use async_trait::async_trait;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

use crate::config::Config;
use crate::webdriver::{HttpTransport, MockDevice, RemoteSession, WebDriverClient};
use crate::Result;

/// Creates a fresh session for each scenario
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn create(&self, config: &Config) -> Result<Arc<dyn WebDriverClient>>;
}

/// Negotiates sessions with the configured Appium server
#[derive(Debug, Default, Clone, Copy)]
pub struct RemoteSessionFactory;

#[async_trait]
impl SessionFactory for RemoteSessionFactory {
    async fn create(&self, config: &Config) -> Result<Arc<dyn WebDriverClient>> {
        let transport = Arc::new(HttpTransport::new(
            config.remote_url.as_str(),
            config.request_timeout(),
        )?);
        let session = RemoteSession::create(transport, config.session_capabilities()).await?;
        Ok(Arc::new(session))
    }
}

type DeviceBuilder = Box<dyn Fn() -> MockDevice + Send + Sync>;

/// Hands out scripted devices; keeps them for later inspection
pub struct MockSessionFactory {
    build: DeviceBuilder,
    devices: Mutex<Vec<Arc<MockDevice>>>,
}

impl MockSessionFactory {
    pub fn new<F>(build: F) -> Self
    where
        F: Fn() -> MockDevice + Send + Sync + 'static,
    {
        Self {
            build: Box::new(build),
            devices: Mutex::new(Vec::new()),
        }
    }

    /// Factory for the bundled ApiDemos layout
    pub fn api_demos() -> Self {
        Self::new(MockDevice::api_demos)
    }

    /// Devices created so far, oldest first
    pub fn devices(&self) -> Vec<Arc<MockDevice>> {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for MockSessionFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockSessionFactory")
            .field("devices", &self.devices().len())
            .finish()
    }
}

#[async_trait]
impl SessionFactory for MockSessionFactory {
    async fn create(&self, _config: &Config) -> Result<Arc<dyn WebDriverClient>> {
        let device = Arc::new((self.build)());
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(device.clone());

        let client: Arc<dyn WebDriverClient> = device;
        Ok(client)
    }
}

/// One isolated session, quit through [`SessionFixture::close`]
#[derive(Debug)]
pub struct SessionFixture {
    client: Arc<dyn WebDriverClient>,
    closed: bool,
}

impl SessionFixture {
    /// Create a session and apply the configured implicit wait
    pub async fn open(factory: &dyn SessionFactory, config: &Config) -> Result<Self> {
        let client = factory.create(config).await?;

        if let Err(e) = client.set_implicit_wait(config.implicit_timeout()).await {
            warn!("Failed to set implicit wait, quitting session: {}", e);
            if let Err(quit) = client.quit().await {
                warn!("Failed to quit session {}: {}", client.session_id(), quit);
            }
            return Err(e);
        }

        info!(
            "Session {} ready (implicit wait {:?})",
            client.session_id(),
            config.implicit_timeout()
        );
        Ok(Self {
            client,
            closed: false,
        })
    }

    pub fn client(&self) -> Arc<dyn WebDriverClient> {
        self.client.clone()
    }

    /// Quit the remote session
    pub async fn close(mut self) -> Result<()> {
        self.closed = true;
        info!("Quitting session {}", self.client.session_id());
        self.client.quit().await
    }
}

impl Drop for SessionFixture {
    fn drop(&mut self) {
        if !self.closed {
            warn!(
                "Session {} dropped without quit; it stays open on the server until it times out",
                self.client.session_id()
            );
        }
    }
}
