use crate::{BoxError, ConnectionConfig};

/// Opens one transport-level connection. `config.host` always holds exactly
/// one host when the resolver calls this.
pub trait Connector: Send + Sync {
    type Handle: Send + 'static;

    fn connect(&self, config: &ConnectionConfig) -> Result<Self::Handle, BoxError>;
}

/// A live handle obtained from a successful resolution. The config is the
/// exact variant that connected, with `host` narrowed to that node.
#[derive(Debug)]
pub struct Connection<H> {
    handle: H,
    database: String,
    prefix: String,
    config: ConnectionConfig,
}

impl<H> Connection<H> {
    pub fn new(handle: H, config: ConnectionConfig) -> Self {
        Self {
            handle,
            database: config.database.clone(),
            prefix: config.prefix.clone(),
            config,
        }
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    pub fn into_handle(self) -> H {
        self.handle
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn host(&self) -> &str {
        self.config.host.first()
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }
}
