use super::Db;
use crate::{driver::Connect, Config, Result};

use fauxrm_core::Driver;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Builder {
    config: Config,
}

impl Builder {
    /// Replaces the whole configuration.
    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    pub fn fetch_batch_size(&mut self, size: usize) -> &mut Self {
        self.config.fetch_batch_size = size.max(1);
        self
    }

    pub fn in_list_limit(&mut self, limit: usize) -> &mut Self {
        self.config.in_list_limit = limit.max(1);
        self
    }

    /// Owner applied to unqualified table names
    pub fn default_owner(&mut self, owner: &str) -> &mut Self {
        self.config.default_owner = Some(owner.to_lowercase());
        self
    }

    /// Connects using the driver bundled for the URL's scheme.
    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        self.build(Connect::new(url)?).await
    }

    pub async fn build(&mut self, driver: impl Driver) -> Result<Db> {
        let connection = driver.connect().await?;
        let capability = driver.capability();

        tracing::debug!(
            url = %driver.url(),
            flavor = ?capability.flavor,
            "connected"
        );

        Ok(Db {
            connection,
            capability,
            config: self.config.clone(),
            catalog: HashMap::new(),
        })
    }
}
