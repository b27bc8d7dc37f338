//! Shared handle to the host and its protection registry.

use std::fmt;
use std::rc::Rc;

use hostvec_core::{Host, Registry};
use hostvec_protect::PreserveList;

use crate::config::{ConfigError, VectorConfig};

/// The host runtime, the registry its collector consults, and the vector
/// configuration, bundled for cheap cloning into every vector.
///
/// Nothing here is a hidden global: tests build a `Runtime` around a mock
/// host and a counting registry.
#[derive(Clone)]
pub struct Runtime {
    host: Rc<dyn Host>,
    registry: Rc<dyn Registry>,
    config: VectorConfig,
}

impl Runtime {
    /// Bundle `host` and `registry` with the default configuration.
    pub fn new(host: Rc<dyn Host>, registry: Rc<dyn Registry>) -> Self {
        Self {
            host,
            registry,
            config: VectorConfig::default(),
        }
    }

    /// Bundle `host` with a fresh [`PreserveList`].
    pub fn with_preserve_list(host: Rc<dyn Host>) -> Self {
        Self::new(host, Rc::new(PreserveList::new()))
    }

    /// Bundle `host` and `registry` with a validated configuration.
    pub fn with_config(
        host: Rc<dyn Host>,
        registry: Rc<dyn Registry>,
        config: VectorConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            host,
            registry,
            config,
        })
    }

    /// The host runtime.
    pub fn host(&self) -> &dyn Host {
        &*self.host
    }

    /// The protection registry.
    pub fn registry(&self) -> &Rc<dyn Registry> {
        &self.registry
    }

    /// The vector configuration.
    pub fn config(&self) -> &VectorConfig {
        &self.config
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("live_protections", &self.registry.live())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
