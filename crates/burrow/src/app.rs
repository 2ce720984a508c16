use crate::{config::Config, registry::Builder, Registry};

use burrow_core::{Error, Result};
use indexmap::IndexMap;
use std::sync::{Arc, Mutex};

/// Namespace identity the registry publishes under on the host application.
pub const NAMESPACE: &str = "burrow";

/// Host-application context.
///
/// One `App` per host instance, owned by that instance — never a process
/// global, so multiple hosts in one process (tests, embedded setups) do not
/// interfere. Created at startup, torn down with [`App::shutdown`].
#[derive(Default)]
pub struct App {
    registrations: Mutex<IndexMap<String, Slot>>,
}

enum Slot {
    /// A registration holds the identity but has not finished.
    InFlight,
    Published(Arc<Registry>),
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers under the fixed [`NAMESPACE`] identity using the built-in
    /// driver dispatch. Runs once during host startup.
    pub async fn register(&self, config: Config) -> Result<Arc<Registry>> {
        self.register_with(Registry::builder(config)).await
    }

    /// Registers a customized builder (injected driver, schema root, connect
    /// timeout).
    ///
    /// The identity is reserved before any connection work begins, so a
    /// racing or repeated registration fails without opening a single
    /// connection. On failure nothing is published and the reservation is
    /// released, leaving the identity free for a later attempt.
    pub async fn register_with(&self, builder: Builder) -> Result<Arc<Registry>> {
        self.reserve(NAMESPACE)?;

        match builder.build().await {
            Ok(registry) => {
                let registry = Arc::new(registry);
                let mut registrations = self.registrations.lock().unwrap();
                registrations.insert(NAMESPACE.to_string(), Slot::Published(registry.clone()));
                tracing::info!(identity = NAMESPACE, "registry published");
                Ok(registry)
            }
            Err(error) => {
                let mut registrations = self.registrations.lock().unwrap();
                registrations.shift_remove(NAMESPACE);
                Err(error)
            }
        }
    }

    /// The published registry, if registration has completed.
    pub fn registry(&self) -> Option<Arc<Registry>> {
        let registrations = self.registrations.lock().unwrap();
        match registrations.get(NAMESPACE) {
            Some(Slot::Published(registry)) => Some(registry.clone()),
            _ => None,
        }
    }

    fn reserve(&self, identity: &str) -> Result<()> {
        let mut registrations = self.registrations.lock().unwrap();
        if registrations.contains_key(identity) {
            return Err(Error::duplicate_registration(identity));
        }
        registrations.insert(identity.to_string(), Slot::InFlight);
        Ok(())
    }

    /// Releases every connection and clears the namespace.
    ///
    /// Close failures are logged, not escalated.
    pub async fn shutdown(&self) {
        let published: Vec<Arc<Registry>> = {
            let mut registrations = self.registrations.lock().unwrap();
            registrations
                .drain(..)
                .filter_map(|(_, slot)| match slot {
                    Slot::Published(registry) => Some(registry),
                    Slot::InFlight => None,
                })
                .collect()
        };

        for registry in published {
            registry.close_all().await;
        }

        tracing::info!("registry shut down");
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registrations = self.registrations.lock().unwrap();
        f.debug_struct("App")
            .field("registrations", &registrations.keys().collect::<Vec<_>>())
            .finish()
    }
}
