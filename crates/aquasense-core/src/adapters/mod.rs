//! Adapters and registry for the questionnaire workflow.
//!
//! Each adapter trait covers one capability the workflow consumes: client
//! storage, the remote prediction endpoints, navigation and user alerts.
//! Real and fake implementations live side by side.

pub mod http;
pub mod http_impl;
pub mod http_mock;
pub mod store;
pub mod store_impl;
pub mod store_mock;
pub mod ui;

use std::sync::Arc;

/// Registry of the adapters a workflow runs against.
///
/// Adapters are shared trait objects so several workflows (and the host)
/// can hold the same store and UI.
#[derive(Clone)]
pub struct AdapterRegistry {
    /// Client key/value storage.
    pub store: Arc<dyn store::KeyValueStore>,

    /// Prediction and backend endpoints.
    pub api: Arc<dyn http::PredictionApi>,

    /// View switching.
    pub navigator: Arc<dyn ui::Navigator>,

    /// User-facing alerts.
    pub notifier: Arc<dyn ui::Notifier>,
}

impl AdapterRegistry {
    /// Creates a registry from the provided adapters.
    pub fn new(
        store: Arc<dyn store::KeyValueStore>,
        api: Arc<dyn http::PredictionApi>,
        navigator: Arc<dyn ui::Navigator>,
        notifier: Arc<dyn ui::Notifier>,
    ) -> Self {
        Self {
            store,
            api,
            navigator,
            notifier,
        }
    }

    /// Creates a registry whose navigator and notifier are the same session.
    pub fn with_session(
        store: Arc<dyn store::KeyValueStore>,
        api: Arc<dyn http::PredictionApi>,
        session: ui::SessionUi,
    ) -> Self {
        let session = Arc::new(session);
        Self::new(store, api, session.clone(), session)
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("store", &"Arc<dyn KeyValueStore>")
            .field("api", &"Arc<dyn PredictionApi>")
            .field("navigator", &"Arc<dyn Navigator>")
            .field("notifier", &"Arc<dyn Notifier>")
            .finish()
    }
}
