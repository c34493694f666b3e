// Metrodesk Core Library
// Back-office client runtime for the metro ticketing platform

pub mod config;
pub mod gateway;
pub mod idle;
pub mod prefs;
pub mod profile;
pub mod readstate;
pub mod resources;
pub mod session;
pub mod signal;
pub mod sources;
pub mod task;

// Export core types
pub use config::DeskConfig;
pub use gateway::{Backend, Gateway};
pub use idle::{IdleMonitor, IdleState, InputKind};
pub use prefs::ThemePrefs;
pub use profile::ProfileStore;
pub use readstate::{Channel, ReadStateStore};
pub use session::Session;
pub use signal::{Signal, SignalBus, SubscriptionId};
pub use sources::{AnnouncementsSource, FeedbackSource, StatsSource};
pub use task::{spawn_periodic, TaskHandle};

use std::sync::Arc;
use std::time::Duration;

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Rejected by backend: {0}")]
    Rejected(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Wire decode error: {0}")]
    WireError(#[from] metrodesk_api::WireError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
pub type Result<T> = std::result::Result<T, DeskError>;

/// Client runtime
///
/// Owns the shared subsystems (session, signal bus, gateway, read-state) and
/// the background tasks that keep the polling sources current. Dropping the
/// runtime aborts every task it spawned.
pub struct Metrodesk {
    pub config: DeskConfig,
    pub profile: Arc<ProfileStore>,
    pub session: Arc<Session>,
    pub bus: Arc<SignalBus>,
    pub gateway: Arc<Gateway>,
    pub read_state: Arc<ReadStateStore>,
    pub announcements: Arc<AnnouncementsSource>,
    pub feedback: Arc<FeedbackSource>,
    pub stats: Arc<StatsSource>,
    idle: Option<IdleMonitor>,
    announcement_sub: Option<SubscriptionId>,
    tasks: Vec<TaskHandle>,
}

impl Metrodesk {
    pub fn new(config: DeskConfig) -> Result<Self> {
        let profile = Arc::new(ProfileStore::new(&config.profile_dir)?);
        let session = Arc::new(Session::new(Arc::clone(&profile)));
        let bus = Arc::new(SignalBus::new());
        let gateway = Arc::new(Gateway::new(&config, Arc::clone(&session), Arc::clone(&bus))?);
        let backend: Arc<dyn Backend> = gateway.clone();
        let read_state = Arc::new(ReadStateStore::new(Arc::clone(&profile)));

        let announcements = Arc::new(AnnouncementsSource::new(
            Arc::clone(&backend),
            Arc::clone(&read_state),
            config.display_limit,
        ));
        let feedback = Arc::new(FeedbackSource::new(
            Arc::clone(&backend),
            Arc::clone(&read_state),
        ));
        let stats = Arc::new(StatsSource::new(Arc::clone(&backend)));

        Ok(Self {
            config,
            profile,
            session,
            bus,
            gateway,
            read_state,
            announcements,
            feedback,
            stats,
            idle: None,
            announcement_sub: None,
            tasks: Vec::new(),
        })
    }

    pub async fn start(&mut self) -> Result<()> {
        tracing::info!("Starting Metrodesk...");

        let (sub, task) = self.announcements.attach_bus(&self.bus);
        self.announcement_sub = Some(sub);
        self.tasks.push(task);

        self.tasks.push(
            self.feedback
                .start_polling(Duration::from_secs(self.config.feedback_poll_secs)),
        );

        let stats = Arc::clone(&self.stats);
        self.tasks.push(TaskHandle::spawn("stats_refresh", async move {
            stats.refresh().await;
        }));

        self.idle = Some(IdleMonitor::start(
            Arc::clone(&self.session),
            Arc::clone(&self.bus),
            Duration::from_secs(self.config.idle_timeout_secs),
        ));

        tracing::info!("Metrodesk started successfully");
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down Metrodesk...");

        if let Some(sub) = self.announcement_sub.take() {
            self.bus.unsubscribe(&sub);
        }
        for task in self.tasks.drain(..) {
            task.cancel();
        }
        if let Some(idle) = self.idle.take() {
            idle.shutdown();
        }

        tracing::info!("Metrodesk shut down successfully");
        Ok(())
    }

    pub fn idle(&self) -> Option<&IdleMonitor> {
        self.idle.as_ref()
    }

    fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.gateway) as Arc<dyn Backend>
    }

    pub fn auth(&self) -> resources::AuthResource {
        resources::AuthResource::new(
            self.backend(),
            Arc::clone(&self.session),
            Arc::clone(&self.bus),
        )
    }

    pub fn customers(&self) -> resources::CustomersResource {
        resources::CustomersResource::new(self.backend())
    }

    pub fn stations(&self) -> resources::StationsResource {
        resources::StationsResource::new(self.backend())
    }

    pub fn tickets(&self) -> resources::TicketsResource {
        resources::TicketsResource::new(self.backend())
    }

    pub fn promotions(&self) -> resources::PromotionsResource {
        resources::PromotionsResource::new(self.backend())
    }

    pub fn giftcodes(&self) -> resources::GiftcodesResource {
        resources::GiftcodesResource::new(self.backend())
    }

    pub fn settings(&self) -> resources::SettingsResource {
        resources::SettingsResource::new(self.backend(), Arc::clone(&self.bus))
    }

    pub fn reports(&self) -> resources::ReportsResource {
        resources::ReportsResource::new(self.backend())
    }

    pub fn purchase(&self) -> resources::PurchaseResource {
        resources::PurchaseResource::new(self.backend())
    }
}
