pub mod actors;
pub mod config;
#[cfg(feature = "console")]
pub mod console;
pub mod dashboard;
pub mod gateway;
pub mod loader;
pub mod types;
pub mod util;
pub mod view;

pub use config::Config;
pub use dashboard::Dashboard;
pub use types::{ActionKind, AlertRecord, Host, HostId, OsKind, Severity, TopOffenderStat};
