pub mod schema;

pub use schema::{AgentConfig, BackendsConfig, Config, ScheduleConfig};
