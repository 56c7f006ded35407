pub mod service;

pub use service::{MatchFormat, ServiceConfig};
