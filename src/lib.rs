pub mod config;
pub mod logger;

pub mod control {
    pub mod error;
    pub mod model;
    pub mod simulator;
}
