// Re-export types from the protocol crate so they are accessible via lottoforge_core::*
pub use lottoforge_protocol::config;
pub use lottoforge_protocol::game;
pub use lottoforge_protocol::protocol;
pub use lottoforge_protocol::run;

// Internal Modules
pub mod api;
pub mod band;
pub mod buylist;
pub mod codec;
pub mod combination;
pub mod consts;
pub mod engine;
pub mod error;
pub mod generator;
pub mod history;
pub mod persist;
pub mod profile;
pub mod scorer;
