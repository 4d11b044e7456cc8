//! Client-side orchestration for looking up a player profile and requesting
//! gameplay advice from the advice service.

pub mod config;
pub mod controller;
pub mod error;
pub mod schema;
pub mod transport;

pub use config::{load_settings, load_settings_with, ClientSettings};
pub use controller::{ActionOutcome, AdviceController, ControllerState, Phase};
pub use error::{ConfigError, ControllerError, TransportError};
pub use transport::{AdviceApi, HttpAdviceClient};
