pub mod credential;
pub mod refresh;
pub mod service;

pub use credential::CredentialStore;
pub use refresh::Refresher;
pub use service::AuthService;
