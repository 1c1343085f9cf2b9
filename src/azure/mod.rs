pub mod provider;
pub mod types;
pub mod client;
pub mod mock;

pub use provider::{AccessToken, ManagementApi};
pub use client::AzureClient;
pub use mock::MockManagementApi;
