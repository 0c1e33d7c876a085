// # Credential Source Implementations
//
// This module provides implementations of the CredentialSource trait for
// the built-in ways of supplying a static key pair.

pub mod env;
pub mod file;
pub mod fixed;

pub use env::EnvCredentials;
pub use file::FileCredentials;
pub use fixed::StaticCredentials;
