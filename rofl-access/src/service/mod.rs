//! Service layer
//!
//! Services hold the business logic of machine access. They are trait-based
//! so machine access can be exercised against test doubles.

mod credentials;

pub use credentials::CredentialService;

pub use credentials::SiweCredentialService;
