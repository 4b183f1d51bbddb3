//! FieldSeal: envelope encryption for sensitive field-level data.
//!
//! Values such as national ID or card numbers are sealed with AES-256-CBC
//! under a per-name data encryption key (DEK), with a fresh random IV per
//! call, and packaged as `base64(IV || CIPHERTEXT)`.
//!
//! ```
//! use std::sync::Arc;
//! use fieldseal::{EnvelopeCipher, InMemoryKeyRegistry, KeyRegistry};
//!
//! let registry = Arc::new(InMemoryKeyRegistry::new());
//! registry.create("users_ssn_key");
//!
//! let cipher = EnvelopeCipher::new(registry);
//! let envelope = cipher.encrypt("123-45-6789", "users_ssn_key").unwrap();
//! assert_eq!(cipher.decrypt(&envelope, "users_ssn_key").unwrap(), "123-45-6789");
//! ```
//!
//! There is no authentication tag: callers that need tamper detection
//! must add a MAC themselves.

pub mod cli;
pub mod config;
pub mod crypto;
pub mod envelope;
pub mod errors;
pub mod handler;
pub mod registry;
pub mod service;

pub use envelope::{Envelope, EnvelopeVersion};
pub use errors::{FieldSealError, Result};
pub use registry::{Dek, InMemoryKeyRegistry, KeyRegistry};
pub use service::EnvelopeCipher;
