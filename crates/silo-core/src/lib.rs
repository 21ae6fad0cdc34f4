//! Core storage engine, validation, and configuration for silo.
//!
//! This crate owns everything that persists: the filesystem layout, atomic
//! object writes, multipart session management, and bucket listings. It also
//! hosts the syntactic validators the dispatcher runs before touching
//! storage, and the server configuration.
//!
//! # Modules
//!
//! - [`config`] - server configuration loaded from the environment
//! - [`error`] - typed storage failures
//! - [`store`] - the filesystem-backed object store
//! - [`validation`] - bucket-name, object-key, and part-number checks

pub mod config;
pub mod error;
pub mod store;
pub mod validation;

pub use config::SiloConfig;
pub use error::{StoreError, StoreResult};
pub use store::{FsStore, ObjectMeta};
pub use validation::{is_valid_bucket_name, is_valid_object_key, parse_part_number};
