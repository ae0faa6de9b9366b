//! Integration tests for the validating client.
//!
//! ## Test Organization
//!
//! - `gateway` - validate-then-delegate behaviour of collection handles
//! - `indexes` - index provisioning, database selection and recreate
//! - `client` - client facade, connection state and end-to-end scenarios

pub mod gateway;
