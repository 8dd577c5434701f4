//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure:
//! - `TestMongo`: MongoDB container with a connected client
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::TestMongo;
//!
//! #[tokio::test]
//! #[ignore] // Requires Docker
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let db = mongo.database();
//!     let collection = db.collection::<Document>("items");
//! }
//! ```

pub mod mongodb;

pub use crate::mongodb::TestMongo;
