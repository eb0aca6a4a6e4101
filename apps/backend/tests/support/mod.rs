#![allow(dead_code)]

pub mod app_builder;
pub mod mock_db;

pub use app_builder::create_test_app;
