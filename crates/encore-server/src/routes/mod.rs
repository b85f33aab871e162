pub mod admin;
pub mod analytics;
pub mod artists;
pub mod auth;
pub mod catalog;
pub mod demo;
pub mod issues;
pub mod newsletters;
pub mod subscribers;
