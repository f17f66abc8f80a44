pub mod authz;
pub mod catalog;
pub mod cli;
pub mod core;
pub mod factory;
pub mod ledger;
pub mod media;
pub mod model;
pub mod repository;
pub mod settings;
