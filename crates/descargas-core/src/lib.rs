pub mod config;
pub mod logging;

pub mod api;
pub mod artifact;
pub mod form;
pub mod poller;
pub mod session;
pub mod status;
pub mod view;
