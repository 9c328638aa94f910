//! Core ChambaYa client library (config, session, API client, post-auth
//! resolver, notifications).

pub mod api;
pub mod config;
pub mod flow;
pub mod interrupt;
pub mod logging;
pub mod navigation;
pub mod notifications;
pub mod resolver;
pub mod session;
