//! Search Flickr and browse the results in a grid grouped by query.
//!
//! The screen logic lives in [`screen`] over the [`state`] types; [`app`]
//! wires it to iced and the Flickr client in [`search`].

pub mod app;
pub mod config;
pub mod logging;
pub mod screen;
pub mod search;
pub mod state;
pub mod ui;
