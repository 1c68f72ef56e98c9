pub mod cli;
pub mod config;
pub mod logging;
pub mod models;
pub mod playback;
pub mod settings;
pub mod splitter;
pub mod timer;
pub mod ui;
