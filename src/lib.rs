pub mod app;
pub mod fetcher;
pub mod format;
pub mod host;
pub mod logging;
pub mod notes;
pub mod settings;
pub mod video;
pub mod youtube_client;
