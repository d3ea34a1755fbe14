//! Installer downloads

pub mod downloader;

pub use downloader::Downloader;
