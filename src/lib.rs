//!# synodsm
//!
//! Manage BitTorrent tasks of a Synology Download Station from the command line.
//!
//! The library side exposes the Download Station client used by the `synodsm` binary:
//!
//! - API discovery through `SYNO.API.Info`
//! - Login and logout with `SYNO.API.Auth`
//! - List BitTorrent tasks with human-readable size and progress
//! - Create tasks from torrent URLs and magnet links
//! - Pause, resume and delete single tasks
//!
//! ## Usage example
//!
//! ```rust,no_run
//! use anyhow::Result;
//! use std::env;
//! use synodsm::client::SynoDS;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     let synods = SynoDS::builder()
//!         .host(env::var("SYNOLOGY_HOST")?)
//!         .build()?;
//!
//!     let session = synods
//!         .login(&env::var("SYNOLOGY_USERNAME")?, &env::var("SYNOLOGY_PASSWORD")?)
//!         .await?;
//!
//!     for task in synods.list_tasks(&session).await? {
//!         println!("task: {}, title: {}, progress: {}", task.id, task.title, task.progress);
//!     }
//!
//!     synods.logout().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod display;
pub mod entities;
pub mod utils;
