// ABOUTME: Editor-integration adapter for the Nim compiler's idetools mode
// ABOUTME: Spawns one compiler query per request and reshapes its tab-separated output

pub mod completer;
pub mod config;
pub mod error;
pub mod idetools;
pub mod parse;

pub use completer::{NimCompleter, SUPPORTED_FILETYPES, SUPPORTED_SUBCOMMANDS};
pub use config::CompleterConfig;
pub use error::{CompleterError, Result};
pub use idetools::IdeMode;

pub use nimtide_types as types;
