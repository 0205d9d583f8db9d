//! desktidy - tidy a cluttered desktop into a dated folder
//!
//! This library scans a directory (normally the user's desktop), gives every
//! loose file a normalized, date-tagged name, and moves it into
//! `<category folder>/<day folder>` under a name not already taken there.

pub mod cli;
pub mod collision;
pub mod config;
pub mod desktop;
pub mod destination;
pub mod error;
pub mod file_organizer;
pub mod logging;
pub mod naming;
pub mod output;
pub mod policy;
pub mod prompt;

pub use cli::{Cli, Plan, Session, run_cli};
pub use collision::resolve_unique;
pub use config::{CompiledFilters, Config, ConfigError, Settings};
pub use desktop::{DesktopLocator, FixedDesktop, PlatformDesktop};
pub use destination::{Destination, DestinationResolver, Provisioning};
pub use error::AppError;
pub use file_organizer::{FileError, OrganizeError, Organizer, Report, SourceEntry};
pub use naming::{DateFormat, normalize, normalize_folder_name};
pub use policy::{Mode, NamingPolicy};
pub use prompt::{Prompt, ScriptedPrompt, StdinPrompt};
