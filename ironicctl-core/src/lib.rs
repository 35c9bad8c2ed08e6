pub mod catalog;
pub mod cli;
pub mod conf;
pub mod config;
pub mod credentials;
pub mod error;
pub mod ini;
pub mod provider;

pub use catalog::{Catalog, CatalogParams, ConfigEntry, ConfigValue, OsFamily};
pub use cli::{CliInvoker, InvokeError, MockInvoker, Output, RealInvoker, RetryPolicy};
pub use conf::{apply, Change};
pub use config::IronicctlConfig;
pub use credentials::{AuthEnv, ConfigSource, CredentialResolver, Credentials, FileSource, StaticSource};
pub use error::{IronicError, Result};
pub use ini::{ConfigSections, IniDocument};
pub use provider::{parse_list_output, parse_shell_output, IronicProvider};
