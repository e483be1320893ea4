mod filesystem;
mod loader;
mod model;
mod validation;

pub use filesystem::{FileSystem, RealFileSystem};
pub use loader::{ConfigLoader, FileConfigLoader, LOCAL_CONFIG_NAME, LoadResult};
pub use model::{
    CheckConfig, CheckKind, Config, PathsConfig, SourceConfig, TransportConfig,
};
pub use validation::validate_config;
