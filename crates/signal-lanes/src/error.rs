use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("initial feed has already been seeded")]
    AlreadySeeded,

    #[error("initial feed must be seeded before any other message is admitted")]
    SeedAfterAdmission,

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("feed runner is no longer accepting commands")]
    Closed,
}
