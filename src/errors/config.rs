#[derive(thiserror::Error, Debug)]
pub enum ConfigErrorKind {
    #[error("Config data could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}
