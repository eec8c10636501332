use alloc::string::String;

#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Argument {name} not passed to constructor")]
    MissingArgument { name: String },
    #[error("Incorrect argument {name} type. Actual: {actual}, expected: {expected}")]
    IncorrectType {
        name: String,
        expected: &'static str,
        actual: String,
    },
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}
