use alloc::string::String;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("The class '{class}' does not exist.")]
    ClassNotFound { class: String },
    #[error("Could not resolve value for parameter \"{parameter}\" of type {type_name} in class {class} (requested as {requested})")]
    MissingProperty {
        parameter: String,
        type_name: String,
        class: String,
        requested: String,
    },
    #[error("Unusable configured injection for parameter \"{parameter}\" of type \"{type_name}\"")]
    UnexpectedValue { parameter: String, type_name: String },
}
