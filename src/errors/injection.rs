#[derive(thiserror::Error, Debug)]
pub enum ExportErrorKind {
    #[error("Unable to export value of kind {kind}")]
    NotExportable { kind: &'static str },
}
