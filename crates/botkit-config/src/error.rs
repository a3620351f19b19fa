use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("namespace must not be empty")]
    EmptyNamespace,
    #[error("namespace '{0}' must not contain the path separator '/'")]
    NamespaceSeparator(String),
    #[error(
        "namespace '{namespace}' is already bound to schema '{existing}', refusing to bind '{requested}'"
    )]
    NamespaceBound {
        namespace: String,
        existing: String,
        requested: String,
    },
    #[error("schema '{ident}': {detail}")]
    Schema { ident: String, detail: String },
}
