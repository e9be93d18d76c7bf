use thiserror::Error;

/// Schema errors are fatal to code generation for the table that carries
/// them; no partial output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A model references a partition the table never declares.
    #[error("model `{model}` references undeclared partition `{partition}`")]
    UnknownPartition { model: String, partition: String },

    /// A key component token is neither a literal nor a `_.field` reference.
    #[error("invalid key component `{component}` in {context}")]
    InvalidKeyComponent { component: String, context: String },
}
