use thiserror::Error;

/// Errors raised anywhere between the record source and the renderer sink.
///
/// The first five variants concern a single invoice: the batch driver logs
/// them and moves on to the next invoice. `ResourceFailure` and `Config`
/// mean the pipeline itself cannot continue.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// A foreign key (customer id, product id) has no matching row.
    #[error("{entity} {id} not found")]
    RecordNotFound { entity: &'static str, id: u32 },

    /// A code value is not in its allowed-value table.
    #[error("invalid code for {field}: '{value}'")]
    InvalidCode { field: String, value: String },

    /// A mandatory field was empty or absent at projection time.
    #[error("data incomplete: {field} is missing")]
    DataIncomplete { field: String },

    /// An amount overflowed, or amounts that must agree after rounding do not.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// Two item rows of one invoice carry the same line number.
    #[error("invoice {invoice} has line {line} more than once")]
    DuplicateLine { invoice: u32, line: u32 },

    /// Record source or renderer sink failure.
    #[error("resource failure: {0}")]
    ResourceFailure(String),

    /// Configuration could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    pub fn invalid_code(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidCode {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn incomplete(field: impl Into<String>) -> Self {
        Self::DataIncomplete {
            field: field.into(),
        }
    }

    pub fn resource(message: impl Into<String>) -> Self {
        Self::ResourceFailure(message.into())
    }

    /// True when the error only affects the invoice being processed.
    pub fn is_per_invoice(&self) -> bool {
        matches!(
            self,
            Self::RecordNotFound { .. }
                | Self::InvalidCode { .. }
                | Self::DataIncomplete { .. }
                | Self::Arithmetic(_)
                | Self::DuplicateLine { .. }
        )
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        Self::ResourceFailure(format!("I/O error: {e}"))
    }
}
