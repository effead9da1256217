use thiserror::Error;

/// Top-level error type for the neurolis morphology kernel.
#[derive(Debug, Error)]
pub enum NeurolisError {
    #[error(transparent)]
    RawData(#[from] RawDataError),

    #[error(transparent)]
    MissingParent(#[from] MissingParentError),

    #[error(transparent)]
    Soma(#[from] SomaError),

    #[error(transparent)]
    Builder(#[from] BuilderError),
}

/// Lexical or per-record shape violations in SWC text.
#[derive(Debug, Error)]
pub enum RawDataError {
    #[error("line {line}: unexpected end of file inside a record")]
    EarlyEndOfFile { line: u32 },

    #[error("line {line}: record is not parsable")]
    NonParsableLine { line: u32 },

    #[error("line {line}: negative sample or parent id")]
    NegativeId { line: u32 },

    #[error("line {line}: sample {id} lists itself as its parent")]
    SelfParent { id: u32, line: u32 },

    #[error("line {line}: sample id {id} already declared on line {first_line}")]
    RepeatedId { id: u32, line: u32, first_line: u32 },

    #[error("line {line}: unsupported section type {raw}")]
    UnsupportedSectionType { raw: i64, line: u32 },
}

/// A sample references a parent id that appears nowhere in the file.
#[derive(Debug, Error)]
#[error("line {line}: sample {id} references missing parent {parent}")]
pub struct MissingParentError {
    /// Id of the sample holding the dangling reference.
    pub id: u32,
    /// The parent id that failed to resolve.
    pub parent: u32,
    /// Source line of the referencing sample.
    pub line: u32,
}

/// Structural violations of the soma encoding.
#[derive(Debug, Error)]
pub enum SomaError {
    #[error("line {line}: soma sample {id} has a neurite parent")]
    NeuriteParent { id: u32, line: u32 },

    #[error("multiple soma samples have no parent")]
    MultipleSomata,

    #[error("line {line}: soma sample {id} bifurcates into several soma children")]
    Bifurcation { id: u32, line: u32 },
}

/// Errors raised by the mutable morphology builder.
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("section handle does not exist in this morphology")]
    SectionNotFound,
}

/// Convenience type alias for results using [`NeurolisError`].
pub type Result<T> = std::result::Result<T, NeurolisError>;
