pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Empty series: {name}")]
    EmptySeries { name: String },

    #[error(
        "Sample '{name}' has {sample_len} values but the reference '{reference}' has {reference_len}; series must be index-aligned"
    )]
    LengthMismatch {
        name: String,
        sample_len: usize,
        reference: String,
        reference_len: usize,
    },

    #[error("Series '{name}' has zero variance; correlation with it is undefined")]
    ZeroVariance { name: String },

    #[error("Series '{name}' contains a non-finite value at index {index}")]
    NonFiniteValue { name: String, index: usize },

    #[error(
        "Sample '{name}' correlates negatively with the reference (r = {r:.4}); the diagram only spans correlations in [0, 1]"
    )]
    NegativeCorrelation { name: String, r: f64 },

    #[error(
        "Style configuration covers {styles} sample(s) but {samples} were supplied; add styles for the remaining samples"
    )]
    StyleShortfall { styles: usize, samples: usize },

    #[error("No samples supplied; a diagram needs at least one sample series")]
    NoSamples,

    #[error("Invalid diagram options: {reason}")]
    InvalidOptions { reason: &'static str },
}
