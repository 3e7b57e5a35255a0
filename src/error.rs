use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),
    /// The window can't be laid out as rows of the most recent packet stride
    #[error("window of {len} samples does not reshape into rows of {stride}")]
    Reshape { len: usize, stride: usize },
    #[error("sample {value} exceeds the sanity bound of {limit}")]
    OutOfRange { value: f32, limit: f32 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
