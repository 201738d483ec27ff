#[derive(Debug, Clone, PartialEq)]
pub enum CropError {
    InvalidImageSize { width: usize, height: usize },
    InvalidImageData { expected_len: usize, actual_len: usize },
    UnsupportedChannels(usize),
    InvalidBlockSize(usize),
    InvalidApertureSize(usize),
    InvalidKernelSize(usize),
    InvalidSigma(f32),
    InvalidSensitivity(f32),
    InvalidThresholdFactor(f32),
    InvalidThreadCount(usize),
    EmptyLabel,
}

impl std::fmt::Display for CropError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CropError::InvalidImageSize { width, height } => {
                write!(f, "Invalid image dimensions: {}x{} (must be > 0)", width, height)
            }
            CropError::InvalidImageData { expected_len, actual_len } => {
                write!(f, "Image data length mismatch: expected {}, got {}", expected_len, actual_len)
            }
            CropError::UnsupportedChannels(c) => {
                write!(f, "Unsupported channel count: {} (expected 1-4)", c)
            }
            CropError::InvalidBlockSize(b) => {
                write!(f, "Invalid block size: {} (must be odd and >= 1)", b)
            }
            CropError::InvalidApertureSize(a) => {
                write!(f, "Invalid Sobel aperture: {} (must be 3, 5 or 7)", a)
            }
            CropError::InvalidKernelSize(k) => {
                write!(f, "Invalid blur kernel size: {} (must be odd and >= 1)", k)
            }
            CropError::InvalidSigma(s) => {
                write!(f, "Invalid blur sigma: {} (must be finite and > 0)", s)
            }
            CropError::InvalidSensitivity(k) => {
                write!(f, "Invalid Harris sensitivity: {} (must be finite)", k)
            }
            CropError::InvalidThresholdFactor(t) => {
                write!(f, "Invalid threshold factor: {} (must be finite and >= 0)", t)
            }
            CropError::InvalidThreadCount(n) => {
                write!(f, "Invalid thread count: {} (must be >= 1)", n)
            }
            CropError::EmptyLabel => write!(f, "Detection label must not be empty"),
        }
    }
}

impl std::error::Error for CropError {}

pub type CropResult<T> = Result<T, CropError>;
