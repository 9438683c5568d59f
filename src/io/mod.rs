mod local;

pub use local::FileSource;

/// Size of the read buffer, the EOCD search window and the inflate staging
/// buffer.
pub const BUFFER_SIZE: usize = 8192;
