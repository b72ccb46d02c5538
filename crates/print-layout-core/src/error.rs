use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("Image '{key}' is wider than the page ({width} > {page_width})")]
    ImageTooWide {
        key: String,
        width: u32,
        page_width: u32,
    },
    #[error("Image '{key}' is taller than the page ({height} > {page_height})")]
    ImageTooTall {
        key: String,
        height: u32,
        page_height: u32,
    },
    #[error("Image '{key}' has zero width")]
    ZeroWidth { key: String },
    #[error("Invalid page dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    // Internal invariant violations. These carry the chain dump at failure time.
    #[error("Split outside subrange: offset {offset} not in (0, {length}); chain: {chain}")]
    SplitOutOfRange {
        offset: u32,
        length: u32,
        chain: String,
    },
    #[error("Cannot merge, subrange is last in chain; chain: {chain}")]
    NoSuccessor { chain: String },
    #[error("Merge overflowed chain: wanted length {target}, reached {reached}; chain: {chain}")]
    ChainOverflow {
        target: u32,
        reached: u32,
        chain: String,
    },
    #[error("Seek out of range: offset {offset}; chain: {chain}")]
    SeekOutOfRange { offset: i64, chain: String },
    #[error("Cannot remove chain head; chain: {chain}")]
    HeadRemoval { chain: String },
    #[error("Failed to read {width} from start of row; chain: {chain}")]
    RowTooNarrow { width: u32, chain: String },
}

impl PackError {
    /// True for errors caused by a bug in the packing logic rather than by input or configuration.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            PackError::SplitOutOfRange { .. }
                | PackError::NoSuccessor { .. }
                | PackError::ChainOverflow { .. }
                | PackError::SeekOutOfRange { .. }
                | PackError::HeadRemoval { .. }
                | PackError::RowTooNarrow { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PackError>;
