//! Pairing pipeline services
//!
//! Data flows one way: vocabulary → metadata extraction → discovery →
//! grouping/sampling → mask pairing.

pub mod file_scanner;
pub mod group_sampler;
pub mod metadata_extractor;
pub mod pair_resolver;
pub mod vocabulary_loader;

pub use file_scanner::{FileScanner, ScanError};
pub use group_sampler::{
    group_and_sample, GroupedImages, ImageGroup, SampledImage, SampledSelection,
};
pub use metadata_extractor::{extract, extract_from_path, tokenize};
pub use pair_resolver::{ImagePair, PairResolver};
pub use vocabulary_loader::{RegionVocabulary, VocabularyError};
