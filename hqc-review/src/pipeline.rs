//! Pairing pipeline orchestration
//!
//! Discovery, grouping, sampling and mask pairing run to completion before
//! any review starts. Per-file problems never abort the run; they are
//! collected in the [`PairingReport`].

use crate::services::{
    FileScanner, GroupedImages, ImagePair, PairResolver, RegionVocabulary, SampledSelection,
    ScanError,
};
use hqc_common::config::TomlConfig;
use hqc_common::{Error, FileMetadata, Result as CommonResult};
use rand::Rng;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Non-fatal conditions reported by a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingWarning {
    /// No raw image for the subject in the directory
    NoFilesFound { directory: PathBuf, subject: String },
    /// Sampled raw image has no prediction mask beside it
    MissingCompanionImage { raw: PathBuf },
}

/// Everything a pipeline run produced
#[derive(Debug, Clone, Default)]
pub struct PairingReport {
    /// Validated pairs, in sampling order
    pub pairs: Vec<ImagePair>,
    /// Raw images found by discovery
    pub discovered: usize,
    /// Raw images excluded for missing region or hemisphere
    pub unresolved: Vec<PathBuf>,
    /// Raw images chosen by sampling
    pub sampled: usize,
    pub warnings: Vec<PairingWarning>,
}

impl PairingReport {
    pub fn no_files_found(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, PairingWarning::NoFilesFound { .. }))
    }

    /// Raw images dropped for lack of a mask
    pub fn missing_companions(&self) -> impl Iterator<Item = &Path> {
        self.warnings.iter().filter_map(|w| match w {
            PairingWarning::MissingCompanionImage { raw } => Some(raw.as_path()),
            _ => None,
        })
    }

    /// Write the pair list as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> CommonResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &self.pairs)
            .map_err(|e| Error::Io(std::io::Error::from(e)))?;
        info!("Exported {} pairs to {}", self.pairs.len(), path.display());
        Ok(())
    }
}

/// Discovery → grouping → sampling → pairing
pub struct PairingPipeline {
    vocabulary: RegionVocabulary,
    scanner: FileScanner,
    resolver: PairResolver,
    samples_per_hemisphere: usize,
}

impl PairingPipeline {
    pub fn new(vocabulary: RegionVocabulary, config: &TomlConfig) -> Self {
        Self {
            vocabulary,
            scanner: FileScanner::new(&config.raw_extension),
            resolver: PairResolver::new(&config.mask_suffix, config.mask_extensions.as_slice()),
            samples_per_hemisphere: config.samples_per_hemisphere,
        }
    }

    pub fn vocabulary(&self) -> &RegionVocabulary {
        &self.vocabulary
    }

    pub fn scanner(&self) -> &FileScanner {
        &self.scanner
    }

    pub fn samples_per_hemisphere(&self) -> usize {
        self.samples_per_hemisphere
    }

    /// Run the whole pipeline for one subject.
    ///
    /// Only an unusable directory is an error. An empty directory yields an
    /// empty report carrying [`PairingWarning::NoFilesFound`].
    pub fn run<R>(
        &self,
        directory: &Path,
        subject: &str,
        rng: &mut R,
    ) -> Result<PairingReport, ScanError>
    where
        R: Rng + ?Sized,
    {
        info!("Scanning {}...", directory.display());
        let discovered = self.scanner.discover(directory, subject)?;
        info!("Found {} raw images for {}", discovered.len(), subject);

        let mut report = PairingReport {
            discovered: discovered.len(),
            ..PairingReport::default()
        };

        if discovered.is_empty() {
            warn!(
                directory = %directory.display(),
                subject = %subject,
                "No raw images found"
            );
            report.warnings.push(PairingWarning::NoFilesFound {
                directory: directory.to_path_buf(),
                subject: subject.to_string(),
            });
            return Ok(report);
        }

        let grouped = GroupedImages::build(discovered, &self.vocabulary);
        if !grouped.unresolved.is_empty() {
            info!(
                "{} images excluded: region or hemisphere not recognized",
                grouped.unresolved.len()
            );
        }
        if grouped.is_empty() {
            warn!("No images matched the region vocabulary. Check filenames.");
        }

        let selection = grouped.sample(self.samples_per_hemisphere, rng);
        report.unresolved = grouped.unresolved;
        report.sampled = selection.len();

        self.pair(selection, &mut report);
        info!("{} image pairs ready for review", report.pairs.len());

        Ok(report)
    }

    fn pair(&self, selection: SampledSelection, report: &mut PairingReport) {
        for sampled in selection.entries {
            let metadata = FileMetadata {
                region: Some(sampled.region),
                hemisphere: Some(sampled.hemisphere),
            };
            match self.resolver.resolve(&sampled.path, metadata) {
                Some(pair) => report.pairs.push(pair),
                None => {
                    warn!(
                        file = %sampled.path.file_name().unwrap_or_default().to_string_lossy(),
                        "No prediction mask found"
                    );
                    report
                        .warnings
                        .push(PairingWarning::MissingCompanionImage { raw: sampled.path });
                }
            }
        }
    }
}
