//! Region/hemisphere grouping and bounded random sampling
//!
//! Discovered raw images are bucketed by region, sub-bucketed by hemisphere,
//! and each hemisphere bucket is sampled down to a fixed cap. The random
//! source is passed in so callers (and tests) can seed it.

use super::metadata_extractor::extract_from_path;
use super::vocabulary_loader::RegionVocabulary;
use hqc_common::Hemisphere;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::path::PathBuf;

/// Raw images for one region, split by hemisphere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageGroup {
    pub region: String,
    pub right: Vec<PathBuf>,
    pub left: Vec<PathBuf>,
}

impl ImageGroup {
    fn new(region: String) -> Self {
        Self {
            region,
            right: Vec::new(),
            left: Vec::new(),
        }
    }

    /// Candidates for one hemisphere
    pub fn hemisphere(&self, hemisphere: Hemisphere) -> &[PathBuf] {
        match hemisphere {
            Hemisphere::Right => &self.right,
            Hemisphere::Left => &self.left,
        }
    }

    fn hemisphere_mut(&mut self, hemisphere: Hemisphere) -> &mut Vec<PathBuf> {
        match hemisphere {
            Hemisphere::Right => &mut self.right,
            Hemisphere::Left => &mut self.left,
        }
    }
}

/// Groups in region first-seen order
#[derive(Debug, Clone, Default)]
pub struct GroupedImages {
    groups: Vec<ImageGroup>,
    index: HashMap<String, usize>,
    /// Paths dropped because region or hemisphere was not recognized
    pub unresolved: Vec<PathBuf>,
}

impl GroupedImages {
    /// Bucket paths by extracted region and hemisphere.
    ///
    /// Paths missing either field are excluded and kept in `unresolved` for
    /// diagnostics.
    pub fn build<I>(paths: I, vocabulary: &RegionVocabulary) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut grouped = Self::default();

        for path in paths {
            let meta = extract_from_path(&path, vocabulary);
            match (meta.region, meta.hemisphere) {
                (Some(region), Some(hemisphere)) => grouped.insert(region, hemisphere, path),
                _ => {
                    tracing::debug!(
                        path = %path.display(),
                        "Unresolved filename metadata, excluded"
                    );
                    grouped.unresolved.push(path);
                }
            }
        }

        grouped
    }

    fn insert(&mut self, region: String, hemisphere: Hemisphere, path: PathBuf) {
        let idx = match self.index.get(&region) {
            Some(&idx) => idx,
            None => {
                self.groups.push(ImageGroup::new(region.clone()));
                self.index.insert(region, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[idx].hemisphere_mut(hemisphere).push(path);
    }

    pub fn groups(&self) -> &[ImageGroup] {
        &self.groups
    }

    pub fn get(&self, region: &str) -> Option<&ImageGroup> {
        self.index.get(region).map(|&idx| &self.groups[idx])
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Draw at most `cap_per_hemisphere` images from every hemisphere bucket.
    ///
    /// Buckets at or under the cap are taken whole; larger ones are sampled
    /// uniformly without replacement. Output order: regions as first seen,
    /// `RH` before `LH` within a region.
    pub fn sample<R>(&self, cap_per_hemisphere: usize, rng: &mut R) -> SampledSelection
    where
        R: Rng + ?Sized,
    {
        let mut entries = Vec::new();

        for group in &self.groups {
            let count_rh = group.right.len().min(cap_per_hemisphere);
            let count_lh = group.left.len().min(cap_per_hemisphere);
            tracing::info!(
                "Region [{}]: selecting {} RH and {} LH images",
                group.region,
                count_rh,
                count_lh
            );

            for hemisphere in Hemisphere::SEARCH_ORDER {
                let candidates = group.hemisphere(hemisphere);
                let picked: Vec<&PathBuf> = if candidates.len() <= cap_per_hemisphere {
                    candidates.iter().collect()
                } else {
                    candidates
                        .choose_multiple(rng, cap_per_hemisphere)
                        .collect()
                };

                entries.extend(picked.into_iter().map(|path| SampledImage {
                    path: path.clone(),
                    region: group.region.clone(),
                    hemisphere,
                }));
            }
        }

        tracing::info!("Total images selected for review: {}", entries.len());

        SampledSelection { entries }
    }
}

/// One sampled raw image with the metadata it was grouped under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledImage {
    pub path: PathBuf,
    pub region: String,
    pub hemisphere: Hemisphere,
}

/// Result of sampling every group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampledSelection {
    pub entries: Vec<SampledImage>,
}

impl SampledSelection {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries for a region/hemisphere combination
    pub fn count(&self, region: &str, hemisphere: Hemisphere) -> usize {
        self.entries
            .iter()
            .filter(|e| e.region == region && e.hemisphere == hemisphere)
            .count()
    }
}

/// Group `paths` and sample each hemisphere bucket down to `cap_per_hemisphere`
pub fn group_and_sample<I, R>(
    paths: I,
    vocabulary: &RegionVocabulary,
    cap_per_hemisphere: usize,
    rng: &mut R,
) -> (GroupedImages, SampledSelection)
where
    I: IntoIterator<Item = PathBuf>,
    R: Rng + ?Sized,
{
    let grouped = GroupedImages::build(paths, vocabulary);
    let selection = grouped.sample(cap_per_hemisphere, rng);
    (grouped, selection)
}
