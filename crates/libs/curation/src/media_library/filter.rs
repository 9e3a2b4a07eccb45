use common_types::{FilterCriteria, MediaAsset};

/// Filtering over an in-memory library snapshot. Never touches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaAssetFilterIndex;

impl MediaAssetFilterIndex {
    /// Type toggle and filename query must both match. The query is a case
    /// insensitive substring, an empty query matches every filename.
    #[must_use]
    pub fn matches(asset: &MediaAsset, criteria: &FilterCriteria) -> bool {
        if !criteria.media_type.matches(asset.kind()) {
            return false;
        }
        criteria.query.is_empty()
            || asset
                .original_filename
                .to_lowercase()
                .contains(&criteria.query.to_lowercase())
    }

    /// Keeps the matching assets in their original order.
    #[must_use]
    pub fn filter(assets: &[MediaAsset], criteria: &FilterCriteria) -> Vec<MediaAsset> {
        assets
            .iter()
            .filter(|asset| Self::matches(asset, criteria))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::asset;
    use common_types::MediaTypeFilter;
    use rstest::{fixture, rstest};

    #[fixture]
    fn library() -> Vec<MediaAsset> {
        vec![
            asset(1, "IMG_001.PNG", "image/png"),
            asset(2, "stage-night.jpg", "IMAGE/JPEG"),
            asset(3, "opening.mp4", "video/mp4"),
            asset(4, "rehearsal.webm", "video/webm"),
            asset(5, "minutes.pdf", "application/pdf"),
            asset(6, "", ""),
        ]
    }

    fn ids(assets: &[MediaAsset]) -> Vec<i64> {
        assets.iter().map(|asset| asset.id.0).collect()
    }

    #[rstest]
    fn default_criteria_keep_everything(library: Vec<MediaAsset>) {
        assert_eq!(
            MediaAssetFilterIndex::filter(&library, &FilterCriteria::default()),
            library
        );
    }

    #[rstest]
    #[case("", MediaTypeFilter::Image, vec![1, 2])]
    #[case("", MediaTypeFilter::Video, vec![3])]
    #[case("", MediaTypeFilter::Pdf, vec![5])]
    #[case("img", MediaTypeFilter::All, vec![1])]
    #[case("img", MediaTypeFilter::Video, vec![])]
    #[case("STAGE", MediaTypeFilter::Image, vec![2])]
    #[case(" stage", MediaTypeFilter::Image, vec![])]
    #[case("e", MediaTypeFilter::All, vec![2, 3, 4, 5])]
    #[case("nothing", MediaTypeFilter::All, vec![])]
    fn type_and_query_both_apply(
        library: Vec<MediaAsset>,
        #[case] query: &str,
        #[case] media_type: MediaTypeFilter,
        #[case] expected: Vec<i64>,
    ) {
        let criteria = FilterCriteria::new(query, media_type);
        assert_eq!(ids(&MediaAssetFilterIndex::filter(&library, &criteria)), expected);
    }

    #[rstest]
    fn filtering_twice_gives_the_same_result(library: Vec<MediaAsset>) {
        let criteria = FilterCriteria::new("i", MediaTypeFilter::All);
        let first = MediaAssetFilterIndex::filter(&library, &criteria);
        assert_eq!(MediaAssetFilterIndex::filter(&library, &criteria), first);
        assert_eq!(MediaAssetFilterIndex::filter(&first, &criteria), first);
    }
}
