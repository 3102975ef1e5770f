//! Property tests for hexapi-core encoders.

#![allow(clippy::unwrap_used, clippy::panic)]

use hexapi_core::geostore::sort_keys;
use hexapi_core::headfinder::{HeadFinderQuery, clamp_max_scenes, encode_query};
use hexapi_core::{BoundingBox, LruCache, included_range, less_than_or_equal};
use proptest::prelude::*;

proptest! {
    #[test]
    fn included_range_wraps_both_ends(start in "[0-9-]{1,12}", end in "[0-9-]{1,12}") {
        let encoded = included_range(&start, &end);
        prop_assert!(encoded.starts_with('['));
        prop_assert!(encoded.ends_with('['));
        prop_assert_eq!(encoded, format!("[{start},{end}["));
    }

    #[test]
    fn less_than_or_equal_roundtrips_integers(value in 0u32..10_000) {
        let encoded = less_than_or_equal(value);
        let number: u32 = encoded.trim_end_matches('[').parse().unwrap();
        prop_assert_eq!(number, value);
    }

    #[test]
    fn bbox_display_parses_back(
        min_lon in -180.0f64..180.0,
        min_lat in -90.0f64..90.0,
        max_lon in -180.0f64..180.0,
        max_lat in -90.0f64..90.0,
    ) {
        let bbox = BoundingBox::new(min_lon, min_lat, max_lon, max_lat);
        let parsed: BoundingBox = bbox.to_csv().parse().unwrap();
        prop_assert_eq!(parsed, bbox);
    }

    #[test]
    fn max_scenes_never_exceeds_cap(requested in any::<u32>()) {
        let clamped = clamp_max_scenes(requested);
        prop_assert!((1..=50).contains(&clamped));
        if (1..=50).contains(&requested) {
            prop_assert_eq!(clamped, requested);
        }
    }

    #[test]
    fn sort_keys_order_follows_prefix(name in "[a-z_]{0,12}", descending in any::<bool>()) {
        let input = if descending { format!("-{name}") } else { name };
        let keys = sort_keys(&input);
        let expected = if descending { ",,0" } else { ",,1" };
        prop_assert!(keys.ends_with(expected));
    }

    #[test]
    fn encoded_query_has_no_raw_spaces(scene in "[ -~]{0,24}") {
        let query = HeadFinderQuery {
            scene_name: Some(scene),
            ..HeadFinderQuery::default()
        };
        let encoded = encode_query(&query.params("user key"));
        prop_assert!(!encoded.contains(' '));
    }

    #[test]
    fn cache_never_exceeds_capacity(capacity in 1usize..16, keys in prop::collection::vec(0u8..64, 0..128)) {
        let mut cache = LruCache::new(capacity);
        for key in keys {
            cache.insert(key, ());
            prop_assert!(cache.len() <= capacity);
        }
    }
}
