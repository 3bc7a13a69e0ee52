use crate::geo::geohash::MAX_PRECISION;

/// Geohash precision used to cluster markers at a map zoom level.
/// Zoom levels above the table fall through to full storage precision.
pub fn precision_for_zoom(zoom: i64) -> usize {
    match zoom {
        i64::MIN..=2 => 1,
        3..=4 => 2,
        5..=6 => 3,
        7..=8 => 4,
        9..=10 => 5,
        11..=12 => 6,
        13..=14 => 7,
        _ => MAX_PRECISION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn step_table() {
        let expected = [
            (1, 1),
            (2, 1),
            (3, 2),
            (4, 2),
            (5, 3),
            (6, 3),
            (7, 4),
            (8, 4),
            (9, 5),
            (10, 5),
            (11, 6),
            (12, 6),
            (13, 7),
            (14, 7),
            (15, 8),
            (18, 8),
            (40, 8),
        ];
        for (zoom, precision) in expected {
            assert_eq!(precision_for_zoom(zoom), precision, "zoom {}", zoom);
        }
    }

    proptest! {
        #[test]
        fn non_decreasing_and_bounded(zoom in -100i64..100) {
            let p = precision_for_zoom(zoom);
            prop_assert!((1..=8).contains(&p));
            prop_assert!(precision_for_zoom(zoom + 1) >= p);
        }
    }
}
