mod common;

use common::{seed_at, test_pool, ProfileSeed, BROOKLYN, LOS_ANGELES, NEW_YORK};
use heatmap::geo::{precision_for_zoom, Bounds};
use heatmap::models::{HeatmapFilters, Role};
use heatmap::services::heatmap_service::aggregate;
use heatmap::HeatmapError;

async fn seed_three_cities(pool: &sqlx::SqlitePool) {
    seed_at(pool, &ProfileSeed::member("ny", "Nora"), NEW_YORK.0, NEW_YORK.1).await;
    seed_at(pool, &ProfileSeed::member("bk", "Ben"), BROOKLYN.0, BROOKLYN.1).await;
    seed_at(pool, &ProfileSeed::member("la", "Lia"), LOS_ANGELES.0, LOS_ANGELES.1).await;
}

#[tokio::test]
async fn three_cities_at_zoom_three() {
    let pool = test_pool().await;
    seed_three_cities(&pool).await;

    let first = aggregate(&pool, 3, None, &HeatmapFilters::default())
        .await
        .unwrap();
    assert_eq!(first.iter().map(|c| c.count).sum::<i64>(), 3);
    assert!(first.iter().all(|c| c.precision == precision_for_zoom(3)));
    assert!(first.iter().all(|c| c.geohash_prefix.len() == 2));

    let second = aggregate(&pool, 3, None, &HeatmapFilters::default())
        .await
        .unwrap();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.geohash_prefix, b.geohash_prefix);
        assert_eq!(a.count, b.count);
        assert_eq!(a.centroid_lat.to_bits(), b.centroid_lat.to_bits());
        assert_eq!(a.centroid_lon.to_bits(), b.centroid_lon.to_bits());
    }

    let ny = first.iter().find(|c| c.geohash_prefix == "dr").unwrap();
    assert_eq!(ny.count, 2);
    assert!((ny.centroid_lat - (NEW_YORK.0 + BROOKLYN.0) / 2.0).abs() < 1e-9);
}

#[tokio::test]
async fn hidden_and_admin_profiles_are_not_counted() {
    let pool = test_pool().await;
    seed_three_cities(&pool).await;

    let mut hidden = ProfileSeed::member("hidden", "Hal");
    hidden.is_discoverable = false;
    seed_at(&pool, &hidden, NEW_YORK.0, NEW_YORK.1).await;

    let mut admin = ProfileSeed::member("admin", "Ada");
    admin.role = Role::OrganizationAdmin;
    seed_at(&pool, &admin, NEW_YORK.0, NEW_YORK.1).await;

    let clusters = aggregate(&pool, 1, None, &HeatmapFilters::default())
        .await
        .unwrap();
    assert_eq!(clusters.iter().map(|c| c.count).sum::<i64>(), 3);
}

#[tokio::test]
async fn counts_are_conserved_under_filters() {
    let pool = test_pool().await;
    let cities = [NEW_YORK, BROOKLYN, LOS_ANGELES, (51.5074, -0.1278), (-33.8688, 151.2093)];
    let ids: Vec<String> = (0..20).map(|i| format!("u{:02}", i)).collect();
    for (i, id) in ids.iter().enumerate() {
        let mut seed = ProfileSeed::member(id, id);
        seed.affiliation_id = Some(if i % 2 == 0 { "org-a" } else { "org-b" });
        seed.graduation_year = Some(2010 + (i as i64 % 3));
        seed.major = Some(if i % 4 == 0 { "Computer Science" } else { "History" });
        seed.is_discoverable = i % 5 != 0;
        let (lat, lon) = cities[i % cities.len()];
        seed_at(&pool, &seed, lat, lon).await;
    }

    let filters = HeatmapFilters {
        affiliation_id: Some("org-a".to_string()),
        ..Default::default()
    };
    // even indices, minus multiples of 5 that are even (0, 10)
    let expected = (0..20).filter(|i| i % 2 == 0 && i % 5 != 0).count() as i64;
    for zoom in [1, 5, 9, 16] {
        let clusters = aggregate(&pool, zoom, None, &filters).await.unwrap();
        assert_eq!(clusters.iter().map(|c| c.count).sum::<i64>(), expected, "zoom {}", zoom);
    }

    let filters = HeatmapFilters {
        major: Some("SCIENCE".to_string()),
        graduation_year: Some(2010),
        ..Default::default()
    };
    let expected = (0..20)
        .filter(|i| i % 4 == 0 && i % 3 == 0 && i % 5 != 0)
        .count() as i64;
    let clusters = aggregate(&pool, 4, None, &filters).await.unwrap();
    assert_eq!(clusters.iter().map(|c| c.count).sum::<i64>(), expected);
}

#[tokio::test]
async fn bounds_filter_raw_points_before_grouping() {
    let pool = test_pool().await;
    seed_three_cities(&pool).await;

    let east_coast = Bounds::new(45.0, 35.0, -70.0, -80.0).unwrap();
    let clusters = aggregate(&pool, 1, Some(east_coast), &HeatmapFilters::default())
        .await
        .unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].count, 2);
}

#[tokio::test]
async fn antimeridian_viewport_is_split() {
    let pool = test_pool().await;
    seed_three_cities(&pool).await;
    seed_at(&pool, &ProfileSeed::member("fj", "Fia"), -17.7134, 178.065).await;
    seed_at(&pool, &ProfileSeed::member("ws", "Sam"), -13.8333, -171.75).await;

    let pacific = Bounds::new(0.0, -30.0, -170.0, 170.0).unwrap();
    let clusters = aggregate(&pool, 1, Some(pacific), &HeatmapFilters::default())
        .await
        .unwrap();
    assert_eq!(clusters.iter().map(|c| c.count).sum::<i64>(), 2);
}

#[tokio::test]
async fn malformed_bounds_are_rejected() {
    let pool = test_pool().await;
    let bounds = Bounds {
        north: f64::NAN,
        south: 0.0,
        east: 10.0,
        west: 0.0,
    };
    let err = aggregate(&pool, 5, Some(bounds), &HeatmapFilters::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HeatmapError::InvalidBounds(_)));
}

#[tokio::test]
async fn empty_store_yields_no_clusters() {
    let pool = test_pool().await;
    let clusters = aggregate(&pool, 10, None, &HeatmapFilters::default())
        .await
        .unwrap();
    assert!(clusters.is_empty());
}

#[tokio::test]
async fn major_filter_folds_accented_case() {
    let pool = test_pool().await;
    let mut eco = ProfileSeed::member("eco", "Élodie");
    eco.major = Some("Économie");
    seed_at(&pool, &eco, NEW_YORK.0, NEW_YORK.1).await;
    let mut plain = ProfileSeed::member("plain", "Paul");
    plain.major = Some("Economics");
    seed_at(&pool, &plain, BROOKLYN.0, BROOKLYN.1).await;

    for needle in ["économie", "ÉCONOMIE", " Économie "] {
        let filters = HeatmapFilters {
            major: Some(needle.to_string()),
            ..Default::default()
        };
        let clusters = aggregate(&pool, 3, None, &filters).await.unwrap();
        assert_eq!(clusters.iter().map(|c| c.count).sum::<i64>(), 1, "{:?}", needle);
    }

    let filters = HeatmapFilters {
        major: Some("ECONOM".to_string()),
        ..Default::default()
    };
    let clusters = aggregate(&pool, 3, None, &filters).await.unwrap();
    assert_eq!(clusters.iter().map(|c| c.count).sum::<i64>(), 1);
}
