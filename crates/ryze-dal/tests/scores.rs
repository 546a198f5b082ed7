use futures::TryStreamExt as _;
use ryze_dal::developer::DeveloperRepository;
use ryze_dal::metrics::MetricsRepository;
use ryze_dal::rating::{
    CreateRating, DeveloperRatingRepository, ShowcaseRatingRepository, VideoRatingRepository,
};
use ryze_dal::score::ScoreService;
use ryze_dal::{ListingParams, Order};
use ryze_scoring::{ScoringParams, Strategy};
use ryze_types::Stars;
use sqlx::Executor;

const TEST_DATA: &str = r#"
INSERT INTO developer_profile (id, version, created, modified, display_name, headline, rating, success_rate, created_by)
VALUES (1,1,datetime(),datetime(),'Ada','Embedded and firmware',0,0,'seed');
INSERT INTO developer_profile (id, version, created, modified, display_name, headline, rating, success_rate, created_by)
VALUES (2,1,datetime(),datetime(),'Brin',NULL,0,0,'seed');

INSERT INTO showcase (id, developer_id, version, created, modified, title, description, average_rating, total_ratings, created_by)
VALUES (1,1,1,datetime(),datetime(),'Realtime dashboard',NULL,0,0,'seed');

INSERT INTO video (id, developer_id, version, created, modified, title, url, average_rating, total_ratings, created_by)
VALUES (1,1,1,datetime(),datetime(),'Code walkthrough','https://cdn.example/v/1',0,0,'seed');

INSERT INTO developer_rating (id, developer_id, rater_id, stars, comment, created, modified)
VALUES (1,1,101,5,'Great work',datetime(),datetime());
INSERT INTO developer_rating (id, developer_id, rater_id, stars, comment, created, modified)
VALUES (2,1,102,4,NULL,datetime(),datetime());
"#;

async fn init_db() -> sqlx::Pool<sqlx::Sqlite> {
    const DB_URL: &str = "sqlite::memory:";
    let conn = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect(DB_URL)
        .await
        .unwrap();
    conn.execute("PRAGMA foreign_keys = ON").await.unwrap();
    sqlx::migrate!("../../migrations").run(&conn).await.unwrap();

    conn.execute_many(TEST_DATA)
        .try_collect::<Vec<_>>()
        .await
        .unwrap();

    conn
}

fn rating(stars: i64) -> CreateRating {
    CreateRating {
        stars: Stars::new(stars).unwrap(),
        comment: None,
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[tokio::test]
async fn test_update_developer_score_persists() {
    let conn = init_db().await;
    let service = ScoreService::with_defaults(conn.clone());

    // seeded ratings: 5 and 4 stars -> (10*3 + 2*4.5) / 12
    let update = service.update_developer_ryze_score(1).await.unwrap();
    assert!(approx(update.average_rating, 4.5));
    assert_eq!(update.total_ratings, 2);
    assert!(approx(update.ryze_score, 3.25));
    assert!(approx(update.success_rate, 65.0));

    let profile = DeveloperRepository::new(conn).get(1).await.unwrap();
    assert!(approx(profile.rating, 3.25));
    assert!(approx(profile.success_rate, 65.0));
}

#[tokio::test]
async fn test_refresh_is_idempotent() {
    let conn = init_db().await;
    let service = ScoreService::with_defaults(conn.clone());

    let first = service.update_developer_ryze_score(1).await.unwrap();
    let second = service.update_developer_ryze_score(1).await.unwrap();
    assert_eq!(first, second);

    let profile = DeveloperRepository::new(conn).get(1).await.unwrap();
    assert!(approx(profile.rating, first.ryze_score));
    assert!(approx(profile.success_rate, first.success_rate));
}

#[tokio::test]
async fn test_unrated_subject_scores_zero() {
    let conn = init_db().await;
    let service = ScoreService::with_defaults(conn.clone());

    let update = service.update_developer_ryze_score(2).await.unwrap();
    assert_eq!(update.total_ratings, 0);
    assert_eq!(update.ryze_score, 0.0);
    assert_eq!(update.success_rate, 0.0);

    let profile = DeveloperRepository::new(conn).get(2).await.unwrap();
    assert_eq!(profile.rating, 0.0);
    assert_eq!(profile.success_rate, 0.0);
}

#[tokio::test]
async fn test_missing_subject_not_found() {
    let conn = init_db().await;
    let service = ScoreService::with_defaults(conn);

    let err = service.update_developer_ryze_score(99).await.unwrap_err();
    assert!(matches!(err, ryze_dal::Error::RecordNotFound(_)));
    let err = service.update_showcase_ryze_score(99).await.unwrap_err();
    assert!(matches!(err, ryze_dal::Error::RecordNotFound(_)));
    let err = service.update_video_ryze_score(99).await.unwrap_err();
    assert!(matches!(err, ryze_dal::Error::RecordNotFound(_)));
}

#[tokio::test]
async fn test_video_and_showcase_write_back() {
    let conn = init_db().await;
    let service = ScoreService::with_defaults(conn.clone());

    VideoRatingRepository::new(conn.clone())
        .rate(1, 7, rating(5))
        .await
        .unwrap();
    let update = service.update_video_ryze_score(1).await.unwrap();
    assert!(approx(update.ryze_score, (10.0 * 3.0 + 5.0) / 11.0));

    let video = ryze_dal::video::VideoRepository::new(conn.clone())
        .get(1)
        .await
        .unwrap();
    assert!(approx(video.average_rating, (10.0 * 3.0 + 5.0) / 11.0));
    assert_eq!(video.total_ratings, 1);

    ShowcaseRatingRepository::new(conn.clone())
        .rate(1, 7, rating(4))
        .await
        .unwrap();
    service.update_showcase_ryze_score(1).await.unwrap();
    let showcase = ryze_dal::showcase::ShowcaseRepository::new(conn)
        .get(1)
        .await
        .unwrap();
    assert!(approx(showcase.average_rating, (10.0 * 3.0 + 4.0) / 11.0));
    assert_eq!(showcase.total_ratings, 1);
}

#[tokio::test]
async fn test_refresh_after_unrate() {
    let conn = init_db().await;
    let service = ScoreService::with_defaults(conn.clone());
    service.update_developer_ryze_score(1).await.unwrap();

    DeveloperRatingRepository::new(conn).delete(1, 101).await.unwrap();
    let update = service.update_developer_ryze_score(1).await.unwrap();
    assert_eq!(update.total_ratings, 1);
    assert!(approx(update.average_rating, 4.0));
    assert!(approx(update.ryze_score, (10.0 * 3.0 + 4.0) / 11.0));
}

#[tokio::test]
async fn test_imdb_strategy_keeps_prior() {
    let conn = init_db().await;
    let service = ScoreService::new(conn.clone(), Strategy::Imdb, ScoringParams::default());

    // unrated developer lands on the platform prior instead of zero
    let update = service.update_developer_ryze_score(2).await.unwrap();
    assert_eq!(update.total_ratings, 0);
    assert!(approx(update.ryze_score, 3.0));
    assert!(approx(update.success_rate, 60.0));

    let profile = DeveloperRepository::new(conn).get(2).await.unwrap();
    assert!(approx(profile.rating, 3.0));
}

#[tokio::test]
async fn test_top_listing_by_score() {
    let conn = init_db().await;
    let service = ScoreService::with_defaults(conn.clone());
    service.update_developer_ryze_score(1).await.unwrap();
    service.update_developer_ryze_score(2).await.unwrap();

    let top = DeveloperRepository::new(conn)
        .list(ListingParams::new(0, 10).with_order(vec![Order::Desc("rating".into())]))
        .await
        .unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].id, 1);
    assert!(top[0].rating >= top[1].rating);
}

#[tokio::test]
async fn test_metrics_composite() {
    let conn = init_db().await;
    let service = ScoreService::with_defaults(conn.clone());

    VideoRatingRepository::new(conn.clone())
        .rate(1, 7, rating(5))
        .await
        .unwrap();
    ShowcaseRatingRepository::new(conn.clone())
        .rate(1, 7, rating(4))
        .await
        .unwrap();
    service.update_developer_ryze_score(1).await.unwrap();
    service.update_video_ryze_score(1).await.unwrap();
    service.update_showcase_ryze_score(1).await.unwrap();

    let metrics = MetricsRepository::new(conn).developer(1).await.unwrap();
    let video_score = (10.0 * 3.0 + 5.0) / 11.0;
    let showcase_score = (10.0 * 3.0 + 4.0) / 11.0;
    assert!(approx(metrics.profile_rating, 3.25));
    assert!(approx(metrics.video_rating, video_score));
    assert!(approx(metrics.showcase_rating, showcase_score));
    assert!(approx(
        metrics.composite_score,
        3.25 * 0.4 + video_score * 0.3 + showcase_score * 0.3
    ));
    assert_eq!(metrics.total_videos, 1);
    assert_eq!(metrics.total_showcases, 1);
    assert!(approx(metrics.success_rate, 65.0));
}

#[tokio::test]
async fn test_metrics_missing_developer() {
    let conn = init_db().await;
    let err = MetricsRepository::new(conn).developer(99).await.unwrap_err();
    assert!(matches!(err, ryze_dal::Error::RecordNotFound(_)));
}
