use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::*;
use crate::config::PagingConfig;
use crate::records::{PageQuery, RecordError, RecordId, RecordStore};

fn service() -> ContentService {
    ContentService::new(ContentRepositories::in_memory(), PagingConfig::default())
}

fn date(raw: &str) -> NaiveDate {
    raw.parse().expect("valid date")
}

fn post(service: &ContentService, draft: BlogPostDraft) -> BlogPost {
    RecordStore::<BlogPost>::create(service, draft).expect("post created")
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

#[test]
fn slugs_are_unique_and_well_formed() {
    let service = service();
    let first = post(&service, BlogPostDraft::new("Xây nhà phố 2025", "xay-nha-pho-2025"));
    assert_eq!(first.id.as_str(), "post-000001");

    let duplicate =
        RecordStore::<BlogPost>::create(&service, BlogPostDraft::new("Bản sao", "xay-nha-pho-2025"))
            .expect_err("slug taken");
    assert!(matches!(duplicate, RecordError::Duplicate { ref key, .. } if key == "xay-nha-pho-2025"));

    for slug in ["", "Xay Nha", "-leading", "nhà-phố"] {
        let err = RecordStore::<BlogPost>::create(&service, BlogPostDraft::new("Tiêu đề", slug))
            .expect_err("slug rejected");
        assert!(
            matches!(err, RecordError::Validation(ref v) if v.field == "slug"),
            "slug {slug:?} should be rejected"
        );
    }
}

#[test]
fn only_published_posts_are_public() {
    let service = service();
    post(&service, BlogPostDraft::new("Bản nháp", "ban-nhap"));
    let live = post(&service, BlogPostDraft::new("Mẫu biệt thự", "mau-biet-thu").published());

    let page = service
        .published_posts(&PageQuery::default())
        .expect("list succeeds");
    assert_eq!(page.total, 1);
    assert_eq!(page.rows[0].id, live.id);

    assert_eq!(
        service.published_post("mau-biet-thu").expect("found").id,
        live.id
    );
    assert!(matches!(
        service.published_post("ban-nhap"),
        Err(RecordError::NotFound { .. })
    ));
}

#[test]
fn tags_are_trimmed_deduplicated_and_searchable() {
    let service = service();
    let mut draft = BlogPostDraft::new("Chi phí phần thô", "chi-phi-phan-tho").published();
    draft.tags = vec![
        " chi phí ".into(),
        "".into(),
        "phần thô".into(),
        "chi phí".into(),
    ];
    let stored = post(&service, draft);
    assert_eq!(stored.tags, vec!["chi phí", "phần thô"]);

    let query = PageQuery {
        search: Some("PHẦN THÔ".into()),
        ..PageQuery::default()
    };
    assert_eq!(service.published_posts(&query).expect("search").total, 1);
}

#[test]
fn banners_are_ordered_by_position_and_filtered_by_active() {
    let service = service();
    let create = |draft: BannerDraft| {
        RecordStore::<Banner>::create(&service, draft).expect("banner created")
    };
    create(BannerDraft::new("Khuyến mãi", "/img/promo.jpg", 3));
    create(BannerDraft::new("Công trình mới", "/img/new.jpg", 1));
    let mut hidden = BannerDraft::new("Ẩn", "/img/hidden.jpg", 0);
    hidden.active = false;
    create(hidden);

    let titles: Vec<String> = service
        .active_banners()
        .expect("list succeeds")
        .into_iter()
        .map(|banner| banner.title)
        .collect();
    assert_eq!(titles, vec!["Công trình mới", "Khuyến mãi"]);
}

#[test]
fn promotions_run_inclusively_between_their_dates() {
    let service = service();
    let promo = RecordStore::<Promotion>::create(
        &service,
        PromotionDraft::new("Giảm 10% thiết kế", 10, date("2026-05-01"), date("2026-05-31")),
    )
    .expect("promotion created");

    for (day, running) in [
        ("2026-04-30", false),
        ("2026-05-01", true),
        ("2026-05-31", true),
        ("2026-06-01", false),
    ] {
        let found = service.running_promotions(date(day)).expect("list succeeds");
        assert_eq!(found.len(), usize::from(running), "on {day}");
    }

    let mut paused = PromotionDraft::new("Giảm 10% thiết kế", 10, date("2026-05-01"), date("2026-05-31"));
    paused.active = false;
    RecordStore::<Promotion>::update(&service, &promo.id, paused).expect("promotion paused");
    assert!(service
        .running_promotions(date("2026-05-15"))
        .expect("list succeeds")
        .is_empty());
}

#[test]
fn promotion_drafts_are_validated() {
    let service = service();
    let inverted = PromotionDraft::new("Ngược", 5, date("2026-06-01"), date("2026-05-01"));
    let err = RecordStore::<Promotion>::create(&service, inverted).expect_err("dates inverted");
    assert!(matches!(err, RecordError::Validation(ref v) if v.field == "endsOn"));

    let greedy = PromotionDraft::new("Quá tay", 150, date("2026-05-01"), date("2026-05-02"));
    let err = RecordStore::<Promotion>::create(&service, greedy).expect_err("discount too large");
    assert!(matches!(err, RecordError::Validation(ref v) if v.field == "discountPercent"));
}

#[tokio::test]
async fn public_routes_serve_published_content() {
    let service = Arc::new(service());
    post(&service, BlogPostDraft::new("Mẫu nhà cấp 4", "mau-nha-cap-4").published());
    RecordStore::<Promotion>::create(
        service.as_ref(),
        PromotionDraft::new("Tặng thiết kế", 100, date("2026-01-01"), date("2026-12-31")),
    )
    .expect("promotion created");
    let router = content_router(service);

    let response = router
        .clone()
        .oneshot(get("/v1/blog/posts/mau-nha-cap-4"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["title"], "Mẫu nhà cấp 4");

    let response = router
        .clone()
        .oneshot(get("/v1/blog/posts/khong-ton-tai"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .clone()
        .oneshot(get("/v1/promotions?on=2026-03-08"))
        .await
        .expect("route executes");
    let payload = read_json(response).await;
    assert_eq!(payload[0]["discountPercent"], 100);
    assert_eq!(payload[0]["startsOn"], "2026-01-01");

    let response = router
        .oneshot(get("/v1/promotions?on=2027-01-01"))
        .await
        .expect("route executes");
    assert_eq!(read_json(response).await, json!([]));
}

#[tokio::test]
async fn admin_routes_manage_banners() {
    let service = Arc::new(service());
    let router = content_router(service.clone());

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/banners")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "title": "Nhà đẹp", "imageUrl": "/img/a.jpg", "position": 2 })
                        .to_string(),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    assert_eq!(created["id"], "banner-000001");
    assert_eq!(created["active"], true);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/admin/banners/banner-000001")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(RecordStore::<Banner>::get(service.as_ref(), &RecordId::from("banner-000001")).is_err());
}
