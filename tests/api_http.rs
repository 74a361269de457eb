//! End-to-end test over a live server: bind port 0, drive the full record
//! lifecycle with a real HTTP client.

use bodylog::api::handlers::AppState;
use bodylog::api::server::router;
use serde_json::{json, Value};

async fn spawn_server() -> String {
    let state = AppState::new().unwrap();
    let app = router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_full_record_lifecycle_over_http() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::env::set_var("HOME", temp_dir.path());
    std::env::set_var("LOCALAPPDATA", temp_dir.path());

    let base = spawn_server().await;
    let client = reqwest::Client::new();

    // No open session yet
    let status: Value = client.get(format!("{base}/api/sleep-status")).send().await.unwrap().json().await.unwrap();
    assert_eq!(status["isSleeping"], json!(false));

    // Start a session
    let started: Value = client.post(format!("{base}/api/sleep-start")).send().await.unwrap().json().await.unwrap();
    assert_eq!(started["message"], json!("开始睡眠"));
    let session_id = started["id"].as_i64().unwrap();

    // Double-click guard: a second start updates the same row
    let restarted: Value = client.post(format!("{base}/api/sleep-start")).send().await.unwrap().json().await.unwrap();
    assert_eq!(restarted["message"], json!("睡眠记录已更新"));
    assert_eq!(restarted["id"].as_i64().unwrap(), session_id);

    let status: Value = client.get(format!("{base}/api/sleep-status")).send().await.unwrap().json().await.unwrap();
    assert_eq!(status["isSleeping"], json!(true));
    assert!(status["startTime"].is_string());
    assert_eq!(status["id"].as_i64().unwrap(), session_id);

    // End the session
    let ended: Value = client.post(format!("{base}/api/sleep-end")).send().await.unwrap().json().await.unwrap();
    assert_eq!(ended["message"], json!("睡眠记录完成"));
    assert!(ended["display"].as_str().unwrap().contains("共睡了"));

    let records: Value = client.get(format!("{base}/api/sleep-records")).send().await.unwrap().json().await.unwrap();
    assert_eq!(records.as_array().unwrap().len(), 1);

    // Ending again with nothing open records a degenerate session
    let ended: Value = client.post(format!("{base}/api/sleep-end")).send().await.unwrap().json().await.unwrap();
    assert_eq!(ended["message"], json!("未有睡眠记录，已记录起床时间"));

    // Meal logging
    let meal: Value = client
        .post(format!("{base}/api/meal-record"))
        .json(&json!({ "mealType": "早餐" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(meal["message"], json!("吃饭时间已记录"));
    let meal_id = meal["id"].as_i64().unwrap();

    let meals: Value = client.get(format!("{base}/api/meal-records")).send().await.unwrap().json().await.unwrap();
    let meals = meals.as_array().unwrap();
    assert_eq!(meals.len(), 1);
    assert!(meals[0]["display"].as_str().unwrap().ends_with("(早餐)"));

    // Custom sleep insert: validation then success
    let resp = client
        .post(format!("{base}/api/sleep-records/custom"))
        .json(&json!({ "sleep_start": "2024-01-01T22:00:00.000Z" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], json!("缺少必需参数"));

    let custom: Value = client
        .post(format!("{base}/api/sleep-records/custom"))
        .json(&json!({ "sleep_start": "2024-01-01T22:00:00.000Z", "sleep_end": "2024-01-02T06:30:00.000Z" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(custom["message"], json!("睡眠记录已添加"));
    assert!(custom["display"].as_str().unwrap().ends_with("共睡了8小时30分钟"));

    // Filtering: invalid kind, missing params, then a real query
    let resp = client
        .get(format!("{base}/api/records/filter?type=bogus&start=2024-01-01&end=2024-12-31"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], json!("无效的记录类型"));

    let resp = client.get(format!("{base}/api/records/filter?type=sleep")).send().await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], json!("缺少必需参数"));

    let filtered: Value = client
        .get(format!(
            "{base}/api/records/filter?type=sleep&start=2024-01-01T00:00:00.000Z&end=2024-01-31T23:59:59.999Z"
        ))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["start"], json!("2024-01-01T22:00:00.000Z"));
    assert_eq!(filtered[0]["end"], json!("2024-01-02T06:30:00.000Z"));

    // Date-only bounds from a date picker are accepted
    let resp = client
        .get(format!("{base}/api/records/filter?type=sleep&start=2024-01-01&end=2024-12-31"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let by_date: Value = resp.json().await.unwrap();
    assert_eq!(by_date.as_array().unwrap().len(), 1);

    // Deletion: missing id is a 404, real id removes the row
    let resp = client.delete(format!("{base}/api/sleep-records/99999")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], json!("记录不存在"));

    let deleted: Value = client
        .delete(format!("{base}/api/meal-records/{meal_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(deleted["message"], json!("删除成功"));
    let meals: Value = client.get(format!("{base}/api/meal-records")).send().await.unwrap().json().await.unwrap();
    assert!(meals.as_array().unwrap().is_empty());

    // Statistics: default window, then explicit
    let stats: Value = client.get(format!("{base}/api/statistics")).send().await.unwrap().json().await.unwrap();
    assert_eq!(stats["days"], json!(7));
    // The two sessions ended today fall inside the window; the 2024 custom one does not
    assert_eq!(stats["sleep"]["totalRecords"], json!(2));
    assert_eq!(stats["meals"]["totalRecords"], json!(0));
    assert!(stats["sleep"]["byDate"].is_object());

    let stats: Value = client.get(format!("{base}/api/statistics?days=30")).send().await.unwrap().json().await.unwrap();
    assert_eq!(stats["days"], json!(30));

    // A window chrono cannot represent is rejected, not a panic
    let resp = client
        .get(format!("{base}/api/statistics?days={}", i64::MAX))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], json!(format!("无效的统计天数: {}", i64::MAX)));
}
