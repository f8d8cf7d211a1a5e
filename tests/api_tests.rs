use std::collections::HashSet;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, Request, StatusCode};
use axum_test::TestServer;
use tower::ServiceExt;
use chrono::NaiveDate;
use serde_json::Value;
use tempfile::TempDir;

use weather_mood::api::{create_router, AppState, SessionStore};
use weather_mood::middleware::SESSION_ID_HEADER;
use weather_mood::models::{Forecast, MovieEntry, VideoEntry, WeatherCode};
use weather_mood::services::weather::{ForecastError, WeatherProvider};
use weather_mood::services::Library;

/// Serves fixed forecasts; 金門縣 always fails
struct StubProvider;

#[async_trait::async_trait]
impl WeatherProvider for StubProvider {
    async fn location_names(&self) -> Vec<String> {
        ["臺北市", "金門縣", "花蓮縣"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    async fn fetch_forecast(&self, city: &str) -> Result<Forecast, ForecastError> {
        if city == "金門縣" {
            return Err(ForecastError::NoForecast {
                city: city.to_string(),
            });
        }

        let description = if city == "花蓮縣" { "陣雨" } else { "陰天" };
        Ok(Forecast {
            city: city.to_string(),
            description: description.to_string(),
            start_time: NaiveDate::from_ymd_opt(2026, 10, 18)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            time_of_day: "中午到傍晚".to_string(),
            min_temp: "23".to_string(),
            max_temp: "29".to_string(),
            pop: "30%".to_string(),
            display_text: format!(
                "{city} 10/18 中午到傍晚是：**{description}**，氣溫介於 **23°C** 到 **29°C**，降雨機率 **30%** 喔！"
            ),
        })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

struct Fixture {
    server: TestServer,
    sessions: SessionStore,
    _images: TempDir,
    _posters: TempDir,
}

fn video(index: usize, id: &str, description: &str) -> VideoEntry {
    VideoEntry {
        index,
        url: format!("https://www.youtube.com/watch?v={id}"),
        description: description.to_string(),
        title: format!("song {index}"),
    }
}

fn create_library(images: &TempDir, posters: &TempDir) -> Library {
    std::fs::write(images.path().join("07.png"), b"png").unwrap();
    std::fs::write(images.path().join("default.gif"), b"GIF").unwrap();

    let movies: Vec<MovieEntry> = ["spirited_away", "totoro", "kiki"]
        .into_iter()
        .map(|title| {
            let file_name = format!("{title}.jpg");
            std::fs::write(posters.path().join(&file_name), b"jpg").unwrap();
            MovieEntry {
                title: title.to_string(),
                file_name,
            }
        })
        .collect();

    Library {
        videos: vec![
            video(0, "aaaaaaaaaaa", "晴天"),
            video(1, "bbbbbbbbbbb", "陣雨,雷雨"),
            video(2, "ccccccccccc", "陰天"),
            video(3, "ddddddddddd", "短暫陣雨"),
        ],
        movies,
        weather_codes: vec![WeatherCode {
            description: "陰天".to_string(),
            code: "07".to_string(),
        }],
        weather_images_dir: images.path().to_path_buf(),
        movie_posters_dir: posters.path().to_path_buf(),
    }
}

fn create_fixture() -> Fixture {
    let images = TempDir::new().unwrap();
    let posters = TempDir::new().unwrap();
    let state = AppState::new(create_library(&images, &posters), Arc::new(StubProvider));
    let sessions = state.sessions.clone();
    let server = TestServer::new(create_router(state)).unwrap();

    Fixture {
        server,
        sessions,
        _images: images,
        _posters: posters,
    }
}

fn session_header(value: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(SESSION_ID_HEADER),
        HeaderValue::from_str(value).unwrap(),
    )
}

#[tokio::test]
async fn test_health_check() {
    let fixture = create_fixture();
    let response = fixture.server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_locations() {
    let fixture = create_fixture();
    let response = fixture.server.get("/api/v1/locations").await;
    response.assert_status_ok();

    let names: Vec<String> = response.json();
    assert_eq!(names, vec!["臺北市", "金門縣", "花蓮縣"]);
}

#[tokio::test]
async fn test_weather_query_corrects_city() {
    let fixture = create_fixture();
    let response = fixture
        .server
        .get("/api/v1/weather")
        .add_query_param("q", "台北")
        .await;
    response.assert_status_ok();
    assert!(response.headers().get(SESSION_ID_HEADER).is_some());

    let body: Value = response.json();
    assert_eq!(body["forecast"]["city"], "臺北市");
    assert!(body["message"].as_str().unwrap().starts_with("臺北市 10/18"));
    assert_eq!(body["weather_image"]["caption"], "陰天");
    assert_eq!(
        body["weather_image"]["data_uri"],
        "data:image/png;base64,cG5n"
    );
    assert!(body.get("video").is_none());
}

#[tokio::test]
async fn test_empty_query() {
    let fixture = create_fixture();
    let response = fixture.server.get("/api/v1/weather").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["message"], "請輸入縣市名稱或天氣關鍵字！");
}

#[tokio::test]
async fn test_weather_failure_degrades_to_message() {
    let fixture = create_fixture();
    let response = fixture
        .server
        .get("/api/v1/weather/music")
        .add_query_param("q", "金門")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(
        body["message"],
        "無法取得 金門縣 天氣資料：資料結構異常或該縣市無預報資料。"
    );
    assert_eq!(body["weather_image"]["caption"], "無法取得 金門縣 天氣資料");
    assert_eq!(
        body["weather_image"]["data_uri"],
        "data:image/gif;base64,R0lG"
    );
    assert!(body.get("video").is_none());
}

#[tokio::test]
async fn test_weather_with_music_does_not_repeat_within_session() {
    let fixture = create_fixture();
    let session = uuid::Uuid::new_v4().to_string();
    let (name, value) = session_header(&session);

    let mut ids = Vec::new();
    for _ in 0..2 {
        let response = fixture
            .server
            .get("/api/v1/weather/music")
            .add_query_param("q", "花蓮")
            .add_header(name.clone(), value.clone())
            .await;
        response.assert_status_ok();
        assert_eq!(
            response.headers().get(SESSION_ID_HEADER).unwrap(),
            session.as_str()
        );

        let body: Value = response.json();
        assert!(body["message"]
            .as_str()
            .unwrap()
            .ends_with("這樣的天氣來聽這首療癒一下吧！"));
        ids.push(body["video"]["youtube_id"].as_str().unwrap().to_string());
    }

    // both songs mentioning 陣雨 score 100, the rest 0
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), 2);
    for id in &ids {
        assert!(id == "bbbbbbbbbbb" || id == "ddddddddddd", "unexpected {id}");
    }
}

#[tokio::test]
async fn test_keyword_query_recommends_random_song() {
    let fixture = create_fixture();
    let response = fixture
        .server
        .get("/api/v1/weather")
        .add_query_param("q", "想聽歌")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["message"], "已為您隨機推薦歌曲：");
    assert_eq!(body["video"]["youtube_id"].as_str().unwrap().len(), 11);
    assert!(body.get("weather_image").is_none());
}

#[tokio::test]
async fn test_random_music_cycles_through_catalogue() {
    let fixture = create_fixture();
    let (name, value) = session_header(&uuid::Uuid::new_v4().to_string());

    let mut seen = HashSet::new();
    for _ in 0..4 {
        let body: Value = fixture
            .server
            .post("/api/v1/recommendations/music")
            .add_header(name.clone(), value.clone())
            .await
            .json();
        assert!(body.get("notices").is_none());
        assert!(seen.insert(body["video"]["youtube_id"].as_str().unwrap().to_string()));
    }

    let body: Value = fixture
        .server
        .post("/api/v1/recommendations/music")
        .add_header(name, value)
        .await
        .json();
    assert_eq!(body["notices"][0], "所有音樂都推薦過了，已重置音樂推薦列表。");
}

#[tokio::test]
async fn test_random_movie_cycles_and_serves_poster() {
    let fixture = create_fixture();
    let (name, value) = session_header(&uuid::Uuid::new_v4().to_string());

    let mut titles = HashSet::new();
    for expected_remaining in [2, 1, 0] {
        let response = fixture
            .server
            .post("/api/v1/recommendations/movie")
            .add_header(name.clone(), value.clone())
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["movie"]["remaining"], expected_remaining);
        let title = body["movie"]["title"].as_str().unwrap().to_string();
        assert_eq!(body["message"], format!("為您推薦電影：**{title}**"));

        let poster = body["movie"]["poster_url"].as_str().unwrap().to_string();
        fixture.server.get(&poster).await.assert_status_ok();
        assert!(titles.insert(title));
    }

    let body: Value = fixture
        .server
        .post("/api/v1/recommendations/movie")
        .add_header(name, value)
        .await
        .json();
    assert_eq!(body["notices"][0], "所有電影都推薦過了，已重置電影推薦列表。");
}

#[tokio::test]
async fn test_new_sessions_start_fresh() {
    let fixture = create_fixture();

    let first = fixture.server.post("/api/v1/recommendations/movie").await;
    let second = fixture.server.post("/api/v1/recommendations/movie").await;

    let first_id = first.headers().get(SESSION_ID_HEADER).unwrap().clone();
    let second_id = second.headers().get(SESSION_ID_HEADER).unwrap().clone();
    assert_ne!(first_id, second_id);

    let body: Value = second.json();
    assert_eq!(body["movie"]["remaining"], 2);
}

#[tokio::test]
async fn test_missing_poster_is_not_found() {
    let fixture = create_fixture();
    fixture
        .server
        .get("/posters/missing.jpg")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_session_id_is_replaced() {
    let images = TempDir::new().unwrap();
    let posters = TempDir::new().unwrap();
    let state = AppState::new(create_library(&images, &posters), Arc::new(StubProvider));
    let app = create_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/recommendations/movie")
        .header(SESSION_ID_HEADER, "not-a-uuid")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let issued = response.headers().get(SESSION_ID_HEADER).unwrap();
    assert!(uuid::Uuid::parse_str(issued.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_queries_without_recommendations_store_no_session() {
    let fixture = create_fixture();

    for q in ["", "台北", "金門"] {
        fixture
            .server
            .get("/api/v1/weather")
            .add_query_param("q", q)
            .await
            .assert_status_ok();
    }
    fixture.server.get("/health").await.assert_status_ok();
    assert!(fixture.sessions.is_empty().await);

    fixture
        .server
        .post("/api/v1/recommendations/music")
        .await
        .assert_status_ok();
    assert_eq!(fixture.sessions.len().await, 1);
}

#[tokio::test]
async fn test_duplicate_query_parameter_is_bad_request() {
    let images = TempDir::new().unwrap();
    let posters = TempDir::new().unwrap();
    let state = AppState::new(create_library(&images, &posters), Arc::new(StubProvider));
    let app = create_router(state);

    let request = Request::builder()
        .uri("/api/v1/weather/music?q=a&q=b")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("duplicate field"));
}
