use rand::Rng;
use std::collections::HashSet;

use crate::{
    models::{
        Forecast, MovieEntry, MovieRecommendation, QueryResponse, VideoEntry, VideoRecommendation,
        WeatherImage,
    },
    services::{
        catalogue::{resolve_weather_code, Library},
        city::resolve_city,
        fuzzy,
        images::weather_icon,
        pool::{choose, RecommendationPool},
        weather::{ForecastError, WeatherProvider},
        youtube,
    },
};

/// Minimum `partial_ratio` for a song to count as matching the weather
pub const MATCH_THRESHOLD: u8 = 30;

const EMPTY_INPUT: &str = "請輸入縣市名稱或天氣關鍵字！";
const MUSIC_EMPTY: &str = "音樂列表為空，無法推薦音樂。";
const RANDOM_MUSIC_EMPTY: &str = "音樂列表為空，無法隨機推薦音樂。";
const MUSIC_EXHAUSTED: &str = "沒有可用的音樂可以隨機推薦了。";
const MUSIC_RESET: &str = "所有音樂都推薦過了，已重置音樂推薦列表。";
const MATCHED_MUSIC: &str = "這樣的天氣來聽這首療癒一下吧！";
const MATCHED_MUSIC_NO_ID: &str = "(抱歉，無法從連結中提取影片ID。)";
const RANDOM_MUSIC: &str = "已為您隨機推薦歌曲：";
const RANDOM_MUSIC_NO_ID: &str = "無法從連結中提取影片ID。請重新點選。";
const MOVIE_EMPTY: &str = "電影列表為空，無法隨機推薦電影。";
const MOVIE_RESET: &str = "所有電影都推薦過了，已重置電影推薦列表。";

/// Per-visitor recommendation history
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub music: RecommendationPool,
    pub movies: RecommendationPool,
}

impl Session {
    /// Nothing has been recommended yet
    pub fn is_empty(&self) -> bool {
        self.music.is_empty() && self.movies.is_empty()
    }
}

/// What the user's input turned out to be
#[derive(Debug)]
pub enum Lookup {
    Empty,
    City {
        city: String,
        forecast: Result<Forecast, ForecastError>,
    },
    Keyword(String),
}

/// Outcome of a song pick
#[derive(Debug, Clone, PartialEq)]
pub struct MusicPick {
    pub message: String,
    pub video: Option<VideoRecommendation>,
    pub notices: Vec<String>,
}

/// Resolves input to a city and fetches its forecast
///
/// This is the only step that performs I/O; everything after it is
/// synchronous so a session can be updated under a single lock.
pub async fn lookup(provider: &dyn WeatherProvider, input: &str) -> Lookup {
    let input = input.trim();
    if input.is_empty() {
        return Lookup::Empty;
    }

    let location_names = provider.location_names().await;
    match resolve_city(input, &location_names) {
        Some(city) => {
            let forecast = provider.fetch_forecast(&city).await;
            if let Err(e) = &forecast {
                tracing::warn!(city = %city, provider = provider.name(), error = %e, "Forecast unavailable");
            }
            Lookup::City { city, forecast }
        }
        None => {
            tracing::debug!(input = %input, "Input is not a known location, treating as keyword");
            Lookup::Keyword(input.to_string())
        }
    }
}

/// Builds the response for a weather query
pub fn compose<R: Rng + ?Sized>(
    lookup: Lookup,
    library: &Library,
    session: &mut Session,
    with_music: bool,
    rng: &mut R,
) -> QueryResponse {
    match lookup {
        Lookup::Empty => QueryResponse::message(EMPTY_INPUT),

        Lookup::City {
            forecast: Ok(forecast),
            ..
        } => {
            let weather_image = forecast_image(&forecast.description, library);
            let mut response = QueryResponse {
                message: forecast.display_text.clone(),
                weather_image: Some(weather_image),
                ..Default::default()
            };

            if with_music {
                let pick = recommend_music(
                    &forecast.description,
                    &library.videos,
                    &mut session.music,
                    rng,
                );
                response.message = format!("{}\n\n{}", response.message, pick.message);
                response.video = pick.video;
                response.notices = pick.notices;
            }

            response.forecast = Some(forecast);
            response
        }

        Lookup::City {
            city,
            forecast: Err(e),
        } => {
            let caption = format!("無法取得 {city} 天氣資料");
            let weather_image = match weather_icon(&library.weather_images_dir, "default") {
                Some(uri) => WeatherImage {
                    data_uri: Some(uri),
                    caption,
                },
                None => WeatherImage {
                    data_uri: None,
                    caption: format!("{caption} (無圖片可用)"),
                },
            };

            QueryResponse {
                message: e.to_string(),
                weather_image: Some(weather_image),
                ..Default::default()
            }
        }

        Lookup::Keyword(_) => {
            let pick = random_music(&library.videos, &mut session.music, rng);
            QueryResponse {
                message: pick.message,
                video: pick.video,
                notices: pick.notices,
                ..Default::default()
            }
        }
    }
}

fn forecast_image(description: &str, library: &Library) -> WeatherImage {
    let Some(code) = resolve_weather_code(description, &library.weather_codes) else {
        return WeatherImage {
            data_uri: None,
            caption: format!("天氣：{description} (無匹配代碼或圖片可用)"),
        };
    };

    match weather_icon(&library.weather_images_dir, code) {
        Some(uri) => WeatherImage {
            data_uri: Some(uri),
            caption: description.to_string(),
        },
        None => WeatherImage {
            data_uri: None,
            caption: format!("天氣：{description} (無圖片可用)"),
        },
    }
}

fn video_recommendation(video: &VideoEntry) -> Option<VideoRecommendation> {
    youtube::extract_video_id(&video.url).map(|id| VideoRecommendation {
        watch_url: youtube::watch_url(&id),
        embed_url: youtube::embed_url(&id),
        title: video.title.clone(),
        youtube_id: id,
    })
}

/// Songs the session has not heard yet, resetting the pool when exhausted
fn available_videos<'a>(
    videos: &'a [VideoEntry],
    pool: &mut RecommendationPool,
    notices: &mut Vec<String>,
) -> Vec<&'a VideoEntry> {
    let draw = pool.available(videos.iter().map(|v| v.index));
    if draw.reset {
        notices.push(MUSIC_RESET.to_string());
    }

    let candidates: HashSet<usize> = draw.candidates.into_iter().collect();
    videos
        .iter()
        .filter(|v| candidates.contains(&v.index))
        .collect()
}

/// Recommends a song whose matched descriptions best fit the weather
///
/// Only songs scoring at least [`MATCH_THRESHOLD`] qualify, and ties at the
/// top score are broken uniformly at random. With no qualifying song a
/// random one is recommended instead.
pub fn recommend_music<R: Rng + ?Sized>(
    description: &str,
    videos: &[VideoEntry],
    pool: &mut RecommendationPool,
    rng: &mut R,
) -> MusicPick {
    if videos.is_empty() {
        return MusicPick {
            message: MUSIC_EMPTY.to_string(),
            video: None,
            notices: Vec::new(),
        };
    }

    let mut notices = Vec::new();
    let available = available_videos(videos, pool, &mut notices);

    let needle = description.to_lowercase();
    let scored: Vec<(&VideoEntry, u8)> = available
        .into_iter()
        .map(|v| (v, fuzzy::partial_ratio(&needle, &v.description.to_lowercase())))
        .filter(|(_, score)| *score >= MATCH_THRESHOLD)
        .collect();

    let best = scored.iter().map(|(_, score)| *score).max();
    let top: Vec<&VideoEntry> = scored
        .iter()
        .filter(|(_, score)| Some(*score) == best)
        .map(|(v, _)| *v)
        .collect();

    let Some(selected) = choose(&top, rng) else {
        tracing::debug!(description = %description, "No song matched, picking at random");
        let mut pick = random_music(videos, pool, rng);
        notices.append(&mut pick.notices);
        pick.notices = notices;
        return pick;
    };

    pool.mark(selected.index);
    tracing::debug!(
        description = %description,
        title = %selected.title,
        score = best.unwrap_or_default(),
        ties = top.len(),
        "Matched song"
    );

    match video_recommendation(selected) {
        Some(video) => MusicPick {
            message: MATCHED_MUSIC.to_string(),
            video: Some(video),
            notices,
        },
        None => MusicPick {
            message: format!("{MATCHED_MUSIC}\n{MATCHED_MUSIC_NO_ID}"),
            video: None,
            notices,
        },
    }
}

/// Recommends a random song the session has not heard yet
pub fn random_music<R: Rng + ?Sized>(
    videos: &[VideoEntry],
    pool: &mut RecommendationPool,
    rng: &mut R,
) -> MusicPick {
    if videos.is_empty() {
        return MusicPick {
            message: RANDOM_MUSIC_EMPTY.to_string(),
            video: None,
            notices: Vec::new(),
        };
    }

    let mut notices = Vec::new();
    let available = available_videos(videos, pool, &mut notices);

    let Some(selected) = choose(&available, rng) else {
        return MusicPick {
            message: MUSIC_EXHAUSTED.to_string(),
            video: None,
            notices,
        };
    };

    pool.mark(selected.index);

    match video_recommendation(selected) {
        Some(video) => MusicPick {
            message: RANDOM_MUSIC.to_string(),
            video: Some(video),
            notices,
        },
        None => {
            tracing::warn!(url = %selected.url, "Catalogue URL has no recognisable video id");
            MusicPick {
                message: RANDOM_MUSIC_NO_ID.to_string(),
                video: None,
                notices,
            }
        }
    }
}

/// Recommends a random movie the session has not seen yet
pub fn random_movie<R: Rng + ?Sized>(
    movies: &[MovieEntry],
    pool: &mut RecommendationPool,
    rng: &mut R,
) -> QueryResponse {
    if movies.is_empty() {
        return QueryResponse::message(MOVIE_EMPTY);
    }

    let draw = pool.available(0..movies.len());
    let mut notices = Vec::new();
    if draw.reset {
        notices.push(MOVIE_RESET.to_string());
    }

    let Some(index) = choose(&draw.candidates, rng) else {
        return QueryResponse::message(MOVIE_EMPTY);
    };
    pool.mark(index);

    let movie = &movies[index];
    QueryResponse {
        message: format!("為您推薦電影：**{}**", movie.title),
        movie: Some(MovieRecommendation {
            title: movie.title.clone(),
            poster_url: movie.poster_url(),
            remaining: draw.candidates.len() - 1,
        }),
        notices,
        ..Default::default()
    }
}
