use std::path::{Path, PathBuf};

use crate::{
    config::Config,
    error::AppResult,
    models::{CatalogueRow, MovieEntry, VideoEntry, WeatherCode},
    services::{fuzzy, images::has_image_extension},
};

const UNKNOWN_SONG: &str = "未知歌曲";

/// Static datasets loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct Library {
    pub videos: Vec<VideoEntry>,
    pub movies: Vec<MovieEntry>,
    pub weather_codes: Vec<WeatherCode>,
    pub weather_images_dir: PathBuf,
    pub movie_posters_dir: PathBuf,
}

impl Library {
    /// Loads every dataset named in the configuration
    ///
    /// A source that cannot be read is logged and left empty; the service
    /// still starts and reports the gap to users through its messages.
    pub fn load(config: &Config) -> Self {
        let videos = load_videos(&config.catalogue_path).unwrap_or_else(|e| {
            tracing::error!(path = %config.catalogue_path, error = %e, "Failed to load video catalogue");
            Vec::new()
        });

        let weather_codes = load_weather_codes(&config.weather_codes_path).unwrap_or_else(|e| {
            tracing::error!(path = %config.weather_codes_path, error = %e, "Failed to load weather codes");
            Vec::new()
        });

        let movies = load_movies(&config.movie_posters_dir).unwrap_or_else(|e| {
            tracing::warn!(dir = %config.movie_posters_dir, error = %e, "Movie poster directory unavailable");
            Vec::new()
        });

        if movies.is_empty() {
            tracing::warn!(dir = %config.movie_posters_dir, "No movie posters found");
        }

        tracing::info!(
            videos = videos.len(),
            movies = movies.len(),
            weather_codes = weather_codes.len(),
            "Library loaded"
        );

        Self {
            videos,
            movies,
            weather_codes,
            weather_images_dir: PathBuf::from(&config.weather_images_dir),
            movie_posters_dir: PathBuf::from(&config.movie_posters_dir),
        }
    }
}

/// Reads the song catalogue
///
/// Rows without a URL or without matched descriptions are skipped but still
/// consume an index, so indices stay tied to file positions.
pub fn load_videos(path: impl AsRef<Path>) -> AppResult<Vec<VideoEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path.as_ref())?;

    let mut videos = Vec::new();
    for (index, row) in reader.deserialize::<CatalogueRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping malformed catalogue row");
                continue;
            }
        };

        let url = row.url.unwrap_or_default();
        let description = row.description.unwrap_or_default();
        if url.is_empty() || description.is_empty() {
            continue;
        }

        let title = row
            .title
            .filter(|t| !t.is_empty())
            .or_else(|| {
                description
                    .split(',')
                    .next()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| UNKNOWN_SONG.to_string());

        videos.push(VideoEntry {
            index,
            url,
            description,
            title,
        });
    }

    tracing::debug!(path = %path.as_ref().display(), count = videos.len(), "Video catalogue read");
    Ok(videos)
}

/// Reads the weather description → category code table, keeping file order
pub fn load_weather_codes(path: impl AsRef<Path>) -> AppResult<Vec<WeatherCode>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;

    let codes = reader
        .deserialize::<WeatherCode>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(codes)
}

/// Lists poster images in a directory, sorted by file name
pub fn load_movies(dir: impl AsRef<Path>) -> AppResult<Vec<MovieEntry>> {
    let mut movies = Vec::new();

    for entry in std::fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !has_image_extension(&path) {
            continue;
        }

        let (Some(stem), Some(file_name)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.file_name().and_then(|s| s.to_str()),
        ) else {
            continue;
        };

        movies.push(MovieEntry {
            title: stem.to_string(),
            file_name: file_name.to_string(),
        });
    }

    movies.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(movies)
}

/// Maps a forecast description to its category code
///
/// Exact matches win; otherwise the most similar description is used, the
/// earliest row winning ties.
pub fn resolve_weather_code<'a>(description: &str, codes: &'a [WeatherCode]) -> Option<&'a str> {
    if let Some(exact) = codes.iter().find(|c| c.description == description) {
        return Some(&exact.code);
    }

    let needle = description.to_lowercase();
    let mut best: Option<(&WeatherCode, u8)> = None;
    for code in codes {
        let score = fuzzy::ratio(&needle, &code.description.to_lowercase());
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((code, score));
        }
    }

    best.map(|(code, _)| code.code.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_videos() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "videos.csv",
            "影片URL,matched_weather_descriptions,歌曲名稱\n\
             https://youtu.be/aaaaaaaaaaa,晴天,晴天\n\
             ,多雲,沒有連結\n\
             https://youtu.be/bbbbbbbbbbb,\"陣雨,雷雨\",\n\
             https://youtu.be/ccccccccccc,, 無描述\n\
             https://youtu.be/ddddddddddd,  陰天  ,  陰天的歌  \n",
        );

        let videos = load_videos(&path).unwrap();
        assert_eq!(videos.len(), 3);

        assert_eq!(videos[0].index, 0);
        assert_eq!(videos[0].title, "晴天");

        assert_eq!(videos[1].index, 2);
        assert_eq!(videos[1].description, "陣雨,雷雨");
        assert_eq!(videos[1].title, "陣雨");

        assert_eq!(videos[2].index, 4);
        assert_eq!(videos[2].description, "陰天");
        assert_eq!(videos[2].title, "陰天的歌");
    }

    #[test]
    fn test_load_videos_without_title_column() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "videos.csv",
            "影片URL,matched_weather_descriptions\nhttps://youtu.be/aaaaaaaaaaa,晴時多雲\n",
        );

        let videos = load_videos(&path).unwrap();
        assert_eq!(videos[0].title, "晴時多雲");
    }

    #[test]
    fn test_load_videos_missing_file() {
        assert!(load_videos("/nonexistent/videos.csv").is_err());
    }

    #[test]
    fn test_load_weather_codes_preserves_order() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "codes.csv", "中文描述,分類代碼\n晴天,01\n多雲,04\n陰天,07\n");

        let codes = load_weather_codes(&path).unwrap();
        let descriptions: Vec<&str> = codes.iter().map(|c| c.description.as_str()).collect();
        assert_eq!(descriptions, vec!["晴天", "多雲", "陰天"]);
        assert_eq!(codes[1].code, "04");
    }

    #[test]
    fn test_load_movies() {
        let dir = TempDir::new().unwrap();
        write(&dir, "神隱少女.JPG", "x");
        write(&dir, "龍貓.png", "x");
        write(&dir, "notes.txt", "x");
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let movies = load_movies(dir.path()).unwrap();
        let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["神隱少女", "龍貓"]);
        assert_eq!(movies[0].file_name, "神隱少女.JPG");
    }

    #[test]
    fn test_load_movies_missing_dir() {
        assert!(load_movies("/nonexistent/movie").is_err());
    }

    fn codes() -> Vec<WeatherCode> {
        [("晴天", "01"), ("晴時多雲", "02"), ("多雲時陰", "05"), ("陰短暫雨", "08")]
            .into_iter()
            .map(|(d, c)| WeatherCode {
                description: d.to_string(),
                code: c.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_resolve_weather_code_exact() {
        assert_eq!(resolve_weather_code("晴時多雲", &codes()), Some("02"));
    }

    #[test]
    fn test_resolve_weather_code_fuzzy() {
        assert_eq!(resolve_weather_code("陰時多雲短暫雨", &codes()), Some("08"));
    }

    #[test]
    fn test_resolve_weather_code_reordered_words() {
        let codes = vec![
            WeatherCode {
                description: "陰天".to_string(),
                code: "07".to_string(),
            },
            WeatherCode {
                description: "晴時多雲".to_string(),
                code: "02".to_string(),
            },
        ];
        assert_eq!(resolve_weather_code("多雲時晴", &codes), Some("02"));
    }

    #[test]
    fn test_resolve_weather_code_first_wins_ties() {
        assert_eq!(resolve_weather_code("雪", &codes()), Some("01"));
    }

    #[test]
    fn test_resolve_weather_code_empty_table() {
        assert_eq!(resolve_weather_code("晴天", &[]), None);
    }
}
