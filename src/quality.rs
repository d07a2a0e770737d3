// src/quality.rs

use crate::models::QualityUrlMap;
use clap::ValueEnum;
use regex::Regex;
use std::sync::LazyLock;

static RESOLUTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)p").unwrap());

const HLS_SUFFIX: &str = "_hls";

/// 用户请求的清晰度
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum QualityChoice {
    /// 自动选择最佳清晰度
    #[default]
    Auto,
    #[value(name = "360p")]
    P360,
    #[value(name = "480p")]
    P480,
    #[value(name = "720p")]
    P720,
    #[value(name = "1080p")]
    P1080,
}

impl QualityChoice {
    /// 对应的映射键，`Auto` 没有固定键
    pub fn hls_key(self) -> Option<&'static str> {
        match self {
            QualityChoice::Auto => None,
            QualityChoice::P360 => Some("360p_hls"),
            QualityChoice::P480 => Some("480p_hls"),
            QualityChoice::P720 => Some("720p_hls"),
            QualityChoice::P1080 => Some("1080p_hls"),
        }
    }
}

/// 一个选中的播放地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedStream {
    pub url: String,
    pub quality: String,
}

fn resolution_of(key: &str) -> u32 {
    RESOLUTION_RE
        .captures(key)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// 在所有可用条目中选出分辨率最高的一个。
///
/// 排序键依次为: 分辨率数字 (无数字视为最低)、是否为 HLS 键、键名本身。
pub fn choose_best_quality(map: &QualityUrlMap) -> Option<SelectedStream> {
    map.iter()
        .filter_map(|(key, entry)| entry.usable_url().map(|url| (key, url)))
        .max_by_key(|&(key, _)| (resolution_of(key), key.ends_with(HLS_SUFFIX), key))
        .map(|(key, url)| SelectedStream {
            url: url.to_string(),
            quality: key.clone(),
        })
}

/// 清晰度选择策略: 明确请求且可用时直接命中，否则回退到最佳清晰度。
pub fn select_stream(desired: QualityChoice, map: &QualityUrlMap) -> Option<SelectedStream> {
    let explicit = desired.hls_key().and_then(|key| {
        map.get(key)
            .and_then(|entry| entry.usable_url())
            .map(|url| SelectedStream {
                url: url.to_string(),
                quality: key.to_string(),
            })
    });
    explicit.or_else(|| choose_best_quality(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayUrlEntry;

    fn map_of(entries: &[(&str, Option<&str>)]) -> QualityUrlMap {
        entries
            .iter()
            .map(|(key, url)| {
                (
                    key.to_string(),
                    PlayUrlEntry {
                        play_url: url.map(str::to_string),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_explicit_quality_hits() {
        let map = map_of(&[
            ("1080p_hls", Some("https://x/1080.m3u8")),
            ("720p_hls", Some("https://x/720.m3u8")),
        ]);
        let selected = select_stream(QualityChoice::P720, &map).unwrap();
        assert_eq!(selected.quality, "720p_hls");
        assert_eq!(selected.url, "https://x/720.m3u8");
    }

    #[test]
    fn test_missing_or_empty_quality_falls_back_to_best() {
        let map = map_of(&[
            ("360p_hls", Some("https://x/360.m3u8")),
            ("480p_hls", Some("https://x/480.m3u8")),
            ("720p_hls", Some("")),
        ]);
        let expected = choose_best_quality(&map);
        assert_eq!(select_stream(QualityChoice::P720, &map), expected);
        assert_eq!(select_stream(QualityChoice::P1080, &map), expected);
        assert_eq!(select_stream(QualityChoice::Auto, &map), expected);
        assert_eq!(expected.unwrap().quality, "480p_hls");
    }

    #[test]
    fn test_auto_ignores_lower_explicit_match() {
        let map = map_of(&[
            ("360p_hls", Some("https://x/360.m3u8")),
            ("1080p_hls", Some("https://x/1080.m3u8")),
        ]);
        let selected = select_stream(QualityChoice::Auto, &map).unwrap();
        assert_eq!(selected.quality, "1080p_hls");
        // 重复调用结果一致
        assert_eq!(select_stream(QualityChoice::Auto, &map), Some(selected));
    }

    #[test]
    fn test_best_quality_ordering() {
        // 数字排序而非字典序: 1080 > 720
        let map = map_of(&[
            ("720p_hls", Some("https://x/720.m3u8")),
            ("1080p_hls", Some("https://x/1080.m3u8")),
            ("origin", Some("https://x/origin.m3u8")),
        ]);
        assert_eq!(choose_best_quality(&map).unwrap().quality, "1080p_hls");

        // 同分辨率优先 HLS
        let map = map_of(&[
            ("720p_hls", Some("https://x/720.m3u8")),
            ("720p_mp4", Some("https://x/720.mp4")),
        ]);
        assert_eq!(choose_best_quality(&map).unwrap().quality, "720p_hls");

        // 没有分辨率信息的键也可以作为最后的选择
        let map = map_of(&[("origin", Some("https://x/origin.m3u8")), ("360p_hls", None)]);
        assert_eq!(choose_best_quality(&map).unwrap().quality, "origin");
    }

    #[test]
    fn test_no_usable_entry() {
        assert_eq!(choose_best_quality(&QualityUrlMap::new()), None);
        let map = map_of(&[("720p_hls", Some("   ")), ("1080p_hls", None)]);
        assert_eq!(select_stream(QualityChoice::P720, &map), None);
        assert_eq!(select_stream(QualityChoice::Auto, &map), None);
    }

    #[test]
    fn test_hls_keys() {
        assert_eq!(QualityChoice::Auto.hls_key(), None);
        assert_eq!(QualityChoice::P360.hls_key(), Some("360p_hls"));
        assert_eq!(QualityChoice::P1080.hls_key(), Some("1080p_hls"));
        assert_eq!(
            QualityChoice::from_str("720p", true).unwrap(),
            QualityChoice::P720
        );
    }
}
