// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const EXAMPLE_CONFIG_FILE: &str = "config.example.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// 视频资源 ID 的类型前缀
pub const VIDEO_RESOURCE_PREFIX: &str = "v_";

pub const DEFAULT_PIPE_PREFIX: &str = "courseA";
pub const DEFAULT_PIPE_RETRIES: u32 = 3;
pub const DEFAULT_PIPE_TIMEOUT_SECS: u64 = 30;

pub mod network {
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    pub const TIMEOUT_SECS: u64 = 30;
    pub const MAX_RETRIES: u32 = 3;
    pub const PAGE_SIZE: u32 = 50;
}

pub mod downloader {
    pub const PROGRAM: &str = "go";
    pub const ARGS: &[&str] = &["run", "main.go"];
}

pub mod api {
    pub const HOST_TEMPLATE: &str = "https://{app_id}.h5.xiaoeknow.com";
    pub const PLAY_LINE: &str = "A";
    pub const SORT_ASC: &str = "asc";

    pub mod templates {
        pub const NAVIGATION: &str = "NAVIGATION";
        pub const COLUMN_ITEMS: &str = "COLUMN_ITEMS";
        pub const VIDEO_DETAIL: &str = "VIDEO_DETAIL";
        pub const PLAY_URL: &str = "PLAY_URL";
    }
}
