// tests/handoff_test.rs
#![cfg(unix)]

use std::{fs, path::Path, time::Duration};
use tempfile::tempdir;
use xiaoet_m3u8::{
    config::DownloaderConfig,
    handoff::{DownloaderHandoff, HandoffOptions, write_url_list},
    models::ResultRecord,
};

fn records() -> Vec<ResultRecord> {
    vec![ResultRecord {
        resource_id: "v_1".to_string(),
        title: "Intro".to_string(),
        m3u8: "https://x/1.m3u8".to_string(),
        quality: "1080p_hls".to_string(),
    }]
}

fn options() -> HandoffOptions {
    HandoffOptions {
        prefix: "courseA".to_string(),
        retries: 3,
        timeout_secs: 30,
    }
}

/// 用 sh 模拟外部下载器: 记录参数与 URL 列表内容后以 `exit_code` 退出
fn recording_downloader(dir: &Path, exit_code: i32) -> DownloaderConfig {
    let script = format!(
        r#"cat "$2" > urls.txt; printf '%s\n' "$@" > args.txt; exit {}"#,
        exit_code
    );
    DownloaderConfig {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script, "sh".to_string()],
        workdir: Some(dir.to_path_buf()),
    }
}

#[tokio::test]
async fn test_handoff_success_removes_url_list() {
    let dir = tempdir().unwrap();
    let downloader = recording_downloader(dir.path(), 0);
    let handoff = DownloaderHandoff::new(&downloader, "Cookie: ko_token=abc", "appabc");

    let code = handoff.run(&records(), &options()).await.unwrap();

    assert_eq!(code, 0);
    assert_eq!(
        fs::read_to_string(dir.path().join("urls.txt")).unwrap(),
        "https://x/1.m3u8\n"
    );
    let args = fs::read_to_string(dir.path().join("args.txt")).unwrap();
    let args: Vec<&str> = args.lines().collect();
    assert_eq!(args[0], "-list");
    assert!(!Path::new(args[1]).exists(), "临时文件应已被删除");
    assert_eq!(
        &args[2..],
        &[
            "-prefix",
            "courseA",
            "-cookie",
            "ko_token=abc",
            "-referer",
            "https://appabc.h5.xiaoeknow.com/",
            "-retries",
            "3",
            "-timeout",
            "30",
        ]
    );
}

#[tokio::test]
async fn test_handoff_failure_propagates_code_and_cleans_up() {
    let dir = tempdir().unwrap();
    let downloader = recording_downloader(dir.path(), 3);
    let handoff = DownloaderHandoff::new(&downloader, "ko_token=abc", "appabc");

    let code = handoff.run(&records(), &options()).await.unwrap();

    assert_eq!(code, 3);
    let args = fs::read_to_string(dir.path().join("args.txt")).unwrap();
    let list_path = args.lines().nth(1).unwrap();
    assert!(!Path::new(list_path).exists(), "临时文件应已被删除");
}

#[tokio::test]
async fn test_cancelled_handoff_removes_url_list() {
    let downloader = DownloaderConfig {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), "exec sleep 5".to_string(), "sh".to_string()],
        workdir: None,
    };
    let handoff = DownloaderHandoff::new(&downloader, "ko_token=abc", "appabc");
    let url_list = write_url_list(&records()).unwrap();
    let list_path = url_list.path().to_path_buf();

    // 模拟中途被中断: 下载器仍在运行时丢弃任务
    let result = tokio::time::timeout(
        Duration::from_millis(300),
        handoff.run_with_list(url_list, &options()),
    )
    .await;

    assert!(result.is_err(), "下载器不应在超时前结束");
    assert!(!list_path.exists(), "中断后临时文件应已被删除");
}
