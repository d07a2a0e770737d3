// src/handoff.rs

use crate::{config::DownloaderConfig, error::*, models::ResultRecord};
use log::{debug, error, info, warn};
use std::{
    io::{BufWriter, Write},
    path::Path,
    process::Stdio,
};
use tempfile::NamedTempFile;
use tokio::process::Command;

const COOKIE_LABEL: &str = "cookie:";

/// 交给外部下载器的参数
#[derive(Debug, Clone)]
pub struct HandoffOptions {
    pub prefix: String,
    pub retries: u32,
    pub timeout_secs: u64,
}

/// 去掉开头的 `Cookie:` 标签 (大小写不敏感) 及首尾空白
pub fn normalize_cookie(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.get(..COOKIE_LABEL.len()) {
        Some(head) if head.eq_ignore_ascii_case(COOKIE_LABEL) => {
            trimmed[COOKIE_LABEL.len()..].trim().to_string()
        }
        _ => trimmed.to_string(),
    }
}

pub fn referer_for(app_id: &str) -> String {
    format!("https://{}.h5.xiaoeknow.com/", app_id)
}

/// 把 m3u8 地址逐行写入一个新的临时文件。文件在返回值被丢弃时删除。
pub fn write_url_list(records: &[ResultRecord]) -> AppResult<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("m3u8_urls_")
        .suffix(".txt")
        .tempfile()?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        for record in records {
            writeln!(writer, "{}", record.m3u8)?;
        }
        writer.flush()?;
    }
    Ok(file)
}

pub fn downloader_args(
    list_path: &Path,
    options: &HandoffOptions,
    cookie: &str,
    referer: &str,
) -> Vec<String> {
    vec![
        "-list".to_string(),
        list_path.to_string_lossy().into_owned(),
        "-prefix".to_string(),
        options.prefix.clone(),
        "-cookie".to_string(),
        cookie.to_string(),
        "-referer".to_string(),
        referer.to_string(),
        "-retries".to_string(),
        options.retries.to_string(),
        "-timeout".to_string(),
        options.timeout_secs.to_string(),
    ]
}

/// 调用外部批量下载器，返回其退出码
pub struct DownloaderHandoff<'a> {
    downloader: &'a DownloaderConfig,
    cookie: String,
    referer: String,
}

impl<'a> DownloaderHandoff<'a> {
    pub fn new(downloader: &'a DownloaderConfig, raw_cookie: &str, app_id: &str) -> Self {
        Self {
            downloader,
            cookie: normalize_cookie(raw_cookie),
            referer: referer_for(app_id),
        }
    }

    pub async fn run(&self, records: &[ResultRecord], options: &HandoffOptions) -> AppResult<i32> {
        let url_list = write_url_list(records)?;
        info!(
            "已生成临时 URL 列表: {} ({} 条)",
            url_list.path().display(),
            records.len()
        );
        self.run_with_list(url_list, options).await
    }

    /// 用已写好的 URL 列表调用下载器，结束后删除列表文件。
    ///
    /// 返回的 future 被提前丢弃 (如收到 Ctrl-C) 时，下载器进程被终止，
    /// 列表文件随 `NamedTempFile` 一起删除。
    pub async fn run_with_list(
        &self,
        url_list: NamedTempFile,
        options: &HandoffOptions,
    ) -> AppResult<i32> {
        let result = self.invoke(url_list.path(), options).await;

        if let Err(e) = url_list.close() {
            warn!("删除临时 URL 列表失败: {}", e);
        }
        result
    }

    async fn invoke(&self, list_path: &Path, options: &HandoffOptions) -> AppResult<i32> {
        let mut args = self.downloader.args.clone();
        args.extend(downloader_args(list_path, options, &self.cookie, &self.referer));

        let mut command = Command::new(&self.downloader.program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &self.downloader.workdir {
            command.current_dir(dir);
        }

        let cwd = self
            .downloader
            .workdir
            .as_deref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| ".".to_string());
        info!("调用外部下载器: {} (cwd={})", self.downloader.program, cwd);
        debug!("下载器参数: {:?}", args);

        let mut child = command.spawn().map_err(|e| {
            error!("无法启动外部下载器 '{}': {}", self.downloader.program, e);
            AppError::from(e)
        })?;
        let status = child.wait().await?;

        // 被信号终止时没有退出码
        let code = status.code().unwrap_or(1);
        if code != 0 {
            error!("外部下载器返回非零退出码: {}", code);
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn record(url: &str) -> ResultRecord {
        ResultRecord {
            resource_id: "v_1".to_string(),
            title: "Intro".to_string(),
            m3u8: url.to_string(),
            quality: "1080p_hls".to_string(),
        }
    }

    #[test]
    fn test_normalize_cookie() {
        assert_eq!(normalize_cookie("Cookie: a=1; b=2"), "a=1; b=2");
        assert_eq!(normalize_cookie("  COOKIE:a=1 "), "a=1");
        assert_eq!(normalize_cookie("a=1; b=2"), "a=1; b=2");
        assert_eq!(normalize_cookie(""), "");
        // 多字节字符不会在切片时出错
        assert_eq!(normalize_cookie("饼干=1"), "饼干=1");
    }

    #[test]
    fn test_referer_for() {
        assert_eq!(referer_for("appabc"), "https://appabc.h5.xiaoeknow.com/");
    }

    #[test]
    fn test_write_url_list() {
        let file = write_url_list(&[record("https://x/1.m3u8")]).unwrap();
        let path = file.path().to_path_buf();
        assert_eq!(fs::read_to_string(&path).unwrap(), "https://x/1.m3u8\n");
        drop(file);
        assert!(!path.exists());
    }

    #[test]
    fn test_downloader_args() {
        let options = HandoffOptions {
            prefix: "courseA".to_string(),
            retries: 3,
            timeout_secs: 30,
        };
        let args = downloader_args(Path::new("/tmp/list.txt"), &options, "a=1", "https://r/");
        assert_eq!(
            args,
            vec![
                "-list", "/tmp/list.txt", "-prefix", "courseA", "-cookie", "a=1", "-referer",
                "https://r/", "-retries", "3", "-timeout", "30",
            ]
        );
    }

    #[tokio::test]
    async fn test_spawn_failure_removes_url_list() {
        let downloader = DownloaderConfig {
            program: "definitely-not-a-real-downloader-binary".to_string(),
            args: vec![],
            workdir: None,
        };
        let handoff = DownloaderHandoff::new(&downloader, "cookie: a=1", "app");
        let options = HandoffOptions {
            prefix: "p".to_string(),
            retries: 1,
            timeout_secs: 1,
        };
        let url_list = write_url_list(&[record("https://x/1.m3u8")]).unwrap();
        let list_path = url_list.path().to_path_buf();

        let result = handoff.run_with_list(url_list, &options).await;

        assert!(matches!(result, Err(AppError::Io(_))));
        assert!(!list_path.exists(), "启动失败时也应删除临时文件");
    }
}
