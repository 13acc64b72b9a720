//! 画像ホスティングのリンク変換
//!
//! Google Driveの閲覧用URLからファイルIDを取り出し、
//! 閲覧リンクと直接取得用リンクを作る。

const DRIVE_HOST: &str = "drive.google.com";
const FILE_PATH_MARKER: &str = "/file/d/";

/// Driveファイルのリンク
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveLink {
    pub file_id: String,
}

impl DriveLink {
    /// URLからファイルIDを取り出す
    ///
    /// `/file/d/<id>/...` 形式を優先し、それ以外は末尾から2番目の
    /// パス要素をIDとみなす。Drive以外のURLは `None`。
    pub fn parse(url: &str) -> Option<Self> {
        if !is_drive_url(url) {
            return None;
        }

        let file_id = match url.split_once(FILE_PATH_MARKER) {
            Some((_, rest)) => rest.split(['/', '?', '#']).next().unwrap_or_default(),
            None => {
                let segments: Vec<&str> = url.split('/').collect();
                segments
                    .len()
                    .checked_sub(2)
                    .and_then(|i| segments.get(i))
                    .copied()
                    .unwrap_or_default()
            }
        };

        if file_id.is_empty() || file_id.contains(DRIVE_HOST) {
            return None;
        }

        Some(Self {
            file_id: file_id.to_string(),
        })
    }

    /// ブラウザで開く閲覧リンク
    pub fn view_url(&self) -> String {
        format!("https://drive.google.com/file/d/{}/view", self.file_id)
    }

    /// 画像バイトの直接取得リンク
    pub fn direct_url(&self) -> String {
        format!("https://drive.google.com/uc?id={}", self.file_id)
    }
}

pub fn is_drive_url(url: &str) -> bool {
    url.contains(DRIVE_HOST)
}

/// (閲覧リンク, 取得リンク) を返す
///
/// Drive以外のURLはそのまま両方に使う。
pub fn resolve_links(url: &str) -> (String, String) {
    match DriveLink::parse(url) {
        Some(link) => (link.view_url(), link.direct_url()),
        None => (url.to_string(), url.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view_url() {
        let link = DriveLink::parse("https://drive.google.com/file/d/1AbC_xyz/view?usp=sharing").unwrap();
        assert_eq!(link.file_id, "1AbC_xyz");
        assert_eq!(link.view_url(), "https://drive.google.com/file/d/1AbC_xyz/view");
        assert_eq!(link.direct_url(), "https://drive.google.com/uc?id=1AbC_xyz");
    }

    #[test]
    fn test_parse_second_to_last_segment() {
        let link = DriveLink::parse("https://drive.google.com/open/1AbC/preview").unwrap();
        assert_eq!(link.file_id, "1AbC");
    }

    #[test]
    fn test_non_drive_url() {
        assert_eq!(DriveLink::parse("https://example.com/photos/a.jpg"), None);
        let (view, direct) = resolve_links("https://example.com/photos/a.jpg");
        assert_eq!(view, "https://example.com/photos/a.jpg");
        assert_eq!(direct, view);
    }

    #[test]
    fn test_drive_url_without_id() {
        assert_eq!(DriveLink::parse("https://drive.google.com/"), None);
    }

    #[test]
    fn test_resolve_drive() {
        let (view, direct) = resolve_links("https://drive.google.com/file/d/XYZ/view");
        assert_eq!(view, "https://drive.google.com/file/d/XYZ/view");
        assert_eq!(direct, "https://drive.google.com/uc?id=XYZ");
    }
}
