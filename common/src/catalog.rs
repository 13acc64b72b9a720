//! 写真カタログモジュール
//!
//! 写真×人物の行データを保持し、写真ID単位の集約ビューを作る。
//! カタログは読み込み後は不変（セッション中に書き換えない）。

use crate::error::{Error, Result};
use crate::types::{Column, GroupedPhoto, PhotoRecord};
use std::collections::{BTreeSet, HashMap, HashSet};

/// 欠損値として扱うセル文字列
const NULL_MARKERS: &[&str] = &["nan", "null", "n/a"];

/// 行単位のカタログ
#[derive(Debug, Clone, Default)]
pub struct CatalogTable {
    /// ファイルに存在した列
    columns: BTreeSet<Column>,
    rows: Vec<PhotoRecord>,
    /// ID/Name/URL が欠けていて読み飛ばした行数
    skipped_rows: usize,
}

impl CatalogTable {
    pub fn new(columns: impl IntoIterator<Item = Column>, rows: Vec<PhotoRecord>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            rows,
            skipped_rows: 0,
        }
    }

    /// CSV文字列から読み込み（1行目はヘッダー）
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut lines = content.lines().filter(|line| !line.trim().is_empty());

        let header_line = lines
            .next()
            .ok_or_else(|| Error::InvalidCatalog("ヘッダー行がありません".into()))?;
        let headers = parse_csv_line(header_line);
        let records: Vec<Vec<String>> = lines.map(parse_csv_line).collect();

        Self::from_rows(&headers, records)
    }

    /// ヘッダーとセル文字列の表から構築
    ///
    /// CSV/Excelどちらの読み込みもここを通る。
    pub fn from_rows<S: AsRef<str>>(headers: &[S], records: Vec<Vec<String>>) -> Result<Self> {
        let mut positions: HashMap<Column, usize> = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(column) = Column::from_header(header.as_ref()) {
                positions.entry(column).or_insert(i);
            }
        }

        for required in Column::REQUIRED {
            if !positions.contains_key(required) {
                return Err(Error::InvalidCatalog(format!(
                    "必須列 {} がありません",
                    required
                )));
            }
        }

        let cell = |record: &[String], column: Column| -> Option<String> {
            positions
                .get(&column)
                .and_then(|&i| record.get(i))
                .map(|value| value.trim())
                .filter(|value| !value.is_empty() && !is_null_marker(value))
                .map(str::to_string)
        };

        let mut rows = Vec::with_capacity(records.len());
        let mut skipped_rows = 0;

        for record in &records {
            let (Some(id), Some(name), Some(url)) = (
                cell(record, Column::Id),
                cell(record, Column::Name),
                cell(record, Column::Url),
            ) else {
                skipped_rows += 1;
                continue;
            };

            rows.push(PhotoRecord {
                id,
                name,
                url,
                action: cell(record, Column::Action),
                environment: cell(record, Column::Environment),
                day_night: cell(record, Column::DayNight),
                shot_type: cell(record, Column::ShotType),
                date: cell(record, Column::Date),
                location: cell(record, Column::Location),
                caption: cell(record, Column::Captions),
                no_of_faces: cell(record, Column::NoOfFaces).and_then(|v| parse_face_count(&v)),
                distance: cell(record, Column::Distance),
            });
        }

        Ok(Self {
            skipped_rows,
            ..Self::new(positions.into_keys(), rows)
        })
    }

    pub fn rows(&self) -> &[PhotoRecord] {
        &self.rows
    }

    pub fn columns(&self) -> &BTreeSet<Column> {
        &self.columns
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// カタログに無い任意列
    pub fn missing_optional_columns(&self) -> Vec<Column> {
        Column::ALL
            .iter()
            .copied()
            .filter(|c| !Column::REQUIRED.contains(c) && !self.has_column(*c))
            .collect()
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 人物名一覧（出現順、重複除去）
    pub fn players(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|r| r.name.as_str())
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// URLに対応するキャプション（最初に見つかったもの）
    pub fn caption_for_url(&self, url: &str) -> Option<&str> {
        self.rows
            .iter()
            .filter(|r| r.url == url)
            .find_map(|r| r.caption.as_deref())
    }

    /// 写真ID単位に集約する
    ///
    /// 1パスの畳み込み。写真の並びはIDの初出順で安定。
    pub fn group(&self) -> GroupedCatalog {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut photos: Vec<GroupedPhoto> = Vec::new();

        for row in &self.rows {
            let idx = *index.entry(row.id.as_str()).or_insert_with(|| {
                photos.push(GroupedPhoto {
                    id: row.id.clone(),
                    url: row.url.clone(),
                    ..Default::default()
                });
                photos.len() - 1
            });

            let photo = &mut photos[idx];
            photo.subjects.insert(row.name.clone());
            if let Some(action) = &row.action {
                photo.actions.insert(action.clone());
            }
            fill_first(&mut photo.environment, &row.environment);
            fill_first(&mut photo.day_night, &row.day_night);
            fill_first(&mut photo.shot_type, &row.shot_type);
            fill_first(&mut photo.date, &row.date);
            fill_first(&mut photo.location, &row.location);
            fill_first(&mut photo.caption, &row.caption);
        }

        GroupedCatalog::new(self.columns.iter().copied(), photos)
    }
}

/// 写真ID単位のカタログ
#[derive(Debug, Clone, Default)]
pub struct GroupedCatalog {
    columns: BTreeSet<Column>,
    photos: Vec<GroupedPhoto>,
}

impl GroupedCatalog {
    pub fn new(columns: impl IntoIterator<Item = Column>, photos: Vec<GroupedPhoto>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            photos,
        }
    }

    pub fn photos(&self) -> &[GroupedPhoto] {
        &self.photos
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// 全写真のURL（カタログ順）
    pub fn urls(&self) -> Vec<String> {
        self.photos.iter().map(|p| p.url.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

fn fill_first(slot: &mut Option<String>, value: &Option<String>) {
    if slot.is_none() {
        slot.clone_from(value);
    }
}

fn is_null_marker(value: &str) -> bool {
    NULL_MARKERS.iter().any(|m| value.eq_ignore_ascii_case(m))
}

/// 顔数セルを解釈（Excel由来の "2.0" も許容）
fn parse_face_count(value: &str) -> Option<u32> {
    if let Ok(n) = value.parse::<u32>() {
        return Some(n);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
        .map(|f| f as u32)
}

/// CSVの1行をフィールドに分割（ダブルクォート・`""`エスケープ対応）
fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                // フィールド終了
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    // 最後のフィールド
    fields.push(current.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CSV: &str = r#"ID,Name,URL,Action,Environment,Day/Night,ShotType,Date,Location,Captions,No_of_faces
1,Ms Dhoni,https://drive.google.com/file/d/aaa/view,Batting,Outdoor Stadium,Night,Wide,2023-05-01,Chennai,"Dhoni, at the crease",1
2,Ravindra Jadeja,https://drive.google.com/file/d/bbb/view,Bowling,Outdoor Stadium,Day,Close,2023-05-02,Mumbai,,2
2,Ms Dhoni,https://drive.google.com/file/d/bbb/view,Celebrating,,,,,,,2
3,Suresh Raina,https://drive.google.com/file/d/ccc/view,Posing,Indoor,NaN,Medium,2023-06-10,Chennai,,1
"#;

    #[test]
    fn test_parse_csv_line_quotes() {
        let fields = parse_csv_line(r#"1,"Dhoni, MS","say ""hi""",x"#);
        assert_eq!(fields, vec!["1", "Dhoni, MS", "say \"hi\"", "x"]);
    }

    #[test]
    fn test_parse_csv_line_trailing_empty() {
        let fields = parse_csv_line("a,b,");
        assert_eq!(fields, vec!["a", "b", ""]);
    }

    #[test]
    fn test_load_csv() {
        let catalog = CatalogTable::from_csv_str(TEST_CSV).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.rows()[0].caption.as_deref(), Some("Dhoni, at the crease"));
        assert_eq!(catalog.rows()[1].no_of_faces, Some(2));
        assert!(catalog.has_column(Column::DayNight));
        assert!(!catalog.has_column(Column::Distance));
    }

    #[test]
    fn test_null_marker_is_none() {
        let catalog = CatalogTable::from_csv_str(TEST_CSV).unwrap();
        assert_eq!(catalog.rows()[3].day_night, None);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "ID,Name\n1,Ms Dhoni\n";
        let result = CatalogTable::from_csv_str(csv);
        assert!(matches!(result, Err(Error::InvalidCatalog(_))));
    }

    #[test]
    fn test_empty_content() {
        assert!(matches!(
            CatalogTable::from_csv_str(""),
            Err(Error::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_rows_without_key_fields_are_skipped() {
        let csv = "ID,Name,URL\n1,Ms Dhoni,u1\n2,,u2\n,Kasi,u3\n";
        let catalog = CatalogTable::from_csv_str(csv).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.skipped_rows(), 2);
    }

    #[test]
    fn test_missing_optional_columns() {
        let csv = "ID,Name,URL,Action\n1,Ms Dhoni,u1,Batting\n";
        let catalog = CatalogTable::from_csv_str(csv).unwrap();
        let missing = catalog.missing_optional_columns();
        assert!(missing.contains(&Column::Location));
        assert!(!missing.contains(&Column::Action));
        assert!(!missing.contains(&Column::Id));
    }

    #[test]
    fn test_group_merges_subjects_and_actions() {
        let grouped = CatalogTable::from_csv_str(TEST_CSV).unwrap().group();
        assert_eq!(grouped.len(), 3);

        let photo = &grouped.photos()[1];
        assert_eq!(photo.id, "2");
        assert!(photo.subjects.contains("Ms Dhoni"));
        assert!(photo.subjects.contains("Ravindra Jadeja"));
        assert!(photo.actions.contains("Bowling"));
        assert!(photo.actions.contains("Celebrating"));
        // 最初の空でない値を採用
        assert_eq!(photo.environment.as_deref(), Some("Outdoor Stadium"));
        assert_eq!(photo.day_night.as_deref(), Some("Day"));
    }

    #[test]
    fn test_group_preserves_first_seen_order() {
        let csv = "ID,Name,URL\nb,X,u2\na,Y,u1\nb,Z,u2\n";
        let grouped = CatalogTable::from_csv_str(csv).unwrap().group();
        let ids: Vec<&str> = grouped.photos().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_group_is_total() {
        let catalog = CatalogTable::from_csv_str(TEST_CSV).unwrap();
        let grouped = catalog.group();
        let subject_rows: usize = grouped.photos().iter().map(|p| p.subjects.len()).sum();
        assert_eq!(subject_rows, catalog.len());
        assert!(grouped.photos().iter().all(|p| !p.subjects.is_empty()));
    }

    #[test]
    fn test_players_distinct_in_order() {
        let catalog = CatalogTable::from_csv_str(TEST_CSV).unwrap();
        assert_eq!(
            catalog.players(),
            vec!["Ms Dhoni", "Ravindra Jadeja", "Suresh Raina"]
        );
    }

    #[test]
    fn test_caption_for_url() {
        let catalog = CatalogTable::from_csv_str(TEST_CSV).unwrap();
        assert_eq!(
            catalog.caption_for_url("https://drive.google.com/file/d/aaa/view"),
            Some("Dhoni, at the crease")
        );
        assert_eq!(
            catalog.caption_for_url("https://drive.google.com/file/d/bbb/view"),
            None
        );
    }

    #[test]
    fn test_parse_face_count() {
        assert_eq!(parse_face_count("3"), Some(3));
        assert_eq!(parse_face_count("2.0"), Some(2));
        assert_eq!(parse_face_count("2.5"), None);
        assert_eq!(parse_face_count("many"), None);
    }
}
