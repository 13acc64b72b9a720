//! 条件フォーム検索モジュール
//!
//! 人物・動作・状況・日付範囲・顔数を選んで検索する経路。
//! 自然文検索（`filter`）とは意味論が異なる:
//! - 人物は「選択した誰か1人でも写っていれば」行が残る（行単位）
//! - 動作は部分一致（大文字小文字無視）
//! - 2人以上選択時は、同じURLに複数の選択人物が残る写真だけを残す
//! - 何も残らなければ、選択人物の全写真にフォールバック

use crate::catalog::CatalogTable;
use crate::filter::contains_ignore_case;
use crate::types::{Column, PhotoRecord};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// 日付セルとして受け付ける書式
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%d %b %Y",
];

/// 「状況」ドロップダウン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Unspecified,
    Day,
    Night,
    Outdoor,
    Indoor,
    Close,
    Far,
    Unknown,
}

impl Activity {
    pub const ALL: &'static [Activity] = &[
        Activity::Unspecified,
        Activity::Day,
        Activity::Night,
        Activity::Outdoor,
        Activity::Indoor,
        Activity::Close,
        Activity::Far,
        Activity::Unknown,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Activity::Unspecified => "Unspecified",
            Activity::Day => "Day",
            Activity::Night => "Night",
            Activity::Outdoor => "Outdoor",
            Activity::Indoor => "Indoor",
            Activity::Close => "Close",
            Activity::Far => "Far",
            Activity::Unknown => "Unknown",
        }
    }

    /// 絞り込む列（Unspecified/Unknown は絞り込まない）
    pub fn column(&self) -> Option<Column> {
        match self {
            Activity::Day | Activity::Night => Some(Column::DayNight),
            Activity::Outdoor | Activity::Indoor => Some(Column::Environment),
            Activity::Close | Activity::Far => Some(Column::Distance),
            Activity::Unspecified | Activity::Unknown => None,
        }
    }
}

impl std::str::FromStr for Activity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Activity::ALL
            .iter()
            .copied()
            .find(|a| a.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let labels: Vec<&str> = Activity::ALL.iter().map(|a| a.label()).collect();
                format!("Unknown activity: {}. Use one of {}", s, labels.join(", "))
            })
    }
}

impl std::fmt::Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 選択中の人物リスト（セッション中に追加・削除する）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    players: Vec<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加（空文字・重複は無視）。追加できたら true
    pub fn add(&mut self, player: &str) -> bool {
        let player = player.trim();
        if player.is_empty() || self.players.iter().any(|p| p == player) {
            return false;
        }
        self.players.push(player.to_string());
        true
    }

    /// 削除。存在したら true
    pub fn remove(&mut self, player: &str) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p != player);
        self.players.len() != before
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn clear(&mut self) {
        self.players.clear();
    }
}

/// フォームの入力内容
#[derive(Debug, Clone, Default)]
pub struct FilterForm {
    pub players: Vec<String>,
    /// 動作（None / "Unspecified" は絞り込まない）
    pub action: Option<String>,
    pub activity: Activity,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// 顔数（0 は絞り込まない）
    pub no_of_faces: u32,
}

/// フォーム検索の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormOutcome {
    /// 重複除去済みURL（出現順）
    pub urls: Vec<String>,
    /// 条件に一致せず選択人物の全写真を返した
    pub fell_back: bool,
    /// 条件が指定されたがカタログに無かった列
    pub missing_columns: Vec<Column>,
}

/// フォーム条件でカタログを絞り込む
pub fn apply_form(catalog: &CatalogTable, form: &FilterForm) -> FormOutcome {
    let mut outcome = FormOutcome::default();

    if form.players.is_empty() {
        return outcome;
    }

    let selected: HashSet<&str> = form.players.iter().map(String::as_str).collect();
    let mut rows: Vec<&PhotoRecord> = catalog
        .rows()
        .iter()
        .filter(|r| selected.contains(r.name.as_str()))
        .collect();

    if let Some(action) = form
        .action
        .as_deref()
        .filter(|a| !a.is_empty() && !a.eq_ignore_ascii_case("unspecified"))
    {
        if catalog.has_column(Column::Action) {
            rows.retain(|r| r.action.as_deref().is_some_and(|v| contains_ignore_case(v, action)));
        } else {
            outcome.missing_columns.push(Column::Action);
        }
    }

    if let Some(column) = form.activity.column() {
        if catalog.has_column(column) {
            let needle = form.activity.label();
            rows.retain(|r| activity_field(r, column).is_some_and(|v| contains_ignore_case(v, needle)));
        } else {
            outcome.missing_columns.push(column);
        }
    }

    if form.no_of_faces > 0 {
        if catalog.has_column(Column::NoOfFaces) {
            rows.retain(|r| r.no_of_faces == Some(form.no_of_faces));
        } else {
            outcome.missing_columns.push(Column::NoOfFaces);
        }
    }

    if form.date_from.is_some() || form.date_to.is_some() {
        if catalog.has_column(Column::Date) {
            rows.retain(|r| {
                r.date
                    .as_deref()
                    .and_then(parse_date)
                    .is_some_and(|d| in_range(d, form.date_from, form.date_to))
            });
        } else {
            outcome.missing_columns.push(Column::Date);
        }
    }

    if selected.len() > 1 {
        rows = same_url_clusters(rows);
    }

    outcome.urls = unique_urls(rows.iter().copied());

    if outcome.urls.is_empty() {
        outcome.fell_back = true;
        outcome.urls = unique_urls(
            catalog
                .rows()
                .iter()
                .filter(|r| selected.contains(r.name.as_str())),
        );
    }

    outcome
}

/// 複数の選択人物が同じURLに残っている行だけを残す
fn same_url_clusters(rows: Vec<&PhotoRecord>) -> Vec<&PhotoRecord> {
    let mut names_by_url: HashMap<&str, HashSet<&str>> = HashMap::new();
    for r in rows.iter().copied() {
        names_by_url
            .entry(r.url.as_str())
            .or_default()
            .insert(r.name.as_str());
    }

    rows.into_iter()
        .filter(|r| names_by_url.get(r.url.as_str()).is_some_and(|names| names.len() > 1))
        .collect()
}

fn unique_urls<'a>(rows: impl Iterator<Item = &'a PhotoRecord>) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.filter(|r| seen.insert(r.url.as_str()))
        .map(|r| r.url.clone())
        .collect()
}

fn activity_field(record: &PhotoRecord, column: Column) -> Option<&str> {
    match column {
        Column::DayNight => record.day_night.as_deref(),
        Column::Environment => record.environment.as_deref(),
        Column::Distance => record.distance.as_deref(),
        _ => None,
    }
}

fn in_range(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    from.map_or(true, |f| date >= f) && to.map_or(true, |t| date <= t)
}

/// 日付セルを解釈（時刻付きは日付部分のみ）
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or(value);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        })
}
