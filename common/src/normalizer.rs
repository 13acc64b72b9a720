//! クエリ正規化モジュール
//!
//! 生成AIが返した構造化JSON、またはフォーム入力から
//! フィルタエンジン用の `FilterCriteria` を組み立てる。
//!
//! ## 規則
//! - 人物名の汎用語（players / person / people）は除去する
//! - 件数は元の自然文の「<数字> image(s)」から取得（既定6）
//! - 文字列条件はそのまま渡す（一致判定はフィルタエンジン側）

use crate::error::{Error, Result};
use crate::types::{FilterCriteria, DEFAULT_RESULT_COUNT};
use regex::Regex;
use serde_json::{Map, Value};

/// 「人物指定なし」とみなす汎用語
pub const GENERIC_PLAYER_TERMS: &[&str] = &["players", "person", "people"];

/// 構造化クエリのキー名
pub mod keys {
    pub const PLAYERS: &str = "Players";
    pub const ACTION: &str = "Action";
    pub const ENVIRONMENT: &str = "Environment";
    pub const DAY_NIGHT: &str = "Day/Night";
    pub const SHOT_TYPE: &str = "ShotType";
    pub const DATE: &str = "Date";
    pub const LOCATION: &str = "Location";
    pub const RESULTS: &str = "Results";
}

/// 正規化前の入力フィールド（フォーム/JSON共通）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFields {
    pub players: Vec<String>,
    pub action: Option<String>,
    pub environment: Option<String>,
    pub day_night: Option<String>,
    pub shot_type: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub results: Option<usize>,
}

/// 汎用語かどうか（大文字小文字無視）
pub fn is_generic_player_term(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    GENERIC_PLAYER_TERMS.iter().any(|term| *term == lower)
}

/// 汎用語・空文字を除いた人物名リスト
pub fn effective_players(players: &[String]) -> Vec<String> {
    players
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty() && !is_generic_player_term(p))
        .map(str::to_string)
        .collect()
}

/// 自然文から要求件数を抽出
///
/// 最初に一致した「<数字> image」/「<数字> images」を採用する。
/// 0 や桁あふれは件数指定なしとして扱う。
pub fn extract_result_count(query: &str) -> Option<usize> {
    lazy_static::lazy_static! {
        static ref COUNT_RE: Regex = Regex::new(r"(?i)\b(\d+)\s*images?\b").unwrap();
    }

    COUNT_RE
        .captures(query)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .filter(|n| *n >= 1)
}

/// 入力フィールドを正規化
pub fn normalize_fields(fields: QueryFields) -> Result<FilterCriteria> {
    let results = match fields.results {
        Some(0) => {
            return Err(Error::MalformedCriteria(
                "Results must be a positive integer".into(),
            ))
        }
        Some(n) => n,
        None => DEFAULT_RESULT_COUNT,
    };

    Ok(FilterCriteria {
        players: effective_players(&fields.players),
        action: non_empty(fields.action),
        environment: non_empty(fields.environment),
        day_night: non_empty(fields.day_night),
        shot_type: non_empty(fields.shot_type),
        date: non_empty(fields.date),
        location: non_empty(fields.location),
        results,
    })
}

/// 生成AIのJSONオブジェクトを正規化
///
/// 件数は `query` の自然文からの抽出を優先し、無ければ `Results` キー、
/// それも無ければ既定値を使う。未知のキーは無視する。
pub fn normalize_value(value: &Value, query: &str) -> Result<FilterCriteria> {
    let mut fields = fields_from_value(value)?;
    if let Some(count) = extract_result_count(query) {
        fields.results = Some(count);
    }
    normalize_fields(fields)
}

/// JSONオブジェクトを型検証しながら `QueryFields` に変換
pub fn fields_from_value(value: &Value) -> Result<QueryFields> {
    let object = value.as_object().ok_or_else(|| {
        Error::MalformedCriteria(format!("expected a JSON object, got {}", kind_of(value)))
    })?;

    Ok(QueryFields {
        players: players_field(object)?,
        action: string_field(object, keys::ACTION)?,
        environment: string_field(object, keys::ENVIRONMENT)?,
        day_night: string_field(object, keys::DAY_NIGHT)?,
        shot_type: string_field(object, keys::SHOT_TYPE)?,
        date: string_field(object, keys::DATE)?,
        location: string_field(object, keys::LOCATION)?,
        results: results_field(object)?,
    })
}

fn players_field(object: &Map<String, Value>) -> Result<Vec<String>> {
    match object.get(keys::PLAYERS) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    Error::MalformedCriteria(format!(
                        "Players must contain only strings, found {}",
                        kind_of(item)
                    ))
                })
            })
            .collect(),
        Some(other) => Err(Error::MalformedCriteria(format!(
            "Players must be a list of strings, found {}",
            kind_of(other)
        ))),
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(non_empty(Some(s.clone()))),
        // 数値（例: "Date": 2023）は文字列として部分一致に使う
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(Error::MalformedCriteria(format!(
            "{} must be a string or number, found {}",
            key,
            kind_of(other)
        ))),
    }
}

fn results_field(object: &Map<String, Value>) -> Result<Option<usize>> {
    let malformed = |detail: String| {
        Error::MalformedCriteria(format!("Results must be a positive integer, {}", detail))
    };

    match object.get(keys::RESULTS) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(v) if v >= 1 => usize::try_from(v)
                .map(Some)
                .map_err(|_| malformed(format!("got {}", v))),
            _ => Err(malformed(format!("got {}", n))),
        },
        Some(Value::String(s)) => match s.trim().parse::<usize>() {
            Ok(v) if v >= 1 => Ok(Some(v)),
            _ => Err(malformed(format!("got \"{}\"", s))),
        },
        Some(other) => Err(malformed(format!("found {}", kind_of(other)))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // =============================================
    // 件数抽出
    // =============================================

    #[test]
    fn test_extract_result_count() {
        assert_eq!(extract_result_count("show me 4 images of Dhoni"), Some(4));
        assert_eq!(extract_result_count("3 images of Dhoni batting at night"), Some(3));
        assert_eq!(extract_result_count("1 image of Raina"), Some(1));
        assert_eq!(extract_result_count("10images please"), Some(10));
    }

    #[test]
    fn test_extract_result_count_absent() {
        assert_eq!(extract_result_count("show me images of Dhoni"), None);
        assert_eq!(extract_result_count("Dhoni 2023"), None);
        assert_eq!(extract_result_count("0 images"), None);
    }

    #[test]
    fn test_extract_result_count_ignores_case() {
        assert_eq!(extract_result_count("show 3 IMAGES of Dhoni"), Some(3));
        assert_eq!(extract_result_count("2 Images"), Some(2));
    }

    #[test]
    fn test_extract_result_count_first_match_wins() {
        assert_eq!(extract_result_count("2 images, no wait, 5 images"), Some(2));
    }

    // =============================================
    // 汎用語
    // =============================================

    #[test]
    fn test_generic_terms_removed() {
        let players = vec!["Players".to_string(), "Ms Dhoni".to_string(), "PEOPLE".to_string()];
        assert_eq!(effective_players(&players), vec!["Ms Dhoni"]);
    }

    #[test]
    fn test_generic_only_equals_empty() {
        let generic = normalize_value(&json!({"Players": ["players"]}), "").unwrap();
        let empty = normalize_value(&json!({"Players": []}), "").unwrap();
        assert_eq!(generic, empty);
        assert!(generic.players.is_empty());
    }

    // =============================================
    // JSON正規化
    // =============================================

    #[test]
    fn test_normalize_full_object() {
        let value = json!({
            "Players": ["Ms Dhoni"],
            "Action": "Batting",
            "Environment": "Outdoor",
            "Day/Night": "Night",
            "ShotType": "",
            "Date": null,
            "Location": "Chennai",
            "Results": "3",
            "Mood": "happy"
        });

        let criteria = normalize_value(&value, "Dhoni batting at night").unwrap();
        assert_eq!(criteria.players, vec!["Ms Dhoni"]);
        assert_eq!(criteria.action.as_deref(), Some("Batting"));
        assert_eq!(criteria.day_night.as_deref(), Some("Night"));
        assert_eq!(criteria.shot_type, None);
        assert_eq!(criteria.date, None);
        assert_eq!(criteria.location.as_deref(), Some("Chennai"));
        assert_eq!(criteria.results, 3);
    }

    #[test]
    fn test_query_count_overrides_results_key() {
        let criteria = normalize_value(&json!({"Results": 8}), "show me 4 images").unwrap();
        assert_eq!(criteria.results, 4);
    }

    #[test]
    fn test_default_result_count() {
        let criteria = normalize_value(&json!({"Players": ["Ms Dhoni"]}), "show me images of Dhoni").unwrap();
        assert_eq!(criteria.results, 6);
    }

    #[test]
    fn test_players_not_a_list() {
        let result = normalize_value(&json!({"Players": "Ms Dhoni"}), "");
        assert!(matches!(result, Err(Error::MalformedCriteria(_))));
    }

    #[test]
    fn test_players_with_non_string() {
        let result = normalize_value(&json!({"Players": ["Ms Dhoni", 7]}), "");
        assert!(matches!(result, Err(Error::MalformedCriteria(_))));
    }

    #[test]
    fn test_results_not_positive() {
        for bad in [json!(0), json!(-2), json!(2.5), json!("many"), json!(true)] {
            let result = normalize_value(&json!({"Results": bad}), "");
            assert!(
                matches!(result, Err(Error::MalformedCriteria(_))),
                "Resultsが受理された: {:?}",
                result
            );
        }
    }

    #[test]
    fn test_scalar_type_mismatch() {
        let result = normalize_value(&json!({"Action": ["Batting"]}), "");
        assert!(matches!(result, Err(Error::MalformedCriteria(_))));
    }

    #[test]
    fn test_scalar_bool_rejected() {
        let result = normalize_value(&json!({"Date": true}), "");
        assert!(matches!(result, Err(Error::MalformedCriteria(_))));
    }

    #[test]
    fn test_numeric_scalars_become_substring_needles() {
        use crate::catalog::CatalogTable;
        use crate::filter::filter;

        let criteria = normalize_value(
            &json!({"Players": ["Ms Dhoni"], "Date": 2023, "Location": 11}),
            "dhoni in 2023",
        )
        .unwrap();
        assert_eq!(criteria.date.as_deref(), Some("2023"));
        assert_eq!(criteria.location.as_deref(), Some("11"));

        let catalog = CatalogTable::from_csv_str(
            "ID,Name,URL,Date,Location\n\
             1,Ms Dhoni,u1,2023-05-01,Gate 11\n\
             2,Ms Dhoni,u2,2022-05-01,Gate 11\n\
             3,Ms Dhoni,u3,2023-06-01,Gate 4\n",
        )
        .unwrap()
        .group();
        assert_eq!(filter(&catalog, &criteria), vec!["u1"]);
    }

    #[test]
    fn test_non_object() {
        let result = normalize_value(&json!(["Ms Dhoni"]), "");
        assert!(matches!(result, Err(Error::MalformedCriteria(_))));
    }

    // =============================================
    // フォーム入力
    // =============================================

    #[test]
    fn test_normalize_fields_trims_and_drops_empty() {
        let criteria = normalize_fields(QueryFields {
            players: vec![" Ms Dhoni ".into(), "".into()],
            environment: Some("  ".into()),
            location: Some(" Chennai".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(criteria.players, vec!["Ms Dhoni"]);
        assert_eq!(criteria.environment, None);
        assert_eq!(criteria.location.as_deref(), Some("Chennai"));
        assert_eq!(criteria.results, DEFAULT_RESULT_COUNT);
    }

    #[test]
    fn test_normalize_fields_zero_results() {
        let result = normalize_fields(QueryFields {
            results: Some(0),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::MalformedCriteria(_))));
    }
}
