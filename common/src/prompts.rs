//! プロンプト生成モジュール
//!
//! - ACTION_VOCABULARY: 生成AIに選ばせる動作タグ
//! - FORM_ACTIONS: 条件フォームの動作ドロップダウン
//! - build_query_prompt: 自然文クエリ解析用プロンプト

/// 生成AIに提示する動作タグ（この中から1つ選ばせる）
pub const ACTION_VOCABULARY: &[&str] = &[
    "posing",
    "walking",
    "playing",
    "bowling",
    "batting",
    "observing",
    "speaking",
    "celebrating",
    "discussion",
    "award ceremony",
    "sitting",
    "standing",
    "laughing",
    "smiling",
    "eating",
    "event",
    "departure",
    "greeting",
    "running",
    "cheering",
];

/// 条件フォームの動作ドロップダウン（先頭は「指定なし」）
pub const FORM_ACTIONS: &[&str] = &[
    "Unspecified",
    "Award Ceremony",
    "Batting",
    "Bowling",
    "Catching",
    "Cheering",
    "Departure",
    "Eating",
    "Event",
    "Greeting",
    "Holding Signs",
    "Hugging",
    "Laughing",
    "Observing",
    "Playing",
    "Posing",
    "Practicing",
    "Receiving",
    "Running",
    "Smiling",
    "Speaking",
    "Standing",
    "Sitting",
    "Warm Up",
    "Walking",
];

/// 自然文クエリを構造化JSONに変換させるプロンプト
pub fn build_query_prompt(user_query: &str) -> String {
    let actions = ACTION_VOCABULARY.join(", ");

    format!(
        r#"You are an assistant for a sports analytics platform. Parse the following query into structured parameters:
Query: "{user_query}"
Output format:
{{"Players": [List of player names], "Action": "Action type" Any one of the given({actions})(optional), "Environment": "Environment type (optional)", "Day/Night": "Day or Night (optional)", "ShotType": "Type of shot (optional)", "Date": "Date (optional)", "Location": "Location (optional)", "Results": "Number of results (optional)"}}
Output only the JSON object."#
    )
}
