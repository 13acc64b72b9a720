//! Gemini REST API 連携
//!
//! `generateContent` にプロンプトを送り、最初の候補のテキストを返す。

use crate::error::{PhotoSearchError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

fn endpoint(model: &str) -> String {
    format!("{}/{}:generateContent", GEMINI_API_BASE, model)
}

fn build_request(prompt: &str) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }],
        generation_config: GenerationConfig { temperature: 0.1 },
    }
}

/// 最初の候補のテキスト部分を連結
fn response_text(response: GeminiResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let text: String = candidate
        .content
        .parts
        .into_iter()
        .map(|p| p.text)
        .collect::<Vec<_>>()
        .join("");
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Gemini API呼び出し（失敗しても再試行しない）
pub async fn generate_content(
    api_key: &str,
    model: &str,
    prompt: &str,
    timeout: Duration,
) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| PhotoSearchError::ApiCall(format!("HTTPクライアント生成エラー: {}", e)))?;

    let response = client
        .post(format!("{}?key={}", endpoint(model), api_key))
        .json(&build_request(prompt))
        .send()
        .await
        .map_err(|e| PhotoSearchError::ApiCall(format!("Gemini API送信エラー: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(PhotoSearchError::ApiCall(format!(
            "Gemini API failed with status {}: {}",
            status, body
        )));
    }

    let payload: GeminiResponse = response
        .json()
        .await
        .map_err(|e| PhotoSearchError::ApiCall(format!("Gemini APIレスポンス不正: {}", e)))?;

    response_text(payload).ok_or_else(|| PhotoSearchError::ApiCall("Gemini APIの応答が空です".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        assert_eq!(
            endpoint("gemini-1.5-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_build_request_shape() {
        let json = serde_json::to_value(build_request("parse this")).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "parse this");
        assert!(json["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn test_response_text_joins_parts() {
        let payload: GeminiResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "```json\n{"}, {"text": "}\n```"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response_text(payload).unwrap(), "```json\n{}\n```");
    }

    #[test]
    fn test_response_text_empty() {
        let payload: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(response_text(payload).is_none());

        let payload: GeminiResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(response_text(payload).is_none());
    }
}
