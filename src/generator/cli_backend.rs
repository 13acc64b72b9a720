//! 生成AI CLI連携（claude / codex / gemini）

use crate::ai_provider::AiProvider;
use crate::error::{PhotoSearchError, Result};
use tokio::process::Command;

/// CLIにプロンプトを渡して標準出力を返す
pub async fn run_cli(provider: AiProvider, prompt: &str, verbose: bool) -> Result<String> {
    let command = provider.command_name().ok_or_else(|| {
        PhotoSearchError::Config(format!("{} はCLIプロバイダーではありません", provider))
    })?;
    let args = provider.command_args(prompt);

    // Windowsではcmd /c経由
    #[cfg(windows)]
    let output = Command::new("cmd")
        .arg("/c")
        .arg(command)
        .args(&args)
        .output()
        .await
        .map_err(|e| PhotoSearchError::ApiCall(format!("{} CLI実行エラー: {}", command, e)))?;

    #[cfg(not(windows))]
    let output = Command::new(command)
        .args(&args)
        .output()
        .await
        .map_err(|e| PhotoSearchError::ApiCall(format!("{} CLI実行エラー: {}", command, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PhotoSearchError::ApiCall(format!(
            "{} CLI failed (code {:?}): {}",
            command,
            output.status.code(),
            stderr
        )));
    }

    let response = String::from_utf8_lossy(&output.stdout).to_string();

    if verbose {
        let preview: String = response.chars().take(500).collect();
        println!("  レスポンス: {}", preview);
    }

    Ok(response)
}
