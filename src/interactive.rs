//! 対話モードの操作選択

use crate::error::{PhotoSearchError, Result};
use dialoguer::{Input, Select};
use photo_search_common::{FilterSelection, SearchSession};

/// 結果表示後に選べる操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Next,
    Back,
    LoadMore,
    NewQuery,
    AddPlayer,
    RemovePlayer,
    ClearSelection,
    Quit,
}

impl NavAction {
    pub fn label(&self) -> &'static str {
        match self {
            NavAction::Next => "Next",
            NavAction::Back => "Back",
            NavAction::LoadMore => "Load More",
            NavAction::NewQuery => "新しい検索",
            NavAction::AddPlayer => "人物を追加",
            NavAction::RemovePlayer => "人物を削除",
            NavAction::ClearSelection => "選択をクリア",
            NavAction::Quit => "終了",
        }
    }
}

/// 自然文検索のメニュー（移動できない方向は出さない）
pub fn text_menu(session: &SearchSession) -> Vec<NavAction> {
    let mut actions = Vec::new();
    if session.has_next() {
        actions.push(NavAction::Next);
    }
    if session.has_back() {
        actions.push(NavAction::Back);
    }
    actions.push(NavAction::NewQuery);
    actions.push(NavAction::Quit);
    actions
}

/// 条件フォームのメニュー
pub fn form_menu(session: &SearchSession, selection: &FilterSelection) -> Vec<NavAction> {
    let mut actions = Vec::new();
    if session.has_next() {
        actions.push(NavAction::LoadMore);
    }
    actions.push(NavAction::AddPlayer);
    if !selection.is_empty() {
        actions.push(NavAction::RemovePlayer);
        actions.push(NavAction::ClearSelection);
    }
    actions.push(NavAction::Quit);
    actions
}

pub fn choose(actions: &[NavAction]) -> Result<NavAction> {
    let labels: Vec<&str> = actions.iter().map(NavAction::label).collect();
    let selected = Select::new()
        .with_prompt("操作")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| PhotoSearchError::Prompt(e.to_string()))?;
    Ok(actions[selected])
}

pub fn prompt_query() -> Result<String> {
    Input::new()
        .with_prompt("検索文")
        .interact_text()
        .map_err(|e| PhotoSearchError::Prompt(e.to_string()))
}

/// 候補から1人選ぶ（Esc で None）
pub fn choose_player<S: AsRef<str>>(prompt: &str, candidates: &[S]) -> Result<Option<String>> {
    if candidates.is_empty() {
        return Ok(None);
    }

    let labels: Vec<&str> = candidates.iter().map(AsRef::as_ref).collect();
    let selected = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()
        .map_err(|e| PhotoSearchError::Prompt(e.to_string()))?;
    Ok(selected.map(|i| labels[i].to_string()))
}

/// 未選択の人物（カタログ出現順）
pub fn unselected_players<'a>(all: &[&'a str], selection: &FilterSelection) -> Vec<&'a str> {
    all.iter()
        .copied()
        .filter(|name| !selection.players().iter().any(|p| p == name))
        .collect()
}
