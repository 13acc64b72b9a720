use anyhow::Context;
use clap::Parser;
use photo_search_common::{CatalogTable, FilterForm, FilterSelection, SearchSession};
use sports_photo_search::{catalog, cli, config, fetcher, generator, interactive, render, search};
use cli::{Cli, Commands, DisplayArgs};
use config::Config;
use fetcher::ImageFetcher;
use generator::QueryGenerator;
use interactive::NavAction;
use search::SearchOutcome;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load().context("設定ファイルを読み込めません")?;

    match cli.command {
        Commands::Search { query, catalog, provider, response_file, fields, display } => {
            println!("🔎 photo-search - 写真検索\n");

            // 1. カタログ読み込み
            let table = load_catalog(&config, catalog)?;
            let grouped = table.group();
            println!("✔ {}行 / {}枚の写真\n", table.len(), grouped.len());

            // 2. 条件解析
            println!("[2/3] 検索条件を解析中...");
            let provider = provider.unwrap_or(config.provider);
            let outcome = match query.as_deref() {
                Some(q) => {
                    let generator = match response_file {
                        Some(_) => None,
                        None => Some(QueryGenerator::from_config(&config, provider)?),
                    };
                    search::run_text_search(
                        &grouped,
                        q,
                        generator.as_ref(),
                        response_file.as_deref(),
                        cli.verbose,
                    )
                    .await?
                }
                None => search::resolve_fields(&grouped, fields.into())?,
            };
            report_outcome(&outcome);

            // 3. 表示
            println!("[3/3] 結果を表示中...\n");
            let fetcher = build_fetcher(&config, &display)?;
            let mut session = SearchSession::new();
            session.submit(outcome.urls, outcome.page_size);
            session.jump_to(display.page.saturating_sub(1));

            loop {
                show_current(&session, &table, fetcher.as_ref(), &config, &display).await?;
                if !display.interactive {
                    break;
                }

                match interactive::choose(&interactive::text_menu(&session))? {
                    NavAction::Next => {
                        session.next();
                    }
                    NavAction::Back => {
                        session.back();
                    }
                    NavAction::NewQuery => {
                        let q = interactive::prompt_query()?;
                        // 失敗しても前の結果を残して続行
                        match new_text_query(&config, provider, &grouped, &q, cli.verbose).await {
                            Ok(outcome) => {
                                report_outcome(&outcome);
                                session.submit(outcome.urls, outcome.page_size);
                            }
                            Err(e) => println!("✖ {}\n", e),
                        }
                    }
                    _ => break,
                }
            }
        }

        Commands::Filter { players, action, activity, from, to, faces, catalog, display } => {
            println!("🔎 photo-search - 条件フィルタ\n");

            let table = load_catalog(&config, catalog)?;
            let known = table.players();

            let mut selection = FilterSelection::new();
            for player in &players {
                if !known.contains(&player.as_str()) {
                    tracing::warn!(player = %player, "カタログに存在しない人物です");
                }
                selection.add(player);
            }

            let mut form = FilterForm {
                players: selection.players().to_vec(),
                action,
                activity,
                date_from: from,
                date_to: to,
                no_of_faces: faces,
            };

            let fetcher = build_fetcher(&config, &display)?;
            let mut session = SearchSession::new();
            let outcome = search::resolve_form(&table, &form, config.page_size);
            report_outcome(&outcome);
            session.submit(outcome.urls, outcome.page_size);
            session.jump_to(display.page.saturating_sub(1));

            loop {
                show_current(&session, &table, fetcher.as_ref(), &config, &display).await?;
                if !display.interactive {
                    break;
                }

                let changed = match interactive::choose(&interactive::form_menu(&session, &selection))? {
                    NavAction::LoadMore => {
                        session.next();
                        println!("表示済み: {}枚 / {}枚\n", session.loaded().len(), session.result_urls().len());
                        false
                    }
                    NavAction::AddPlayer => {
                        let candidates = interactive::unselected_players(&known, &selection);
                        match interactive::choose_player("追加する人物", &candidates)? {
                            Some(player) => selection.add(&player),
                            None => false,
                        }
                    }
                    NavAction::RemovePlayer => {
                        match interactive::choose_player("削除する人物", selection.players())? {
                            Some(player) => selection.remove(&player),
                            None => false,
                        }
                    }
                    NavAction::ClearSelection => {
                        selection.clear();
                        form.players.clear();
                        session.reset();
                        println!("選択をクリアしました\n");
                        continue;
                    }
                    _ => break,
                };

                if changed {
                    println!("選択中: {}\n", selection.players().join(", "));
                    form.players = selection.players().to_vec();
                    let outcome = search::resolve_form(&table, &form, config.page_size);
                    report_outcome(&outcome);
                    session.submit(outcome.urls, outcome.page_size);
                }
            }
        }

        Commands::Players { catalog } => {
            let table = load_catalog(&config, catalog)?;
            let players = table.players();
            println!("人物一覧 ({}人):", players.len());
            for name in players {
                println!("  {}", name);
            }
        }

        Commands::Config { set_api_key, set_catalog, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(path) = set_catalog {
                config.set_catalog_path(path)?;
                println!("✔ カタログを設定しました");
            }

            if show {
                println!("設定:");
                println!("  プロバイダ: {}", config.provider);
                println!("  モデル: {}", config.model);
                println!(
                    "  カタログ: {}",
                    config
                        .catalog_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定 (repo1.csv)".into())
                );
                println!("  表示枚数: {} / {}列", config.page_size, config.grid_columns);
                println!(
                    "  画像取得: {}回まで / {}秒間隔 / タイムアウト{}秒",
                    config.fetch_retries, config.retry_delay_secs, config.fetch_timeout_secs
                );
                println!("  APIキー: {}", if config.api_key.is_some() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalog(config: &Config, arg: Option<PathBuf>) -> anyhow::Result<CatalogTable> {
    let path = config.resolve_catalog_path(arg);
    println!("[1/3] カタログを読み込み中... ({})", path.display());
    catalog::load_catalog(&path)
        .with_context(|| format!("カタログを読み込めません: {}", path.display()))
}

fn build_fetcher(config: &Config, display: &DisplayArgs) -> anyhow::Result<Option<ImageFetcher>> {
    if display.no_fetch {
        return Ok(None);
    }
    Ok(Some(ImageFetcher::from_config(config)?))
}

async fn new_text_query(
    config: &Config,
    provider: sports_photo_search::ai_provider::AiProvider,
    grouped: &photo_search_common::GroupedCatalog,
    query: &str,
    verbose: bool,
) -> sports_photo_search::error::Result<SearchOutcome> {
    let generator = QueryGenerator::from_config(config, provider)?;
    search::run_text_search(grouped, query, Some(&generator), None, verbose).await
}

fn report_outcome(outcome: &SearchOutcome) {
    for warning in &outcome.warnings {
        println!("⚠ {}", warning);
    }
    if let Some(criteria) = &outcome.criteria {
        if !criteria.players.is_empty() {
            println!("  人物: {}", criteria.players.join(", "));
        }
    }
    println!("✔ {}枚が一致\n", outcome.urls.len());
}

async fn show_current(
    session: &SearchSession,
    table: &CatalogTable,
    fetcher: Option<&ImageFetcher>,
    config: &Config,
    display: &DisplayArgs,
) -> anyhow::Result<()> {
    render::show_page(
        &session.current(),
        table,
        fetcher,
        config.grid_columns,
        display.save_dir.as_deref(),
    )
    .await?;
    Ok(())
}
