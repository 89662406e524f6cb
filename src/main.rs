use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use price_match_rust::{cli, config, embedding, export, pipeline};
use cli::{Cli, Commands};
use config::Config;
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load().context("設定ファイルの読み込みに失敗しました")?;

    match cli.command {
        Commands::Run {
            pricelist,
            inquiry,
            output,
            api_key,
            provider,
            model,
            batch_size,
            concurrency,
            yes,
            dry_run,
            report,
        } => {
            println!("💰 price-match - 単価照合\n");

            pipeline::validate_inputs(&pricelist, &inquiry, &output)?;

            // コマンドライン指定で設定を上書き
            if let Some(provider) = provider {
                config.provider = provider;
            }
            if model.is_some() {
                config.model = model;
            }
            if let Some(batch_size) = batch_size {
                config.batch_size = batch_size;
            }
            if let Some(concurrency) = concurrency {
                config.concurrency = concurrency;
            }
            config.validate()?;

            if dry_run {
                return print_preview(&pricelist, &inquiry);
            }

            let api_key = match api_key.filter(|k| !k.trim().is_empty()) {
                Some(key) => key,
                None => config.get_api_key(config.provider)?,
            };

            let output_path = export::timestamped_output_path(&output, Local::now());
            if output_path.exists() && !yes && !confirm_overwrite(&output_path)? {
                println!("Process cancelled by user.");
                return Ok(());
            }

            let provider = embedding::build_provider(
                config.provider,
                api_key,
                config.model_for(config.provider),
                &config.base_url_for(config.provider),
                Duration::from_secs(config.timeout_seconds),
            )?;
            let client = embedding::EmbeddingClient::new(provider, config.batch_size)?
                .with_concurrency(config.concurrency);

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
            spinner.enable_steady_tick(Duration::from_millis(120));
            let log = |message: &str| {
                spinner.println(message);
                spinner.set_message(message.to_string());
            };

            let result = pipeline::run(&client, &pricelist, &inquiry, &output_path, &log).await;
            spinner.finish_and_clear();
            let summary = result.context("照合処理に失敗しました")?;

            if let Some(report_path) = report {
                write_report(&summary, &report_path)?;
                println!("✔ レポート出力: {}", report_path.display());
            }

            println!("✔ 単価表: {}品目", summary.pricelist_items);
            println!("✔ 照合: {}行", summary.matches.len());
            println!("✔ 出力: {}", summary.output.display());
            println!("\n✅ 完了");
        }

        Commands::Config { set_api_key, set_provider, set_model, set_batch_size, show } => {
            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            let mut changed = false;
            if let Some(provider) = set_provider {
                config.provider = provider;
                changed = true;
            }
            if let Some(model) = set_model {
                config.model = Some(model);
                changed = true;
            }
            if let Some(batch_size) = set_batch_size {
                config.batch_size = batch_size;
                changed = true;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show {
                println!("設定:");
                println!("  プロバイダ: {}", config.provider.name());
                println!("  モデル: {}", config.model_for(config.provider));
                println!("  バッチサイズ: {}", config.batch_size);
                println!("  同時リクエスト数: {}", config.concurrency);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  APIキー: {}", if config.get_api_key(config.provider).is_ok() { "設定済み" } else { "未設定" });
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "price_match_rust=debug,price_match_common=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Confirm::new()
        .with_prompt(format!("File '{}' already exists. Overwrite?", name))
        .default(false)
        .interact()
        .context("確認入力に失敗しました")
}

fn print_preview(pricelist: &Path, inquiry: &Path) -> Result<()> {
    let log = |message: &str| println!("{}", message);
    let preview = pipeline::preview(pricelist, inquiry, &log)?;

    println!("\nドライラン結果:");
    println!("  単価表: {}品目", preview.pricelist_items);
    for sheet in &preview.sheets {
        match sheet.layout {
            Some(layout) => println!(
                "  {}: ヘッダー{}行目, 対象{}行",
                sheet.name,
                layout.header_row + 1,
                sheet.targets
            ),
            None => println!("  {}: ヘッダーなし（スキップ）", sheet.name),
        }
    }
    println!("  合計: {}行", preview.total_targets());
    Ok(())
}

fn write_report(summary: &pipeline::RunSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json).with_context(|| format!("レポートの書き込みに失敗しました: {}", path.display()))?;
    Ok(())
}
