use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use photo_annotate::annotation::SidecarStore;
use photo_annotate::scanner::{self, ExifExtractor};
use photo_annotate::{cli, config, interactive, listing};
use cli::{Cli, Commands};
use config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let config = Config::load().context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Annotate { folder } => {
            println!("📝 photo-annotate - 注記入力\n");
            interactive::run_interactive(&folder, &config)?;
        }

        Commands::List { folder, json, output } => {
            let photos = scanner::scan_folder(&folder)?;
            if photos.is_empty() {
                println!("写真が見つかりません: {}", folder.display());
                return Ok(());
            }

            let pb = ProgressBar::new(photos.len() as u64);
            pb.set_style(
                ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                    .context("プログレスバーの設定に失敗しました")?
                    .progress_chars("=> "),
            );
            pb.set_message("メタデータ抽出中");
            let listings = listing::list_photos(&photos, &ExifExtractor, &SidecarStore, Some(&pb));
            pb.finish_and_clear();

            let content = if json {
                serde_json::to_string_pretty(&listings)?
            } else {
                listings
                    .iter()
                    .map(|l| l.summary_line())
                    .collect::<Vec<_>>()
                    .join("\n")
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("書き込みに失敗: {}", path.display()))?;
                    println!("✔ {}件を保存: {}", listings.len(), path.display());
                }
                None => println!("{}", content),
            }
        }

        Commands::Config { set_history_limit, show } => {
            let mut config = config;

            if let Some(limit) = set_history_limit {
                config.set_history_limit(limit)?;
                println!("✔ 注記履歴の上限を{}件に設定しました", limit);
            }

            if show || set_history_limit.is_none() {
                println!("設定:");
                println!("  パス: {}", Config::config_path()?.display());
                println!("  注記履歴の上限: {}", config.history_limit);
                println!(
                    "  地図の初期位置: {:.6}, {:.6}",
                    config.default_map_center.latitude, config.default_map_center.longitude
                );
                println!(
                    "  地図の初期スパン: {} x {}",
                    config.default_map_span.latitude_delta, config.default_map_span.longitude_delta
                );
            }
        }
    }

    Ok(())
}
