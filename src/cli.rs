use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-annotate")]
#[command(about = "写真の位置・方位・撮影日時を確認し、注記をサイドカーテキストに保存するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真フォルダを対話的に閲覧・注記
    Annotate {
        /// 写真フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,
    },

    /// 写真ごとの日時・緯度経度・方位・注記を一覧表示
    List {
        /// 写真フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// JSONで出力
        #[arg(long)]
        json: bool,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 注記履歴の上限を設定
        #[arg(long)]
        set_history_limit: Option<usize>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_annotate() {
        let cli = Cli::try_parse_from(["photo-annotate", "annotate", "/photos"]).unwrap();
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Annotate { folder } if folder == PathBuf::from("/photos")));
    }

    #[test]
    fn test_parse_list_json() {
        let cli =
            Cli::try_parse_from(["photo-annotate", "-v", "list", "/photos", "--json", "-o", "out.json"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::List { folder, json, output } => {
                assert_eq!(folder, PathBuf::from("/photos"));
                assert!(json);
                assert_eq!(output, Some(PathBuf::from("out.json")));
            }
            _ => panic!("list expected"),
        }
    }

    #[test]
    fn test_parse_config() {
        let cli = Cli::try_parse_from(["photo-annotate", "config", "--set-history-limit", "50"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config { set_history_limit: Some(50), show: false }
        ));
    }

    #[test]
    fn test_annotate_requires_folder() {
        assert!(Cli::try_parse_from(["photo-annotate", "annotate"]).is_err());
    }
}
