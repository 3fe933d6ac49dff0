use clap::Parser;
use snha_tools::commands::fire_rating::{self, FireRatingOptions};
use snha_tools::commands::{merge_sheet_notes, sync_revisions, view_references, Diagnostics, Level};
use snha_tools::picker::{InteractivePicker, NamedViewPicker, ViewPicker};
use snha_tools::{cli, config, error, session};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use session::{CloseSummary, Session};
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snha_tools=debug,snha_tools_common=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() {
    if let Err(e) = run() {
        eprintln!("✖ {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        init_logging();
    }
    let dry_run = cli.dry_run;

    match cli.command {
        Commands::FireRatingLines { model, output, force } => {
            println!("🧱 snha-tools - 耐火区画線\n");
            let config = Config::load()?;
            let mut session = Session::open(&model)?;

            let report = fire_rating::draw_fire_rating_lines(
                &mut session,
                &config.fire_rating,
                FireRatingOptions { force },
            )?;
            report.diagnostics.print();

            println!();
            if report.purged_lines > 0 {
                println!("✔ 既存の耐火区画線を削除: {}本", report.purged_lines);
            }
            println!("✔ 耐火区画線を作成: {}本", report.created_lines.len());
            if !report.skipped.is_empty() {
                println!("- スキップした壁: {}枚", report.skipped.len());
            }

            finish(session, output.as_deref(), dry_run, &report.diagnostics)?;
        }

        Commands::MergeSheetNotes { model, output, target } => {
            println!("📝 snha-tools - シートノート統合\n");
            let config = Config::load()?;
            let mut session = Session::open(&model)?;

            let report = merge_sheet_notes::merge_sheet_note_families(
                &mut session,
                &config.sheet_notes,
                &config.naming.resolver(),
                cli::element_id(target),
            )?;
            report.diagnostics.print();

            println!();
            println!(
                "✔ {}ファミリ / {}タイプを統合",
                report.merged_families.len(),
                report.merged_types.len()
            );
            if !report.failures.is_empty() {
                println!("- 失敗したファミリ: {}", report.failures.len());
            }

            finish(session, output.as_deref(), dry_run, &report.diagnostics)?;
        }

        Commands::SyncRevisions { model, output } => {
            println!("🔁 snha-tools - リビジョン同期\n");
            let config = Config::load()?;
            let mut session = Session::open(&model)?;

            let report = sync_revisions::sync_revisions(&mut session, &config.revisions)?;
            report.diagnostics.print();

            println!();
            println!("✔ {}件の変更", report.changes.len());

            finish(session, output.as_deref(), dry_run, &report.diagnostics)?;
        }

        Commands::ChangeViewRef { model, output, select, to } => {
            println!("🔗 snha-tools - 参照ビューの付け替え\n");
            let mut session = Session::open(&model)?;

            let mut picker: Box<dyn ViewPicker> = match to {
                Some(query) => Box::new(NamedViewPicker::new(query)),
                None => Box::new(InteractivePicker),
            };

            let report = view_references::change_referenced_view(
                &mut session,
                picker.as_mut(),
                cli::element_id(select),
            )?;
            report.diagnostics.print();

            if report.new_view.is_some() {
                println!();
                println!("✔ {}件の参照を付け替え", report.repointed.len());
            }

            finish(session, output.as_deref(), dry_run, &report.diagnostics)?;
        }

        Commands::Config { show, reset } => {
            // --reset は既存の設定ファイルを読まない
            let config = if reset {
                let config = Config::default();
                config.save()?;
                println!("✔ 設定をデフォルトに戻しました: {}", Config::config_path()?.display());
                config
            } else {
                Config::load()?
            };

            if show || !reset {
                println!("設定: {}", Config::config_path()?.display());
                println!("  [fireRating]");
                println!("    線種フィルタ: {}", config.fire_rating.linestyle_phrase);
                println!("    区分: {} / {}", config.fire_rating.code_phrase, config.fire_rating.client_phrase);
                println!("    耐火等級パラメータ: {}", config.fire_rating.rating_parameter);
                println!("    接尾辞: {}", config.fire_rating.value_suffix);
                println!(
                    "    施主要望: {} = {}",
                    config.fire_rating.client_request_parameter, config.fire_rating.client_request_value
                );
                println!("  [sheetNotes]");
                println!(
                    "    キー: {} / {} / {}",
                    config.sheet_notes.series_key, config.sheet_notes.number_key, config.sheet_notes.text_key
                );
                println!("  [revisions]");
                println!("    区切り文字: '{}'", config.revisions.name_delimiter);
                println!("  [naming]");
                println!(
                    "    重複時の接尾辞: '{}' (最大{}回)",
                    config.naming.collision_marker, config.naming.max_attempts
                );
            }
        }
    }

    Ok(())
}

/// セッションを閉じて保存結果を表示
fn finish(
    session: Session<snha_tools::host::ModelDocument>,
    output: Option<&Path>,
    dry_run: bool,
    diagnostics: &Diagnostics,
) -> Result<()> {
    let summary: CloseSummary = session.close(output, dry_run)?;

    match (&summary.saved_to, summary.modified) {
        (Some(path), _) => println!("✔ モデルを保存: {}", path.display()),
        (None, true) => println!("- ドライラン: モデルは保存していません"),
        (None, false) => println!("- 変更はありません"),
    }

    let errors = diagnostics.count(Level::Error);
    if errors > 0 {
        println!("\n⚠ 完了（エラー {}件）", errors);
    } else {
        println!("\n✅ 完了");
    }
    Ok(())
}
