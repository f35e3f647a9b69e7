use anyhow::{Context, Result};
use clap::Parser;
use order_splitter::{cli, config, export, mapping, pdf, splitter};
use cli::{Cli, Commands};
use config::Config;
use order_splitter_common::{Classifier, Decision, IndexOptions, NormalizeOptions, PageRef};
use pdf::{LopdfBackend, PageSource, PdfBackend};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = Config::load()?;
    let backend = LopdfBackend;

    match cli.command {
        Commands::Split {
            store,
            mapping,
            inputs,
            output,
            strip_leading_zeros,
            conflict_policy,
            log_format,
            no_archive,
            quiet,
        } => {
            println!("📦 order-splitter - {} の発注書を振り分け\n", store);

            let (pdfs, mapping_path) = splitter::validate_inputs(&inputs, mapping.as_deref())?;
            let options = IndexOptions {
                normalize: NormalizeOptions::new(strip_leading_zeros || config.strip_leading_zeros),
                conflict_policy: conflict_policy.unwrap_or(config.conflict_policy),
            };
            let anchors = config.anchor_set()?;

            // 1. ベンダー表
            println!("[1/4] ベンダー表を読み込み中...");
            let loaded = mapping::load_vendor_index(&mapping_path, &options)
                .with_context(|| format!("ベンダー表: {}", mapping_path.display()))?;
            let (vendor_column, key_columns) = loaded.column_names();
            println!(
                "✔ {}件の品番 / {}社（ベンダー列: {}, 品番列: {}）",
                loaded.index.len(),
                loaded.index.vendors().len(),
                vendor_column,
                key_columns.join(", ")
            );
            if !loaded.index.conflicts().is_empty() {
                println!(
                    "⚠ 品番の重複: {}件（方針: {}）",
                    loaded.index.conflicts().len(),
                    options.conflict_policy
                );
            }
            println!();

            // 2. PDF
            println!("[2/4] PDFを読み込み中...");
            let documents = splitter::open_documents(&backend, &pdfs)?;
            let total_pages: usize = documents.iter().map(|d| d.page_count()).sum();
            println!("✔ {}ファイル / {}ページ\n", documents.len(), total_pages);

            // 3. 分類
            println!("[3/4] ページを分類中...");
            let classifier = Classifier::new(anchors, loaded.index, options.normalize);
            let progress = splitter::progress_bar(total_pages, quiet);
            let outcome = splitter::split_documents(&store.key, &documents, &classifier, &progress);
            println!("✔ 分類完了\n");

            // 4. 出力
            println!("[4/4] 出力中...");
            let output_dir = output.unwrap_or_else(|| config.output_dir.clone());
            let layout = export::OutputLayout::new(&output_dir, &store.key);
            let written = export::write_outputs(
                &backend,
                &documents,
                &outcome,
                &layout,
                log_format.unwrap_or(config.log_format),
            )?;
            println!("✔ PDF {}ファイル", written.pdfs.len());
            for path in &written.logs {
                println!("✔ ログ: {}", path.display());
            }

            if config.archive && !no_archive {
                let today = chrono::Local::now().date_naive();
                let archive = export::archive::archive_path(layout.root(), &store.key, today);
                let count = export::archive::create_archive(layout.root(), &archive)?;
                println!("✔ アーカイブ: {}（{}ファイル）", archive.display(), count);
            }

            let summary = &outcome.summary;
            println!("\n✅ 振り分け完了: {}", layout.root().display());
            println!("  総ページ: {}", summary.total_pages);
            println!("  ベンダー別: {}", summary.routed);
            for (vendor, pages) in &summary.per_vendor {
                println!("    {}: {}ページ", vendor, pages);
            }
            println!("  混在: {}", summary.mixed);
            println!("  未照合: {}", summary.unmatched);
        }

        Commands::Inspect {
            mapping,
            input,
            strip_leading_zeros,
            page,
        } => {
            println!("🔍 order-splitter - 分類の確認\n");

            let mut options = config.index_options();
            options.normalize = NormalizeOptions::new(strip_leading_zeros || config.strip_leading_zeros);
            let loaded = mapping::load_vendor_index(&mapping, &options)
                .with_context(|| format!("ベンダー表: {}", mapping.display()))?;
            let classifier = Classifier::new(config.anchor_set()?, loaded.index, options.normalize);

            let document = backend.open(&input)?;
            for index in 0..document.page_count() {
                if page.is_some_and(|p| p != index + 1) {
                    continue;
                }

                let text = document.page_text(index);
                let candidates = classifier.candidates(&text);
                let result = classifier.classify_page(PageRef::new(0, document.name(), index), &text);

                println!("--- {} p{} ---", document.name(), index + 1);
                for candidate in &candidates {
                    let key = classifier.options().normalize(&candidate.raw_token);
                    let vendor = classifier.index().lookup(&key).unwrap_or("-");
                    println!("  {:<8} {:<20} → {:<20} {}", candidate.label, candidate.raw_token, key, vendor);
                }
                match &result.decision {
                    Decision::Routed { vendor, best } => println!(
                        "  判定: {}（{} {}, 信頼度 {:.2}）",
                        vendor, best.anchor_label, best.raw_token, best.confidence
                    ),
                    Decision::Mixed { .. } => {
                        println!("  判定: 混在（{}）", result.decision.vendors().join(", "))
                    }
                    Decision::Unmatched => println!("  判定: 未照合"),
                }
            }
        }

        Commands::Index {
            mapping,
            strip_leading_zeros,
            conflict_policy,
        } => {
            println!("📋 order-splitter - ベンダー表の確認\n");

            let options = IndexOptions {
                normalize: NormalizeOptions::new(strip_leading_zeros || config.strip_leading_zeros),
                conflict_policy: conflict_policy.unwrap_or(config.conflict_policy),
            };
            let loaded = mapping::load_vendor_index(&mapping, &options)
                .with_context(|| format!("ベンダー表: {}", mapping.display()))?;
            let (vendor_column, key_columns) = loaded.column_names();

            println!("ベンダー列: {}", vendor_column);
            println!("品番列: {}", key_columns.join(", "));
            println!("行数: {}（ベンダー空欄で除外: {}）", loaded.table.rows.len(), loaded.index.skipped_rows());
            println!("品番: {}件", loaded.index.len());
            println!("ベンダー: {}社", loaded.index.vendors().len());
            for vendor in loaded.index.vendors() {
                println!("  {}", vendor);
            }

            if !loaded.index.conflicts().is_empty() {
                println!("\n品番の重複（方針: {}）:", options.conflict_policy);
                for conflict in loaded.index.conflicts() {
                    println!(
                        "  {}: {} / {} → {}",
                        conflict.key, conflict.existing, conflict.incoming, conflict.kept
                    );
                }
            }
        }

        Commands::Config {
            set_strip_leading_zeros,
            set_conflict_policy,
            set_output_dir,
            set_log_format,
            show,
        } => {
            let mut config = config;
            let mut changed = false;

            if let Some(value) = set_strip_leading_zeros {
                config.strip_leading_zeros = value;
                changed = true;
            }
            if let Some(policy) = set_conflict_policy {
                config.conflict_policy = policy;
                changed = true;
            }
            if let Some(dir) = set_output_dir {
                config.output_dir = dir;
                changed = true;
            }
            if let Some(format) = set_log_format {
                config.log_format = format;
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show {
                println!("設定:");
                println!("  先頭ゼロ除去: {}", config.strip_leading_zeros);
                println!("  品番重複の方針: {}", config.conflict_policy);
                println!("  出力先: {}", config.output_dir.display());
                println!("  ログ形式: {}", config.log_format);
                println!("  アーカイブ: {}", if config.archive { "有効" } else { "無効" });
                for extra in &config.extra_anchors {
                    println!("  追加アンカー: {} ({})", extra.label, extra.phrase);
                }
            }
        }
    }

    Ok(())
}
