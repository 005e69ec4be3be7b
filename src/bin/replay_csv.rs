use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use gestoscopio::csv_loader::load_samples_from_csv;
use gestoscopio::feature_extractor::FeatureSet;
use gestoscopio::gesture_classifier::{ClassifierConfig, Strategy};
use gestoscopio::session::ClassificationSession;
use gestoscopio::types::GestureLabel;

struct ReplayOptions {
    dump_norms: bool,
    mean_tree: bool,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<(PathBuf, ReplayOptions)> {
    let mut dump_norms = false;
    let mut mean_tree = false;
    let mut config: Option<PathBuf> = None;
    let mut target: Option<PathBuf> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dump-norms" => dump_norms = true,
            "--mean-tree" => mean_tree = true,
            "--config" => {
                let path = args.next().ok_or_else(|| anyhow!("--config requiere una ruta"))?;
                config = Some(PathBuf::from(path));
            }
            _ => {
                if target.is_some() {
                    bail!(
                        "Uso: replay_csv [--dump-norms] [--mean-tree] [--config <json>] \
                         <archivo.csv|carpeta>"
                    );
                }
                target = Some(PathBuf::from(arg));
            }
        }
    }

    let target = target.ok_or_else(|| anyhow!("Debes especificar un archivo CSV o una carpeta"))?;
    Ok((
        target,
        ReplayOptions {
            dump_norms,
            mean_tree,
            config,
        },
    ))
}

/// Si el objetivo es una carpeta, elige una grabación al azar.
fn pick_csv(target: PathBuf) -> Result<PathBuf> {
    if !target.is_dir() {
        return Ok(target);
    }

    let csv_files: Vec<PathBuf> = fs::read_dir(&target)
        .with_context(|| format!("No se pudo listar la carpeta {target:?}"))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();

    if csv_files.is_empty() {
        bail!("No hay archivos CSV en {target:?}");
    }

    use rand::Rng;
    let random_idx = rand::thread_rng().gen_range(0..csv_files.len());
    Ok(csv_files[random_idx].clone())
}

fn main() -> Result<()> {
    let (target, opts) = parse_args()?;
    let csv_path = pick_csv(target)?;
    println!("🎞️  Reproduciendo grabación desde {csv_path:?}");

    let mut config = match &opts.config {
        Some(path) => ClassifierConfig::from_json_file(path)?,
        None => ClassifierConfig::default(),
    };
    if opts.mean_tree {
        config.strategy = Strategy::MeanTree;
    }

    let samples = load_samples_from_csv(&csv_path)?;
    println!("📄 {} muestras cargadas\n", samples.len());

    let mut session = ClassificationSession::new(config);
    let mut tally: HashMap<GestureLabel, usize> = HashMap::new();
    let mut last_label: Option<GestureLabel> = None;

    for (idx, sample) in samples.iter().enumerate() {
        let label = session.ingest(*sample)?;
        *tally.entry(label).or_insert(0) += 1;
        if last_label != Some(label) {
            println!("  {idx:>4}: {label}");
            last_label = Some(label);
        }
    }

    let mut counts: Vec<(GestureLabel, usize)> = tally.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    println!("\n🗳️  Etiquetas por frecuencia:");
    for (label, count) in &counts {
        println!("  {:<12} {:>5}", label.to_string(), count);
    }

    if opts.dump_norms {
        let snapshot = session.window().snapshot();
        let features = FeatureSet::from_window(&snapshot)?;
        println!("\n📊 Normas de la última ventana (acc / gyro):");
        for (idx, (a, g)) in features.acc_norm.iter().zip(&features.gyro_norm).enumerate() {
            println!("  {idx:03}: {a:>12.3} {g:>14.3}");
        }
        println!(
            "\n  acc_std = {:.3}, gyro_std = {:.3}",
            features.acc_std, features.gyro_std
        );
    }

    Ok(())
}
