/*
Clasificación de gestos IMU en tiempo real - Rust puro

Sistema que:
1. Recibe registros ASCII `time,acc_x,acc_y,acc_z,gyro_x,gyro_y,gyro_z` por stdin
   (un puente serie o BLE externo entrega una línea por muestra)
2. Mantiene una ventana deslizante de 52 muestras (~1 s a 52 Hz)
3. Clasifica cada ventana con un árbol de decisión sobre normas, desviaciones y
   picos de la serie filtrada

Para compilar y ejecutar:
    cargo run --release < registro.txt
    socat -u /dev/ttyUSB0,b115200 - | ./target/release/gestoscopio

Opciones:
    --config <archivo.json>  umbrales del clasificador
    --mean-tree              árbol simple sobre medias
*/

use std::env;
use std::io::{self, BufRead};
use std::thread;

use anyhow::{bail, Result};
use crossbeam_channel::bounded;

use gestoscopio::gesture_classifier::{ClassifierConfig, Strategy};
use gestoscopio::session::{ClassificationSession, IngestError};
use gestoscopio::types::GestureLabel;

fn parse_args() -> Result<ClassifierConfig> {
    let mut config = ClassifierConfig::default();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requiere una ruta"))?;
                config = ClassifierConfig::from_json_file(&path)?;
                println!("🔧 Configuración cargada de {path}");
            }
            "--mean-tree" => config.strategy = Strategy::MeanTree,
            other => bail!(
                "Argumento desconocido: {other}\nUso: gestoscopio [--config <json>] [--mean-tree]"
            ),
        }
    }

    Ok(config)
}

fn main() -> Result<()> {
    println!("🎯 Gestoscopio - Clasificación de gestos IMU\n");

    let config = parse_args()?;
    let mut session = ClassificationSession::new(config);

    // Hilo lector: stdin → canal. La sesión consume en este hilo, una
    // muestra a la vez; la serialización por flujo queda garantizada.
    let (tx, rx) = bounded::<String>(100);
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    eprintln!("❌ Error leyendo stdin: {e}");
                    break;
                }
            }
        }
    });

    println!("🎬 Escuchando registros por stdin...\n");

    let mut records = 0u64;
    let mut dropped = 0u64;
    let mut last_label: Option<GestureLabel> = None;

    while let Ok(line) = rx.recv() {
        records += 1;
        match session.ingest_record(&line) {
            Ok(label) => {
                if last_label != Some(label) {
                    println!("[GESTO] {label}");
                    last_label = Some(label);
                }
            }
            Err(IngestError::Parse(e)) => {
                dropped += 1;
                eprintln!("❌ Registro descartado: {e}");
            }
            Err(e) => {
                eprintln!("❌ Error interno: {e}");
            }
        }
    }

    println!("\n📊 Registros procesados: {records} (descartados: {dropped})");
    println!("👋 Fin del flujo");
    Ok(())
}
