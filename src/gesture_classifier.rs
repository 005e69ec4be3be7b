use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::feature_extractor::{calculate_norm, mean, FeatureError, FeatureSet};
use crate::lowpass_filter::{butter_lowpass_filtfilt, FilterError};
use crate::peak_counter::count_peaks;
use crate::types::{GestureLabel, SAMPLING_RATE};
use crate::window_buffer::{WindowBuffer, WindowSnapshot};

// Umbrales del árbol de medias (firmware antiguo en g y dps)
const MEAN_TREE_ACC_LOW: f32 = 1.0459;
const MEAN_TREE_ACC_HIGH: f32 = 1.0558;
const MEAN_TREE_GYRO_SPLIT: f32 = 1.626_95;
const MEAN_TREE_GYRO_RANGE: f32 = 13.0;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Error de características: {0}")]
    Feature(#[from] FeatureError),

    #[error("Error de filtrado: {0}")]
    Filter(#[from] FilterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Árbol de decisión a aplicar sobre la ventana.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Árbol canónico: desviaciones de las normas + picos filtrados
    PeakTree,
    /// Árbol simple sobre medias de las normas
    MeanTree,
}

/// Parámetros de clasificación.
///
/// Los umbrales están en las unidades crudas del sensor (mg / mdps); son
/// específicos del dispositivo, no cotas físicas universales.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub strategy: Strategy,
    /// Umbral de baja energía sobre la desviación de la norma del acelerómetro (default: 100 mg)
    pub acc_std_threshold: f32,
    /// Umbral de reposo sobre la desviación de la norma del giroscopio (default: 1000 mdps)
    pub gyro_std_threshold: f32,
    /// Corte del pasa-bajas (default: 10 Hz)
    pub filter_cutoff_hz: f32,
    /// Orden del pasa-bajas, par (default: 4)
    pub filter_order: usize,
    /// Frecuencia de muestreo asumida (default: 52 Hz)
    pub sample_rate_hz: f32,
    /// Umbral de pico sobre la norma filtrada del acelerómetro (default: 3e3 mg)
    pub acc_peak_threshold: f32,
    /// Umbral de pico sobre la norma filtrada del giroscopio (default: 1.5e6 mdps)
    pub gyro_peak_threshold: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::PeakTree,
            acc_std_threshold: 100.0,
            gyro_std_threshold: 1000.0,
            filter_cutoff_hz: 10.0,
            filter_order: 4,
            sample_rate_hz: SAMPLING_RATE,
            acc_peak_threshold: 3e3,
            gyro_peak_threshold: 1.5e6,
        }
    }
}

impl ClassifierConfig {
    /// Carga la configuración desde un archivo JSON; los campos ausentes
    /// conservan su valor por defecto.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Clasificador de gestos por árbol de decisión.
///
/// No guarda estado entre llamadas: cada clasificación es función pura del
/// contenido actual de la ventana (no es incremental).
pub struct GestureClassifier {
    config: ClassifierConfig,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Clasifica el contenido actual de la ventana.
    ///
    /// Con menos de `WINDOW_LENGTH` muestras no hay datos suficientes y se
    /// devuelve la etiqueta neutra sin ejecutar ninguna etapa de filtrado.
    pub fn classify(&self, window: &WindowBuffer) -> Result<GestureLabel, ClassifierError> {
        if !window.is_full() {
            return Ok(GestureLabel::Stationary);
        }

        let snapshot = window.snapshot();
        match self.config.strategy {
            Strategy::PeakTree => self.classify_peak_tree(&snapshot),
            Strategy::MeanTree => self.classify_mean_tree(&snapshot),
        }
    }

    fn classify_peak_tree(&self, window: &WindowSnapshot) -> Result<GestureLabel, ClassifierError> {
        let features = FeatureSet::from_window(window)?;

        // Rama de baja energía
        if features.acc_std < self.config.acc_std_threshold {
            if features.gyro_std < self.config.gyro_std_threshold {
                return Ok(GestureLabel::Stationary);
            }
            return Ok(GestureLabel::Unknown);
        }

        // Movimiento detectado: suavizar las normas y contar picos
        let acc_filtered = butter_lowpass_filtfilt(
            &features.acc_norm,
            self.config.filter_cutoff_hz,
            self.config.sample_rate_hz,
            self.config.filter_order,
        )?;
        let gyro_filtered = butter_lowpass_filtfilt(
            &features.gyro_norm,
            self.config.filter_cutoff_hz,
            self.config.sample_rate_hz,
            self.config.filter_order,
        )?;

        let (acc_peaks, _) = count_peaks(&acc_filtered, self.config.acc_peak_threshold);
        // Los picos del giroscopio se calculan pero el árbol sólo decide
        // con los del acelerómetro.
        let (_gyro_peaks, _) = count_peaks(&gyro_filtered, self.config.gyro_peak_threshold);

        let label = match acc_peaks {
            0 => GestureLabel::Unknown,
            1 => {
                if features.acc_xz_mean < features.acc_y_mean_abs
                    && features.acc_range_x > features.acc_range_y
                {
                    GestureLabel::OneShake
                } else {
                    GestureLabel::Unknown
                }
            }
            _ => {
                if features.acc_xz_mean < features.acc_y_mean_abs
                    && features.acc_range_y > features.acc_range_x
                {
                    GestureLabel::TwoShake
                } else {
                    GestureLabel::Unknown
                }
            }
        };

        Ok(label)
    }

    fn classify_mean_tree(&self, window: &WindowSnapshot) -> Result<GestureLabel, ClassifierError> {
        let acc_norm = calculate_norm(&window.acc_x, &window.acc_y, &window.acc_z)?;
        let gyro_norm = calculate_norm(&window.gyro_x, &window.gyro_y, &window.gyro_z)?;

        let mean_acc = mean(&acc_norm);
        let mean_gyro = mean(&gyro_norm);

        // Rango pico a pico sobre los tres ejes del giroscopio combinados
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        for channel in [&window.gyro_x, &window.gyro_y, &window.gyro_z] {
            for &v in channel.iter() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        let gyro_range = hi - lo;

        let label = if mean_acc <= MEAN_TREE_ACC_HIGH {
            if mean_acc <= MEAN_TREE_ACC_LOW {
                if mean_gyro <= MEAN_TREE_GYRO_SPLIT {
                    GestureLabel::Other
                } else {
                    GestureLabel::DShake
                }
            } else {
                GestureLabel::Stationary
            }
        } else if gyro_range <= MEAN_TREE_GYRO_RANGE {
            GestureLabel::ChestTap
        } else {
            GestureLabel::DShake
        };

        Ok(label)
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}
