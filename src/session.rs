use thiserror::Error;

use crate::gesture_classifier::{ClassifierConfig, ClassifierError, GestureClassifier};
use crate::sample_parser::{parse_record, ParseError};
use crate::types::{GestureLabel, Sample};
use crate::window_buffer::WindowBuffer;

/// Errores de la llamada de ingestión por registro.
///
/// Distingue la entrada corrupta (registro descartado, ventana intacta) de
/// una invariante interna rota; "todavía no hay datos" no es un error y se
/// refleja como etiqueta por defecto.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Registro descartado: {0}")]
    Parse(#[from] ParseError),

    #[error("Fallo interno de clasificación: {0}")]
    Classifier(#[from] ClassifierError),
}

/// Interfaz mínima que los colaboradores (transporte, GUI) invocan por cada
/// muestra decodificada. `None` significa que no se produjo etiqueta.
pub trait SampleSink {
    fn on_sample(&mut self, sample: Sample) -> Option<GestureLabel>;
}

/// Sesión de clasificación de un flujo de dispositivo.
///
/// Posee su propia ventana y su clasificador; cada conexión construye una
/// sesión independiente, sin estado compartido entre sesiones. No es segura
/// ante llamadas concurrentes sobre la misma instancia: el transporte debe
/// serializar las entregas por flujo.
pub struct ClassificationSession {
    window: WindowBuffer,
    classifier: GestureClassifier,
}

impl ClassificationSession {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            window: WindowBuffer::new(),
            classifier: GestureClassifier::new(config),
        }
    }

    /// Incorpora una muestra ya estructurada y clasifica la ventana vigente.
    pub fn ingest(&mut self, sample: Sample) -> Result<GestureLabel, ClassifierError> {
        self.window.push(sample);
        self.classifier.classify(&self.window)
    }

    /// Incorpora un registro de texto crudo del transporte.
    ///
    /// Si el registro no se puede interpretar se descarta sin mutar la
    /// ventana y el error tipado queda en manos del llamador.
    pub fn ingest_record(&mut self, line: &str) -> Result<GestureLabel, IngestError> {
        let sample = parse_record(line)?;
        Ok(self.ingest(sample)?)
    }

    /// Vacía la ventana (reconexión del dispositivo).
    pub fn reset(&mut self) {
        self.window.clear();
    }

    pub fn window(&self) -> &WindowBuffer {
        &self.window
    }
}

impl Default for ClassificationSession {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl SampleSink for ClassificationSession {
    fn on_sample(&mut self, sample: Sample) -> Option<GestureLabel> {
        match self.ingest(sample) {
            Ok(label) => Some(label),
            Err(e) => {
                eprintln!("❌ Fallo interno de clasificación: {e}");
                None
            }
        }
    }
}
