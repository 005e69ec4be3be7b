use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use csv::ReaderBuilder;

use crate::sample_parser::{parse_record, ParseError};
use crate::types::Sample;

/// Carga las muestras de una grabación en el formato del logger del
/// dispositivo: líneas de comentario con `#`, un encabezado opcional y
/// filas `time,acc_x,acc_y,acc_z,gyro_x,gyro_y,gyro_z`.
pub fn load_samples_from_csv(path: impl AsRef<Path>) -> Result<Vec<Sample>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("No se pudo abrir el CSV {path:?}"))?;

    let mut samples = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record =
            result.with_context(|| format!("Fila {} ilegible en {path:?}", row_idx + 1))?;
        let line = record.iter().collect::<Vec<_>>().join(",");

        match parse_record(&line) {
            Ok(sample) => samples.push(sample),
            // La primera fila puede ser el encabezado con los nombres de columna
            Err(ParseError::NonNumericField { .. }) if row_idx == 0 => continue,
            Err(e) => bail!("Fila {} de {path:?}: {e}", row_idx + 1),
        }
    }

    ensure!(!samples.is_empty(), "El CSV {path:?} no contiene muestras");
    Ok(samples)
}
