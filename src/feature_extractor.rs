use thiserror::Error;

use crate::window_buffer::WindowSnapshot;

/// Error de extracción de características.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    /// Los tres canales de entrada difieren en longitud. Con el avance en
    /// bloque de `WindowBuffer` esto no puede ocurrir en operación normal:
    /// señala un defecto en la gestión del buffer, no una condición a
    /// recuperar.
    #[error("Canales de longitud distinta: x={x}, y={y}, z={z}")]
    LengthMismatch { x: usize, y: usize, z: usize },
}

/// Norma euclidiana elemento a elemento de tres canales paralelos:
/// `norm[i] = sqrt(x[i]² + y[i]² + z[i]²)`.
pub fn calculate_norm(x: &[f32], y: &[f32], z: &[f32]) -> Result<Vec<f32>, FeatureError> {
    if x.len() != y.len() || y.len() != z.len() {
        return Err(FeatureError::LengthMismatch {
            x: x.len(),
            y: y.len(),
            z: z.len(),
        });
    }

    Ok(x.iter()
        .zip(y)
        .zip(z)
        .map(|((&xi, &yi), &zi)| (xi * xi + yi * yi + zi * zi).sqrt())
        .collect())
}

pub fn mean(data: &[f32]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f32>() / data.len() as f32
}

/// Desviación estándar poblacional (divide por N).
pub fn std(data: &[f32]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let mean = mean(data);
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / data.len() as f32;
    variance.sqrt()
}

/// Rango pico a pico (máximo − mínimo).
pub fn range(data: &[f32]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let min = data.iter().fold(f32::INFINITY, |a, &b| a.min(b));
    let max = data.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    max - min
}

/// Características derivadas de una ventana completa.
///
/// Efímeras: se recalculan en cada clasificación a partir de la ventana
/// vigente y no se persisten. Las series suavizadas y los conteos de picos
/// se derivan de aquí dentro del clasificador.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    /// Serie de normas del acelerómetro
    pub acc_norm: Vec<f32>,
    /// Serie de normas del giroscopio
    pub gyro_norm: Vec<f32>,
    pub acc_std: f32,
    pub gyro_std: f32,
    /// mean(acc_x) + mean(acc_z)
    pub acc_xz_mean: f32,
    /// |mean(acc_y)|
    pub acc_y_mean_abs: f32,
    /// Rango pico a pico del canal x del acelerómetro
    pub acc_range_x: f32,
    /// Rango pico a pico del canal y del acelerómetro
    pub acc_range_y: f32,
}

impl FeatureSet {
    pub fn from_window(window: &WindowSnapshot) -> Result<Self, FeatureError> {
        let acc_norm = calculate_norm(&window.acc_x, &window.acc_y, &window.acc_z)?;
        let gyro_norm = calculate_norm(&window.gyro_x, &window.gyro_y, &window.gyro_z)?;

        let acc_std = std(&acc_norm);
        let gyro_std = std(&gyro_norm);
        let acc_xz_mean = mean(&window.acc_x) + mean(&window.acc_z);
        let acc_y_mean_abs = mean(&window.acc_y).abs();
        let acc_range_x = range(&window.acc_x);
        let acc_range_y = range(&window.acc_y);

        Ok(Self {
            acc_norm,
            gyro_norm,
            acc_std,
            gyro_std,
            acc_xz_mean,
            acc_y_mean_abs,
            acc_range_x,
            acc_range_y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norm_is_non_negative() {
        let x = [3.0, -1.0, 0.5];
        let y = [-4.0, 2.0, -0.5];
        let z = [0.0, -2.0, 0.25];
        let norms = calculate_norm(&x, &y, &z).unwrap();
        assert!(norms.iter().all(|&n| n >= 0.0));
        assert!((norms[0] - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_norm_of_zero_triple_is_zero() {
        let zeros = [0.0f32; 52];
        let norms = calculate_norm(&zeros, &zeros, &zeros).unwrap();
        assert!(norms.iter().all(|&n| n == 0.0));
    }

    #[test]
    fn test_norm_rejects_length_mismatch() {
        let err = calculate_norm(&[1.0, 2.0], &[1.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, FeatureError::LengthMismatch { x: 2, y: 1, z: 2 });
    }

    #[test]
    fn test_population_std() {
        // Poblacional: std([2, 4, 4, 4, 5, 5, 7, 9]) = 2
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std(&data) - 2.0).abs() < 1e-6);
        assert_eq!(std(&[]), 0.0);
    }

    #[test]
    fn test_range() {
        assert_eq!(range(&[-3.0, 1.0, 7.0]), 10.0);
        assert_eq!(range(&[5.0; 10]), 0.0);
        assert_eq!(range(&[]), 0.0);
    }

    #[test]
    fn test_feature_set_from_constant_window() {
        let n = 52;
        let window = WindowSnapshot {
            time: (0..n).map(|i| i as f32).collect(),
            acc_x: vec![1.0; n],
            acc_y: vec![-2.0; n],
            acc_z: vec![2.0; n],
            gyro_x: vec![0.0; n],
            gyro_y: vec![0.0; n],
            gyro_z: vec![0.0; n],
        };

        let feats = FeatureSet::from_window(&window).unwrap();
        // norma constante 3 → desviación 0
        assert!((feats.acc_norm[0] - 3.0).abs() < 1e-6);
        assert_eq!(feats.acc_std, 0.0);
        assert_eq!(feats.gyro_std, 0.0);
        assert!((feats.acc_xz_mean - 3.0).abs() < 1e-6);
        assert!((feats.acc_y_mean_abs - 2.0).abs() < 1e-6);
        assert_eq!(feats.acc_range_x, 0.0);
        assert_eq!(feats.acc_range_y, 0.0);
    }
}
