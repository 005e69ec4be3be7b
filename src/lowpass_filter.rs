use std::f64::consts::PI;

use thiserror::Error;

/// Errores de la etapa de filtrado.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// La serie no alcanza la longitud mínima que exige la extensión de
    /// bordes del filtrado de fase cero. El llamador debe sustituir la
    /// clasificación por la etiqueta por defecto en lugar de filtrar una
    /// ventana parcial.
    #[error("Serie demasiado corta para filtrar: {len} muestras, se requieren más de {min}")]
    SeriesTooShort { len: usize, min: usize },

    #[error("Orden de filtro no soportado: {order} (debe ser par y mayor que cero)")]
    UnsupportedOrder { order: usize },
}

/// Sección pasa-bajas de segundo orden diseñada por transformada bilineal.
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    /// Diseña la sección para el factor de calidad `q` dado, con la
    /// frecuencia de corte prewarpeada. La ganancia en DC es exactamente 1.
    fn lowpass(cutoff_hz: f64, sample_rate_hz: f64, q: f64) -> Self {
        let wc = (PI * cutoff_hz / sample_rate_hz).tan();
        let wc2 = wc * wc;
        let k = 1.0 + wc / q + wc2;

        Self {
            b0: wc2 / k,
            b1: 2.0 * wc2 / k,
            b2: wc2 / k,
            a1: 2.0 * (wc2 - 1.0) / k,
            a2: (1.0 - wc / q + wc2) / k,
        }
    }

    /// Filtra en el lugar (forma directa II transpuesta) con condiciones
    /// iniciales de régimen permanente escaladas por la primera muestra:
    /// una serie constante atraviesa la sección sin alterarse.
    fn apply(&self, data: &mut [f64]) {
        let x0 = data.first().copied().unwrap_or(0.0);
        let mut z1 = (1.0 - self.b0) * x0;
        let mut z2 = (self.b2 - self.a2) * x0;

        for value in data.iter_mut() {
            let x = *value;
            let y = self.b0 * x + z1;
            z1 = self.b1 * x - self.a1 * y + z2;
            z2 = self.b2 * x - self.a2 * y;
            *value = y;
        }
    }
}

/// Longitud de la extensión de bordes para un filtro del orden dado;
/// la serie de entrada debe superar este valor. Equivale al clásico
/// `3 * max(len(a), len(b))` de la forma en función de transferencia.
pub fn min_series_len(order: usize) -> usize {
    3 * (order + 1)
}

/// Pasa-bajas Butterworth digital de fase cero.
///
/// Diseña una cascada de secciones de segundo orden con el corte normalizado
/// `cutoff_hz / (0.5 * sample_rate_hz)` y la aplica hacia adelante y hacia
/// atrás sobre una extensión impar de la serie, de modo que la salida no
/// tiene retardo de grupo y conserva exactamente la longitud de la entrada.
pub fn butter_lowpass_filtfilt(
    data: &[f32],
    cutoff_hz: f32,
    sample_rate_hz: f32,
    order: usize,
) -> Result<Vec<f32>, FilterError> {
    if order == 0 || order % 2 != 0 {
        return Err(FilterError::UnsupportedOrder { order });
    }

    let pad = min_series_len(order);
    let n = data.len();
    if n <= pad {
        return Err(FilterError::SeriesTooShort { len: n, min: pad });
    }

    // Q de cada par de polos Butterworth: 1 / (2·sin((2k+1)π / 2N))
    let sections: Vec<Biquad> = (0..order / 2)
        .map(|k| {
            let theta = PI * (2 * k + 1) as f64 / (2 * order) as f64;
            Biquad::lowpass(
                f64::from(cutoff_hz),
                f64::from(sample_rate_hz),
                1.0 / (2.0 * theta.sin()),
            )
        })
        .collect();

    // Extensión impar en ambos extremos: refleja la serie respecto a sus
    // valores extremos para absorber el transitorio de los bordes.
    let first = f64::from(data[0]);
    let last = f64::from(data[n - 1]);
    let mut extended = Vec::with_capacity(n + 2 * pad);
    for i in (1..=pad).rev() {
        extended.push(2.0 * first - f64::from(data[i]));
    }
    extended.extend(data.iter().map(|&v| f64::from(v)));
    for i in 1..=pad {
        extended.push(2.0 * last - f64::from(data[n - 1 - i]));
    }

    // Pasada hacia adelante y hacia atrás: fase cero
    for section in &sections {
        section.apply(&mut extended);
    }
    extended.reverse();
    for section in &sections {
        section.apply(&mut extended);
    }
    extended.reverse();

    Ok(extended[pad..pad + n].iter().map(|&v| v as f32).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUTOFF: f32 = 10.0;
    const FS: f32 = 52.0;

    #[test]
    fn test_output_length_matches_input() {
        let data: Vec<f32> = (0..52)
            .map(|i| (i as f32 * 0.3).sin() * 100.0 + 500.0)
            .collect();
        let out = butter_lowpass_filtfilt(&data, CUTOFF, FS, 4).unwrap();
        assert_eq!(out.len(), data.len());
    }

    #[test]
    fn test_constant_series_is_preserved() {
        // DC intacta: ganancia unitaria y fase cero, sin retardo
        let data = vec![1234.5f32; 52];
        let out = butter_lowpass_filtfilt(&data, CUTOFF, FS, 4).unwrap();
        for (y, x) in out.iter().zip(&data) {
            assert!((y - x).abs() < 1e-2, "DC alterada: {y} vs {x}");
        }
    }

    #[test]
    fn test_nyquist_oscillation_is_attenuated() {
        // Oscilación a 26 Hz (Nyquist), muy por encima del corte de 10 Hz
        let data: Vec<f32> = (0..52)
            .map(|i| 1000.0 + if i % 2 == 0 { 500.0 } else { -500.0 })
            .collect();
        let out = butter_lowpass_filtfilt(&data, CUTOFF, FS, 4).unwrap();
        // El tramo central: los extremos cargan el transitorio de la extensión
        for y in &out[13..39] {
            assert!((y - 1000.0).abs() < 100.0, "residuo excesivo: {y}");
        }
    }

    #[test]
    fn test_series_too_short_is_rejected() {
        let data = vec![1.0f32; min_series_len(4)];
        let err = butter_lowpass_filtfilt(&data, CUTOFF, FS, 4).unwrap_err();
        assert_eq!(err, FilterError::SeriesTooShort { len: 15, min: 15 });
    }

    #[test]
    fn test_odd_order_is_rejected() {
        let data = vec![1.0f32; 52];
        assert_eq!(
            butter_lowpass_filtfilt(&data, CUTOFF, FS, 3).unwrap_err(),
            FilterError::UnsupportedOrder { order: 3 }
        );
    }

    #[test]
    fn test_min_series_len() {
        assert_eq!(min_series_len(4), 15);
        assert_eq!(min_series_len(2), 9);
    }
}
