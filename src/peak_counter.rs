/// Cuenta máximos locales por cambio de signo de la derivada discreta.
///
/// `d[i] = series[i+1] - series[i]`, con `d[0]` forzado a cero para no
/// producir una transición espuria en el primer elemento. Un pico es un
/// índice `i` con `d[i-1] > 0`, `d[i] < 0` y `series[i] > threshold`.
/// Devuelve el conteo y los valores (redondeados) en cada pico.
///
/// Función pura: sin estado oculto, el mismo resultado en cada llamada.
pub fn count_peaks(series: &[f32], threshold: f32) -> (usize, Vec<i32>) {
    if series.len() < 3 {
        return (0, Vec::new());
    }

    let mut derivative: Vec<f32> = series.windows(2).map(|w| w[1] - w[0]).collect();
    derivative[0] = 0.0;

    let mut peak_values = Vec::new();
    for i in 1..derivative.len() {
        if derivative[i - 1] > 0.0 && derivative[i] < 0.0 && series[i] > threshold {
            peak_values.push(series[i].round() as i32);
        }
    }

    (peak_values.len(), peak_values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_triangular_peak() {
        let series = [0.0, 2.0, 5.0, 2.0, 0.0];
        let (count, values) = count_peaks(&series, 1.0);
        assert_eq!(count, 1);
        assert_eq!(values, vec![5]);
    }

    #[test]
    fn test_peak_below_threshold_ignored() {
        let series = [0.0, 2.0, 5.0, 2.0, 0.0];
        let (count, values) = count_peaks(&series, 10.0);
        assert_eq!(count, 0);
        assert!(values.is_empty());
    }

    #[test]
    fn test_two_peaks() {
        let series = [0.0, 2.0, 4.0, 1.0, 6.0, 2.0, 0.0];
        // Máximos locales en los índices 2 y 4
        let (count, values) = count_peaks(&series, 0.5);
        assert_eq!(count, 2);
        assert_eq!(values, vec![4, 6]);
    }

    #[test]
    fn test_first_element_transition_suppressed() {
        // d[0] forzado a cero: el máximo del índice 1 no puede contarse
        let series = [0.0, 10.0, 2.0, 3.0, 1.0];
        let (count, values) = count_peaks(&series, 0.5);
        assert_eq!(count, 1);
        assert_eq!(values, vec![3]);
    }

    #[test]
    fn test_monotonic_series_has_no_peaks() {
        let rising: Vec<f32> = (0..20).map(|i| i as f32).collect();
        assert_eq!(count_peaks(&rising, 0.0).0, 0);

        let falling: Vec<f32> = (0..20).map(|i| (20 - i) as f32).collect();
        assert_eq!(count_peaks(&falling, 0.0).0, 0);
    }

    #[test]
    fn test_short_series_has_no_peaks() {
        assert_eq!(count_peaks(&[], 0.0), (0, Vec::new()));
        assert_eq!(count_peaks(&[1.0, 2.0], 0.0), (0, Vec::new()));
    }

    #[test]
    fn test_count_peaks_is_idempotent() {
        let series: Vec<f32> = (0..52).map(|i| (i as f32 * 0.7).sin() * 10.0).collect();
        let first = count_peaks(&series, 2.0);
        let second = count_peaks(&series, 2.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_values_are_rounded() {
        let series = [0.0, 1.0, 4.6, 1.0, 0.0];
        let (_, values) = count_peaks(&series, 1.0);
        assert_eq!(values, vec![5]);
    }
}
