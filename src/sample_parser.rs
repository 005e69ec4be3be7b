use thiserror::Error;

use crate::types::{Sample, NUM_CHANNELS};

/// Errores al interpretar un registro de texto del transporte.
///
/// Un registro rechazado se descarta sin tocar la ventana; el error nunca
/// debe propagarse hasta la capa de transporte como pánico.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Registro mal formado: se esperaban {expected} campos, llegaron {found}")]
    MalformedRecord { expected: usize, found: usize },

    #[error("Campo no numérico en la posición {index}: {value:?}")]
    NonNumericField { index: usize, value: String },
}

/// Interpreta una línea ASCII `time,ax,ay,az,gx,gy,gz` como `Sample`.
pub fn parse_record(line: &str) -> Result<Sample, ParseError> {
    let fields: Vec<&str> = line.trim().split(',').collect();

    if fields.len() != NUM_CHANNELS {
        return Err(ParseError::MalformedRecord {
            expected: NUM_CHANNELS,
            found: fields.len(),
        });
    }

    let mut values = [0.0f32; NUM_CHANNELS];
    for (index, field) in fields.iter().enumerate() {
        let field = field.trim();
        values[index] = field.parse().map_err(|_| ParseError::NonNumericField {
            index,
            value: field.to_string(),
        })?;
    }

    Ok(Sample::new(
        values[0],
        [values[1], values[2], values[3]],
        [values[4], values[5], values[6]],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_record() {
        let sample = parse_record("123456.0,10.0,-20.5,980.0,1.0,2.0,3.0").unwrap();
        assert_eq!(sample.time, 123456.0);
        assert_eq!(sample.acc, [10.0, -20.5, 980.0]);
        assert_eq!(sample.gyro, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_record_with_spaces_and_newline() {
        let sample = parse_record(" 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0\n").unwrap();
        assert_eq!(sample.acc, [2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_wrong_field_count() {
        let err = parse_record("1.0,2.0,3.0").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedRecord {
                expected: 7,
                found: 3
            }
        );
    }

    #[test]
    fn test_non_numeric_field() {
        let err = parse_record("1.0,2.0,abc,4.0,5.0,6.0,7.0").unwrap_err();
        match err {
            ParseError::NonNumericField { index, value } => {
                assert_eq!(index, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("error inesperado: {other:?}"),
        }
    }

    #[test]
    fn test_empty_line_is_malformed() {
        assert!(matches!(
            parse_record(""),
            Err(ParseError::MalformedRecord { found: 1, .. })
        ));
    }
}
