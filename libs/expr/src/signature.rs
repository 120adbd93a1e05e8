use anyhow::Result;
use winq_array::DataType;

/// The argument types a function accepts.
#[derive(Debug, Clone)]
pub enum Signature {
    /// `n` arguments that all have one of the listed types.
    Uniform(usize, &'static [DataType]),
    /// `n` arguments of any type.
    Any(usize),
    OneOf(&'static [Signature]),
}

impl Signature {
    fn valid_types(&self, current_types: &[DataType]) -> Result<Vec<Vec<DataType>>> {
        let valid_types = match self {
            Signature::Uniform(number, valid_types) => valid_types
                .iter()
                .map(|valid_type| vec![*valid_type; *number])
                .collect(),
            Signature::Any(number) => {
                anyhow::ensure!(
                    current_types.len() == *number,
                    "invalid arguments number expect: {} actual: {}",
                    number,
                    current_types.len()
                );
                vec![current_types.to_vec()]
            }
            Signature::OneOf(signatures) => {
                let mut valid_types = Vec::new();
                for signature in *signatures {
                    valid_types.extend(signature.valid_types(current_types)?);
                }
                valid_types
            }
        };
        Ok(valid_types)
    }

    fn coerce_to(valid_types: &[DataType], current_types: &[DataType]) -> Option<Vec<DataType>> {
        if valid_types.len() != current_types.len() {
            return None;
        }

        valid_types
            .iter()
            .zip(current_types)
            .map(|(valid_type, current_type)| match (valid_type, current_type) {
                // a timestamp keeps its timezone
                (DataType::Timestamp(_), DataType::Timestamp(_)) => Some(*current_type),
                _ if current_type.can_cast_to(*valid_type) => Some(*valid_type),
                _ => None,
            })
            .collect()
    }

    /// Returns the argument types the function is called with for arguments of `current_types`.
    ///
    /// Types that match a valid combination exactly are kept, otherwise the
    /// first combination every argument can be cast to without loss wins.
    pub fn data_types(&self, current_types: &[DataType]) -> Result<Vec<DataType>> {
        anyhow::ensure!(!current_types.is_empty(), "requires at least one argument.");

        let valid_types = self.valid_types(current_types)?;
        if valid_types.iter().any(|types| types == current_types) {
            return Ok(current_types.to_vec());
        }

        valid_types
            .iter()
            .find_map(|types| Self::coerce_to(types, current_types))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "can't coerce arguments of types [{}]",
                    current_types
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMERIC: Signature = Signature::OneOf(&[
        Signature::Uniform(1, &[DataType::Int64]),
        Signature::Uniform(1, &[DataType::Float64]),
    ]);

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(
            NUMERIC.data_types(&[DataType::Int32]).unwrap(),
            vec![DataType::Int64]
        );
        assert_eq!(
            NUMERIC.data_types(&[DataType::Float32]).unwrap(),
            vec![DataType::Float64]
        );
        assert_eq!(
            NUMERIC.data_types(&[DataType::Int64]).unwrap(),
            vec![DataType::Int64]
        );
        assert!(NUMERIC.data_types(&[DataType::String]).is_err());
        assert!(NUMERIC.data_types(&[]).is_err());
    }

    #[test]
    fn test_any() {
        let signature = Signature::Any(1);
        assert_eq!(
            signature.data_types(&[DataType::String]).unwrap(),
            vec![DataType::String]
        );
        assert!(signature
            .data_types(&[DataType::String, DataType::Int8])
            .is_err());
    }

    #[test]
    fn test_timestamp_keeps_timezone() {
        let signature = Signature::Uniform(1, &[DataType::Int64, DataType::Timestamp(None)]);
        let tz = DataType::Timestamp(Some(chrono_tz::Tz::Asia__Shanghai));
        assert_eq!(signature.data_types(&[tz]).unwrap(), vec![tz]);
        assert_eq!(
            signature.data_types(&[DataType::Timestamp(None)]).unwrap(),
            vec![DataType::Timestamp(None)]
        );
    }
}
