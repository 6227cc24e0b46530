use super::error::RemapError;
use super::nature::Nature;

/// Cell values of one mesh, row-major `n_cells x n_components`, tagged with
/// the policy used to transfer them.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub nature: Nature,
    pub n_components: usize,
    pub values: Vec<f64>,
}

impl Field {
    pub fn new(nature: Nature, n_components: usize, values: Vec<f64>) -> Result<Self, RemapError> {
        if n_components == 0 || values.len() % n_components != 0 {
            return Err(RemapError::InvalidField {
                reason: format!(
                    "{} values do not split into tuples of {n_components} components",
                    values.len()
                ),
            });
        }
        Ok(Self {
            nature,
            n_components,
            values,
        })
    }

    /// Single-component field.
    pub fn scalar(nature: Nature, values: Vec<f64>) -> Self {
        Self {
            nature,
            n_components: 1,
            values,
        }
    }

    #[inline]
    pub fn n_tuples(&self) -> usize {
        self.values.len() / self.n_components
    }
}
