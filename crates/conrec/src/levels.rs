use crate::error::ContourError;

/// A validated, non-empty sequence of finite, strictly increasing iso-values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSet<'a>(&'a [f64]);

impl<'a> LevelSet<'a> {
    /// Validates the levels.
    pub fn new(levels: &'a [f64]) -> Result<Self, ContourError> {
        if levels.is_empty() {
            return Err(ContourError::EmptyLevels);
        }
        if let Some(index) = levels.iter().position(|level| !level.is_finite()) {
            return Err(ContourError::NonFiniteLevel { index });
        }
        if let Some(i) = levels.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(ContourError::LevelsNotIncreasing { index: i + 1 });
        }
        Ok(Self(levels))
    }

    /// Number of levels. Never zero.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`, a level set holds at least one level.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the levels in increasing order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = f64> + 'a {
        self.0.iter().copied()
    }

    /// The levels as a slice.
    #[inline]
    pub fn as_slice(&self) -> &'a [f64] {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_increasing_levels() {
        let levels = LevelSet::new(&[-1.0, 0.0, 2.5]).unwrap();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels.iter().collect::<Vec<_>>(), vec![-1.0, 0.0, 2.5]);
    }

    #[test]
    fn rejects_empty_levels() {
        assert_eq!(LevelSet::new(&[]).unwrap_err(), ContourError::EmptyLevels);
    }

    #[test]
    fn rejects_unsorted_levels() {
        assert_eq!(
            LevelSet::new(&[0.5, 0.3]).unwrap_err(),
            ContourError::LevelsNotIncreasing { index: 1 }
        );
        assert_eq!(
            LevelSet::new(&[0.1, 0.5, 0.5]).unwrap_err(),
            ContourError::LevelsNotIncreasing { index: 2 }
        );
    }

    #[test]
    fn rejects_nan_level() {
        assert_eq!(
            LevelSet::new(&[0.1, f64::NAN]).unwrap_err(),
            ContourError::NonFiniteLevel { index: 1 }
        );
    }
}
