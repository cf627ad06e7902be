//! Pairwise layer filtering for the broad phase.

/// Symmetric 32x32 allow matrix over body layers.
///
/// Row `a` keeps one bit per counterpart layer. Every pairing starts allowed;
/// layer indices are masked into `0..32`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerMatrix {
    rows: [u32; 32],
}

impl Default for LayerMatrix {
    fn default() -> Self {
        Self {
            rows: [u32::MAX; 32],
        }
    }
}

impl LayerMatrix {
    /// Enable or disable collisions between two layers, in both directions.
    pub fn set_allowed(&mut self, a: u8, b: u8, allowed: bool) {
        let (a, b) = (a as usize & 31, b as usize & 31);
        if allowed {
            self.rows[a] |= 1 << b;
            self.rows[b] |= 1 << a;
        } else {
            self.rows[a] &= !(1 << b);
            self.rows[b] &= !(1 << a);
        }
    }

    /// True when bodies on the two layers may collide.
    pub fn allowed(&self, a: u8, b: u8) -> bool {
        self.rows[a as usize & 31] & (1 << (b as usize & 31)) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pairing_is_allowed_by_default() {
        let matrix = LayerMatrix::default();
        assert!(matrix.allowed(0, 0));
        assert!(matrix.allowed(3, 17));
        assert!(matrix.allowed(31, 31));
    }

    #[test]
    fn test_denying_a_pairing_is_symmetric() {
        let mut matrix = LayerMatrix::default();
        matrix.set_allowed(2, 5, false);

        assert!(!matrix.allowed(2, 5));
        assert!(!matrix.allowed(5, 2));
        assert!(matrix.allowed(2, 2));
        assert!(matrix.allowed(5, 6));
    }

    #[test]
    fn test_a_denied_pairing_can_be_reallowed() {
        let mut matrix = LayerMatrix::default();
        matrix.set_allowed(1, 1, false);
        assert!(!matrix.allowed(1, 1));

        matrix.set_allowed(1, 1, true);
        assert!(matrix.allowed(1, 1));
    }
}
