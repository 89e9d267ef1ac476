//! Ternary coloring of qubit positions into measurement settings.
//!
//! Qubit positions are written in base 3. For each digit (layer) and each of
//! the six [`BasisSequence`]s, one setting measures every position in the
//! basis its digit selects from the sequence. Two distinct positions differ in
//! at least one digit, and at that layer the six permutations place every
//! ordered pair of distinct bases on them; the three uniform settings supply
//! the equal pairs. This covers every pair of positions with every basis
//! combination using `3 + 6 * ceil(log3 N)` settings instead of `3^N`.

use serde::{Deserialize, Serialize};

use crate::basis::{BasisSequence, MeasurementBasis};
use crate::label::format_label;

/// Number of ternary digits needed to distinguish `n` positions: the
/// smallest `k` with `3^k >= n`. Zero for `n <= 1`.
pub fn num_layers(n: usize) -> usize {
    let mut layers = 0;
    let mut span: usize = 1;
    while span < n {
        span = span.saturating_mul(3);
        layers += 1;
    }
    layers
}

/// Digit `layer` of `bit_index` in base 3.
pub fn ternary_digit(bit_index: usize, layer: usize) -> usize {
    let divisor = u32::try_from(layer)
        .ok()
        .and_then(|l| 3usize.checked_pow(l));
    match divisor {
        Some(d) => (bit_index / d) % 3,
        // 3^layer exceeds every index.
        None => 0,
    }
}

/// Number of variants generated for `n` measured qubits.
pub fn expected_variant_count(n: usize) -> usize {
    3 + 6 * num_layers(n)
}

/// Where a measurement setting comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SettingOrigin {
    /// Every qubit measured in the same basis.
    Uniform {
        /// The shared basis.
        basis: MeasurementBasis,
    },
    /// One layer of the ternary coloring.
    Coloring {
        /// Ternary digit used to pick each qubit's basis.
        layer: usize,
        /// Sequence the digit indexes into.
        sequence: BasisSequence,
    },
}

impl SettingOrigin {
    /// Basis this origin assigns to position `index`.
    pub fn basis_at(self, index: usize) -> MeasurementBasis {
        match self {
            SettingOrigin::Uniform { basis } => basis,
            SettingOrigin::Coloring { layer, sequence } => {
                sequence.get(ternary_digit(index, layer))
            }
        }
    }
}

/// The basis assigned to each measured position in one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementSetting {
    bases: Vec<MeasurementBasis>,
    origin: SettingOrigin,
}

impl MeasurementSetting {
    /// Every one of `n` positions measured in `basis`.
    pub fn uniform(n: usize, basis: MeasurementBasis) -> Self {
        Self {
            bases: vec![basis; n],
            origin: SettingOrigin::Uniform { basis },
        }
    }

    /// Position `i` measured in `sequence[ternary_digit(i, layer)]`.
    pub fn coloring(n: usize, layer: usize, sequence: BasisSequence) -> Self {
        Self::from_origin(n, SettingOrigin::Coloring { layer, sequence })
    }

    /// Expand `origin` over `n` positions.
    pub fn from_origin(n: usize, origin: SettingOrigin) -> Self {
        Self {
            bases: (0..n).map(|index| origin.basis_at(index)).collect(),
            origin,
        }
    }

    /// Bases in measured-qubit order.
    pub fn bases(&self) -> &[MeasurementBasis] {
        &self.bases
    }

    /// Basis of position `index`.
    pub fn basis(&self, index: usize) -> Option<MeasurementBasis> {
        self.bases.get(index).copied()
    }

    /// How this setting was derived.
    pub fn origin(&self) -> SettingOrigin {
        self.origin
    }

    /// Number of measured positions.
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Whether the setting covers no positions.
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Tuple label, e.g. `('X', 'Z')`.
    pub fn label(&self) -> String {
        format_label(&self.bases)
    }
}

/// Origins of the settings for `n` positions, in generation order: uniform
/// X, Y, Z, then the coloring settings by layer and by sequence.
pub fn setting_origins(n: usize) -> Vec<SettingOrigin> {
    let mut origins = Vec::with_capacity(expected_variant_count(n));
    origins.extend(
        MeasurementBasis::ALL
            .into_iter()
            .map(|basis| SettingOrigin::Uniform { basis }),
    );
    for layer in 0..num_layers(n) {
        for sequence in BasisSequence::all() {
            origins.push(SettingOrigin::Coloring { layer, sequence });
        }
    }
    origins
}

/// All measurement settings for `n` positions, in generation order.
pub fn measurement_settings(n: usize) -> Vec<MeasurementSetting> {
    setting_origins(n)
        .into_iter()
        .map(|origin| MeasurementSetting::from_origin(n, origin))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use MeasurementBasis::{X, Y, Z};

    #[test]
    fn test_num_layers() {
        let expected = [
            (0, 0),
            (1, 0),
            (2, 1),
            (3, 1),
            (4, 2),
            (9, 2),
            (10, 3),
            (27, 3),
            (28, 4),
            (81, 4),
            (82, 5),
        ];
        for (n, layers) in expected {
            assert_eq!(num_layers(n), layers, "n = {n}");
        }
    }

    #[test]
    fn test_num_layers_matches_exact_powers() {
        // 3^k positions need exactly k digits, with no float rounding drift.
        let mut power = 1usize;
        for k in 0..20 {
            assert_eq!(num_layers(power), k);
            assert_eq!(num_layers(power + 1), k + 1);
            power *= 3;
        }
    }

    #[test]
    fn test_ternary_digits_for_four_positions() {
        let layer0: Vec<_> = (0..4).map(|i| ternary_digit(i, 0)).collect();
        let layer1: Vec<_> = (0..4).map(|i| ternary_digit(i, 1)).collect();
        assert_eq!(layer0, vec![0, 1, 2, 0]);
        assert_eq!(layer1, vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_ternary_digit_matches_float_truncation() {
        // int(float(i) / float(3**l)) % 3 agrees with integer division.
        for layer in 0..8 {
            let divisor = 3f64.powi(layer as i32);
            for i in 0..5000usize {
                let truncated = ((i as f64) / divisor) as usize % 3;
                assert_eq!(ternary_digit(i, layer), truncated, "i = {i}, layer = {layer}");
            }
        }
    }

    #[test]
    fn test_origins_expand_lazily() {
        let origins = setting_origins(200_000);
        assert_eq!(origins.len(), expected_variant_count(200_000));
        assert_eq!(origins[0], SettingOrigin::Uniform { basis: X });

        // Matches the materialized setting without building it for every position.
        for (origin, setting) in setting_origins(30).into_iter().zip(measurement_settings(30)) {
            assert_eq!(setting.origin(), origin);
            for (index, &basis) in setting.bases().iter().enumerate() {
                assert_eq!(origin.basis_at(index), basis);
            }
        }
    }

    #[test]
    fn test_ternary_digit_huge_layer() {
        assert_eq!(ternary_digit(usize::MAX, 200), 0);
    }

    #[test]
    fn test_settings_for_two_positions() {
        let settings = measurement_settings(2);
        let labels: Vec<_> = settings.iter().map(MeasurementSetting::label).collect();
        assert_eq!(
            labels,
            vec![
                "('X', 'X')",
                "('Y', 'Y')",
                "('Z', 'Z')",
                "('X', 'Y')",
                "('X', 'Z')",
                "('Y', 'X')",
                "('Y', 'Z')",
                "('Z', 'X')",
                "('Z', 'Y')",
            ]
        );
    }

    #[test]
    fn test_settings_for_single_position() {
        let settings = measurement_settings(1);
        assert_eq!(settings.len(), 3);
        assert_eq!(settings[0].label(), "('X',)");
    }

    #[test]
    fn test_settings_for_four_positions() {
        let settings = measurement_settings(4);
        assert_eq!(settings.len(), 15);

        // Layer 1, sequence XZY: positions 0..2 read digit 0, position 3 digit 1.
        let setting = &settings[3 + 6 + 1];
        assert_eq!(
            setting.origin(),
            SettingOrigin::Coloring {
                layer: 1,
                sequence: BasisSequence::new([X, Z, Y]).unwrap(),
            }
        );
        assert_eq!(setting.bases(), &[X, X, X, Z]);
    }

    #[test]
    fn test_uniform_settings_first() {
        let settings = measurement_settings(7);
        for (setting, basis) in settings.iter().zip([X, Y, Z]) {
            assert!(setting.bases().iter().all(|&b| b == basis));
            assert_eq!(setting.origin(), SettingOrigin::Uniform { basis });
        }
    }

    #[test]
    fn test_expected_variant_count() {
        assert_eq!(expected_variant_count(1), 3);
        assert_eq!(expected_variant_count(2), 9);
        assert_eq!(expected_variant_count(4), 15);
        assert_eq!(expected_variant_count(10), 21);
        for n in 1..100 {
            assert_eq!(measurement_settings(n).len(), expected_variant_count(n));
        }
    }
}
