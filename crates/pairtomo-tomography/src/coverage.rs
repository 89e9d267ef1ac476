//! Verification that a set of settings measures every qubit pair in every
//! combination of bases.

use std::fmt;

use pairtomo_ir::{Circuit, ClassicalRegister, InstructionKind, QubitId, StandardGate};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::basis::MeasurementBasis;
use crate::coloring::MeasurementSetting;
use crate::error::{TomographyError, TomographyResult};
use crate::generator::TomographyVariant;

/// Most positions a [`CoverageReport`] tallies. The report keeps one row per
/// pair of positions, so memory grows quadratically.
pub const MAX_COVERAGE_POSITIONS: usize = 1024;

/// An ordered basis pair that no setting realizes on a pair of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MissingPair {
    /// Lower position.
    pub first: usize,
    /// Higher position.
    pub second: usize,
    /// Basis expected on `first`.
    pub first_basis: MeasurementBasis,
    /// Basis expected on `second`.
    pub second_basis: MeasurementBasis,
}

impl fmt::Display for MissingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "positions ({}, {}) never measured as ({}, {})",
            self.first, self.second, self.first_basis, self.second_basis
        )
    }
}

/// How often each ordered basis pair appears on each pair of positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    positions: usize,
    settings: usize,
    // Row per pair p < q in lexicographic order; column 3 * first + second.
    counts: Vec<[usize; 9]>,
}

fn basis_index(basis: MeasurementBasis) -> usize {
    match basis {
        MeasurementBasis::X => 0,
        MeasurementBasis::Y => 1,
        MeasurementBasis::Z => 2,
    }
}

impl CoverageReport {
    /// Tally basis assignments over `positions` positions. Entries beyond
    /// `positions` in an assignment are ignored.
    ///
    /// Fails with [`TomographyError::TooManyQubits`] above
    /// [`MAX_COVERAGE_POSITIONS`].
    pub fn from_assignments<'a, I>(positions: usize, assignments: I) -> TomographyResult<Self>
    where
        I: IntoIterator<Item = &'a [MeasurementBasis]>,
    {
        if positions > MAX_COVERAGE_POSITIONS {
            return Err(TomographyError::TooManyQubits {
                count: positions,
                max: MAX_COVERAGE_POSITIONS,
            });
        }
        let num_pairs = positions * positions.saturating_sub(1) / 2;
        let mut counts = vec![[0usize; 9]; num_pairs];
        let mut settings = 0;

        for bases in assignments {
            settings += 1;
            let bases = &bases[..bases.len().min(positions)];
            let mut row = 0;
            for p in 0..positions {
                for q in (p + 1)..positions {
                    if let (Some(&a), Some(&b)) = (bases.get(p), bases.get(q)) {
                        counts[row][3 * basis_index(a) + basis_index(b)] += 1;
                    }
                    row += 1;
                }
            }
        }

        Ok(Self {
            positions,
            settings,
            counts,
        })
    }

    /// Tally measurement settings.
    pub fn from_settings(
        positions: usize,
        settings: &[MeasurementSetting],
    ) -> TomographyResult<Self> {
        Self::from_assignments(positions, settings.iter().map(MeasurementSetting::bases))
    }

    /// Number of positions considered.
    pub fn positions(&self) -> usize {
        self.positions
    }

    /// Number of settings tallied.
    pub fn num_settings(&self) -> usize {
        self.settings
    }

    /// Whether every pair sees every ordered basis combination.
    pub fn is_complete(&self) -> bool {
        self.counts.iter().all(|row| row.iter().all(|&c| c > 0))
    }

    /// Smallest number of settings realizing any (pair, basis pair). `None`
    /// when there are fewer than two positions.
    pub fn min_multiplicity(&self) -> Option<usize> {
        self.counts.iter().flat_map(|row| row.iter().copied()).min()
    }

    /// Number of settings measuring positions `first < second` in the given
    /// bases.
    pub fn multiplicity(
        &self,
        first: usize,
        second: usize,
        first_basis: MeasurementBasis,
        second_basis: MeasurementBasis,
    ) -> Option<usize> {
        if first >= second || second >= self.positions {
            return None;
        }
        // Rows before `first` cover (positions - 1) + ... + (positions - first) pairs.
        let row = first * self.positions - first * (first + 1) / 2 + (second - first - 1);
        Some(self.counts[row][3 * basis_index(first_basis) + basis_index(second_basis)])
    }

    /// Every uncovered (pair, basis pair).
    pub fn missing(&self) -> Vec<MissingPair> {
        let mut missing = Vec::new();
        let mut row = 0;
        for first in 0..self.positions {
            for second in (first + 1)..self.positions {
                for first_basis in MeasurementBasis::ALL {
                    for second_basis in MeasurementBasis::ALL {
                        let idx = 3 * basis_index(first_basis) + basis_index(second_basis);
                        if self.counts[row][idx] == 0 {
                            missing.push(MissingPair {
                                first,
                                second,
                                first_basis,
                                second_basis,
                            });
                        }
                    }
                }
                row += 1;
            }
        }
        missing
    }
}

/// Reconstruct the basis measured into each bit of `register`.
///
/// Only instructions after the first `preparation_ops` are inspected; the
/// single-qubit gates applied to a qubit since its previous measurement
/// identify the basis of its next one.
pub fn applied_bases(
    circuit: &Circuit,
    preparation_ops: usize,
    register: &ClassicalRegister,
) -> TomographyResult<Vec<MeasurementBasis>> {
    let mut pending: FxHashMap<QubitId, Vec<StandardGate>> = FxHashMap::default();
    let mut bases: Vec<Option<MeasurementBasis>> = vec![None; register.len()];

    for inst in circuit.instructions().iter().skip(preparation_ops) {
        match &inst.kind {
            InstructionKind::Gate(gate) => {
                for &qubit in &inst.qubits {
                    pending.entry(qubit).or_default().push(gate.clone());
                }
            }
            InstructionKind::Measure => {
                for (&qubit, &clbit) in inst.qubits.iter().zip(&inst.clbits) {
                    let gates = pending.remove(&qubit).unwrap_or_default();
                    let Some(position) = register.position(clbit) else {
                        continue;
                    };
                    let basis = MeasurementBasis::from_rotation(&gates).ok_or_else(|| {
                        TomographyError::UnrecognizedMeasurement {
                            clbit,
                            gates: gates.iter().map(|g| g.name().to_string()).collect(),
                        }
                    })?;
                    bases[position] = Some(basis);
                }
            }
            InstructionKind::Reset | InstructionKind::Barrier => {}
        }
    }

    bases
        .into_iter()
        .zip(register.iter())
        .map(|(basis, clbit)| basis.ok_or(TomographyError::UnmeasuredBit(clbit)))
        .collect()
}

/// Check the bases actually applied by `variants` for pairwise coverage.
pub fn verify_pairwise_coverage(variants: &[TomographyVariant]) -> TomographyResult<CoverageReport> {
    let applied = variants
        .iter()
        .map(TomographyVariant::applied_bases)
        .collect::<TomographyResult<Vec<_>>>()?;
    let positions = applied.first().map_or(0, Vec::len);
    CoverageReport::from_assignments(positions, applied.iter().map(Vec::as_slice))
}
