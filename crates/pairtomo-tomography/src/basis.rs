//! Pauli measurement bases and the rotations that realize them.

use std::fmt;
use std::str::FromStr;

use pairtomo_ir::{Circuit, ClbitId, IrResult, QubitId, StandardGate};
use serde::{Deserialize, Serialize};

use crate::error::TomographyError;

/// A single-qubit Pauli measurement basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MeasurementBasis {
    /// Measure in the X basis.
    X,
    /// Measure in the Y basis.
    Y,
    /// Measure in the Z (computational) basis.
    Z,
}

impl MeasurementBasis {
    /// All bases, in canonical order.
    pub const ALL: [MeasurementBasis; 3] = [
        MeasurementBasis::X,
        MeasurementBasis::Y,
        MeasurementBasis::Z,
    ];

    /// Single-character label of the basis.
    pub fn symbol(self) -> char {
        match self {
            MeasurementBasis::X => 'X',
            MeasurementBasis::Y => 'Y',
            MeasurementBasis::Z => 'Z',
        }
    }

    /// Gates applied before the measurement, in application order.
    ///
    /// Y is S-dagger followed by Hadamard; the order is significant.
    pub fn rotation_gates(self) -> &'static [StandardGate] {
        match self {
            MeasurementBasis::X => &[StandardGate::H],
            MeasurementBasis::Y => &[StandardGate::Sdg, StandardGate::H],
            MeasurementBasis::Z => &[],
        }
    }

    /// Rotate `qubit` into this basis and measure it into `clbit`.
    pub fn apply(self, circuit: &mut Circuit, qubit: QubitId, clbit: ClbitId) -> IrResult<()> {
        if self == MeasurementBasis::Y {
            circuit.sdg(qubit)?;
        }
        if self != MeasurementBasis::Z {
            circuit.h(qubit)?;
        }
        circuit.measure(qubit, clbit)?;
        Ok(())
    }

    /// Identify the basis whose rotation sequence is exactly `gates`.
    pub fn from_rotation(gates: &[StandardGate]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|basis| basis.rotation_gates() == gates)
    }
}

impl fmt::Display for MeasurementBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<char> for MeasurementBasis {
    type Error = TomographyError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'X' | 'x' => Ok(MeasurementBasis::X),
            'Y' | 'y' => Ok(MeasurementBasis::Y),
            'Z' | 'z' => Ok(MeasurementBasis::Z),
            other => Err(TomographyError::InvalidLabel(format!(
                "unknown basis '{other}'"
            ))),
        }
    }
}

impl FromStr for MeasurementBasis {
    type Err = TomographyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => MeasurementBasis::try_from(c),
            _ => Err(TomographyError::InvalidLabel(format!(
                "basis must be one character, got '{s}'"
            ))),
        }
    }
}

/// An ordering of the three bases, indexed by a ternary digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BasisSequence([MeasurementBasis; 3]);

impl BasisSequence {
    /// Build a sequence; `None` unless the three bases are distinct.
    pub fn new(bases: [MeasurementBasis; 3]) -> Option<Self> {
        let [a, b, c] = bases;
        (a != b && b != c && a != c).then_some(Self(bases))
    }

    /// The six permutations of X, Y, Z.
    ///
    /// The first basis is chosen in canonical order, then the second among
    /// the remaining two, again in canonical order: XYZ, XZY, YXZ, YZX, ZXY,
    /// ZYX.
    pub fn all() -> [BasisSequence; 6] {
        let mut sequences = [BasisSequence(MeasurementBasis::ALL); 6];
        let mut slot = 0;
        for first in 0..3 {
            let mut rest: Vec<MeasurementBasis> = MeasurementBasis::ALL.to_vec();
            let head = rest.remove(first);
            for second in 0..2 {
                let mut tail = rest.clone();
                let middle = tail.remove(second);
                sequences[slot] = BasisSequence([head, middle, tail[0]]);
                slot += 1;
            }
        }
        sequences
    }

    /// Basis selected by ternary digit `digit`.
    ///
    /// # Panics
    ///
    /// Panics if `digit >= 3`.
    pub fn get(&self, digit: usize) -> MeasurementBasis {
        self.0[digit]
    }

    /// The bases in sequence order.
    pub fn bases(&self) -> [MeasurementBasis; 3] {
        self.0
    }
}

impl fmt::Display for BasisSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for basis in self.0 {
            write!(f, "{basis}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairtomo_ir::InstructionKind;

    #[test]
    fn test_rotation_recipes() {
        let mut circuit = Circuit::with_size("test", 3, 3);
        MeasurementBasis::X
            .apply(&mut circuit, QubitId(0), ClbitId(0))
            .unwrap();
        MeasurementBasis::Y
            .apply(&mut circuit, QubitId(1), ClbitId(1))
            .unwrap();
        MeasurementBasis::Z
            .apply(&mut circuit, QubitId(2), ClbitId(2))
            .unwrap();

        let names: Vec<_> = circuit.instructions().iter().map(|i| i.name()).collect();
        assert_eq!(
            names,
            vec!["h", "measure", "sdg", "h", "measure", "measure"]
        );

        let last = circuit.instructions().last().unwrap();
        assert_eq!(last.kind, InstructionKind::Measure);
        assert_eq!(last.qubits, vec![QubitId(2)]);
        assert_eq!(last.clbits, vec![ClbitId(2)]);
    }

    #[test]
    fn test_from_rotation_inverts_recipe() {
        for basis in MeasurementBasis::ALL {
            assert_eq!(
                MeasurementBasis::from_rotation(basis.rotation_gates()),
                Some(basis)
            );
        }
        assert_eq!(
            MeasurementBasis::from_rotation(&[StandardGate::H, StandardGate::Sdg]),
            None
        );
    }

    #[test]
    fn test_parse_basis() {
        assert_eq!("Y".parse::<MeasurementBasis>().unwrap(), MeasurementBasis::Y);
        assert_eq!(MeasurementBasis::try_from('z').unwrap(), MeasurementBasis::Z);
        assert!("W".parse::<MeasurementBasis>().is_err());
        assert!("XY".parse::<MeasurementBasis>().is_err());
    }

    #[test]
    fn test_all_sequences_order() {
        let rendered: Vec<String> = BasisSequence::all().iter().map(|s| s.to_string()).collect();
        assert_eq!(rendered, vec!["XYZ", "XZY", "YXZ", "YZX", "ZXY", "ZYX"]);
    }

    #[test]
    fn test_sequence_requires_distinct_bases() {
        use MeasurementBasis::{X, Y, Z};
        assert!(BasisSequence::new([X, Y, Z]).is_some());
        assert!(BasisSequence::new([X, X, Z]).is_none());
    }
}
