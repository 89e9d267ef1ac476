//! Construction of the measurement circuit variants.

use pairtomo_ir::{Circuit, ClassicalRegister, QubitId};
use tracing::{debug, info};

use crate::basis::MeasurementBasis;
use crate::coloring::{MeasurementSetting, SettingOrigin, measurement_settings, num_layers};
use crate::coverage::applied_bases;
use crate::error::{TomographyError, TomographyResult};
use crate::label::parse_label;
use crate::selector::QubitSelector;

/// Default name of the classical register added to every variant.
pub const DEFAULT_REGISTER_NAME: &str = "meas";

/// One instrumented copy of the preparation circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct TomographyVariant {
    circuit: Circuit,
    setting: MeasurementSetting,
    register: String,
    measured: Vec<QubitId>,
    preparation_ops: usize,
}

impl TomographyVariant {
    /// The instrumented circuit; its name is the variant label.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Consume the variant, keeping only the circuit.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// The per-qubit basis assignment.
    pub fn setting(&self) -> &MeasurementSetting {
        &self.setting
    }

    /// Bases in measured-qubit order.
    pub fn bases(&self) -> &[MeasurementBasis] {
        self.setting.bases()
    }

    /// How the basis assignment was derived.
    pub fn origin(&self) -> SettingOrigin {
        self.setting.origin()
    }

    /// Tuple label, e.g. `('X', 'Z')`.
    pub fn label(&self) -> &str {
        self.circuit.name()
    }

    /// Bases as read back from the label.
    pub fn label_bases(&self) -> TomographyResult<Vec<MeasurementBasis>> {
        parse_label(self.label())
    }

    /// The classical register holding the measurement outcomes.
    pub fn register(&self) -> TomographyResult<&ClassicalRegister> {
        Ok(self.circuit.creg(&self.register)?)
    }

    /// Measured qubits; entry `i` is read out into bit `i` of the register.
    pub fn measured_qubits(&self) -> &[QubitId] {
        &self.measured
    }

    /// Number of leading instructions copied from the preparation circuit.
    pub fn preparation_ops(&self) -> usize {
        self.preparation_ops
    }

    /// Bases actually applied, reconstructed from the instructions that
    /// follow the preparation.
    pub fn applied_bases(&self) -> TomographyResult<Vec<MeasurementBasis>> {
        applied_bases(&self.circuit, self.preparation_ops, self.register()?)
    }
}

/// Generator of pairwise tomography circuits.
///
/// ```rust
/// use pairtomo_ir::Circuit;
/// use pairtomo_tomography::{PairwiseTomography, QubitSelector};
///
/// let base = Circuit::ghz(4).unwrap();
/// let variants = PairwiseTomography::new()
///     .with_register_name("tomo")
///     .generate(&base, &QubitSelector::All)
///     .unwrap();
///
/// assert_eq!(variants.len(), 15);
/// assert_eq!(variants[0].label(), "('X', 'X', 'X', 'X')");
/// ```
#[derive(Debug, Clone)]
pub struct PairwiseTomography {
    register_name: String,
}

impl Default for PairwiseTomography {
    fn default() -> Self {
        Self::new()
    }
}

impl PairwiseTomography {
    /// Create a generator with the default register name.
    pub fn new() -> Self {
        Self {
            register_name: DEFAULT_REGISTER_NAME.to_string(),
        }
    }

    /// Name the classical register added to each variant.
    #[must_use]
    pub fn with_register_name(mut self, name: impl Into<String>) -> Self {
        self.register_name = name.into();
        self
    }

    /// Name of the classical register added to each variant.
    pub fn register_name(&self) -> &str {
        &self.register_name
    }

    /// Build every variant for the qubits `selector` picks out of `base`.
    ///
    /// `base` is left untouched; each variant starts from its own clone. The
    /// first three variants are uniform X, Y, Z, followed by six per coloring
    /// layer. Any circuit error aborts the whole run.
    pub fn generate(
        &self,
        base: &Circuit,
        selector: &QubitSelector,
    ) -> TomographyResult<Vec<TomographyVariant>> {
        let measured = selector.resolve(base)?;
        let n = measured.len();
        debug!(
            circuit = base.name(),
            selector = %selector,
            qubits = ?measured,
            register = %self.register_name,
            "resolved measured qubits"
        );

        let variants = measurement_settings(n)
            .into_iter()
            .map(|setting| self.build_variant(base, &measured, setting))
            .collect::<TomographyResult<Vec<_>>>()?;

        info!(
            circuit = base.name(),
            qubits = n,
            layers = num_layers(n),
            variants = variants.len(),
            "generated pairwise tomography circuits"
        );
        Ok(variants)
    }

    fn build_variant(
        &self,
        base: &Circuit,
        measured: &[QubitId],
        setting: MeasurementSetting,
    ) -> TomographyResult<TomographyVariant> {
        let size = u32::try_from(measured.len()).map_err(|_| TomographyError::TooManyQubits {
            count: measured.len(),
            max: u32::MAX as usize,
        })?;
        let mut circuit = base.clone();
        let creg = circuit.add_creg(&self.register_name, size)?;

        for ((&qubit, &basis), clbit) in measured.iter().zip(setting.bases()).zip(creg.iter()) {
            basis.apply(&mut circuit, qubit, clbit)?;
        }
        circuit.set_name(setting.label());

        Ok(TomographyVariant {
            circuit,
            setting,
            register: self.register_name.clone(),
            measured: measured.to_vec(),
            preparation_ops: base.num_ops(),
        })
    }
}

/// Generate the pairwise tomography variants of `base` for the selected
/// qubits, using the default register name.
pub fn generate_pairwise_tomography_variants(
    base: &Circuit,
    measured_qubits: &QubitSelector,
) -> TomographyResult<Vec<TomographyVariant>> {
    PairwiseTomography::new().generate(base, measured_qubits)
}

/// Generate the variants and keep only the circuits.
pub fn pairwise_tomography_circuits(
    base: &Circuit,
    measured_qubits: &QubitSelector,
) -> TomographyResult<Vec<Circuit>> {
    Ok(generate_pairwise_tomography_variants(base, measured_qubits)?
        .into_iter()
        .map(TomographyVariant::into_circuit)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairtomo_ir::{ClbitId, IrError};

    #[test]
    fn test_bell_variants() {
        let base = Circuit::bell().unwrap();
        let variants = generate_pairwise_tomography_variants(&base, &QubitSelector::All).unwrap();

        assert_eq!(variants.len(), 9);
        let labels: Vec<_> = variants.iter().map(TomographyVariant::label).collect();
        assert_eq!(&labels[..3], &["('X', 'X')", "('Y', 'Y')", "('Z', 'Z')"]);

        for variant in &variants {
            let circuit = variant.circuit();
            assert_eq!(circuit.num_clbits(), 2);
            assert_eq!(circuit.cregs().len(), 1);
            assert_eq!(variant.register().unwrap().len(), 2);
            assert_eq!(circuit.measurements().count(), 2);
        }
    }

    #[test]
    fn test_variant_instructions_follow_recipe() {
        let base = Circuit::bell().unwrap();
        let variants = generate_pairwise_tomography_variants(&base, &QubitSelector::All).unwrap();

        // ('Y', 'Y'): the preparation, then sdg/h/measure per qubit.
        let y = variants[1].circuit();
        let names: Vec<_> = y.instructions().iter().map(|i| i.name()).collect();
        assert_eq!(
            names,
            vec!["h", "cx", "sdg", "h", "measure", "sdg", "h", "measure"]
        );

        // ('Z', 'Z'): no rotations at all.
        let z = variants[2].circuit();
        assert_eq!(z.count_ops().get("h"), Some(&1));
        assert_eq!(z.count_ops().get("measure"), Some(&2));
    }

    #[test]
    fn test_measure_into_bit_matching_position() {
        let mut base = Circuit::new("prep");
        base.add_qreg("q", 4).unwrap();
        let selector = QubitSelector::Qubits(vec![QubitId(3), QubitId(1)]);
        let variants = generate_pairwise_tomography_variants(&base, &selector).unwrap();

        for variant in &variants {
            let pairs: Vec<_> = variant
                .circuit()
                .measurements()
                .map(|m| (m.qubits[0], m.clbits[0]))
                .collect();
            assert_eq!(pairs, vec![(QubitId(3), ClbitId(0)), (QubitId(1), ClbitId(1))]);
            assert_eq!(variant.measured_qubits(), &[QubitId(3), QubitId(1)]);
        }
    }

    #[test]
    fn test_register_size_limit_message() {
        let err = TomographyError::TooManyQubits {
            count: u32::MAX as usize + 1,
            max: u32::MAX as usize,
        };
        assert_eq!(err.to_string(), "4294967296 qubits exceed the limit of 4294967295");
    }

    #[test]
    fn test_measured_qubits_ignore_preparation_measurements() {
        let mut base = Circuit::with_size("prep", 3, 2);
        base.h(QubitId(0)).unwrap().measure(QubitId(0), ClbitId(1)).unwrap();

        let variants = generate_pairwise_tomography_variants(&base, &QubitSelector::All).unwrap();
        for variant in &variants {
            assert_eq!(variant.measured_qubits(), &[QubitId(0), QubitId(1), QubitId(2)]);
            assert_eq!(variant.circuit().measurements().count(), 4);
        }
    }

    #[test]
    fn test_base_circuit_untouched() {
        let base = Circuit::ghz(3).unwrap();
        let before = base.clone();
        let _ = generate_pairwise_tomography_variants(&base, &QubitSelector::All).unwrap();
        assert_eq!(base, before);
    }

    #[test]
    fn test_register_name_collision_propagates() {
        let mut base = Circuit::bell().unwrap();
        base.add_creg("meas", 1).unwrap();
        let err = generate_pairwise_tomography_variants(&base, &QubitSelector::All).unwrap_err();
        assert!(matches!(
            err,
            TomographyError::Ir(IrError::DuplicateRegister(name)) if name == "meas"
        ));
    }

    #[test]
    fn test_custom_register_name() {
        let mut base = Circuit::bell().unwrap();
        base.add_creg("meas", 1).unwrap();
        let variants = PairwiseTomography::new()
            .with_register_name("tomo")
            .generate(&base, &QubitSelector::All)
            .unwrap();
        let circuit = variants[0].circuit();
        assert_eq!(circuit.num_clbits(), 3);
        assert_eq!(circuit.creg("tomo").unwrap().clbits(), &[ClbitId(1), ClbitId(2)]);
    }

    #[test]
    fn test_circuits_only() {
        let base = Circuit::ghz(2).unwrap();
        let circuits = pairwise_tomography_circuits(&base, &QubitSelector::All).unwrap();
        assert_eq!(circuits.len(), 9);
        assert_eq!(circuits[8].name(), "('Z', 'Y')");
    }

    #[test]
    fn test_label_reads_back() {
        let base = Circuit::ghz(5).unwrap();
        for variant in generate_pairwise_tomography_variants(&base, &QubitSelector::All).unwrap() {
            let parsed = variant.label_bases().unwrap();
            assert_eq!(parsed, variant.bases());
        }
    }
}
