//! Emission tests over generated tomography variants.

use pairtomo_ir::{Circuit, QubitId};
use pairtomo_qasm3::{emit, emit_qasm2};
use pairtomo_tomography::{
    PairwiseTomography, QubitSelector, generate_pairwise_tomography_variants,
};
use proptest::prelude::*;

#[test]
fn test_emit_y_variant() {
    let bell = Circuit::bell().unwrap();
    let variants = generate_pairwise_tomography_variants(&bell, &QubitSelector::All).unwrap();

    let qasm = emit(variants[1].circuit()).unwrap();
    let expected = "\
OPENQASM 3.0;
include \"stdgates.inc\";

// ('Y', 'Y')
qubit[2] q;
bit[2] meas;

h q[0];
cx q[0], q[1];
sdg q[0];
h q[0];
meas[0] = measure q[0];
sdg q[1];
h q[1];
meas[1] = measure q[1];
";
    assert_eq!(qasm, expected);
}

#[test]
fn test_emit_qasm2_variant() {
    let bell = Circuit::bell().unwrap();
    let variants = generate_pairwise_tomography_variants(&bell, &QubitSelector::All).unwrap();

    // ('X', 'Z')
    let qasm = emit_qasm2(variants[4].circuit()).unwrap();
    assert!(qasm.starts_with("OPENQASM 2.0;\ninclude \"qelib1.inc\";\n"));
    assert!(qasm.contains("// ('X', 'Z')"));
    assert!(qasm.contains("qreg q[2];"));
    assert!(qasm.contains("creg meas[2];"));
    assert!(qasm.contains("measure q[0] -> meas[0];"));
    assert!(qasm.contains("measure q[1] -> meas[1];"));
    assert_eq!(qasm.matches("h q[0];").count(), 2);
    assert_eq!(qasm.matches("h q[1];").count(), 0);
}

#[test]
fn test_emit_subset_uses_register_indices() {
    let mut base = Circuit::new("prep");
    base.add_qreg("anc", 1).unwrap();
    base.add_qreg("data", 2).unwrap();
    base.h(QubitId(1)).unwrap();

    let variants = PairwiseTomography::new()
        .with_register_name("tomo")
        .generate(&base, &QubitSelector::Register("data".into()))
        .unwrap();
    let qasm = emit(variants[2].circuit()).unwrap();

    assert!(qasm.contains("qubit[1] anc;"));
    assert!(qasm.contains("qubit[2] data;"));
    assert!(qasm.contains("bit[2] tomo;"));
    assert!(qasm.contains("tomo[0] = measure data[0];"));
    assert!(qasm.contains("tomo[1] = measure data[1];"));
    assert!(!qasm.contains("anc[0];"));
}

#[test]
fn test_every_variant_emits() {
    let base = Circuit::ghz(5).unwrap();
    let variants = generate_pairwise_tomography_variants(&base, &QubitSelector::All).unwrap();
    for variant in &variants {
        let qasm = emit(variant.circuit()).unwrap();
        assert_eq!(qasm.matches("= measure").count(), 5);
        assert!(qasm.contains(&format!("// {}", variant.label())));
    }
}

proptest! {
    #[test]
    fn measurement_lines_match_width(n in 1_u32..=10) {
        let base = Circuit::ghz(n).unwrap();
        let variants = generate_pairwise_tomography_variants(&base, &QubitSelector::All).unwrap();
        for variant in &variants {
            let qasm2 = emit_qasm2(variant.circuit()).unwrap();
            prop_assert_eq!(qasm2.matches("measure ").count(), n as usize);
            let declaration = format!("creg meas[{n}];");
            prop_assert!(qasm2.contains(&declaration));
        }
    }
}
