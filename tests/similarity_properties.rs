mod common;

use common::{random_jet, rng, shifted_jet, EPS};
use gabor_jet_similarity::{
    Disparity, FrequencySource, FrequencyTable, FrequencyVector, GaborBank, Jet, JetSimilarityError,
    SimilarityConfig, SimilarityFunction, SimilarityType,
};

fn bank_table() -> FrequencyTable {
    GaborBank::default().frequency_table().unwrap()
}

fn function(similarity_type: SimilarityType, table: &FrequencyTable) -> SimilarityFunction {
    SimilarityFunction::new(similarity_type, Some(table)).unwrap()
}

#[test]
fn test_every_type_name_round_trips() {
    let table = bank_table();
    for name in ["ScalarProduct", "Canberra", "Disparity", "PhaseDiff", "PhaseDiffPlusCanberra"] {
        let sim = SimilarityFunction::from_name(name, Some(&table)).unwrap();
        assert_eq!(sim.type_name(), name);
        assert_eq!(sim.last_disparity(), Disparity::zero());
    }

    for name in ["", "phasediff", "Scalar Product", "Euclidean"] {
        let err = SimilarityFunction::from_name(name, Some(&table)).unwrap_err();
        assert!(matches!(err, JetSimilarityError::InvalidArgument(ref msg) if msg.contains(name)));
    }
}

#[test]
fn test_self_similarity_is_one() {
    let table = bank_table();
    let mut rng = rng();
    for _ in 0..10 {
        let jet = random_jet(&mut rng, table.len());

        let mut scalar = function(SimilarityType::ScalarProduct, &table);
        assert!((scalar.similarity(&jet, &jet).unwrap() - 1.0).abs() < EPS);

        let mut canberra = function(SimilarityType::Canberra, &table);
        assert_eq!(canberra.similarity(&jet, &jet).unwrap(), 1.0);

        for t in [SimilarityType::Disparity, SimilarityType::PhaseDiff, SimilarityType::PhaseDiffPlusCanberra] {
            let mut sim = function(t, &table);
            assert!((sim.similarity(&jet, &jet).unwrap() - 1.0).abs() < EPS, "{}", t);
            assert!(sim.last_disparity().norm() < EPS);
        }
    }
}

#[test]
fn test_phase_scores_are_bounded() {
    let table = bank_table();
    let mut rng = rng();
    let mut phase = function(SimilarityType::PhaseDiff, &table);
    let mut blend = function(SimilarityType::PhaseDiffPlusCanberra, &table);
    let mut canberra = function(SimilarityType::Canberra, &table);

    for _ in 0..50 {
        let a = random_jet(&mut rng, table.len());
        let b = random_jet(&mut rng, table.len());
        let p = phase.similarity(&a, &b).unwrap();
        let c = canberra.similarity(&a, &b).unwrap();
        let m = blend.similarity(&a, &b).unwrap();
        assert!((0.0..=1.0).contains(&p), "PhaseDiff out of range: {}", p);
        assert!((0.0..=1.0).contains(&c), "Canberra out of range: {}", c);
        assert!((0.0..=1.0).contains(&m), "PhaseDiffPlusCanberra out of range: {}", m);
    }
}

#[test]
fn test_identical_jets_have_zero_disparity() {
    let table = bank_table();
    let mut rng = rng();
    let jet = random_jet(&mut rng, table.len());
    let mut sim = function(SimilarityType::Disparity, &table);
    assert!(sim.disparity(&jet, &jet).unwrap().norm() < EPS);
}

#[test]
fn test_axis_frequencies_recover_displacement() {
    let table = FrequencyTable::new(vec![FrequencyVector::new(1.0, 0.0), FrequencyVector::new(0.0, 1.0)]).unwrap();
    let jet_a = Jet::new(vec![1.0, 1.0], vec![0.0, 0.0]).unwrap();
    let jet_b = shifted_jet(&jet_a, &table, Disparity::new(0.1, -0.05));

    let mut sim = function(SimilarityType::Disparity, &table);
    let d = sim.disparity(&jet_a, &jet_b).unwrap();
    assert!((d.x - 0.1).abs() < 1e-3, "x = {}", d.x);
    assert!((d.y + 0.05).abs() < 1e-3, "y = {}", d.y);
    assert_eq!(sim.last_disparity(), d);
}

#[test]
fn test_gabor_bank_recovers_displacement() {
    let table = bank_table();
    let mut rng = rng();
    let jet = random_jet(&mut rng, table.len());

    for t in [SimilarityType::Disparity, SimilarityType::PhaseDiff, SimilarityType::PhaseDiffPlusCanberra] {
        let mut sim = function(t, &table);
        for expected in [Disparity::new(0.8, -0.6), Disparity::new(1.5, -1.0), Disparity::new(-0.3, 1.2)] {
            let shifted = shifted_jet(&jet, &table, expected);
            let score = sim.similarity(&jet, &shifted).unwrap();
            let d = sim.last_disparity();
            assert!((d.x - expected.x).abs() < 1e-6, "{}: {:?} vs {:?}", t, d, expected);
            assert!((d.y - expected.y).abs() < 1e-6, "{}: {:?} vs {:?}", t, d, expected);
            assert!((score - 1.0).abs() < 1e-6, "{}: score {}", t, score);
        }
    }
}

#[test]
fn test_refinement_resolves_wrapped_phases() {
    // The finest wavelets wrap at this displacement, so a single round falls short
    let table = bank_table();
    let mut rng = rng();
    let jet = random_jet(&mut rng, table.len());
    let flat = Jet::new(vec![1.0; table.len()], jet.phase().to_vec()).unwrap();
    let expected = Disparity::new(2.5, 0.0);
    let shifted = shifted_jet(&flat, &table, expected);

    let error_after = |rounds: usize| {
        let config = SimilarityConfig { refinement_rounds: rounds };
        let mut sim = SimilarityFunction::with_config(SimilarityType::PhaseDiff, Some(&table), config).unwrap();
        let d = sim.disparity(&flat, &shifted).unwrap();
        Disparity::new(d.x - expected.x, d.y - expected.y).norm()
    };

    assert!(error_after(1) > 1.0);
    assert!(error_after(10) < 1e-6);
    assert!(error_after(10) <= error_after(1));
}

#[test]
fn test_plain_types_have_no_disparity() {
    let mut rng = rng();
    let jet = random_jet(&mut rng, 8);
    for t in [SimilarityType::ScalarProduct, SimilarityType::Canberra] {
        let mut sim = SimilarityFunction::new(t, None).unwrap();
        assert!(matches!(
            sim.disparity(&jet, &jet),
            Err(JetSimilarityError::UnsupportedOperation { .. })
        ));
        let (_, d) = sim.similarity_with_disparity(&jet, &jet).unwrap();
        assert!(d.is_none());
    }
}

#[test]
fn test_mismatched_lengths_fail_for_every_type() {
    let table = bank_table();
    let mut rng = rng();
    let a = random_jet(&mut rng, table.len());
    let b = random_jet(&mut rng, table.len() - 1);

    for t in SimilarityType::ALL {
        let mut sim = function(t, &table);
        assert!(
            matches!(sim.similarity(&a, &b), Err(JetSimilarityError::InvalidArgument(_))),
            "{}",
            t
        );
    }
}

#[test]
fn test_zero_norm_scalar_product_is_degenerate() {
    let mut sim = SimilarityFunction::new(SimilarityType::ScalarProduct, None).unwrap();
    let zero = Jet::new(vec![0.0; 4], vec![0.0; 4]).unwrap();
    let other = Jet::new(vec![1.0; 4], vec![0.0; 4]).unwrap();
    assert!(matches!(sim.similarity(&zero, &other), Err(JetSimilarityError::DegenerateInput(_))));
}

#[test]
fn test_missing_frequencies_for_disparity_types() {
    for t in [SimilarityType::Disparity, SimilarityType::PhaseDiff, SimilarityType::PhaseDiffPlusCanberra] {
        assert!(matches!(
            SimilarityFunction::new(t, None),
            Err(JetSimilarityError::MissingDependency(_))
        ));
    }
}

#[test]
fn test_shifted_jets_are_more_similar_than_random_ones() {
    let table = bank_table();
    let mut rng = rng();
    let jet = random_jet(&mut rng, table.len());
    let shifted = shifted_jet(&jet, &table, Disparity::new(0.5, 0.5));
    let unrelated = random_jet(&mut rng, table.len());

    let mut sim = function(SimilarityType::Disparity, &table);
    let close = sim.similarity(&jet, &shifted).unwrap();
    let far = sim.similarity(&jet, &unrelated).unwrap();
    assert!(close > far, "{} <= {}", close, far);
}
