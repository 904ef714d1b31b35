//! End-to-end synthesis scenarios.

use std::collections::BTreeSet;

use micromodel_lattice::{LatticeError, SiteKind, ThroatLabel};
use micromodel_synthesis::{
    generate_network, Candidates, RepairStage, SynthesisConfig, SynthesisError, SynthesisWarning,
};

fn three_by_three() -> SynthesisConfig {
    SynthesisConfig::new(
        3,
        3,
        Candidates::uniform(vec![1.0; 5]),
        Candidates::uniform(vec![0.5; 5]),
        Candidates::uniform(vec![2, 3, 2, 3, 4, 3, 2, 3, 2]),
    )
    .with_seed(0)
}

#[test]
fn small_lattice_is_fully_connected_up() {
    let generated = generate_network(&three_by_three()).unwrap();
    let network = generated.network();

    // 9 corners and 4 bodies
    assert_eq!(network.live_pore_count(), 13);
    assert_eq!(
        network
            .pores()
            .filter(|(_, p)| p.site.kind == SiteKind::Body)
            .count(),
        4
    );
    assert!(network.lone_pores().is_empty());
    assert!(network.throats().all(|t| t.diameter == Some(0.5)));
    assert!(network.pores().all(|(_, p)| p.diameter == 1.0));

    let arrays = generated.arrays();
    let pairs: BTreeSet<_> = arrays.throat_conns.iter().map(|&[a, b]| (a.min(b), a.max(b))).collect();
    assert_eq!(pairs.len(), arrays.throat_count());
}

#[test]
fn targets_come_from_candidates() {
    let generated = generate_network(&three_by_three()).unwrap();
    assert!(generated
        .network()
        .pores()
        .all(|(_, p)| (2..=4).contains(&p.target_coordination)));
}

#[test]
fn single_column_is_rejected() {
    let config = SynthesisConfig {
        columns: 1,
        ..three_by_three()
    };
    assert_eq!(
        generate_network(&config).err(),
        Some(SynthesisError::Lattice(LatticeError::InvalidDimension { columns: 1, rows: 3 }))
    );

    let config = SynthesisConfig {
        columns: 2,
        ..three_by_three()
    };
    let generated = generate_network(&config).unwrap();
    assert_eq!(generated.network().live_pore_count(), 2 * 2 * 3 - 2 - 3 + 1);
}

#[test]
fn empty_pore_diameters_are_rejected() {
    let config = SynthesisConfig {
        pore_diameters: Candidates::uniform(vec![]),
        ..three_by_three()
    };
    let err = generate_network(&config).unwrap_err();
    assert_eq!(err, SynthesisError::EmptyCandidateSet("pore_diameters"));
    assert!(err.is_configuration());
}

#[test]
fn centre_channel_spans_tall_lattice() {
    let config = SynthesisConfig::new(
        6,
        18,
        Candidates::uniform(vec![1.0, 1.2]),
        Candidates::uniform(vec![0.4]),
        Candidates::uniform(vec![1, 2, 3]),
    )
    .with_center_channel(3)
    .with_seed(5);

    let generated = generate_network(&config).unwrap();
    let network = generated.network();
    let path = generated.channel().unwrap();

    assert!((1..=35).contains(&path.len()));
    // Nothing is trimmed, so the walk always reaches the top row.
    assert_eq!(path.len(), 35);
    assert_eq!(network.pore(path[34]).unwrap().site.row, 17);
    assert_eq!(generated.report().stats.channel_length, 35);
    assert!(!generated
        .report()
        .warnings
        .iter()
        .any(|w| matches!(w, SynthesisWarning::ChannelIncomplete { .. })));

    for pair in path.windows(2) {
        assert!(network.are_connected(pair[0], pair[1]));
        let sites = [network.pore(pair[0]).unwrap().site, network.pore(pair[1]).unwrap().site];
        assert!((1..4).contains(&sites[0].column) && (1..4).contains(&sites[1].column));
    }
    assert_eq!(
        network
            .throats()
            .filter(|t| t.label == ThroatLabel::Channel)
            .count(),
        34
    );
}

#[test]
fn average_coordination_is_approached() {
    let config = SynthesisConfig::new(
        12,
        12,
        Candidates::uniform(vec![1.0]),
        Candidates::uniform(vec![0.3]),
        Candidates::uniform(vec![6, 7, 8]),
    )
    .with_average_coordination(3.0)
    .with_seed(21);

    let generated = generate_network(&config).unwrap();
    let network = generated.network();

    assert!(generated.report().stats.throats_reduced > 0);
    let mean = network.mean_coordination();
    assert!((mean - 3.0).abs() < 2.0 / network.live_pore_count() as f64 + 1e-9, "mean {mean}");
}

#[test]
fn unreachable_targets_are_reported() {
    // A 2 × 2 lattice has 5 pores; nobody can reach 8 within the repair radius.
    let config = SynthesisConfig::new(
        2,
        2,
        Candidates::uniform(vec![1.0]),
        Candidates::uniform(vec![0.5]),
        Candidates::uniform(vec![8]),
    );
    let generated = generate_network(&config).unwrap();
    let report = generated.report();

    assert!(!report.is_clean());
    assert!(report.repair_warnings(RepairStage::LocalPass).count() > 0);
    assert!(generated
        .network()
        .pores()
        .all(|(id, _)| generated.network().coordination(id) <= 4));
}

#[test]
fn zero_target_pores_are_left_disconnected() {
    let config = SynthesisConfig::new(
        6,
        6,
        Candidates::uniform(vec![1.0]),
        Candidates::uniform(vec![0.5]),
        Candidates::weighted(vec![0, 3], vec![0.5, 0.5]),
    )
    .with_seed(3);
    let generated = generate_network(&config).unwrap();
    let network = generated.network();

    let zero: Vec<_> = network
        .pores()
        .filter(|(_, p)| p.target_coordination == 0)
        .map(|(id, _)| id)
        .collect();
    assert!(!zero.is_empty());
    for id in zero {
        assert_eq!(network.coordination(id), 0, "pore {id} has a target of zero");
    }
}

#[test]
fn histogram_weights_drive_sampling() {
    let samples = vec![0.8, 0.9, 1.0, 1.0, 1.1, 4.0];
    let config = SynthesisConfig {
        pore_diameters: Candidates::from_histogram(samples.clone()),
        ..three_by_three()
    };
    let generated = generate_network(&config).unwrap();
    assert!(generated
        .network()
        .pores()
        .all(|(_, p)| samples.contains(&p.diameter)));
}

#[test]
fn config_reads_from_partial_json() {
    let json = r#"{
        "columns": 4,
        "rows": 5,
        "pore_diameters": { "values": [1.0, 2.0], "weights": [0.25, 0.75] },
        "coordination": { "values": [3] },
        "center_channel": 2,
        "pore_diameter_bounds": { "max": 1.5 },
        "seed": 7
    }"#;
    let config: SynthesisConfig = serde_json::from_str(json).unwrap();

    assert_eq!(config.columns, 4);
    assert_eq!(config.center_channel, Some(2));
    assert_eq!(config.pore_diameter_bounds.min, None);
    assert_eq!(config.pore_random_shift, 0.2);
    assert!(config.keep_lone_pores);

    let generated = generate_network(&config).unwrap();
    assert!(generated.network().pores().all(|(_, p)| p.diameter <= 1.5));
    assert!(generated.channel().is_some());
}
