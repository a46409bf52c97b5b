use std::fs;

use tda_sc_voids::{
    analyze_batch, AnalysisConfig, AnalysisWarning, CubicLattice, Descriptor, DescriptorTable,
    ElectronicDescriptors, MaterialInput, StructureLoader, TdaError, XyzLoader,
};

fn config() -> AnalysisConfig {
    AnalysisConfig {
        r_max: Some(4.5),
        max_dim: 1,
        reference_thresholds: vec![2.0, 3.0],
        ..Default::default()
    }
}

#[test]
fn missing_descriptors_do_not_block_the_batch() {
    let mut descriptors = DescriptorTable::new();
    descriptors.insert("MgB2", ElectronicDescriptors::new(0.87, 0));

    let inputs = vec![
        MaterialInput::new("MgB2", CubicLattice::simple_cubic("Mg", 3.08, 2).build().unwrap()),
        MaterialInput::new("LK99", CubicLattice::perovskite("Pb", "Cu", 3.9, 1).build().unwrap()),
    ];

    let table = analyze_batch(inputs, &config(), &descriptors).unwrap();
    assert!(table.failures().is_empty());
    assert_eq!(table.records().len(), 2);

    let first = &table.records()[0];
    assert_eq!(first.material_id, "MgB2");
    assert_eq!(first.electronic.lambda, Descriptor::Available(0.87));
    assert!(first.warnings.is_empty());

    let second = &table.records()[1];
    assert_eq!(second.material_id, "LK99");
    assert_eq!(second.electronic, ElectronicDescriptors::unavailable());
    assert_eq!(second.warnings, vec![AnalysisWarning::DescriptorsUnavailable]);

    let mut buf = Vec::new();
    table.write_csv(&mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[1].starts_with("MgB2,") && rows[1].ends_with(",0.87,0"));
    assert!(rows[2].starts_with("LK99,") && rows[2].ends_with(",unavailable,unavailable"));
}

#[test]
fn rows_follow_input_order_in_parallel() {
    let inputs: Vec<MaterialInput> = (0..12)
        .map(|i| {
            // Larger supercells first so later materials finish sooner
            let repeats = if i < 3 { 3 } else { 1 };
            let cloud = CubicLattice::simple_cubic("Po", 3.35, repeats).build().unwrap();
            MaterialInput::new(format!("m{i:02}"), cloud)
        })
        .collect();

    let table = analyze_batch(inputs, &config(), &DescriptorTable::new()).unwrap();
    let ids: Vec<String> = table.records().iter().map(|r| r.material_id.clone()).collect();
    let expected: Vec<String> = (0..12).map(|i| format!("m{i:02}")).collect();
    assert_eq!(ids, expected);
}

#[test]
fn files_to_csv_end_to_end() {
    let dir = tempfile::tempdir().unwrap();

    let good = dir.path().join("SrTiO3.xyz");
    fs::write(
        &good,
        "5\ncubic SrTiO3\nSr 0 0 0\nTi 1.95 1.95 1.95\nO 1.95 1.95 0\nO 1.95 0 1.95\nO 0 1.95 1.95\n",
    )
    .unwrap();
    let bad = dir.path().join("broken.xyz");
    fs::write(&bad, "2\ncomment\nCu 0 0 zero\nO 1 1 1\n").unwrap();

    let descriptor_csv = dir.path().join("electronic.csv");
    fs::write(&descriptor_csv, "material_id,lambda,Z2\nSrTiO3,0.1,0\n").unwrap();

    let loader = XyzLoader;
    let inputs = vec![MaterialInput::load(&loader, &good), MaterialInput::load(&loader, &bad)];
    let descriptors = DescriptorTable::from_path(&descriptor_csv).unwrap();
    let table = analyze_batch(inputs, &config(), &descriptors).unwrap();

    assert_eq!(table.records().len(), 1);
    assert_eq!(table.failures().len(), 1);
    assert_eq!(table.failures()[0].material_id, loader.material_id(&bad));
    assert!(matches!(table.failures()[0].error, TdaError::StructureParse { line: 3, .. }));

    let out = dir.path().join("superconductor_comparison.csv");
    table.write_csv_path(&out).unwrap();
    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.get(0), Some("material_id"));
    assert!(headers.iter().any(|h| h == "betti1_r3.000"));
    assert!(headers.iter().any(|h| h == "max_lifetime_dim1"));

    let row = rdr.records().next().unwrap().unwrap();
    assert_eq!(row.get(0), Some("SrTiO3"));
    assert_eq!(row.get(headers.len() - 2), Some("0.1"));
    assert_eq!(row.get(headers.len() - 1), Some("0"));
}
