// tests/pipeline_stages.rs
//! Stage runs over a temporary data directory.

use diet_sentiment_annotator::pipeline::{
    CLEAN, FILTERED, FINAL, GOLD, LABELED, SAMPLE_BALANCED, SAMPLE_BLIND, SAMPLE_HARD,
};
use diet_sentiment_annotator::report::{RunManifest, COUNTS_FILE, EXAMPLES_FILE, MANIFEST_FILE, MATRIX_FILE};
use diet_sentiment_annotator::{AnnotateError, AnnotatorConfig, Pipeline, Stage};
use std::fs;
use std::path::{Path, PathBuf};

const FILTRADO: &str = "id,texto,rating,fuente\n\
1,\"<p>La keto me funcionó, la recomiendo</p>\",,play\n\
2,Probé ayuno 16/8 y fue horrible pero lo recomiendo,,rss\n\
3,¿Alguien probó la dieta paleo?,,reddit\n\
4,La vegana es muy cara y tengo hambre,2,play\n\
5,Sin comentarios,,rss\n";

fn config_in(root: &Path) -> AnnotatorConfig {
    let mut cfg = AnnotatorConfig::default();
    cfg.paths.data_dir = root.join("data");
    cfg.paths.reports_dir = root.join("reports");
    cfg
}

fn data(root: &Path, name: &str) -> PathBuf {
    root.join("data").join(format!("{name}.csv"))
}

fn seed_filtrado(root: &Path) {
    fs::create_dir_all(root.join("data")).unwrap();
    fs::write(data(root, FILTERED), FILTRADO).unwrap();
}

/// (headers, rows) of a CSV file.
fn read_table(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    let headers = rdr.headers().unwrap().iter().map(String::from).collect();
    let rows = rdr
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

fn column(path: &Path, name: &str) -> Vec<String> {
    let (headers, rows) = read_table(path);
    let i = headers.iter().position(|h| h == name).unwrap();
    rows.into_iter().map(|mut r| r.swap_remove(i)).collect()
}

#[test]
fn staged_run_produces_every_artifact() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    seed_filtrado(root);
    let p = Pipeline::new(config_in(root)).unwrap();

    // preprocess
    p.run(Stage::Preprocess).unwrap();
    let (headers, rows) = read_table(&data(root, CLEAN));
    assert_eq!(
        headers,
        vec![
            "id", "texto_raw", "texto_proc", "rating", "fuente", "dieta_heuristica",
            "dietas_match", "sentimiento", "sent_conf", "sent_why"
        ]
    );
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0][1], "La keto me funcionó, la recomiendo");
    assert_eq!(rows[0][2], "la keto me funcionó , la recomiendo");
    assert_eq!(rows[0][4], "play");

    // label
    p.run(Stage::Label).unwrap();
    let labeled = data(root, LABELED);
    assert_eq!(
        column(&labeled, "dieta_heuristica"),
        vec!["keto", "ayuno", "paleo", "vegana", ""]
    );
    assert_eq!(
        column(&labeled, "sentimiento"),
        vec!["pos", "pos", "neu", "neg", "neu"]
    );
    assert_eq!(column(&labeled, "sent_why")[3], "rating");
    assert_eq!(column(&labeled, "sent_why")[2], "question_neutral");
    assert_eq!(column(&labeled, "sent_conf")[2], "0.40");

    // sample
    p.run(Stage::Sample).unwrap();
    let balanced = data(root, SAMPLE_BALANCED);
    assert_eq!(column(&balanced, "id"), vec!["2", "1", "3", "5", "4"]);
    assert_eq!(column(&balanced, "dieta_heuristica")[3], "sin_dieta");
    assert!(column(&balanced, "sentimiento_gold").iter().all(String::is_empty));

    let (blind_headers, blind_rows) = read_table(&data(root, SAMPLE_BLIND));
    assert_eq!(blind_headers, vec!["id", "texto_raw", "texto_proc", "sentimiento_gold"]);
    assert_eq!(blind_rows.len(), 5);

    assert_eq!(column(&data(root, SAMPLE_HARD), "id"), vec!["2", "3", "5"]);

    // fuse-gold
    fs::write(data(root, GOLD), "id,texto_raw,sentimiento_gold\n2,x,neg\n4,y,\n").unwrap();
    p.run(Stage::FuseGold).unwrap();
    let fused = data(root, FINAL);
    assert_eq!(
        column(&fused, "sentimiento"),
        vec!["pos", "neg", "neu", "neg", "neu"]
    );
    assert_eq!(column(&fused, "sent_conf"), column(&labeled, "sent_conf"));
    assert_eq!(column(&fused, "sent_why"), column(&labeled, "sent_why"));

    // aspects (reads limpio_final)
    p.run(Stage::Aspects).unwrap();
    let reports = root.join("reports");
    let (h, scores) = read_table(&reports.join(MATRIX_FILE));
    assert_eq!(h, vec!["aspecto", "ayuno", "keto", "flexible", "mediterranea", "paleo", "vegana"]);
    assert_eq!(scores.len(), 5);
    assert_eq!(
        scores[0],
        vec!["hambre", "0.0000", "0.0000", "0.0000", "0.0000", "0.0000", "-1.0000"]
    );
    let (_, counts) = read_table(&reports.join(COUNTS_FILE));
    assert_eq!(counts[0], vec!["hambre", "0", "0", "0", "0", "0", "1"]);
    assert_eq!(counts[3], vec!["costo", "0", "0", "0", "0", "0", "1"]);

    let (_, examples) = read_table(&reports.join(EXAMPLES_FILE));
    assert_eq!(examples.len(), 2);
    assert!(examples
        .iter()
        .all(|r| r[1] == "vegana" && r[2].is_empty() && r[3] == "la vegana es muy cara y tengo hambre"));

    // manifest keeps one record per stage
    let manifest = RunManifest::load_or_default(&reports.join(MANIFEST_FILE));
    let stages: Vec<&str> = manifest.stages.keys().map(String::as_str).collect();
    assert_eq!(stages, vec!["aspects", "fuse-gold", "label", "preprocess", "sample"]);
    assert_eq!(manifest.stages["aspects"].input_name, FINAL);
    assert_eq!(manifest.stages["label"].input_name, CLEAN);
    assert_eq!(manifest.stages["label"].rows_out, 5);
}

#[test]
fn all_skips_fusion_without_gold_file() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    seed_filtrado(root);
    let p = Pipeline::new(config_in(root)).unwrap();

    let outcomes = p.run(Stage::All).unwrap();
    let stages: Vec<&str> = outcomes.iter().map(|o| o.stage).collect();
    assert_eq!(stages, vec!["label", "sample", "aspects"]);
    // label fell back to the raw filtered corpus
    assert_eq!(outcomes[0].input.name, FILTERED);
    assert_eq!(outcomes[2].input.name, LABELED);
    assert!(!data(root, FINAL).exists());
    assert!(root.join("reports").join(MATRIX_FILE).is_file());
}

#[test]
fn fixed_seed_sampling_is_reproducible() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("data")).unwrap();
    let mut csv = String::from("id,texto_raw\n");
    for i in 0..30 {
        csv.push_str(&format!("{i},comentario número {i}\n"));
    }
    fs::write(data(root, CLEAN), csv).unwrap();

    let mut cfg = config_in(root);
    cfg.sampling.per_cell = 5;
    cfg.sampling.hard_cap = 7;
    let p = Pipeline::new(cfg).unwrap();
    p.run(Stage::Label).unwrap();

    p.run(Stage::Sample).unwrap();
    let first_bal = fs::read(data(root, SAMPLE_BALANCED)).unwrap();
    let first_hard = fs::read(data(root, SAMPLE_HARD)).unwrap();

    p.run(Stage::Sample).unwrap();
    assert_eq!(fs::read(data(root, SAMPLE_BALANCED)).unwrap(), first_bal);
    assert_eq!(fs::read(data(root, SAMPLE_HARD)).unwrap(), first_hard);

    let ids = column(&data(root, SAMPLE_BALANCED), "id");
    assert_eq!(ids.len(), 5);
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 5);
    assert_eq!(column(&data(root, SAMPLE_HARD), "id").len(), 7);
}

#[test]
fn missing_inputs_name_every_candidate() {
    let tmp = tempfile::tempdir().unwrap();
    let p = Pipeline::new(config_in(tmp.path())).unwrap();
    match p.run(Stage::Label) {
        Err(AnnotateError::NoInputSource { stage, tried }) => {
            assert_eq!(stage, "label");
            assert_eq!(tried.len(), 2);
            assert!(tried[0].ends_with("limpio.csv"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn invalid_gold_label_aborts_fusion() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    seed_filtrado(root);
    let p = Pipeline::new(config_in(root)).unwrap();
    p.run(Stage::Label).unwrap();

    fs::write(data(root, GOLD), "id,sentimiento_gold\n1,positivo\n").unwrap();
    let err = p.run(Stage::FuseGold).unwrap_err();
    assert!(matches!(err, AnnotateError::InvalidGoldLabels { count: 1, .. }), "{err}");
    assert!(!data(root, FINAL).exists());
}
