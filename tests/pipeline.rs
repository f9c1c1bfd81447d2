use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use wikiscript::config::Config;
use wikiscript::error::Error;
use wikiscript::pipelines::{Pipeline, WikiDoc};
use wikiscript::processing::package::{self, PackagedDataset};
use wikiscript::processing::FrequencyMode;
use wikiscript::publish::{DryRun, Publish};

const DEVANAGARI: &str = "कोंकणी ही भारतांतल्या गोंय राज्याची अधिकृत भास आसा आनी ती कोंकण दर्यादेगेर उलयतात";
const ROMAN: &str = "Konkani is an Indo-Aryan language spoken by the Konkani people along the western coast";
const KANNADA: &str = "ಕೊಂಕಣಿ ಭಾಷೆ ಭಾರತದ ಪಶ್ಚಿಮ ಕರಾವಳಿಯಲ್ಲಿ ಮಾತನಾಡುವ ಒಂದು ಇಂಡೋ ಆರ್ಯನ್ ಭಾಷೆ ಆಗಿದೆ ಎಂದು ಹೇಳಲಾಗುತ್ತದೆ";

/// Write a fake extraction output: `nb` articles per kind, spread over two folders,
/// along with short articles and broken lines.
fn fake_extraction(dir: &Path, nb: usize) {
    let kinds = [
        DEVANAGARI.to_string(),
        ROMAN.to_string(),
        KANNADA.to_string(),
        format!("{} {}", DEVANAGARI, ROMAN),
    ];

    for (folder, kinds) in [("AA", &kinds[..2]), ("AB", &kinds[2..])] {
        fs::create_dir_all(dir.join(folder)).unwrap();
        let mut content = String::new();
        for (k, text) in kinds.iter().enumerate() {
            for i in 0..nb {
                let id = format!("{}-{}-{}", folder, k, i);
                let line = serde_json::json!({
                    "id": id,
                    "revid": "1",
                    "url": format!("https://gom.wikipedia.org/wiki?curid={}", id),
                    "title": format!("article {}", id),
                    "text": text,
                });
                content.push_str(&line.to_string());
                content.push('\n');
            }
        }
        content.push_str(r#"{"id": "short", "title": "stub", "text": "तो एक गांव"}"#);
        content.push('\n');
        content.push_str("{'id': 'broken', 'text': 'python literal'}\n");
        fs::write(dir.join(folder).join("wiki_00"), content).unwrap();
    }
}

fn config(dir: &Path) -> Config {
    let config = Config {
        dry_run: true,
        ..Config::with_data_dir(dir)
    };
    // the dump is never read when the extraction folder is there
    fs::create_dir_all(dir).unwrap();
    fs::write(&config.dump_file, b"").unwrap();
    fake_extraction(&config.extracted_dir, 25);
    config
}

#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<PackagedDataset>>>);

impl Publish for Recorder {
    fn publish(&self, dataset: &PackagedDataset) -> Result<(), Error> {
        self.0.borrow_mut().push(dataset.clone());
        Ok(())
    }
}

#[test]
fn full_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    let dataset_dir = config.dataset_dir.clone();

    let recorder = Recorder::default();
    let pipeline = WikiDoc::with_publisher(config, Box::new(recorder.clone())).unwrap();
    let report = pipeline.run().unwrap();

    // 4 kinds * 25 articles, 2 short ones, 2 broken lines
    assert_eq!(report.load.nb_read, 102);
    assert_eq!(report.load.nb_filtered, 2);
    assert_eq!(report.load.nb_malformed, 2);

    let dataset = package::load(&dataset_dir).unwrap();
    assert_eq!(dataset.train.len(), 80);
    assert_eq!(dataset.validation.len(), 10);
    assert_eq!(dataset.test.len(), 10);

    let ids: HashSet<_> = dataset
        .iter()
        .flat_map(|(_, articles)| articles.iter())
        .map(|a| a.field("id").unwrap().as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids.len(), 100);

    // published what was packaged
    let published = recorder.0.borrow();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0], report.packaged);

    // frequencies are computed on the splits
    for ((split, frequencies), (name, articles)) in report.frequencies.iter().zip(dataset.iter()) {
        assert_eq!(*split, name);
        assert_eq!(frequencies.total() as usize, articles.len());
        let labels: HashSet<_> = frequencies.absolute().keys().cloned().collect();
        for label in labels {
            assert!(
                ["devanagari", "roman", "kannada", "devanagari, roman"].contains(&label.as_str()),
                "unexpected label {}",
                label
            );
        }
    }

    assert!(dataset_dir.join("frequencies.csv").is_file());
}

#[test]
fn deterministic_runs() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();

    for dir in [&a, &b] {
        let pipeline = WikiDoc::new(config(dir.path())).unwrap();
        pipeline.run().unwrap();
    }

    let da = package::load(&a.path().join("dataset")).unwrap();
    let db = package::load(&b.path().join("dataset")).unwrap();
    assert_eq!(da, db);
}

#[test]
fn marginal_frequencies() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        frequency_mode: FrequencyMode::Marginal,
        ..config(dir.path())
    };

    let report = WikiDoc::with_publisher(config, Box::new(DryRun))
        .unwrap()
        .run()
        .unwrap();

    for (_, frequencies) in &report.frequencies {
        assert!(!frequencies.absolute().contains_key("devanagari, roman"));
        let sum: f64 = frequencies.relative().values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}

#[test]
fn marginal_frequencies_without_scripts() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        dry_run: true,
        frequency_mode: FrequencyMode::Marginal,
        ..Config::with_data_dir(dir.path())
    };
    fs::write(&config.dump_file, b"").unwrap();
    fs::create_dir_all(config.extracted_dir.join("AA")).unwrap();
    let content: String = (0..20)
        .map(|i| {
            let line = serde_json::json!({"id": i.to_string(), "text": "1 2 3 4 5 6 7 8 9 10 11 12"});
            format!("{}\n", line)
        })
        .collect();
    fs::write(config.extracted_dir.join("AA/wiki_00"), content).unwrap();
    let dataset_dir = config.dataset_dir.clone();

    let report = WikiDoc::new(config).unwrap().run().unwrap();

    assert_eq!(report.frequencies.len(), 3);
    for (_, frequencies) in &report.frequencies {
        assert_eq!(frequencies.total(), 0);
    }
    assert_eq!(package::load(&dataset_dir).unwrap().train.len(), 16);
}

#[test]
fn empty_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        dry_run: true,
        ..Config::with_data_dir(dir.path())
    };
    fs::write(&config.dump_file, b"").unwrap();
    fs::create_dir_all(config.extracted_dir.join("AA")).unwrap();
    fs::write(config.extracted_dir.join("AA/wiki_00"), "not json\n").unwrap();

    let res = WikiDoc::new(config).unwrap().run();
    assert!(matches!(res, Err(Error::InsufficientData(_))));
}

#[cfg(unix)]
#[test]
fn forced_reextraction_runs_extractor() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        force_reextract: true,
        // exits with a non-zero status
        extractor: "false".to_string(),
        ..config(dir.path())
    };

    let res = WikiDoc::new(config.clone()).unwrap().run();
    assert!(matches!(res, Err(Error::Extractor(_))));

    // the failed extraction did not touch the previous one
    let config = Config {
        force_reextract: false,
        ..config
    };
    let report = WikiDoc::new(config).unwrap().run().unwrap();
    assert_eq!(report.load.nb_read, 102);
}
