use seams_gold::reference::ReferenceSet;
use seams_gold::{DatasetFile, Evaluator, GoldConfig, PipelineOptions, SelectionMode};

#[path = "integration/fixtures/mod.rs"]
mod fixtures;
use fixtures::*;

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::TestFixture;

async fn export_book(fixture: &TestFixture) -> DatasetFile {
    fixture.create_pair("book-0.txt", BOOK_TEXT, BOOK_PRIMARY);
    let mut options = PipelineOptions::new(&fixture.root_path, fixture.output_path());
    options.selection = SelectionMode::All;
    seams_gold::run(GoldConfig::default(), &options)
        .await
        .expect("Pipeline should succeed");

    DatasetFile::load(&fixture.output_path())
        .await
        .expect("Exported dataset should load for evaluation")
}

/// A freshly exported dataset scores every reference against the primary sentences
#[tokio::test]
async fn test_evaluate_exported_dataset() {
    let fixture = TestFixture::new();
    let dataset = export_book(&fixture).await;
    assert!(!dataset.examples.is_empty());

    let references = ReferenceSet::from_config(&GoldConfig::default()).unwrap();
    let report = Evaluator::new(references, None).evaluate(&dataset);

    assert_eq!(report.metadata.gold_method, "seams");
    assert_eq!(report.metadata.methods, vec!["uax29".to_string(), "rule".to_string()]);
    assert_eq!(report.metadata.examples_without_gold, 0);

    let uax29 = &report.results["uax29"];
    assert_eq!(uax29.overall.examples, dataset.examples.len());
    assert_eq!(uax29.failed, 0);
    // the merged primary sentence is split by the reference
    assert!(uax29.overall.over_segmented >= 1);
    assert!(uax29.overall.f1 < 1.0);

    let output = fixture.temp_dir.path().join("eval/results.json");
    report.write(&output).await.expect("Report should be written");
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["metadata"]["gold_method"], "seams");
    assert_eq!(written["results"]["rule"]["overall"]["examples"], dataset.examples.len());
}

/// Another stored method can serve as the gold sentences
#[tokio::test]
async fn test_evaluate_against_reference_sentences() {
    let fixture = TestFixture::new();
    let dataset = export_book(&fixture).await;

    let references = ReferenceSet::from_config(&GoldConfig::default()).unwrap();
    let report = Evaluator::new(references, Some("rule".to_string())).evaluate(&dataset);

    assert_eq!(report.metadata.methods, vec!["uax29".to_string()]);
    let uax29 = &report.results["uax29"].overall;
    assert!(uax29.correctly_segmented >= 2);
    assert!(uax29.recall > 0.0);
}
