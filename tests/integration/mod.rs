// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary corpus of source documents and their method files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().join("corpus");
        fs::create_dir_all(&root_path).expect("Failed to create corpus directory");

        Self { temp_dir, root_path }
    }

    /// Write a source document relative to the corpus root
    pub fn create_document<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Write `<stem>_<method>.txt` next to a source document
    pub fn create_method_file<P: AsRef<Path>>(&self, source_path: P, method: &str, content: &str) -> PathBuf {
        seams_gold::pairing::write_method_file(source_path, method, content).expect("Failed to write method file")
    }

    /// Source document plus its primary output
    pub fn create_pair<P: AsRef<Path>>(&self, relative_path: P, text: &str, primary: &str) -> PathBuf {
        let source = self.create_document(relative_path, text);
        self.create_method_file(&source, "seams", primary);
        source
    }

    /// Output path outside the scanned corpus
    pub fn output_path(&self) -> PathBuf {
        self.temp_dir.path().join("gold_set.json")
    }

    pub fn read_dataset(&self) -> serde_json::Value {
        let content = fs::read_to_string(self.output_path()).expect("Failed to read dataset");
        serde_json::from_str(&content).expect("Dataset is not valid JSON")
    }
}

/// Values of one field across every exported example
pub fn example_field<'a>(dataset: &'a serde_json::Value, field: &str) -> Vec<&'a serde_json::Value> {
    dataset["examples"]
        .as_array()
        .expect("examples must be an array")
        .iter()
        .map(|example| &example[field])
        .collect()
}
