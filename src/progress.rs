use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar over analyzed documents, absent when disabled
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new(enabled: bool, total_documents: u64) -> Self {
        if !enabled {
            return Self { progress_bar: None };
        }

        let pb = ProgressBar::new(total_documents);
        if let Ok(style) =
            ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} documents {msg}")
        {
            pb.set_style(style.progress_chars("##-"));
        }
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { progress_bar: Some(pb) }
    }

    pub fn hidden() -> Self {
        Self { progress_bar: None }
    }

    pub fn document_completed(&self, name: &str) {
        if let Some(pb) = &self.progress_bar {
            pb.set_message(name.to_string());
            pb.inc(1);
        }
    }

    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message("Complete");
        }
    }
}
