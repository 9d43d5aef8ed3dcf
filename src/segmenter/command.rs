use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;
use tracing::{debug, info};

use super::Segmenter;
use crate::error::{GoldError, Result};

const PROBE_TEXT: &str = "This is a probe. It has two sentences.";

/// External program reading region text on stdin and writing one sentence per stdout line
pub struct CommandSegmenter {
    name: String,
    program: String,
    args: Vec<String>,
}

impl CommandSegmenter {
    pub fn new(name: impl Into<String>, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args,
        }
    }

    /// Run once on a fixed text so a missing or broken program fails the run at start-up
    pub fn probe(&self) -> Result<()> {
        let sentences = self.segment(PROBE_TEXT)?;
        info!(
            "Reference '{}' probe succeeded: {} sentences from `{}`",
            self.name,
            sentences.len(),
            self.program
        );
        Ok(())
    }
}

impl Segmenter for CommandSegmenter {
    fn name(&self) -> &str {
        &self.name
    }

    fn segment(&self, text: &str) -> Result<Vec<String>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| GoldError::segmenter(&self.name, format!("cannot start `{}`: {e}", self.program)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| GoldError::segmenter(&self.name, "stdin not captured"))?;

        // WHY: writing from a separate thread keeps a program that streams output while still
        // reading input from filling the stdout pipe and deadlocking
        let input = text.to_string();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child
            .wait_with_output()
            .map_err(|e| GoldError::segmenter(&self.name, format!("wait failed: {e}")))?;

        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!("Reference '{}' closed stdin early: {}", self.name, e),
            Err(_) => return Err(GoldError::segmenter(&self.name, "stdin writer panicked")),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GoldError::segmenter(
                &self.name,
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| GoldError::segmenter(&self.name, "output is not valid UTF-8"))?;

        let sentences: Vec<String> = stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if sentences.is_empty() {
            return Err(GoldError::segmenter(&self.name, "no output"));
        }
        Ok(sentences)
    }
}
