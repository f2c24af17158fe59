//! Append-only CSV record of the fittest chromosome of every generation.
//!
//! Every run gets a file of its own, claimed with the first row. When
//! `<stem>-<timestamp>.csv` is already taken, a numeric suffix is added
//! (`<stem>-<timestamp>-1.csv`, ...). The header opens each file:
//!
//! ```text
//! Generation,Fitness,Accuracy,batch_size,dropout,neurons
//! 0,0.82,0.91,256,0.125,64
//! 1,0.86,0.93,512,0.1,64
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::challenge::ReportMetric;
use super::options::LogFile;
use crate::chromosome::Chromosome;
use crate::error::{GeneticError, Result};
use crate::space::SearchSpace;

const MAX_NAME_ATTEMPTS: usize = 1000;

#[derive(Debug, Clone)]
pub struct CsvLog {
    directory: PathBuf,
    stem: String,
    timestamp: i64,
    path: PathBuf,
    claimed: bool,
    metric: ReportMetric,
    genes: Vec<String>,
}

impl CsvLog {
    /// Resolves the log path for `config`; nothing is written until the first row.
    pub fn new(config: &LogFile, metric: ReportMetric, space: &SearchSpace) -> Self {
        let stem = config
            .base_name
            .split('.')
            .next()
            .unwrap_or_default()
            .to_string();
        let timestamp = Utc::now().timestamp_millis();
        Self {
            path: config.directory.join(file_name(&stem, timestamp, 0)),
            directory: config.directory.clone(),
            stem,
            timestamp,
            claimed: false,
            metric,
            genes: space.names().map(str::to_string).collect(),
        }
    }

    /// The file rows go to. Before the first row this is only the preferred
    /// name; it may gain a suffix when the file is claimed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Makes the next row start a new file.
    pub fn restart(&mut self) {
        self.claimed = false;
    }

    /// Creates the first free file name, never opening an existing file.
    fn claim(&mut self) -> Result<File> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self
                .directory
                .join(file_name(&self.stem, self.timestamp, attempt));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    self.path = path;
                    self.claimed = true;
                    return Ok(file);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(GeneticError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!(
                "No free log file name for '{}-{}' in {}",
                self.stem,
                self.timestamp,
                self.directory.display()
            ),
        )))
    }

    fn header(&self) -> String {
        let mut columns = vec![
            "Generation".to_string(),
            "Fitness".to_string(),
            self.metric.label().to_string(),
        ];
        columns.extend(self.genes.iter().map(|gene| escape(gene)));
        columns.join(",")
    }

    fn row(&self, generation: usize, best: &Chromosome) -> Result<String> {
        let mut fields = vec![
            generation.to_string(),
            best.fitness()?.to_string(),
            best.metrics()
                .get(self.metric)
                .map(|value| value.to_string())
                .unwrap_or_default(),
        ];
        fields.extend(self.genes.iter().map(|gene| {
            best.value(gene)
                .map(|value| escape(&value.to_string()))
                .unwrap_or_default()
        }));
        Ok(fields.join(","))
    }

    /// Appends the row of `generation`. The first row after construction or
    /// [`restart`](Self::restart) claims a new file and writes the header.
    pub fn append(&mut self, generation: usize, best: &Chromosome) -> Result<()> {
        let row = self.row(generation, best)?;

        let mut file = if self.claimed {
            OpenOptions::new().append(true).open(&self.path)?
        } else {
            let mut file = self.claim()?;
            writeln!(file, "{}", self.header())?;
            file
        };
        writeln!(file, "{}", row)?;
        Ok(())
    }
}

fn file_name(stem: &str, timestamp: i64, attempt: usize) -> String {
    if attempt == 0 {
        format!("{}-{}.csv", stem, timestamp)
    } else {
        format!("{}-{}-{}.csv", stem, timestamp, attempt)
    }
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
