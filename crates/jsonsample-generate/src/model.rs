use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use jsonsample_core::Position;

/// Options for the synthesis engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisOptions {
    /// Seed for the fake value generators; a random one is drawn when absent.
    pub seed: Option<u64>,
    /// Indentation unit of the rendered text.
    pub indent: String,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            seed: None,
            indent: "\t".to_string(),
        }
    }
}

/// Rendered sample of one top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDeclaration {
    pub name: String,
    pub text: String,
}

/// Field left out of the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisIssue {
    pub code: String,
    pub message: String,
    pub declaration: String,
    pub field: String,
    pub position: Position,
}

/// Per-declaration field counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationReport {
    pub name: String,
    pub fields_synthesized: u64,
    pub fields_excluded: u64,
    pub fields_omitted: u64,
}

/// Report for a synthesis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub seed: u64,
    pub duration_ms: u64,
    pub declarations: Vec<DeclarationReport>,
    pub generator_usage: BTreeMap<String, u64>,
    pub issues_by_code: BTreeMap<String, u64>,
    pub issues: Vec<SynthesisIssue>,
}

impl SynthesisReport {
    pub fn new(run_id: String, seed: u64) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            seed,
            duration_ms: 0,
            declarations: Vec::new(),
            generator_usage: BTreeMap::new(),
            issues_by_code: BTreeMap::new(),
            issues: Vec::new(),
        }
    }

    pub fn record_generator_usage(&mut self, id: &str) {
        *self.generator_usage.entry(id.to_string()).or_insert(0) += 1;
    }

    pub fn record_declaration(&mut self, declaration: DeclarationReport) {
        self.declarations.push(declaration);
    }

    pub fn record_issue(&mut self, issue: SynthesisIssue) {
        *self.issues_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.issues.push(issue);
    }

    pub fn declaration(&self, name: &str) -> Option<&DeclarationReport> {
        self.declarations
            .iter()
            .find(|declaration| declaration.name == name)
    }
}
