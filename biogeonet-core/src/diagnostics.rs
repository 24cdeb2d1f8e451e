//! Non-fatal data-quality findings collected while deriving tables and
//! metrics.
//!
//! Entities that cannot be classified or measured are skipped and recorded as
//! a [`Diagnostic`]. A computation returns its findings beside its value in a
//! [`Reported`] wrapper; the caller decides whether to surface them. Each
//! report is summarised once through `tracing` rather than logged per entity.

use std::{collections::HashSet, fmt};

use tracing::warn;

/// Why a node could not be classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnclassifiedReason {
    /// The node appears in the hierarchy but in neither relation column.
    AbsentFromRelation,
    /// The entity appears in the relation but not in the hierarchy.
    AbsentFromHierarchy,
    /// The node has no value at the requested level.
    UndefinedAtLevel,
}

impl UnclassifiedReason {
    /// Short machine-readable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AbsentFromRelation => "absent_from_relation",
            Self::AbsentFromHierarchy => "absent_from_hierarchy",
            Self::UndefinedAtLevel => "undefined_at_level",
        }
    }
}

/// A single non-fatal finding.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Diagnostic {
    /// An entity was excluded from entity-specific computations.
    UnclassifiedNode {
        /// Label of the entity.
        name: String,
        /// Why it could not be classified.
        reason: UnclassifiedReason,
    },
    /// A metric could not be computed and was left as `NaN`.
    UndefinedMetric {
        /// Label of the entity (site, species or cluster).
        entity: String,
        /// Name of the undefined metric.
        metric: &'static str,
        /// Short description of the cause.
        cause: &'static str,
    },
}

impl Diagnostic {
    /// Stable kind label used in exported reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnclassifiedNode { .. } => "UNCLASSIFIED_NODE",
            Self::UndefinedMetric { .. } => "UNDEFINED_METRIC",
        }
    }

    /// Label of the entity the finding refers to.
    #[must_use]
    pub fn entity(&self) -> &str {
        match self {
            Self::UnclassifiedNode { name, .. } => name,
            Self::UndefinedMetric { entity, .. } => entity,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnclassifiedNode { name, reason } => {
                write!(f, "unclassified node `{name}` ({})", reason.as_str())
            }
            Self::UndefinedMetric {
                entity,
                metric,
                cause,
            } => write!(f, "{metric} undefined for `{entity}`: {cause}"),
        }
    }
}

/// Ordered collection of [`Diagnostic`] values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticsReport {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticsReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finding.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Records the findings of `other` not already present, preserving
    /// order.
    pub fn merge(&mut self, other: Self) {
        let mut seen: HashSet<Diagnostic> = self.diagnostics.iter().cloned().collect();
        for diagnostic in other.diagnostics {
            if seen.insert(diagnostic.clone()) {
                self.diagnostics.push(diagnostic);
            }
        }
    }

    /// Findings in recording order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of findings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of unclassified-node findings.
    #[must_use]
    pub fn unclassified_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::UnclassifiedNode { .. }))
            .count()
    }

    /// Number of undefined-metric findings.
    #[must_use]
    pub fn undefined_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::UndefinedMetric { .. }))
            .count()
    }

    /// Emits one summary event for this report. Silent when empty.
    pub fn summarise(&self, context: &'static str) {
        if self.is_empty() {
            return;
        }
        let unclassified = self.unclassified_count();
        let undefined = self.undefined_count();
        warn!(
            context,
            unclassified, undefined, "entities skipped during computation"
        );
        #[cfg(feature = "metrics")]
        {
            ::metrics::counter!("biogeonet_unclassified_nodes_total", "context" => context)
                .increment(unclassified as u64);
            ::metrics::counter!("biogeonet_undefined_metrics_total", "context" => context)
                .increment(undefined as u64);
        }
    }
}

impl FromIterator<Diagnostic> for DiagnosticsReport {
    fn from_iter<T: IntoIterator<Item = Diagnostic>>(iter: T) -> Self {
        Self {
            diagnostics: iter.into_iter().collect(),
        }
    }
}

impl Extend<Diagnostic> for DiagnosticsReport {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.diagnostics.extend(iter);
    }
}

/// A computed value together with the findings recorded while computing it.
#[derive(Clone, Debug)]
pub struct Reported<T> {
    value: T,
    report: DiagnosticsReport,
}

impl<T> Reported<T> {
    /// Pairs `value` with `report`.
    #[must_use]
    pub fn new(value: T, report: DiagnosticsReport) -> Self {
        Self { value, report }
    }

    /// The computed value.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The recorded findings.
    #[must_use]
    pub fn report(&self) -> &DiagnosticsReport {
        &self.report
    }

    /// Splits into value and findings.
    #[must_use]
    pub fn into_parts(self) -> (T, DiagnosticsReport) {
        (self.value, self.report)
    }

    /// Discards the findings.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }
}
