//! Plot configuration: which attributes occupy the categorical axis roles
//!
//! Every mutation bumps a generation counter. The cache compares the
//! counter it last built against and rebuilds on mismatch, so
//! configuration staleness is explicit and testable instead of hidden
//! inside a manually invalidated snapshot.

use crate::axis::CellClassifier;

/// An attribute bound to one axis role, together with its classifier.
/// The two are assigned and cleared as a unit.
pub struct AxisSlot {
    pub attr: usize,
    pub classifier: Box<dyn CellClassifier>,
}

/// Axis assignments for one categorical chart: primary and secondary
/// categorical roles, plus an optional legend attribute used purely as a
/// validity filter.
pub struct ChartConfig {
    primary: Option<AxisSlot>,
    secondary: Option<AxisSlot>,
    legend: Option<usize>,
    generation: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartConfig {
    pub fn new() -> Self {
        Self {
            primary: None,
            secondary: None,
            legend: None,
            generation: 0,
        }
    }

    /// Counter distinguishing configurations over time. Any mutation
    /// bumps it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn primary(&self) -> Option<&AxisSlot> {
        self.primary.as_ref()
    }

    pub fn secondary(&self) -> Option<&AxisSlot> {
        self.secondary.as_ref()
    }

    pub fn legend(&self) -> Option<usize> {
        self.legend
    }

    pub fn set_primary(&mut self, attr: usize, classifier: Box<dyn CellClassifier>) {
        self.primary = Some(AxisSlot { attr, classifier });
        self.touch();
    }

    pub fn set_secondary(&mut self, attr: usize, classifier: Box<dyn CellClassifier>) {
        self.secondary = Some(AxisSlot { attr, classifier });
        self.touch();
    }

    pub fn clear_primary(&mut self) {
        self.primary = None;
        self.touch();
    }

    pub fn clear_secondary(&mut self) {
        self.secondary = None;
        self.touch();
    }

    /// Assign or clear the legend attribute.
    pub fn set_legend(&mut self, attr: Option<usize>) {
        self.legend = attr;
        self.touch();
    }

    /// Clear every assignment.
    pub fn reset(&mut self) {
        self.primary = None;
        self.secondary = None;
        self.legend = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Snapshot of everything one binning pass reads: both classifiers
    /// and the attribute ids, captured once at the top of the pass.
    /// `None` until both axes are configured.
    pub fn context(&self) -> Option<BinningContext<'_>> {
        let primary = self.primary.as_ref()?;
        let secondary = self.secondary.as_ref()?;
        Some(BinningContext {
            primary: primary.classifier.as_ref(),
            secondary: secondary.classifier.as_ref(),
            primary_attr: primary.attr,
            secondary_attr: secondary.attr,
            legend_attr: self.legend,
        })
    }
}

/// The computation context for one binning pass.
pub struct BinningContext<'a> {
    pub primary: &'a dyn CellClassifier,
    pub secondary: &'a dyn CellClassifier,
    pub primary_attr: usize,
    pub secondary_attr: usize,
    pub legend_attr: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::CategoryAxis;
    use crate::data::Value;

    fn axis(names: &[&str]) -> Box<dyn CellClassifier> {
        let values: Vec<Value> = names.iter().map(|n| Value::text(*n)).collect();
        Box::new(CategoryAxis::from_values(&values))
    }

    #[test]
    fn test_context_requires_both_axes() {
        let mut config = ChartConfig::new();
        assert!(config.context().is_none());

        config.set_primary(0, axis(&["a", "b"]));
        assert!(config.context().is_none());

        config.set_secondary(1, axis(&["x"]));
        let context = config.context().unwrap();
        assert_eq!(context.primary_attr, 0);
        assert_eq!(context.secondary_attr, 1);
        assert_eq!(context.legend_attr, None);
    }

    #[test]
    fn test_every_mutation_bumps_generation() {
        let mut config = ChartConfig::new();
        let mut last = config.generation();
        config.set_primary(0, axis(&["a"]));
        assert_ne!(config.generation(), last);

        last = config.generation();
        config.set_legend(Some(2));
        assert_ne!(config.generation(), last);

        last = config.generation();
        config.clear_primary();
        assert_ne!(config.generation(), last);

        last = config.generation();
        config.reset();
        assert_ne!(config.generation(), last);
    }
}
