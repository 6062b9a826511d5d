//! Record assembly: flat operation and demand records → parts.

use routemine_core::errors::AnalysisError;
use routemine_core::types::collections::FxHashMap;
use tracing::{debug, warn};

use super::types::{DemandRecord, OperationRecord, Part, RoutingStep};

/// Parts built from records, plus what was discarded on the way.
#[derive(Debug, Clone)]
pub struct AssembledParts {
    pub parts: Vec<Part>,
    pub report: AssemblyReport,
}

/// Counts gathered while assembling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    pub operation_count: usize,
    pub demand_record_count: usize,
    /// Distinct part ids with demand but no routing.
    pub unknown_demand_parts: usize,
    /// Quantity carried by those parts.
    pub unknown_demand_quantity: u64,
}

/// Group operations by part and attach summed demand.
///
/// Parts appear in first-appearance order of their operations. Steps are
/// ordered by sequence number; equal numbers keep record order. Demand is
/// summed per part id and defaults to 0. Any negative quantity is fatal.
pub fn assemble_parts(
    operations: &[OperationRecord],
    demand: &[DemandRecord],
) -> Result<AssembledParts, AnalysisError> {
    let mut demand_by_part: FxHashMap<&str, u64> = FxHashMap::default();
    for record in demand {
        let quantity = u64::try_from(record.quantity).map_err(|_| AnalysisError::NegativeDemand {
            part_id: record.part_id.clone(),
            quantity: record.quantity,
        })?;
        *demand_by_part.entry(record.part_id.as_str()).or_insert(0) += quantity;
    }

    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut grouped: Vec<(&str, Vec<&OperationRecord>)> = Vec::new();
    for op in operations {
        let slot = *index.entry(op.part_id.as_str()).or_insert_with(|| {
            grouped.push((op.part_id.as_str(), Vec::new()));
            grouped.len() - 1
        });
        grouped[slot].1.push(op);
    }

    let parts: Vec<Part> = grouped
        .into_iter()
        .map(|(part_id, mut ops)| {
            ops.sort_by_key(|op| op.sequence_number);
            Part {
                part_id: part_id.to_string(),
                steps: ops
                    .into_iter()
                    .map(|op| RoutingStep {
                        token: op.step.clone(),
                        timing: op.timing,
                    })
                    .collect(),
                demand: demand_by_part.get(part_id).copied().unwrap_or(0),
            }
        })
        .collect();

    let mut report = AssemblyReport {
        operation_count: operations.len(),
        demand_record_count: demand.len(),
        ..Default::default()
    };
    for (part_id, quantity) in &demand_by_part {
        if !index.contains_key(part_id) {
            report.unknown_demand_parts += 1;
            report.unknown_demand_quantity += quantity;
        }
    }

    if report.unknown_demand_parts > 0 {
        warn!(
            parts = report.unknown_demand_parts,
            quantity = report.unknown_demand_quantity,
            "Demand recorded for parts without routing; ignored"
        );
    }
    debug!(parts = parts.len(), operations = report.operation_count, "Assembled parts");

    Ok(AssembledParts { parts, report })
}
