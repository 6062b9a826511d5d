//! Shared fixtures and generators for benchmarks.
//! Deterministic: same seed → same output across runs.

use routemine_analysis::routing::{DemandRecord, OperationRecord, OperationTiming};
use routemine_core::config::NormalizationOptions;

/// A generated routing dataset: operation rows and order lines.
pub struct RoutingDataset {
    pub operations: Vec<OperationRecord>,
    pub demand: Vec<DemandRecord>,
    pub part_count: usize,
}

/// Fixture size presets.
#[derive(Debug, Clone, Copy)]
pub enum FixtureSize {
    /// 20 parts, unit test scale
    Micro,
    /// 200 parts, one product family
    Small,
    /// 2K parts, a plant's portfolio
    Medium,
    /// 20K parts, stress scale
    Large,
}

impl FixtureSize {
    pub fn part_count(&self) -> usize {
        match self {
            Self::Micro => 20,
            Self::Small => 200,
            Self::Medium => 2_000,
            Self::Large => 20_000,
        }
    }

    /// Order lines generated per part, on average.
    pub fn orders_per_part(&self) -> usize {
        match self {
            Self::Micro => 2,
            _ => 3,
        }
    }
}

/// Base routing families, weighted. Parts start from one and get mutated.
struct RouteFamily {
    steps: &'static [&'static str],
    weight: usize,
}

const ROUTE_FAMILIES: &[RouteFamily] = &[
    RouteFamily { steps: &["SAW", "TM", "MILL", "DEB", "CMM"], weight: 30 },
    RouteFamily { steps: &["SAW", "TM", "DEB"], weight: 20 },
    RouteFamily { steps: &["SAW", "MILL", "GRIND", "HT", "GRIND", "CMM"], weight: 15 },
    RouteFamily { steps: &["TM", "MILL", "ET", "WASH"], weight: 15 },
    RouteFamily { steps: &["SAW", "TM", "TM", "MILL", "PACK"], weight: 10 },
    RouteFamily { steps: &["MILL", "DEB", "WASH", "PACK"], weight: 10 },
];

/// Machine variants a routing sheet uses for the same family code.
const VARIANTS: &[(&str, &[&str])] = &[
    ("TM", &["TM1", "TM2", "tm"]),
    ("MILL", &["MILL", "mill ", "MILL2"]),
    ("SAW", &["SAW", " saw"]),
];

/// Inspection steps inserted at random points.
const INSPECTIONS: &[&str] = &["CMM", "ET"];

/// Generate a deterministic routing dataset.
/// Uses a simple PRNG seeded from the given seed for reproducibility.
pub fn generate_dataset(size: FixtureSize, seed: u64) -> RoutingDataset {
    let part_count = size.part_count();
    let mut rng = SimpleRng::new(seed);
    let mut operations = Vec::new();
    let mut demand = Vec::new();

    for i in 0..part_count {
        let part_id = format!("{:06}", 100_000 + i);
        let steps = mutate_route(pick_family(&mut rng).steps, &mut rng);

        for (n, step) in steps.into_iter().enumerate() {
            let timing = OperationTiming {
                setup_hours: (rng.next_u64() % 40) as f64 / 10.0,
                process_hours: (rng.next_u64() % 100) as f64 / 100.0,
                idle_hours: (rng.next_u64() % 20) as f64 / 100.0,
                max_transport_batch: (rng.next_u64() % 50) as u32,
            };
            operations.push(
                OperationRecord::new(part_id.clone(), ((n + 1) * 10) as u32, step).with_timing(timing),
            );
        }

        // Roughly one part in ten is never ordered.
        if rng.next_u64() % 10 != 0 {
            let orders = 1 + (rng.next_u64() as usize) % (2 * size.orders_per_part());
            for _ in 0..orders {
                demand.push(DemandRecord::new(part_id.clone(), (rng.next_u64() % 500) as i64));
            }
        }
    }

    RoutingDataset {
        operations,
        demand,
        part_count,
    }
}

/// Normalization options whose code map folds the generated machine
/// variants (`TM1`, `MILL2`, ...) back to their family codes.
pub fn variant_options() -> NormalizationOptions {
    let map_codes = VARIANTS
        .iter()
        .flat_map(|(family, variants)| {
            variants
                .iter()
                .map(|v| v.trim().to_uppercase())
                .filter(move |v| v != family)
                .map(move |v| (v, family.to_string()))
        })
        .collect();
    NormalizationOptions {
        map_codes,
        ..Default::default()
    }
}

fn pick_family(rng: &mut SimpleRng) -> &'static RouteFamily {
    let total_weight: usize = ROUTE_FAMILIES.iter().map(|f| f.weight).sum();
    let mut pick = (rng.next_u64() as usize) % total_weight;
    for family in ROUTE_FAMILIES {
        if pick < family.weight {
            return family;
        }
        pick -= family.weight;
    }
    &ROUTE_FAMILIES[0]
}

fn mutate_route(base: &[&str], rng: &mut SimpleRng) -> Vec<String> {
    let mut steps: Vec<String> = Vec::with_capacity(base.len() + 2);
    for step in base {
        steps.push(pick_variant(step, rng));
        // Occasional duplicated row for the same machine.
        if rng.next_u64() % 12 == 0 {
            steps.push(step.to_string());
        }
        if rng.next_u64() % 8 == 0 {
            let inspection = INSPECTIONS[(rng.next_u64() as usize) % INSPECTIONS.len()];
            steps.push(inspection.to_string());
        }
    }
    steps
}

fn pick_variant(step: &str, rng: &mut SimpleRng) -> String {
    for (family, variants) in VARIANTS {
        if *family == step && rng.next_u64() % 3 == 0 {
            return variants[(rng.next_u64() as usize) % variants.len()].to_string();
        }
    }
    step.to_string()
}

/// Simple xorshift64 PRNG for deterministic fixture generation.
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_deterministic() {
        let a = generate_dataset(FixtureSize::Micro, 42);
        let b = generate_dataset(FixtureSize::Micro, 42);
        assert_eq!(a.operations, b.operations);
        assert_eq!(a.demand, b.demand);
    }

    #[test]
    fn variant_map_skips_identity() {
        let options = variant_options();
        assert_eq!(options.map_codes.get("TM1").map(String::as_str), Some("TM"));
        assert_eq!(options.map_codes.get("MILL2").map(String::as_str), Some("MILL"));
        assert!(!options.map_codes.iter().any(|(raw, family)| raw == family));
    }
}
