//! Sequence normalization.
//!
//! Per token, in order: strip, uppercase, code map, drop, immediate-repeat
//! collapse. An optional second pass keeps only the first visit of each step.

use rayon::prelude::*;
use routemine_core::config::NormalizationConfig;
use routemine_core::types::collections::FxHashSet;

use super::types::{NormalizedPart, Part};

/// Separator between tokens in a signature.
pub const SIGNATURE_SEPARATOR: &str = " -> ";

/// Normalize one raw step sequence. Pure and total: the same input and
/// config always yield the same output, and an empty input yields an empty
/// output.
pub fn normalize<I, S>(raw_sequence: I, config: &NormalizationConfig) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut kept: Vec<String> = Vec::new();

    for raw in raw_sequence {
        let token = config.canonical_step(raw.as_ref());
        if config.is_dropped(&token) {
            continue;
        }
        if config.remove_immediate_repeats() && kept.last() == Some(&token) {
            continue;
        }
        kept.push(token);
    }

    if config.remove_self_loops_anywhere() {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        kept.retain(|token| seen.insert(token.clone()));
    }

    kept
}

/// Join tokens with `" -> "`. The empty sequence has the empty signature.
pub fn signature<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            out.push_str(SIGNATURE_SEPARATOR);
        }
        out.push_str(token.as_ref());
    }
    out
}

/// Normalize every part in parallel. Output order matches input order.
pub fn normalize_parts(parts: &[Part], config: &NormalizationConfig) -> Vec<NormalizedPart> {
    parts
        .par_iter()
        .map(|part| NormalizedPart {
            part_id: part.part_id.clone(),
            demand: part.demand,
            tokens: normalize(part.raw_sequence(), config),
        })
        .collect()
}
