//! Content-based hashing for run IDs.

use crate::types::PointInput;
use axc_config::RawConfig;
use sha2::{Digest, Sha256};

pub fn compute_run_id(deck: &RawConfig, points: &[PointInput], solver_version: &str) -> String {
    let mut hasher = Sha256::new();

    let deck_json = serde_json::to_string(deck).unwrap_or_default();
    hasher.update(deck_json.as_bytes());

    let points_json = serde_json::to_string(points).unwrap_or_default();
    hasher.update(points_json.as_bytes());

    hasher.update(solver_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(rpm: &str) -> RawConfig {
        let mut raw = RawConfig::new();
        raw.insert("CONSTANT", "n_stages", "1");
        raw.insert("ROTATION", "rpm", rpm);
        raw
    }

    fn point() -> PointInput {
        PointInput {
            rpm: 10_000.0,
            mass_flow: 100.0,
            total_pressure: 101_325.0,
            total_temperature: 288.15,
            swirl_deg: 0.0,
        }
    }

    #[test]
    fn hash_stability() {
        let a = compute_run_id(&deck("10000"), &[point()], "v1");
        let b = compute_run_id(&deck("10000"), &[point()], "v1");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let base = compute_run_id(&deck("10000"), &[point()], "v1");
        assert_ne!(base, compute_run_id(&deck("9000"), &[point()], "v1"));
        let mut other = point();
        other.mass_flow = 90.0;
        assert_ne!(base, compute_run_id(&deck("10000"), &[other], "v1"));
        assert_ne!(base, compute_run_id(&deck("10000"), &[point()], "v2"));
    }
}
