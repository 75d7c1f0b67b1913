//! Limiter blocks and rate formatting.

use crate::document::LimiterConfig;

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// Human-readable bandwidth value as the engine's limiter expects it.
///
/// Whole bytes below 1 KiB, two decimals in the largest fitting unit above.
pub fn format_rate(bytes: u64) -> String {
    match bytes {
        b if b < KIB => format!("{b}B"),
        b if b < MIB => format!("{:.2}KB", b as f64 / KIB as f64),
        b if b < GIB => format!("{:.2}MB", b as f64 / MIB as f64),
        b => format!("{:.2}GB", b as f64 / GIB as f64),
    }
}

/// Bandwidth limiter applying to all traffic (`$` scope).
pub fn speed_limiter(name: &str, bytes_per_sec: u64) -> LimiterConfig {
    LimiterConfig {
        name: name.to_string(),
        limits: vec![format!("$ {}", format_rate(bytes_per_sec))],
    }
}

/// Connection rate limiter in new connections per second.
pub fn rate_limiter(name: &str, per_sec: u32) -> LimiterConfig {
    LimiterConfig {
        name: name.to_string(),
        limits: vec![format!("$ {per_sec}/s")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_boundaries() {
        assert_eq!(format_rate(0), "0B");
        assert_eq!(format_rate(1023), "1023B");
        assert_eq!(format_rate(1024), "1.00KB");
        assert_eq!(format_rate(1_048_575), "1024.00KB");
        assert_eq!(format_rate(1_048_576), "1.00MB");
        assert_eq!(format_rate(1_073_741_824), "1.00GB");
    }

    #[test]
    fn fractional_units() {
        assert_eq!(format_rate(1536), "1.50KB");
        assert_eq!(format_rate(10 * MIB + MIB / 4), "10.25MB");
        assert_eq!(format_rate(5 * GIB), "5.00GB");
    }

    #[test]
    fn limiter_entries() {
        assert_eq!(speed_limiter("speed-limiter", 2048).limits, ["$ 2.00KB"]);
        assert_eq!(rate_limiter("rate-limiter", 50).limits, ["$ 50/s"]);
    }
}
