//! Human-readable byte counts (SI, base 1000)

const UNIT: u64 = 1000;

/// SI prefixes for exponents 1..=6
const PREFIXES: [char; 6] = ['k', 'M', 'G', 'T', 'P', 'E'];

/// Format a byte count with one decimal and an SI prefix
///
/// `999 → "999 B"`, `1000 → "1.0 kB"`, `2_300_000 → "2.3 MB"`.
pub fn format_bytes(n: u64) -> String {
    if n < UNIT {
        return format!("{} B", n);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut quotient = n / UNIT;
    while quotient >= UNIT && exp + 1 < PREFIXES.len() {
        div *= UNIT;
        exp += 1;
        quotient /= UNIT;
    }

    format!("{:.1} {}B", n as f64 / div as f64, PREFIXES[exp])
}
