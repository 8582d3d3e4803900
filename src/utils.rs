//! Utility functions

/// Calculate checksum (CRC32) for data
pub fn calculate_checksum(data: &[u8]) -> u32 {
    let mut crc = 0xFFFFFFFFu32;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB88320;
            } else {
                crc >>= 1;
            }
        }
    }

    !crc
}

/// Content fingerprint of a sample buffer, used to detect in-place edits
pub fn fingerprint<'a>(samples: impl IntoIterator<Item = &'a f32>) -> u32 {
    let bytes: Vec<u8> = samples
        .into_iter()
        .flat_map(|s| s.to_bits().to_le_bytes())
        .collect();
    calculate_checksum(&bytes)
}

/// Format byte size in human-readable form
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Decode a 4-byte IBM hexadecimal float
pub fn ibm_to_ieee(bits: u32) -> f32 {
    let sign = if bits >> 31 == 0 { 1.0 } else { -1.0 };
    let exponent = ((bits >> 24) & 0x7f) as i32 - 64;
    let fraction = (bits & 0x00ff_ffff) as f64 / 16_777_216.0;
    (sign * fraction * 16f64.powi(exponent)) as f32
}

/// Encode a float as a 4-byte IBM hexadecimal float, truncating the fraction
pub fn ieee_to_ibm(value: f32) -> u32 {
    if value == 0.0 || value.is_nan() {
        return 0;
    }

    let sign = if value.is_sign_negative() { 0x8000_0000 } else { 0 };
    let mut fraction = (value as f64).abs();
    let mut exponent = 64i32;

    while fraction >= 1.0 {
        fraction /= 16.0;
        exponent += 1;
    }
    while fraction < 0.0625 {
        fraction *= 16.0;
        exponent -= 1;
    }

    if exponent > 127 {
        return sign | 0x7fff_ffff;
    }
    if exponent < 0 {
        return sign;
    }

    let mantissa = (fraction * 16_777_216.0) as u32 & 0x00ff_ffff;
    sign | ((exponent as u32) << 24) | mantissa
}
