pub fn get_md5(s: &str) -> String {
    let digest = md5::compute(s);
    format!("{:x}", digest)
}

/// Milliseconds since the unix epoch, used to keep synthetic playlist ids unique
pub fn timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Format a duration the way the playback host renders time codes.
///
/// Leading zero units are dropped and the remaining ones are zero padded,
/// so `5_000` is `0:05`, `185_000` is `03:05` and `3_723_000` is `01:02:03`.
pub fn build_time_code(duration_ms: u64) -> String {
    let total = duration_ms / 1000;
    let units = [
        total / 86_400,
        (total / 3_600) % 24,
        (total / 60) % 60,
        total % 60,
    ];

    let Some(first) = units.iter().position(|&u| u != 0) else {
        return "0:00".to_string();
    };

    let code = units[first..]
        .iter()
        .map(|u| format!("{:02}", u))
        .collect::<Vec<_>>()
        .join(":");

    if code.len() <= 3 {
        format!("0:{}", code)
    } else {
        code
    }
}
