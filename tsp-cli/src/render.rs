use serde_json::Value;

// ── ANSI constants ──────────────────────────────────────────────────

pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const RED: &str = "\x1b[31m";
pub const CYAN: &str = "\x1b[36m";
pub const YELLOW: &str = "\x1b[33m";
pub const RESET: &str = "\x1b[0m";

pub fn print_banner() {
    let cyan = "\x1b[36m";
    let magenta = "\x1b[35m";
    let yellow = "\x1b[33m";
    let dim = "\x1b[2m";
    let reset = "\x1b[0m";

    eprintln!(
        r#"
{cyan} ████████╗{magenta} ███████╗{yellow} ██████╗ {reset}
{cyan} ╚══██╔══╝{magenta} ██╔════╝{yellow} ██╔══██╗{reset}
{cyan}    ██║   {magenta} ███████╗{yellow} ██████╔╝{reset}
{cyan}    ██║   {magenta} ╚════██║{yellow} ██╔═══╝ {reset}
{cyan}    ██║   {magenta} ███████║{yellow} ██║     {reset}
{cyan}    ╚═╝   {magenta} ╚══════╝{yellow} ╚═╝     {reset}
{dim}  Trust Service Provider controller v{version}{reset}
"#,
        version = env!("CARGO_PKG_VERSION"),
    );
}

pub fn print_section(title: &str) {
    let pad = 46usize.saturating_sub(title.len());
    println!(
        "\n{DIM}──{RESET} {BOLD}{title}{RESET} {DIM}{}{RESET}",
        "─".repeat(pad)
    );
}

/// Progress step of the demo flow.
pub fn log_status(msg: &str) {
    println!("{BOLD}{GREEN}{msg}{RESET}");
}

pub fn log_msg(msg: &str) {
    println!("{msg}");
}

pub fn log_warn(msg: &str) {
    println!("{YELLOW}{msg}{RESET}");
}

pub fn log_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{CYAN}{text}{RESET}"),
        Err(_) => println!("{value}"),
    }
}

/// Rows of the agent's `timing` status block, slowest total first.
pub fn format_timing(timing: &Value) -> Vec<String> {
    let Some(counts) = timing.get("count").and_then(Value::as_object) else {
        return Vec::new();
    };
    let number = |section: &str, name: &str| {
        timing
            .get(section)
            .and_then(|s| s.get(name))
            .and_then(Value::as_f64)
            .unwrap_or_default()
    };

    let mut rows: Vec<(String, u64, f64, f64)> = counts
        .iter()
        .map(|(name, count)| {
            (
                name.chars().take(35).collect(),
                count.as_u64().unwrap_or_default(),
                number("total", name),
                number("avg", name),
            )
        })
        .collect();
    rows.sort_by(|a, b| b.2.total_cmp(&a.2));

    let mut lines = vec![
        format!("{:35} | {:>12} {:>12} {:>10}", "", "count", "total", "avg"),
        format!("{:35} | {:>12} {:>12} {:>10}", "", "-----", "-----", "---"),
    ];
    lines.extend(
        rows.into_iter()
            .map(|(name, count, total, avg)| format!("{name:35} | {count:>12} {total:>12.3} {avg:>10.3}")),
    );
    lines
}

/// `"Published revocations for 2 revocation registries [...]"`.
pub fn published_revocations_message<'a>(registries: impl ExactSizeIterator<Item = &'a String>) -> String {
    let count = registries.len();
    let ids: Vec<&String> = registries.collect();
    let listed = serde_json::to_string_pretty(&ids).unwrap_or_default();
    format!(
        "Published revocations for {count} revocation registr{} {listed}",
        if count == 1 { "y" } else { "ies" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_timing_sorted_by_total() {
        let timing = json!({
            "count": {"fast": 2, "slow": 1},
            "total": {"fast": 0.5, "slow": 3.25},
            "avg": {"fast": 0.25, "slow": 3.25},
        });
        let lines = format_timing(&timing);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("count"));
        assert!(lines[2].starts_with("slow"));
        assert!(lines[2].ends_with("3.250      3.250"));
        assert!(lines[3].starts_with("fast"));
    }

    #[test]
    fn test_format_timing_without_counts() {
        assert!(format_timing(&json!({})).is_empty());
    }

    #[test]
    fn test_published_revocations_singular_and_plural() {
        let one = vec!["reg-1".to_string()];
        let msg = published_revocations_message(one.iter());
        assert!(msg.starts_with("Published revocations for 1 revocation registry ["));
        assert!(msg.contains("\"reg-1\""));

        let two = vec!["a".to_string(), "b".to_string()];
        let msg = published_revocations_message(two.iter());
        assert!(msg.starts_with("Published revocations for 2 revocation registries"));
    }
}
