use std::sync::OnceLock;

use regex::Regex;

static WIRELESS_LINE_RE: OnceLock<Regex> = OnceLock::new();

fn wireless_line_re() -> &'static Regex {
    WIRELESS_LINE_RE.get_or_init(|| {
        Regex::new(r"(?m)^[a-zA-Z0-9]+\s*IEEE 802\.11.*$").expect("wireless line regex is valid")
    })
}

/// Names of the wireless interfaces listed in `iwconfig` output.
pub fn parse_interfaces(output: &str) -> Vec<String> {
    wireless_line_re()
        .find_iter(output)
        .filter_map(|line| line.as_str().split_whitespace().next())
        .map(str::to_string)
        .collect()
}
