use regex::Regex;
use std::sync::OnceLock;
use tracing::error;

/// `(major identifier group, pattern)` pairs. A group matches a major when
/// the group text contains the major id.
const ORIENTATION_PATTERNS: &[(&str, &str)] = &[
    ("ai", "ai|trí tuệ nhân tạo|dữ liệu|data|machine"),
    ("data", "data|dữ liệu"),
    ("software", "kỹ thuật|it|phần mềm|software|dev"),
    ("webdev", "web|frontend|backend"),
    ("cybersec", "bảo mật|security"),
    ("graphic", "thiết kế|design|ui|ux"),
    ("marketing", "marketing|truyền thông"),
    ("emarket", "thương mại|e-?commerce"),
    ("business", "quản trị|business|doanh"),
    ("hotel|tourism", "khách sạn|du lịch"),
    (
        "mechatronics|electronics|automotive",
        "kỹ thuật|cơ khí|điện|ô tô",
    ),
    ("logistics", "logistics|chuỗi cung ứng"),
];

struct OrientationRule {
    group: &'static str,
    pattern: Regex,
}

fn orientation_rules() -> &'static [OrientationRule] {
    static RULES: OnceLock<Vec<OrientationRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        ORIENTATION_PATTERNS
            .iter()
            .filter_map(|&(group, pattern)| match Regex::new(pattern) {
                Ok(pattern) => Some(OrientationRule { group, pattern }),
                Err(err) => {
                    error!(group, %err, "skipping orientation pattern that does not compile");
                    None
                }
            })
            .collect()
    })
}

/// True when the lower-cased orientation matches a pattern whose group
/// names `major_id`.
pub(crate) fn orientation_matches(major_id: &str, orientation: &str) -> bool {
    if major_id.is_empty() {
        return false;
    }
    let lowered = orientation.to_lowercase();
    orientation_rules()
        .iter()
        .any(|rule| rule.group.contains(major_id) && rule.pattern.is_match(&lowered))
}
