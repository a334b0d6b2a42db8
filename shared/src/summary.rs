//! Display preparation for the AI financial summary.

/// Marker the summary uses for its traffic-light conclusion line
pub const ALERT_MARKER: &str = "三色预警结论";

/// Traffic-light level of the conclusion line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Green,
    Yellow,
    Red,
}

impl AlertLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            AlertLevel::Green => "alert-green",
            AlertLevel::Yellow => "alert-yellow",
            AlertLevel::Red => "alert-red",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub text: String,
    pub alert: Option<AlertLevel>,
}

/// Split the summary text into display lines, tagging the conclusion line
pub fn summary_lines(text: &str) -> Vec<SummaryLine> {
    text.split('\n')
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            SummaryLine {
                text: line.to_string(),
                alert: alert_level(line),
            }
        })
        .collect()
}

fn alert_level(line: &str) -> Option<AlertLevel> {
    if !line.starts_with(ALERT_MARKER) {
        return None;
    }
    Some(if line.contains('绿') {
        AlertLevel::Green
    } else if line.contains('黄') {
        AlertLevel::Yellow
    } else {
        AlertLevel::Red
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_are_split_in_order() {
        let lines = summary_lines("收入稳定\n支出偏高\r\n\n建议控制餐饮");
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["收入稳定", "支出偏高", "", "建议控制餐饮"]);
        assert!(lines.iter().all(|l| l.alert.is_none()));
    }

    #[test]
    fn test_conclusion_line_levels() {
        let green = summary_lines("三色预警结论：绿灯，财务健康");
        assert_eq!(green[0].alert, Some(AlertLevel::Green));

        let yellow = summary_lines("三色预警结论：黄灯");
        assert_eq!(yellow[0].alert, Some(AlertLevel::Yellow));

        let red = summary_lines("三色预警结论：红灯");
        assert_eq!(red[0].alert, Some(AlertLevel::Red));
    }

    #[test]
    fn test_marker_must_start_the_line() {
        let lines = summary_lines("参见 三色预警结论：绿灯");
        assert_eq!(lines[0].alert, None);
    }
}
