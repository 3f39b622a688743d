//! Markdown review report.

use roos_common::ManualReviewItem;

const BASE_AUTOMATION: usize = 95;
const PER_ITEM: usize = 5;
const MIN_AUTOMATION: usize = 50;

/// Share of the conversion considered automatic; never reaches 100
pub fn automation_percentage(review_items: usize) -> usize {
    BASE_AUTOMATION
        .saturating_sub(PER_ITEM.saturating_mul(review_items))
        .max(MIN_AUTOMATION)
}

pub fn review_document(name: &str, items: &[ManualReviewItem]) -> String {
    let automation = automation_percentage(items.len());
    let mut lines = vec![
        format!("# {} Conversion Review", title_case(name)),
        String::new(),
        format!("## Automatic Conversion: {}%", automation),
        format!("## Manual Review Required: {}%", 100 - automation),
        String::new(),
    ];

    if items.is_empty() {
        lines.push("No manual review items! ✅".to_string());
        lines.push(String::new());
    } else {
        lines.push("### Items Requiring Review:".to_string());
        lines.push(String::new());
        for (i, item) in items.iter().enumerate() {
            let line = item
                .line
                .map(|l| l.to_string())
                .unwrap_or_else(|| "?".to_string());
            lines.push(format!("{}. **{}** (line {})", i + 1, item.issue, line));
            lines.push(format!("   - Severity: {}", item.severity));
            if let Some(pattern) = &item.context {
                lines.push(format!("   - Pattern: `{}`", pattern));
            }
            if let Some(action) = &item.action {
                lines.push(format!("   - Action: {}", action));
            }
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

/// Capitalize the first letter of every alphabetic run, lowercase the rest
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_alpha = true;
        } else {
            out.push(c);
            previous_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_automation_percentage() {
        assert_eq!(automation_percentage(0), 95);
        assert_eq!(automation_percentage(3), 80);
        assert_eq!(automation_percentage(20), 50);
        assert_eq!(automation_percentage(200), 50);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("progress-tracker"), "Progress-Tracker");
        assert_eq!(title_case("button_2x"), "Button_2X");
    }

    #[test]
    fn test_review_document() {
        let items = vec![
            ManualReviewItem::medium("Unsupported expression")
                .with_context("render()")
                .with_line(14)
                .with_action("Translate by hand"),
            ManualReviewItem::low("Renamed attribute"),
        ];
        assert_eq!(
            review_document("button", &items),
            "# Button Conversion Review\n\
             \n\
             ## Automatic Conversion: 85%\n\
             ## Manual Review Required: 15%\n\
             \n\
             ### Items Requiring Review:\n\
             \n\
             1. **Unsupported expression** (line 14)\n   - Severity: medium\n   - Pattern: `render()`\n   - Action: Translate by hand\n\
             \n\
             2. **Renamed attribute** (line ?)\n   - Severity: low\n"
        );
    }

    #[test]
    fn test_review_document_without_items() {
        assert!(review_document("alert", &[]).ends_with("## Manual Review Required: 5%\n\nNo manual review items! ✅\n"));
    }
}
