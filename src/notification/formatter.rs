//! 消息格式化模块 - 将事件转换为 HTML 安全的聊天消息
//!
//! 所有用户输入的文本在插入前都要转义，防止消息中注入标签。

use super::event::NotificationEvent;

/// 评论保留的最大词数
pub const COMMENT_MAX_WORDS: usize = 20;

/// 截断后追加的省略号
pub const ELLIPSIS: &str = "…";

/// HTML 转义（`& < > " '`）
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 按 ASCII 空白切词（全角空格等不作为分隔符），保留前 `max_words` 个并以单个空格连接
///
/// 原文超过 `max_words` 个词时追加省略号；空白输入返回 None。
pub fn truncate_words(text: &str, max_words: usize) -> Option<String> {
    let words: Vec<&str> = text.split_ascii_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    let mut result = words
        .iter()
        .take(max_words)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if words.len() > max_words {
        result.push_str(ELLIPSIS);
    }
    Some(result)
}

/// 消息格式化器
pub struct MessageFormatter {
    comment_max_words: usize,
}

impl MessageFormatter {
    pub fn new() -> Self {
        Self {
            comment_max_words: COMMENT_MAX_WORDS,
        }
    }

    /// 设置评论截断词数
    pub fn with_comment_max_words(mut self, max_words: usize) -> Self {
        self.comment_max_words = max_words;
        self
    }

    /// 格式化事件消息
    pub fn format(&self, event: &NotificationEvent) -> String {
        match event {
            NotificationEvent::IssueCreated {
                actor,
                project,
                category,
                issue_id,
                subject,
                url,
            } => Self::issue_line("reported", actor, project, category, *issue_id, subject, url.as_deref()),
            NotificationEvent::IssueUpdated {
                actor,
                project,
                category,
                issue_id,
                subject,
                comment,
                url,
            } => {
                let mut text =
                    Self::issue_line("updated", actor, project, category, *issue_id, subject, url.as_deref());
                let truncated = comment
                    .as_deref()
                    .and_then(|c| truncate_words(c, self.comment_max_words));
                if let Some(comment) = truncated {
                    text.push_str(&format!(": <i>{}</i>", escape_html(&comment)));
                }
                text
            }
            NotificationEvent::WikiPageEdited {
                actor,
                project,
                page_title,
                url,
            } => format!(
                "{} edited {} wiki page <a href=\"{}\">{}</a>",
                escape_html(actor),
                escape_html(project),
                escape_html(url.as_deref().unwrap_or("")),
                escape_html(page_title)
            ),
        }
    }

    fn issue_line(
        verb: &str,
        actor: &str,
        project: &str,
        category: &str,
        issue_id: u64,
        subject: &str,
        url: Option<&str>,
    ) -> String {
        format!(
            "{} {} {} {} <a href=\"{}\">#{}</a>: {}",
            escape_html(actor),
            verb,
            escape_html(project),
            escape_html(&category.to_lowercase()),
            escape_html(url.unwrap_or("")),
            issue_id,
            escape_html(subject)
        )
    }
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (1..=n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_truncate_short_text() {
        assert_eq!(truncate_words("  fix   the\nbug ", 20).as_deref(), Some("fix the bug"));
    }

    #[test]
    fn test_truncate_exact_limit_has_no_ellipsis() {
        let text = words(20);
        assert_eq!(truncate_words(&text, 20), Some(text.clone()));
    }

    #[test]
    fn test_truncate_long_text() {
        let truncated = truncate_words(&words(21), 20).unwrap();
        assert_eq!(truncated, format!("{}{}", words(20), ELLIPSIS));
    }

    #[test]
    fn test_truncate_keeps_non_ascii_spaces_inside_words() {
        assert_eq!(truncate_words("a\u{3000}b c", 20).as_deref(), Some("a\u{3000}b c"));
        assert_eq!(truncate_words("a\u{3000}b c d", 2).as_deref(), Some("a\u{3000}b c…"));
    }

    #[test]
    fn test_truncate_blank() {
        assert!(truncate_words("", 20).is_none());
        assert!(truncate_words(" \t\n", 20).is_none());
    }

    #[test]
    fn test_format_issue_created() {
        let event = NotificationEvent::IssueCreated {
            actor: "Alice".to_string(),
            project: "Demo".to_string(),
            category: "Bug".to_string(),
            issue_id: 42,
            subject: "Crash on save".to_string(),
            url: Some("https://t.example.com/issues/42".to_string()),
        };
        assert_eq!(
            MessageFormatter::new().format(&event),
            r#"Alice reported Demo bug <a href="https://t.example.com/issues/42">#42</a>: Crash on save"#
        );
    }

    #[test]
    fn test_format_issue_updated_without_comment() {
        let event = NotificationEvent::IssueUpdated {
            actor: "Alice".to_string(),
            project: "Demo".to_string(),
            category: "Feature".to_string(),
            issue_id: 7,
            subject: "Export".to_string(),
            comment: Some("   ".to_string()),
            url: Some("u".to_string()),
        };
        assert_eq!(
            MessageFormatter::new().format(&event),
            r#"Alice updated Demo feature <a href="u">#7</a>: Export"#
        );
    }

    #[test]
    fn test_format_issue_updated_with_comment() {
        let event = NotificationEvent::IssueUpdated {
            actor: "Alice".to_string(),
            project: "Demo".to_string(),
            category: "Bug".to_string(),
            issue_id: 7,
            subject: "Export".to_string(),
            comment: Some("a <b> c d".to_string()),
            url: Some("u".to_string()),
        };
        let text = MessageFormatter::new().with_comment_max_words(3).format(&event);
        assert_eq!(
            text,
            r#"Alice updated Demo bug <a href="u">#7</a>: Export: <i>a &lt;b&gt; c…</i>"#
        );
    }

    #[test]
    fn test_format_wiki_edit() {
        let event = NotificationEvent::WikiPageEdited {
            actor: "Bob".to_string(),
            project: "Demo".to_string(),
            page_title: "Home".to_string(),
            url: Some("https://t.example.com/projects/demo/wiki/Home".to_string()),
        };
        assert_eq!(
            MessageFormatter::new().format(&event),
            r#"Bob edited Demo wiki page <a href="https://t.example.com/projects/demo/wiki/Home">Home</a>"#
        );
    }

    #[test]
    fn test_missing_url_renders_empty_href() {
        let event = NotificationEvent::WikiPageEdited {
            actor: "Bob".to_string(),
            project: "Demo".to_string(),
            page_title: "Home".to_string(),
            url: None,
        };
        assert!(MessageFormatter::new().format(&event).contains(r#"<a href="">Home</a>"#));
    }

    #[test]
    fn test_user_fields_are_escaped() {
        let hostile = r#"<script>"x" & y</script>"#;
        let event = NotificationEvent::IssueUpdated {
            actor: hostile.to_string(),
            project: hostile.to_string(),
            category: hostile.to_string(),
            issue_id: 1,
            subject: hostile.to_string(),
            comment: Some(hostile.to_string()),
            url: None,
        };
        let text = MessageFormatter::new().format(&event);
        // 去掉格式化器自己的标签后不应再有原始特殊字符
        let stripped = text
            .replace(r#"<a href="">"#, "")
            .replace("</a>", "")
            .replace("<i>", "")
            .replace("</i>", "");
        for c in ['<', '>', '"'] {
            assert!(!stripped.contains(c), "raw {:?} in {}", c, text);
        }
        assert!(!stripped.replace("&amp;", "").replace("&lt;", "").replace("&gt;", "").replace("&quot;", "").contains('&'));
    }
}
