//! HTML rendering. Every user- or model-supplied string is escaped.

use html_escape::{encode_double_quoted_attribute, encode_text};

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>docqa</title></head>\n<body>\n{body}</body>\n</html>\n"
    )
}

fn question_form(question: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/\">\n<input type=\"text\" name=\"q\" value=\"{}\" autofocus>\n<button type=\"submit\">Ask</button>\n</form>\n",
        encode_double_quoted_attribute(question)
    )
}

pub fn form_page() -> String {
    layout(&question_form(""))
}

pub fn answer_page(question: &str, answer: &str) -> String {
    layout(&format!(
        "{}<h2>Q: {}</h2>\n<p>A: {}</p>\n",
        question_form(question),
        encode_text(question),
        encode_text(answer)
    ))
}

pub fn error_page(question: &str, message: &str) -> String {
    layout(&format!(
        "{}<p class=\"error\">{}</p>\n",
        question_form(question),
        encode_text(message)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_page_escapes() {
        let page = answer_page("<b>why</b>?", "because <script>alert(1)</script> & more");
        assert!(page.contains("Q: &lt;b&gt;why&lt;/b&gt;?"));
        assert!(page.contains("A: because &lt;script&gt;alert(1)&lt;/script&gt; &amp; more"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn test_form_keeps_question_in_attribute() {
        let page = answer_page("say \"hi\"", "hi");
        assert!(page.contains("value=\"say &quot;hi&quot;\""));
    }

    #[test]
    fn test_form_page() {
        let page = form_page();
        assert!(page.contains("name=\"q\""));
        assert!(page.contains("method=\"post\""));
    }
}
