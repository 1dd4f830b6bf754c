//! Renders snippet code to a standalone, syntax-coloured HTML document.

use crate::error::AppError;
use crate::model::{Language, Style};
use std::fmt::Write;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{start_highlighted_html_snippet, styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tera::{Context, Tera};

/// Page around the coloured block; `title` is autoescaped, `pre` is already markup.
const PAGE_TEMPLATE: &str = "<!DOCTYPE html>
<html>
<head>
<meta charset=\"utf-8\">
<title>{{ title }}</title>
<style>.lineno { color: #888; user-select: none; }</style>
</head>
<body>
<h2>{{ title }}</h2>
<div class=\"highlight\">
{{ pre | safe }}</div>
</body>
</html>
";

/// Loaded syntax definitions and themes. Expensive to build; create once and share.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Highlighter {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            themes: ThemeSet::load_defaults(),
        }
    }

    /// Full HTML page for the snippet: title heading plus a coloured `<pre>` block.
    pub fn render(
        &self,
        title: &str,
        code: &str,
        language: Language,
        style: Style,
        linenos: bool,
    ) -> Result<String, AppError> {
        let syntax = self
            .syntaxes
            .find_syntax_by_token(language.syntax_token())
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text());
        let fallback = Theme::default();
        let theme = self.themes.themes.get(style.theme_name()).unwrap_or_else(|| {
            tracing::warn!(theme = style.theme_name(), "theme not bundled, using default");
            &fallback
        });

        let (mut pre, _background) = start_highlighted_html_snippet(theme);
        let mut lines = HighlightLines::new(syntax, theme);
        let total = LinesWithEndings::from(code).count();
        let width = total.max(1).to_string().len();
        for (index, line) in LinesWithEndings::from(code).enumerate() {
            let regions = lines.highlight_line(line, &self.syntaxes)?;
            if linenos {
                let _ = write!(pre, "<span class=\"lineno\">{:>width$} </span>", index + 1, width = width);
            }
            pre.push_str(&styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)?);
        }
        pre.push_str("</pre>\n");

        let mut context = Context::new();
        context.insert("title", title);
        context.insert("pre", &pre);
        Ok(Tera::one_off(PAGE_TEMPLATE, &context, true)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_document_with_title_and_code() {
        let h = Highlighter::new();
        let html = h
            .render("<greeting>", "print('hi')\n", Language::Python, Style::Friendly, false)
            .unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>&lt;greeting&gt;</title>"));
        assert!(html.contains("print"));
        assert!(html.contains("hi"));
        assert!(!html.contains("class=\"lineno\""));
    }

    #[test]
    fn line_numbers_prefix_every_line() {
        let h = Highlighter::new();
        let code = (1..=12).map(|i| format!("x = {i}\n")).collect::<String>();
        let html = h
            .render("", &code, Language::Python, Style::Mocha, true)
            .unwrap();
        assert_eq!(html.matches("class=\"lineno\"").count(), 12);
        assert!(html.contains("<span class=\"lineno\"> 1 </span>"));
        assert!(html.contains("<span class=\"lineno\">12 </span>"));
    }

    #[test]
    fn every_language_and_style_renders() {
        let h = Highlighter::new();
        for language in Language::ALL {
            for style in Style::ALL {
                assert!(h.render("t", "a b c\n", *language, *style, false).is_ok());
            }
        }
    }

    #[test]
    fn title_markup_is_escaped() {
        let h = Highlighter::new();
        let html = h
            .render("a&<b>\"{{ x }}", "x\n", Language::Python, Style::Friendly, false)
            .unwrap();
        assert!(html.contains("<title>a&amp;&lt;b&gt;&quot;{{ x }}</title>"));
        assert!(html.contains("<h2>a&amp;&lt;b&gt;&quot;{{ x }}</h2>"));
        assert!(html.contains("<pre style="));
    }
}
