use super::paragraphs;
use crate::source::Epigraph;
use html_escape::encode_text;

/// Render the epigraph page body. The quote is trusted markup.
pub fn render(epigraph: &Epigraph) -> String {
    let attribution = if epigraph.attribution.trim().is_empty() {
        String::new()
    } else {
        format!(
            "\n<p class=\"attribution\">&#8212; {}</p>",
            encode_text(epigraph.attribution.trim())
        )
    };

    format!(
        "<div class=\"epigraph\">\n<blockquote>\n{}\n</blockquote>{}\n</div>",
        paragraphs(&epigraph.quote),
        attribution
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn epigraph_has_quote_and_attribution() {
        let html = render(&Epigraph {
            quote: "Nothing in life is to be feared.".to_string(),
            attribution: "Marie Curie".to_string(),
        });
        assert!(
            html.contains("<blockquote>\n<p>Nothing in life is to be feared.</p>\n</blockquote>")
        );
        assert!(html.contains(r#"<p class="attribution">&#8212; Marie Curie</p>"#));
    }

    #[test]
    fn attribution_is_optional() {
        let html = render(&Epigraph {
            quote: "<p>Already marked up.</p>".to_string(),
            attribution: String::new(),
        });
        assert!(html.contains("<p>Already marked up.</p>"));
        assert!(!html.contains("attribution"));
    }
}
