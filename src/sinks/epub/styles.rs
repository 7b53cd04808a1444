//! The stylesheet shared by every book in the series.
//!
//! One static sheet, included once per compiled document. Includes a
//! `prefers-color-scheme: dark` block so readers that honour it get light
//! text on a dark page without a separate build.

/// File name the stylesheet is stored under inside the EPUB.
pub const STYLESHEET_HREF: &str = "stylesheet.css";

pub const STYLESHEET: &str = r#"/* Base styles */
body {
    font-family: Georgia, "Times New Roman", serif;
    line-height: 1.6;
    margin: 1em;
    color: #1a1a1a;
    background-color: #fdfbf7;
}

p {
    margin: 0 0 0.9em;
    text-align: justify;
    text-indent: 0;
}

h1 {
    font-size: 2.2em;
    text-align: center;
    margin: 2em 0 0.4em;
    line-height: 1.2;
}

h2 {
    font-size: 1.6em;
    text-align: center;
    margin: 0.3em 0 1.2em;
    line-height: 1.25;
}

a {
    color: #8b1e1e;
}

/* Title page */
.title-page {
    text-align: center;
    margin-top: 3em;
}

.title-page .subtitle {
    font-size: 1.2em;
    font-style: italic;
    text-align: center;
    margin-bottom: 2em;
}

.title-page .series {
    font-variant: small-caps;
    letter-spacing: 0.08em;
    text-align: center;
}

.title-page .author {
    font-size: 1.1em;
    text-align: center;
    margin-top: 3em;
}

.title-page .publisher {
    font-size: 0.9em;
    text-align: center;
    margin-top: 4em;
}

/* Epigraph */
.epigraph {
    margin: 6em 2em 0;
}

.epigraph blockquote {
    font-style: italic;
    margin: 0;
}

.epigraph .attribution {
    text-align: right;
    margin-top: 1em;
}

/* Chapters */
.chapter-number {
    font-variant: small-caps;
    letter-spacing: 0.1em;
    text-align: center;
    margin-top: 3em;
    color: #8b1e1e;
}

.chapter-figure {
    margin: 1.5em 0;
    text-align: center;
    page-break-inside: avoid;
}

.chapter-figure img {
    max-width: 100%;
    height: auto;
}

.chapter-figure figcaption {
    font-size: 0.85em;
    font-style: italic;
    margin-top: 0.5em;
    color: #555;
}

/* Timeline */
.timeline dt {
    font-weight: bold;
    margin-top: 0.8em;
    color: #8b1e1e;
}

.timeline dd {
    margin: 0.2em 0 0 1em;
}

/* Colophon */
.colophon h3 {
    font-size: 1.1em;
    margin: 1.5em 0 0.5em;
}

.colophon .bibliography li {
    margin-bottom: 0.4em;
}

.colophon .published {
    font-size: 0.9em;
    font-style: italic;
}

/* Dark mode */
@media (prefers-color-scheme: dark) {
    body {
        color: #e8e4dc;
        background-color: #121212;
    }

    a,
    .chapter-number,
    .timeline dt {
        color: #e0a06b;
    }

    .chapter-figure figcaption {
        color: #b0aaa0;
    }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stylesheet_covers_every_section_kind() {
        for selector in [
            "body {",
            ".title-page",
            ".epigraph",
            ".chapter-number",
            ".chapter-figure",
            ".timeline",
            ".colophon",
        ] {
            assert!(STYLESHEET.contains(selector), "missing {selector}");
        }
    }

    #[test]
    fn stylesheet_has_a_dark_mode() {
        assert!(STYLESHEET.contains("@media (prefers-color-scheme: dark)"));
    }

    #[test]
    fn stylesheet_braces_balance() {
        let open = STYLESHEET.matches('{').count();
        let close = STYLESHEET.matches('}').count();
        assert_eq!(open, close);
    }
}
