use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

/// Boilerplate that marks an article as unusable, e.g. paywalled teasers.
pub const FORBIDDEN_PATTERNS: [&str; 2] = [
    "Die Woche COMPACT (Video)",
    "Dieser Beitrag ist gesperrt und nur für Onlineabonnenten lesbar.",
];

/// Separators between several names listed as a single author.
pub const AUTHOR_SEPARATORS: [&str; 3] = ["/", ", ", " und "];

lazy_static! {

    pub(crate) static ref RE_FORBIDDEN_PATTERN: Regex = Regex::new(
        &FORBIDDEN_PATTERNS
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|")
    ).unwrap();

    /// Embedded google trends widgets end up as paragraphs of script code.
    pub(crate) static ref RE_TRENDS_WIDGET: Regex = Regex::new(r"trends\.embed\.renderExploreWidget").unwrap();

}

/// Remove empty and blank paragraphs.
pub fn remove_empty_paragraphs(paragraphs: Vec<String>) -> Vec<String> {
    paragraphs
        .into_iter()
        .filter(|p| p != " " && !p.is_empty())
        .collect()
}

/// Whether the text contains any of the [`FORBIDDEN_PATTERNS`].
pub fn contains_forbidden_pattern(text: &str) -> bool {
    RE_FORBIDDEN_PATTERN.is_match(text)
}

fn tag(text: &str, tag: &str) -> String {
    format!("<{tag}>{text}</{tag}>", tag = tag, text = text)
}

/// Render title and body as html: the title as `<h1>`, every non-empty
/// section with its headline as `<h2>` (if any) and its paragraphs as `<p>`.
pub fn format_content(title: &str, body: &IndexMap<String, Vec<String>>) -> String {
    let mut html = tag(title, "h1");
    for (headline, paragraphs) in body {
        if paragraphs.is_empty() {
            continue;
        }
        if !headline.is_empty() {
            html.push_str(&tag(headline, "h2"));
        }
        for paragraph in paragraphs
            .iter()
            .filter(|p| !RE_TRENDS_WIDGET.is_match(p))
        {
            html.push_str(&tag(paragraph, "p"));
        }
    }
    html
}

/// Number of `<h2>` subheaders in formatted content.
pub fn count_subheaders(formatted: &str) -> usize {
    formatted.matches("<h2>").count()
}

/// Split names joined by `sep` into separate, trimmed names.
pub fn clean_authors(authors: Vec<String>, sep: &str) -> Vec<String> {
    authors
        .into_iter()
        .flat_map(|author| {
            if author.contains(sep) {
                author.split(sep).map(|name| name.trim().to_string()).collect()
            } else {
                vec![author]
            }
        })
        .collect()
}

/// Apply [`clean_authors`] for all [`AUTHOR_SEPARATORS`].
pub fn split_authors(authors: Vec<String>) -> Vec<String> {
    AUTHOR_SEPARATORS
        .iter()
        .fold(authors, |authors, sep| clean_authors(authors, sep))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_paragraphs() {
        let paragraphs = vec!["a".to_string(), " ".into(), "".into(), "  b ".into()];
        assert_eq!(remove_empty_paragraphs(paragraphs), vec!["a", "  b "]);
    }

    #[test]
    fn forbidden_patterns() {
        assert!(contains_forbidden_pattern(
            "<h1>Die Woche COMPACT (Video)</h1><p>..</p>"
        ));
        assert!(contains_forbidden_pattern(
            "<p>Dieser Beitrag ist gesperrt und nur für Onlineabonnenten lesbar.</p>"
        ));
        assert!(!contains_forbidden_pattern("<p>Die Woche im Bundestag</p>"));
    }

    #[test]
    fn format_sections() {
        let mut body = IndexMap::new();
        body.insert(String::new(), vec!["Einleitung".to_string()]);
        body.insert("Leer".to_string(), Vec::new());
        body.insert(
            "Hintergrund".to_string(),
            vec![
                "Absatz".to_string(),
                "trends.embed.renderExploreWidget(\"TIMESERIES\")".to_string(),
            ],
        );
        let html = format_content("Titel", &body);
        assert_eq!(
            html,
            "<h1>Titel</h1><p>Einleitung</p><h2>Hintergrund</h2><p>Absatz</p>"
        );
        assert_eq!(count_subheaders(&html), 1);
    }

    #[test]
    fn authors() {
        let authors = vec![
            "Anna Beispiel / Jan Muster".to_string(),
            "Eva Probe und Max Test, Lisa Lauf".to_string(),
            "dpa".to_string(),
        ];
        assert_eq!(
            split_authors(authors),
            vec![
                "Anna Beispiel",
                "Jan Muster",
                "Eva Probe",
                "Max Test",
                "Lisa Lauf",
                "dpa"
            ]
        );
    }
}
