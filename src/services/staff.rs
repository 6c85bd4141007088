//! Staff-block parsing policy.
//!
//! The source site renders one `p` element per staff member, mixing name,
//! title, phone, and an email rendered as a link label. The extraction
//! rules are line-position heuristics, kept here as one named policy so
//! their edge cases stay reproducible:
//!
//! 1. The first line is the name.
//! 2. The last line is the phone, but only if it is non-empty and starts
//!    with a digit.
//! 3. The second line minus the link label (literal replace-all, no trim)
//!    is the position.
//! 4. The link label is the email.
//! 5. A block where all four come out empty is not a person.

use scraper::{ElementRef, Node};

use crate::models::Person;

/// Parse one person block's text, plus the visible text of its embedded
/// link if any. Returns `None` for blocks that are not real person entries.
pub fn parse_person(text: &str, link_label: &str) -> Option<Person> {
    let lines: Vec<&str> = text.split('\n').collect();

    let mut person = Person {
        name: lines[0].trim().to_string(),
        ..Person::default()
    };

    if lines.len() > 1 {
        let last = lines[lines.len() - 1];
        if !last.is_empty() && last.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            person.phone = last.trim().to_string();
        }
    }

    if !link_label.is_empty() && lines.len() > 1 {
        person.position = lines[1].replace(link_label, "");
    }

    person.email = link_label.to_string();

    if person.is_empty() { None } else { Some(person) }
}

/// Parse a person block element: its text content with `<br>` rendered as
/// line breaks, and the label of its first embedded link.
pub fn person_from_block(block: &ElementRef) -> Option<Person> {
    let text = block_text(block);
    let label = first_link_label(block);
    parse_person(&text, &label)
}

/// Concatenate an element's text nodes, emitting `\n` for `<br>` elements
/// so the line-based policy sees the breaks the browser renders.
fn block_text(el: &ElementRef) -> String {
    let mut out = String::new();
    for node in el.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) if element.name() == "br" => out.push('\n'),
            _ => {}
        }
    }
    out
}

/// Visible text of the first anchor inside the element, trimmed, empty if
/// none. Trimming keeps a whitespace-only anchor from counting as an email
/// and keeps the position erase aligned with the label as rendered.
fn first_link_label(el: &ElementRef) -> String {
    el.descendants()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "a")
        .map(|a| a.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::*;

    #[test]
    fn full_block_with_email_link() {
        let person = parse_person("Jane Doe\nDirector jane@x.org\n555-1234", "jane@x.org")
            .expect("entry kept");
        assert_eq!(person.name, "Jane Doe");
        // The literal erase leaves the trailing space behind
        assert_eq!(person.position, "Director ");
        assert_eq!(person.email, "jane@x.org");
        assert_eq!(person.phone, "555-1234");
    }

    #[test]
    fn single_line_is_name_only() {
        let person = parse_person("John Smith", "").expect("entry kept");
        assert_eq!(person.name, "John Smith");
        assert_eq!(person.position, "");
        assert_eq!(person.phone, "");
        assert_eq!(person.email, "");
    }

    #[test]
    fn empty_block_is_discarded() {
        assert_eq!(parse_person("", ""), None);
        assert_eq!(parse_person("   ", ""), None);
    }

    #[test]
    fn empty_last_line_yields_no_phone() {
        let person = parse_person("Jane Doe\nDirector\n", "").expect("entry kept");
        assert_eq!(person.phone, "");
    }

    #[test]
    fn non_digit_last_line_yields_no_phone() {
        let person = parse_person("Jane Doe\nDirector\nCall front desk", "").expect("entry kept");
        assert_eq!(person.phone, "");
    }

    #[test]
    fn repeated_label_is_fully_erased() {
        let person =
            parse_person("Jane Doe\na@x.org Director a@x.org", "a@x.org").expect("entry kept");
        assert_eq!(person.position, " Director ");
    }

    #[test]
    fn phone_line_is_trimmed() {
        let person = parse_person("Jane Doe\n555-1234  ", "").expect("entry kept");
        // Raw last line starts with a digit; stored value is trimmed
        assert_eq!(person.phone, "555-1234");
    }

    #[test]
    fn block_element_with_br_and_link() {
        let html = Html::parse_fragment(
            "<p>Jane Doe<br>Director <a href=\"mailto:jane@x.org\">jane@x.org</a><br>555-1234</p>",
        );
        let selector = Selector::parse("p").unwrap();
        let block = html.select(&selector).next().unwrap();

        let person = person_from_block(&block).expect("entry kept");
        assert_eq!(person.name, "Jane Doe");
        assert_eq!(person.position, "Director ");
        assert_eq!(person.email, "jane@x.org");
        assert_eq!(person.phone, "555-1234");
    }

    #[test]
    fn whitespace_only_anchor_is_not_an_email() {
        let html = Html::parse_fragment("<p> <a href=\"#\"> </a></p>");
        let selector = Selector::parse("p").unwrap();
        let block = html.select(&selector).next().unwrap();
        // With no usable label the block has no fields at all and is
        // discarded rather than kept as a garbage entry
        assert_eq!(person_from_block(&block), None);
    }

    #[test]
    fn padded_anchor_label_is_trimmed_and_erased() {
        let html = Html::parse_fragment(
            "<p>Jane Doe<br>Director <a href=\"mailto:jane@x.org\">jane@x.org </a><br>555-1234</p>",
        );
        let selector = Selector::parse("p").unwrap();
        let block = html.select(&selector).next().unwrap();

        let person = person_from_block(&block).expect("entry kept");
        assert_eq!(person.email, "jane@x.org");
        // The trimmed label is what the erase removes; the anchor's own
        // padding stays behind in the position text
        assert_eq!(person.position, "Director  ");
        assert_eq!(person.phone, "555-1234");
    }

    #[test]
    fn stray_block_without_any_fields_is_discarded() {
        let html = Html::parse_fragment("<p>  </p>");
        let selector = Selector::parse("p").unwrap();
        let block = html.select(&selector).next().unwrap();
        assert_eq!(person_from_block(&block), None);
    }
}
