use scraper::{ElementRef, Selector};

/// An ordered list of CSS selectors tried until one matches.
///
/// Moodle themes and versions render the same data with different markup,
/// so every lookup goes through a chain from the most specific layout to the
/// most generic one. A strategy that matches nothing is skipped.
pub struct SelectorChain {
    strategies: Vec<(&'static str, Selector)>,
}

impl SelectorChain {
    /// Builds a chain from selector literals. Panics on an invalid selector,
    /// which is a programming error.
    pub fn new(css: &[&'static str]) -> Self {
        let strategies = css
            .iter()
            .map(|s| (*s, Selector::parse(s).expect("invalid selector in chain")))
            .collect();
        Self { strategies }
    }

    /// All nodes matched by the first strategy that matches anything, with
    /// the selector that produced them.
    pub fn first_match<'a>(
        &self,
        scope: ElementRef<'a>,
    ) -> Option<(&'static str, Vec<ElementRef<'a>>)> {
        self.strategies.iter().find_map(|(css, selector)| {
            let nodes: Vec<ElementRef<'a>> = scope.select(selector).collect();
            (!nodes.is_empty()).then_some((*css, nodes))
        })
    }

    /// Text of the first strategy whose first match has non-empty text.
    pub fn first_text(&self, scope: ElementRef<'_>) -> Option<String> {
        self.strategies.iter().find_map(|(_, selector)| {
            let text = element_text(scope.select(selector).next()?);
            (!text.is_empty()).then_some(text)
        })
    }
}

/// Visible text of an element: each text node trimmed, blanks dropped,
/// joined with single spaces.
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
