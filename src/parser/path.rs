//! Structural path queries over the XML tree.
//!
//! A path is a sequence of element names. The first step is searched
//! anywhere below the starting node; later steps are direct children when
//! joined with `/` and descendants when joined with `//`. A trailing
//! `@name` selects an attribute of the matched element.
//!
//! ```text
//! WorkingStep//WorkPlaceData//MachineHourCosts/Value/metric_qty
//! Options@BaseCurrency
//! ```

use roxmltree::Node;

/// Search axis for one path step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    Descendant,
}

/// One element step of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    name: String,
}

/// A parsed structural path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    steps: Vec<Step>,
    attribute: Option<String>,
}

impl FieldPath {
    /// Parse a path expression.
    pub fn parse(expr: &str) -> Self {
        let (element_part, attribute) = match expr.rsplit_once('@') {
            Some((elements, attr)) => (elements, Some(attr.trim().to_string())),
            None => (expr, None),
        };

        let mut steps = Vec::new();
        let mut axis = Axis::Descendant;
        for segment in element_part.trim().trim_start_matches('/').split('/') {
            let name = segment.trim();
            if name.is_empty() {
                // An empty segment comes from `//`.
                axis = Axis::Descendant;
                continue;
            }
            steps.push(Step {
                axis,
                name: name.to_string(),
            });
            axis = Axis::Child;
        }

        Self { steps, attribute }
    }

    /// All elements matched by this path below `node`, in document order.
    pub fn select<'a, 'input: 'a>(&self, node: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
        let mut current = vec![node];

        for step in &self.steps {
            let mut next: Vec<Node<'a, 'input>> = Vec::new();
            for context in &current {
                match step.axis {
                    Axis::Child => next.extend(
                        context
                            .children()
                            .filter(|n| n.is_element() && n.has_tag_name(step.name.as_str())),
                    ),
                    Axis::Descendant => next.extend(
                        context
                            .descendants()
                            .skip(1)
                            .filter(|n| n.is_element() && n.has_tag_name(step.name.as_str())),
                    ),
                }
            }
            // Nested contexts can reach the same descendant twice.
            next.sort_by_key(|n| n.range().start);
            next.dedup();
            current = next;
        }

        if self.steps.is_empty() {
            return Vec::new();
        }
        current
    }

    /// First element matched by this path below `node`.
    pub fn first<'a, 'input: 'a>(&self, node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
        self.select(node).into_iter().next()
    }

    /// Raw value of the first match: its attribute when the path names one,
    /// otherwise its text. Blank values count as absent.
    pub fn value<'a, 'input: 'a>(&self, node: Node<'a, 'input>) -> Option<&'a str> {
        let matched = self.first(node)?;
        let raw = match &self.attribute {
            Some(attr) => matched.attribute(attr.as_str()),
            None => matched.text(),
        }?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

/// Find the first element matching `path` below `node`.
pub fn find_first<'a, 'input: 'a>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    FieldPath::parse(path).first(node)
}

/// Find all elements matching `path` below `node`, in document order.
pub fn find_all<'a, 'input: 'a>(node: Node<'a, 'input>, path: &str) -> Vec<Node<'a, 'input>> {
    FieldPath::parse(path).select(node)
}
