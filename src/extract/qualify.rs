//! Locating manufactured parts and filtering out the order node.

use roxmltree::Node;

use crate::config::ExtractConfig;
use crate::parser::find_first;

/// Tag of part elements.
const PART_TAG: &str = "Part";

/// Why a part candidate was or was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartStatus {
    /// A physical part to assemble.
    Manufactured,
    /// Article number is an order synonym such as "Order" or "Pedido".
    OrderPlaceholder(String),
    /// ProcessingTechnology marks the root/order node.
    RootSentinel,
}

impl PartStatus {
    pub fn is_manufactured(&self) -> bool {
        matches!(self, PartStatus::Manufactured)
    }
}

/// All `Part` elements below `root` with the configured type marker,
/// in document order.
pub fn find_parts<'a, 'input: 'a>(
    root: Node<'a, 'input>,
    config: &ExtractConfig,
) -> Vec<Node<'a, 'input>> {
    root.descendants()
        .skip(1)
        .filter(|n| {
            n.is_element()
                && n.has_tag_name(PART_TAG)
                && n.attribute("type") == Some(config.part_type.as_str())
        })
        .collect()
}

/// Classify a part candidate.
pub fn qualify(part: Node<'_, '_>, config: &ExtractConfig) -> PartStatus {
    if let Some(article_no) = find_first(part, "ArticleNo").and_then(|n| n.text()) {
        if config.is_order_synonym(article_no) {
            return PartStatus::OrderPlaceholder(article_no.trim().to_string());
        }
    }

    if part
        .attribute("ProcessingTechnology")
        .is_some_and(|t| config.is_root_technology(t))
    {
        return PartStatus::RootSentinel;
    }

    PartStatus::Manufactured
}
