//! Closed label vocabulary for detected layout regions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification label for a detected document element.
///
/// The set is closed: downstream threshold tables and remapping rules match
/// exhaustively on it, so adding a variant forces every table to be revisited
/// at compile time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocItemLabel {
    /// Regular body text paragraph
    #[default]
    #[serde(rename = "text", alias = "Text")]
    Text,
    /// Section or chapter heading
    #[serde(rename = "section_header", alias = "Section-header")]
    SectionHeader,
    /// Running header at top of page
    #[serde(rename = "page_header", alias = "Page-header")]
    PageHeader,
    /// Running footer at bottom of page
    #[serde(rename = "page_footer", alias = "Page-footer")]
    PageFooter,
    /// Document or section title
    #[serde(rename = "title", alias = "Title")]
    Title,
    /// Caption for figures, tables, or other elements
    #[serde(rename = "caption", alias = "Caption")]
    Caption,
    /// Footnote or endnote text
    #[serde(rename = "footnote", alias = "Footnote")]
    Footnote,
    /// Tabular data structure
    #[serde(rename = "table", alias = "Table")]
    Table,
    /// Raster image or figure
    #[serde(rename = "picture", alias = "Picture")]
    Picture,
    /// Mathematical formula or equation
    #[serde(rename = "formula", alias = "Formula")]
    Formula,
    /// Item in a bulleted or numbered list
    #[serde(rename = "list_item", alias = "List-item")]
    ListItem,
    /// Source code or preformatted text
    #[serde(rename = "code", alias = "Code")]
    Code,
    /// Checked/selected checkbox
    #[serde(rename = "checkbox_selected")]
    CheckboxSelected,
    /// Unchecked/unselected checkbox
    #[serde(rename = "checkbox_unselected")]
    CheckboxUnselected,
    /// Form field or input area
    #[serde(rename = "form")]
    Form,
    /// Key-value pair region (e.g., form labels)
    #[serde(
        rename = "key_value_region",
        alias = "key-value region",
        alias = "Key-Value Region"
    )]
    KeyValueRegion,
    /// Table of contents or index
    #[serde(rename = "document_index")]
    DocumentIndex,
}

impl DocItemLabel {
    /// Whether this label takes the special processing path
    /// (pictures and container regions).
    #[inline]
    #[must_use = "returns whether this label takes the special processing path"]
    pub const fn is_special(&self) -> bool {
        matches!(self, Self::Picture | Self::Form | Self::KeyValueRegion)
    }

    /// Whether this label is a wrapper (container) region that groups
    /// regular clusters as children.
    #[inline]
    #[must_use = "returns whether this label is a wrapper region"]
    pub const fn is_wrapper(&self) -> bool {
        matches!(self, Self::Form | Self::KeyValueRegion)
    }

    /// Snake-case string form (the serialized name).
    #[inline]
    #[must_use = "returns the snake-case string representation"]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::SectionHeader => "section_header",
            Self::PageHeader => "page_header",
            Self::PageFooter => "page_footer",
            Self::Title => "title",
            Self::Caption => "caption",
            Self::Footnote => "footnote",
            Self::Table => "table",
            Self::Picture => "picture",
            Self::Formula => "formula",
            Self::ListItem => "list_item",
            Self::Code => "code",
            Self::CheckboxSelected => "checkbox_selected",
            Self::CheckboxUnselected => "checkbox_unselected",
            Self::Form => "form",
            Self::KeyValueRegion => "key_value_region",
            Self::DocumentIndex => "document_index",
        }
    }
}

impl fmt::Display for DocItemLabel {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocItemLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Normalize: lowercase and drop spaces/hyphens/underscores
        let normalized: String = s
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect();

        match normalized.as_str() {
            "text" => Ok(Self::Text),
            "sectionheader" | "section" => Ok(Self::SectionHeader),
            "pageheader" => Ok(Self::PageHeader),
            "pagefooter" => Ok(Self::PageFooter),
            "title" => Ok(Self::Title),
            "caption" => Ok(Self::Caption),
            "footnote" => Ok(Self::Footnote),
            "table" => Ok(Self::Table),
            "picture" | "figure" | "image" => Ok(Self::Picture),
            "formula" | "equation" => Ok(Self::Formula),
            "listitem" | "list" => Ok(Self::ListItem),
            "code" => Ok(Self::Code),
            "checkboxselected" | "checkbox(selected)" => Ok(Self::CheckboxSelected),
            "checkboxunselected" | "checkbox(unselected)" => Ok(Self::CheckboxUnselected),
            "form" => Ok(Self::Form),
            "keyvalueregion" | "keyvalue" | "kv" => Ok(Self::KeyValueRegion),
            "documentindex" | "index" | "toc" => Ok(Self::DocumentIndex),
            _ => Err(format!(
                "unknown doc item label: '{s}' (expected: text, section_header, page_header, \
                 page_footer, title, caption, footnote, table, picture, formula, list_item, \
                 code, checkbox_selected, checkbox_unselected, form, key_value_region, \
                 document_index)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn special_labels() {
        assert!(DocItemLabel::Picture.is_special());
        assert!(DocItemLabel::Form.is_special());
        assert!(DocItemLabel::KeyValueRegion.is_special());
        assert!(!DocItemLabel::Table.is_special());
        assert!(!DocItemLabel::Text.is_special());
    }

    #[test]
    fn wrappers_exclude_pictures() {
        assert!(DocItemLabel::Form.is_wrapper());
        assert!(DocItemLabel::KeyValueRegion.is_wrapper());
        assert!(!DocItemLabel::Picture.is_wrapper());
    }

    #[test]
    fn from_str_normalizes_separators() {
        assert_eq!(
            DocItemLabel::from_str("Section-header").unwrap(),
            DocItemLabel::SectionHeader
        );
        assert_eq!(
            DocItemLabel::from_str("key-value region").unwrap(),
            DocItemLabel::KeyValueRegion
        );
        assert!(DocItemLabel::from_str("banner").is_err());
    }

    #[test]
    fn display_matches_serialized_name() {
        assert_eq!(DocItemLabel::ListItem.to_string(), "list_item");
    }
}
