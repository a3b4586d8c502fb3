//! Element roles: the semantic tag carried by rendered nodes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AddressError;

/// Semantic kind of a rendered scene node.
///
/// Item-scoped roles are always paired with an indexes path and resolve
/// into the addressed item; the others resolve into the top-level data
/// attribute map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementRole {
    /// Item label text.
    ItemLabel,
    /// Item description text.
    ItemDesc,
    /// Item numeric value text.
    ItemValue,
    /// Item icon.
    ItemIcon,
    /// Item illustration.
    ItemIllus,
    /// Infographic title.
    Title,
    /// Infographic description.
    Desc,
    /// Top-level illustration.
    Illus,
    /// Decorative structure shape.
    Shape,
    /// Canvas background.
    Background,
}

impl ElementRole {
    pub const ALL: [ElementRole; 10] = [
        ElementRole::ItemLabel,
        ElementRole::ItemDesc,
        ElementRole::ItemValue,
        ElementRole::ItemIcon,
        ElementRole::ItemIllus,
        ElementRole::Title,
        ElementRole::Desc,
        ElementRole::Illus,
        ElementRole::Shape,
        ElementRole::Background,
    ];

    /// Tag as written on rendered nodes.
    pub fn tag(&self) -> &'static str {
        match self {
            ElementRole::ItemLabel => "item-label",
            ElementRole::ItemDesc => "item-desc",
            ElementRole::ItemValue => "item-value",
            ElementRole::ItemIcon => "item-icon",
            ElementRole::ItemIllus => "item-illus",
            ElementRole::Title => "title",
            ElementRole::Desc => "desc",
            ElementRole::Illus => "illus",
            ElementRole::Shape => "shape",
            ElementRole::Background => "background",
        }
    }

    /// Whether the role addresses part of an item.
    pub fn is_item_scoped(&self) -> bool {
        matches!(
            self,
            ElementRole::ItemLabel
                | ElementRole::ItemDesc
                | ElementRole::ItemValue
                | ElementRole::ItemIcon
                | ElementRole::ItemIllus
        )
    }

    /// Key under which element props are stored in an attribute map.
    pub fn attribute_key(&self) -> &'static str {
        match self {
            ElementRole::ItemLabel => "label",
            ElementRole::ItemDesc => "desc",
            ElementRole::ItemValue => "value",
            ElementRole::ItemIcon => "icon",
            ElementRole::ItemIllus => "illus",
            other => other.tag(),
        }
    }

    /// Decorative roles render structure, not data, and are not selectable
    /// by default.
    pub fn is_decorative(&self) -> bool {
        matches!(self, ElementRole::Shape | ElementRole::Background)
    }

    /// Whether nodes of this role hold editable text.
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            ElementRole::ItemLabel
                | ElementRole::ItemDesc
                | ElementRole::ItemValue
                | ElementRole::Title
                | ElementRole::Desc
        )
    }
}

impl FromStr for ElementRole {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        ElementRole::ALL
            .iter()
            .copied()
            .find(|role| role.tag() == tag)
            .ok_or_else(|| AddressError::UnknownRole(s.to_string()))
    }
}

impl fmt::Display for ElementRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
