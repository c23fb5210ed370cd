use serde::Serialize;

/// A quick-reply button rendered under a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickReply {
    pub label: String,
    /// Text sent back as if the customer had typed it.
    pub value: String,
}

/// An external link offered with a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyLink {
    pub label: String,
    pub url: String,
}

/// A menu item as rendered inside a chat reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItemView {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Display price, e.g. `R$ 59,90`.
    pub price: String,
    pub sold_out: bool,
    pub favorite: bool,
}

/// One category block included in a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuSectionView {
    pub title: String,
    pub items: Vec<MenuItemView>,
}

/// What the assistant says back, plus anything interactive shown with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub quick_replies: Vec<QuickReply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<ReplyLink>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub menu_sections: Vec<MenuSectionView>,
}

impl Reply {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_quick_reply(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.quick_replies.push(QuickReply {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn with_link(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.link = Some(ReplyLink {
            label: label.into(),
            url: url.into(),
        });
        self
    }

    #[must_use]
    pub fn with_sections(mut self, sections: Vec<MenuSectionView>) -> Self {
        self.menu_sections = sections;
        self
    }
}
