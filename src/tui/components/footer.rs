//! Shortcut bar along the bottom of the desk

use iocraft::prelude::*;

use crate::tui::theme::theme;

/// Key hint shown in the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub key: String,
    pub action: String,
}

impl Shortcut {
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }

    /// Action text to print; narrow terminals keep only its first word
    pub fn label(&self, compact: bool) -> &str {
        if compact {
            self.action.split_whitespace().next().unwrap_or("")
        } else {
            &self.action
        }
    }
}

#[derive(Default, Props)]
pub struct FooterProps {
    pub shortcuts: Vec<Shortcut>,
    /// Shorten labels for the compact layout
    pub compact: bool,
}

#[component]
pub fn Footer(props: &FooterProps) -> impl Into<AnyElement<'static>> {
    let theme = theme();
    let gap = if props.compact { 1 } else { 2 };

    element! {
        View(
            width: 100pct,
            min_height: 1,
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::Wrap,
            flex_shrink: 0.0,
            padding_left: 1,
            column_gap: gap,
            background_color: theme.border,
        ) {
            #(props.shortcuts.iter().map(|shortcut| {
                element! {
                    View(flex_direction: FlexDirection::Row) {
                        Text(content: shortcut.key.clone(), color: theme.highlight, weight: Weight::Bold)
                        Text(content: format!(" {}", shortcut.label(props.compact)), color: theme.text)
                    }
                }
            }))
        }
    }
}
