//! Toolbar actions
//!
//! Maps the toolbar's action tokens to panel kinds. Lookup is an exact,
//! case-sensitive match.

use aq_panels::PanelKind;

/// One toolbar button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarAction {
    /// Token the toolbar sends when the button is pressed
    pub token: &'static str,
    /// Panel the token opens, if it opens one
    pub target: Option<PanelKind>,
}

const fn action(token: &'static str, target: Option<PanelKind>) -> ToolbarAction {
    ToolbarAction { token, target }
}

/// Toolbar buttons in display order
pub const TOOLBAR_ACTIONS: &[ToolbarAction] = &[
    action("Home", Some(PanelKind::Home)),
    action("Connect", Some(PanelKind::Connect)),
    action("Status", None),
    action("Route", Some(PanelKind::Route)),
    action("Calibrate", None),
    action("Setup", Some(PanelKind::Config)),
    action("Terminal", Some(PanelKind::Monitor)),
    action("Plots", Some(PanelKind::Plot)),
    action("Firmware", Some(PanelKind::Firmware)),
];

/// Find the panel a token opens. `None` for unknown tokens and for tokens
/// without a panel.
pub fn lookup_token(token: &str) -> Option<PanelKind> {
    TOOLBAR_ACTIONS
        .iter()
        .find(|a| a.token == token)
        .and_then(|a| a.target)
}

/// Resolve a token to the panel to show, falling back to Home
pub fn resolve_token(token: &str) -> PanelKind {
    lookup_token(token).unwrap_or(PanelKind::Home)
}
