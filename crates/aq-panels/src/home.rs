//! Home panel

use crate::kind::PanelKind;
use crate::panel::Panel;

/// Landing page. Never wired to the channel.
#[derive(Debug, Default)]
pub struct HomePanel;

impl HomePanel {
    /// Create the home panel
    pub fn new() -> Self {
        Self
    }
}

impl Panel for HomePanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Home
    }
}
