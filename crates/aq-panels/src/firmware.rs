//! Firmware upload panel

use aq_link::LinkState;
use tracing::{debug, info};

use crate::kind::PanelKind;
use crate::outbox::Outbox;
use crate::panel::{Panel, PanelContext};

/// Bytes written per chunk
pub const CHUNK_SIZE: usize = 64;

/// Upload progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    /// No image loaded
    Idle,
    /// Image loaded and ready to send
    Ready { size: usize },
    /// Image partially written
    Uploading { sent: usize, total: usize },
    /// Image fully written
    Complete { size: usize },
    /// Something went wrong
    Failed(String),
}

/// Streams a firmware image to the flight controller
#[derive(Debug)]
pub struct FirmwarePanel {
    image: Option<Vec<u8>>,
    state: UploadState,
    link: LinkState,
}

impl FirmwarePanel {
    /// Create the panel
    pub fn new(context: &PanelContext) -> Self {
        Self {
            image: None,
            state: UploadState::Idle,
            link: context.link,
        }
    }

    /// Current upload state
    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Load the image to upload
    pub fn load_image(&mut self, image: Vec<u8>, out: &mut Outbox) {
        if image.is_empty() {
            self.image = None;
            self.fail("Firmware image is empty", out);
            return;
        }
        out.status(format!("Loaded firmware image ({} bytes)", image.len()));
        self.state = UploadState::Ready { size: image.len() };
        self.image = Some(image);
    }

    /// Write the loaded image to the link in fixed-size chunks
    pub fn start_upload(&mut self, out: &mut Outbox) {
        let Some(image) = self.image.as_ref() else {
            out.status("Load a firmware image first");
            return;
        };
        if !self.link.is_open() {
            out.status("Connect to the flight controller before uploading");
            return;
        }

        let total = image.len();
        info!("Uploading {} byte firmware image", total);
        out.status(format!("Uploading firmware ({} bytes)...", total));

        let mut sent = 0;
        for chunk in image.chunks(CHUNK_SIZE) {
            out.send(chunk.to_vec());
            sent += chunk.len();
            self.state = UploadState::Uploading { sent, total };
        }

        self.state = UploadState::Complete { size: total };
        out.status(format!("Firmware upload complete ({} bytes)", total));
    }

    fn fail(&mut self, reason: &str, out: &mut Outbox) {
        self.state = UploadState::Failed(reason.to_string());
        out.status(reason.to_string());
    }
}

impl Panel for FirmwarePanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Firmware
    }

    fn on_message_in(&mut self, data: &[u8], _out: &mut Outbox) {
        debug!("Firmware panel received {} bytes", data.len());
    }

    fn on_link_state(&mut self, state: LinkState, _out: &mut Outbox) {
        self.link = state;
    }
}
