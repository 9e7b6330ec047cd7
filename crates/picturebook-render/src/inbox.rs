//! Hand-off of decoded waveforms from background decoders to the control thread.
//!
//! Decoders only ever send. The control thread drains the inbox between events
//! and is the only place envelopes enter the waveform library.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use picturebook_timeline::ClipId;
use tracing::warn;

use crate::waveform::WaveformEnvelope;

/// Pending decodes before senders start blocking.
const INBOX_CAPACITY: usize = 256;

/// Envelope produced off-thread for one clip.
#[derive(Debug, Clone)]
pub struct DecodedWaveform {
    pub clip_id: ClipId,
    pub envelope: WaveformEnvelope,
}

/// Receiving side, owned by the canvas.
#[derive(Debug)]
pub struct WaveformInbox {
    tx: Sender<DecodedWaveform>,
    rx: Receiver<DecodedWaveform>,
}

impl WaveformInbox {
    pub fn new() -> Self {
        let (tx, rx) = bounded(INBOX_CAPACITY);
        Self { tx, rx }
    }

    /// A handle decoder threads can send through.
    pub fn sender(&self) -> WaveformSender {
        WaveformSender {
            tx: self.tx.clone(),
        }
    }

    /// Everything delivered so far, in arrival order.
    pub fn drain(&self) -> Vec<DecodedWaveform> {
        self.rx.try_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for WaveformInbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending side, cloneable across decoder threads.
#[derive(Debug, Clone)]
pub struct WaveformSender {
    tx: Sender<DecodedWaveform>,
}

impl WaveformSender {
    /// Deliver a decoded envelope, blocking while the inbox is full.
    ///
    /// Returns false once the inbox has been dropped.
    pub fn send(&self, clip_id: ClipId, envelope: WaveformEnvelope) -> bool {
        self.tx.send(DecodedWaveform { clip_id, envelope }).is_ok()
    }

    /// Deliver without blocking. A full inbox drops the envelope.
    pub fn try_send(&self, clip_id: ClipId, envelope: WaveformEnvelope) -> bool {
        match self.tx.try_send(DecodedWaveform { clip_id, envelope }) {
            Ok(()) => true,
            Err(TrySendError::Full(decoded)) => {
                warn!(clip = %decoded.clip_id, "Waveform inbox full, dropping envelope");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}
