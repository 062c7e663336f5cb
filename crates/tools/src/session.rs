//! Transmission session: message, parameters and one run at a time
//!
//! A session moves through `Idle -> BitsPending -> Transmitting -> Complete`
//! and back to `Idle` on reset. Bits are delivered one per [`Session::tick`],
//! so whoever drives the session owns the pacing.

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use marslink_channel::prelude::*;
use marslink_codecs::prelude::*;
use marslink_core::prelude::*;

use crate::config::SimConfig;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    BitsPending,
    Transmitting,
    Complete,
}

/// Progress of the current or most recent run.
///
/// Counts are kept in channel bits. With a repetition code each message bit
/// occupies several channel bits; [`TransmissionState::delivered_bits`]
/// reports whole message bits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransmissionState {
    /// Channel bits not yet delivered
    pub pending_bits: usize,
    /// Channel bits delivered so far, as received
    pub received: BitSequence,
    /// Channel bits sent per message bit
    pub channel_bits_per_source: usize,
    /// Delivered bits the channel flipped
    pub flipped_bits: usize,
    pub in_progress: bool,
    pub complete: bool,
}

impl TransmissionState {
    /// Message bits whose channel bits have all been delivered
    pub fn delivered_bits(&self) -> usize {
        self.received.len() / self.channel_bits_per_source.max(1)
    }

    /// Message bits in the run
    pub fn total_bits(&self) -> usize {
        self.total_channel_bits() / self.channel_bits_per_source.max(1)
    }

    /// Channel bits delivered so far
    pub fn channel_bits_delivered(&self) -> usize {
        self.received.len()
    }

    /// Channel bits in the run
    pub fn total_channel_bits(&self) -> usize {
        self.received.len() + self.pending_bits
    }
}

/// Everything surfaced when a run completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionReport {
    pub message: String,
    pub decoded_text: String,
    /// Errors repaired by the corrector; 0 when correction is disabled
    pub error_count: usize,
    /// Errors noticed, independent of whether they were repaired
    pub detected_errors: usize,
    /// Source bits still wrong after correction
    pub residual_errors: usize,
    pub channel_bits: usize,
    pub flipped_bits: usize,
    pub bit_error_rate: f64,
    pub scheme: CorrectionScheme,
    pub parameters: ChannelParameters,
    pub capacity: CapacityResult,
    pub timing: TimingReport,
}

impl TransmissionReport {
    /// Whether the decoded text matches what was sent
    pub fn is_intact(&self) -> bool {
        self.decoded_text == self.message
    }
}

/// State captured when a run starts
struct Run {
    transmit: Transmit<ChaCha8Rng>,
    corrector: Corrector,
    source: BitSequence,
    message: String,
    params: ChannelParameters,
    distance_km: f64,
}

/// Noisy-channel simulation driven one bit at a time
pub struct Session {
    codec: Latin1Codec,
    message: String,
    bits: BitSequence,
    params: ChannelParameters,
    scheme: CorrectionScheme,
    distance_km: f64,
    rng: ChaCha8Rng,
    state: SessionState,
    run: Option<Run>,
    progress: TransmissionState,
    report: Option<TransmissionReport>,
}

impl Session {
    /// Create an idle session. Without a seed the channel draws from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            codec: Latin1Codec::new(),
            message: String::new(),
            bits: BitSequence::new(),
            params: ChannelParameters::default(),
            scheme: CorrectionScheme::default(),
            distance_km: marslink_core::timing::MARS_MEAN_DISTANCE_KM,
            rng,
            state: SessionState::Idle,
            run: None,
            progress: TransmissionState::default(),
            report: None,
        }
    }

    /// Create a session from a validated configuration, message included
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        config.validate()?;

        let mut session = Self::new(config.seed);
        session.configure(config.channel, config.distance_km)?;
        session.set_scheme(config.correction)?;
        session.set_message(&config.message)?;
        Ok(session)
    }

    /// Replace the message. Any run in flight is discarded.
    pub fn set_message(&mut self, text: &str) -> Result<()> {
        let bits = self
            .codec
            .encode(text)
            .with_context(|| format!("Cannot encode message {:?}", text))?;

        if self.run.take().is_some() {
            info!("Message changed, discarding transmission in progress");
        }

        debug!("Encoded {} characters into {} bits", text.chars().count(), bits.len());
        self.message = text.to_string();
        self.bits = bits;
        self.progress = TransmissionState::default();
        self.report = None;
        self.state = SessionState::BitsPending;
        Ok(())
    }

    /// Update channel parameters and distance for the next run
    pub fn configure(&mut self, params: ChannelParameters, distance_km: f64) -> Result<()> {
        params.validate().context("Invalid channel parameters")?;
        TimingReport::new(distance_km).context("Invalid distance")?;

        if self.state == SessionState::Transmitting {
            debug!("Parameters updated mid-flight; they apply from the next transmission");
        }

        self.params = params;
        self.distance_km = distance_km;
        Ok(())
    }

    /// Select the correction scheme for the next run
    pub fn set_scheme(&mut self, scheme: CorrectionScheme) -> Result<()> {
        Corrector::new(scheme, true).context("Invalid correction scheme")?;
        self.scheme = scheme;
        Ok(())
    }

    /// Begin delivering the current bits.
    ///
    /// Returns `false` without changing anything when there is nothing to
    /// send or a run is already in flight.
    pub fn start_transmission(&mut self) -> Result<bool> {
        if self.state == SessionState::Transmitting {
            warn!("Transmission already in progress; start ignored");
            return Ok(false);
        }

        if self.bits.is_empty() {
            debug!("No bits pending; start is a no-op");
            return Ok(false);
        }

        let corrector = Corrector::new(self.scheme, self.params.correction_enabled)?;
        let channel_bits = corrector.prepare(&self.bits);
        let channel = BinarySymmetricChannel::new(self.params.error_probability)?;
        let run_rng = ChaCha8Rng::seed_from_u64(self.rng.gen());

        info!(
            "Starting transmission: {} channel bits, p = {}, correction {} ({})",
            channel_bits.len(),
            channel.error_probability(),
            if self.params.correction_enabled { "on" } else { "off" },
            self.scheme
        );

        self.progress = TransmissionState {
            pending_bits: channel_bits.len(),
            received: BitSequence::with_capacity(channel_bits.len()),
            channel_bits_per_source: corrector.channel_bits_per_source(),
            flipped_bits: 0,
            in_progress: true,
            complete: false,
        };
        self.run = Some(Run {
            transmit: channel.transmit(channel_bits, run_rng),
            corrector,
            source: self.bits.clone(),
            message: self.message.clone(),
            params: self.params,
            distance_km: self.distance_km,
        });
        self.report = None;
        self.state = SessionState::Transmitting;
        Ok(true)
    }

    /// Deliver the next bit. Returns `None` when no run is in flight.
    pub fn tick(&mut self) -> Result<Option<BitPair>> {
        let Some(run) = self.run.as_mut() else {
            return Ok(None);
        };

        let pair = run.transmit.next();
        if let Some(pair) = pair {
            self.progress.received.push(pair.delivered == 1);
            self.progress.pending_bits = run.transmit.remaining();
            if pair.is_flipped() {
                self.progress.flipped_bits += 1;
            }
        }

        if self.progress.pending_bits == 0 {
            self.finish()?;
        }

        Ok(pair)
    }

    /// Start if needed and deliver every remaining bit
    pub fn run_to_completion(&mut self) -> Result<Option<&TransmissionReport>> {
        if self.state != SessionState::Transmitting && !self.start_transmission()? {
            return Ok(None);
        }

        while self.state == SessionState::Transmitting {
            self.tick()?;
        }

        Ok(self.report.as_ref())
    }

    /// Cancel the run at the current bit boundary.
    ///
    /// Bits delivered so far stay readable through [`Session::progress`]
    /// until the next start or reset.
    pub fn stop(&mut self) {
        if self.run.take().is_none() {
            return;
        }

        info!(
            "Transmission stopped after {} of {} bits",
            self.progress.delivered_bits(),
            self.progress.total_bits()
        );
        self.progress.in_progress = false;
        self.state = SessionState::BitsPending;
    }

    /// Return to idle, keeping message, bits and parameters
    pub fn reset(&mut self) {
        self.run = None;
        self.progress = TransmissionState::default();
        self.report = None;
        self.state = SessionState::Idle;
        debug!("Session reset");
    }

    fn finish(&mut self) -> Result<()> {
        let Some(mut run) = self.run.take() else {
            return Ok(());
        };

        let correction = run.corrector.recover(&self.progress.received, &run.source);
        let decoded_text = self.codec.decode(&correction.corrected);
        let capacity = capacity_for(&run.params)?;
        let timing = TimingReport::new(run.distance_km)?;

        let channel_bits = run.transmit.original().len();
        let bit_error_rate = if channel_bits == 0 {
            0.0
        } else {
            self.progress.flipped_bits as f64 / channel_bits as f64
        };

        info!(
            "Transmission complete: {} flips, {} corrected, decoded {:?}",
            self.progress.flipped_bits, correction.stats.corrected_errors, decoded_text
        );

        self.progress.in_progress = false;
        self.progress.complete = true;
        self.report = Some(TransmissionReport {
            message: run.message,
            decoded_text,
            error_count: correction.stats.corrected_errors,
            detected_errors: correction.stats.detected_errors,
            residual_errors: correction.stats.uncorrectable_errors,
            channel_bits,
            flipped_bits: self.progress.flipped_bits,
            bit_error_rate,
            scheme: run.corrector.scheme(),
            parameters: run.params,
            capacity,
            timing,
        });
        self.state = SessionState::Complete;
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Encoded message bits
    pub fn bits(&self) -> &BitSequence {
        &self.bits
    }

    pub fn parameters(&self) -> &ChannelParameters {
        &self.params
    }

    pub fn scheme(&self) -> CorrectionScheme {
        self.scheme
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn progress(&self) -> &TransmissionState {
        &self.progress
    }

    /// Report of the last completed run
    pub fn report(&self) -> Option<&TransmissionReport> {
        self.report.as_ref()
    }
}
