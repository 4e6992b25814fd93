//! # Memory Pad — An XY Trackpad That Remembers
//!
//! Draw a gesture on the pad and it is recorded as a path of normalized
//! (x, y) points. Let go and the path plays back on two outputs, looping
//! forward, bouncing in and out, or running in reverse, at an adjustable
//! speed. Built with [nih-plug](https://github.com/robbert-vdh/nih-plug);
//! outputs CLAP, VST3 and (through clap-wrapper) AUv2.
//!
//! ## Signal Flow
//!
//! ```text
//!  Editor                     process() (per sample)
//! ┌────────────┐            ┌──────────────────────────────────────────┐
//! │ drag start │─┐          │  recording or empty path?                │
//! │ drag move  │─┼─ events ─┼─►    yes ──► live pad position ─┐        │
//! │ drag end   │─┘          │      no  ──► PathPlayer ──► path[i] ─┤   │
//! └────────────┘            │                                      ▼   │
//!       ▲                   │       polarity ─► attenuation ─► × 5.0   │
//!       │                   └──────────────────────────┬───────────────┘
//!       └─────────── puck / lights ◄───────────────────┴──► X out, Y out
//! ```
//!
//! The engine in [`pad`] knows nothing about nih-plug; this file only
//! bridges host parameters, buffers and state into it.

pub mod config;
pub mod pad;
pub mod params;

mod editor;

use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};

use nih_plug::prelude::*;

use config::PadConfig;
use editor::PadDisplay;
use pad::{pad_event_queue, MemoryPad, PadEventReceiver, PadEventSender, RestoreError};
use params::{PathSync, PluginParams};

/// The main plugin struct.
///
/// The engine and the receiving end of the event queue belong to the audio
/// thread. The editor holds the sending end and reads [`PadDisplay`]; the
/// two sides share nothing else.
struct MemoryPadPlugin {
    params: Arc<PluginParams>,
    config: PadConfig,
    pad: MemoryPad,

    events: PadEventReceiver,
    /// Shared by every editor instance the host opens. Only the GUI thread
    /// ever locks it.
    sender: Arc<Mutex<PadEventSender>>,
    display: Arc<PadDisplay>,

    sample_rate: f32,
    /// Samples processed since the plugin was created; the playback clock.
    frame: u64,
    /// Keeps the persisted arrays in step with the recorded path.
    sync: PathSync,
}

impl Default for MemoryPadPlugin {
    fn default() -> Self {
        let config = PadConfig::default();
        let (sender, events) = pad_event_queue(config.queue_capacity);
        let params = Arc::new(PluginParams::new(&config));

        Self {
            sync: PathSync::new(&params),
            params,
            pad: config.build(),
            config,
            events,
            sender: Arc::new(Mutex::new(sender)),
            display: Arc::new(PadDisplay::default()),
            // 44100 Hz is a placeholder until initialize().
            sample_rate: 44100.0,
            frame: 0,
        }
    }
}

impl Plugin for MemoryPadPlugin {
    const NAME: &'static str = "Memory Pad";
    const VENDOR: &'static str = "Loveless Audio";
    const URL: &'static str = "";
    const EMAIL: &'static str = "steve.loveless@gmail.com";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // No inputs; X on the first output channel, Y on the second.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: None,
            main_output_channels: NonZeroU32::new(2),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
        // Mono fallback carries X only.
        AudioIOLayout {
            main_input_channels: None,
            main_output_channels: NonZeroU32::new(1),
            aux_input_ports: &[],
            aux_output_ports: &[],
            names: PortNames::const_default(),
        },
    ];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;
    const SAMPLE_ACCURATE_AUTOMATION: bool = true;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn editor(&mut self, _async_executor: AsyncExecutor<Self>) -> Option<Box<dyn Editor>> {
        editor::create(
            self.params.clone(),
            self.display.clone(),
            self.sender.clone(),
        )
    }

    /// Called on activation and again after the host loads saved state,
    /// which makes it the place to pick up a persisted recording.
    fn initialize(
        &mut self,
        _audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        self.sample_rate = buffer_config.sample_rate;

        // Keep room for a typical gesture so recording rarely allocates on
        // the audio thread.
        if !self.pad.has_room_for(self.config.path_reserve) {
            self.pad.reserve(self.config.path_reserve);
        }

        // A recording that missed its sync is written out first, unless the
        // host loaded state since the last sync; then the loaded state wins.
        match self.sync.activate(&self.params, &mut self.pad) {
            Ok(()) => {
                nih_log!("Restored recorded path ({} points)", self.pad.path().len());
            }
            Err(RestoreError::Empty) => {}
            Err(err) => nih_log!("Ignoring saved path: {err}"),
        }

        true
    }

    /// The path and playback cursor survive a transport stop.
    fn reset(&mut self) {}

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        // ═══════════════════════════════════════════════════════
        // ONCE PER BLOCK — events in, recording out
        // ═══════════════════════════════════════════════════════

        // Step 1: APPLY the editor's drag events.
        //
        // Begin clears the path, each Capture appends a clamped point and
        // End stops recording. Points beyond the reserved capacity
        // allocate, hence `permit_alloc`.
        let finished =
            nih_plug::util::permit_alloc(|| self.pad.drain_events(&mut self.events));
        if finished {
            self.sync.mark_pending();
        }

        // Step 2: PERSIST a finished recording.
        //
        // `try_write` only: if the host is saving state right now the sync
        // stays pending and the next block tries again.
        self.sync.flush(&self.params, &self.pad);

        let sample_time = self.sample_rate.recip();
        let mut last_output = None;

        // ═══════════════════════════════════════════════════════
        // PER SAMPLE — one engine call per time step
        // ═══════════════════════════════════════════════════════
        for mut channel_samples in buffer.iter_samples() {
            // Step 3: FOLLOW the pad params.
            //
            // Host-side pad moves (automation, the editor's param writes)
            // drive the live position, except mid-recording where the
            // captured points are authoritative.
            if !self.pad.is_recording() {
                self.pad
                    .set_live_position(self.params.pad_x.value(), self.params.pad_y.value());
            }

            // Step 4: RUN the engine.
            //
            // Direct mode transforms the live position. Playback advances
            // the cursor when the 60 Hz path clock has ticked:
            //
            //   target_frame = floor(frame * sample_time * 60 * speed)
            //
            // At 48 kHz and speed 1.0 that is one path point every 800
            // samples; in between, the same point is emitted again.
            let frame_params = self.params.frame_params();
            let output = self.pad.process(self.frame, sample_time, &frame_params);
            self.frame += 1;

            // Step 5: WRITE X to channel 0 and Y to channel 1. Any further
            // channels stay silent.
            for (channel_idx, sample) in channel_samples.iter_mut().enumerate() {
                *sample = match channel_idx {
                    0 => output.x,
                    1 => output.y,
                    _ => 0.0,
                };
            }

            last_output = Some(output);
        }

        // Step 6: PUBLISH the last output for the editor's puck and lights.
        // The editor repaints far less often than once per block, so the
        // final sample is enough.
        if let Some(output) = last_output {
            self.display.publish(&output, self.pad.is_recording());
        }

        ProcessStatus::KeepAlive
    }
}

// ─────────────────────────────────────────────────────────────────────
// Plugin format trait implementations
// ─────────────────────────────────────────────────────────────────────

impl ClapPlugin for MemoryPadPlugin {
    const CLAP_ID: &'static str = "com.loveless-audio.memory-pad";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("An XY trackpad that records a gesture and replays it as two control signals");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[ClapFeature::Utility, ClapFeature::Stereo];
}

impl Vst3Plugin for MemoryPadPlugin {
    const VST3_CLASS_ID: [u8; 16] = *b"LvlssMemoryPad01";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Tools];
}

nih_export_clap!(MemoryPadPlugin);
nih_export_vst3!(MemoryPadPlugin);

// Wrap the CLAP plugin into AUv2 format for Logic Pro.
clap_wrapper::export_auv2!();
