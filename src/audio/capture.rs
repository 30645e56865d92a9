//! Default input device → ring buffer. The render worker drains the
//! consumer once per tick; the cpal callback never blocks on it.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::traits::*;
use ringbuf::{HeapCons, HeapProd, HeapRb};

pub struct CaptureInput {
    _stream: cpal::Stream,
    cons: HeapCons<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl CaptureInput {
    /// Open the default input device. Failure is reported, not fatal: the
    /// caller falls back to the silent source.
    pub fn open(latency_ms: f32) -> Result<Self, String> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| "no default input device".to_string())?;
        let supported = device
            .default_input_config()
            .map_err(|e| format!("no default input config: {e}"))?;
        if supported.sample_format() != cpal::SampleFormat::F32 {
            return Err(format!(
                "unsupported input sample format {:?}",
                supported.sample_format()
            ));
        }
        let sample_rate = supported.sample_rate().0;
        let channels = supported.channels();

        let config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let capacity =
            (sample_rate as f32 * latency_ms / 1000.0) as usize * channels as usize * 10;
        let rb = HeapRb::<f32>::new(capacity.max(1024));
        let (mut prod, cons): (HeapProd<f32>, HeapCons<f32>) = rb.split();

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    for &s in data {
                        // Overrun drops the newest samples; the analyser
                        // window simply lags a hop.
                        let _ = prod.try_push(s);
                    }
                },
                |err| eprintln!("Input stream error: {err:?}"),
                None,
            )
            .map_err(|e| format!("failed to build input stream: {e}"))?;
        stream
            .play()
            .map_err(|e| format!("failed to start input stream: {e}"))?;

        Ok(Self {
            _stream: stream,
            cons,
            channels,
            sample_rate,
        })
    }

    /// Pop everything buffered since the last tick.
    pub fn drain(&mut self, out: &mut Vec<f32>) {
        out.clear();
        while let Some(s) = self.cons.try_pop() {
            out.push(s);
        }
    }
}
