//! Parallel work distribution across a scoped worker pool.
//!
//! The plan splits each channel's analysis frames into contiguous chunks,
//! assigns them round-robin to workers, and collects processed blocks over a
//! channel. Reassembly sorts each audio channel's blocks by frame index
//! before overlap-add, so worker completion order never affects the output.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use crate::core::cache::PlanCache;
use crate::core::types::AudioBlock;
use crate::core::window::apply_window;
use crate::error::StretchError;
use crate::stretch::engine::{self, normalize_peak, overlap_add_block};
use crate::stretch::params::{DerivedParams, StretchConfig};
use crate::stretch::rephase::{frame_rng, Rephaser};

/// Target number of chunks per worker per channel.
const CHUNKS_PER_WORKER: usize = 3;

/// A contiguous run of analysis frames for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WorkUnit {
    channel: usize,
    start_frame: usize,
    frame_count: usize,
}

/// One rephased block, tagged with the analysis frame it came from.
/// The frame index is the sort key for resynthesis.
struct ProcessedBlock {
    frame_index: usize,
    samples: Vec<f32>,
}

type WorkerResult = Result<(usize, Vec<ProcessedBlock>), String>;

/// Worker count to use when the config does not pin one.
fn default_worker_count() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

/// Splits `frame_count` frames per channel into round-robin worker loads.
fn build_assignments(
    channel_count: usize,
    frame_count: usize,
    worker_count: usize,
) -> Vec<Vec<WorkUnit>> {
    let chunk = (frame_count / (worker_count * CHUNKS_PER_WORKER)).max(1);
    let mut assignments = vec![Vec::new(); worker_count];
    let mut next = 0usize;
    for channel in 0..channel_count {
        let mut start_frame = 0;
        while start_frame < frame_count {
            let len = chunk.min(frame_count - start_frame);
            assignments[next % worker_count].push(WorkUnit {
                channel,
                start_frame,
                frame_count: len,
            });
            next += 1;
            start_frame += len;
        }
    }
    assignments
}

/// Processes one work unit: window + rephase each frame in the range.
fn process_unit(
    channels: &[Vec<f32>],
    unit: WorkUnit,
    params: &DerivedParams,
    rephaser: &mut Rephaser,
    window: &[f32],
    master_seed: u64,
) -> Result<Vec<ProcessedBlock>, String> {
    let input = channels
        .get(unit.channel)
        .ok_or_else(|| format!("work unit references missing channel {}", unit.channel))?;
    let fft_size = params.fft_size;
    let mut blocks = Vec::with_capacity(unit.frame_count);
    for i in unit.start_frame..unit.start_frame + unit.frame_count {
        let pos = params.frame_position(i);
        let frame = input.get(pos..pos + fft_size).ok_or_else(|| {
            format!(
                "frame {} at sample {} overruns channel of {} samples",
                i,
                pos,
                input.len()
            )
        })?;
        let mut block = frame.to_vec();
        apply_window(&mut block, window);
        let mut rng = frame_rng(master_seed, unit.channel, i);
        rephaser.process(&mut block, &mut rng);
        blocks.push(ProcessedBlock {
            frame_index: i,
            samples: block,
        });
    }
    Ok(blocks)
}

/// Overlap-adds one channel's sorted blocks and normalizes the result.
fn reassemble_channel(
    mut blocks: Vec<ProcessedBlock>,
    params: &DerivedParams,
) -> Result<Vec<f32>, StretchError> {
    if blocks.len() != params.frame_count {
        return Err(StretchError::WorkerFailure(format!(
            "expected {} processed blocks, received {}",
            params.frame_count,
            blocks.len()
        )));
    }
    blocks.sort_by_key(|b| b.frame_index);

    let half_size = params.half_size;
    let mut output = vec![0.0f32; params.output_len];
    let mut rolling_prev = vec![0.0f32; params.fft_size];
    for (i, block) in blocks.iter().enumerate() {
        overlap_add_block(
            &mut output,
            i * half_size,
            &block.samples,
            &rolling_prev,
            half_size,
        );
        rolling_prev.copy_from_slice(&block.samples);
    }
    normalize_peak(&mut output);
    Ok(output)
}

/// Stretches `input`, dispatching frame chunks to a worker pool.
///
/// Falls back to the single-threaded engine when one worker (or no work)
/// makes a pool pointless. Any worker error aborts the call; no partial
/// output is returned.
pub(crate) fn stretch_all(
    input: &AudioBlock,
    config: &StretchConfig,
    params: &DerivedParams,
    cache: &mut PlanCache,
    progress: &mut dyn FnMut(f32),
) -> Result<AudioBlock, StretchError> {
    let master_seed = config.seed.unwrap_or_else(rand::random::<u64>);
    let worker_count = config.workers.unwrap_or_else(default_worker_count).max(1);

    if worker_count == 1 || params.frame_count == 0 {
        log::debug!(
            "serial stretch: {} workers, {} frames",
            worker_count,
            params.frame_count
        );
        return Ok(engine::stretch_serial(
            input,
            config,
            params,
            cache,
            master_seed,
            progress,
        ));
    }

    let window = cache.window(config.shape, params.fft_size);
    let plan = cache.plan(params.fft_size);
    let channel_count = input.channel_count();
    let assignments = build_assignments(channel_count, params.frame_count, worker_count);
    log::debug!(
        "parallel stretch: {} workers, {} frames x {} channels",
        worker_count,
        params.frame_count,
        channel_count
    );

    let total_frames = params.frame_count * channel_count;
    let mut results: Vec<Vec<ProcessedBlock>> = Vec::new();
    results.resize_with(channel_count, Vec::new);

    let collected = thread::scope(|scope| -> Result<(), StretchError> {
        let (tx, rx) = mpsc::channel::<WorkerResult>();
        for units in assignments {
            let tx = tx.clone();
            let window = Arc::clone(&window);
            let plan = Arc::clone(&plan);
            let channels = &input.channels;
            scope.spawn(move || {
                let mut rephaser = Rephaser::new(plan, Arc::clone(&window));
                for unit in units {
                    let outcome =
                        process_unit(channels, unit, params, &mut rephaser, &window, master_seed)
                            .map(|blocks| (unit.channel, blocks));
                    if tx.send(outcome).is_err() {
                        // Receiver gone: the call is aborting, stop working.
                        return;
                    }
                }
            });
        }
        drop(tx);

        let mut done_frames = 0usize;
        for outcome in rx {
            let (channel, blocks) = outcome.map_err(StretchError::WorkerFailure)?;
            done_frames += blocks.len();
            results[channel].extend(blocks);
            progress(done_frames as f32 / total_frames as f32);
        }
        Ok(())
    });
    collected?;

    let mut out_channels = Vec::with_capacity(channel_count);
    for blocks in results {
        out_channels.push(reassemble_channel(blocks, params)?);
    }
    Ok(AudioBlock::new(out_channels, input.sample_rate))
}
