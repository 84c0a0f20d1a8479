use std::collections::VecDeque;
use std::thread;

use lp_core::{Error, Grid, Histogram};

use crate::{BlockDescriptor, WorkPartition};

/// A run of destination cells owned by exactly one worker.
#[derive(Debug)]
struct Segment<'a> {
    level: usize,
    start: usize,
    cells: &'a mut [u8],
}

/// Computes the mode of every descriptor and writes it into its destination.
///
/// `levels[..first_target]` are read-only sources and `levels[first_target..]`
/// are the destinations. `descriptors` must be sorted by `(level, index)` and
/// cover every destination cell exactly once. The work is split with
/// [`WorkPartition`] and each queue runs on its own scoped thread, writing
/// into a slice of the destination buffers that no other thread can reach.
///
/// Returns after all workers have joined. The first failing worker's error
/// is reported; destinations are then only partially written.
pub fn execute(
    descriptors: &[BlockDescriptor],
    levels: &mut [Grid],
    first_target: usize,
    workers: usize,
) -> Result<(), Error> {
    if first_target == 0 || first_target > levels.len() {
        return Err(Error::OutOfRange {
            index: first_target,
            len: levels.len(),
        });
    }

    let (sources, targets) = levels.split_at_mut(first_target);
    let cells: usize = targets.iter().map(Grid::len).sum();
    if cells != descriptors.len() {
        return Err(Error::SizeMismatch {
            expected: cells,
            actual: descriptors.len(),
        });
    }

    let partition = WorkPartition::new(descriptors, workers);
    log::debug!(
        "dispatching {} blocks over {} levels to {} workers",
        descriptors.len(),
        targets.len(),
        partition.worker_count()
    );

    let slots = targets
        .iter_mut()
        .enumerate()
        .map(|(offset, grid)| Segment {
            level: first_target + offset,
            start: 0,
            cells: grid.data_mut(),
        })
        .collect();
    let carved = carve(slots, &partition.queue_lens());
    let sources: &[Grid] = sources;

    thread::scope(|scope| {
        let handles: Vec<_> = partition
            .queues()
            .iter()
            .zip(carved)
            .map(|(&queue, segments)| scope.spawn(move || drain_queue(queue, sources, segments)))
            .collect();

        first_failure(handles.into_iter().map(|handle| handle.join()))
    })
}

/// Folds joined worker results in worker order, keeping the first error.
///
/// A worker that panicked is reported as `WorkerFailed`.
fn first_failure(
    joined: impl IntoIterator<Item = thread::Result<Result<(), Error>>>,
) -> Result<(), Error> {
    let mut outcome = Ok(());
    for (worker, joined) in joined.into_iter().enumerate() {
        let result = joined.unwrap_or(Err(Error::WorkerFailed { worker }));
        log::trace!("worker {worker} finished: {result:?}");
        if let Err(err) = result
            && outcome.is_ok()
        {
            outcome = Err(err);
        }
    }
    outcome
}

/// Splits the destination slots into consecutive runs of `queue_lens` cells.
fn carve<'a>(slots: VecDeque<Segment<'a>>, queue_lens: &[usize]) -> Vec<Vec<Segment<'a>>> {
    let mut pending = slots;
    let mut carved = Vec::with_capacity(queue_lens.len());

    for &len in queue_lens {
        let mut need = len;
        let mut segments = Vec::new();
        while need > 0 {
            let Some(Segment { level, start, cells }) = pending.pop_front() else {
                break;
            };
            if cells.len() <= need {
                need -= cells.len();
                segments.push(Segment { level, start, cells });
            } else {
                let (head, tail) = cells.split_at_mut(need);
                segments.push(Segment {
                    level,
                    start,
                    cells: head,
                });
                pending.push_front(Segment {
                    level,
                    start: start + need,
                    cells: tail,
                });
                need = 0;
            }
        }
        carved.push(segments);
    }

    carved
}

fn drain_queue(
    queue: &[BlockDescriptor],
    sources: &[Grid],
    segments: Vec<Segment<'_>>,
) -> Result<(), Error> {
    let mut hist = Histogram::new();
    let mut slots = segments.into_iter().flat_map(|seg| {
        let Segment { level, start, cells } = seg;
        cells
            .iter_mut()
            .enumerate()
            .map(move |(offset, cell)| (level, start + offset, cell))
    });

    for desc in queue {
        let mismatch = || Error::InvalidDescriptor {
            level: desc.level,
            index: desc.index,
        };
        let (level, index, cell) = slots.next().ok_or_else(mismatch)?;
        if level != desc.level || index != desc.index {
            return Err(mismatch());
        }
        let source = sources.get(desc.source).ok_or_else(mismatch)?;
        *cell = source.block_mode(desc.origin, desc.span, &mut hist)?;
    }

    Ok(())
}
