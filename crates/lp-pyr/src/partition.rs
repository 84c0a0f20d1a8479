use crate::BlockDescriptor;

/// Pre-computed, disjoint per-worker queues over a descriptor list.
///
/// With `N` descriptors and `W` requested workers, `min(W, N)` queues are
/// built. Every queue holds `N / W'` consecutive descriptors and the last one
/// also takes the `N % W'` remainder.
#[derive(Debug, Clone)]
pub struct WorkPartition<'a> {
    queues: Vec<&'a [BlockDescriptor]>,
}

impl<'a> WorkPartition<'a> {
    pub fn new(descriptors: &'a [BlockDescriptor], workers: usize) -> Self {
        let effective = workers.max(1).min(descriptors.len());
        if effective == 0 {
            return Self { queues: Vec::new() };
        }

        let per_queue = descriptors.len() / effective;
        let mut queues = Vec::with_capacity(effective);
        let mut rest = descriptors;
        for _ in 1..effective {
            let (queue, tail) = rest.split_at(per_queue);
            queues.push(queue);
            rest = tail;
        }
        queues.push(rest);

        Self { queues }
    }

    pub fn queues(&self) -> &[&'a [BlockDescriptor]] {
        &self.queues
    }

    pub fn worker_count(&self) -> usize {
        self.queues.len()
    }

    pub fn queue_lens(&self) -> Vec<usize> {
        self.queues.iter().map(|q| q.len()).collect()
    }
}
