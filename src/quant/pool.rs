//! Fan-out/fan-in worker pool.
//!
//! All units of work are queued on a closed channel before any worker starts.
//! A bounded number of workers drain it, each sending one result per unit to
//! a result channel. A single collector thread folds the results and is the
//! only writer to the accumulated value. Once every worker has been joined the
//! last sender is gone, the result channel closes and the collector returns.

use std::thread;

use crossbeam_channel::{bounded, unbounded};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("A worker thread panicked")]
    WorkerPanicked,

    #[error("Work channel disconnected")]
    Disconnected,
}

/// Configuration for the worker pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of worker threads
    pub threads: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let threads = thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1);
        Self { threads }
    }
}

impl PoolConfig {
    pub fn with_threads(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
        }
    }

    /// Never more workers than units, never fewer than one
    fn workers_for(&self, units: usize) -> usize {
        self.threads.min(units).max(1)
    }
}

/// Run `work` over every unit on a bounded pool and fold the results with
/// `collect`, starting from `init`.
///
/// Results arrive in completion order, so `collect` must not depend on order.
///
/// # Errors
///
/// Returns `PoolError::WorkerPanicked` if a worker or the collector panicked,
/// or `PoolError::Disconnected` if a channel closed early.
pub fn fan_out_fan_in<U, R, A, W, C>(
    units: Vec<U>,
    config: &PoolConfig,
    work: W,
    init: A,
    mut collect: C,
) -> Result<A, PoolError>
where
    U: Send,
    R: Send,
    A: Send,
    W: Fn(U) -> R + Sync,
    C: FnMut(&mut A, R) + Send,
{
    let n_workers = config.workers_for(units.len());

    // queue everything, then close the queue
    let (unit_tx, unit_rx) = bounded::<U>(units.len());
    for unit in units {
        unit_tx.send(unit).map_err(|_| PoolError::Disconnected)?;
    }
    drop(unit_tx);

    let (result_tx, result_rx) = unbounded::<R>();
    let work = &work;

    thread::scope(|scope| {
        let collector = scope.spawn(move || {
            let mut acc = init;
            for result in result_rx {
                collect(&mut acc, result);
            }
            acc
        });

        let workers: Vec<_> = (0..n_workers)
            .map(|_| {
                let unit_rx = unit_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || -> Result<(), PoolError> {
                    for unit in unit_rx {
                        result_tx
                            .send(work(unit))
                            .map_err(|_| PoolError::Disconnected)?;
                    }
                    Ok(())
                })
            })
            .collect();
        drop(result_tx);

        let mut outcome = Ok(());
        for worker in workers {
            match worker.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => outcome = Err(e),
                Err(_) => outcome = Err(PoolError::WorkerPanicked),
            }
        }

        let acc = collector.join().map_err(|_| PoolError::WorkerPanicked)?;
        outcome.map(|()| acc)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_unit_collected_once() {
        let units: Vec<u64> = (1..=100).collect();
        let config = PoolConfig::with_threads(4);
        let mut seen = fan_out_fan_in(units, &config, |u| u * 2, Vec::new(), |acc, r| {
            acc.push(r);
        })
        .unwrap();
        seen.sort_unstable();
        assert_eq!(seen, (1..=100).map(|u| u * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_units() {
        let config = PoolConfig::with_threads(3);
        let total = fan_out_fan_in(Vec::<u32>::new(), &config, |u| u, 0u32, |acc, r| {
            *acc += r;
        })
        .unwrap();
        assert_eq!(total, 0);
    }

    #[test]
    fn test_worker_panic_is_reported() {
        let config = PoolConfig::with_threads(2);
        let result = fan_out_fan_in(
            vec![1, 2, 3],
            &config,
            |u: i32| {
                assert!(u != 2, "boom");
                u
            },
            0,
            |acc, r| *acc += r,
        );
        assert_eq!(result, Err(PoolError::WorkerPanicked));
    }

    #[test]
    fn test_workers_bounded_by_units() {
        let config = PoolConfig::with_threads(8);
        assert_eq!(config.workers_for(3), 3);
        assert_eq!(config.workers_for(0), 1);
        assert_eq!(PoolConfig::with_threads(0).threads, 1);
    }
}
