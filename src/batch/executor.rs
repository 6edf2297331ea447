//! Parallel executor.
//!
//! Runs a planned batch of per-block jobs on a fixed worker pool with
//! dynamic work-stealing, one descriptor at a time. Workers share read-only
//! access to the input; each job owns the disjoint output slice it writes,
//! so no locks are taken during execution. A failed job does not stop the
//! pool: all workers drain the queue and join, then the error with the
//! lowest descriptor index is reported.

use crossbeam::channel::bounded;

use crate::error::{Error, Result};

/// Resolve a caller-supplied thread count (0 = one per CPU, capped at 32).
pub fn effective_threads(num_threads: usize) -> usize {
    match num_threads {
        0 => num_cpus::get().clamp(1, 32),
        n => n.clamp(1, 32),
    }
}

/// Run every job, each exactly once, on `num_threads` workers. `new_state`
/// builds the per-worker scratch (a DEFLATE context) once at pool startup;
/// `run` processes one descriptor against that scratch.
pub(crate) fn run_jobs<J, S, NewState, Run>(
    jobs: Vec<J>,
    num_threads: usize,
    new_state: NewState,
    run: Run,
) -> Result<()>
where
    J: Send,
    NewState: Fn() -> S + Sync,
    Run: Fn(&mut S, J) -> Result<()> + Sync,
{
    let num_threads = effective_threads(num_threads).min(jobs.len().max(1));

    if num_threads == 1 {
        let mut state = new_state();
        for job in jobs {
            run(&mut state, job)?;
        }
        return Ok(());
    }

    // Pre-load the whole batch; the channel is the work-stealing queue.
    let (job_tx, job_rx) = bounded(jobs.len());
    for job in jobs.into_iter().enumerate() {
        if job_tx.send(job).is_err() {
            return Err(Error::Internal("job queue disconnected".to_string()));
        }
    }
    drop(job_tx);

    let (err_tx, err_rx) = bounded(num_threads);

    crossbeam::scope(|scope| {
        for _ in 0..num_threads {
            let job_rx = job_rx.clone();
            let err_tx = err_tx.clone();
            let new_state = &new_state;
            let run = &run;

            scope.spawn(move |_| {
                let mut state = new_state();
                let mut first_err: Option<(usize, Error)> = None;
                while let Ok((index, job)) = job_rx.recv() {
                    if let Err(err) = run(&mut state, job) {
                        match first_err {
                            Some((i, _)) if i <= index => {}
                            _ => first_err = Some((index, err)),
                        }
                    }
                }
                if let Some(pair) = first_err {
                    let _ = err_tx.send(pair);
                }
            });
        }
    })
    .map_err(|_| Error::Internal("worker thread panicked".to_string()))?;

    drop(err_tx);

    // Tie-break across workers: lowest descriptor index wins.
    let mut first: Option<(usize, Error)> = None;
    while let Ok((index, err)) = err_rx.recv() {
        match first {
            Some((i, _)) if i <= index => {}
            _ => first = Some((index, err)),
        }
    }

    match first {
        Some((_, err)) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_threads() {
        assert!(effective_threads(0) >= 1);
        assert!(effective_threads(0) <= 32);
        assert_eq!(effective_threads(1), 1);
        assert_eq!(effective_threads(100), 32);
    }

    #[test]
    fn test_runs_every_job_once() {
        let mut data = vec![0u8; 4096];
        let jobs: Vec<&mut [u8]> = data.chunks_mut(64).collect();
        run_jobs(jobs, 4, || (), |_, chunk: &mut [u8]| {
            for b in chunk.iter_mut() {
                *b += 1;
            }
            Ok(())
        })
        .unwrap();
        assert!(data.iter().all(|&b| b == 1));
    }

    #[test]
    fn test_single_thread_path() {
        let jobs: Vec<usize> = (0..10).collect();
        run_jobs(jobs, 1, || (), |_, _| Ok(())).unwrap();
    }

    #[test]
    fn test_reports_lowest_index_error() {
        let jobs: Vec<usize> = (0..200).collect();
        let err = run_jobs(jobs, 4, || (), |_, i| {
            if i == 7 || i == 42 || i == 199 {
                Err(Error::SizeMismatch { expected: i as u32, found: 0 })
            } else {
                Ok(())
            }
        })
        .unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { expected: 7, .. }));
    }

    #[test]
    fn test_empty_batch_is_a_no_op() {
        let jobs: Vec<usize> = Vec::new();
        run_jobs(jobs, 8, || (), |_, _| Ok(())).unwrap();
    }
}
