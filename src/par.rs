// src/par.rs
use std::thread;

/// Fill `out[i] = f(i)` for every slot, splitting the slice into one contiguous
/// chunk per worker. Each worker owns its chunk, so no locking is needed and the
/// result is identical to the serial loop. With `threads <= 1` it runs serially.
pub fn fill_indexed<T, F>(out: &mut [T], threads: usize, f: F)
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    let n = out.len();
    if n == 0 || threads <= 1 {
        for (i, slot) in out.iter_mut().enumerate() { *slot = f(i); }
        return;
    }

    let chunk = n.div_ceil(threads.min(n));
    // Scoped threads let us borrow `out` and `f` (no 'static required)
    thread::scope(|scope| {
        for (c, part) in out.chunks_mut(chunk).enumerate() {
            let f_ref = &f;
            scope.spawn(move || {
                let base = c * chunk;
                for (j, slot) in part.iter_mut().enumerate() { *slot = f_ref(base + j); }
            });
        }
    });
}

/// Parallel map over `0..n`, keeping output order deterministic.
pub fn map_range<T, F>(n: usize, threads: usize, f: F) -> Vec<T>
where
    T: Send + Default + Clone,
    F: Fn(usize) -> T + Sync,
{
    let mut out = vec![T::default(); n];
    fill_indexed(&mut out, threads, f);
    out
}
