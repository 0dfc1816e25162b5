// Copyright @yucwang 2026

use std::thread;

const SERIAL_THRESHOLD: usize = 1024;

/// Fill `out[i] = f(i)` for every index. Large blocks are split into one
/// contiguous chunk per worker on scoped threads; small blocks run inline.
pub fn parallel_fill<T, F>(out: &mut [T], f: F)
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    let thread_count = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    if out.len() < SERIAL_THRESHOLD || thread_count < 2 {
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = f(i);
        }
        return;
    }

    let chunk_size = (out.len() + thread_count - 1) / thread_count;
    let f_ref = &f;
    thread::scope(|scope| {
        for (chunk_index, chunk) in out.chunks_mut(chunk_size).enumerate() {
            let base = chunk_index * chunk_size;
            scope.spawn(move || {
                for (i, slot) in chunk.iter_mut().enumerate() {
                    *slot = f_ref(base + i);
                }
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_block_is_filled_in_order() {
        let mut out = vec![0usize; 17];
        parallel_fill(&mut out, |i| i * 3);
        for (i, v) in out.iter().enumerate() {
            assert_eq!(*v, i * 3);
        }
    }

    #[test]
    fn test_large_block_matches_serial() {
        let mut out = vec![0u64; 10_007];
        parallel_fill(&mut out, |i| (i as u64).wrapping_mul(2654435761) % 1000);
        for (i, v) in out.iter().enumerate() {
            assert_eq!(*v, (i as u64).wrapping_mul(2654435761) % 1000);
        }
    }

    #[test]
    fn test_empty_block() {
        let mut out: Vec<u8> = Vec::new();
        parallel_fill(&mut out, |_| 1);
        assert!(out.is_empty());
    }
}
